//! Sizing configuration.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Configuration for lot sizing and result formatting.
#[derive(Debug, Clone, Serialize)]
pub struct SizingConfig {
    /// Monetary value of one pip for one standard lot
    pub pip_value: Decimal,

    /// Smallest tradeable lot; anything below is shown as this with a warning
    pub min_lot: Decimal,

    /// Symbol prefixed to monetary amounts
    pub currency_symbol: String,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            pip_value: dec!(10),  // Majors like GBPUSD: ~$10 per pip per standard lot
            min_lot: dec!(0.01),  // Micro lot
            currency_symbol: "$".to_string(),
        }
    }
}

impl SizingConfig {
    /// Reject configurations the calculator cannot work with.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.pip_value.is_zero() {
            anyhow::bail!("pip value must be non-zero");
        }
        if self.min_lot <= Decimal::ZERO {
            anyhow::bail!("minimum lot must be positive, got {}", self.min_lot);
        }
        Ok(())
    }
}

impl std::fmt::Display for SizingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Sizing Configuration ===")?;
        writeln!(f, "Pip Value:        {}{} per pip per standard lot", self.currency_symbol, self.pip_value)?;
        writeln!(f, "Minimum Lot:      {}", self.min_lot)?;
        writeln!(f, "Currency Symbol:  {}", self.currency_symbol)?;
        Ok(())
    }
}
