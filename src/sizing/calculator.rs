//! Risk calculator: monetary risk and lot size per account.
//!
//! For each account:
//!   risk = capital * (risk% / 100)
//!   lot  = risk / (stop_loss_pips * pip_value)
//!
//! The lot is floored to two decimals so the suggested size never overstates
//! the risk taken. Lots below the minimum are shown as the minimum and flagged.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;
use tracing::{debug, warn};

use super::error::CalcError;
use super::format::{format_lot, format_money};
use super::parse::parse_lenient;
use super::SizingConfig;

/// Decimal places kept when flooring a lot size.
const LOT_DECIMALS: u32 = 2;

/// Numeric inputs of one calculation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskInputs {
    pub capital_account_1: Decimal,
    pub capital_account_2: Decimal,
    pub risk_percent: Decimal,
    pub stop_loss_pips: Decimal,
}

impl RiskInputs {
    /// Build inputs from free-text fields. Text without a number reads as zero.
    ///
    /// Fails with [`CalcError::OutOfRange`] when a field holds a number too
    /// large for decimal arithmetic.
    pub fn from_text(
        capital_1: &str,
        capital_2: &str,
        risk_percent: &str,
        stop_loss: &str,
    ) -> Result<Self, CalcError> {
        let field = |text: &str, field: &'static str| {
            parse_lenient(text).map_err(|_| CalcError::OutOfRange { field })
        };

        Ok(Self {
            capital_account_1: field(capital_1, "Capital account 1")?,
            capital_account_2: field(capital_2, "Capital account 2")?,
            risk_percent: field(risk_percent, "Risk %")?,
            stop_loss_pips: field(stop_loss, "Stop loss")?,
        })
    }
}

/// Sizing outcome for a single account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskResult {
    /// Money lost if the stop-loss is hit
    pub monetary_risk: Decimal,
    /// Lot size before flooring
    pub raw_lot_size: Decimal,
    /// Lot size floored to two decimals
    pub floored_lot_size: Decimal,
    /// Floored lot is under the minimum tradeable lot
    pub below_minimum: bool,
    /// Lot text to show; the minimum lot when `below_minimum`
    pub display_lot: String,
    /// Currency-formatted risk, e.g. `$200.00 Risk`
    pub display_risk: String,
}

/// Results for both accounts plus labels naming the stop-loss used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Calculation {
    pub stop_loss_pips: Decimal,
    pub account_1: RiskResult,
    pub account_2: RiskResult,
    pub label_account_1: String,
    pub label_account_2: String,
}

/// Calculator for lot sizes and monetary risk.
pub struct RiskCalculator {
    config: SizingConfig,
}

impl RiskCalculator {
    /// Create a calculator with the given pip value and minimum lot.
    pub fn new(config: SizingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SizingConfig {
        &self.config
    }

    /// Size both accounts.
    ///
    /// Fails with [`CalcError::InvalidStopLoss`] when the stop-loss is zero;
    /// nothing is computed in that case.
    pub fn calculate(&self, inputs: &RiskInputs) -> Result<Calculation, CalcError> {
        let stop_loss = inputs.stop_loss_pips;
        if stop_loss.is_zero() {
            warn!("Calculation blocked: stop loss is zero");
            return Err(CalcError::InvalidStopLoss);
        }

        let account_1 = self.size_account(inputs.capital_account_1, inputs.risk_percent, stop_loss)?;
        let account_2 = self.size_account(inputs.capital_account_2, inputs.risk_percent, stop_loss)?;

        let pips = stop_loss.normalize();
        let calculation = Calculation {
            stop_loss_pips: stop_loss,
            account_1,
            account_2,
            label_account_1: format!("Account 1 lot size for {} pips", pips),
            label_account_2: format!("Account 2 lot size for {} pips", pips),
        };

        debug!(
            stop_loss = %pips,
            lot_1 = %calculation.account_1.display_lot,
            lot_2 = %calculation.account_2.display_lot,
            "Calculated lot sizes"
        );

        Ok(calculation)
    }

    fn size_account(
        &self,
        capital: Decimal,
        risk_percent: Decimal,
        stop_loss: Decimal,
    ) -> Result<RiskResult, CalcError> {
        let monetary_risk = (risk_percent / dec!(100))
            .checked_mul(capital)
            .ok_or(CalcError::Overflow { step: "monetary risk" })?;

        let risk_per_lot = stop_loss
            .checked_mul(self.config.pip_value)
            .ok_or(CalcError::Overflow { step: "risk per lot" })?;

        let raw_lot_size = monetary_risk
            .checked_div(risk_per_lot)
            .ok_or(CalcError::Overflow { step: "lot size" })?;

        // Floor, never round: rounding up would overstate the position
        let floored_lot_size =
            raw_lot_size.round_dp_with_strategy(LOT_DECIMALS, RoundingStrategy::ToNegativeInfinity);

        let below_minimum = floored_lot_size < self.config.min_lot;
        let display_lot = if below_minimum {
            format_lot(self.config.min_lot)
        } else {
            format_lot(floored_lot_size)
        };

        Ok(RiskResult {
            monetary_risk,
            raw_lot_size,
            floored_lot_size,
            below_minimum,
            display_lot,
            display_risk: format!("{} Risk", format_money(monetary_risk, &self.config.currency_symbol)),
        })
    }
}
