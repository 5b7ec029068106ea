//! Output regions showing the last successful calculation.

use crate::sizing::Calculation;

/// Named output region a copy control can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum RegionId {
    Lot1,
    Risk1,
    Lot2,
    Risk2,
    Label1,
    Label2,
}

/// Text of one region plus its risk-warning flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputRegion {
    pub text: String,
    pub warning: bool,
}

impl OutputRegion {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            warning: false,
        }
    }
}

/// All output regions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultPanel {
    lot_1: OutputRegion,
    risk_1: OutputRegion,
    lot_2: OutputRegion,
    risk_2: OutputRegion,
    label_1: OutputRegion,
    label_2: OutputRegion,
}

impl Default for ResultPanel {
    fn default() -> Self {
        Self {
            lot_1: OutputRegion::plain("0.00"),
            risk_1: OutputRegion::plain("$0.00 Risk"),
            lot_2: OutputRegion::plain("0.00"),
            risk_2: OutputRegion::plain("$0.00 Risk"),
            label_1: OutputRegion::plain("Account 1 lot size"),
            label_2: OutputRegion::plain("Account 2 lot size"),
        }
    }
}

impl ResultPanel {
    pub fn region(&self, id: RegionId) -> &OutputRegion {
        match id {
            RegionId::Lot1 => &self.lot_1,
            RegionId::Risk1 => &self.risk_1,
            RegionId::Lot2 => &self.lot_2,
            RegionId::Risk2 => &self.risk_2,
            RegionId::Label1 => &self.label_1,
            RegionId::Label2 => &self.label_2,
        }
    }

    /// Replace every region with the values of `calc`.
    pub fn apply(&mut self, calc: &Calculation) {
        self.lot_1 = OutputRegion {
            text: calc.account_1.display_lot.clone(),
            warning: calc.account_1.below_minimum,
        };
        self.risk_1 = OutputRegion::plain(calc.account_1.display_risk.clone());
        self.lot_2 = OutputRegion {
            text: calc.account_2.display_lot.clone(),
            warning: calc.account_2.below_minimum,
        };
        self.risk_2 = OutputRegion::plain(calc.account_2.display_risk.clone());
        self.label_1 = OutputRegion::plain(calc.label_account_1.clone());
        self.label_2 = OutputRegion::plain(calc.label_account_2.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sizing::{RiskCalculator, RiskInputs, SizingConfig};

    #[test]
    fn test_apply_sets_text_and_warning() {
        let calc = RiskCalculator::new(SizingConfig::default())
            .calculate(&RiskInputs::from_text("100", "10000", "1", "50").unwrap())
            .unwrap();

        let mut panel = ResultPanel::default();
        panel.apply(&calc);

        assert_eq!(panel.region(RegionId::Lot1).text, "0.01");
        assert!(panel.region(RegionId::Lot1).warning);
        assert_eq!(panel.region(RegionId::Risk1).text, "$1.00 Risk");
        assert!(!panel.region(RegionId::Risk1).warning);
        assert_eq!(panel.region(RegionId::Lot2).text, "0.20");
        assert!(!panel.region(RegionId::Lot2).warning);
        assert_eq!(panel.region(RegionId::Label2).text, "Account 2 lot size for 50 pips");
    }
}
