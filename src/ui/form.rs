//! Form inputs: the four free-text fields the calculator reads.

use crate::sizing::{CalcError, RiskInputs};

/// Editable input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Capital1,
    Capital2,
    RiskPercent,
    StopLoss,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Capital1, Field::Capital2, Field::RiskPercent, Field::StopLoss];

    pub fn title(&self) -> &'static str {
        match self {
            Field::Capital1 => "Capital account 1",
            Field::Capital2 => "Capital account 2",
            Field::RiskPercent => "Risk %",
            Field::StopLoss => "Stop loss (pips)",
        }
    }
}

/// Raw text of every input, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    capital_1: String,
    capital_2: String,
    risk_percent: String,
    stop_loss: String,
}

impl Form {
    pub fn text(&self, field: Field) -> &str {
        match field {
            Field::Capital1 => &self.capital_1,
            Field::Capital2 => &self.capital_2,
            Field::RiskPercent => &self.risk_percent,
            Field::StopLoss => &self.stop_loss,
        }
    }

    fn text_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Capital1 => &mut self.capital_1,
            Field::Capital2 => &mut self.capital_2,
            Field::RiskPercent => &mut self.risk_percent,
            Field::StopLoss => &mut self.stop_loss,
        }
    }

    #[cfg(test)]
    pub fn set(&mut self, field: Field, text: impl Into<String>) {
        *self.text_mut(field) = text.into();
    }

    pub fn push(&mut self, field: Field, c: char) {
        self.text_mut(field).push(c);
    }

    pub fn backspace(&mut self, field: Field) {
        self.text_mut(field).pop();
    }

    /// Read the current text through the lenient parser.
    pub fn inputs(&self) -> Result<RiskInputs, CalcError> {
        RiskInputs::from_text(&self.capital_1, &self.capital_2, &self.risk_percent, &self.stop_loss)
    }
}
