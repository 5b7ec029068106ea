//! Display formatting for lots and money.

use rust_decimal::{Decimal, RoundingStrategy};

/// Format a monetary amount as `$1,234.56` (US grouping, 2 decimals).
pub fn format_money(amount: Decimal, symbol: &str) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };

    let digits = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    format!("{}{}{}.{}", sign, symbol, group_thousands(int_part), frac_part)
}

/// Format a lot size with exactly two decimals.
pub fn format_lot(lot: Decimal) -> String {
    format!("{:.2}", lot)
}

fn group_thousands(int_part: &str) -> String {
    let len = int_part.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
