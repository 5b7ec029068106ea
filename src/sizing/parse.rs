//! Lenient numeric parsing for free-text form fields.
//!
//! A partially filled form must never fail: any field without a usable number
//! reads as zero. Parsing takes the longest leading numeric prefix, so
//! `"2.5%"` reads as 2.5 and `"abc"` reads as 0. A number that is present but
//! does not fit a `Decimal` is an error rather than zero.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Parse `text` as a decimal, reading text without a leading number as zero.
///
/// Fails only when the leading number is outside the `Decimal` range.
pub fn parse_lenient(text: &str) -> Result<Decimal, rust_decimal::Error> {
    let Some(prefix) = numeric_prefix(text.trim_start()) else {
        return Ok(Decimal::ZERO);
    };

    match prefix.exponent {
        Some(exp) => Decimal::from_scientific(&format!("{}e{}", prefix.mantissa, exp)),
        None => Decimal::from_str(&prefix.mantissa),
    }
}

/// Leading number found in a string, normalized for `Decimal` parsing.
struct NumericPrefix {
    mantissa: String,
    exponent: Option<String>,
}

fn numeric_prefix(s: &str) -> Option<NumericPrefix> {
    let bytes = s.as_bytes();
    let mut pos = 0;

    let negative = match bytes.first() {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let int_digits = &s[int_start..pos];

    let mut frac_digits = "";
    if pos < bytes.len() && bytes[pos] == b'.' {
        let frac_start = pos + 1;
        let mut end = frac_start;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        frac_digits = &s[frac_start..end];
        pos = end;
    }

    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    let mut mantissa = String::new();
    if negative {
        mantissa.push('-');
    }
    mantissa.push_str(if int_digits.is_empty() { "0" } else { int_digits });
    if !frac_digits.is_empty() {
        mantissa.push('.');
        mantissa.push_str(frac_digits);
    }

    // Exponent only counts when at least one digit follows the marker
    let mut exponent = None;
    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        let mut end = pos + 1;
        let mut exp = String::new();
        if end < bytes.len() && (bytes[end] == b'-' || bytes[end] == b'+') {
            if bytes[end] == b'-' {
                exp.push('-');
            }
            end += 1;
        }
        let digits_start = end;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end > digits_start {
            exp.push_str(&s[digits_start..end]);
            exponent = Some(exp);
        }
    }

    Some(NumericPrefix { mantissa, exponent })
}
