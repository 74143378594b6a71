//! Currency string codec.
//!
//! Fee calculators render every amount as display text (`"₹1,234.56"`). The
//! decoder accepts an optional sign, an optional currency marker, digit groups
//! separated by commas and an optional fractional part. Anything else is a
//! decode error; nothing is ever coerced to zero.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;
use thiserror::Error;

/// Currency markers stripped before parsing, longest first.
const CURRENCY_MARKERS: [&str; 5] = ["INR", "Rs.", "Rs", "₹", "$"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurrencyDecodeError {
    #[error("empty amount")]
    Empty,

    #[error("malformed amount '{input}': {reason}")]
    Malformed { input: String, reason: &'static str },
}

/// Decode a display amount such as `"₹1,234.56"` into a [`Decimal`].
pub fn parse_currency(input: &str) -> Result<Decimal, CurrencyDecodeError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CurrencyDecodeError::Empty);
    }

    let malformed = |reason| CurrencyDecodeError::Malformed {
        input: input.to_string(),
        reason,
    };

    // Sign may sit on either side of the marker: "-₹5.00" or "₹-5.00".
    let (mut negative, mut rest) = match trimmed.strip_prefix('-') {
        Some(r) => (true, r.trim_start()),
        None => (false, trimmed),
    };
    if let Some(marker) = CURRENCY_MARKERS.iter().find(|m| rest.starts_with(**m)) {
        rest = rest[marker.len()..].trim_start();
    }
    if let Some(r) = rest.strip_prefix('-') {
        if negative {
            return Err(malformed("double sign"));
        }
        negative = true;
        rest = r;
    }

    let (int_part, frac_part) = match rest.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rest, None),
    };

    let digits = strip_group_separators(int_part).ok_or_else(|| malformed("bad digit grouping"))?;
    if let Some(frac) = frac_part {
        if frac.is_empty() || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(malformed("bad fractional part"));
        }
    }
    if digits.is_empty() && frac_part.is_none() {
        return Err(malformed("no digits"));
    }

    let mut normalized = String::with_capacity(rest.len() + 1);
    if negative {
        normalized.push('-');
    }
    if digits.is_empty() {
        normalized.push('0');
    } else {
        normalized.push_str(&digits);
    }
    if let Some(frac) = frac_part {
        normalized.push('.');
        normalized.push_str(frac);
    }

    Decimal::from_str(&normalized).map_err(|_| malformed("out of range"))
}

/// Removes thousands separators, returning `None` when a comma is not
/// sandwiched between digits or a non-digit appears.
fn strip_group_separators(int_part: &str) -> Option<String> {
    let chars: Vec<char> = int_part.chars().collect();
    let mut out = String::with_capacity(chars.len());
    for (i, c) in chars.iter().enumerate() {
        match c {
            '0'..='9' => out.push(*c),
            ',' => {
                let prev_digit = i > 0 && chars[i - 1].is_ascii_digit();
                let next_digit = chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());
                if !(prev_digit && next_digit) {
                    return None;
                }
            }
            _ => return None,
        }
    }
    Some(out)
}

/// Render an amount the way the fee calculator displays it: rupee sign,
/// comma-grouped thousands, two decimals (half-up).
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{}₹{}.{}", sign, grouped, frac_part)
}

/// True when `value` is a bare decimal number (digits with at most one point).
/// Display strings carrying a currency marker or separators are not.
pub fn is_plain_decimal(value: &str) -> bool {
    let mut seen_point = false;
    let mut seen_digit = false;
    for c in value.chars() {
        match c {
            '0'..='9' => seen_digit = true,
            '.' if !seen_point => seen_point = true,
            _ => return false,
        }
    }
    seen_digit
}
