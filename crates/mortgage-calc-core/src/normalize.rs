//! Input normalizer: turns raw form text into bounded Decimal values.
//!
//! Nothing here fails. Text that does not describe a number becomes zero,
//! and every value is clamped into the domain the calculators accept, so
//! the math downstream never needs to validate.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;
use tracing::debug;

use crate::config::{
    MAX_AMOUNT, MAX_NEW_RATE_PERCENT, MAX_RATE_PERCENT, RATE_INPUT_DECIMALS, RATE_SNAP_INCREMENT,
};
use crate::types::{Money, Rate};

/// Parse free text into a number, keeping only digits, `.` and `-`.
///
/// `"$2,500.50"` becomes `2500.50`. Input that is empty after stripping, has
/// more than one decimal point, a `-` anywhere but the front, no digits, or
/// exceeds Decimal's range yields `0`. The result is clamped to
/// `±MAX_AMOUNT`.
pub fn parse_bounded_number(raw: &str) -> Decimal {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    match parse_cleaned(&cleaned) {
        Some(value) => value.clamp(-MAX_AMOUNT, MAX_AMOUNT),
        None => {
            if !cleaned.is_empty() {
                debug!(raw, "unparseable numeric input, using 0");
            }
            Decimal::ZERO
        }
    }
}

fn parse_cleaned(cleaned: &str) -> Option<Decimal> {
    let (negative, body) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned),
    };

    if body.contains('-') || body.matches('.').count() > 1 {
        return None;
    }
    if !body.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }

    let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));
    let int_part = if int_part.is_empty() { "0" } else { int_part };
    let text = if frac_part.is_empty() {
        int_part.to_string()
    } else {
        format!("{int_part}.{frac_part}")
    };

    let value = Decimal::from_str(&text).ok()?;
    Some(if negative { -value } else { value })
}

/// Parse a money amount: never negative, never above `MAX_AMOUNT`.
pub fn parse_non_negative(raw: &str) -> Money {
    clamp_amount(parse_bounded_number(raw))
}

/// Parse and clamp into `[lo, hi]`.
pub fn parse_clamped(raw: &str, lo: Decimal, hi: Decimal) -> Decimal {
    parse_bounded_number(raw).clamp(lo, hi)
}

/// Parse a whole count (years, months): floored, then clamped into `[lo, hi]`.
pub fn parse_whole_clamped(raw: &str, lo: u32, hi: u32) -> u32 {
    whole_clamped(parse_bounded_number(raw), lo, hi)
}

/// Floor a Decimal to a whole count clamped into `[lo, hi]`.
pub fn whole_clamped(value: Decimal, lo: u32, hi: u32) -> u32 {
    let floored = value.floor().clamp(Decimal::from(lo), Decimal::from(hi));
    floored.to_u32().unwrap_or(lo)
}

/// Discount points are typed as percent of the loan (1 = one point) and
/// carried as a fraction (0.01).
pub fn parse_points_percent(raw: &str) -> Rate {
    (parse_bounded_number(raw).max(Decimal::ZERO) / Decimal::ONE_HUNDRED).min(Decimal::ONE)
}

/// Clamp a money amount into `[0, MAX_AMOUNT]`.
pub fn clamp_amount(value: Money) -> Money {
    value.clamp(Decimal::ZERO, MAX_AMOUNT)
}

/// Clamp an annual rate in percent into `[0, MAX_RATE_PERCENT]`.
pub fn clamp_rate_percent(value: Decimal) -> Decimal {
    value.clamp(Decimal::ZERO, MAX_RATE_PERCENT)
}

/// Process the proposed new rate (in percent) the way the rate field does:
/// snap to the nearest eighth when `snap_to_eighths` is set, otherwise keep
/// three decimals; then clamp to `[0, MAX_NEW_RATE_PERCENT]`.
pub fn normalize_new_rate(value: Decimal, snap_to_eighths: bool) -> Decimal {
    let processed = if snap_to_eighths {
        (value / RATE_SNAP_INCREMENT)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            * RATE_SNAP_INCREMENT
    } else {
        value.round_dp_with_strategy(RATE_INPUT_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
    };
    processed.clamp(Decimal::ZERO, MAX_NEW_RATE_PERCENT)
}
