//! Display strings for calculator results (USD, en-US grouping).

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::MONTHS_PER_YEAR;
use crate::types::{Money, Multiple, Rate};

#[cfg(feature = "refinance")]
use crate::refinance::BreakEven;

/// `$1,995.91` with `fraction_digits` decimals; negatives as `-$1,234`.
pub fn currency(value: Money, fraction_digits: u32) -> String {
    let rounded =
        value.round_dp_with_strategy(fraction_digits, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let text = format!("{:.*}", fraction_digits as usize, rounded.abs());

    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{sign}${grouped}.{f}"),
        None => format!("{sign}${grouped}"),
    }
}

/// A fraction as a percentage: `0.0725` → `7.25%`.
pub fn percent(fraction: Rate, fraction_digits: u32) -> String {
    let pct = (fraction * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(fraction_digits, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}%", fraction_digits as usize, pct)
}

/// Coverage ratio to two places: `1.13×`.
pub fn ratio(value: Multiple) -> String {
    let r = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{r:.2}×")
}

#[cfg(feature = "refinance")]
pub fn break_even_label(break_even: BreakEven) -> String {
    match break_even {
        BreakEven::Months(m) => format!("{m} months"),
        BreakEven::NoSavings => "No savings".to_string(),
    }
}

/// Remaining term as `26y 0m`.
pub fn term_left_label(months: u32) -> String {
    format!("{}y {}m", months / MONTHS_PER_YEAR, months % MONTHS_PER_YEAR)
}
