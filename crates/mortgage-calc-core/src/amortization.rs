//! Amortization engine shared by both calculators.
//!
//! Payments follow the standard level-payment formula
//! `P * r(1+r)^n / ((1+r)^n - 1)`, with straight-line repayment when the
//! periodic rate is zero. Payment functions are total: degenerate principal or
//! term produce a zero payment, and a compound factor too large for a Decimal
//! means the payment has converged to interest-only. Products outside the
//! calculators' clamped domain saturate at `Decimal::MAX` instead of
//! overflowing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{MAX_TERM_MONTHS, MONTHS_PER_YEAR};
use crate::error::CalcError;
use crate::types::{Money, Rate};
use crate::CalcResult;

/// One month of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub month: u32,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub balance: Money,
}

/// Convert an annual rate in percent (7.25) to a monthly periodic rate.
pub fn monthly_rate(annual_percent: Decimal) -> Rate {
    annual_percent / Decimal::ONE_HUNDRED / Decimal::from(MONTHS_PER_YEAR)
}

/// `(1 + r)^n` via iterative multiplication. `None` once the factor no
/// longer fits in a Decimal.
fn compound_factor(rate_per_month: Rate, term_months: u32) -> Option<Decimal> {
    let one_plus_r = Decimal::ONE.checked_add(rate_per_month)?;
    let mut compound = Decimal::ONE;
    for _ in 0..term_months {
        compound = compound.checked_mul(one_plus_r)?;
    }
    Some(compound)
}

/// Level principal-and-interest payment.
///
/// Zero for a non-positive principal or a zero term; `principal / n` for a
/// non-positive rate.
pub fn monthly_payment(principal: Money, rate_per_month: Rate, term_months: u32) -> Money {
    if principal <= Decimal::ZERO || term_months == 0 {
        return Decimal::ZERO;
    }

    let months = Decimal::from(term_months);
    if rate_per_month <= Decimal::ZERO {
        return principal / months;
    }

    let Some(compound) = compound_factor(rate_per_month, term_months) else {
        return interest_only_payment(principal, rate_per_month);
    };
    let denominator = compound - Decimal::ONE;

    // Rates so small that (1+r)^n rounds back to one behave as interest-free.
    if denominator.is_zero() {
        return principal / months;
    }

    interest_only_payment(principal, rate_per_month).saturating_mul(compound / denominator)
}

/// Interest-only payment: the interest accrued on the full principal.
pub fn interest_only_payment(principal: Money, rate_per_month: Rate) -> Money {
    if principal <= Decimal::ZERO || rate_per_month <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    principal.saturating_mul(rate_per_month)
}

/// Interest paid over the life of a loan at a level payment.
pub fn total_interest(payment: Money, term_months: u32, principal: Money) -> Money {
    payment
        .saturating_mul(Decimal::from(term_months))
        .saturating_sub(principal)
}

/// Outstanding balance after `months_paid` level payments.
pub fn balance_after(
    principal: Money,
    rate_per_month: Rate,
    term_months: u32,
    months_paid: u32,
) -> Money {
    if principal <= Decimal::ZERO || months_paid >= term_months {
        return Decimal::ZERO;
    }

    let payment = monthly_payment(principal, rate_per_month, term_months);
    let paid = Decimal::from(months_paid);

    let balance = if rate_per_month <= Decimal::ZERO {
        principal - payment * paid
    } else {
        // Past Decimal range the payment is interest-only, so nothing amortizes.
        compound_factor(rate_per_month, months_paid)
            .and_then(|compound| {
                let grown = principal.checked_mul(compound)?;
                let repaid = payment
                    .checked_mul(compound - Decimal::ONE)?
                    .checked_div(rate_per_month)?;
                grown.checked_sub(repaid)
            })
            .unwrap_or(principal)
    };

    balance.max(Decimal::ZERO)
}

/// Month-by-month schedule. The last row takes whatever balance remains so
/// the loan closes at exactly zero. Terms longer than `MAX_TERM_MONTHS` are
/// rejected.
pub fn amortization_schedule(
    principal: Money,
    rate_per_month: Rate,
    term_months: u32,
) -> CalcResult<Vec<ScheduleRow>> {
    if term_months > MAX_TERM_MONTHS {
        return Err(CalcError::InvalidInput {
            field: "term_months".into(),
            reason: format!("Schedules are limited to {MAX_TERM_MONTHS} months."),
        });
    }

    let payment = monthly_payment(principal, rate_per_month, term_months);
    if payment.is_zero() {
        return Ok(Vec::new());
    }

    let rate = rate_per_month.max(Decimal::ZERO);
    let mut balance = principal;
    let mut rows = Vec::with_capacity(term_months as usize);

    for month in 1..=term_months {
        let interest = balance * rate;
        let (row_payment, principal_part) = if month == term_months {
            (balance + interest, balance)
        } else {
            (payment, payment - interest)
        };
        balance -= principal_part;

        rows.push(ScheduleRow {
            month,
            payment: row_payment,
            interest,
            principal: principal_part,
            balance,
        });
    }

    Ok(rows)
}
