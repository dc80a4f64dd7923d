//! Calculator constants and the tunable configuration built from them.
//!
//! Every threshold the calculators depend on is a named constant here so
//! formulas never carry bare literals. `CalculatorConfig::default()` is the
//! configuration the public website ships with.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::CalcError;
use crate::types::{Money, Multiple, Rate};
use crate::CalcResult;

// ---------------------------------------------------------------------------
// DSCR
// ---------------------------------------------------------------------------

/// Fixed amortization term used for the DSCR amortized payment (30 years).
pub const DSCR_AMORTIZATION_TERM_MONTHS: u32 = 360;

/// Length of the interest-only period offered with the DSCR product (10 years).
pub const DSCR_INTEREST_ONLY_TERM_MONTHS: u32 = 120;

/// Ratio at or above which a deal is rated Excellent.
pub const DSCR_EXCELLENT: Multiple = dec!(1.25);

/// Ratio at or above which a deal falls in the standard approval range.
pub const DSCR_STANDARD: Multiple = dec!(1.10);

/// Lowest ratio any specialty DSCR program accepts.
pub const DSCR_SPECIALTY_MIN: Multiple = dec!(0.75);

// ---------------------------------------------------------------------------
// Refinance
// ---------------------------------------------------------------------------

/// Closing costs assumed when the borrower has not entered their own (1.5%).
pub const DEFAULT_CLOSING_COST_RATE: Rate = dec!(0.015);

/// Rate increment the new-rate input snaps to when snapping is enabled.
pub const RATE_SNAP_INCREMENT: Decimal = dec!(0.125);

/// Decimal places kept on the new rate when snapping is off.
pub const RATE_INPUT_DECIMALS: u32 = 3;

/// Upper bound on the proposed new rate, in percent.
pub const MAX_NEW_RATE_PERCENT: Decimal = dec!(15);

pub const MAX_REMAINING_TERM_YEARS: u32 = 60;
pub const MAX_REMAINING_TERM_MONTHS: u32 = 11;
pub const MIN_CUSTOM_TERM_YEARS: u32 = 1;
pub const MAX_CUSTOM_TERM_YEARS: u32 = 40;
pub const MIN_HORIZON_YEARS: u32 = 1;
pub const MAX_HORIZON_YEARS: u32 = 40;

// ---------------------------------------------------------------------------
// Shared domain bounds
// ---------------------------------------------------------------------------

/// Upper bound on any rate entered in percent.
pub const MAX_RATE_PERCENT: Decimal = dec!(40);

/// Upper bound on any money amount (one trillion). Keeps every intermediate
/// product well inside Decimal's 96-bit mantissa.
pub const MAX_AMOUNT: Money = dec!(1_000_000_000_000);

pub const MONTHS_PER_YEAR: u32 = 12;

/// Longest loan term any calculator evaluates (60 years 11 months).
pub const MAX_TERM_MONTHS: u32 =
    MAX_REMAINING_TERM_YEARS * MONTHS_PER_YEAR + MAX_REMAINING_TERM_MONTHS;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// DSCR qualification breakpoints, evaluated highest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DscrTierBreakpoints {
    pub excellent: Multiple,
    pub standard: Multiple,
    pub specialty_min: Multiple,
}

impl Default for DscrTierBreakpoints {
    fn default() -> Self {
        Self {
            excellent: DSCR_EXCELLENT,
            standard: DSCR_STANDARD,
            specialty_min: DSCR_SPECIALTY_MIN,
        }
    }
}

/// What happens to the DSCR term fields when the payment type changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermResetPolicy {
    /// Amortization term goes back to 360 months and the interest-only term
    /// to 0 (amortized) or 120 (interest-only).
    #[default]
    ResetOnPaymentTypeChange,
    /// Terms keep whatever the user last entered.
    PreserveUserTerms,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    pub dscr_amortization_term_months: u32,
    pub dscr_interest_only_term_months: u32,
    pub dscr_tiers: DscrTierBreakpoints,
    pub default_closing_cost_rate: Rate,
    pub term_reset_policy: TermResetPolicy,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            dscr_amortization_term_months: DSCR_AMORTIZATION_TERM_MONTHS,
            dscr_interest_only_term_months: DSCR_INTEREST_ONLY_TERM_MONTHS,
            dscr_tiers: DscrTierBreakpoints::default(),
            default_closing_cost_rate: DEFAULT_CLOSING_COST_RATE,
            term_reset_policy: TermResetPolicy::default(),
        }
    }
}

impl CalculatorConfig {
    /// Parse a JSON configuration document and validate it.
    pub fn from_json(raw: &str) -> CalcResult<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML configuration document and validate it.
    pub fn from_yaml(raw: &str) -> CalcResult<Self> {
        let config: Self = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CalcResult<()> {
        if self.dscr_amortization_term_months == 0
            || self.dscr_amortization_term_months > MAX_TERM_MONTHS
        {
            return Err(CalcError::InvalidConfig {
                field: "dscr_amortization_term_months".into(),
                reason: format!(
                    "Amortization term must be between 1 and {MAX_TERM_MONTHS} months."
                ),
            });
        }
        if self.dscr_interest_only_term_months > self.dscr_amortization_term_months {
            return Err(CalcError::InvalidConfig {
                field: "dscr_interest_only_term_months".into(),
                reason: "Interest-only period cannot outlast the loan term.".into(),
            });
        }
        let tiers = &self.dscr_tiers;
        if tiers.specialty_min < Decimal::ZERO
            || tiers.specialty_min >= tiers.standard
            || tiers.standard >= tiers.excellent
        {
            return Err(CalcError::InvalidConfig {
                field: "dscr_tiers".into(),
                reason: "Breakpoints must be non-negative and strictly ascending: \
                         specialty_min < standard < excellent."
                    .into(),
            });
        }
        if self.default_closing_cost_rate < Decimal::ZERO
            || self.default_closing_cost_rate > Decimal::ONE
        {
            return Err(CalcError::InvalidConfig {
                field: "default_closing_cost_rate".into(),
                reason: "Closing-cost rate must be a fraction between 0 and 1.".into(),
            });
        }
        Ok(())
    }
}
