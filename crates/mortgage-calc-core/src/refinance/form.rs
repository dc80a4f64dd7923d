//! Form state behind the refinance calculator.
//!
//! Holds the per-field normalization rules and the sticky closing-costs
//! override. Until the borrower types a closing-cost figure the default
//! (1.5% of the base loan) tracks the loan amount; once they do, their
//! figure sticks until `reset` or a preset is applied.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::calculator::{
    default_closing_costs, evaluate_with_config, NewTerm, RefinanceInputs, RefinanceResult,
};
use crate::config::{
    CalculatorConfig, MAX_CUSTOM_TERM_YEARS, MAX_HORIZON_YEARS, MAX_RATE_PERCENT,
    MAX_REMAINING_TERM_MONTHS, MAX_REMAINING_TERM_YEARS, MIN_CUSTOM_TERM_YEARS,
    MIN_HORIZON_YEARS,
};
use crate::normalize::{
    normalize_new_rate, parse_bounded_number, parse_clamped, parse_non_negative,
    parse_points_percent, parse_whole_clamped,
};
use crate::types::Money;

/// Closing-costs field state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosingCostsEntry {
    #[default]
    Unset,
    UserOverridden(Money),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefinanceField {
    CurrentBalance,
    CurrentRate,
    RemainingTermYears,
    RemainingTermMonths,
    Taxes,
    Insurance,
    Hoa,
    NewRate,
    CustomTermYears,
    ClosingCosts,
    PointsPercent,
    CashOut,
    CashIn,
    HorizonYears,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefinancePreset {
    /// A typical rate-and-term refinance used to demo the calculator.
    Sample,
    /// Everything zeroed.
    Empty,
}

#[derive(Debug, Clone)]
pub struct RefinanceForm {
    current_balance: Money,
    current_rate: Decimal,
    remaining_term_years: u32,
    remaining_term_months: u32,
    taxes: Money,
    insurance: Money,
    hoa: Money,
    new_rate: Decimal,
    snap_to_eighths: bool,
    new_term: NewTerm,
    custom_term_years: u32,
    closing_costs: ClosingCostsEntry,
    points: Decimal,
    roll_costs: bool,
    cash_out: Money,
    cash_in: Money,
    horizon_years: u32,
    config: CalculatorConfig,
}

impl Default for RefinanceForm {
    fn default() -> Self {
        Self::new(CalculatorConfig::default())
    }
}

impl RefinanceForm {
    /// A blank form (the `Empty` preset).
    pub fn new(config: CalculatorConfig) -> Self {
        Self {
            current_balance: Decimal::ZERO,
            current_rate: Decimal::ZERO,
            remaining_term_years: 0,
            remaining_term_months: 0,
            taxes: Decimal::ZERO,
            insurance: Decimal::ZERO,
            hoa: Decimal::ZERO,
            new_rate: Decimal::ZERO,
            snap_to_eighths: false,
            new_term: NewTerm::Thirty,
            custom_term_years: 0,
            closing_costs: ClosingCostsEntry::Unset,
            points: Decimal::ZERO,
            roll_costs: false,
            cash_out: Decimal::ZERO,
            cash_in: Decimal::ZERO,
            horizon_years: 5,
            config,
        }
    }

    pub fn apply_preset(&mut self, preset: RefinancePreset) {
        match preset {
            RefinancePreset::Sample => {
                self.current_balance = dec!(400000);
                self.current_rate = dec!(7);
                self.remaining_term_years = 26;
                self.remaining_term_months = 0;
                self.taxes = dec!(350);
                self.insurance = dec!(130);
                self.hoa = Decimal::ZERO;
                self.new_rate = dec!(6.167);
                self.snap_to_eighths = false;
                self.new_term = NewTerm::Thirty;
                self.custom_term_years = 30;
                self.points = Decimal::ZERO;
                self.roll_costs = true;
                self.cash_out = Decimal::ZERO;
                self.cash_in = Decimal::ZERO;
                self.horizon_years = 5;
            }
            RefinancePreset::Empty => {
                self.current_balance = Decimal::ZERO;
                self.current_rate = Decimal::ZERO;
                self.remaining_term_years = 0;
                self.remaining_term_months = 0;
                self.taxes = Decimal::ZERO;
                self.insurance = Decimal::ZERO;
                self.hoa = Decimal::ZERO;
                self.new_rate = Decimal::ZERO;
                self.snap_to_eighths = false;
                self.new_term = NewTerm::Thirty;
                self.custom_term_years = 0;
                self.points = Decimal::ZERO;
                self.roll_costs = false;
                self.cash_out = Decimal::ZERO;
                self.cash_in = Decimal::ZERO;
                self.horizon_years = 5;
            }
        }
        self.closing_costs = ClosingCostsEntry::Unset;
    }

    /// Back to a blank form; clears the closing-costs override.
    pub fn reset(&mut self) {
        self.apply_preset(RefinancePreset::Empty);
    }

    /// Store one field from raw text. Editing `ClosingCosts` marks it as
    /// overridden.
    pub fn set_field(&mut self, field: RefinanceField, raw: &str) {
        match field {
            RefinanceField::CurrentBalance => self.current_balance = parse_non_negative(raw),
            RefinanceField::CurrentRate => {
                self.current_rate = parse_clamped(raw, Decimal::ZERO, MAX_RATE_PERCENT)
            }
            RefinanceField::RemainingTermYears => {
                self.remaining_term_years = parse_whole_clamped(raw, 0, MAX_REMAINING_TERM_YEARS)
            }
            RefinanceField::RemainingTermMonths => {
                self.remaining_term_months = parse_whole_clamped(raw, 0, MAX_REMAINING_TERM_MONTHS)
            }
            RefinanceField::Taxes => self.taxes = parse_non_negative(raw),
            RefinanceField::Insurance => self.insurance = parse_non_negative(raw),
            RefinanceField::Hoa => self.hoa = parse_non_negative(raw),
            RefinanceField::NewRate => {
                self.new_rate = normalize_new_rate(parse_bounded_number(raw), self.snap_to_eighths)
            }
            RefinanceField::CustomTermYears => {
                self.custom_term_years =
                    parse_whole_clamped(raw, MIN_CUSTOM_TERM_YEARS, MAX_CUSTOM_TERM_YEARS)
            }
            RefinanceField::ClosingCosts => {
                self.closing_costs = ClosingCostsEntry::UserOverridden(parse_non_negative(raw))
            }
            RefinanceField::PointsPercent => self.points = parse_points_percent(raw),
            RefinanceField::CashOut => self.cash_out = parse_non_negative(raw),
            RefinanceField::CashIn => self.cash_in = parse_non_negative(raw),
            RefinanceField::HorizonYears => {
                self.horizon_years = parse_whole_clamped(raw, MIN_HORIZON_YEARS, MAX_HORIZON_YEARS)
            }
        }
    }

    /// Toggle eighth-point snapping. Applies to the next rate entry.
    pub fn set_snap_to_eighths(&mut self, snap: bool) {
        self.snap_to_eighths = snap;
    }

    pub fn set_new_term(&mut self, term: NewTerm) {
        self.new_term = term;
    }

    pub fn set_roll_costs(&mut self, roll: bool) {
        self.roll_costs = roll;
    }

    pub fn closing_costs_entry(&self) -> ClosingCostsEntry {
        self.closing_costs
    }

    pub fn new_rate(&self) -> Decimal {
        self.new_rate
    }

    /// Resolve the form into calculator inputs.
    pub fn to_inputs(&self) -> RefinanceInputs {
        RefinanceInputs {
            current_balance: self.current_balance,
            current_annual_rate_percent: self.current_rate,
            remaining_term_years: self.remaining_term_years,
            remaining_term_months: self.remaining_term_months,
            monthly_tax: self.taxes,
            monthly_insurance: self.insurance,
            monthly_hoa: self.hoa,
            new_annual_rate_percent: self.new_rate,
            new_term: self.new_term,
            custom_term_years: self.custom_term_years,
            closing_costs: match self.closing_costs {
                ClosingCostsEntry::Unset => None,
                ClosingCostsEntry::UserOverridden(amount) => Some(amount),
            },
            discount_points: self.points,
            roll_costs_into_loan: self.roll_costs,
            cash_out: self.cash_out,
            cash_in: self.cash_in,
            horizon_years: self.horizon_years,
        }
    }

    /// The value the closing-costs field shows: the override if any,
    /// otherwise the default for the current base loan.
    pub fn displayed_closing_costs(&self) -> Money {
        match self.closing_costs {
            ClosingCostsEntry::UserOverridden(amount) => amount,
            ClosingCostsEntry::Unset => default_closing_costs(
                self.to_inputs().base_new_loan(),
                self.config.default_closing_cost_rate,
            ),
        }
    }

    pub fn calculate(&self) -> RefinanceResult {
        evaluate_with_config(&self.to_inputs(), &self.config)
    }
}
