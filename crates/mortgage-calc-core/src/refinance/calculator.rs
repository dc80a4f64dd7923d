//! Refinance comparison: current loan vs. a proposed replacement.
//!
//! Computes old and new all-in monthly payments (P&I plus escrow), monthly
//! and annual savings, the break-even month on refinance costs, and a
//! cumulative cost comparison over a bounded horizon. Every field is
//! recomputed from the inputs on each call.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use crate::amortization::{monthly_payment, monthly_rate, total_interest};
use crate::config::{
    CalculatorConfig, MAX_CUSTOM_TERM_YEARS, MAX_HORIZON_YEARS, MAX_NEW_RATE_PERCENT,
    MAX_REMAINING_TERM_MONTHS, MAX_REMAINING_TERM_YEARS, MIN_CUSTOM_TERM_YEARS, MONTHS_PER_YEAR,
};
use crate::normalize::{clamp_amount, clamp_rate_percent};
use crate::types::{with_metadata, ComputationOutput, Money, MonthlyEscrow, Rate};
use crate::CalcResult;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Term of the proposed loan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NewTerm {
    #[serde(rename = "15")]
    Fifteen,
    #[default]
    #[serde(rename = "30")]
    Thirty,
    #[serde(rename = "custom")]
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinanceInputs {
    // -- Current loan --------------------------------------------------------
    pub current_balance: Money,
    /// Current note rate in percent.
    pub current_annual_rate_percent: Decimal,
    pub remaining_term_years: u32,
    pub remaining_term_months: u32,
    pub monthly_tax: Money,
    pub monthly_insurance: Money,
    pub monthly_hoa: Money,
    // -- Proposed loan -------------------------------------------------------
    /// Proposed note rate in percent.
    pub new_annual_rate_percent: Decimal,
    pub new_term: NewTerm,
    /// Only read when `new_term` is `Custom`.
    pub custom_term_years: u32,
    /// `None` uses the default of `default_closing_cost_rate` on the base loan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closing_costs: Option<Money>,
    /// Discount points as a fraction of the base loan (0.01 = one point).
    pub discount_points: Rate,
    pub roll_costs_into_loan: bool,
    pub cash_out: Money,
    pub cash_in: Money,
    pub horizon_years: u32,
}

impl RefinanceInputs {
    /// Clamp every field into the calculator's domain.
    pub fn normalized(&self) -> Self {
        Self {
            current_balance: clamp_amount(self.current_balance),
            current_annual_rate_percent: clamp_rate_percent(self.current_annual_rate_percent),
            remaining_term_years: self.remaining_term_years.min(MAX_REMAINING_TERM_YEARS),
            remaining_term_months: self.remaining_term_months.min(MAX_REMAINING_TERM_MONTHS),
            monthly_tax: clamp_amount(self.monthly_tax),
            monthly_insurance: clamp_amount(self.monthly_insurance),
            monthly_hoa: clamp_amount(self.monthly_hoa),
            new_annual_rate_percent: self
                .new_annual_rate_percent
                .clamp(Decimal::ZERO, MAX_NEW_RATE_PERCENT),
            new_term: self.new_term,
            custom_term_years: self
                .custom_term_years
                .clamp(MIN_CUSTOM_TERM_YEARS, MAX_CUSTOM_TERM_YEARS),
            closing_costs: self.closing_costs.map(clamp_amount),
            discount_points: self.discount_points.clamp(Decimal::ZERO, Decimal::ONE),
            roll_costs_into_loan: self.roll_costs_into_loan,
            cash_out: clamp_amount(self.cash_out),
            cash_in: clamp_amount(self.cash_in),
            horizon_years: self.horizon_years.min(MAX_HORIZON_YEARS),
        }
    }

    pub fn escrow(&self) -> MonthlyEscrow {
        MonthlyEscrow::new(self.monthly_tax, self.monthly_insurance, self.monthly_hoa)
    }

    /// Months left on the current loan.
    pub fn months_remaining(&self) -> u32 {
        self.remaining_term_years.min(MAX_REMAINING_TERM_YEARS) * MONTHS_PER_YEAR
            + self.remaining_term_months.min(MAX_REMAINING_TERM_MONTHS)
    }

    /// Term of the proposed loan in whole years.
    pub fn effective_term_years(&self) -> u32 {
        match self.new_term {
            NewTerm::Fifteen => 15,
            NewTerm::Thirty => 30,
            NewTerm::Custom => self
                .custom_term_years
                .clamp(MIN_CUSTOM_TERM_YEARS, MAX_CUSTOM_TERM_YEARS),
        }
    }

    /// Balance plus cash-out minus cash-in, before any financed costs.
    pub fn base_new_loan(&self) -> Money {
        (self.current_balance + self.cash_out - self.cash_in).max(Decimal::ZERO)
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Months of savings needed to recoup refinance costs. `NoSavings` stands in
/// for an infinite break-even.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakEven {
    Months(u32),
    NoSavings,
}

impl BreakEven {
    pub fn months(&self) -> Option<u32> {
        match self {
            Self::Months(m) => Some(*m),
            Self::NoSavings => None,
        }
    }

    pub fn is_finite(&self) -> bool {
        matches!(self, Self::Months(_))
    }
}

/// Cumulative cost of each loan over the first `horizon_months`, each capped
/// at its own remaining term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HorizonComparison {
    pub horizon_months: u32,
    pub old_horizon_months: u32,
    pub new_horizon_months: u32,
    pub old_total_over_horizon: Money,
    pub new_total_over_horizon: Money,
    pub horizon_savings: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinanceResult {
    // Current loan
    pub months_remaining: u32,
    pub old_principal_interest: Money,
    pub old_total_payment: Money,
    pub old_interest_remaining: Money,
    // Proposed loan
    pub base_new_loan: Money,
    pub points_amount: Money,
    pub closing_costs: Money,
    pub financed_costs: Money,
    pub new_loan_amount: Money,
    pub effective_term_years: u32,
    pub new_principal_interest: Money,
    pub new_total_payment: Money,
    pub new_total_interest: Money,
    // Comparison
    pub monthly_escrow: Money,
    pub monthly_savings: Money,
    pub annual_savings: Money,
    pub total_refi_costs: Money,
    pub break_even: BreakEven,
    pub horizon: HorizonComparison,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Closing costs assumed on a base loan: `round(base * rate)` to whole dollars.
pub fn default_closing_costs(base_new_loan: Money, rate: Rate) -> Money {
    (base_new_loan * rate).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Evaluate a refinance with the shipping configuration.
pub fn evaluate(inputs: &RefinanceInputs) -> RefinanceResult {
    evaluate_with_config(inputs, &CalculatorConfig::default())
}

/// Evaluate a refinance. Total over any input; denominators are clamped to at
/// least one month.
pub fn evaluate_with_config(inputs: &RefinanceInputs, config: &CalculatorConfig) -> RefinanceResult {
    let inputs = inputs.normalized();
    let escrow = inputs.escrow().total();

    // -- Current loan ---------------------------------------------------------
    let months_remaining = inputs.months_remaining();
    let old_term = months_remaining.max(1);
    let old_principal_interest = monthly_payment(
        inputs.current_balance,
        monthly_rate(inputs.current_annual_rate_percent),
        old_term,
    );
    let old_total_payment = old_principal_interest + escrow;
    let old_interest_remaining =
        total_interest(old_principal_interest, old_term, inputs.current_balance);

    // -- Proposed loan --------------------------------------------------------
    let base_new_loan = inputs.base_new_loan();
    let points_amount = base_new_loan * inputs.discount_points;
    let closing_costs = inputs
        .closing_costs
        .unwrap_or_else(|| default_closing_costs(base_new_loan, config.default_closing_cost_rate));
    let financed_costs = if inputs.roll_costs_into_loan {
        closing_costs + points_amount
    } else {
        Decimal::ZERO
    };
    let new_loan_amount = base_new_loan + financed_costs;

    let effective_term_years = inputs.effective_term_years();
    let new_term_months = effective_term_years * MONTHS_PER_YEAR;
    let new_term = new_term_months.max(1);
    let new_principal_interest = monthly_payment(
        new_loan_amount,
        monthly_rate(inputs.new_annual_rate_percent),
        new_term,
    );
    let new_total_payment = new_principal_interest + escrow;
    let new_total_interest = total_interest(new_principal_interest, new_term, new_loan_amount);

    // -- Savings and break-even -----------------------------------------------
    let monthly_savings = old_total_payment - new_total_payment;
    let annual_savings = monthly_savings * Decimal::from(MONTHS_PER_YEAR);
    let total_refi_costs = closing_costs + points_amount;
    let break_even = break_even_months(total_refi_costs, monthly_savings);

    // -- Horizon --------------------------------------------------------------
    let horizon_months = (inputs.horizon_years * MONTHS_PER_YEAR).max(1);
    let old_horizon_months = horizon_months.min(months_remaining);
    let new_horizon_months = horizon_months.min(new_term_months);
    let old_total_over_horizon = old_total_payment * Decimal::from(old_horizon_months);
    let upfront_costs = if inputs.roll_costs_into_loan {
        Decimal::ZERO
    } else {
        total_refi_costs
    };
    let new_total_over_horizon =
        new_total_payment * Decimal::from(new_horizon_months) + upfront_costs;

    let horizon = HorizonComparison {
        horizon_months,
        old_horizon_months,
        new_horizon_months,
        old_total_over_horizon,
        new_total_over_horizon,
        horizon_savings: old_total_over_horizon - new_total_over_horizon,
    };

    debug!(
        old_total_payment = %old_total_payment,
        new_total_payment = %new_total_payment,
        monthly_savings = %monthly_savings,
        break_even = ?break_even,
        horizon_savings = %horizon.horizon_savings,
        "refinance evaluated"
    );

    RefinanceResult {
        months_remaining,
        old_principal_interest,
        old_total_payment,
        old_interest_remaining,
        base_new_loan,
        points_amount,
        closing_costs,
        financed_costs,
        new_loan_amount,
        effective_term_years,
        new_principal_interest,
        new_total_payment,
        new_total_interest,
        monthly_escrow: escrow,
        monthly_savings,
        annual_savings,
        total_refi_costs,
        break_even,
        horizon,
    }
}

/// `ceil(costs / savings)` when savings are positive. Savings too small for
/// the month count to be represented are treated as no savings.
fn break_even_months(total_refi_costs: Money, monthly_savings: Money) -> BreakEven {
    if monthly_savings <= Decimal::ZERO {
        return BreakEven::NoSavings;
    }
    match total_refi_costs
        .checked_div(monthly_savings)
        .and_then(|months| months.ceil().to_u32())
    {
        Some(months) => BreakEven::Months(months),
        None => {
            warn!(monthly_savings = %monthly_savings, "break-even beyond representable range");
            BreakEven::NoSavings
        }
    }
}

/// Evaluate a refinance and wrap the result in the standard output envelope.
pub fn analyze_refinance(
    inputs: &RefinanceInputs,
    config: &CalculatorConfig,
) -> CalcResult<ComputationOutput<RefinanceResult>> {
    let start = Instant::now();
    config.validate()?;

    let result = evaluate_with_config(inputs, config);
    let mut warnings: Vec<String> = Vec::new();

    if !result.break_even.is_finite() {
        warnings.push("New payment is not lower than the current payment; no break-even.".into());
    }
    if result.horizon.horizon_savings < Decimal::ZERO {
        warnings.push(format!(
            "Refinancing costs more than keeping the current loan over {} months.",
            result.horizon.horizon_months
        ));
    }
    if inputs.cash_out > Decimal::ZERO {
        warnings.push(format!(
            "Cash-out of {} is added to the new loan balance.",
            inputs.cash_out.round_dp(2)
        ));
    }
    if inputs.cash_in > inputs.current_balance + inputs.cash_out {
        warnings.push("Cash-in exceeds the balance being refinanced; base loan floored at 0.".into());
    }
    if result.months_remaining == 0 {
        warnings.push("No term remaining on the current loan; treated as one month.".into());
    }

    let assumptions = serde_json::json!({
        "closing_costs_source": if inputs.closing_costs.is_some() { "entered" } else { "default" },
        "default_closing_cost_rate": config.default_closing_cost_rate,
        "costs_financed": inputs.roll_costs_into_loan,
        "escrow_unchanged": "taxes, insurance and HOA carry over to the new loan",
        "points_basis": "fraction of base new loan",
    });

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Refinance comparison (PITIA, break-even, horizon)",
        &assumptions,
        warnings,
        elapsed,
        result,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> RefinanceInputs {
        RefinanceInputs {
            current_balance: dec!(400000),
            current_annual_rate_percent: dec!(7),
            remaining_term_years: 26,
            remaining_term_months: 0,
            monthly_tax: dec!(350),
            monthly_insurance: dec!(130),
            monthly_hoa: Decimal::ZERO,
            new_annual_rate_percent: dec!(6.167),
            new_term: NewTerm::Thirty,
            custom_term_years: 30,
            closing_costs: None,
            discount_points: Decimal::ZERO,
            roll_costs_into_loan: true,
            cash_out: Decimal::ZERO,
            cash_in: Decimal::ZERO,
            horizon_years: 5,
        }
    }

    #[test]
    fn test_default_closing_costs_rounded() {
        assert_eq!(default_closing_costs(dec!(400000), dec!(0.015)), dec!(6000));
        assert_eq!(default_closing_costs(dec!(100033), dec!(0.015)), dec!(1500));
        // 1501.5 rounds up
        assert_eq!(default_closing_costs(dec!(100100), dec!(0.015)), dec!(1502));
    }

    #[test]
    fn test_sample_scenario_structure() {
        let r = evaluate(&sample());
        assert_eq!(r.months_remaining, 312);
        assert_eq!(r.base_new_loan, dec!(400000));
        assert_eq!(r.closing_costs, dec!(6000));
        assert_eq!(r.financed_costs, dec!(6000));
        assert_eq!(r.new_loan_amount, dec!(406000));
        assert_eq!(r.effective_term_years, 30);
        assert_eq!(r.monthly_escrow, dec!(480));
        assert_eq!(r.old_total_payment, r.old_principal_interest + dec!(480));
        assert_eq!(r.new_total_payment, r.new_principal_interest + dec!(480));
        assert_eq!(r.annual_savings, r.monthly_savings * dec!(12));
        assert_eq!(r.total_refi_costs, dec!(6000));
    }

    #[test]
    fn test_sample_scenario_saves_money() {
        let r = evaluate(&sample());
        assert!(r.monthly_savings > Decimal::ZERO, "savings {}", r.monthly_savings);
        let months = r.break_even.months().unwrap();
        let expected = (dec!(6000) / r.monthly_savings).ceil().to_u32().unwrap();
        assert_eq!(months, expected);
    }

    #[test]
    fn test_no_savings_is_sentinel() {
        let inputs = RefinanceInputs {
            new_annual_rate_percent: dec!(9),
            ..sample()
        };
        let r = evaluate(&inputs);
        assert!(r.monthly_savings < Decimal::ZERO);
        assert_eq!(r.break_even, BreakEven::NoSavings);
    }

    #[test]
    fn test_zero_savings_is_sentinel() {
        assert_eq!(break_even_months(dec!(5000), Decimal::ZERO), BreakEven::NoSavings);
        assert_eq!(break_even_months(dec!(5000), dec!(100)), BreakEven::Months(50));
        assert_eq!(break_even_months(dec!(5001), dec!(100)), BreakEven::Months(51));
        assert_eq!(break_even_months(Decimal::ZERO, dec!(100)), BreakEven::Months(0));
    }

    #[test]
    fn test_break_even_past_u32_is_sentinel() {
        // 1e12 / 1e-7 = 1e19 months
        assert_eq!(
            break_even_months(dec!(1_000_000_000_000), dec!(0.0000001)),
            BreakEven::NoSavings
        );
        assert_eq!(
            break_even_months(Decimal::from(u32::MAX), Decimal::ONE),
            BreakEven::Months(u32::MAX)
        );
    }

    #[test]
    fn test_costs_paid_in_cash_hit_horizon() {
        let inputs = RefinanceInputs {
            roll_costs_into_loan: false,
            ..sample()
        };
        let r = evaluate(&inputs);
        assert_eq!(r.financed_costs, Decimal::ZERO);
        assert_eq!(r.new_loan_amount, dec!(400000));
        assert_eq!(
            r.horizon.new_total_over_horizon,
            r.new_total_payment * dec!(60) + dec!(6000)
        );
    }

    #[test]
    fn test_points_and_override() {
        let inputs = RefinanceInputs {
            closing_costs: Some(dec!(3000)),
            discount_points: dec!(0.01),
            ..sample()
        };
        let r = evaluate(&inputs);
        assert_eq!(r.points_amount, dec!(4000));
        assert_eq!(r.closing_costs, dec!(3000));
        assert_eq!(r.total_refi_costs, dec!(7000));
        assert_eq!(r.new_loan_amount, dec!(407000));
    }

    #[test]
    fn test_cash_out_and_in() {
        let inputs = RefinanceInputs {
            cash_out: dec!(50000),
            cash_in: dec!(10000),
            roll_costs_into_loan: false,
            ..sample()
        };
        assert_eq!(evaluate(&inputs).base_new_loan, dec!(440000));

        let inputs = RefinanceInputs {
            cash_in: dec!(500000),
            ..sample()
        };
        let r = evaluate(&inputs);
        assert_eq!(r.base_new_loan, Decimal::ZERO);
        assert_eq!(r.new_principal_interest, Decimal::ZERO);
    }

    #[test]
    fn test_custom_term_clamped() {
        let inputs = RefinanceInputs {
            new_term: NewTerm::Custom,
            custom_term_years: 55,
            ..sample()
        };
        assert_eq!(evaluate(&inputs).effective_term_years, 40);

        let inputs = RefinanceInputs {
            new_term: NewTerm::Custom,
            custom_term_years: 0,
            ..sample()
        };
        assert_eq!(evaluate(&inputs).effective_term_years, 1);

        let inputs = RefinanceInputs {
            new_term: NewTerm::Fifteen,
            custom_term_years: 0,
            ..sample()
        };
        assert_eq!(evaluate(&inputs).effective_term_years, 15);
    }

    #[test]
    fn test_horizon_capped_by_remaining_term() {
        let inputs = RefinanceInputs {
            remaining_term_years: 2,
            remaining_term_months: 6,
            horizon_years: 5,
            ..sample()
        };
        let r = evaluate(&inputs);
        assert_eq!(r.horizon.horizon_months, 60);
        assert_eq!(r.horizon.old_horizon_months, 30);
        assert_eq!(r.horizon.new_horizon_months, 60);
    }

    #[test]
    fn test_zero_horizon_is_one_month() {
        let inputs = RefinanceInputs {
            horizon_years: 0,
            ..sample()
        };
        assert_eq!(evaluate(&inputs).horizon.horizon_months, 1);
    }

    #[test]
    fn test_no_remaining_term() {
        let inputs = RefinanceInputs {
            remaining_term_years: 0,
            remaining_term_months: 0,
            ..sample()
        };
        let r = evaluate(&inputs);
        assert_eq!(r.months_remaining, 0);
        assert_eq!(r.horizon.old_horizon_months, 0);
        assert_eq!(r.horizon.old_total_over_horizon, Decimal::ZERO);
        // one-month payoff: balance * (1 + r)
        assert!(r.old_principal_interest > dec!(400000));
    }

    #[test]
    fn test_zero_rate_new_loan() {
        let inputs = RefinanceInputs {
            new_annual_rate_percent: Decimal::ZERO,
            closing_costs: Some(Decimal::ZERO),
            new_term: NewTerm::Custom,
            custom_term_years: 10,
            current_balance: dec!(120000),
            ..sample()
        };
        let r = evaluate(&inputs);
        assert_eq!(r.new_principal_interest, dec!(1000));
        assert_eq!(r.new_total_interest, Decimal::ZERO);
    }

    #[test]
    fn test_deserialize_term_labels() {
        let t: NewTerm = serde_json::from_str(r#""15""#).unwrap();
        assert_eq!(t, NewTerm::Fifteen);
        let t: NewTerm = serde_json::from_str(r#""custom""#).unwrap();
        assert_eq!(t, NewTerm::Custom);
        assert_eq!(
            serde_json::to_string(&BreakEven::NoSavings).unwrap(),
            r#""no_savings""#
        );
        assert_eq!(
            serde_json::to_string(&BreakEven::Months(14)).unwrap(),
            r#"{"months":14}"#
        );
    }

    #[test]
    fn test_analyze_warnings() {
        let inputs = RefinanceInputs {
            new_annual_rate_percent: dec!(9),
            ..sample()
        };
        let out = analyze_refinance(&inputs, &CalculatorConfig::default()).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("no break-even")));
        assert_eq!(out.assumptions["closing_costs_source"], "default");
    }
}
