use mortgage_calc_core::amortization::monthly_payment;
use mortgage_calc_core::config::CalculatorConfig;
use mortgage_calc_core::presentation;
use mortgage_calc_core::refinance::{
    self, BreakEven, NewTerm, RefinanceField, RefinanceForm, RefinanceInputs, RefinancePreset,
};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn sample() -> RefinanceInputs {
    let mut form = RefinanceForm::default();
    form.apply_preset(RefinancePreset::Sample);
    form.to_inputs()
}

// ===========================================================================
// Payment primitive
// ===========================================================================

#[test]
fn test_payment_primitive_reference_values() {
    assert_eq!(monthly_payment(dec!(120000), Decimal::ZERO, 120), dec!(1000));
    let pmt = monthly_payment(dec!(300000), dec!(0.07) / dec!(12), 360);
    assert!((pmt - dec!(1995.91)).abs() < dec!(0.005), "got {pmt}");
}

// ===========================================================================
// Sample scenario
// ===========================================================================

#[test]
fn test_sample_scenario_figures() {
    let r = refinance::evaluate(&sample());

    // 400k at 7% over 312 months
    let old_pi = monthly_payment(dec!(400000), dec!(7) / dec!(100) / dec!(12), 312);
    assert_eq!(r.old_principal_interest, old_pi);
    assert_eq!(r.old_interest_remaining, old_pi * dec!(312) - dec!(400000));

    // 406k (400k + 6k financed closing costs) at 6.167% over 360 months
    let new_pi = monthly_payment(dec!(406000), dec!(6.167) / dec!(100) / dec!(12), 360);
    assert_eq!(r.new_principal_interest, new_pi);
    assert_eq!(r.new_total_interest, new_pi * dec!(360) - dec!(406000));

    assert_eq!(r.monthly_savings, (old_pi + dec!(480)) - (new_pi + dec!(480)));
    assert_eq!(r.horizon.old_total_over_horizon, r.old_total_payment * dec!(60));
    assert_eq!(r.horizon.new_total_over_horizon, r.new_total_payment * dec!(60));
    assert_eq!(
        r.horizon.horizon_savings,
        r.horizon.old_total_over_horizon - r.horizon.new_total_over_horizon
    );
    assert_eq!(presentation::term_left_label(r.months_remaining), "26y 0m");
}

#[test]
fn test_break_even_label_matches_result() {
    let r = refinance::evaluate(&sample());
    let months = r.break_even.months().expect("sample refinance saves money");
    assert_eq!(presentation::break_even_label(r.break_even), format!("{months} months"));
}

#[test]
fn test_higher_rate_has_no_break_even() {
    let inputs = RefinanceInputs {
        new_annual_rate_percent: dec!(8.5),
        ..sample()
    };
    let r = refinance::evaluate(&inputs);
    assert!(r.monthly_savings <= Decimal::ZERO);
    assert_eq!(r.break_even, BreakEven::NoSavings);
    assert_eq!(presentation::break_even_label(r.break_even), "No savings");
}

#[test]
fn test_identical_loan_without_costs_saves_nothing() {
    // Same rate, same remaining term, no costs: payments match exactly
    let inputs = RefinanceInputs {
        remaining_term_years: 30,
        new_annual_rate_percent: dec!(7),
        closing_costs: Some(Decimal::ZERO),
        ..sample()
    };
    let r = refinance::evaluate(&inputs);
    assert_eq!(r.monthly_savings, Decimal::ZERO);
    assert_eq!(r.break_even, BreakEven::NoSavings);
}

#[test]
fn test_shorter_term_horizon() {
    let inputs = RefinanceInputs {
        new_term: NewTerm::Fifteen,
        horizon_years: 20,
        ..sample()
    };
    let r = refinance::evaluate(&inputs);
    assert_eq!(r.horizon.horizon_months, 240);
    assert_eq!(r.horizon.new_horizon_months, 180);
    assert_eq!(r.horizon.old_horizon_months, 240);
}

#[test]
fn test_config_changes_default_closing_rate() {
    let config = CalculatorConfig {
        default_closing_cost_rate: dec!(0.02),
        ..Default::default()
    };
    let r = refinance::evaluate_with_config(&sample(), &config);
    assert_eq!(r.closing_costs, dec!(8000));
}

// ===========================================================================
// Form-driven flow
// ===========================================================================

#[test]
fn test_form_flow_matches_direct_inputs() {
    let mut form = RefinanceForm::default();
    form.set_field(RefinanceField::CurrentBalance, "$400,000");
    form.set_field(RefinanceField::CurrentRate, "7");
    form.set_field(RefinanceField::RemainingTermYears, "26");
    form.set_field(RefinanceField::Taxes, "350");
    form.set_field(RefinanceField::Insurance, "130");
    form.set_field(RefinanceField::NewRate, "6.167");
    form.set_roll_costs(true);

    assert_eq!(form.calculate(), refinance::evaluate(&sample()));
}

#[test]
fn test_inputs_round_trip_through_json() {
    let inputs = sample();
    let json = serde_json::to_string(&inputs).unwrap();
    assert!(!json.contains("closing_costs"));
    let back: RefinanceInputs = serde_json::from_str(&json).unwrap();
    assert_eq!(back, inputs);
}
