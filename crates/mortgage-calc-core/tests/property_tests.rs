use mortgage_calc_core::config::{
    CalculatorConfig, DscrTierBreakpoints, TermResetPolicy, MAX_AMOUNT, MAX_RATE_PERCENT,
    MAX_TERM_MONTHS,
};
use mortgage_calc_core::dscr::{self, LoanInputs, PaymentType};
use mortgage_calc_core::normalize::parse_bounded_number;
use mortgage_calc_core::refinance::{self, BreakEven, NewTerm, RefinanceInputs};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Money across the whole clamped domain: everyday amounts in cents, whole
/// dollars up to one trillion, and the bound itself.
fn money() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        4 => (0i64..1_000_000_000).prop_map(|cents| Decimal::new(cents, 2)),
        2 => (0i64..=1_000_000_000_000).prop_map(Decimal::from),
        1 => Just(MAX_AMOUNT),
    ]
}

/// Rate in thousandths of a percent, 0..=40%, with the cap drawn often.
fn rate_percent() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        4 => (0i64..=40_000).prop_map(|milli| Decimal::new(milli, 3)),
        1 => Just(MAX_RATE_PERCENT),
    ]
}

/// Configurations that pass `validate`.
fn valid_config() -> impl Strategy<Value = CalculatorConfig> {
    (
        1u32..=MAX_TERM_MONTHS,
        0u32..=100,
        (0i64..=100, 1i64..=100, 1i64..=100),
        0i64..=1000,
        any::<bool>(),
    )
        .prop_map(|(term, io_pct, (min, gap1, gap2), closing_milli, preserve)| {
            let specialty_min = Decimal::new(min, 2);
            let standard = specialty_min + Decimal::new(gap1, 2);
            CalculatorConfig {
                dscr_amortization_term_months: term,
                dscr_interest_only_term_months: term * io_pct / 100,
                dscr_tiers: DscrTierBreakpoints {
                    excellent: standard + Decimal::new(gap2, 2),
                    standard,
                    specialty_min,
                },
                default_closing_cost_rate: Decimal::new(closing_milli, 3),
                term_reset_policy: if preserve {
                    TermResetPolicy::PreserveUserTerms
                } else {
                    TermResetPolicy::ResetOnPaymentTypeChange
                },
            }
        })
}

fn max_loan_inputs(payment_type: PaymentType) -> LoanInputs {
    LoanInputs {
        gross_monthly_rent: MAX_AMOUNT,
        monthly_tax: MAX_AMOUNT,
        monthly_insurance: MAX_AMOUNT,
        monthly_hoa: MAX_AMOUNT,
        loan_amount: MAX_AMOUNT,
        annual_rate_percent: MAX_RATE_PERCENT,
        payment_type,
        amortization_term_months: MAX_TERM_MONTHS,
        interest_only_term_months: MAX_TERM_MONTHS,
    }
}

fn max_refinance_inputs(roll_costs_into_loan: bool) -> RefinanceInputs {
    RefinanceInputs {
        current_balance: MAX_AMOUNT,
        current_annual_rate_percent: MAX_RATE_PERCENT,
        remaining_term_years: 60,
        remaining_term_months: 11,
        monthly_tax: MAX_AMOUNT,
        monthly_insurance: MAX_AMOUNT,
        monthly_hoa: MAX_AMOUNT,
        new_annual_rate_percent: Decimal::from(15),
        new_term: NewTerm::Custom,
        custom_term_years: 40,
        closing_costs: Some(MAX_AMOUNT),
        discount_points: Decimal::ONE,
        roll_costs_into_loan,
        cash_out: MAX_AMOUNT,
        cash_in: Decimal::ZERO,
        horizon_years: 40,
    }
}

#[test]
fn dscr_evaluates_at_domain_ceiling() {
    let config = CalculatorConfig {
        dscr_amortization_term_months: MAX_TERM_MONTHS,
        ..Default::default()
    };
    for payment_type in [PaymentType::Amortized, PaymentType::InterestOnly] {
        let out = dscr::analyze_dscr(&max_loan_inputs(payment_type), &config)
            .expect("ceiling config is valid");
        assert!(out.result.selected_payment > Decimal::ZERO);
        assert!(out.result.dscr_ratio > Decimal::ZERO);
    }
}

#[test]
fn refinance_evaluates_at_domain_ceiling() {
    for roll in [true, false] {
        let inputs = max_refinance_inputs(roll);
        let out = refinance::analyze_refinance(&inputs, &CalculatorConfig::default())
            .expect("default config is valid");
        let r = &out.result;
        assert_eq!(r.months_remaining, MAX_TERM_MONTHS);
        assert_eq!(r.horizon.horizon_months, 480);
        if roll {
            // Financing 3e12 of costs makes the new payment far larger
            assert_eq!(r.break_even, BreakEven::NoSavings);
            assert!(r.horizon.horizon_savings < Decimal::ZERO);
        } else {
            assert!(r.break_even.is_finite());
        }
    }
}

fn loan_inputs() -> impl Strategy<Value = LoanInputs> {
    (
        money(),
        money(),
        money(),
        money(),
        money(),
        rate_percent(),
        any::<bool>(),
    )
        .prop_map(|(rent, tax, ins, hoa, loan, rate, amortized)| LoanInputs {
            gross_monthly_rent: rent,
            monthly_tax: tax,
            monthly_insurance: ins,
            monthly_hoa: hoa,
            loan_amount: loan,
            annual_rate_percent: rate,
            payment_type: if amortized {
                PaymentType::Amortized
            } else {
                PaymentType::InterestOnly
            },
            amortization_term_months: 360,
            interest_only_term_months: 120,
        })
}

fn refinance_inputs() -> impl Strategy<Value = RefinanceInputs> {
    (
        (money(), rate_percent(), 0u32..=70, 0u32..=15, money(), money(), money()),
        (
            rate_percent(),
            prop_oneof![Just(NewTerm::Fifteen), Just(NewTerm::Thirty), Just(NewTerm::Custom)],
            0u32..=50,
            proptest::option::of(money()),
            (0i64..=500).prop_map(|bp| Decimal::new(bp, 4)),
            any::<bool>(),
            money(),
            money(),
            0u32..=45,
        ),
    )
        .prop_map(
            |(
                (balance, rate, years, months, tax, ins, hoa),
                (new_rate, term, custom, closing, points, roll, cash_out, cash_in, horizon),
            )| RefinanceInputs {
                current_balance: balance,
                current_annual_rate_percent: rate,
                remaining_term_years: years,
                remaining_term_months: months,
                monthly_tax: tax,
                monthly_insurance: ins,
                monthly_hoa: hoa,
                new_annual_rate_percent: new_rate,
                new_term: term,
                custom_term_years: custom,
                closing_costs: closing,
                discount_points: points,
                roll_costs_into_loan: roll,
                cash_out,
                cash_in,
                horizon_years: horizon,
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn dscr_is_total_and_idempotent(inputs in loan_inputs()) {
        let first = dscr::evaluate(&inputs);
        let second = dscr::evaluate(&inputs);
        prop_assert_eq!(&first, &second);
        prop_assert!(first.dscr_ratio >= Decimal::ZERO);
        if first.selected_payment.is_zero() {
            prop_assert_eq!(first.dscr_ratio, Decimal::ZERO);
        }
    }

    #[test]
    fn dscr_tier_is_monotone(a in 0i64..300, b in 0i64..300) {
        let tiers = DscrTierBreakpoints::default();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        // Tier enum is declared best-first, so a higher ratio never yields a later variant
        let t_lo = dscr::qualification_tier(Decimal::new(lo, 2), &tiers) as u8;
        let t_hi = dscr::qualification_tier(Decimal::new(hi, 2), &tiers) as u8;
        prop_assert!(t_hi <= t_lo);
    }

    #[test]
    fn refinance_is_total_and_idempotent(inputs in refinance_inputs()) {
        let first = refinance::evaluate(&inputs);
        let second = refinance::evaluate(&inputs);
        prop_assert_eq!(&first, &second);
    }

    #[test]
    fn refinance_horizon_is_clamped(inputs in refinance_inputs()) {
        let r = refinance::evaluate(&inputs);
        let h = &r.horizon;
        prop_assert!(h.horizon_months >= 1);
        prop_assert!(h.old_horizon_months <= h.horizon_months);
        prop_assert!(h.new_horizon_months <= h.horizon_months);
        prop_assert!(h.old_horizon_months <= r.months_remaining);
        prop_assert!(h.new_horizon_months <= r.effective_term_years * 12);
    }

    #[test]
    fn refinance_break_even_sentinel(inputs in refinance_inputs()) {
        let r = refinance::evaluate(&inputs);
        if r.monthly_savings <= Decimal::ZERO {
            prop_assert_eq!(r.break_even, BreakEven::NoSavings);
        } else if let BreakEven::Months(m) = r.break_even {
            prop_assert!(r.total_refi_costs.is_zero() || m >= 1);
        }
    }

    #[test]
    fn calculators_are_total_under_any_valid_config(
        config in valid_config(),
        loan in loan_inputs(),
        refi in refinance_inputs(),
    ) {
        prop_assert!(config.validate().is_ok());
        let dscr_out = dscr::analyze_dscr(&loan, &config);
        prop_assert!(dscr_out.is_ok());
        let refi_out = refinance::analyze_refinance(&refi, &config);
        prop_assert!(refi_out.is_ok());
    }

    #[test]
    fn parser_never_panics(raw in ".{0,40}") {
        let value = parse_bounded_number(&raw);
        prop_assert!(value.abs() <= mortgage_calc_core::config::MAX_AMOUNT);
    }
}
