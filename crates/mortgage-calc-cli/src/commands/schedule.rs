use clap::Args;
use serde_json::{json, Value};

use mortgage_calc_core::amortization::{
    amortization_schedule, monthly_payment, monthly_rate, total_interest,
};
use mortgage_calc_core::config::{MAX_RATE_PERCENT, MAX_TERM_MONTHS};
use mortgage_calc_core::normalize::{parse_clamped, parse_non_negative, parse_whole_clamped};
use mortgage_calc_core::CalcError;
use rust_decimal::Decimal;

#[derive(Args)]
pub struct ScheduleArgs {
    /// Loan principal
    #[arg(long)]
    pub principal: String,

    /// Annual rate in percent
    #[arg(long)]
    pub rate: String,

    /// Term in months
    #[arg(long)]
    pub term_months: String,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let principal = parse_non_negative(&args.principal);
    let rate_percent = parse_clamped(&args.rate, Decimal::ZERO, MAX_RATE_PERCENT);
    let term_months = parse_whole_clamped(&args.term_months, 0, MAX_TERM_MONTHS);

    if principal.is_zero() || term_months == 0 {
        return Err(Box::new(CalcError::InvalidInput {
            field: "principal / term_months".into(),
            reason: "A schedule needs a positive principal and at least one month.".into(),
        }));
    }

    let r = monthly_rate(rate_percent);
    let payment = monthly_payment(principal, r, term_months);
    let rows = amortization_schedule(principal, r, term_months)?;

    Ok(json!({
        "result": {
            "principal": principal,
            "annual_rate_percent": rate_percent,
            "term_months": term_months,
            "monthly_payment": payment,
            "total_interest": total_interest(payment, term_months, principal),
        },
        "methodology": "Level-payment amortization",
        "schedule": rows,
    }))
}
