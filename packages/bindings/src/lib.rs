use std::str::FromStr;

use mortgage_calc_core::amortization::{
    amortization_schedule as schedule_rows, monthly_payment, monthly_rate, total_interest,
    ScheduleRow,
};
use mortgage_calc_core::config::MAX_RATE_PERCENT;
use mortgage_calc_core::normalize::{clamp_amount, parse_bounded_number as normalize_number};
use mortgage_calc_core::presentation;
use mortgage_calc_core::{dscr, refinance, CalculatorConfig, Money};
use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Defaults when the caller passes no config document.
fn parse_config(config_json: Option<String>) -> NapiResult<CalculatorConfig> {
    match config_json {
        Some(raw) => CalculatorConfig::from_json(&raw).map_err(to_napi_error),
        None => Ok(CalculatorConfig::default()),
    }
}

// ---------------------------------------------------------------------------
// Calculators
// ---------------------------------------------------------------------------

#[napi]
pub fn dscr_evaluate(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let input: dscr::LoanInputs = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let config = parse_config(config_json)?;
    let output = dscr::analyze_dscr(&input, &config).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn refinance_evaluate(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let input: refinance::RefinanceInputs =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let config = parse_config(config_json)?;
    let output = refinance::analyze_refinance(&input, &config).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ScheduleRequest {
    principal: Money,
    annual_rate_percent: Decimal,
    term_months: u32,
}

#[derive(Serialize)]
struct ScheduleResponse {
    monthly_payment: Money,
    total_interest: Money,
    rows: Vec<ScheduleRow>,
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let req: ScheduleRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let principal = clamp_amount(req.principal);
    let r = monthly_rate(req.annual_rate_percent.clamp(Decimal::ZERO, MAX_RATE_PERCENT));
    let rows = schedule_rows(principal, r, req.term_months).map_err(to_napi_error)?;
    let payment = monthly_payment(principal, r, req.term_months);

    let response = ScheduleResponse {
        monthly_payment: payment,
        total_interest: total_interest(payment, req.term_months, principal),
        rows,
    };
    serde_json::to_string(&response).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

/// Free-text field value as a decimal string (`"$2,500"` → `"2500"`).
#[napi]
pub fn parse_bounded_number(raw: String) -> String {
    normalize_number(&raw).normalize().to_string()
}

#[napi]
pub fn format_currency(value: String, fraction_digits: Option<u32>) -> NapiResult<String> {
    let amount = Decimal::from_str(value.trim()).map_err(to_napi_error)?;
    Ok(presentation::currency(amount, fraction_digits.unwrap_or(0).min(10)))
}
