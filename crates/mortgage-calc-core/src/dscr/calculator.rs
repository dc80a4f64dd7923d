//! Debt Service Coverage Ratio for rental-property loans.
//!
//! DSCR = gross monthly rent / monthly PITIA under the payment type the
//! borrower selected (30-year amortized or interest-only). The ratio is then
//! bucketed into a qualification tier with fixed breakpoints.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use crate::amortization::{interest_only_payment, monthly_payment, monthly_rate};
use crate::config::{
    CalculatorConfig, DscrTierBreakpoints, DSCR_AMORTIZATION_TERM_MONTHS,
    DSCR_INTEREST_ONLY_TERM_MONTHS,
};
use crate::normalize::{clamp_amount, clamp_rate_percent};
use crate::types::{with_metadata, ComputationOutput, Money, MonthlyEscrow, Multiple};
use crate::CalcResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentType {
    #[serde(rename = "amort", alias = "amortized")]
    Amortized,
    #[default]
    #[serde(rename = "io", alias = "interest_only")]
    InterestOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanInputs {
    #[serde(alias = "rent")]
    pub gross_monthly_rent: Money,
    #[serde(alias = "tax")]
    pub monthly_tax: Money,
    #[serde(alias = "ins")]
    pub monthly_insurance: Money,
    #[serde(alias = "hoa")]
    pub monthly_hoa: Money,
    #[serde(alias = "loan")]
    pub loan_amount: Money,
    /// Annual note rate in percent (7.25 = 7.25%).
    #[serde(alias = "rate")]
    pub annual_rate_percent: Decimal,
    #[serde(alias = "payType")]
    pub payment_type: PaymentType,
    /// Display only. The amortized payment always uses
    /// `CalculatorConfig::dscr_amortization_term_months`.
    #[serde(alias = "termMo", default = "default_amortization_term")]
    pub amortization_term_months: u32,
    /// Display only; does not change either payment.
    #[serde(alias = "ioMo", default = "default_interest_only_term")]
    pub interest_only_term_months: u32,
}

fn default_amortization_term() -> u32 {
    DSCR_AMORTIZATION_TERM_MONTHS
}

fn default_interest_only_term() -> u32 {
    DSCR_INTEREST_ONLY_TERM_MONTHS
}

impl Default for LoanInputs {
    /// The scenario the calculator opens with.
    fn default() -> Self {
        Self {
            gross_monthly_rent: dec!(2500),
            monthly_tax: dec!(300),
            monthly_insurance: dec!(100),
            monthly_hoa: Decimal::ZERO,
            loan_amount: dec!(300000),
            annual_rate_percent: dec!(7.25),
            payment_type: PaymentType::InterestOnly,
            amortization_term_months: DSCR_AMORTIZATION_TERM_MONTHS,
            interest_only_term_months: DSCR_INTEREST_ONLY_TERM_MONTHS,
        }
    }
}

impl LoanInputs {
    /// Clamp every field into the calculator's domain.
    pub fn normalized(&self) -> Self {
        Self {
            gross_monthly_rent: clamp_amount(self.gross_monthly_rent),
            monthly_tax: clamp_amount(self.monthly_tax),
            monthly_insurance: clamp_amount(self.monthly_insurance),
            monthly_hoa: clamp_amount(self.monthly_hoa),
            loan_amount: clamp_amount(self.loan_amount),
            annual_rate_percent: clamp_rate_percent(self.annual_rate_percent),
            ..self.clone()
        }
    }

    pub fn escrow(&self) -> MonthlyEscrow {
        MonthlyEscrow::new(self.monthly_tax, self.monthly_insurance, self.monthly_hoa)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualificationTier {
    Excellent,
    StandardApproval,
    SpecialtyEligible,
    BelowMinimum,
}

impl QualificationTier {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent (≥ 1.25)",
            Self::StandardApproval => "Standard Approval Range (1.10–1.24)",
            Self::SpecialtyEligible => "Eligible – DSCR Program Range (0.75–1.09)",
            Self::BelowMinimum => "Below Minimum Program Range (< 0.75)",
        }
    }
}

impl std::fmt::Display for QualificationTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DscrResult {
    pub dscr_ratio: Multiple,
    /// Amortized PITIA.
    pub amortized_monthly_payment: Money,
    /// Interest-only PITIA.
    pub interest_only_monthly_payment: Money,
    pub amortized_principal_interest: Money,
    pub interest_only_interest: Money,
    pub monthly_escrow: Money,
    pub payment_type: PaymentType,
    pub selected_payment: Money,
    pub qualification_tier: QualificationTier,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Evaluate DSCR with the shipping configuration.
pub fn evaluate(inputs: &LoanInputs) -> DscrResult {
    evaluate_with_config(inputs, &CalculatorConfig::default())
}

/// Evaluate DSCR. Total over any input: out-of-domain values are clamped
/// first, and a zero payment yields a zero ratio.
pub fn evaluate_with_config(inputs: &LoanInputs, config: &CalculatorConfig) -> DscrResult {
    let inputs = inputs.normalized();
    let r = monthly_rate(inputs.annual_rate_percent);
    let escrow = inputs.escrow().total();

    let principal_interest =
        monthly_payment(inputs.loan_amount, r, config.dscr_amortization_term_months);
    let interest_only = interest_only_payment(inputs.loan_amount, r);

    let piti_amortized = principal_interest + escrow;
    let piti_interest_only = interest_only + escrow;

    let selected_payment = match inputs.payment_type {
        PaymentType::Amortized => piti_amortized,
        PaymentType::InterestOnly => piti_interest_only,
    };

    let dscr_ratio = if selected_payment > Decimal::ZERO {
        inputs.gross_monthly_rent / selected_payment
    } else {
        warn!("selected monthly payment is zero; DSCR reported as 0");
        Decimal::ZERO
    };

    let qualification_tier = qualification_tier(dscr_ratio, &config.dscr_tiers);

    debug!(
        payment_type = ?inputs.payment_type,
        selected_payment = %selected_payment,
        dscr_ratio = %dscr_ratio,
        tier = ?qualification_tier,
        "dscr evaluated"
    );

    DscrResult {
        dscr_ratio,
        amortized_monthly_payment: piti_amortized,
        interest_only_monthly_payment: piti_interest_only,
        amortized_principal_interest: principal_interest,
        interest_only_interest: interest_only,
        monthly_escrow: escrow,
        payment_type: inputs.payment_type,
        selected_payment,
        qualification_tier,
    }
}

/// Bucket a ratio into a tier. Lower bounds are inclusive, checked from the
/// highest tier down.
pub fn qualification_tier(ratio: Multiple, tiers: &DscrTierBreakpoints) -> QualificationTier {
    match ratio {
        r if r >= tiers.excellent => QualificationTier::Excellent,
        r if r >= tiers.standard => QualificationTier::StandardApproval,
        r if r >= tiers.specialty_min => QualificationTier::SpecialtyEligible,
        _ => QualificationTier::BelowMinimum,
    }
}

/// How the selected payment type is described to the borrower.
pub fn selection_description(payment_type: PaymentType) -> &'static str {
    match payment_type {
        PaymentType::Amortized => "30-Year Fully Amortized",
        PaymentType::InterestOnly => "Interest-Only for 10 Years (due in 30 years)",
    }
}

/// Evaluate DSCR and wrap the result in the standard output envelope.
pub fn analyze_dscr(
    inputs: &LoanInputs,
    config: &CalculatorConfig,
) -> CalcResult<ComputationOutput<DscrResult>> {
    let start = Instant::now();
    config.validate()?;

    let result = evaluate_with_config(inputs, config);
    let mut warnings: Vec<String> = Vec::new();

    if result.selected_payment.is_zero() {
        warnings.push("Monthly payment is zero; DSCR cannot be measured.".into());
    }
    if inputs.gross_monthly_rent <= Decimal::ZERO {
        warnings.push("Gross monthly rent is zero; DSCR is 0.".into());
    }
    if result.qualification_tier == QualificationTier::BelowMinimum
        && !result.selected_payment.is_zero()
    {
        warnings.push(format!(
            "DSCR of {:.2} is below the {} program minimum.",
            result.dscr_ratio, config.dscr_tiers.specialty_min
        ));
    }

    let assumptions = serde_json::json!({
        "amortization_term_months": config.dscr_amortization_term_months,
        "interest_only_term_months": config.dscr_interest_only_term_months,
        "selection": selection_description(result.payment_type),
        "tier_breakpoints": config.dscr_tiers,
        "payment_includes": "principal, interest, taxes, insurance, HOA",
    });

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "DSCR (gross rent / PITIA)",
        &assumptions,
        warnings,
        elapsed,
        result,
    ))
}
