//! Form state behind the DSCR calculator.
//!
//! Raw field text goes through the normalizer before it is stored, and the
//! term fields follow the configured `TermResetPolicy` when the payment type
//! changes. The calculator itself stays stateless.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::calculator::{evaluate_with_config, DscrResult, LoanInputs, PaymentType};
use crate::config::{
    CalculatorConfig, TermResetPolicy, DSCR_AMORTIZATION_TERM_MONTHS, MAX_RATE_PERCENT,
};
use crate::normalize::{parse_clamped, parse_non_negative, parse_whole_clamped};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DscrField {
    Rent,
    Tax,
    Insurance,
    Hoa,
    Loan,
    Rate,
    AmortizationTermMonths,
    InterestOnlyTermMonths,
}

#[derive(Debug, Clone)]
pub struct DscrForm {
    inputs: LoanInputs,
    config: CalculatorConfig,
}

impl Default for DscrForm {
    fn default() -> Self {
        Self::new(CalculatorConfig::default())
    }
}

impl DscrForm {
    pub fn new(config: CalculatorConfig) -> Self {
        Self {
            inputs: LoanInputs::default(),
            config,
        }
    }

    pub fn inputs(&self) -> &LoanInputs {
        &self.inputs
    }

    /// Store one field from raw text.
    pub fn set_field(&mut self, field: DscrField, raw: &str) {
        let term_cap = self.config.dscr_amortization_term_months.max(DSCR_AMORTIZATION_TERM_MONTHS);
        let i = &mut self.inputs;
        match field {
            DscrField::Rent => i.gross_monthly_rent = parse_non_negative(raw),
            DscrField::Tax => i.monthly_tax = parse_non_negative(raw),
            DscrField::Insurance => i.monthly_insurance = parse_non_negative(raw),
            DscrField::Hoa => i.monthly_hoa = parse_non_negative(raw),
            DscrField::Loan => i.loan_amount = parse_non_negative(raw),
            DscrField::Rate => {
                i.annual_rate_percent = parse_clamped(raw, Decimal::ZERO, MAX_RATE_PERCENT)
            }
            DscrField::AmortizationTermMonths => {
                i.amortization_term_months = parse_whole_clamped(raw, 0, term_cap)
            }
            DscrField::InterestOnlyTermMonths => {
                i.interest_only_term_months = parse_whole_clamped(raw, 0, term_cap)
            }
        }
    }

    /// Switch payment type, applying the term reset policy.
    pub fn set_payment_type(&mut self, payment_type: PaymentType) {
        self.inputs.payment_type = payment_type;

        if self.config.term_reset_policy == TermResetPolicy::ResetOnPaymentTypeChange {
            self.inputs.amortization_term_months = self.config.dscr_amortization_term_months;
            self.inputs.interest_only_term_months = match payment_type {
                PaymentType::Amortized => 0,
                PaymentType::InterestOnly => self.config.dscr_interest_only_term_months,
            };
        }
    }

    pub fn calculate(&self) -> DscrResult {
        evaluate_with_config(&self.inputs, &self.config)
    }
}
