pub mod calculator;
pub mod form;

pub use calculator::{
    analyze_dscr, evaluate, evaluate_with_config, qualification_tier, selection_description,
    DscrResult, LoanInputs, PaymentType, QualificationTier,
};
pub use form::{DscrField, DscrForm};
