pub mod calculator;
pub mod form;

pub use calculator::{
    analyze_refinance, default_closing_costs, evaluate, evaluate_with_config, BreakEven,
    HorizonComparison, NewTerm, RefinanceInputs, RefinanceResult,
};
pub use form::{ClosingCostsEntry, RefinanceField, RefinanceForm, RefinancePreset};
