pub mod amortization;
pub mod config;
pub mod error;
pub mod normalize;
pub mod presentation;
pub mod types;

#[cfg(feature = "dscr")]
pub mod dscr;

#[cfg(feature = "refinance")]
pub mod refinance;

pub use config::CalculatorConfig;
pub use error::CalcError;
pub use types::*;

/// Standard result type for the fallible edges of the calculators.
pub type CalcResult<T> = Result<T, CalcError>;
