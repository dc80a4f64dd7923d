pub mod dscr;
pub mod refinance;
pub mod schedule;
