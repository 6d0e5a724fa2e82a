//! Personal time tracking and bookkeeping from the terminal. Work sessions are tracked with a
//! timer or entered by hand, their earnings derive from an hourly rate and per work type
//! multipliers, and income/expenses are recorded next to them. Everything is kept in a single
//! local json file.

pub mod cli;
pub mod earnings;
pub mod export;
pub mod report;
pub mod state;
pub mod utils;
