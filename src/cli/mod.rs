//! Command-line surface (spec §6.2).

pub mod args;
pub mod constants;
pub mod diagnostics;
