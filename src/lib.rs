//! hcre — a hashcat/John-the-Ripper compatible batch word-mangling rules
//! engine.
//!
//! The core is the rule subsystem: [`rule::parser::parse`] canonicalises a
//! textual rule, and [`interp::apply`] executes a canonicalised rule against
//! an input word within a fixed byte budget. Everything else — rule-file
//! ingestion, the registry, the I/O drivers, the CLI — is a thin caller
//! around those two entry points.

pub mod cli;
pub mod config;
pub mod error;
pub mod interp;
pub mod io;
pub mod mangle;
pub mod positional;
pub mod registry;
pub mod rule;
#[cfg(feature = "parallel")]
pub mod threadpool;

pub use config::{BLOCK_SIZE, MAX_WORD_LEN};
pub use error::{ApplyOutcome, ErrorKind, RuleError};
pub use interp::apply;
pub use registry::{RegistryEntry, RuleRegistry};
pub use rule::parser::parse;
pub use rule::Rule;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
