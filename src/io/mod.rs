//! I/O orchestration: rule-file ingestion and the word/rule driver loops
//! (spec §1's external-collaborator boundary; component C6).

pub mod driver;
#[cfg(feature = "parallel")]
pub mod parallel;
pub mod rules_file;
