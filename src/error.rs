//! Structural error kinds shared by the rule parser and interpreter.
//!
//! Migrated from the `errno`-style return codes in rules.c/rules.h
//! (llamasoft/HashcatRulesEngine). The reference source multiplexes status
//! onto a single signed integer (`>= 0` success, specific negative constants
//! for each failure, `REJECTED` for the one "expected" negative outcome).
//! Per the design notes in spec.md §9, this port replaces that with an
//! explicit, closed `ErrorKind` enum plus a `RuleError` carrying the
//! human-readable diagnostic the reference source used to write into the
//! output buffer itself.

use std::fmt;

/// Closed set of structural outcomes for [`crate::rule::parser::parse`] and
/// [`crate::interp::apply`] (spec §7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller passed a null/empty buffer.
    InvalidInput,
    /// An operand was expected past the end of the rule text.
    PrematureEndOfRule,
    /// The operation byte is not in the recognised operation set.
    UnknownRuleOp,
    /// A positional operand byte fell outside the 62-symbol alphabet.
    InvalidPositional,
    /// A memory-read operation executed before any memorise.
    MemoryError,
    /// A reject predicate fired. Expected outcome, not an error.
    Rejected,
    /// Reserved sentinel; never produced by this implementation.
    UnknownError,
}

impl ErrorKind {
    /// The human phrase used in parser diagnostics (spec §4.3 step 4).
    pub fn phrase(self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid input",
            ErrorKind::PrematureEndOfRule => "premature end of rule",
            ErrorKind::UnknownRuleOp => "unknown rule operation",
            ErrorKind::InvalidPositional => "invalid positional operand",
            ErrorKind::MemoryError => "memory register read before write",
            ErrorKind::Rejected => "rejected",
            ErrorKind::UnknownError => "unknown error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.phrase())
    }
}

/// A structural failure produced while parsing a single rule line.
///
/// `message` matches the format mandated by spec §4.3 step 4:
/// `"<human phrase> at operation '<byte>' (offset <n>)"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleError {
    pub kind: ErrorKind,
    /// The offending operation byte, or the last byte consumed when the
    /// rule ran out before an operand could be read.
    pub op: u8,
    /// Byte offset into the *source* rule text where the failure was
    /// detected.
    pub offset: usize,
}

impl RuleError {
    pub fn new(kind: ErrorKind, op: u8, offset: usize) -> Self {
        RuleError { kind, op, offset }
    }

    /// Render the diagnostic text mandated by spec §4.3 step 4.
    pub fn message(&self) -> String {
        format!(
            "{} at operation '{}' (offset {})",
            self.kind.phrase(),
            display_op_byte(self.op),
            self.offset
        )
    }
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for RuleError {}

/// Render an operation byte for diagnostics, falling back to its numeric
/// value when it is not printable ASCII (raw-byte operands can carry
/// arbitrary bytes, spec §4.5).
fn display_op_byte(b: u8) -> String {
    if b.is_ascii_graphic() || b == b' ' {
        (b as char).to_string()
    } else {
        format!("0x{:02x}", b)
    }
}

/// Outcome of running a canonicalised rule against a word (spec §4.4's
/// per-call state machine: `RUNNING` never escapes `apply`, and the three
/// terminal states below are its only observable results).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// `DONE`: cursor reached end-of-rule; carries the resulting length.
    Done(usize),
    /// `REJECTED`: a reject predicate fired. No diagnostic; routine.
    Rejected,
    /// `ERROR`: a structural failure reachable only when `apply` is called
    /// on a rule that bypassed `parse` (spec §4.4).
    Error(RuleError),
}
