//! Rule parser: tokenises, validates, and canonicalises a rule line
//! (spec §4.3; component C3).
//!
//! Migrated from the validation half of `apply_rule` in rules.c
//! (llamasoft/HashcatRulesEngine), which originally interleaved parsing
//! and execution in a single pass. This port splits that into a pure
//! `parse` (this module) and a pure `apply` ([`crate::interp`]), per the
//! spec's component boundary between C3 and C4 — `parse` never touches a
//! word, `apply` never re-validates operand shape.

use super::ops::{self, OperandKind};
use super::Rule;
use crate::error::{ErrorKind, RuleError};
use crate::positional;

/// Bytes the parser skips outright: ASCII whitespace recognised by the
/// rule language, plus the explicit no-op `:` (spec §3, §4.3 step 3).
#[inline]
fn is_skippable(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b':')
}

/// Parse and canonicalise a single rule line (spec §4.3's five-step
/// algorithm).
///
/// `text` is the raw rule bytes with any trailing line terminator already
/// stripped by the caller (rule-file ingestion is an external collaborator,
/// spec §1). On success the returned [`Rule`]'s canonical length is at most
/// `text.len()`.
pub fn parse(text: &[u8]) -> Result<Rule, RuleError> {
    let mut canonical = Vec::with_capacity(text.len());
    let mut mem_seen = false;
    let mut i = 0;

    while i < text.len() {
        let b = text[i];
        if is_skippable(b) {
            i += 1;
            continue;
        }

        let op_offset = i;
        let arity = ops::arity_of(b).ok_or(RuleError::new(ErrorKind::UnknownRuleOp, b, op_offset))?;

        if ops::reads_memory(b) && !mem_seen {
            return Err(RuleError::new(ErrorKind::MemoryError, b, op_offset));
        }

        canonical.push(b);
        i += 1;

        for slot in 0..arity.operand_len() {
            if i >= text.len() {
                return Err(RuleError::new(ErrorKind::PrematureEndOfRule, b, op_offset));
            }
            let operand = text[i];
            if ops::operand_kind(arity, slot) == OperandKind::Positional {
                if let Err(kind) = positional::decode(operand) {
                    return Err(RuleError::new(kind, b, op_offset));
                }
            }
            // Canonical form retains the operand byte verbatim (spec §4.3
            // step 3, §9): positional operands stay in base-62 text form.
            canonical.push(operand);
            i += 1;
        }

        if ops::is_memorize(b) {
            mem_seen = true;
        }
    }

    Ok(Rule::from_canonical_bytes(canonical))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_and_whitespace_canonicalise_away() {
        let a = parse(b"lu").unwrap();
        let b = parse(b"l:u").unwrap();
        let c = parse(b"l : u").unwrap();
        let d = parse(b"l\t:\tu").unwrap();
        assert_eq!(a.canonical_bytes(), b"lu");
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(a, d);
    }

    #[test]
    fn canonical_idempotence() {
        let r = parse(b"l : u  $1 ^2").unwrap();
        let r2 = parse(r.canonical_bytes()).unwrap();
        assert_eq!(r, r2);
    }

    #[test]
    fn positional_operand_retained_verbatim() {
        let r = parse(b"TA").unwrap();
        assert_eq!(r.canonical_bytes(), b"TA");
    }

    #[test]
    fn premature_end_of_rule() {
        let err = parse(b"$").unwrap_err();
        assert_eq!(err.kind, ErrorKind::PrematureEndOfRule);
        assert_eq!(err.op, b'$');
    }

    #[test]
    fn invalid_positional() {
        let err = parse(b"T?").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidPositional);
        assert_eq!(err.op, b'T');
    }

    #[test]
    fn memory_read_before_write() {
        let err = parse(b"4").unwrap_err();
        assert_eq!(err.kind, ErrorKind::MemoryError);
        assert_eq!(err.op, b'4');
    }

    #[test]
    fn memory_read_after_write_succeeds() {
        let r = parse(b"Mu4").unwrap();
        assert_eq!(r.canonical_bytes(), b"Mu4");
    }

    #[test]
    fn unknown_rule_op() {
        let err = parse(b"~").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownRuleOp);
        assert_eq!(err.op, b'~');
    }

    #[test]
    fn comma_op_is_accepted_with_one_positional_operand() {
        let r = parse(b",5").unwrap();
        assert_eq!(r.canonical_bytes(), b",5");
    }

    #[test]
    fn diagnostic_message_format() {
        let err = parse(b"$").unwrap_err();
        assert_eq!(
            err.message(),
            "premature end of rule at operation '$' (offset 0)"
        );
    }

    #[test]
    fn multi_operand_op_consumes_exact_arity() {
        let r = parse(b"x12").unwrap();
        assert_eq!(r.canonical_bytes(), b"x12");
        // X requires a prior M; MX123 satisfies that so the 3-operand
        // consumption itself can be asserted.
        let r = parse(b"MX123").unwrap();
        assert_eq!(r.canonical_bytes(), b"MX123");
    }

    #[test]
    fn extract_memory_without_prior_memorize_is_memory_error() {
        let err = parse(b"X123").unwrap_err();
        assert_eq!(err.kind, ErrorKind::MemoryError);
    }
}
