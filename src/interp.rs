//! Rule interpreter (spec §4.4; component C4).
//!
//! Migrated from `apply_rule` in rules.c (llamasoft/HashcatRulesEngine),
//! which walked a canonical rule byte-by-byte against a stack buffer and a
//! sibling memory buffer, dispatching through a large `switch`. This port
//! keeps that same single-cursor, no-allocation shape (spec §5) but returns
//! a closed [`ApplyOutcome`] instead of the reference's signed-integer
//! status code, and takes the output buffer by `&mut` the same way every
//! primitive in [`crate::mangle`] does.

use crate::error::{ApplyOutcome, ErrorKind, RuleError};
use crate::mangle::{case, edit, memory, shape, Buf};
use crate::positional;
use crate::rule::ops::{self, Arity, OperandKind};
use crate::rule::Rule;

/// Apply a canonicalised `rule` to `word`, writing the transformed word into
/// `out`.
///
/// `word` is copied into `out`, truncated to `BLOCK_SIZE − 1` bytes (spec
/// §4.4's precondition relaxation: a word longer than the buffer is
/// truncated rather than rejected, since the buffer itself is the only hard
/// limit the spec names). An empty `word` is `INVALID_INPUT`.
///
/// On [`ApplyOutcome::Done`], `out[..n]` holds the result and `out[n..]` is
/// zeroed, matching the reference's "clear the tail of the buffer" return
/// convention. On [`ApplyOutcome::Error`], `out` additionally carries the
/// diagnostic text (truncated to `BLOCK_SIZE`), mirroring how the reference
/// wrote its error string directly into the output buffer; Rust callers
/// should prefer the message carried by the returned [`RuleError`] rather
/// than re-reading `out`.
pub fn apply(rule: &Rule, word: &[u8], out: &mut Buf) -> ApplyOutcome {
    if word.is_empty() {
        return ApplyOutcome::Error(RuleError::new(ErrorKind::InvalidInput, 0, 0));
    }

    let mut len = word.len().min(crate::config::MAX_WORD_LEN);
    out[..len].copy_from_slice(&word[..len]);
    out[len..].fill(0);

    let mut mem: Buf = [0u8; crate::config::BLOCK_SIZE];
    let mut mem_len: Option<usize> = None;

    let bytes = rule.canonical_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let op = bytes[i];
        let op_offset = i;
        i += 1;

        let arity = match ops::arity_of(op) {
            Some(a) => a,
            None => return error_with_diagnostic(out, ErrorKind::UnknownRuleOp, op, op_offset),
        };

        if ops::reads_memory(op) && mem_len.is_none() {
            return error_with_diagnostic(out, ErrorKind::MemoryError, op, op_offset);
        }

        let mut operands = [0u8; 3];
        for slot in 0..arity.operand_len() {
            if i >= bytes.len() {
                return error_with_diagnostic(out, ErrorKind::PrematureEndOfRule, op, op_offset);
            }
            let raw = bytes[i];
            i += 1;
            operands[slot] = match ops::operand_kind(arity, slot) {
                OperandKind::Positional => match positional::decode(raw) {
                    Ok(v) => v,
                    Err(kind) => return error_with_diagnostic(out, kind, op, op_offset),
                },
                OperandKind::Byte => raw,
            };
        }

        match dispatch(op, arity, &operands, out, len, &mut mem, &mut mem_len) {
            Step::Continue(new_len) => len = new_len,
            Step::Reject => return ApplyOutcome::Rejected,
        }
    }

    out[len..].fill(0);
    ApplyOutcome::Done(len)
}

enum Step {
    Continue(usize),
    Reject,
}

/// Dispatch a single operation, given its already-validated operands.
///
/// Wraps [`dispatch_op`] with a debug-only cross-check against
/// [`ops::is_reject`]: every `Reject` it produces must come from an op in
/// that family, catching a reject arm added to one table but not the other.
#[allow(clippy::too_many_arguments)]
fn dispatch(
    op: u8,
    arity: Arity,
    operands: &[u8; 3],
    out: &mut Buf,
    len: usize,
    mem: &mut Buf,
    mem_len: &mut Option<usize>,
) -> Step {
    let step = dispatch_op(op, arity, operands, out, len, mem, mem_len);
    debug_assert!(
        !matches!(step, Step::Reject) || ops::is_reject(op),
        "op {:?} produced Reject but is not in the reject-predicate family",
        op as char
    );
    step
}

/// Positional operands are pre-decoded into `0..=61`; the arity determines
/// how many of `operands`'s leading slots are meaningful and whether each
/// one is a decoded positional value or a raw byte, per
/// [`ops::operand_kind`].
#[allow(clippy::too_many_arguments)]
fn dispatch_op(
    op: u8,
    arity: Arity,
    operands: &[u8; 3],
    out: &mut Buf,
    len: usize,
    mem: &mut Buf,
    mem_len: &mut Option<usize>,
) -> Step {
    use Step::*;

    match op {
        // --- no-operand mangles ---
        b'l' => Continue(case::mangle_lowercase(out, len)),
        b'u' => Continue(case::mangle_uppercase(out, len)),
        b'c' => Continue(case::mangle_capitalize(out, len)),
        b'C' => Continue(case::mangle_invert_capitalize(out, len)),
        b't' => Continue(case::mangle_toggle_case(out, len)),
        b'E' => Continue(case::mangle_title_case(out, len)),
        b'r' => Continue(shape::mangle_reverse(out, len)),
        b'd' => Continue(shape::mangle_dupe_word(out, len)),
        b'f' => Continue(shape::mangle_reflect(out, len)),
        b'{' => Continue(shape::mangle_rotate_left(out, len)),
        b'}' => Continue(shape::mangle_rotate_right(out, len)),
        b'q' => Continue(shape::mangle_dupe_all_chars(out, len)),
        b'k' => Continue(shape::mangle_swap_front(out, len)),
        b'K' => Continue(shape::mangle_swap_back(out, len)),
        b'[' => Continue(edit::mangle_delete_first(out, len)),
        b']' => Continue(edit::mangle_delete_last(out, len)),

        // --- memory ---
        b'M' => {
            *mem_len = Some(memory::mangle_memorize(mem, out, len));
            Continue(len)
        }
        b'4' => Continue(memory::mangle_append_memory(out, len, mem, mem_len.unwrap())),
        b'6' => Continue(memory::mangle_prepend_memory(out, len, mem, mem_len.unwrap())),
        b'Q' => {
            let ml = mem_len.unwrap();
            if ml == len && mem[..ml] == out[..len] {
                Reject
            } else {
                Continue(len)
            }
        }

        // --- positional (one operand) ---
        b'T' => Continue(case::mangle_toggle_at(out, len, operands[0] as usize)),
        b'p' => Continue(shape::mangle_dupe_word_times(out, len, operands[0] as usize)),
        b'D' => Continue(edit::mangle_delete_at(out, len, operands[0] as usize)),
        b'\'' => Continue(edit::mangle_truncate(out, len, operands[0] as usize)),
        b'z' => Continue(shape::mangle_dupe_first_char_times(out, len, operands[0] as usize)),
        b'Z' => Continue(shape::mangle_dupe_last_char_times(out, len, operands[0] as usize)),
        b'y' => Continue(shape::mangle_dup_first_n_chars(out, len, operands[0] as usize)),
        b'Y' => Continue(shape::mangle_dup_last_n_chars(out, len, operands[0] as usize)),
        b'L' => Continue(edit::mangle_shift_left_bit(out, len, operands[0] as usize)),
        b'R' => Continue(edit::mangle_shift_right_bit(out, len, operands[0] as usize)),
        b'+' => Continue(edit::mangle_increment(out, len, operands[0] as usize)),
        b'-' => Continue(edit::mangle_decrement(out, len, operands[0] as usize)),
        b'.' => Continue(edit::mangle_copy_right(out, len, operands[0] as usize)),
        b',' => Continue(edit::mangle_copy_left(out, len, operands[0] as usize)),
        b'<' => {
            let n = operands[0] as usize;
            if len > n {
                Reject
            } else {
                Continue(len)
            }
        }
        b'>' => {
            let n = operands[0] as usize;
            if len < n {
                Reject
            } else {
                Continue(len)
            }
        }

        // --- raw byte (one operand) ---
        b'$' => Continue(edit::mangle_append(out, len, operands[0])),
        b'^' => Continue(edit::mangle_prepend(out, len, operands[0])),
        b'@' => Continue(edit::mangle_purge(out, len, operands[0])),
        b'!' => {
            if out[..len].contains(&operands[0]) {
                Reject
            } else {
                Continue(len)
            }
        }
        b'/' => {
            if out[..len].contains(&operands[0]) {
                Continue(len)
            } else {
                Reject
            }
        }
        b'(' => {
            if len < 1 || out[0] != operands[0] {
                Reject
            } else {
                Continue(len)
            }
        }
        b')' => {
            if len < 1 || out[len - 1] != operands[0] {
                Reject
            } else {
                Continue(len)
            }
        }

        // --- byte+byte ---
        b's' => Continue(edit::mangle_replace(out, len, operands[0], operands[1])),

        // --- positional+positional ---
        b'x' => Continue(edit::mangle_extract(out, len, operands[0] as usize, operands[1] as usize)),
        b'O' => Continue(edit::mangle_omit(out, len, operands[0] as usize, operands[1] as usize)),
        b'*' => Continue(edit::mangle_swap(out, len, operands[0] as usize, operands[1] as usize)),

        // --- positional+byte ---
        b'i' => Continue(edit::mangle_insert(out, len, operands[0] as usize, operands[1])),
        b'o' => Continue(edit::mangle_overstrike(out, len, operands[0] as usize, operands[1])),
        b'=' => {
            let n = operands[0] as usize;
            if n >= len || out[n] != operands[1] {
                Reject
            } else {
                Continue(len)
            }
        }
        b'%' => {
            let n = operands[0] as usize;
            let count = out[..len].iter().filter(|&&b| b == operands[1]).count();
            if count < n {
                Reject
            } else {
                Continue(len)
            }
        }

        // --- positional+positional+positional ---
        b'X' => {
            let (n, m, idx) = (operands[0] as usize, operands[1] as usize, operands[2] as usize);
            Continue(memory::mangle_insert_multi(
                out,
                len,
                idx,
                mem,
                mem_len.unwrap(),
                n,
                m,
            ))
        }

        _ => unreachable!("arity table and dispatch table must agree on every op byte: {:?}", op as char),
    }
}

fn error_with_diagnostic(out: &mut Buf, kind: ErrorKind, op: u8, offset: usize) -> ApplyOutcome {
    let err = RuleError::new(kind, op, offset);
    let msg = err.message();
    let msg_bytes = msg.as_bytes();
    let n = msg_bytes.len().min(out.len());
    out[..n].copy_from_slice(&msg_bytes[..n]);
    out[n..].fill(0);
    ApplyOutcome::Error(err)
}
