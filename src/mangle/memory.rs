//! Memory-register primitives: `M 4 6 X` (spec §4.2, §4.4).
//!
//! The memory register is a byte string of the same capacity as the output
//! buffer (spec §3). These primitives never themselves enforce the
//! "register must be set before it is read" rule — that is a parse-time
//! (`mem_seen`) and run-time guard owned by [`crate::rule::parser`] and
//! [`crate::interp`] respectively, since a primitive has no notion of
//! "unset" versus "set to an empty string" (spec §9's uninitialised-register
//! design note).

use super::{fits, Buf};
use crate::config::BLOCK_SIZE;

/// `M` — snapshot the current output into the memory register. Always
/// succeeds; returns the new memory length (equal to `out_len`).
pub fn mangle_memorize(mem: &mut Buf, out: &Buf, out_len: usize) -> usize {
    mem[..out_len].copy_from_slice(&out[..out_len]);
    out_len
}

/// `4` — append the memory register's contents to the output. Silent
/// no-op if the result would not fit.
pub fn mangle_append_memory(buf: &mut Buf, len: usize, mem: &Buf, mem_len: usize) -> usize {
    let new_len = match len.checked_add(mem_len) {
        Some(v) => v,
        None => return len,
    };
    if !fits(new_len) {
        return len;
    }
    buf[len..new_len].copy_from_slice(&mem[..mem_len]);
    new_len
}

/// `6` — prepend the memory register's contents to the output. Silent
/// no-op if the result would not fit.
pub fn mangle_prepend_memory(buf: &mut Buf, len: usize, mem: &Buf, mem_len: usize) -> usize {
    let new_len = match len.checked_add(mem_len) {
        Some(v) => v,
        None => return len,
    };
    if !fits(new_len) {
        return len;
    }
    buf.copy_within(0..len, mem_len);
    buf[..mem_len].copy_from_slice(&mem[..mem_len]);
    new_len
}

/// `X n m i` — insert `mem[mem_off .. mem_off + sub_len)` at offset
/// `str_off` of the output. `str_off` may equal `len` (append), mirroring
/// [`super::edit::mangle_insert`]'s own exception; any other out-of-range
/// index, or a result that would not fit, is a silent no-op.
///
/// Per spec §4.2's design note, this primitive is allowed to use `mem` as
/// scratch space while it works; callers that need the register intact
/// afterwards must re-`M`-morize. This port makes that scratch use explicit:
/// the extracted substring is staged at the front of `mem` before being
/// written into `buf`.
pub fn mangle_insert_multi(
    buf: &mut Buf,
    len: usize,
    str_off: usize,
    mem: &mut Buf,
    mem_len: usize,
    mem_off: usize,
    sub_len: usize,
) -> usize {
    if str_off > len {
        return len;
    }
    if mem_off > mem_len || mem_off + sub_len > mem_len {
        return len;
    }
    let new_len = match len.checked_add(sub_len) {
        Some(v) => v,
        None => return len,
    };
    if !fits(new_len) {
        return len;
    }

    let mut staged = [0u8; BLOCK_SIZE];
    staged[..sub_len].copy_from_slice(&mem[mem_off..mem_off + sub_len]);

    buf.copy_within(str_off..len, str_off + sub_len);
    buf[str_off..str_off + sub_len].copy_from_slice(&staged[..sub_len]);

    // Scratch contract: stage the substring at the front of mem, clobbering
    // whatever was there (spec §9).
    mem[..sub_len].copy_from_slice(&staged[..sub_len]);

    new_len
}
