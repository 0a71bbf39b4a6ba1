//! ASCII case primitives: `l u c C t T E` (spec §6.1).
//!
//! All of these only ever flip bit `0x20` on bytes in `A-Z`/`a-z`; every
//! other byte is left untouched, including the reference source's
//! historical reliance on the C locale never applying to anything outside
//! that range (spec §8: "Case is bit-0x20 only").

use super::{toggle_case_byte, Buf};

/// `l` — lowercase every letter.
pub fn mangle_lowercase(buf: &mut Buf, len: usize) -> usize {
    for b in &mut buf[..len] {
        b.make_ascii_lowercase();
    }
    len
}

/// `u` — uppercase every letter.
pub fn mangle_uppercase(buf: &mut Buf, len: usize) -> usize {
    for b in &mut buf[..len] {
        b.make_ascii_uppercase();
    }
    len
}

/// `c` — lowercase everything, then uppercase index 0.
pub fn mangle_capitalize(buf: &mut Buf, len: usize) -> usize {
    mangle_lowercase(buf, len);
    if len > 0 {
        buf[0].make_ascii_uppercase();
    }
    len
}

/// `C` — uppercase everything, then lowercase index 0.
pub fn mangle_invert_capitalize(buf: &mut Buf, len: usize) -> usize {
    mangle_uppercase(buf, len);
    if len > 0 {
        buf[0].make_ascii_lowercase();
    }
    len
}

/// `t` — toggle the case of every letter.
pub fn mangle_toggle_case(buf: &mut Buf, len: usize) -> usize {
    for b in &mut buf[..len] {
        *b = toggle_case_byte(*b);
    }
    len
}

/// `T n` — toggle the case of the letter at index `n`. Out-of-range `n`
/// (`n >= len`) is a silent no-op.
pub fn mangle_toggle_at(buf: &mut Buf, len: usize, n: usize) -> usize {
    if n >= len {
        return len;
    }
    buf[n] = toggle_case_byte(buf[n]);
    len
}

/// `E` — title case: the first letter of each space-separated word is
/// uppercased, every other letter is lowercased. A "word" starts at index 0
/// and immediately after every space byte (`0x20`); this is the standard
/// hashcat rules-engine semantic for `E`, which the abbreviated table in
/// spec §6.1 names but does not spell out.
pub fn mangle_title_case(buf: &mut Buf, len: usize) -> usize {
    let mut start_of_word = true;
    for b in &mut buf[..len] {
        if *b == b' ' {
            start_of_word = true;
            continue;
        }
        if start_of_word {
            b.make_ascii_uppercase();
        } else {
            b.make_ascii_lowercase();
        }
        start_of_word = false;
    }
    len
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BLOCK_SIZE;

    fn buf_from(s: &[u8]) -> Buf {
        let mut b = [0u8; BLOCK_SIZE];
        b[..s.len()].copy_from_slice(s);
        b
    }

    #[test]
    fn lowercase_and_uppercase() {
        let mut b = buf_from(b"PassWord");
        let len = mangle_lowercase(&mut b, 8);
        assert_eq!(&b[..len], b"password");

        let mut b = buf_from(b"PassWord");
        let len = mangle_uppercase(&mut b, 8);
        assert_eq!(&b[..len], b"PASSWORD");
    }

    #[test]
    fn capitalize_and_invert() {
        let mut b = buf_from(b"password");
        let len = mangle_capitalize(&mut b, 8);
        assert_eq!(&b[..len], b"Password");

        let mut b = buf_from(b"PASSWORD");
        let len = mangle_invert_capitalize(&mut b, 8);
        assert_eq!(&b[..len], b"pASSWORD");
    }

    #[test]
    fn toggle_case_flips_every_letter_leaves_digits_alone() {
        let mut b = buf_from(b"Pa55word");
        let len = mangle_toggle_case(&mut b, 8);
        assert_eq!(&b[..len], b"pA55WORD");
    }

    #[test]
    fn toggle_at_out_of_range_is_noop() {
        let mut b = buf_from(b"abc");
        let len = mangle_toggle_at(&mut b, 3, 5);
        assert_eq!(&b[..len], b"abc");
    }

    #[test]
    fn title_case_splits_on_space() {
        let mut b = buf_from(b"hello world");
        let len = mangle_title_case(&mut b, 11);
        assert_eq!(&b[..len], b"Hello World");
    }
}
