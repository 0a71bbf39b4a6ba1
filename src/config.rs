// config.rs — Compile-time configuration constants.
// Migrated from rules.h (llamasoft/HashcatRulesEngine).
//
// rules.h defines BLOCK_SIZE as the fixed capacity of every word buffer the
// engine touches: the output buffer, the memory register, and the rule's own
// canonical-byte buffer share this ceiling. Nothing in this crate allocates a
// buffer of any other size.

/// Maximum byte capacity of a word buffer. Usable payload is
/// [`BLOCK_SIZE`] `- 1`; the engine reserves the last slot the same way the
/// C source relies on a guaranteed NUL terminator, even though this port
/// does not require NUL-termination itself (spec §3).
pub const BLOCK_SIZE: usize = 64;

/// Usable payload capacity: the largest length a word may legally reach.
pub const MAX_WORD_LEN: usize = BLOCK_SIZE - 1;
