//! CLI-wide constants and the display-level global.
//!
//! Migrated from the `displayLevel` global and `DISPLAYLEVEL` macro in
//! lz4cli.c, which the teacher crate carried into `cli/constants.rs`
//! wholesale. hcre keeps the same global-atomic-plus-macro shape for its own
//! diagnostics (spec §6.3) in place of pulling in `log`/`tracing`.

use std::sync::atomic::{AtomicU32, Ordering};

pub const PROGRAM_NAME: &str = "hcre";

/// 0 = silent; 1 = errors only; 2 = normal (default); 3 = verbose, including
/// per-duplicate-rule notices during load.
pub static DISPLAY_LEVEL: AtomicU32 = AtomicU32::new(2);

#[inline]
pub fn display_level() -> u32 {
    DISPLAY_LEVEL.load(Ordering::Relaxed)
}

#[inline]
pub fn set_display_level(level: u32) {
    DISPLAY_LEVEL.store(level, Ordering::Relaxed);
}

/// Conditionally print to stderr at or above `level` (spec §6.3: all
/// diagnostics go to standard error).
#[macro_export]
macro_rules! displaylevel {
    ($level:expr, $($arg:tt)*) => {
        if $crate::cli::constants::display_level() >= $level {
            eprintln!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_level_round_trips() {
        let prev = display_level();
        set_display_level(3);
        assert_eq!(display_level(), 3);
        set_display_level(prev);
    }
}
