//! Sequential I/O driver (spec §4.5's registry iteration contract; component
//! C6): read words from a stream, run every loaded rule against each word,
//! write successful outputs.
//!
//! Grounded in `hcre.c`'s main word loop: for every input line, walk the
//! rule hash table, call `apply_rule`, print on success, diagnose-and-evict
//! on structural failure, stay silent on rejection.

use std::io::{BufRead, Write};

use crate::cli::diagnostics;
use crate::config::BLOCK_SIZE;
use crate::displaylevel;
use crate::error::ApplyOutcome;
use crate::interp;
use crate::registry::RuleRegistry;

/// Run every rule in `registry` against every word read from `input`,
/// writing successful transformations to `output`, one per line.
///
/// A rule that breaks at runtime (a structural, non-`REJECTED` outcome) is
/// diagnosed to stderr and removed from `registry` so later words don't
/// repeat the failure (spec §7's propagation policy, §9's
/// iteration-with-deletion design note).
pub fn run<R: BufRead, W: Write>(
    input: R,
    mut output: W,
    registry: &mut RuleRegistry,
    debug_rules: bool,
) -> std::io::Result<()> {
    for line in input.lines() {
        let raw = line?;
        let word = trim_word(&raw);
        if word.is_empty() {
            continue;
        }
        process_word(word, registry, &mut output, debug_rules)?;
    }
    Ok(())
}

fn process_word<W: Write>(
    word: &str,
    registry: &mut RuleRegistry,
    output: &mut W,
    debug_rules: bool,
) -> std::io::Result<()> {
    let mut broken = Vec::new();

    for entry in registry.iter_removable() {
        let mut out = [0u8; BLOCK_SIZE];
        match interp::apply(&entry.rule, word.as_bytes(), &mut out) {
            ApplyOutcome::Done(n) => {
                if debug_rules {
                    write!(output, "{}\t", entry.source_text)?;
                }
                output.write_all(&out[..n])?;
                output.write_all(b"\n")?;
            }
            ApplyOutcome::Rejected => {}
            ApplyOutcome::Error(err) => {
                displaylevel!(
                    1,
                    "{}",
                    diagnostics::runtime_failure(word, &entry.source_text, &entry.rule.to_string(), &err)
                );
                broken.push(entry.rule.clone());
            }
        }
    }

    for rule in &broken {
        registry.remove(rule);
    }
    Ok(())
}

/// Trim a trailing `\r` (CRLF input) and surrounding whitespace isn't part
/// of the word contract — only line-ending normalisation is (spec §6.2).
fn trim_word(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}
