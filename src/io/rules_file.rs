//! Rule-file ingestion (spec §1's "external collaborator": rule-file
//! reading, comment/blank skipping; component boundary into C3/C5).
//!
//! Grounded in the `main()` read loop of `hcre.c`: read each rule file line
//! by line, skip blank lines and `#`-prefixed comments, strip a trailing
//! `\n` (and a preceding `\r` for CRLF input), `parse()` the remainder, and
//! run a load-time self-test (apply against a one-byte dummy word) before
//! trusting the rule enough to insert it into the registry — catching
//! runtime-only failures that `parse`'s static validation cannot see.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::cli::diagnostics;
use crate::config::BLOCK_SIZE;
use crate::displaylevel;
use crate::error::ApplyOutcome;
use crate::interp;
use crate::registry::{InsertOutcome, RegistryEntry, RuleRegistry};
use crate::rule::parser::parse;

/// Dummy word used for the load-time self-test (hcre.c's `" "` sentinel).
const SELF_TEST_WORD: &[u8] = b" ";

/// Load every rule from `path` into `registry`, skipping blank lines and
/// `#`-prefixed comments. Malformed or load-time-broken lines are dropped
/// with a diagnostic to stderr rather than aborting the whole file.
///
/// Returns the number of rules loaded, or an I/O error if the file itself
/// cannot be opened (spec §6.2: that is the one failure that should abort
/// the whole program).
pub fn load_rule_file(path: &Path, registry: &mut RuleRegistry) -> io::Result<usize> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let file_name = path.display().to_string();
    let mut loaded = 0;

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let raw = line?;
        let text = trim_line(&raw);
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        let rule = match parse(text.as_bytes()) {
            Ok(r) => r,
            Err(err) => {
                displaylevel!(1, "{}", diagnostics::load_failure(&file_name, line_no, text, &err));
                continue;
            }
        };

        let mut scratch = [0u8; BLOCK_SIZE];
        if let ApplyOutcome::Error(err) = interp::apply(&rule, SELF_TEST_WORD, &mut scratch) {
            displaylevel!(1, "{}", diagnostics::load_failure(&file_name, line_no, text, &err));
            continue;
        }

        let entry = RegistryEntry {
            rule,
            source_file: file_name.clone(),
            source_line: line_no,
            source_text: text.to_string(),
        };
        match registry.insert_if_absent(entry) {
            InsertOutcome::Inserted => loaded += 1,
            InsertOutcome::Duplicate(prior) => {
                displaylevel!(
                    3,
                    "{}",
                    diagnostics::duplicate_rule(&file_name, line_no, text, &prior.source_file, prior.source_line)
                );
            }
        }
    }

    Ok(loaded)
}

/// Strip a single trailing `\n`, and a preceding `\r` if present. `BufRead::lines`
/// already strips the `\n` itself, but we keep this defensive for callers
/// that hand us raw text some other way (tests, future stdin-as-rules mode).
fn trim_line(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_tmp(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn loads_valid_rules_skips_blank_and_comments() {
        let f = write_tmp("u\n\n# a comment\nl\n");
        let mut reg = RuleRegistry::new();
        let n = load_rule_file(f.path(), &mut reg).unwrap();
        assert_eq!(n, 2);
        assert_eq!(reg.size(), 2);
    }

    #[test]
    fn malformed_line_is_skipped_not_fatal() {
        let f = write_tmp("u\n~\nl\n");
        let mut reg = RuleRegistry::new();
        let n = load_rule_file(f.path(), &mut reg).unwrap();
        assert_eq!(n, 2);
    }

    #[test]
    fn duplicate_rule_is_not_reinserted() {
        let f = write_tmp("u\nu\n");
        let mut reg = RuleRegistry::new();
        let n = load_rule_file(f.path(), &mut reg).unwrap();
        assert_eq!(n, 1);
        assert_eq!(reg.size(), 1);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let mut reg = RuleRegistry::new();
        assert!(load_rule_file(Path::new("/no/such/rules.txt"), &mut reg).is_err());
    }

    #[test]
    fn crlf_line_endings_are_trimmed() {
        let f = write_tmp("u\r\nl\r\n");
        let mut reg = RuleRegistry::new();
        let n = load_rule_file(f.path(), &mut reg).unwrap();
        assert_eq!(n, 2);
    }
}
