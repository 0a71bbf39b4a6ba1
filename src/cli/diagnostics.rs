//! Diagnostic line formatting (spec §6.3).
//!
//! Grounded in the reference `hcre.c` main loop, which printed
//! `fprintf(stderr, "%s:%d: %s: %s\n", file, line, text, message)` for a
//! malformed rule at load time, and a similar one-liner for a rule that
//! broke at runtime. This module only formats; callers write the result to
//! stderr via [`crate::displaylevel`].

use crate::error::RuleError;

/// A malformed rule encountered during rule-file ingestion (spec §6.3's
/// load-time diagnostic: `(file, line, original_text, message)`).
pub fn load_failure(file: &str, line: usize, text: &str, err: &RuleError) -> String {
    format!("{}:{}: {}: {}", file, line, text, err.message())
}

/// A rule that parsed successfully but broke at runtime on some word (spec
/// §6.3's apply-time diagnostic and §7's eviction policy).
pub fn runtime_failure(word: &str, rule_text: &str, canonical: &str, err: &RuleError) -> String {
    format!(
        "word {:?}: rule {:?} (parsed {:?}): {} — rule removed from registry",
        word,
        rule_text,
        canonical,
        err.message()
    )
}

/// A rule whose canonical bytes duplicate one already loaded from
/// `prior_file:prior_line` (spec §4.5's duplicate-report contract).
pub fn duplicate_rule(file: &str, line: usize, text: &str, prior_file: &str, prior_line: usize) -> String {
    format!(
        "{}:{}: {}: duplicate of rule already loaded from {}:{}",
        file, line, text, prior_file, prior_line
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn load_failure_includes_file_line_text_and_message() {
        let err = RuleError::new(ErrorKind::UnknownRuleOp, b'~', 0);
        let msg = load_failure("rules.txt", 12, "~", &err);
        assert!(msg.starts_with("rules.txt:12: ~: "));
        assert!(msg.contains("unknown rule operation"));
    }

    #[test]
    fn duplicate_rule_names_both_locations() {
        let msg = duplicate_rule("b.rule", 3, "lu", "a.rule", 1);
        assert!(msg.contains("a.rule:1"));
        assert!(msg.contains("b.rule:3"));
    }
}
