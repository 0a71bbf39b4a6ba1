//! Rule registry: an insertion-ordered set of canonical rules keyed by their
//! canonical bytes (spec §4.5; component C5).
//!
//! Migrated from the `HASH_ADD`/`HASH_DEL`/`HASH_ITER` family over a
//! `uthash`-based table in rules.c (llamasoft/HashcatRulesEngine), which
//! hashed rule bytes as a NUL-terminated C string — unsound here since a
//! raw-byte operand can legitimately embed a NUL (spec §4.5's "full key
//! length, not a NUL-terminated prefix" requirement). This port uses
//! `xxhash-rust`'s XXH3 as the registry's `BuildHasher`, the same crate the
//! teacher links for fast, full-buffer hashing, carried over from
//! frame-checksum duty to key hashing.

use std::collections::HashMap;
use std::hash::{BuildHasherDefault, Hasher};

use xxhash_rust::xxh3::Xxh3;

use crate::rule::Rule;

/// An entry in the registry: the canonical rule plus enough provenance to
/// diagnose a duplicate-rule warning or a runtime-breakage removal (spec
/// §3's "Rule registry entry").
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    pub rule: Rule,
    pub source_file: String,
    pub source_line: usize,
    pub source_text: String,
}

/// `BuildHasher` over XXH3, fed the full key slice rather than a
/// length-prefixed or NUL-terminated view.
#[derive(Default)]
pub struct Xxh3Hasher(Xxh3);

impl Hasher for Xxh3Hasher {
    fn finish(&self) -> u64 {
        self.0.digest()
    }

    fn write(&mut self, bytes: &[u8]) {
        self.0.update(bytes);
    }
}

type Xxh3BuildHasher = BuildHasherDefault<Xxh3Hasher>;

/// Insertion order plus a map for O(1) dedup lookup. `order` is the
/// source of truth for iteration; `index` maps a canonical key to its
/// current position in `order`, kept in sync by every mutating method.
pub struct RuleRegistry {
    order: Vec<Option<RegistryEntry>>,
    index: HashMap<Vec<u8>, usize, Xxh3BuildHasher>,
    live: usize,
}

/// Outcome of attempting to insert a rule (spec §4.5's `insert(entry)`).
#[derive(Debug)]
pub enum InsertOutcome<'a> {
    Inserted,
    Duplicate(&'a RegistryEntry),
}

impl RuleRegistry {
    pub fn new() -> Self {
        RuleRegistry {
            order: Vec::new(),
            index: HashMap::with_hasher(Xxh3BuildHasher::default()),
            live: 0,
        }
    }

    /// Insert `entry` unless a key-equal rule is already present, in which
    /// case return the prior entry's provenance for a duplicate diagnostic
    /// (spec §4.5, §6.3) without mutating the registry.
    pub fn insert_if_absent(&mut self, entry: RegistryEntry) -> InsertOutcome<'_> {
        let key = entry.rule.canonical_bytes().to_vec();
        if let Some(&pos) = self.index.get(&key) {
            // `order[pos]` is guaranteed `Some` because `index` is purged of
            // any key whose slot is removed (see `remove`).
            return InsertOutcome::Duplicate(self.order[pos].as_ref().unwrap());
        }
        let pos = self.order.len();
        self.order.push(Some(entry));
        self.index.insert(key, pos);
        self.live += 1;
        InsertOutcome::Inserted
    }

    /// Remove the entry keyed by `rule`'s canonical bytes, if present.
    /// Leaves a tombstone in `order` so any in-flight
    /// [`RuleRegistry::iter_removable`] traversal stays valid (spec §4.5,
    /// §9's "iteration with deletion" design note).
    pub fn remove(&mut self, rule: &Rule) -> bool {
        let key = rule.canonical_bytes();
        if let Some(pos) = self.index.remove(key) {
            self.order[pos] = None;
            self.live -= 1;
            true
        } else {
            false
        }
    }

    pub fn size(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Iterate live entries in insertion order. Safe to call
    /// [`RuleRegistry::remove`] on the entry just yielded — or any other
    /// entry — from within the loop driving this iterator, since removal
    /// only tombstones a slot rather than shifting indices.
    pub fn iter_removable(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.order.iter().filter_map(|slot| slot.as_ref())
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::parser::parse;

    fn entry(text: &str, line: usize) -> RegistryEntry {
        RegistryEntry {
            rule: parse(text.as_bytes()).unwrap(),
            source_file: "rules.txt".to_string(),
            source_line: line,
            source_text: text.to_string(),
        }
    }

    #[test]
    fn insert_reports_duplicate_with_prior_provenance() {
        let mut reg = RuleRegistry::new();
        assert!(matches!(
            reg.insert_if_absent(entry("lu", 1)),
            InsertOutcome::Inserted
        ));
        match reg.insert_if_absent(entry("l:u", 2)) {
            InsertOutcome::Duplicate(prior) => assert_eq!(prior.source_line, 1),
            InsertOutcome::Inserted => panic!("l:u canonicalises the same as lu"),
        }
        assert_eq!(reg.size(), 1);
    }

    #[test]
    fn distinct_rules_both_insert() {
        let mut reg = RuleRegistry::new();
        reg.insert_if_absent(entry("u", 1));
        reg.insert_if_absent(entry("l", 2));
        assert_eq!(reg.size(), 2);
    }

    #[test]
    fn remove_then_reinsert_is_allowed() {
        let mut reg = RuleRegistry::new();
        reg.insert_if_absent(entry("u", 1));
        let rule = parse(b"u").unwrap();
        assert!(reg.remove(&rule));
        assert_eq!(reg.size(), 0);
        assert!(matches!(
            reg.insert_if_absent(entry("u", 7)),
            InsertOutcome::Inserted
        ));
    }

    #[test]
    fn iteration_survives_removal_of_current_entry() {
        let mut reg = RuleRegistry::new();
        reg.insert_if_absent(entry("u", 1));
        reg.insert_if_absent(entry("l", 2));
        reg.insert_if_absent(entry("c", 3));

        let to_remove: Vec<Rule> = reg
            .iter_removable()
            .filter(|e| e.source_line == 2)
            .map(|e| e.rule.clone())
            .collect();
        for r in &to_remove {
            reg.remove(r);
        }

        let remaining: Vec<usize> = reg.iter_removable().map(|e| e.source_line).collect();
        assert_eq!(remaining, vec![1, 3]);
    }

    #[test]
    fn keys_with_embedded_nul_are_distinguished() {
        // Raw-byte operands can legitimately carry 0x00; the registry must
        // not truncate at the first NUL the way a C-string hash would.
        let mut reg = RuleRegistry::new();
        let a = RegistryEntry {
            rule: Rule::from_canonical_bytes(vec![b'$', 0x00]),
            source_file: "f".into(),
            source_line: 1,
            source_text: "$\\x00".into(),
        };
        let b = RegistryEntry {
            rule: Rule::from_canonical_bytes(vec![b'$', 0x00, b'$', 0x01]),
            source_file: "f".into(),
            source_line: 2,
            source_text: "$\\x00$\\x01".into(),
        };
        reg.insert_if_absent(a);
        assert!(matches!(reg.insert_if_absent(b), InsertOutcome::Inserted));
        assert_eq!(reg.size(), 2);
    }
}
