//! Property-based tests for determinism guarantees

use dirsnap::template::render_str;
use dirsnap::tree::hasher::compute_hash;
use dirsnap::tree::matcher::{ExclusionPattern, PatternPolicy};
use dirsnap::{ContentId, Value, Variables};
use proptest::prelude::*;
use std::collections::BTreeMap;

proptest! {
    /// The identifier does not depend on the order entries are supplied in
    #[test]
    fn content_id_ignores_input_order(
        entries in prop::collection::btree_map("[a-z]{1,8}(/[a-z]{1,8}){0,2}", any::<Vec<u8>>(), 0..16)
    ) {
        let forward = ContentId::from_pairs(entries.iter().map(|(k, v)| (k.as_str(), v)));
        let reverse = ContentId::from_pairs(entries.iter().rev().map(|(k, v)| (k.as_str(), v)));
        prop_assert_eq!(forward, reverse);
    }

    /// Changing one entry's content changes the identifier
    #[test]
    fn content_id_tracks_each_entry(
        entries in prop::collection::btree_map("[a-z]{1,8}", any::<Vec<u8>>(), 1..8),
        extra in any::<u8>()
    ) {
        let before = ContentId::from_pairs(entries.iter().map(|(k, v)| (k.as_str(), v)));

        let mut changed: BTreeMap<String, Vec<u8>> = entries.clone();
        if let Some(first) = changed.values_mut().next() {
            first.push(extra);
        }
        let after = ContentId::from_pairs(changed.iter().map(|(k, v)| (k.as_str(), v)));
        prop_assert_ne!(before, after);
    }

    #[test]
    fn compute_hash_is_deterministic(content in any::<Vec<u8>>()) {
        prop_assert_eq!(compute_hash(&content), compute_hash(&content));
    }

    /// Text with no `$` is never altered by rendering
    #[test]
    fn render_passes_plain_text_through(text in "[^$]*") {
        prop_assert_eq!(render_str(&text, &Variables::new()).unwrap(), text);
    }

    /// Integer sums render exactly
    #[test]
    fn render_integer_addition(a in 0i64..1_000_000, b in 0i64..1_000_000) {
        let mut vars = Variables::new();
        vars.insert("a".to_string(), Value::Int(a));
        let out = render_str(&format!("${{a + {b}}}"), &vars).unwrap();
        prop_assert_eq!(out, (a + b).to_string());
    }

    /// An empty exclusion pattern never excludes anything
    #[test]
    fn empty_pattern_excludes_nothing(path in "[a-z./]{0,24}") {
        let pattern = ExclusionPattern::compile("", PatternPolicy::Strict).unwrap();
        prop_assert!(!pattern.matches(&path));
    }
}
