use crate::core::normalize::{is_blank, normalize};
use crate::domain::model::ReconciliationResult;
use std::collections::HashMap;

/// Normalized key -> original string, in first-seen key order.
///
/// When two originals share a key the later one replaces the stored string
/// (last-write-wins) but the key keeps its original position.
#[derive(Debug, Default)]
struct KeyedNames {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
    total: usize,
}

impl KeyedNames {
    fn build<S: AsRef<str>>(names: &[S]) -> Self {
        let mut keyed = Self::default();

        for name in names {
            let original = name.as_ref();
            if is_blank(original) {
                continue;
            }
            keyed.total += 1;

            let key = normalize(original);
            match keyed.index.get(&key) {
                Some(&position) => {
                    tracing::trace!(
                        "collision on {:?}: {:?} replaces {:?}",
                        key,
                        original,
                        keyed.entries[position].1
                    );
                    keyed.entries[position].1 = original.to_string();
                }
                None => {
                    keyed.index.insert(key.clone(), keyed.entries.len());
                    keyed.entries.push((key, original.to_string()));
                }
            }
        }

        keyed
    }

    fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Compare two filename collections after normalization.
///
/// Every normalized key lands in exactly one of `matched`, `only_in_a` or
/// `only_in_b`; matched entries carry source A's original string. Blank
/// entries are ignored everywhere, including the totals.
pub fn reconcile<A, B>(source_a: &[A], source_b: &[B]) -> ReconciliationResult
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    let norm_a = KeyedNames::build(source_a);
    let norm_b = KeyedNames::build(source_b);

    let mut matched = Vec::new();
    let mut only_in_a = Vec::new();
    for (key, original) in &norm_a.entries {
        if norm_b.contains(key) {
            matched.push(original.clone());
        } else {
            only_in_a.push(original.clone());
        }
    }

    let only_in_b: Vec<String> = norm_b
        .entries
        .iter()
        .filter(|(key, _)| !norm_a.contains(key))
        .map(|(_, original)| original.clone())
        .collect();

    ReconciliationResult {
        matched_count: matched.len(),
        total_a: norm_a.total,
        unique_a: norm_a.len(),
        total_b: norm_b.total,
        unique_b: norm_b.len(),
        matched,
        only_in_a,
        only_in_b,
    }
}
