//! Truncation filter: bound array lengths and string lengths.
//!
//! Arrays over `max_items` keep a subset chosen by a [`TruncateStrategy`];
//! strings over `max_string_length` are cut and marked with a `…` suffix.
//! Sub-trees matched by a preserve path pass through untouched. In strict
//! mode nothing is rewritten: the first limit violation is an error.

use std::collections::HashSet;

use rand::prelude::SliceRandom;
use rand::SeedableRng;

use crate::error::{FilterError, LimitKind};
use crate::{Result, Value, ValueMap};

use super::{Filter, PathExpr};

/// Suffix appended to cut strings. One scalar, so it fits any cap ≥ 1.
const TRUNCATION_SUFFIX: char = '…';

/// Default PRNG seed for the `sample` strategy; fixed for reproducibility.
const DEFAULT_SEED: u64 = 42;

/// Strategy for selecting which array items survive truncation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TruncateStrategy {
    /// Keep the first N items.
    #[default]
    Head,
    /// Keep the last N items.
    Tail,
    /// Keep ⌈N/2⌉ from the head and ⌊N/2⌋ from the tail.
    Balanced,
    /// Seeded random sample of N items, original order kept.
    Sample,
}

/// Counts of what a truncation pass removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TruncationSummary {
    /// Number of arrays that were shortened.
    pub arrays_truncated: usize,
    /// Total items removed from arrays.
    pub items_removed: usize,
    /// Number of strings that were cut.
    pub strings_truncated: usize,
    /// Total Unicode scalars removed from strings.
    pub chars_removed: usize,
}

impl TruncationSummary {
    /// Returns `true` if anything was removed.
    #[must_use]
    pub const fn was_truncated(&self) -> bool {
        self.arrays_truncated > 0 || self.strings_truncated > 0
    }

    /// Merge another summary into this one.
    pub fn merge(&mut self, other: &Self) {
        self.arrays_truncated += other.arrays_truncated;
        self.items_removed += other.items_removed;
        self.strings_truncated += other.strings_truncated;
        self.chars_removed += other.chars_removed;
    }
}

/// Filter that truncates arrays and strings to fit within limits.
#[derive(Debug, Clone)]
pub struct TruncateFilter {
    max_items: Option<usize>,
    max_string_length: Option<usize>,
    strategy: TruncateStrategy,
    preserve: Vec<PathExpr>,
    seed: u64,
    strict: bool,
}

impl Default for TruncateFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl TruncateFilter {
    /// Creates a truncation filter with no limits set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_items: None,
            max_string_length: None,
            strategy: TruncateStrategy::default(),
            preserve: Vec::new(),
            seed: DEFAULT_SEED,
            strict: false,
        }
    }

    /// Bounds every array to at most `max_items` elements.
    #[must_use]
    pub const fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = Some(max_items);
        self
    }

    /// Bounds every string to at most `max_length` Unicode scalars.
    #[must_use]
    pub const fn with_max_string_length(mut self, max_length: usize) -> Self {
        self.max_string_length = Some(max_length);
        self
    }

    /// Sets the array selection strategy.
    #[must_use]
    pub const fn with_strategy(mut self, strategy: TruncateStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Seeds the `sample` strategy PRNG.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Exempts every sub-tree matched by the path expression.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidPath`] if the expression does not
    /// compile.
    pub fn with_preserve_path(mut self, expression: &str) -> Result<Self> {
        self.preserve.push(PathExpr::compile(expression)?);
        Ok(self)
    }

    /// Turns limit violations into [`FilterError::LimitExceeded`] errors
    /// instead of rewrites.
    #[must_use]
    pub const fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Apply truncation and return both the result and a summary of what
    /// was removed.
    ///
    /// # Errors
    ///
    /// In strict mode, the first value over a limit aborts with
    /// [`FilterError::LimitExceeded`].
    pub fn apply_with_summary(&self, value: Value) -> Result<(Value, TruncationSummary)> {
        let preserved: HashSet<String> = self
            .preserve
            .iter()
            .flat_map(|expr| expr.matched_paths(&value))
            .collect();

        let mut summary = TruncationSummary::default();
        let result = self.truncate_value(value, "$", &preserved, &mut summary)?;
        Ok((result, summary))
    }

    fn truncate_value(
        &self,
        value: Value,
        path: &str,
        preserved: &HashSet<String>,
        summary: &mut TruncationSummary,
    ) -> Result<Value> {
        if preserved.contains(path) {
            return Ok(value);
        }

        match value {
            Value::Object(obj) => {
                let mut truncated = ValueMap::with_capacity(obj.len());
                for (k, v) in obj {
                    let child_path = format!("{path}.{k}");
                    truncated.insert(k, self.truncate_value(v, &child_path, preserved, summary)?);
                }
                Ok(Value::Object(truncated))
            }
            Value::Array(arr) => {
                let (kept, removed) = self.truncate_array(arr, path)?;
                if removed > 0 {
                    summary.arrays_truncated += 1;
                    summary.items_removed += removed;
                }

                let mut result = Vec::with_capacity(kept.len());
                for (i, v) in kept.into_iter().enumerate() {
                    let child_path = format!("{path}[{i}]");
                    result.push(self.truncate_value(v, &child_path, preserved, summary)?);
                }
                Ok(Value::Array(result))
            }
            Value::String(s) => match self.truncate_string(&s, path)? {
                Some((cut, removed)) => {
                    summary.strings_truncated += 1;
                    summary.chars_removed += removed;
                    Ok(Value::String(cut))
                }
                None => Ok(Value::String(s)),
            },
            other => Ok(other),
        }
    }

    /// Shorten an array using the configured strategy. Returns the kept
    /// elements and how many were removed.
    fn truncate_array(&self, arr: Vec<Value>, path: &str) -> Result<(Vec<Value>, usize)> {
        let Some(max_items) = self.max_items else {
            return Ok((arr, 0));
        };

        if arr.len() <= max_items {
            return Ok((arr, 0));
        }

        if self.strict {
            return Err(FilterError::LimitExceeded {
                kind: LimitKind::ArrayItems,
                at_path: path.to_string(),
                observed: arr.len(),
                limit: max_items,
            }
            .into());
        }

        let removed = arr.len() - max_items;

        let kept = match self.strategy {
            TruncateStrategy::Head => arr.into_iter().take(max_items).collect(),
            TruncateStrategy::Tail => arr.into_iter().skip(removed).collect(),
            TruncateStrategy::Balanced => {
                let head = max_items / 2 + max_items % 2;
                let tail = max_items / 2;
                let tail_items: Vec<Value> = arr.iter().skip(arr.len() - tail).cloned().collect();
                arr.into_iter().take(head).chain(tail_items).collect()
            }
            TruncateStrategy::Sample => {
                let mut rng = rand::rngs::StdRng::seed_from_u64(self.seed);
                let mut indices: Vec<usize> = (0..arr.len()).collect();
                indices.shuffle(&mut rng);
                indices.truncate(max_items);
                // Sampled items stay in their original order.
                indices.sort_unstable();
                let keep: HashSet<usize> = indices.into_iter().collect();
                arr.into_iter()
                    .enumerate()
                    .filter(|(i, _)| keep.contains(i))
                    .map(|(_, v)| v)
                    .collect()
            }
        };

        Ok((kept, removed))
    }

    /// Cut a string to the cap, in Unicode scalars. Returns the cut
    /// string and the number of scalars removed, or `None` when the
    /// string already fits.
    fn truncate_string(&self, s: &str, path: &str) -> Result<Option<(String, usize)>> {
        let Some(max_length) = self.max_string_length else {
            return Ok(None);
        };

        let total = s.chars().count();
        if total <= max_length {
            return Ok(None);
        }

        if self.strict {
            return Err(FilterError::LimitExceeded {
                kind: LimitKind::StringLength,
                at_path: path.to_string(),
                observed: total,
                limit: max_length,
            }
            .into());
        }

        // The suffix counts against the cap; it only appears when it fits.
        if max_length >= 1 {
            let keep = max_length - 1;
            let mut cut: String = s.chars().take(keep).collect();
            cut.push(TRUNCATION_SUFFIX);
            Ok(Some((cut, total - keep)))
        } else {
            Ok(Some((String::new(), total)))
        }
    }
}

impl Filter for TruncateFilter {
    fn apply(&self, value: Value) -> Result<Value> {
        let (result, _summary) = self.apply_with_summary(value)?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{value, Error};

    #[test]
    fn head_keeps_the_first_items() {
        let filter = TruncateFilter::new().with_max_items(3);
        let data = value!([1, 2, 3, 4, 5]);
        let (result, summary) = filter.apply_with_summary(data).unwrap();
        assert_eq!(result, value!([1, 2, 3]));
        assert_eq!(summary.items_removed, 2);
        assert_eq!(summary.arrays_truncated, 1);
    }

    #[test]
    fn tail_keeps_the_last_items() {
        let filter = TruncateFilter::new()
            .with_max_items(3)
            .with_strategy(TruncateStrategy::Tail);
        let data = value!([1, 2, 3, 4, 5]);
        let (result, _) = filter.apply_with_summary(data).unwrap();
        assert_eq!(result, value!([3, 4, 5]));
    }

    #[test]
    fn balanced_splits_head_heavy() {
        let filter = TruncateFilter::new()
            .with_max_items(3)
            .with_strategy(TruncateStrategy::Balanced);
        let data = value!([1, 2, 3, 4, 5, 6]);
        let (result, _) = filter.apply_with_summary(data).unwrap();
        // ⌈3/2⌉ = 2 from the head, ⌊3/2⌋ = 1 from the tail
        assert_eq!(result, value!([1, 2, 6]));
    }

    #[test]
    fn sample_is_deterministic_for_a_seed() {
        let data = value!([1, 2, 3, 4, 5, 6, 7, 8]);
        let filter = TruncateFilter::new()
            .with_max_items(3)
            .with_strategy(TruncateStrategy::Sample)
            .with_seed(7);

        let (first, _) = filter.apply_with_summary(data.clone()).unwrap();
        let (second, _) = filter.apply_with_summary(data.clone()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.as_array().unwrap().len(), 3);

        // Sampled elements keep their relative order.
        let picks: Vec<i64> = first
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_i64)
            .collect();
        let mut sorted = picks.clone();
        sorted.sort_unstable();
        assert_eq!(picks, sorted);
    }

    #[test]
    fn string_cut_is_scalar_aware() {
        let filter = TruncateFilter::new().with_max_string_length(5);
        let (result, summary) = filter
            .apply_with_summary(Value::from("héllo wörld"))
            .unwrap();
        // 4 scalars + the suffix = exactly the cap
        assert_eq!(result, Value::from("héll…"));
        assert_eq!(summary.strings_truncated, 1);
        assert_eq!(summary.chars_removed, 7);
    }

    #[test]
    fn string_within_cap_is_untouched() {
        let filter = TruncateFilter::new().with_max_string_length(5);
        let (result, summary) = filter.apply_with_summary(Value::from("hello")).unwrap();
        assert_eq!(result, Value::from("hello"));
        assert!(!summary.was_truncated());
    }

    #[test]
    fn zero_cap_cuts_to_empty_without_suffix() {
        let filter = TruncateFilter::new().with_max_string_length(0);
        let (result, summary) = filter.apply_with_summary(Value::from("abc")).unwrap();
        assert_eq!(result, Value::from(""));
        assert_eq!(summary.chars_removed, 3);
    }

    #[test]
    fn truncation_recurses_and_sums() {
        let filter = TruncateFilter::new().with_max_items(2);
        let data = value!({
            "users": [1, 2, 3, 4],
            "logs": ["a", "b", "c"]
        });
        let (result, summary) = filter.apply_with_summary(data).unwrap();

        assert_eq!(result.get("users"), Some(&value!([1, 2])));
        assert_eq!(result.get("logs"), Some(&value!(["a", "b"])));
        assert_eq!(summary.arrays_truncated, 2);
        assert_eq!(summary.items_removed, 3);
    }

    #[test]
    fn preserve_paths_pass_through() {
        let filter = TruncateFilter::new()
            .with_max_items(1)
            .with_preserve_path("important")
            .unwrap();
        let data = value!({
            "important": [1, 2, 3],
            "other": ["a", "b", "c"]
        });
        let (result, summary) = filter.apply_with_summary(data).unwrap();

        assert_eq!(result.get("important"), Some(&value!([1, 2, 3])));
        assert_eq!(result.get("other"), Some(&value!(["a"])));
        assert_eq!(summary.arrays_truncated, 1);
    }

    #[test]
    fn preserve_protects_whole_subtrees() {
        let filter = TruncateFilter::new()
            .with_max_string_length(5)
            .with_preserve_path("metadata")
            .unwrap();
        let data = value!({
            "metadata": {"description": "a rather long description"},
            "title": "a rather long title"
        });
        let (result, summary) = filter.apply_with_summary(data).unwrap();

        assert_eq!(
            result.get("metadata").and_then(|m| m.get("description")),
            Some(&Value::from("a rather long description"))
        );
        assert_eq!(result.get("title"), Some(&Value::from("a ra…")));
        assert_eq!(summary.strings_truncated, 1);
    }

    #[test]
    fn strict_mode_errors_instead_of_rewriting() {
        let filter = TruncateFilter::new().with_max_items(2).strict();
        let data = value!({"xs": [1, 2, 3]});
        let err = filter.apply(data).unwrap_err();
        match err {
            Error::Filter(FilterError::LimitExceeded {
                kind,
                at_path,
                observed,
                limit,
            }) => {
                assert_eq!(kind, LimitKind::ArrayItems);
                assert_eq!(at_path, "$.xs");
                assert_eq!(observed, 3);
                assert_eq!(limit, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn strict_mode_passes_when_nothing_would_change() {
        let filter = TruncateFilter::new()
            .with_max_items(5)
            .with_max_string_length(100)
            .strict();
        let data = value!({"xs": [1, 2, 3], "s": "short"});
        assert_eq!(filter.apply(data.clone()).unwrap(), data);
    }

    #[test]
    fn strict_mode_respects_preserve() {
        let filter = TruncateFilter::new()
            .with_max_items(1)
            .with_preserve_path("keep")
            .unwrap()
            .strict();
        let data = value!({"keep": [1, 2, 3]});
        assert_eq!(filter.apply(data.clone()).unwrap(), data);
    }

    #[test]
    fn summary_merge_adds_counts() {
        let mut a = TruncationSummary {
            arrays_truncated: 1,
            items_removed: 5,
            strings_truncated: 2,
            chars_removed: 100,
        };
        let b = TruncationSummary {
            arrays_truncated: 2,
            items_removed: 10,
            strings_truncated: 1,
            chars_removed: 50,
        };
        a.merge(&b);
        assert_eq!(a.arrays_truncated, 3);
        assert_eq!(a.items_removed, 15);
        assert_eq!(a.strings_truncated, 3);
        assert_eq!(a.chars_removed, 150);
    }
}
