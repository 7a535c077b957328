//! Value-to-value rewrites applied between parsing and encoding.
//!
//! Filters implement the [`Filter`] trait and compose positionally through
//! a [`FilterChain`]: the caller's order is the execution order, order is
//! observable (depth-before-truncate differs from truncate-before-depth on
//! nested arrays), and the chain short-circuits on the first error.

mod depth;
mod include;
mod truncate;

pub use depth::MaxDepthFilter;
pub use include::{IncludeFilter, PathExpr};
pub use truncate::{TruncateFilter, TruncateStrategy, TruncationSummary};

use std::fmt;

use crate::{FilterSpec, Result, Value};

/// Trait for value filters.
///
/// A filter takes ownership of the value and returns a new root; it holds
/// no per-invocation state and is safe to share across threads.
pub trait Filter: Send + Sync {
    /// Apply the filter to a value.
    ///
    /// # Errors
    ///
    /// Returns a [`FilterError`](crate::FilterError) if filtering fails.
    fn apply(&self, value: Value) -> Result<Value>;
}

/// A chain of filters applied in sequence.
#[derive(Default)]
pub struct FilterChain {
    filters: Vec<Box<dyn Filter>>,
}

impl fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterChain")
            .field("filters", &format!("[{} filters]", self.filters.len()))
            .finish()
    }
}

impl FilterChain {
    /// Creates a new empty filter chain.
    #[must_use]
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Resolves filter specs into a chain, validating everything up front.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidPath`](crate::FilterError::InvalidPath)
    /// for any malformed path expression; nothing fails lazily later.
    pub fn from_specs(specs: &[FilterSpec], strict: bool) -> Result<Self> {
        let mut chain = Self::new();
        for spec in specs {
            match spec {
                FilterSpec::Include { path } => {
                    chain.add(IncludeFilter::new(path)?);
                }
                FilterSpec::MaxDepth { depth } => {
                    chain.add(MaxDepthFilter::new(*depth as usize));
                }
                FilterSpec::Truncate {
                    max_items,
                    max_string_length,
                    strategy,
                    preserve,
                    seed,
                } => {
                    let mut filter = TruncateFilter::new().with_strategy(*strategy);
                    if let Some(n) = max_items {
                        filter = filter.with_max_items(*n as usize);
                    }
                    if let Some(n) = max_string_length {
                        filter = filter.with_max_string_length(*n as usize);
                    }
                    if let Some(seed) = seed {
                        filter = filter.with_seed(*seed);
                    }
                    for path in preserve {
                        filter = filter.with_preserve_path(path)?;
                    }
                    if strict {
                        filter = filter.strict();
                    }
                    chain.add(filter);
                }
            }
        }
        Ok(chain)
    }

    /// Adds a filter to the end of the chain.
    pub fn add<F: Filter + 'static>(&mut self, filter: F) {
        self.filters.push(Box::new(filter));
    }

    /// Returns `true` when no filters are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Number of filters in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }
}

impl Filter for FilterChain {
    fn apply(&self, mut value: Value) -> Result<Value> {
        for filter in &self.filters {
            value = filter.apply(value)?;
        }
        Ok(value)
    }
}
