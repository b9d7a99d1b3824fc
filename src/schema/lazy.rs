//! Deferred schemas for recursive structures
//!
//! A cached thunk runs at most once, on first use; the resolved schema
//! is kept in the shared cell so every clone sees the same node. An
//! uncached thunk runs on every use and keeps nothing it returns, so a
//! table entry that refers to itself does not own itself.

use std::fmt;
use std::sync::{Arc, OnceLock};

use super::types::{Kind, Schema};

type Thunk = dyn Fn() -> Schema + Send + Sync;

struct LazyCell {
    thunk: Box<Thunk>,
    /// `None` when resolution is repeated per use
    resolved: Option<OnceLock<Schema>>,
}

#[derive(Clone)]
pub struct LazySchema {
    cell: Arc<LazyCell>,
}

impl LazySchema {
    pub(crate) fn new<F>(thunk: F) -> Self
    where
        F: Fn() -> Schema + Send + Sync + 'static,
    {
        Self::with_cache(thunk, Some(OnceLock::new()))
    }

    /// Resolves on every use instead of once.
    pub(crate) fn uncached<F>(thunk: F) -> Self
    where
        F: Fn() -> Schema + Send + Sync + 'static,
    {
        Self::with_cache(thunk, None)
    }

    fn with_cache<F>(thunk: F, resolved: Option<OnceLock<Schema>>) -> Self
    where
        F: Fn() -> Schema + Send + Sync + 'static,
    {
        Self {
            cell: Arc::new(LazyCell {
                thunk: Box::new(thunk),
                resolved,
            }),
        }
    }

    /// The deferred schema, resolving it on first call (every call when
    /// uncached).
    pub fn schema(&self) -> Schema {
        match &self.cell.resolved {
            Some(cell) => cell.get_or_init(|| (self.cell.thunk)()).clone(),
            None => (self.cell.thunk)(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.cell
            .resolved
            .as_ref()
            .map_or(false, |cell| cell.get().is_some())
    }
}

impl fmt::Debug for LazySchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazySchema")
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

impl From<LazySchema> for Schema {
    fn from(lazy: LazySchema) -> Self {
        Schema::from_kind(Kind::Lazy(lazy))
    }
}
