//! Deferred values
//!
//! A `Promise` settles once and can be awaited any number of times from
//! any clone. Promise schemas never await at parse time: they hand back a
//! new promise whose settlement validates the resolved value.

use std::fmt;
use std::future::Future;

use futures_util::future::{self, BoxFuture, FutureExt, Shared};
use thiserror::Error;

use super::types::Value;
use crate::issue::ValidationError;

/// Outcome of awaiting a promise.
pub type Settled = Result<Value, Rejection>;

/// Reason a promise rejected.
#[derive(Debug, Clone, Error)]
pub enum Rejection {
    #[error("promise rejected: {0}")]
    Reason(String),

    #[error("promise resolved to an invalid value: {0}")]
    Invalid(ValidationError),
}

/// A shareable deferred value.
#[derive(Clone)]
pub struct Promise {
    inner: Shared<BoxFuture<'static, Settled>>,
}

impl Promise {
    pub fn new<F>(fut: F) -> Self
    where
        F: Future<Output = Settled> + Send + 'static,
    {
        Self {
            inner: fut.boxed().shared(),
        }
    }

    /// An already-resolved promise.
    pub fn resolve(value: impl Into<Value>) -> Self {
        Self::new(future::ready(Ok(value.into())))
    }

    /// An already-rejected promise.
    pub fn reject(reason: impl Into<String>) -> Self {
        Self::new(future::ready(Err(Rejection::Reason(reason.into()))))
    }

    /// Waits for the promise to settle.
    pub async fn settle(&self) -> Settled {
        self.inner.clone().await
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.inner.ptr_eq(&other.inner)
    }
}

impl fmt::Debug for Promise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Promise]")
    }
}

impl From<Promise> for Value {
    fn from(p: Promise) -> Self {
        Value::Promise(p)
    }
}
