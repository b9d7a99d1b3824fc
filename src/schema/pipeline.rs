//! Post-validation pipeline
//!
//! Steps run after the base rule succeeds, in attachment order:
//! - `Refine` checks a predicate and reports one issue when it fails
//! - `SuperRefine` returns any number of issues
//! - `Transform` replaces the value, or aborts with issues
//! - `Default` substitutes a value for an absent input
//!
//! Each callback is either synchronous or asynchronous. Issues raised by
//! callbacks are returned as values (`CustomIssue`), never pushed into a
//! shared context.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::{BoxFuture, FutureExt};

use super::builders;
use super::collections::ArraySchema;
use super::types::Schema;
use crate::issue::{Issue, IssueKind, PathSegment};
use crate::value::Value;

/// A callback that runs either inline or as a future.
pub(crate) enum Callback<S: ?Sized, A: ?Sized> {
    Sync(Arc<S>),
    Async(Arc<A>),
}

impl<S: ?Sized, A: ?Sized> Clone for Callback<S, A> {
    fn clone(&self) -> Self {
        match self {
            Callback::Sync(f) => Callback::Sync(Arc::clone(f)),
            Callback::Async(f) => Callback::Async(Arc::clone(f)),
        }
    }
}

pub(crate) type SyncPredicate = dyn Fn(&Value) -> bool + Send + Sync;
pub(crate) type AsyncPredicate = dyn Fn(Value) -> BoxFuture<'static, bool> + Send + Sync;
pub(crate) type Predicate = Callback<SyncPredicate, AsyncPredicate>;

pub(crate) type SyncRefiner = dyn Fn(&Value) -> Vec<CustomIssue> + Send + Sync;
pub(crate) type AsyncRefiner = dyn Fn(Value) -> BoxFuture<'static, Vec<CustomIssue>> + Send + Sync;
pub(crate) type Refiner = Callback<SyncRefiner, AsyncRefiner>;

/// Outcome of a transform: the new value, or the issues that abort it.
pub type TransformOutcome = Result<Value, Vec<CustomIssue>>;
pub(crate) type SyncTransformer = dyn Fn(Value) -> TransformOutcome + Send + Sync;
pub(crate) type AsyncTransformer =
    dyn Fn(Value) -> BoxFuture<'static, TransformOutcome> + Send + Sync;
pub(crate) type Transformer = Callback<SyncTransformer, AsyncTransformer>;

pub(crate) type DefaultFn = Arc<dyn Fn() -> Value + Send + Sync>;
pub(crate) type PreprocessFn = Arc<dyn Fn(Value) -> Value + Send + Sync>;

#[derive(Clone)]
pub(crate) enum Step {
    Refine {
        check: Predicate,
        params: RefineParams,
    },
    SuperRefine(Refiner),
    Transform(Transformer),
    Default(DefaultFn),
}

impl Step {
    pub(crate) fn is_async(&self) -> bool {
        matches!(
            self,
            Step::Refine {
                check: Callback::Async(_),
                ..
            } | Step::SuperRefine(Callback::Async(_))
                | Step::Transform(Callback::Async(_))
        )
    }
}

/// Message, path and params of the issue a failed `refine` reports.
#[derive(Debug, Clone, Default)]
pub struct RefineParams {
    pub message: Option<String>,
    /// Appended to the path of the refined value
    pub path: Vec<PathSegment>,
    pub params: BTreeMap<String, serde_json::Value>,
}

impl RefineParams {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn at(mut self, segment: impl Into<PathSegment>) -> Self {
        self.path.push(segment.into());
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.params.insert(key.into(), value);
        self
    }

    pub(crate) fn to_issue(&self) -> Issue {
        Issue::new(IssueKind::Custom {
            params: self.params.clone(),
        })
        .with_message(self.message.as_deref())
        .with_path(self.path.clone())
    }
}

impl From<&str> for RefineParams {
    fn from(message: &str) -> Self {
        RefineParams::message(message)
    }
}

impl From<String> for RefineParams {
    fn from(message: String) -> Self {
        RefineParams::message(message)
    }
}

/// An issue raised by a `super_refine` or `transform` callback.
#[derive(Debug, Clone)]
pub struct CustomIssue {
    kind: IssueKind,
    message: Option<String>,
    path: Vec<PathSegment>,
}

impl CustomIssue {
    /// A `custom` issue with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            kind: IssueKind::custom(),
            message: Some(message.into()),
            path: Vec::new(),
        }
    }

    /// An issue of any kind, e.g. `too_big`, with its default message.
    pub fn of(kind: IssueKind) -> Self {
        Self {
            kind,
            message: None,
            path: Vec::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Appends a segment below the value being refined.
    pub fn at(mut self, segment: impl Into<PathSegment>) -> Self {
        self.path.push(segment.into());
        self
    }

    pub(crate) fn into_issue(self) -> Issue {
        Issue::new(self.kind)
            .with_message(self.message.as_deref())
            .with_path(self.path)
    }
}

/// Pipeline and wrapper combinators for anything that converts into a
/// `Schema`.
pub trait SchemaExt: Into<Schema> + Sized {
    /// Reports one `custom` issue when `check` returns false.
    fn refine<F>(self, check: F, params: impl Into<RefineParams>) -> Schema
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.into().with_step(Step::Refine {
            check: Callback::Sync(Arc::new(check)),
            params: params.into(),
        })
    }

    fn refine_async<F, Fut>(self, check: F, params: impl Into<RefineParams>) -> Schema
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        self.into().with_step(Step::Refine {
            check: Callback::Async(Arc::new(move |v| check(v).boxed())),
            params: params.into(),
        })
    }

    /// Reports every issue `refine` returns.
    fn super_refine<F>(self, refine: F) -> Schema
    where
        F: Fn(&Value) -> Vec<CustomIssue> + Send + Sync + 'static,
    {
        self.into()
            .with_step(Step::SuperRefine(Callback::Sync(Arc::new(refine))))
    }

    fn super_refine_async<F, Fut>(self, refine: F) -> Schema
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Vec<CustomIssue>> + Send + 'static,
    {
        self.into().with_step(Step::SuperRefine(Callback::Async(Arc::new(
            move |v| refine(v).boxed(),
        ))))
    }

    /// Replaces the validated value.
    fn transform<F>(self, f: F) -> Schema
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.try_transform(move |v| Ok(f(v)))
    }

    /// Replaces the validated value, or aborts. An empty issue list still
    /// fails the parse.
    fn try_transform<F>(self, f: F) -> Schema
    where
        F: Fn(Value) -> TransformOutcome + Send + Sync + 'static,
    {
        self.into()
            .with_step(Step::Transform(Callback::Sync(Arc::new(f))))
    }

    fn transform_async<F, Fut>(self, f: F) -> Schema
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TransformOutcome> + Send + 'static,
    {
        self.into()
            .with_step(Step::Transform(Callback::Async(Arc::new(move |v| {
                f(v).boxed()
            }))))
    }

    /// Substitutes `value` when the input is absent.
    fn with_default(self, value: impl Into<Value>) -> Schema {
        let value = value.into();
        self.with_default_fn(move || value.clone())
    }

    fn with_default_fn<F>(self, f: F) -> Schema
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.into().with_step(Step::Default(Arc::new(f)))
    }

    fn optional(self) -> Schema {
        builders::optional(self)
    }

    fn nullable(self) -> Schema {
        builders::nullable(self)
    }

    /// Accepts both `null` and the absent value.
    fn nullish(self) -> Schema {
        builders::optional(builders::nullable(self))
    }

    fn array(self) -> ArraySchema {
        builders::array(self)
    }

    fn or(self, other: impl Into<Schema>) -> Schema {
        builders::union([self.into(), other.into()])
    }

    fn and(self, other: impl Into<Schema>) -> Schema {
        builders::intersection(self, other)
    }

    fn describe(self, text: impl Into<String>) -> Schema {
        self.into().with_description(text.into())
    }
}

impl<T: Into<Schema>> SchemaExt for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::IssueCode;

    #[test]
    fn test_refine_params_build_custom_issue() {
        let issue = RefineParams::message("Passwords don't match")
            .at("confirm")
            .to_issue();
        assert_eq!(issue.code(), IssueCode::Custom);
        assert_eq!(issue.message, "Passwords don't match");
        assert_eq!(issue.path_string(), "confirm");
    }

    #[test]
    fn test_custom_issue_keeps_kind_default_message() {
        let issue = CustomIssue::of(IssueKind::NotFinite).at(0).into_issue();
        assert_eq!(issue.code(), IssueCode::NotFinite);
        assert_eq!(issue.message, "Number must be finite");
        assert_eq!(issue.path_string(), "[0]");
    }

    #[test]
    fn test_async_steps_are_flagged() {
        let schema = builders::string().refine_async(|_| async { true }, "nope");
        assert!(schema.node().steps[0].is_async());
        let schema = builders::string().refine(|_| true, "nope");
        assert!(!schema.node().steps[0].is_async());
    }
}
