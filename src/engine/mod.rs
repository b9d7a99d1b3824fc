//! Validation engine
//!
//! Walks a value against a schema and produces either the output value
//! or every issue found, with full paths.
//!
//! # Entry points
//!
//! | call                     | async steps          | outcome                         |
//! |--------------------------|----------------------|---------------------------------|
//! | `safe_parse`             | configuration error  | `ParseResult`                   |
//! | `parse`                  | configuration error  | `Result<Value, ValidationError>`|
//! | `safe_parse_async`       | awaited              | `ParseResult`                   |
//! | `parse_async`            | awaited              | `Result<Value, ValidationError>`|
//! | `safe_parse_async_with`  | awaited, cancellable | `Result<ParseResult, ParseError>`|
//! | `parse_async_with`       | awaited, cancellable | `Result<Value, ParseError>`     |
//!
//! Every entry point counts into the process-wide metrics and logs one
//! event per call.

mod coerce;
mod context;
pub(crate) mod formats;
mod function;
mod leaf;
mod merge;
mod pipeline;
mod walk;

pub use context::CancelSignal;
pub use function::validated_function;

use futures_util::FutureExt;

use crate::issue::{Issue, IssueCode, IssueKind, ParseError, ParseResult, ValidationError};
use crate::observability::{log_event_with_fields, metrics, Event, Logger};
use crate::schema::Schema;
use crate::value::Value;
use context::{Mode, ParseContext};
use walk::{walk, Checked};

/// Turns the walk's outcome into a result, recording it.
fn conclude(schema: &Schema, checked: Checked, ctx: &ParseContext) -> ParseResult {
    let m = metrics();
    m.increment_parses();
    if ctx.mode == Mode::Async {
        m.increment_async_parses();
    }

    let mut issues = match checked {
        Ok(value) => {
            m.increment_successes();
            if Logger::enabled(Event::ParseComplete.severity()) {
                log_event_with_fields(
                    Event::ParseComplete,
                    &[("schema", schema.kind_name()), ("mode", ctx.mode.as_str())],
                );
            }
            return ParseResult::Success(value);
        }
        Err(issues) => issues,
    };

    if ctx.is_halted() {
        // only the configuration error is meaningful once the walk halted
        issues.retain(|issue| issue.code() == IssueCode::ConfigurationError);
        m.increment_configuration_errors();
        let path = issues.first().map(Issue::path_string).unwrap_or_default();
        log_event_with_fields(
            Event::AsyncStepInSyncParse,
            &[("schema", schema.kind_name()), ("path", path.as_str())],
        );
    }
    if issues.is_empty() {
        issues.push(Issue::new(IssueKind::custom()));
    }

    m.record_failure(issues.len() as u64);
    if Logger::enabled(Event::ParseRejected.severity()) {
        let count = issues.len().to_string();
        log_event_with_fields(
            Event::ParseRejected,
            &[
                ("schema", schema.kind_name()),
                ("mode", ctx.mode.as_str()),
                ("issues", count.as_str()),
                ("first_code", issues[0].code().as_str()),
            ],
        );
    }
    ParseResult::Failure(ValidationError::from_nonempty(issues))
}

fn run_sync(schema: &Schema, value: Value) -> ParseResult {
    let ctx = ParseContext::new(Mode::Sync, None);
    // asynchronous steps halt a synchronous walk before awaiting anything,
    // so the walk always completes on its first poll
    let checked = walk(schema, value, &ctx).now_or_never().unwrap_or_else(|| {
        ctx.halt();
        Err(vec![pipeline::async_in_sync_issue()])
    });
    conclude(schema, checked, &ctx)
}

async fn run_async(
    schema: &Schema,
    value: Value,
    cancel: Option<CancelSignal>,
) -> Result<ParseResult, ParseError> {
    let ctx = ParseContext::new(Mode::Async, cancel);
    let checked = walk(schema, value, &ctx).await;
    if ctx.is_cancelled() {
        let m = metrics();
        m.increment_parses();
        m.increment_async_parses();
        m.increment_cancellations();
        let steps = ctx.async_steps().to_string();
        log_event_with_fields(
            Event::ParseCancelled,
            &[("schema", schema.kind_name()), ("async_steps", steps.as_str())],
        );
        return Err(ParseError::Cancelled);
    }
    Ok(conclude(schema, checked, &ctx))
}

impl Schema {
    /// Validates synchronously; never panics on invalid input.
    ///
    /// An asynchronous refinement or transform anywhere on the walked path
    /// fails the parse with a single `configuration_error` issue.
    pub fn safe_parse(&self, value: impl Into<Value>) -> ParseResult {
        run_sync(self, value.into())
    }

    pub fn parse(&self, value: impl Into<Value>) -> Result<Value, ValidationError> {
        self.safe_parse(value).into_result()
    }

    /// Validates, awaiting asynchronous steps in attachment order.
    pub async fn safe_parse_async(&self, value: impl Into<Value>) -> ParseResult {
        match run_async(self, value.into(), None).await {
            Ok(result) => result,
            // no signal, nothing can cancel
            Err(_) => ParseResult::Failure(ValidationError::from_nonempty(vec![Issue::new(
                IssueKind::custom(),
            )])),
        }
    }

    pub async fn parse_async(&self, value: impl Into<Value>) -> Result<Value, ValidationError> {
        self.safe_parse_async(value).await.into_result()
    }

    /// Like `safe_parse_async`, abandoning the parse at the next
    /// asynchronous step once `cancel` fires. Returns
    /// `Err(ParseError::Cancelled)` only for cancellation.
    pub async fn safe_parse_async_with(
        &self,
        value: impl Into<Value>,
        cancel: &CancelSignal,
    ) -> Result<ParseResult, ParseError> {
        run_async(self, value.into(), Some(cancel.clone())).await
    }

    pub async fn parse_async_with(
        &self,
        value: impl Into<Value>,
        cancel: &CancelSignal,
    ) -> Result<Value, ParseError> {
        let result = self.safe_parse_async_with(value, cancel).await?;
        Ok(result.into_result()?)
    }
}

/// `schema.parse(value)`
pub fn parse(schema: &Schema, value: impl Into<Value>) -> Result<Value, ValidationError> {
    schema.parse(value)
}

/// `schema.safe_parse(value)`
pub fn safe_parse(schema: &Schema, value: impl Into<Value>) -> ParseResult {
    schema.safe_parse(value)
}

/// `schema.parse_async(value)`
pub async fn parse_async(schema: &Schema, value: impl Into<Value>) -> Result<Value, ValidationError> {
    schema.parse_async(value).await
}

/// `schema.safe_parse_async(value)`
pub async fn safe_parse_async(schema: &Schema, value: impl Into<Value>) -> ParseResult {
    schema.safe_parse_async(value).await
}
