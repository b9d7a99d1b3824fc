//! Wrappers produced by function and promise schemas

use crate::issue::{Issue, IssueKind, ParseResult, ValidationError};
use crate::schema::{FunctionSchema, Schema};
use crate::value::{FunctionError, FunctionValue, Promise, Rejection, Value};

fn wrapped(kind: IssueKind) -> ValidationError {
    ValidationError::from_nonempty(vec![Issue::new(kind)])
}

/// Wraps `inner` so that every call validates its arguments against the
/// schema's argument tuple and its return value against the return
/// schema. Validation on both sides is synchronous.
pub fn validated_function(schema: FunctionSchema, inner: FunctionValue) -> FunctionValue {
    let args_schema: Schema = schema.args.into();
    let returns = schema.returns;

    FunctionValue::new(move |args: &[Value]| {
        let args = match args_schema.safe_parse(Value::Array(args.to_vec())) {
            ParseResult::Success(Value::Array(items)) => items,
            ParseResult::Success(other) => vec![other],
            ParseResult::Failure(err) => {
                return Err(FunctionError::InvalidArguments(wrapped(
                    IssueKind::InvalidArguments {
                        argument_issues: err.into_issues(),
                    },
                )));
            }
        };

        let out = inner.call(&args)?;

        match returns.safe_parse(out) {
            ParseResult::Success(value) => Ok(value),
            ParseResult::Failure(err) => Err(FunctionError::InvalidReturnType(wrapped(
                IssueKind::InvalidReturnType {
                    return_type_issues: err.into_issues(),
                },
            ))),
        }
    })
}

/// A promise that settles `source` and then validates the resolved value
/// asynchronously against `inner`.
pub(crate) fn validated_promise(inner: Schema, source: Promise) -> Promise {
    Promise::new(async move {
        let resolved = source.settle().await?;
        inner
            .safe_parse_async(resolved)
            .await
            .into_result()
            .map_err(Rejection::Invalid)
    })
}
