//! Runs the post-validation steps of one node

use futures_util::future::BoxFuture;

use super::context::{Mode, ParseContext};
use super::walk::Checked;
use crate::issue::{Issue, IssueKind};
use crate::schema::{Callback, Step};
use crate::value::Value;

const ASYNC_IN_SYNC: &str =
    "Asynchronous refinement or transform encountered during synchronous parse; use parse_async";

/// Issue reported when a synchronous parse reaches an asynchronous step.
pub(crate) fn async_in_sync_issue() -> Issue {
    Issue::new(IssueKind::ConfigurationError {
        reason: ASYNC_IN_SYNC.to_string(),
    })
}

/// Runs an asynchronous callback under the context's mode.
///
/// Synchronous parses never invoke the callback: they halt with a
/// configuration error. A cancelled parse yields no issues; the caller
/// reports the cancellation.
async fn run_async<T>(
    ctx: &ParseContext,
    start: impl FnOnce() -> BoxFuture<'static, T>,
) -> Result<T, Vec<Issue>> {
    if ctx.mode == Mode::Sync {
        ctx.halt();
        return Err(vec![async_in_sync_issue()]);
    }
    ctx.await_step(start()).await.ok_or_else(Vec::new)
}

/// Applies `steps` to a value that passed its base rule.
///
/// Refinements accumulate issues and keep going. A transform only runs
/// on a clean value; once issues exist the pipeline stops there.
pub(crate) async fn run_steps(steps: &[Step], value: Value, ctx: &ParseContext) -> Checked {
    let mut value = value;
    let mut issues = Vec::new();

    for step in steps {
        match step {
            Step::Default(_) => {}
            Step::Refine { check, params } => {
                let passed = match check {
                    Callback::Sync(f) => f(&value),
                    Callback::Async(f) => run_async(ctx, || f(value.clone())).await?,
                };
                if !passed {
                    issues.push(params.to_issue());
                }
            }
            Step::SuperRefine(refiner) => {
                let raised = match refiner {
                    Callback::Sync(f) => f(&value),
                    Callback::Async(f) => run_async(ctx, || f(value.clone())).await?,
                };
                issues.extend(raised.into_iter().map(|custom| custom.into_issue()));
            }
            Step::Transform(transformer) => {
                if !issues.is_empty() {
                    return Err(issues);
                }
                let input = std::mem::replace(&mut value, Value::Undefined);
                let outcome = match transformer {
                    Callback::Sync(f) => f(input),
                    Callback::Async(f) => run_async(ctx, || f(input)).await?,
                };
                match outcome {
                    Ok(next) => value = next,
                    Err(raised) if raised.is_empty() => {
                        return Err(vec![Issue::new(IssueKind::custom())]);
                    }
                    Err(raised) => {
                        return Err(raised.into_iter().map(|c| c.into_issue()).collect());
                    }
                }
            }
        }
    }

    if issues.is_empty() {
        Ok(value)
    } else {
        Err(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::IssueCode;
    use crate::schema::{number, string, CustomIssue, SchemaExt};
    use futures_util::FutureExt;

    fn steps_of(schema: &crate::schema::Schema) -> &[Step] {
        &schema.node().steps
    }

    #[test]
    fn test_refinements_accumulate() {
        let schema = number()
            .refine(|v| v.as_f64().map_or(false, |n| n > 10.0), "too low")
            .refine(|v| v.as_f64().map_or(false, |n| n % 2.0 == 0.0), "odd");
        let ctx = ParseContext::new(Mode::Sync, None);
        let issues = run_steps(steps_of(&schema), Value::from(3), &ctx)
            .now_or_never()
            .unwrap()
            .unwrap_err();
        let messages: Vec<_> = issues.iter().map(|i| i.message.as_str()).collect();
        assert_eq!(messages, vec!["too low", "odd"]);
    }

    #[test]
    fn test_transform_skipped_after_failed_refinement() {
        let schema = string()
            .refine(|_| false, "rejected")
            .transform(|_| Value::from("replaced"));
        let ctx = ParseContext::new(Mode::Sync, None);
        let issues = run_steps(steps_of(&schema), Value::from("x"), &ctx)
            .now_or_never()
            .unwrap()
            .unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "rejected");
    }

    #[test]
    fn test_aborted_transform_reports_issues() {
        let schema = string().try_transform(|_| Err(vec![CustomIssue::new("Not a number")]));
        let ctx = ParseContext::new(Mode::Sync, None);
        let issues = run_steps(steps_of(&schema), Value::from("x"), &ctx)
            .now_or_never()
            .unwrap()
            .unwrap_err();
        assert_eq!(issues[0].message, "Not a number");

        let silent = string().try_transform(|_| Err(Vec::new()));
        let issues = run_steps(steps_of(&silent), Value::from("x"), &ctx)
            .now_or_never()
            .unwrap()
            .unwrap_err();
        assert_eq!(issues[0].code(), IssueCode::Custom);
    }

    #[test]
    fn test_async_step_halts_sync_parse() {
        let schema = string().refine_async(|_| async { true }, "never run");
        let ctx = ParseContext::new(Mode::Sync, None);
        let issues = run_steps(steps_of(&schema), Value::from("x"), &ctx)
            .now_or_never()
            .unwrap()
            .unwrap_err();
        assert_eq!(issues[0].code(), IssueCode::ConfigurationError);
        assert!(ctx.is_halted());
    }

    #[tokio::test]
    async fn test_async_transform_runs_in_async_mode() {
        let schema = string().transform_async(|v| async move {
            Ok(Value::from(v.as_str().unwrap_or_default().len()))
        });
        let ctx = ParseContext::new(Mode::Async, None);
        let out = run_steps(steps_of(&schema), Value::from("four"), &ctx).await;
        assert_eq!(out.unwrap(), Value::from(4));
        assert_eq!(ctx.async_steps(), 1);
    }
}
