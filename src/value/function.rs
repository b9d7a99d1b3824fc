//! Callable values
//!
//! A `FunctionValue` is a shared native closure over `Value` arguments.
//! Function schemas wrap one callable in another that validates arguments
//! and the return value on every call.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use super::types::Value;
use crate::issue::ValidationError;

/// Signature of a native callable.
pub type NativeFn = dyn Fn(&[Value]) -> Result<Value, FunctionError> + Send + Sync;

/// Failure of a call through a `FunctionValue`.
#[derive(Debug, Clone, Error)]
pub enum FunctionError {
    #[error("invalid function arguments: {0}")]
    InvalidArguments(ValidationError),

    #[error("invalid function return type: {0}")]
    InvalidReturnType(ValidationError),

    #[error("function failed: {0}")]
    Failed(String),
}

/// A shared callable value.
#[derive(Clone)]
pub struct FunctionValue {
    inner: Arc<NativeFn>,
}

impl FunctionValue {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, FunctionError> + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// Invokes the callable.
    pub fn call(&self, args: &[Value]) -> Result<Value, FunctionError> {
        (self.inner)(args)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Function]")
    }
}

impl From<FunctionValue> for Value {
    fn from(f: FunctionValue) -> Self {
        Value::Function(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_native() {
        let len = FunctionValue::new(|args| match args.first() {
            Some(Value::String(s)) => Ok(Value::Number(s.len() as f64)),
            _ => Err(FunctionError::Failed("expected a string".into())),
        });
        assert_eq!(len.call(&[Value::from("abc")]).unwrap(), Value::Number(3.0));
        assert!(len.call(&[]).is_err());
    }

    #[test]
    fn test_identity_equality() {
        let f = FunctionValue::new(|_| Ok(Value::Undefined));
        let g = FunctionValue::new(|_| Ok(Value::Undefined));
        assert!(f.ptr_eq(&f.clone()));
        assert!(!f.ptr_eq(&g));
    }
}
