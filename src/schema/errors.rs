//! Schema construction errors
//!
//! Most builders are infallible. A discriminated union is checked when it
//! is built so that parse-time lookup never has to guess.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaBuildError {
    #[error("discriminated union on '{key}' needs at least one variant")]
    NoVariants { key: String },

    #[error("discriminated union variant {index} is not an object schema")]
    NotAnObject { index: usize },

    #[error("discriminated union variant {index} has no literal value for discriminator '{key}'")]
    MissingDiscriminator { index: usize, key: String },

    #[error("discriminator value {value} is used by more than one variant")]
    DuplicateDiscriminator { value: String },
}
