//! Template rendering
//!
//! The snapshot builder only depends on the [`Renderer`] trait. [`Interpolator`]
//! is the bundled implementation: `${ ... }` interpolation with variable
//! references and arithmetic.

mod interpolate;
mod value;

pub use interpolate::{render_str, Interpolator};
pub use value::{Value, Variables};

use thiserror::Error;

/// Template evaluation failures. Always fatal to a snapshot build.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("content is not valid UTF-8 (first invalid byte at offset {valid_up_to})")]
    InvalidUtf8 { valid_up_to: usize },

    #[error("syntax error at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("unknown variable accessed: {name}")]
    UndefinedVariable { name: String },

    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow")]
    Overflow,
}

/// Renders raw file bytes with a set of variable bindings
pub trait Renderer: Send + Sync {
    fn render(&self, raw: &[u8], vars: &Variables) -> Result<String, RenderError>;
}
