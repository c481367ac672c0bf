//! Diagnostic types for error reporting.
//!
//! Every fallible stage of the generator returns [`CompilerError`], which
//! renders through miette in the CLI.

mod error;
mod span;

pub use error::CompilerError;
pub use span::Span;
