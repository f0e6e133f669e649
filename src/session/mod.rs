//! Per-user session core: validation, translation, prompt resolution,
//! the single-flight generation run and result formatting.

pub mod context;
pub mod generation;
pub mod presenter;
pub mod resolver;
pub mod translation;
pub mod types;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

pub use context::*;
pub use presenter::{present, DisplayLine};
pub use resolver::resolve_generation_input;
pub use types::*;
pub use validation::{validate_constraints, validate_text_length, ConstraintCheck, TextLengthCheck};
