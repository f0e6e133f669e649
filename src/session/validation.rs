//! Input and decoding-parameter gates
//!
//! Both validators are pure. The text gate runs before every translation; the
//! constraint gate runs on every parameter change and again right before a run
//! is dispatched.

use std::ops::RangeInclusive;

use crate::error::{ConstraintError, InputError};
use crate::session::types::GenerationConstraints;

/// Hard prompt limit of the model, in characters
pub const MAX_INPUT_CHARS: usize = 2048;

pub const MIN_LENGTH_RANGE: RangeInclusive<u32> = 25..=250;
pub const MAX_LENGTH_RANGE: RangeInclusive<u32> = 50..=2048;
pub const NUM_SEQUENCES_RANGE: RangeInclusive<u32> = 1..=5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextLengthCheck {
    Empty,
    TooLong,
    Ok,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintCheck {
    Ok,
    MinExceedsMax,
}

pub fn validate_text_length(text: &str) -> TextLengthCheck {
    match text.chars().count() {
        0 => TextLengthCheck::Empty,
        n if n > MAX_INPUT_CHARS => TextLengthCheck::TooLong,
        _ => TextLengthCheck::Ok,
    }
}

/// [`validate_text_length`] as a `Result`, for gating the Translate action
pub fn check_text(text: &str) -> Result<(), InputError> {
    match validate_text_length(text) {
        TextLengthCheck::Ok => Ok(()),
        TextLengthCheck::Empty => Err(InputError::Empty),
        TextLengthCheck::TooLong => Err(InputError::TooLong {
            length: text.chars().count(),
        }),
    }
}

pub fn validate_constraints(min_length: u32, max_length: u32) -> ConstraintCheck {
    if min_length > max_length {
        ConstraintCheck::MinExceedsMax
    } else {
        ConstraintCheck::Ok
    }
}

fn check_range(
    field: &'static str,
    value: u32,
    range: &RangeInclusive<u32>,
) -> Result<(), ConstraintError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ConstraintError::OutOfRange {
            field,
            value,
            lower: *range.start(),
            upper: *range.end(),
        })
    }
}

/// Full check of a constraint set: field ranges first, then min <= max.
pub fn check_constraints(constraints: &GenerationConstraints) -> Result<(), ConstraintError> {
    check_range("min_length", constraints.min_length, &MIN_LENGTH_RANGE)?;
    check_range("max_length", constraints.max_length, &MAX_LENGTH_RANGE)?;
    check_range("num_sequences", constraints.num_sequences, &NUM_SEQUENCES_RANGE)?;

    match validate_constraints(constraints.min_length, constraints.max_length) {
        ConstraintCheck::Ok => Ok(()),
        ConstraintCheck::MinExceedsMax => Err(ConstraintError::MinExceedsMax {
            min: constraints.min_length,
            max: constraints.max_length,
        }),
    }
}
