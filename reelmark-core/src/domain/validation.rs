//! Field-level validation results shared by every request payload.

use serde::Serialize;
use std::fmt;

/// One rejected field, reported back to the client verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// All violations found in a payload. Validation never stops at the first
/// problem so the client can fix everything in one round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid request payload")?;
        for (idx, violation) in self.violations.iter().enumerate() {
            let sep = if idx == 0 { ": " } else { "; " };
            write!(f, "{sep}{} {}", violation.field, violation.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Accumulates violations while a payload is being converted.
#[derive(Debug, Default)]
pub struct Violations {
    inner: Vec<FieldViolation>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.inner.push(FieldViolation::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns `value` when nothing was recorded.
    pub fn finish<T>(self, value: T) -> Result<T, ValidationError> {
        if self.inner.is_empty() {
            Ok(value)
        } else {
            Err(self.into_error())
        }
    }

    /// Converts whatever was recorded into an error. Callers use this when a
    /// required value could not be built at all.
    pub fn into_error(self) -> ValidationError {
        ValidationError {
            violations: self.inner,
        }
    }
}

/// Largest integer a JSON number can carry without precision loss.
pub const MAX_SAFE_SECONDS: f64 = 9_007_199_254_740_991.0;

/// Rounds a client-reported second count, recording a violation for negative,
/// non-finite or oversized values.
pub fn seconds_field(
    violations: &mut Violations,
    field: &str,
    value: f64,
) -> i64 {
    if !value.is_finite() {
        violations.push(field, "must be a finite number");
        return 0;
    }
    let rounded = value.round();
    if rounded < 0.0 {
        violations.push(field, "must not be negative");
        return 0;
    }
    if rounded > MAX_SAFE_SECONDS {
        violations.push(field, "is too large");
        return 0;
    }
    rounded as i64
}

/// Season and episode numbers arrive as JSON numbers; only whole values that
/// fit an `i32` are accepted.
pub fn ordinal_field(
    violations: &mut Violations,
    field: &str,
    value: Option<f64>,
) -> Option<i32> {
    let value = value?;
    if !value.is_finite() || value.fract() != 0.0 {
        violations.push(field, "must be a whole number");
        return None;
    }
    if value < f64::from(i32::MIN) || value > f64::from(i32::MAX) {
        violations.push(field, "is out of range");
        return None;
    }
    Some(value as i32)
}

/// Client identifiers must be printable; control characters are reserved.
pub fn identifier_field(
    violations: &mut Violations,
    field: &str,
    value: Option<&str>,
) {
    if let Some(value) = value
        && value.chars().any(char::is_control)
    {
        violations.push(field, "must not contain control characters");
    }
}
