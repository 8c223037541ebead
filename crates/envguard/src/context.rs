//! Per-run accumulator of field errors and warnings.

use crate::{FieldError, FieldWarning};

/// Errors and warnings recorded during one resolution run.
///
/// Append-only; a fresh context is created for every run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationContext {
    errors: Vec<FieldError>,
    warnings: Vec<FieldWarning>,
}

impl ValidationContext {
    /// An empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error.
    pub fn push_error(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    /// Record a warning.
    pub fn push_warning(&mut self, warning: FieldWarning) {
        self.warnings.push(warning);
    }

    /// Error messages, in detection order.
    pub fn errors(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Warning messages, in detection order.
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }

    /// Recorded errors.
    pub fn error_details(&self) -> &[FieldError] {
        &self.errors
    }

    /// Recorded warnings.
    pub fn warning_details(&self) -> &[FieldWarning] {
        &self.warnings
    }

    /// Whether any error was recorded.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Whether any warning was recorded.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Consume the context.
    pub fn into_parts(self) -> (Vec<FieldError>, Vec<FieldWarning>) {
        (self.errors, self.warnings)
    }
}
