//! Input validation for roster runs.
//!
//! Checks structural integrity of reviewers and projects before scoring.
//! Detects:
//! - Empty or duplicate reviewer handles
//! - Duplicate project IDs
//! - History, ignored or preferred entries naming unknown reviewers
//!
//! The engine does not partially run on broken input: any error here
//! aborts the run.

use crate::models::{Project, Reviewer};
use std::collections::HashSet;
use std::fmt;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two reviewers share the same handle.
    DuplicateHandle,
    /// A reviewer has an empty handle.
    EmptyHandle,
    /// Two projects share the same ID.
    DuplicateProjectId,
    /// A project references a handle absent from the roster.
    UnknownReviewer,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validates reviewers and projects.
///
/// Checks:
/// 1. No empty reviewer handles
/// 2. No duplicate reviewer handles
/// 3. No duplicate project IDs
/// 4. Every handle in a project's history, ignored and preferred sets
///    resolves to a supplied reviewer
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(reviewers: &[Reviewer], projects: &[Project]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut handles = HashSet::new();
    for r in reviewers {
        if r.handle.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyHandle,
                format!("Reviewer from '{}' has an empty handle", r.organisation),
            ));
            continue;
        }
        if !handles.insert(r.handle.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateHandle,
                format!("Duplicate reviewer handle: {}", r.handle),
            ));
        }
    }

    let mut project_ids = HashSet::new();
    for p in projects {
        if !project_ids.insert(p.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateProjectId,
                format!("Duplicate project ID: {}", p.id),
            ));
        }

        // Report each unknown handle once per project
        let mut reported = HashSet::new();
        for handle in p.referenced_handles() {
            if !handles.contains(handle) && reported.insert(handle) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownReviewer,
                    format!("Project {} references unknown reviewer '{}'", p.id, handle),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
