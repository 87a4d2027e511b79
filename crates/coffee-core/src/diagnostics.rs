//! Non-fatal issue tracking for parameter assembly.
//!
//! Not every oddity in a `PlanRequest` should turn into `InvalidInput` —
//! an office with no active distributors in range, or a tariff whose last
//! tier never binds, is worth surfacing without blocking the plan. This
//! mirrors the severity/category/entity shape used across the pack for
//! import and validation reporting.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticIssue {
    pub severity: Severity,
    pub category: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
}

impl DiagnosticIssue {
    pub fn new(severity: Severity, category: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            category: category.into(),
            message: message.into(),
            entity: None,
        }
    }

    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    pub issues: Vec<DiagnosticIssue>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_warning(&mut self, category: impl Into<String>, message: impl Into<String>) {
        self.issues
            .push(DiagnosticIssue::new(Severity::Warning, category, message));
    }

    pub fn add_warning_with_entity(
        &mut self,
        category: impl Into<String>,
        message: impl Into<String>,
        entity: impl Into<String>,
    ) {
        self.issues.push(
            DiagnosticIssue::new(Severity::Warning, category, message).with_entity(entity),
        );
    }

    pub fn add_error(&mut self, category: impl Into<String>, message: impl Into<String>) {
        self.issues
            .push(DiagnosticIssue::new(Severity::Error, category, message));
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}
