//! Settings validation utilities

use crate::schema::ManagerSettings;
use std::collections::HashSet;

/// Settings validator
pub struct SettingsValidator;

impl SettingsValidator {
    /// Validate complete settings
    pub fn validate(settings: &ManagerSettings) -> ValidationReport {
        let mut report = ValidationReport::new();
        Self::validate_files(settings, &mut report);
        report
    }

    fn validate_files(settings: &ManagerSettings, report: &mut ValidationReport) {
        if settings.files.is_empty() {
            report.add_error("files", "At least one env file must be configured");
            return;
        }

        let mut seen = HashSet::new();
        for (index, path) in settings.files.iter().enumerate() {
            if path.trim().is_empty() {
                report.add_error(&format!("files[{}]", index), "File path cannot be empty");
                continue;
            }
            if !seen.insert(path.as_str()) {
                report.add_warning(
                    &format!("files[{}]", index),
                    &format!("File {} is listed more than once", path),
                );
            }
        }
    }
}

/// Validation report containing errors and warnings
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

/// A validation issue (error or warning)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, field: &str, message: &str) {
        self.errors.push(ValidationIssue {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    pub fn summary(&self) -> String {
        format!("Validation: {} errors, {} warnings", self.errors.len(), self.warnings.len())
    }
}
