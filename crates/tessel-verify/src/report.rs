//! Validation result with severity-tagged findings.

use std::fmt;

use log::{error, info, warn};
use serde::Serialize;

/// Severity level of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARN"),
            Severity::Info => write!(f, "INFO"),
        }
    }
}

/// Append-only findings from one validation pass, in check order.
///
/// Only errors affect validity; warnings and infos are advisory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub infos: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        error!("[validation] {message}");
        self.errors.push(message);
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("[validation] {message}");
        self.warnings.push(message);
    }

    pub fn add_info(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!("[validation] {message}");
        self.infos.push(message);
    }

    pub fn add(&mut self, severity: Severity, message: impl Into<String>) {
        match severity {
            Severity::Error => self.add_error(message),
            Severity::Warning => self.add_warning(message),
            Severity::Info => self.add_info(message),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// All findings tagged with their severity: errors, then warnings, then infos.
    pub fn findings(&self) -> impl Iterator<Item = (Severity, &str)> {
        let errors = self.errors.iter().map(|m| (Severity::Error, m.as_str()));
        let warnings = self.warnings.iter().map(|m| (Severity::Warning, m.as_str()));
        let infos = self.infos.iter().map(|m| (Severity::Info, m.as_str()));
        errors.chain(warnings).chain(infos)
    }

    pub fn count(&self, severity: Severity) -> usize {
        match severity {
            Severity::Error => self.errors.len(),
            Severity::Warning => self.warnings.len(),
            Severity::Info => self.infos.len(),
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation Report:")?;
        if !self.errors.is_empty() {
            write!(f, "\n  Errors: {}", self.errors.len())?;
            for e in &self.errors {
                write!(f, "\n    - {e}")?;
            }
        }
        if !self.warnings.is_empty() {
            write!(f, "\n  Warnings: {}", self.warnings.len())?;
            for w in &self.warnings {
                write!(f, "\n    - {w}")?;
            }
        }
        if !self.infos.is_empty() {
            write!(f, "\n  Infos: {}", self.infos.len())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validity_tracks_errors_only() {
        let mut result = ValidationResult::new();
        result.add_warning("slow");
        result.add_info("note");
        assert!(result.is_valid());
        result.add_error("broken");
        assert!(!result.is_valid());
    }

    #[test]
    fn report_lists_errors_and_warnings_but_counts_infos() {
        let mut result = ValidationResult::new();
        result.add_error("Register file not generated");
        result.add_warning("Setup time may be too aggressive");
        result.add_info("NoC topology selected");
        assert_eq!(
            result.to_string(),
            "Validation Report:\n  Errors: 1\n    - Register file not generated\n  \
             Warnings: 1\n    - Setup time may be too aggressive\n  Infos: 1"
        );
    }

    #[test]
    fn empty_report_is_header_only() {
        assert_eq!(ValidationResult::new().to_string(), "Validation Report:");
    }

    #[test]
    fn findings_keep_order_within_severity() {
        let mut result = ValidationResult::new();
        result.add(Severity::Warning, "w1");
        result.add(Severity::Error, "e1");
        result.add(Severity::Warning, "w2");
        let tagged: Vec<_> = result.findings().collect();
        assert_eq!(
            tagged,
            vec![
                (Severity::Error, "e1"),
                (Severity::Warning, "w1"),
                (Severity::Warning, "w2")
            ]
        );
        assert_eq!(result.count(Severity::Warning), 2);
    }

    #[test]
    fn json_shape() {
        let mut result = ValidationResult::new();
        result.add_info("NoC topology selected");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["errors"].as_array().map(Vec::len), Some(0));
        assert_eq!(json["infos"][0], "NoC topology selected");
        assert_eq!(serde_json::to_value(Severity::Warning).unwrap(), "warning");
    }
}
