use serde::Serialize;
use serde_json::Value;

/// Broad class of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Wrong type or missing required field; the whole document is rejected.
    Structural,
    /// Value outside its allowed domain (negative money, month >= 12, unknown tag).
    Range,
    /// Fields that are individually valid but disagree with each other.
    Consistency,
}

/// One failed check, addressed by dotted path into the document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub path: String,
    pub rule: &'static str,
    pub kind: ViolationKind,
    pub message: String,
    pub value: Value,
}

/// Every violation found in a submitted document.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("application failed validation with {} violation(s)", .violations.len())]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Violations reported at exactly `path`. The query is copied, so it may be a temporary.
    pub fn at_path(&self, path: &str) -> impl Iterator<Item = &Violation> + '_ {
        let path = path.to_string();
        self.violations
            .iter()
            .filter(move |violation| violation.path == path)
    }

    pub fn has_rule(&self, rule: &str) -> bool {
        self.violations
            .iter()
            .any(|violation| violation.rule == rule)
    }

    pub fn of_kind(&self, kind: ViolationKind) -> impl Iterator<Item = &Violation> + '_ {
        self.violations
            .iter()
            .filter(move |violation| violation.kind == kind)
    }
}
