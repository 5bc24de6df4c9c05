//! Validation engine for URLA application documents.
//!
//! Raw JSON passes through four stages: structural decode, normalization, field-level range
//! checks, and the ordered cross-field rules in [`rules`]. All field checks and all rules run
//! before a verdict is returned, so one report carries every violation in the document.

mod fields;
mod report;
mod rules;

use std::ops::Deref;

use serde::Serialize;
use serde_json::Value;

use super::calculations::FinancialSummary;
use super::model::{Application, Borrower};
use fields::FieldChecks;

pub use fields::is_valid_email;
pub(crate) use fields::MAX_AMOUNT_UNITS;
pub use report::{ValidationReport, Violation, ViolationKind};
use rules::{RuleEvaluation, RuleOutcome, RULES};

/// An application that passed every check. Only shared access is handed out.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidatedApplication(Application);

impl ValidatedApplication {
    pub fn application(&self) -> &Application {
        &self.0
    }

    pub fn borrower(&self) -> &Borrower {
        &self.0.borrower
    }

    pub fn financial_summary(&self) -> FinancialSummary {
        FinancialSummary::from_borrower(&self.0.borrower)
    }

    pub fn into_inner(self) -> Application {
        self.0
    }
}

impl Deref for ValidatedApplication {
    type Target = Application;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Parse a JSON document body.
pub fn parse_str(raw: &str) -> Result<ValidatedApplication, ValidationReport> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let application: Application = serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|err| {
            let path = err.path().to_string();
            ValidationReport::new(vec![structural_violation(&path, err.inner())])
        })?;
    deserializer
        .end()
        .map_err(|err| ValidationReport::new(vec![structural_violation(".", &err)]))?;

    validate(application)
}

/// Decode, normalize, and validate a raw JSON value.
///
/// The value is re-read from its text form so every number reaches the decimal decoder as
/// the literal that was submitted, whatever its magnitude.
pub fn parse(raw: Value) -> Result<ValidatedApplication, ValidationReport> {
    parse_str(&raw.to_string())
}

/// Normalize and validate an already-decoded application.
pub fn validate(mut application: Application) -> Result<ValidatedApplication, ValidationReport> {
    application
        .borrower
        .personal_information
        .derive_other_borrowers_names();

    let checks = FieldChecks::run(&application);
    let rule_violations: Vec<Violation> = evaluate_rules(&application, &checks)
        .into_iter()
        .filter_map(|evaluation| match evaluation.outcome {
            RuleOutcome::Failed(violation) => Some(violation),
            RuleOutcome::Passed | RuleOutcome::Skipped { .. } => None,
        })
        .collect();

    let mut violations = checks.into_violations();
    violations.extend(rule_violations);

    if violations.is_empty() {
        Ok(ValidatedApplication(application))
    } else {
        Err(ValidationReport::new(violations))
    }
}

fn evaluate_rules(application: &Application, checks: &FieldChecks) -> Vec<RuleEvaluation> {
    RULES
        .iter()
        .flat_map(|rule| rule.evaluate(application, checks))
        .collect()
}

fn structural_violation(path: &str, err: &serde_json::Error) -> Violation {
    let path = document_path(path);
    let message = err.to_string();

    match unknown_variant(&message) {
        Some(tag) => Violation {
            path,
            rule: "closed_value_set",
            kind: ViolationKind::Range,
            value: Value::String(tag.to_string()),
            message,
        },
        None => Violation {
            path,
            rule: "document_shape",
            kind: ViolationKind::Structural,
            value: Value::Null,
            message,
        },
    }
}

/// Root is `$`. Arbitrary-precision numbers decode through a private map key that is not
/// part of the document, so that segment is dropped.
fn document_path(tracked: &str) -> String {
    let path = tracked
        .trim_end_matches(NUMBER_TOKEN)
        .trim_end_matches('.');
    if path.is_empty() {
        "$".to_string()
    } else {
        path.to_string()
    }
}

const NUMBER_TOKEN: &str = "$serde_json::private::Number";

fn unknown_variant(message: &str) -> Option<&str> {
    message
        .strip_prefix("unknown variant `")?
        .split('`')
        .next()
}
