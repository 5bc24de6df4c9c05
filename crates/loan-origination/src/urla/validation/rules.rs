use serde_json::{json, Value};

use super::fields::FieldChecks;
use super::report::{Violation, ViolationKind};
use crate::urla::model::{Application, EmploymentRecord};

/// Result of running one cross-field rule against one location in the document.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RuleOutcome {
    Passed,
    /// A prerequisite field was absent or failed its own check, so the rule did not run.
    Skipped { missing: Vec<String> },
    Failed(Violation),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RuleEvaluation {
    pub rule: &'static str,
    pub path: String,
    pub outcome: RuleOutcome,
}

pub(crate) struct CrossFieldRule {
    pub name: &'static str,
    evaluate: fn(&'static str, &Application, &FieldChecks) -> Vec<RuleEvaluation>,
}

impl CrossFieldRule {
    pub(crate) fn evaluate(
        &self,
        application: &Application,
        checks: &FieldChecks,
    ) -> Vec<RuleEvaluation> {
        (self.evaluate)(self.name, application, checks)
    }
}

/// Cross-field invariants, run in order. Every rule runs; none short-circuits another.
pub(crate) const RULES: &[CrossFieldRule] = &[
    CrossFieldRule {
        name: "dependents_ages_required",
        evaluate: dependents_ages_required,
    },
    CrossFieldRule {
        name: "bankruptcy_types_required",
        evaluate: bankruptcy_types_required,
    },
    CrossFieldRule {
        name: "income_total_covers_components",
        evaluate: income_total_covers_components,
    },
];

struct Check {
    rule: &'static str,
    path: String,
    prerequisites: Vec<String>,
}

impl Check {
    fn new(rule: &'static str, path: String, prerequisites: Vec<String>) -> Self {
        Self {
            rule,
            path,
            prerequisites,
        }
    }

    fn skipped(self, missing: Vec<String>) -> RuleEvaluation {
        RuleEvaluation {
            rule: self.rule,
            path: self.path,
            outcome: RuleOutcome::Skipped { missing },
        }
    }

    fn run(
        self,
        checks: &FieldChecks,
        test: impl FnOnce() -> Result<(), (String, Value)>,
    ) -> RuleEvaluation {
        let missing: Vec<String> = self
            .prerequisites
            .iter()
            .filter(|path| checks.failed(path))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return self.skipped(missing);
        }

        let outcome = match test() {
            Ok(()) => RuleOutcome::Passed,
            Err((message, value)) => RuleOutcome::Failed(Violation {
                path: self.path.clone(),
                rule: self.rule,
                kind: ViolationKind::Consistency,
                message,
                value,
            }),
        };

        RuleEvaluation {
            rule: self.rule,
            path: self.path,
            outcome,
        }
    }
}

fn dependents_ages_required(
    rule: &'static str,
    application: &Application,
    checks: &FieldChecks,
) -> Vec<RuleEvaluation> {
    let at = "borrower.personal_information";
    let info = &application.borrower.personal_information;
    let check = Check::new(
        rule,
        format!("{at}.dependents_ages"),
        vec![
            format!("{at}.dependents_number"),
            format!("{at}.dependents_ages"),
        ],
    );

    vec![check.run(checks, || {
        if info.dependents_number > 0 && info.dependents_ages.is_empty() {
            Err((
                "dependents_ages must be provided when dependents_number > 0".to_string(),
                json!(info.dependents_ages),
            ))
        } else {
            Ok(())
        }
    })]
}

fn bankruptcy_types_required(
    rule: &'static str,
    application: &Application,
    checks: &FieldChecks,
) -> Vec<RuleEvaluation> {
    let at = "borrower.declarations";
    let declarations = &application.borrower.declarations;
    let check = Check::new(
        rule,
        format!("{at}.bankruptcy_types"),
        vec![
            format!("{at}.declared_bankruptcy_past_7_years"),
            format!("{at}.bankruptcy_types"),
        ],
    );

    vec![check.run(checks, || {
        if declarations.declared_bankruptcy_past_7_years && declarations.bankruptcy_types.is_empty()
        {
            Err((
                "bankruptcy_types must be provided if declared_bankruptcy_past_7_years is true"
                    .to_string(),
                json!(declarations.bankruptcy_types),
            ))
        } else {
            Ok(())
        }
    })]
}

fn income_total_covers_components(
    rule: &'static str,
    application: &Application,
    checks: &FieldChecks,
) -> Vec<RuleEvaluation> {
    let employment = &application.borrower.employment;
    let at = "borrower.employment";

    let mut records: Vec<(String, &EmploymentRecord)> =
        vec![(format!("{at}.current_employment"), &employment.current_employment)];
    records.extend(
        employment
            .additional_employment
            .iter()
            .enumerate()
            .map(|(index, record)| (format!("{at}.additional_employment[{index}]"), record)),
    );
    records.extend(
        employment
            .previous_employment
            .iter()
            .enumerate()
            .map(|(index, record)| (format!("{at}.previous_employment[{index}]"), record)),
    );

    records
        .into_iter()
        .map(|(record_path, record)| {
            let income_path = format!("{record_path}.gross_monthly_income");
            let check = Check::new(
                rule,
                format!("{income_path}.total"),
                vec![income_path.clone()],
            );

            let Some(income) = &record.gross_monthly_income else {
                return check.skipped(vec![income_path]);
            };

            check.run(checks, || {
                let Some(components) = income.components_sum() else {
                    return Err((
                        "income components exceed the largest supported amount".to_string(),
                        json!(income.total),
                    ));
                };
                if income.total < components {
                    Err((
                        format!(
                            "total income cannot be less than sum of income components ({components})"
                        ),
                        json!(income.total),
                    ))
                } else {
                    Ok(())
                }
            })
        })
        .collect()
}
