use clap::Args;
use loan_origination::error::AppError;
use loan_origination::urla::{parse_str, urla_2021_v1_schema, FinancialSummary, ValidationReport};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ValidateArgs {
    /// Path to a URLA 2021 v1 JSON document
    pub(crate) file: PathBuf,
    /// Print the normalized document and summary as JSON instead of a text report
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn validate_file(args: ValidateArgs) -> Result<(), AppError> {
    let raw = std::fs::read_to_string(&args.file)?;

    match parse_str(&raw) {
        Ok(application) => {
            let summary = application.financial_summary();
            if args.json {
                let payload = serde_json::json!({
                    "application": application,
                    "summary": summary,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                print!("{}", render_summary(&application.application_id, &summary));
            }
            Ok(())
        }
        Err(report) => {
            eprint!("{}", render_violations(&report));
            Err(AppError::Validation(report))
        }
    }
}

pub(crate) fn print_schema() -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(&urla_2021_v1_schema())?);
    Ok(())
}

pub(crate) fn render_summary(application_id: &str, summary: &FinancialSummary) -> String {
    [
        format!("Application {application_id} is valid"),
        format!("  total monthly income: {}", summary.total_monthly_income),
        format!("  total monthly debt:   {}", summary.total_monthly_debt),
        format!("  debt-to-income ratio: {}", summary.dti_ratio.round_dp(4)),
        format!("  total assets:         {}", summary.total_assets),
        format!("  total liabilities:    {}", summary.total_liabilities),
    ]
    .into_iter()
    .map(|line| line + "\n")
    .collect()
}

pub(crate) fn render_violations(report: &ValidationReport) -> String {
    std::iter::once(report.to_string())
        .chain(report.violations.iter().map(|violation| {
            format!(
                "  [{:?}] {} ({}): {}",
                violation.kind, violation.path, violation.rule, violation.message
            )
        }))
        .map(|line| line + "\n")
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use loan_origination::urla::validation::{Violation, ViolationKind};
    use rust_decimal::Decimal;
    use serde_json::json;

    #[test]
    fn fixture_file_validates() {
        let path = PathBuf::from(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../../crates/loan-origination/tests/fixtures/urla_2021_v1.json"
        ));
        let result = validate_file(ValidateArgs {
            file: path,
            json: false,
        });
        assert!(result.is_ok());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = validate_file(ValidateArgs {
            file: PathBuf::from("/nonexistent/urla.json"),
            json: false,
        });
        assert!(matches!(result, Err(AppError::Io(_))));
    }

    #[test]
    fn violations_render_one_per_line() {
        let report = ValidationReport::new(vec![Violation {
            path: "borrower.declarations.bankruptcy_types".to_string(),
            rule: "bankruptcy_types_required",
            kind: ViolationKind::Consistency,
            message: "bankruptcy_types must be provided".to_string(),
            value: json!([]),
        }]);

        let rendered = render_violations(&report);
        assert!(rendered.starts_with("application failed validation with 1 violation(s)"));
        assert!(rendered.contains(
            "[Consistency] borrower.declarations.bankruptcy_types (bankruptcy_types_required)"
        ));
        assert_eq!(rendered.lines().count(), 2);
    }

    #[test]
    fn summary_lists_each_derivation_on_its_own_line() {
        let summary = FinancialSummary {
            total_monthly_income: Decimal::new(575050, 2),
            total_monthly_debt: Decimal::new(175025, 2),
            dti_ratio: Decimal::new(304364, 6),
            total_assets: Decimal::new(4000050, 2),
            total_liabilities: Decimal::new(1750000, 2),
        };

        let rendered = render_summary("APP-1", &summary);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Application APP-1 is valid",
                "  total monthly income: 5750.50",
                "  total monthly debt:   1750.25",
                "  debt-to-income ratio: 0.3044",
                "  total assets:         40000.50",
                "  total liabilities:    17500.00",
            ]
        );
    }
}
