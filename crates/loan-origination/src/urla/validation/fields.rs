use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde_json::json;

use super::report::{Violation, ViolationKind};
use crate::urla::model::{
    Application, AssetsAndLiabilitiesSection, Borrower, ContactInformation,
    EmploymentRecord, EmploymentSection, GrossMonthlyIncome, HousingAddress,
    LoanAndPropertySection, PersonalInformation, RealEstateSection,
};

/// Largest accepted monetary amount. Any realistic document can sum such amounts without
/// leaving the exact `Decimal` range.
pub(crate) const MAX_AMOUNT_UNITS: i64 = 1_000_000_000_000_000;

fn max_amount() -> Decimal {
    Decimal::from(MAX_AMOUNT_UNITS)
}

/// Field-level range checks. Records every failing path so cross-field rules can tell a
/// prerequisite that failed its own check from one that is simply valid.
#[derive(Debug, Default)]
pub(crate) struct FieldChecks {
    violations: Vec<Violation>,
    failed: BTreeSet<String>,
}

impl FieldChecks {
    pub(crate) fn run(application: &Application) -> Self {
        let mut checks = Self::default();
        checks.application(application);
        checks
    }

    pub(crate) fn into_violations(self) -> Vec<Violation> {
        self.violations
    }

    /// True when `path` or anything nested below it failed a field check.
    pub(crate) fn failed(&self, path: &str) -> bool {
        self.failed
            .range(path.to_string()..)
            .take_while(|failed| failed.starts_with(path))
            .any(|failed| {
                failed.len() == path.len()
                    || matches!(failed.as_bytes()[path.len()], b'.' | b'[')
            })
    }

    fn reject(&mut self, path: String, rule: &'static str, message: String, value: serde_json::Value) {
        self.failed.insert(path.clone());
        self.violations.push(Violation {
            path,
            rule,
            kind: ViolationKind::Range,
            message,
            value,
        });
    }

    fn money(&mut self, path: String, value: Decimal) {
        if value < Decimal::ZERO {
            self.reject(
                path,
                "non_negative_amount",
                "monetary amounts must be zero or greater".to_string(),
                json!(value),
            );
        } else if value > max_amount() {
            self.reject(
                path,
                "amount_ceiling",
                format!("monetary amounts must not exceed {}", max_amount()),
                json!(value),
            );
        }
    }

    fn optional_money(&mut self, path: String, value: Option<Decimal>) {
        if let Some(value) = value {
            self.money(path, value);
        }
    }

    fn count(&mut self, path: String, value: i32, minimum: i32) {
        if value < minimum {
            self.reject(
                path,
                "minimum_count",
                format!("value must be at least {minimum}"),
                json!(value),
            );
        }
    }

    fn month(&mut self, path: String, value: i32) {
        if !(0..12).contains(&value) {
            self.reject(
                path,
                "month_range",
                "months must be between 0 and 11".to_string(),
                json!(value),
            );
        }
    }

    fn email(&mut self, path: String, value: Option<&str>) {
        if let Some(email) = value {
            if !is_valid_email(email) {
                self.reject(
                    path,
                    "email_format",
                    "value is not a valid e-mail address".to_string(),
                    json!(email),
                );
            }
        }
    }

    fn application(&mut self, application: &Application) {
        self.loan_and_property("loan_and_property", &application.loan_and_property);
        self.borrower("borrower", &application.borrower);
    }

    fn loan_and_property(&mut self, at: &str, section: &LoanAndPropertySection) {
        self.money(format!("{at}.loan_amount"), section.loan_amount);
        self.count(format!("{at}.number_of_units"), section.number_of_units, 1);
        self.money(format!("{at}.property_value"), section.property_value);

        for (index, loan) in section.other_new_mortgage_loans.iter().enumerate() {
            let at = format!("{at}.other_new_mortgage_loans[{index}]");
            self.money(format!("{at}.monthly_payment"), loan.monthly_payment);
            self.money(
                format!("{at}.loan_amount_or_amount_drawn"),
                loan.loan_amount_or_amount_drawn,
            );
            self.optional_money(format!("{at}.credit_limit"), loan.credit_limit);
        }

        if let Some(rental) = &section.expected_rental_income {
            let at = format!("{at}.expected_rental_income");
            self.money(
                format!("{at}.expected_monthly_rental_income"),
                rental.expected_monthly_rental_income,
            );
            self.money(
                format!("{at}.expected_net_monthly_rental_income"),
                rental.expected_net_monthly_rental_income,
            );
        }

        for (index, gift) in section.gifts_or_grants.iter().enumerate() {
            self.money(
                format!("{at}.gifts_or_grants[{index}].cash_or_market_value"),
                gift.cash_or_market_value,
            );
        }
    }

    fn borrower(&mut self, at: &str, borrower: &Borrower) {
        self.personal_information(
            &format!("{at}.personal_information"),
            &borrower.personal_information,
        );
        self.employment(&format!("{at}.employment"), &borrower.employment);
        self.assets_and_liabilities(
            &format!("{at}.assets_and_liabilities"),
            &borrower.assets_and_liabilities,
        );
        self.real_estate(&format!("{at}.real_estate"), &borrower.real_estate);
        self.money(
            format!("{at}.declarations.additional_money_amount"),
            borrower.declarations.additional_money_amount,
        );

        if let Some(originator) = &borrower.loan_originator_information {
            self.email(
                format!("{at}.loan_originator_information.email"),
                originator.email.as_deref(),
            );
        }
    }

    fn personal_information(&mut self, at: &str, info: &PersonalInformation) {
        self.count(
            format!("{at}.total_number_of_borrowers"),
            info.total_number_of_borrowers,
            1,
        );
        self.count(format!("{at}.dependents_number"), info.dependents_number, 0);
        for (index, age) in info.dependents_ages.iter().enumerate() {
            self.count(format!("{at}.dependents_ages[{index}]"), *age, 0);
        }

        self.contact(&format!("{at}.contact_information"), &info.contact_information);
        self.housing_address(&format!("{at}.current_address"), &info.current_address);
        if let Some(former) = &info.former_address {
            self.housing_address(&format!("{at}.former_address"), former);
        }
    }

    fn contact(&mut self, at: &str, contact: &ContactInformation) {
        self.email(format!("{at}.email"), contact.email.as_deref());
    }

    fn housing_address(&mut self, at: &str, address: &HousingAddress) {
        self.count(format!("{at}.years_at_address"), address.years_at_address, 0);
        self.month(format!("{at}.months_at_address"), address.months_at_address);
        self.money(
            format!("{at}.housing_expense_amount"),
            address.housing_expense_amount,
        );
    }

    fn employment(&mut self, at: &str, section: &EmploymentSection) {
        self.employment_record(&format!("{at}.current_employment"), &section.current_employment);
        for (index, record) in section.additional_employment.iter().enumerate() {
            self.employment_record(&format!("{at}.additional_employment[{index}]"), record);
        }
        for (index, record) in section.previous_employment.iter().enumerate() {
            self.employment_record(&format!("{at}.previous_employment[{index}]"), record);
        }
        for (index, source) in section.other_income_sources.iter().enumerate() {
            self.money(
                format!("{at}.other_income_sources[{index}].monthly_income"),
                source.monthly_income,
            );
        }
        self.money(format!("{at}.total_other_income"), section.total_other_income);
    }

    fn employment_record(&mut self, at: &str, record: &EmploymentRecord) {
        if let Some(years) = record.years_in_line_of_work {
            self.count(format!("{at}.years_in_line_of_work"), years, 0);
        }
        if let Some(months) = record.months_in_line_of_work {
            self.month(format!("{at}.months_in_line_of_work"), months);
        }
        if let Some(income) = &record.gross_monthly_income {
            self.gross_monthly_income(&format!("{at}.gross_monthly_income"), income);
        }
        self.optional_money(
            format!("{at}.previous_gross_monthly_income"),
            record.previous_gross_monthly_income,
        );
    }

    fn gross_monthly_income(&mut self, at: &str, income: &GrossMonthlyIncome) {
        self.money(format!("{at}.base"), income.base);
        self.money(format!("{at}.overtime"), income.overtime);
        self.money(format!("{at}.bonus"), income.bonus);
        self.money(format!("{at}.commission"), income.commission);
        self.money(
            format!("{at}.military_entitlements"),
            income.military_entitlements,
        );
        self.money(format!("{at}.other"), income.other);
        self.money(format!("{at}.total"), income.total);
    }

    fn assets_and_liabilities(&mut self, at: &str, section: &AssetsAndLiabilitiesSection) {
        for (index, account) in section.assets_accounts.iter().enumerate() {
            self.money(
                format!("{at}.assets_accounts[{index}].cash_or_market_value"),
                account.cash_or_market_value,
            );
        }
        self.money(
            format!("{at}.total_assets_accounts"),
            section.total_assets_accounts,
        );

        for (index, asset) in section.other_assets_and_credits.iter().enumerate() {
            self.money(
                format!("{at}.other_assets_and_credits[{index}].cash_or_market_value"),
                asset.cash_or_market_value,
            );
        }
        self.money(
            format!("{at}.total_other_assets_and_credits"),
            section.total_other_assets_and_credits,
        );

        for (index, liability) in section.liabilities.iter().enumerate() {
            let at = format!("{at}.liabilities[{index}]");
            self.money(format!("{at}.unpaid_balance"), liability.unpaid_balance);
            self.money(format!("{at}.monthly_payment"), liability.monthly_payment);
        }

        for (index, expense) in section.other_liabilities_and_expenses.iter().enumerate() {
            self.money(
                format!("{at}.other_liabilities_and_expenses[{index}].monthly_payment"),
                expense.monthly_payment,
            );
        }
    }

    fn real_estate(&mut self, at: &str, section: &RealEstateSection) {
        for (index, property) in section.properties.iter().enumerate() {
            let at = format!("{at}.properties[{index}]");
            self.money(format!("{at}.property_value"), property.property_value);
            self.money(
                format!("{at}.monthly_taxes_insurance_assoc"),
                property.monthly_taxes_insurance_assoc,
            );
            self.money(
                format!("{at}.monthly_rental_income"),
                property.monthly_rental_income,
            );
            self.money(
                format!("{at}.net_monthly_rental_income"),
                property.net_monthly_rental_income,
            );

            for (loan_index, loan) in property.mortgage_loans.iter().enumerate() {
                let at = format!("{at}.mortgage_loans[{loan_index}]");
                self.money(
                    format!("{at}.monthly_mortgage_payment"),
                    loan.monthly_mortgage_payment,
                );
                self.money(format!("{at}.unpaid_balance"), loan.unpaid_balance);
                self.optional_money(format!("{at}.credit_limit"), loan.credit_limit);
            }
        }
    }
}

/// Syntactic e-mail check: one `@`, non-empty local part, dotted domain, no whitespace.
pub fn is_valid_email(candidate: &str) -> bool {
    if candidate.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = candidate.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty() && !label.starts_with('-') && !label.ends_with('-')
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_check_accepts_common_addresses() {
        assert!(is_valid_email("john.doe@example.com"));
        assert!(is_valid_email("ops+alerts@mail.lender.co"));
    }

    #[test]
    fn email_check_rejects_malformed_addresses() {
        assert!(!is_valid_email("john.doe"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("john@localhost"));
        assert!(!is_valid_email("john@@example.com"));
        assert!(!is_valid_email("john doe@example.com"));
        assert!(!is_valid_email("john@example..com"));
    }
}
