//! Borrower financial derivations. Pure functions over exact decimals. Validated documents
//! keep every amount under the field ceiling, so the sums stay exact; on anything larger they
//! saturate at `Decimal::MAX` instead of overflowing.

use rust_decimal::Decimal;
use serde::Serialize;

use super::model::Borrower;

/// Current employment gross monthly total plus other monthly income.
pub fn total_monthly_income(borrower: &Borrower) -> Decimal {
    let employment = &borrower.employment;
    let current = employment
        .current_employment
        .gross_monthly_income
        .as_ref()
        .map(|income| income.total)
        .unwrap_or(Decimal::ZERO);

    current.saturating_add(employment.total_other_income)
}

/// Recurring liability payments, other obligations, and the current housing expense.
pub fn total_monthly_debt(borrower: &Borrower) -> Decimal {
    let section = &borrower.assets_and_liabilities;
    let liabilities = saturating_sum(
        section
            .liabilities
            .iter()
            .map(|liability| liability.monthly_payment),
    );
    let other_expenses = saturating_sum(
        section
            .other_liabilities_and_expenses
            .iter()
            .map(|expense| expense.monthly_payment),
    );
    let housing = borrower
        .personal_information
        .current_address
        .housing_expense_amount;

    liabilities
        .saturating_add(other_expenses)
        .saturating_add(housing)
}

/// Debt-to-income ratio. Zero when there is no positive income to divide by; `Decimal::MAX`
/// when the quotient is too large to represent.
pub fn dti_ratio(borrower: &Borrower) -> Decimal {
    let income = total_monthly_income(borrower);
    if income <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    total_monthly_debt(borrower)
        .checked_div(income)
        .unwrap_or(Decimal::MAX)
}

pub fn total_assets(borrower: &Borrower) -> Decimal {
    let section = &borrower.assets_and_liabilities;
    let accounts = saturating_sum(
        section
            .assets_accounts
            .iter()
            .map(|account| account.cash_or_market_value),
    );
    let other_assets = saturating_sum(
        section
            .other_assets_and_credits
            .iter()
            .map(|asset| asset.cash_or_market_value),
    );

    accounts.saturating_add(other_assets)
}

pub fn total_liabilities(borrower: &Borrower) -> Decimal {
    saturating_sum(
        borrower
            .assets_and_liabilities
            .liabilities
            .iter()
            .map(|liability| liability.unpaid_balance),
    )
}

fn saturating_sum(amounts: impl Iterator<Item = Decimal>) -> Decimal {
    amounts.fold(Decimal::ZERO, Decimal::saturating_add)
}

/// All five derivations computed together for API responses and CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FinancialSummary {
    pub total_monthly_income: Decimal,
    pub total_monthly_debt: Decimal,
    pub dti_ratio: Decimal,
    pub total_assets: Decimal,
    pub total_liabilities: Decimal,
}

impl FinancialSummary {
    pub fn from_borrower(borrower: &Borrower) -> Self {
        Self {
            total_monthly_income: total_monthly_income(borrower),
            total_monthly_debt: total_monthly_debt(borrower),
            dti_ratio: dti_ratio(borrower),
            total_assets: total_assets(borrower),
            total_liabilities: total_liabilities(borrower),
        }
    }
}
