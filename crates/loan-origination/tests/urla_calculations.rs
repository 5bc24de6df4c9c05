use loan_origination::urla::{
    dti_ratio, parse, total_assets, total_liabilities, total_monthly_debt, total_monthly_income,
    Borrower, FinancialSummary,
};
use loan_origination::urla::model::{
    AssetAccount, GrossMonthlyIncome, Liability, OtherAssetOrCredit, OtherLiabilityOrExpense,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

fn fixture() -> Value {
    serde_json::from_str(include_str!("fixtures/urla_2021_v1.json")).expect("fixture is valid json")
}

/// Fixture borrower with every amount that feeds a derivation cleared.
fn mock_borrower() -> Borrower {
    let mut document = fixture();
    let mut raw = document["borrower"].take();
    raw["employment"]["current_employment"]["gross_monthly_income"] = Value::Null;
    raw["employment"]["other_income_sources"] = json!([]);
    raw["employment"]["total_other_income"] = json!(0);
    raw["personal_information"]["current_address"]["housing_expense_amount"] = json!(0);
    raw["assets_and_liabilities"] = json!({});

    serde_json::from_value(raw).expect("mock borrower decodes")
}

fn income(base: Decimal, total: Decimal) -> GrossMonthlyIncome {
    GrossMonthlyIncome {
        base,
        overtime: Decimal::ZERO,
        bonus: Decimal::ZERO,
        commission: Decimal::ZERO,
        military_entitlements: Decimal::ZERO,
        other: Decimal::ZERO,
        total,
    }
}

fn liability(unpaid_balance: Decimal, monthly_payment: Decimal) -> Liability {
    serde_json::from_value(json!({
        "account_type": "INSTALLMENT",
        "company_name": "Lender",
        "unpaid_balance": unpaid_balance,
        "monthly_payment": monthly_payment,
    }))
    .expect("liability decodes")
}

fn account(value: Decimal) -> AssetAccount {
    serde_json::from_value(json!({
        "account_type": "CHECKING",
        "financial_institution": "Bank",
        "cash_or_market_value": value,
    }))
    .expect("account decodes")
}

#[test]
fn monthly_income_adds_other_income_to_employment_total() {
    let mut borrower = mock_borrower();
    borrower.employment.current_employment.gross_monthly_income =
        Some(income(dec!(5000), dec!(5000)));
    borrower.employment.total_other_income = dec!(500.50);

    assert_eq!(total_monthly_income(&borrower), dec!(5500.50));
}

#[test]
fn monthly_income_without_income_record_is_other_income_only() {
    let mut borrower = mock_borrower();
    borrower.employment.total_other_income = dec!(120.10);

    assert_eq!(total_monthly_income(&borrower), dec!(120.10));
}

#[test]
fn monthly_debt_includes_housing_and_other_obligations() {
    let mut borrower = mock_borrower();
    borrower
        .personal_information
        .current_address
        .housing_expense_amount = dec!(1200.00);
    borrower.assets_and_liabilities.liabilities = vec![
        liability(dec!(15000), dec!(350.00)),
        liability(dec!(2500), dec!(150.25)),
    ];
    let other: OtherLiabilityOrExpense = serde_json::from_value(json!({
        "expense_type": "CHILD_SUPPORT",
        "monthly_payment": "50.00",
    }))
    .expect("expense decodes");
    borrower.assets_and_liabilities.other_liabilities_and_expenses = vec![other];

    assert_eq!(total_monthly_debt(&borrower), dec!(1750.25));
}

#[test]
fn debt_to_income_ratio_is_exact() {
    let mut borrower = mock_borrower();
    borrower.employment.current_employment.gross_monthly_income =
        Some(income(dec!(6000), dec!(6000)));
    borrower
        .personal_information
        .current_address
        .housing_expense_amount = dec!(1000);
    borrower.assets_and_liabilities.liabilities = vec![liability(dec!(20000), dec!(500))];

    assert_eq!(dti_ratio(&borrower), dec!(0.25));
}

#[test]
fn debt_to_income_ratio_is_zero_without_income() {
    let mut borrower = mock_borrower();
    borrower.assets_and_liabilities.liabilities = vec![liability(dec!(20000), dec!(500))];

    assert_eq!(total_monthly_income(&borrower), Decimal::ZERO);
    assert_eq!(dti_ratio(&borrower), Decimal::ZERO);
}

#[test]
fn total_assets_sums_accounts_and_other_assets() {
    let mut borrower = mock_borrower();
    borrower.assets_and_liabilities.assets_accounts =
        vec![account(dec!(10000.00)), account(dec!(25000.50))];
    let earnest: OtherAssetOrCredit = serde_json::from_value(json!({
        "asset_or_credit_type": "EARNEST_MONEY",
        "cash_or_market_value": "5000.00",
    }))
    .expect("asset decodes");
    borrower.assets_and_liabilities.other_assets_and_credits = vec![earnest];

    assert_eq!(total_assets(&borrower), dec!(40000.50));
}

#[test]
fn total_liabilities_sums_unpaid_balances() {
    let mut borrower = mock_borrower();
    borrower.assets_and_liabilities.liabilities = vec![
        liability(dec!(15000.00), dec!(300)),
        liability(dec!(250000.00), dec!(1800)),
    ];

    assert_eq!(total_liabilities(&borrower), dec!(265000.00));
}

#[test]
fn empty_borrower_derives_all_zero() {
    let borrower = mock_borrower();
    let summary = FinancialSummary::from_borrower(&borrower);

    assert_eq!(
        summary,
        FinancialSummary {
            total_monthly_income: Decimal::ZERO,
            total_monthly_debt: Decimal::ZERO,
            dti_ratio: Decimal::ZERO,
            total_assets: Decimal::ZERO,
            total_liabilities: Decimal::ZERO,
        }
    );
}

#[test]
fn derivations_do_not_mutate_and_repeat_identically() {
    let application = parse(fixture()).expect("fixture validates");
    let before = application.borrower().clone();

    let first = application.financial_summary();
    let second = application.financial_summary();

    assert_eq!(first, second);
    assert_eq!(application.borrower(), &before);
}

#[test]
fn fixture_summary_matches_hand_totals() {
    let application = parse(fixture()).expect("fixture validates");
    let summary = application.financial_summary();

    assert_eq!(summary.total_monthly_income, dec!(5750.50));
    assert_eq!(summary.total_monthly_debt, dec!(1750.25));
    assert_eq!(summary.dti_ratio, dec!(1750.25) / dec!(5750.50));
    assert_eq!(summary.total_assets, dec!(40000.50));
    assert_eq!(summary.total_liabilities, dec!(17500.00));
}

#[test]
fn oversized_amounts_saturate_instead_of_overflowing() {
    let mut borrower = mock_borrower();
    let mut first = liability(dec!(1), dec!(1));
    first.unpaid_balance = dec!(70000000000000000000000000000);
    let second = first.clone();
    borrower.assets_and_liabilities.liabilities = vec![first, second];

    assert_eq!(total_liabilities(&borrower), Decimal::MAX);
    assert_eq!(total_monthly_debt(&borrower), dec!(2));
}

#[test]
fn debt_to_income_ratio_saturates_when_quotient_is_unrepresentable() {
    let mut borrower = mock_borrower();
    borrower.employment.total_other_income = dec!(0.0000000000000000000000000001);
    borrower
        .personal_information
        .current_address
        .housing_expense_amount = dec!(1000);

    assert_eq!(dti_ratio(&borrower), Decimal::MAX);
}
