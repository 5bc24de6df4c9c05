//! URLA / 1003 mortgage application: document model, validation, derived financials, and the
//! form endpoints that expose them.

mod calculations;
pub mod model;
pub mod router;
mod schema;
pub mod validation;

pub use calculations::{
    dti_ratio, total_assets, total_liabilities, total_monthly_debt, total_monthly_income,
    FinancialSummary,
};
pub use model::{Application, Borrower};
pub use router::forms_router;
pub use schema::urla_2021_v1_schema;
pub use validation::{parse, parse_str, validate, ValidatedApplication, ValidationReport};
