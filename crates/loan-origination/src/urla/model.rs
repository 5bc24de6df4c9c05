//! URLA / 1003 application document (single borrower), laid out by form section.

use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// Closed value sets

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Citizenship {
    UsCitizen,
    PermanentResidentAlien,
    NonPermanentResidentAlien,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeOfCredit {
    Individual,
    Joint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaritalStatus {
    Married,
    Separated,
    Unmarried,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HousingExpenseType {
    Own,
    Rent,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    Checking,
    Savings,
    MoneyMarket,
    Cd,
    Stocks,
    Bonds,
    MutualFunds,
    Retirement,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LiabilityAccountType {
    Revolving,
    Installment,
    #[serde(rename = "OPEN_30_DAY")]
    Open30Day,
    Lease,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OtherLiabilityExpenseType {
    Alimony,
    ChildSupport,
    SeparateMaintenance,
    JobRelated,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanPurpose {
    Purchase,
    Refinance,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Occupancy {
    PrimaryResidence,
    SecondHome,
    Investment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyStatus {
    Sold,
    PendingSale,
    Retained,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LienType {
    FirstLien,
    SubordinateLien,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GiftAssetType {
    CashGift,
    GiftOfEquity,
    Grant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GiftSourceType {
    Relative,
    Employer,
    LaborUnion,
    Charity,
    GovernmentAgency,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EthnicityChoice {
    HispanicOrLatino,
    NotHispanicOrLatino,
    NotProvided,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SexChoice {
    Male,
    Female,
    NotProvided,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CollectionMethod {
    FaceToFace,
    Telephone,
    FaxOrMail,
    EmailOrInternet,
}

/// Primary residence, FHA secondary residence, second home, investment property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PreviousOwnershipType {
    Pr,
    Sr,
    Sh,
    Ip,
}

/// Sole, joint with spouse, joint with another person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PreviousTitleHolding {
    S,
    Sp,
    O,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BankruptcyType {
    Ch7,
    Ch11,
    Ch12,
    Ch13,
}

/// Schema tag carried on every application so stored documents can be migrated later.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum SchemaVersion {
    #[default]
    #[serde(rename = "urlA_2021_v1")]
    Urla2021V1,
}

impl SchemaVersion {
    pub const fn tag(self) -> &'static str {
        match self {
            SchemaVersion::Urla2021V1 => "urlA_2021_v1",
        }
    }
}

fn default_country() -> Option<String> {
    Some("USA".to_string())
}

fn default_one() -> i32 {
    1
}

// Shared primitives

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ContactInformation {
    pub home_phone: Option<String>,
    pub cell_phone: Option<String>,
    pub work_phone: Option<String>,
    pub work_phone_ext: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    #[serde(default = "default_country")]
    pub country: Option<String>,
    pub unit: Option<String>,
}

/// Postal address plus how long the borrower has lived there and what it costs them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HousingAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    #[serde(default = "default_country")]
    pub country: Option<String>,
    pub unit: Option<String>,
    pub years_at_address: i32,
    pub months_at_address: i32,
    pub housing_expense_type: HousingExpenseType,
    pub housing_expense_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AlternateName {
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub suffix: Option<String>,
}

// Section 1: Borrower Information

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PersonalInformation {
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub suffix: Option<String>,
    #[serde(default)]
    pub alternate_names: Vec<AlternateName>,

    pub ssn_or_itin: String,
    /// YYYY-MM-DD as entered on the form.
    pub date_of_birth: String,

    pub citizenship: Citizenship,
    pub type_of_credit: TypeOfCredit,
    #[serde(default = "default_one")]
    pub total_number_of_borrowers: i32,

    /// Names as typed on the form, separated by `;`.
    pub other_borrowers_names_raw: Option<String>,
    #[serde(default)]
    pub other_borrowers_names: Vec<String>,

    pub marital_status: MaritalStatus,
    #[serde(default)]
    pub dependents_number: i32,
    #[serde(default)]
    pub dependents_ages: Vec<i32>,

    pub contact_information: ContactInformation,

    pub current_address: HousingAddress,
    pub former_address: Option<HousingAddress>,
    pub mailing_address: Option<Address>,
}

impl PersonalInformation {
    /// Populate `other_borrowers_names` from the raw form line unless names were given explicitly.
    pub fn derive_other_borrowers_names(&mut self) {
        if !self.other_borrowers_names.is_empty() {
            return;
        }

        if let Some(raw) = self.other_borrowers_names_raw.as_deref() {
            self.other_borrowers_names = split_borrower_names(raw);
        }
    }
}

pub fn split_borrower_names(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

// Section 2: Financial Information (Employment, Assets, Liabilities)

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GrossMonthlyIncome {
    pub base: Decimal,
    #[serde(default)]
    pub overtime: Decimal,
    #[serde(default)]
    pub bonus: Decimal,
    #[serde(default)]
    pub commission: Decimal,
    #[serde(default)]
    pub military_entitlements: Decimal,
    #[serde(default)]
    pub other: Decimal,
    /// May exceed the itemized components when income is not broken out.
    pub total: Decimal,
}

impl GrossMonthlyIncome {
    /// Sum of the itemized components, or `None` when it does not fit in a `Decimal`.
    pub fn components_sum(&self) -> Option<Decimal> {
        [
            self.overtime,
            self.bonus,
            self.commission,
            self.military_entitlements,
            self.other,
        ]
        .into_iter()
        .try_fold(self.base, Decimal::checked_add)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EmploymentRecord {
    pub employer_name: String,
    pub employer_phone: Option<String>,
    pub street: Option<String>,
    pub unit: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    #[serde(default = "default_country")]
    pub country: Option<String>,

    pub position_title: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub years_in_line_of_work: Option<i32>,
    pub months_in_line_of_work: Option<i32>,

    #[serde(default)]
    pub employed_by_interested_party: bool,
    #[serde(default)]
    pub is_self_employed: bool,
    #[serde(default)]
    pub ownership_share_25_or_more: bool,

    pub gross_monthly_income: Option<GrossMonthlyIncome>,
    pub previous_gross_monthly_income: Option<Decimal>,
}

impl EmploymentRecord {
    pub fn new(employer_name: impl Into<String>) -> Self {
        Self {
            employer_name: employer_name.into(),
            employer_phone: None,
            street: None,
            unit: None,
            city: None,
            state: None,
            zip: None,
            country: default_country(),
            position_title: None,
            start_date: None,
            end_date: None,
            years_in_line_of_work: None,
            months_in_line_of_work: None,
            employed_by_interested_party: false,
            is_self_employed: false,
            ownership_share_25_or_more: false,
            gross_monthly_income: None,
            previous_gross_monthly_income: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OtherIncomeSource {
    pub income_source_type: String,
    pub monthly_income: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EmploymentSection {
    pub current_employment: EmploymentRecord,
    #[serde(default)]
    pub additional_employment: Vec<EmploymentRecord>,
    #[serde(default)]
    pub previous_employment: Vec<EmploymentRecord>,
    #[serde(default)]
    pub other_income_sources: Vec<OtherIncomeSource>,
    #[serde(default)]
    pub total_other_income: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AssetAccount {
    pub account_type: AccountType,
    pub financial_institution: String,
    pub account_number: Option<String>,
    pub cash_or_market_value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OtherAssetOrCredit {
    pub asset_or_credit_type: String,
    pub cash_or_market_value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Liability {
    pub account_type: LiabilityAccountType,
    pub company_name: String,
    pub account_number: Option<String>,
    pub unpaid_balance: Decimal,
    #[serde(default)]
    pub to_be_paid_off_before_closing: bool,
    pub monthly_payment: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OtherLiabilityOrExpense {
    pub expense_type: OtherLiabilityExpenseType,
    pub monthly_payment: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AssetsAndLiabilitiesSection {
    #[serde(default)]
    pub assets_accounts: Vec<AssetAccount>,
    #[serde(default)]
    pub total_assets_accounts: Decimal,

    #[serde(default)]
    pub other_assets_and_credits: Vec<OtherAssetOrCredit>,
    #[serde(default)]
    pub total_other_assets_and_credits: Decimal,

    #[serde(default)]
    pub liabilities: Vec<Liability>,
    #[serde(default)]
    pub other_liabilities_and_expenses: Vec<OtherLiabilityOrExpense>,
}

// Section 3: Financial Information (Real Estate)

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MortgageLoanOnProperty {
    pub creditor_name: String,
    pub account_number: Option<String>,
    pub monthly_mortgage_payment: Decimal,
    pub unpaid_balance: Decimal,
    #[serde(default)]
    pub to_be_paid_off_before_closing: bool,
    pub loan_type: String,
    pub credit_limit: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RealEstateProperty {
    pub address: Address,
    pub property_value: Decimal,
    pub status: PropertyStatus,
    pub intended_occupancy: Occupancy,
    pub monthly_taxes_insurance_assoc: Decimal,
    #[serde(default)]
    pub monthly_rental_income: Decimal,
    #[serde(default)]
    pub net_monthly_rental_income: Decimal,
    #[serde(default)]
    pub mortgage_loans: Vec<MortgageLoanOnProperty>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RealEstateSection {
    pub owns_any_real_estate: bool,
    #[serde(default)]
    pub properties: Vec<RealEstateProperty>,
}

// Section 4: Loan and Property Information (shared across borrowers)

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExpectedRentalIncome {
    pub expected_monthly_rental_income: Decimal,
    pub expected_net_monthly_rental_income: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OtherNewMortgageLoan {
    pub creditor_name: String,
    pub lien_type: LienType,
    pub monthly_payment: Decimal,
    pub loan_amount_or_amount_drawn: Decimal,
    pub credit_limit: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GiftOrGrant {
    pub asset_type: GiftAssetType,
    pub source_type: GiftSourceType,
    pub cash_or_market_value: Decimal,
    #[serde(default)]
    pub deposited: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LoanAndPropertySection {
    pub loan_amount: Decimal,
    pub loan_purpose: LoanPurpose,
    pub loan_purpose_other_description: Option<String>,

    pub property_address: Address,
    #[serde(default = "default_one")]
    pub number_of_units: i32,
    pub property_value: Decimal,

    pub occupancy: Occupancy,
    #[serde(default)]
    pub is_mixed_use_property: bool,
    #[serde(default)]
    pub is_manufactured_home: bool,

    #[serde(default)]
    pub other_new_mortgage_loans: Vec<OtherNewMortgageLoan>,
    pub expected_rental_income: Option<ExpectedRentalIncome>,
    #[serde(default)]
    pub gifts_or_grants: Vec<GiftOrGrant>,
}

// Section 5: Declarations

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Declarations {
    pub will_occupy_as_primary_residence: bool,
    pub had_ownership_interest_last_three_years: bool,
    pub previous_property_ownership_type: Option<PreviousOwnershipType>,
    pub previous_property_title_holding: Option<PreviousTitleHolding>,

    pub has_relationship_with_seller: bool,
    pub borrowing_additional_money_for_transaction: bool,
    #[serde(default)]
    pub additional_money_amount: Decimal,
    pub applying_for_other_mortgage_before_closing: bool,
    pub applying_for_new_credit_before_closing: bool,
    pub property_subject_to_senior_lien: bool,

    pub is_cosigner_on_undisclosed_debt: bool,
    pub has_outstanding_judgments: bool,
    pub delinquent_or_default_on_federal_debt: bool,
    pub party_to_lawsuit_with_financial_liability: bool,
    pub conveyed_title_in_lieu_of_foreclosure_past_7_years: bool,
    pub completed_short_sale_past_7_years: bool,
    pub had_property_foreclosed_past_7_years: bool,
    pub declared_bankruptcy_past_7_years: bool,
    #[serde(default)]
    pub bankruptcy_types: Vec<BankruptcyType>,
}

// Section 6: Acknowledgments and Agreements

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AcknowledgmentsAndAgreements {
    #[serde(default)]
    pub acknowledged: bool,
    pub borrower_signature: Option<String>,
    pub borrower_signature_date: Option<String>,
    pub additional_borrower_signature: Option<String>,
    pub additional_borrower_signature_date: Option<String>,
}

// Section 7: Military Service

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MilitaryService {
    #[serde(default)]
    pub has_military_service: bool,
    #[serde(default)]
    pub currently_serving_active_duty: bool,
    pub active_duty_expiration_date: Option<String>,
    #[serde(default)]
    pub currently_retired_discharged_separated: bool,
    #[serde(default)]
    pub only_reserve_or_guard_non_activated: bool,
    #[serde(default)]
    pub is_surviving_spouse: bool,
}

// Section 8: Demographic Information

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EthnicityDetail {
    #[serde(default)]
    pub is_hispanic_or_latino: bool,
    #[serde(default)]
    pub mexican: bool,
    #[serde(default)]
    pub puerto_rican: bool,
    #[serde(default)]
    pub cuban: bool,
    #[serde(default)]
    pub other_hispanic_or_latino: bool,
    pub other_hispanic_or_latino_origin: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RaceDetail {
    pub american_indian_or_alaska_native: bool,
    pub american_indian_or_alaska_native_tribe: Option<String>,

    pub asian_indian: bool,
    pub chinese: bool,
    pub filipino: bool,
    pub japanese: bool,
    pub korean: bool,
    pub vietnamese: bool,
    pub other_asian: bool,
    pub other_asian_description: Option<String>,

    pub black_or_african_american: bool,

    pub native_hawaiian: bool,
    pub guamanian_or_chamorro: bool,
    pub samoan: bool,
    pub other_pacific_islander: bool,
    pub other_pacific_islander_description: Option<String>,

    pub white: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CollectedBasedOnVisualObservation {
    pub ethnicity: bool,
    pub sex: bool,
    pub race: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DemographicInformation {
    pub ethnicity: EthnicityChoice,
    pub ethnicity_detail: Option<EthnicityDetail>,
    pub sex: SexChoice,
    pub race: RaceDetail,
    pub collected_based_on_visual_observation: CollectedBasedOnVisualObservation,
    pub collection_method: CollectionMethod,
}

// Loan originator (optional per borrower)

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LoanOriginatorAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LoanOriginatorInformation {
    pub organization_name: String,
    pub organization_address: LoanOriginatorAddress,
    pub organization_nmlsr_id: Option<String>,
    pub organization_state_license_id: Option<String>,

    pub loan_originator_name: Option<String>,
    pub loan_originator_nmlsr_id: Option<String>,
    pub loan_originator_state_license_id: Option<String>,

    pub email: Option<String>,
    pub phone: Option<String>,
    pub signature: Option<String>,
    pub signature_date: Option<String>,
}

/// Everything the form captures about one borrower.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Borrower {
    pub personal_information: PersonalInformation,
    pub employment: EmploymentSection,
    pub assets_and_liabilities: AssetsAndLiabilitiesSection,
    pub real_estate: RealEstateSection,
    pub declarations: Declarations,
    pub acknowledgments_and_agreements: AcknowledgmentsAndAgreements,
    pub military_service: MilitaryService,
    pub demographic_information: DemographicInformation,
    pub loan_originator_information: Option<LoanOriginatorInformation>,
}

/// Top-level URLA 2021 application document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Application {
    #[serde(default)]
    pub schema_version: SchemaVersion,

    pub application_id: String,
    pub lender_loan_number: Option<String>,
    pub agency_case_number: Option<String>,

    pub loan_and_property: LoanAndPropertySection,
    pub borrower: Borrower,
}
