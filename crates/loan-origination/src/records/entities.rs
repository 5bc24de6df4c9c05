use rust_decimal::Decimal;

use super::domain::{
    BorrowerRecord, CommunicationLogRecord, DocumentRecord, EntityKind, LoanApplicationRecord,
    Organization, RecordId,
};
use super::repository::{RecordFields, RecordRepository, RecordStores};
use crate::urla::validation::is_valid_email;

fn required_text(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{field} must not be blank"))
    } else {
        Ok(())
    }
}

fn optional_email(value: Option<&str>) -> Result<(), String> {
    match value {
        Some(email) if !is_valid_email(email) => {
            Err(format!("email '{email}' is not a valid e-mail address"))
        }
        _ => Ok(()),
    }
}

fn non_negative(field: &str, value: Option<Decimal>) -> Result<(), String> {
    match value {
        Some(amount) if amount < Decimal::ZERO => Err(format!("{field} must be zero or greater")),
        _ => Ok(()),
    }
}

fn ssn_last_four(value: Option<&str>) -> Result<(), String> {
    match value {
        Some(digits) if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) => {
            Err("ssn_last_4 must be exactly 4 digits".to_string())
        }
        _ => Ok(()),
    }
}

impl RecordFields for Organization {
    const ENTITY: EntityKind = EntityKind::Organization;

    fn organization_id(&self) -> Option<RecordId> {
        None
    }

    fn references(&self) -> Vec<(EntityKind, RecordId)> {
        Vec::new()
    }

    fn check(&self) -> Result<(), String> {
        required_text("name", &self.name)?;
        optional_email(self.email.as_deref())
    }

    fn repository(stores: &RecordStores) -> &dyn RecordRepository<Self> {
        stores.organizations.as_ref()
    }
}

impl RecordFields for BorrowerRecord {
    const ENTITY: EntityKind = EntityKind::Borrower;

    fn organization_id(&self) -> Option<RecordId> {
        Some(self.organization_id)
    }

    fn references(&self) -> Vec<(EntityKind, RecordId)> {
        vec![(EntityKind::Organization, self.organization_id)]
    }

    fn check(&self) -> Result<(), String> {
        optional_email(self.email.as_deref())?;
        ssn_last_four(self.ssn_last_4.as_deref())?;
        non_negative("income_annual", self.income_annual)
    }

    fn repository(stores: &RecordStores) -> &dyn RecordRepository<Self> {
        stores.borrowers.as_ref()
    }
}

impl RecordFields for LoanApplicationRecord {
    const ENTITY: EntityKind = EntityKind::Application;

    fn organization_id(&self) -> Option<RecordId> {
        Some(self.organization_id)
    }

    fn references(&self) -> Vec<(EntityKind, RecordId)> {
        vec![
            (EntityKind::Organization, self.organization_id),
            (EntityKind::Borrower, self.borrower_id),
        ]
    }

    fn check(&self) -> Result<(), String> {
        non_negative("loan_amount", Some(self.loan_amount))?;
        non_negative("employment_income_annual", self.employment_income_annual)
    }

    fn repository(stores: &RecordStores) -> &dyn RecordRepository<Self> {
        stores.applications.as_ref()
    }
}

impl RecordFields for DocumentRecord {
    const ENTITY: EntityKind = EntityKind::Document;

    fn organization_id(&self) -> Option<RecordId> {
        Some(self.organization_id)
    }

    fn references(&self) -> Vec<(EntityKind, RecordId)> {
        let mut references = vec![
            (EntityKind::Organization, self.organization_id),
            (EntityKind::Application, self.application_id),
        ];
        if let Some(borrower_id) = self.borrower_id {
            references.push((EntityKind::Borrower, borrower_id));
        }
        references
    }

    fn check(&self) -> Result<(), String> {
        required_text("file_name", &self.file_name)
    }

    fn repository(stores: &RecordStores) -> &dyn RecordRepository<Self> {
        stores.documents.as_ref()
    }
}

impl RecordFields for CommunicationLogRecord {
    const ENTITY: EntityKind = EntityKind::CommunicationLog;

    fn organization_id(&self) -> Option<RecordId> {
        Some(self.organization_id)
    }

    fn references(&self) -> Vec<(EntityKind, RecordId)> {
        let mut references = vec![(EntityKind::Organization, self.organization_id)];
        references.extend(self.application_id.map(|id| (EntityKind::Application, id)));
        references.extend(self.borrower_id.map(|id| (EntityKind::Borrower, id)));
        references
    }

    fn check(&self) -> Result<(), String> {
        required_text("message", &self.message)
    }

    fn repository(stores: &RecordStores) -> &dyn RecordRepository<Self> {
        stores.communication_logs.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ssn_last_four_requires_four_digits() {
        assert!(ssn_last_four(Some("1234")).is_ok());
        assert!(ssn_last_four(None).is_ok());
        assert!(ssn_last_four(Some("123")).is_err());
        assert!(ssn_last_four(Some("12a4")).is_err());
        assert!(ssn_last_four(Some("12345")).is_err());
    }

    #[test]
    fn blank_text_is_rejected() {
        assert_eq!(
            required_text("name", "  ").expect_err("blank rejected"),
            "name must not be blank"
        );
    }
}
