use std::sync::{Arc, Barrier};
use std::thread;

use chrono::{DateTime, Utc};
use rust_decimal_macros::dec;

use super::*;

fn service() -> RecordService {
    RecordService::new(RecordStores::in_memory())
}

fn organization(name: &str) -> Organization {
    Organization {
        name: name.to_string(),
        legal_name: None,
        email: None,
        phone: None,
        address_line1: None,
        address_line2: None,
        city: None,
        state: None,
        postal_code: None,
    }
}

fn borrower(organization_id: RecordId) -> BorrowerRecord {
    BorrowerRecord {
        organization_id,
        email: Some("john.doe@example.com".to_string()),
        phone: None,
        first_name: Some("John".to_string()),
        last_name: Some("Doe".to_string()),
        address_line1: None,
        address_line2: None,
        city: None,
        state: None,
        postal_code: None,
        country: None,
        date_of_birth: None,
        credit_score: Some(720),
        credit_report_url: None,
        ssn_last_4: Some("6789".to_string()),
        income_annual: Some(dec!(90000.00)),
        employment_status: None,
        linked_user: None,
    }
}

fn application(organization_id: RecordId, borrower_id: RecordId) -> LoanApplicationRecord {
    LoanApplicationRecord {
        organization_id,
        borrower_id,
        loan_officer_id: None,
        loan_amount: dec!(320000.00),
        loan_type: Some("CONVENTIONAL".to_string()),
        loan_purpose: Some("PURCHASE".to_string()),
        property_address_line1: None,
        property_address_line2: None,
        property_city: None,
        property_state: None,
        property_postal_code: None,
        property_country: None,
        employment_income_annual: None,
        employment_status: None,
        application_status: Some("submitted".to_string()),
    }
}

fn document(organization_id: RecordId, application_id: RecordId) -> DocumentRecord {
    DocumentRecord {
        organization_id,
        application_id,
        borrower_id: None,
        uploaded_by: None,
        file_name: "paystub.pdf".to_string(),
        file_type: Some("application/pdf".to_string()),
        file_size: Some(48_213),
        storage_url: None,
        storage_provider: None,
        description: None,
    }
}

fn communication(organization_id: RecordId) -> CommunicationLogRecord {
    CommunicationLogRecord {
        organization_id,
        application_id: None,
        borrower_id: None,
        sender_user_id: None,
        sender_type: Some("ai".to_string()),
        message: "Your appraisal has been scheduled.".to_string(),
        message_type: Some("status_update".to_string()),
        channel: Some("email".to_string()),
        ai_model: Some("underwriter-assist".to_string()),
    }
}

struct UnavailableStore;

impl RecordRepository<Organization> for UnavailableStore {
    fn insert(
        &self,
        _fields: Organization,
        _now: DateTime<Utc>,
    ) -> Result<Stored<Organization>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn fetch(&self, _id: RecordId) -> Result<Option<Stored<Organization>>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn all(&self) -> Result<Vec<Stored<Organization>>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn mark_deleted(
        &self,
        _id: RecordId,
        _now: DateTime<Utc>,
    ) -> Result<Option<Stored<Organization>>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }
}

#[test]
fn create_assigns_ids_and_timestamps() {
    let service = service();
    let first = service.create(organization("Acme Lending"), None).expect("create");
    let second = service.create(organization("Beta Bank"), None).expect("create");

    assert_eq!(first.id, 1);
    assert_eq!(second.id, 2);
    assert_eq!(first.created_at, first.updated_at);
    assert!(first.deleted_at.is_none());
}

#[test]
fn blank_organization_name_is_invalid() {
    let err = service()
        .create(organization("   "), None)
        .expect_err("blank name rejected");
    assert!(matches!(
        err,
        RecordServiceError::InvalidDraft {
            entity: EntityKind::Organization,
            ..
        }
    ));
}

#[test]
fn malformed_ssn_last_four_is_invalid() {
    let service = service();
    let org = service.create(organization("Acme"), None).expect("create");
    let mut draft = borrower(org.id);
    draft.ssn_last_4 = Some("67890".to_string());

    let err = service.create(draft, None).expect_err("ssn rejected");
    assert_eq!(err.to_string(), "invalid borrower: ssn_last_4 must be exactly 4 digits");
}

#[test]
fn negative_loan_amount_is_invalid() {
    let service = service();
    let org = service.create(organization("Acme"), None).expect("create");
    let person = service.create(borrower(org.id), None).expect("create");
    let mut draft = application(org.id, person.id);
    draft.loan_amount = dec!(-1);

    assert!(matches!(
        service.create(draft, None),
        Err(RecordServiceError::InvalidDraft { .. })
    ));
}

#[test]
fn references_must_exist() {
    let service = service();
    let err = service
        .create(borrower(42), None)
        .expect_err("missing organization rejected");
    assert!(matches!(
        err,
        RecordServiceError::InvalidReference {
            entity: EntityKind::Organization,
            id: 42
        }
    ));

    let org = service.create(organization("Acme"), None).expect("create");
    let err = service
        .create(application(org.id, 7), None)
        .expect_err("missing borrower rejected");
    assert!(matches!(
        err,
        RecordServiceError::InvalidReference {
            entity: EntityKind::Borrower,
            id: 7
        }
    ));
}

#[test]
fn deleted_references_are_rejected() {
    let service = service();
    let org = service.create(organization("Acme"), None).expect("create");
    let person = service.create(borrower(org.id), None).expect("create");
    let loan = service
        .create(application(org.id, person.id), None)
        .expect("create");
    service
        .soft_delete::<LoanApplicationRecord>(loan.id, None)
        .expect("delete");

    let err = service
        .create(document(org.id, loan.id), None)
        .expect_err("deleted application rejected");
    assert!(matches!(
        err,
        RecordServiceError::InvalidReference {
            entity: EntityKind::Application,
            ..
        }
    ));
}

#[test]
fn soft_deleted_records_disappear_from_reads() {
    let service = service();
    let kept = service.create(organization("Kept"), None).expect("create");
    let dropped = service.create(organization("Dropped"), None).expect("create");

    let deleted = service
        .soft_delete::<Organization>(dropped.id, None)
        .expect("delete");
    assert!(deleted.deleted_at.is_some());

    assert!(matches!(
        service.get::<Organization>(dropped.id),
        Err(RecordServiceError::NotFound { .. })
    ));
    let listed = service.list::<Organization>().expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, kept.id);
}

#[test]
fn deleting_twice_reports_not_found() {
    let service = service();
    let org = service.create(organization("Acme"), None).expect("create");
    service
        .soft_delete::<Organization>(org.id, None)
        .expect("first delete");

    assert!(matches!(
        service.soft_delete::<Organization>(org.id, None),
        Err(RecordServiceError::NotFound { id, .. }) if id == org.id
    ));
}

#[test]
fn mutations_are_audited_in_order() {
    let service = service();
    let org = service.create(organization("Acme"), Some(5)).expect("create");
    let person = service.create(borrower(org.id), Some(5)).expect("create");
    service
        .soft_delete::<BorrowerRecord>(person.id, Some(6))
        .expect("delete");

    let trail = service.audit_trail().expect("audit trail");
    let summary: Vec<(EntityKind, RecordId, AuditAction, Option<RecordId>)> = trail
        .iter()
        .map(|entry| (entry.entity_type, entry.entity_id, entry.action, entry.user_id))
        .collect();
    assert_eq!(
        summary,
        vec![
            (EntityKind::Organization, org.id, AuditAction::Created, Some(5)),
            (EntityKind::Borrower, person.id, AuditAction::Created, Some(5)),
            (EntityKind::Borrower, person.id, AuditAction::Deleted, Some(6)),
        ]
    );
    assert!(trail.iter().all(|entry| entry.organization_id == org.id));
    assert_eq!(
        trail[1].new_value.as_ref().map(|value| value["ssn_last_4"].clone()),
        Some(serde_json::json!("6789"))
    );
}

#[test]
fn repository_failures_surface_as_repository_errors() {
    let mut stores = RecordStores::in_memory();
    stores.organizations = Arc::new(UnavailableStore);
    let service = RecordService::new(stores);

    assert!(matches!(
        service.create(organization("Acme"), None),
        Err(RecordServiceError::Repository(RepositoryError::Unavailable(_)))
    ));
    assert!(matches!(
        service.list::<Organization>(),
        Err(RecordServiceError::Repository(_))
    ));
}

#[test]
fn concurrent_deletes_succeed_once_and_audit_once() {
    let service = Arc::new(service());
    let org = service.create(organization("Acme"), None).expect("create");
    let workers = 8;
    let barrier = Arc::new(Barrier::new(workers));

    let handles: Vec<_> = (0..workers)
        .map(|_| {
            let service = Arc::clone(&service);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                service.soft_delete::<Organization>(org.id, None).is_ok()
            })
        })
        .collect();
    let successes = handles
        .into_iter()
        .map(|handle| handle.join().expect("worker finished"))
        .filter(|deleted| *deleted)
        .count();

    assert_eq!(successes, 1);
    let deletions = service
        .audit_trail()
        .expect("audit trail")
        .iter()
        .filter(|entry| entry.action == AuditAction::Deleted)
        .count();
    assert_eq!(deletions, 1);
}

#[test]
fn communication_logs_reference_their_application_and_borrower() {
    let service = service();
    let org = service.create(organization("Acme"), None).expect("create");
    let person = service.create(borrower(org.id), None).expect("create");
    let loan = service
        .create(application(org.id, person.id), None)
        .expect("create");

    let mut draft = communication(org.id);
    draft.application_id = Some(loan.id);
    draft.borrower_id = Some(person.id);
    let log = service.create(draft, Some(3)).expect("create");
    assert_eq!(
        service
            .get::<CommunicationLogRecord>(log.id)
            .expect("get")
            .fields
            .channel
            .as_deref(),
        Some("email")
    );

    let mut orphan = communication(org.id);
    orphan.borrower_id = Some(99);
    assert!(matches!(
        service.create(orphan, None),
        Err(RecordServiceError::InvalidReference {
            entity: EntityKind::Borrower,
            id: 99
        })
    ));

    let mut blank = communication(org.id);
    blank.message = " ".to_string();
    assert!(matches!(
        service.create(blank, None),
        Err(RecordServiceError::InvalidDraft {
            entity: EntityKind::CommunicationLog,
            ..
        })
    ));

    service
        .soft_delete::<CommunicationLogRecord>(log.id, None)
        .expect("delete");
    assert!(service
        .list::<CommunicationLogRecord>()
        .expect("list")
        .is_empty());
    let last = service.audit_trail().expect("audit trail").pop().expect("entry");
    assert_eq!(
        (last.entity_type, last.entity_id, last.action),
        (EntityKind::CommunicationLog, log.id, AuditAction::Deleted)
    );
}
