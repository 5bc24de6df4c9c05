use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub type RecordId = u64;

/// The record collections managed by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Organization,
    Borrower,
    Application,
    Document,
    CommunicationLog,
}

impl EntityKind {
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Organization => "organization",
            EntityKind::Borrower => "borrower",
            EntityKind::Application => "application",
            EntityKind::Document => "document",
            EntityKind::CommunicationLog => "communication_log",
        }
    }

    /// URL segment under `/api/v1`.
    pub fn collection(self) -> &'static str {
        match self {
            EntityKind::Organization => "organizations",
            EntityKind::Borrower => "borrowers",
            EntityKind::Application => "applications",
            EntityKind::Document => "documents",
            EntityKind::CommunicationLog => "communication-logs",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A persisted record: bookkeeping columns plus the entity's own fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stored<T> {
    pub id: RecordId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub fields: T,
}

impl<T> Stored<T> {
    pub fn new(id: RecordId, fields: T, now: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            fields,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub(crate) fn mark_deleted(&mut self, now: DateTime<Utc>) {
        self.deleted_at = Some(now);
        self.updated_at = now;
    }
}

/// Lender or broker organization owning borrowers and applications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub name: String,
    pub legal_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
}

/// Borrower contact and credit profile kept outside the URLA document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowerRecord {
    pub organization_id: RecordId,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub credit_score: Option<i32>,
    pub credit_report_url: Option<String>,
    pub ssn_last_4: Option<String>,
    pub income_annual: Option<Decimal>,
    pub employment_status: Option<String>,
    pub linked_user: Option<RecordId>,
}

/// Loan application tracked through the origination pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplicationRecord {
    pub organization_id: RecordId,
    pub borrower_id: RecordId,
    pub loan_officer_id: Option<RecordId>,
    pub loan_amount: Decimal,
    pub loan_type: Option<String>,
    pub loan_purpose: Option<String>,
    pub property_address_line1: Option<String>,
    pub property_address_line2: Option<String>,
    pub property_city: Option<String>,
    pub property_state: Option<String>,
    pub property_postal_code: Option<String>,
    pub property_country: Option<String>,
    pub employment_income_annual: Option<Decimal>,
    pub employment_status: Option<String>,
    pub application_status: Option<String>,
}

/// Metadata for a file attached to an application. File bytes live in external storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub organization_id: RecordId,
    pub application_id: RecordId,
    pub borrower_id: Option<RecordId>,
    pub uploaded_by: Option<RecordId>,
    pub file_name: String,
    pub file_type: Option<String>,
    pub file_size: Option<u64>,
    pub storage_url: Option<String>,
    pub storage_provider: Option<String>,
    pub description: Option<String>,
}

/// A message exchanged with a borrower about an application, by a person or a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunicationLogRecord {
    pub organization_id: RecordId,
    pub application_id: Option<RecordId>,
    pub borrower_id: Option<RecordId>,
    pub sender_user_id: Option<RecordId>,
    /// `user`, `borrower`, or `ai`.
    pub sender_type: Option<String>,
    pub message: String,
    pub message_type: Option<String>,
    /// Delivery channel such as `email`, `sms`, or `chat`.
    pub channel: Option<String>,
    pub ai_model: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    Deleted,
}

/// Audit entry before the log assigns its id.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditDraft {
    pub organization_id: RecordId,
    pub user_id: Option<RecordId>,
    pub entity_type: EntityKind,
    pub entity_id: RecordId,
    pub action: AuditAction,
    pub new_value: Option<Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEntry {
    pub id: RecordId,
    pub organization_id: RecordId,
    pub user_id: Option<RecordId>,
    pub entity_type: EntityKind,
    pub entity_id: RecordId,
    pub action: AuditAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Value>,
    pub created_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn from_draft(id: RecordId, draft: AuditDraft) -> Self {
        Self {
            id,
            organization_id: draft.organization_id,
            user_id: draft.user_id,
            entity_type: draft.entity_type,
            entity_id: draft.entity_id,
            action: draft.action,
            new_value: draft.new_value,
            created_at: draft.created_at,
        }
    }
}
