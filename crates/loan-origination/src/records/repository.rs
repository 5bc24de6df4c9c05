use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::domain::{
    AuditDraft, AuditEntry, BorrowerRecord, CommunicationLogRecord, DocumentRecord, EntityKind,
    LoanApplicationRecord, Organization, RecordId, Stored,
};

/// Storage abstraction for one record collection. Soft-delete visibility on reads is the
/// service's concern; repositories return deleted rows as stored.
pub trait RecordRepository<T>: Send + Sync {
    fn insert(&self, fields: T, now: DateTime<Utc>) -> Result<Stored<T>, RepositoryError>;
    fn fetch(&self, id: RecordId) -> Result<Option<Stored<T>>, RepositoryError>;
    fn all(&self) -> Result<Vec<Stored<T>>, RepositoryError>;
    /// Set `deleted_at` on a live row and return it. `None` when the id is unknown or the row
    /// is already deleted. The check and the write happen atomically.
    fn mark_deleted(
        &self,
        id: RecordId,
        now: DateTime<Utc>,
    ) -> Result<Option<Stored<T>>, RepositoryError>;
}

/// Append-only audit trail.
pub trait AuditLog: Send + Sync {
    fn append(&self, draft: AuditDraft) -> Result<AuditEntry, RepositoryError>;
    fn entries(&self) -> Result<Vec<AuditEntry>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// The full set of collections a [`super::RecordService`] works against.
#[derive(Clone)]
pub struct RecordStores {
    pub organizations: Arc<dyn RecordRepository<Organization>>,
    pub borrowers: Arc<dyn RecordRepository<BorrowerRecord>>,
    pub applications: Arc<dyn RecordRepository<LoanApplicationRecord>>,
    pub documents: Arc<dyn RecordRepository<DocumentRecord>>,
    pub communication_logs: Arc<dyn RecordRepository<CommunicationLogRecord>>,
    pub audit: Arc<dyn AuditLog>,
}

impl fmt::Debug for RecordStores {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordStores").finish_non_exhaustive()
    }
}

/// Entity payloads the generic record service and router can manage.
pub trait RecordFields:
    Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    const ENTITY: EntityKind;

    /// Owning organization. `None` for organizations themselves.
    fn organization_id(&self) -> Option<RecordId>;

    /// Records that must exist, and not be deleted, before this one can be created.
    fn references(&self) -> Vec<(EntityKind, RecordId)>;

    /// Field-level checks on a draft. Returns the first problem found.
    fn check(&self) -> Result<(), String>;

    fn repository(stores: &RecordStores) -> &dyn RecordRepository<Self>;
}
