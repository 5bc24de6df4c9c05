use chrono::Utc;
use tracing::info;

use super::domain::{AuditAction, AuditDraft, AuditEntry, EntityKind, RecordId, Stored};
use super::repository::{RecordFields, RecordRepository, RecordStores, RepositoryError};

/// CRUD over every record collection with soft delete, reference checks, and an audit entry
/// for every mutation.
pub struct RecordService {
    stores: RecordStores,
}

impl RecordService {
    pub fn new(stores: RecordStores) -> Self {
        Self { stores }
    }

    /// Check the draft and its references, store it, and audit the creation.
    pub fn create<T: RecordFields>(
        &self,
        fields: T,
        actor: Option<RecordId>,
    ) -> Result<Stored<T>, RecordServiceError> {
        fields
            .check()
            .map_err(|reason| RecordServiceError::InvalidDraft {
                entity: T::ENTITY,
                reason,
            })?;

        for (entity, id) in fields.references() {
            if !self.is_live(entity, id)? {
                return Err(RecordServiceError::InvalidReference { entity, id });
            }
        }

        let now = Utc::now();
        let record = T::repository(&self.stores).insert(fields, now)?;

        self.stores.audit.append(AuditDraft {
            organization_id: record.fields.organization_id().unwrap_or(record.id),
            user_id: actor,
            entity_type: T::ENTITY,
            entity_id: record.id,
            action: AuditAction::Created,
            new_value: serde_json::to_value(&record.fields).ok(),
            created_at: now,
        })?;

        info!(entity = %T::ENTITY, id = record.id, "record created");
        Ok(record)
    }

    /// Fetch a live record. Soft-deleted records read as missing.
    pub fn get<T: RecordFields>(&self, id: RecordId) -> Result<Stored<T>, RecordServiceError> {
        T::repository(&self.stores)
            .fetch(id)?
            .filter(|record| !record.is_deleted())
            .ok_or(RecordServiceError::NotFound {
                entity: T::ENTITY,
                id,
            })
    }

    /// Live records ordered by id.
    pub fn list<T: RecordFields>(&self) -> Result<Vec<Stored<T>>, RecordServiceError> {
        let mut records: Vec<Stored<T>> = T::repository(&self.stores)
            .all()?
            .into_iter()
            .filter(|record| !record.is_deleted())
            .collect();
        records.sort_by_key(|record| record.id);
        Ok(records)
    }

    /// Mark a live record deleted. A second delete of the same id reports `NotFound`.
    pub fn soft_delete<T: RecordFields>(
        &self,
        id: RecordId,
        actor: Option<RecordId>,
    ) -> Result<Stored<T>, RecordServiceError> {
        let now = Utc::now();
        let record = T::repository(&self.stores)
            .mark_deleted(id, now)?
            .ok_or(RecordServiceError::NotFound {
                entity: T::ENTITY,
                id,
            })?;

        self.stores.audit.append(AuditDraft {
            organization_id: record.fields.organization_id().unwrap_or(record.id),
            user_id: actor,
            entity_type: T::ENTITY,
            entity_id: record.id,
            action: AuditAction::Deleted,
            new_value: None,
            created_at: now,
        })?;

        info!(entity = %T::ENTITY, id, "record soft-deleted");
        Ok(record)
    }

    pub fn audit_trail(&self) -> Result<Vec<AuditEntry>, RecordServiceError> {
        Ok(self.stores.audit.entries()?)
    }

    fn is_live(&self, entity: EntityKind, id: RecordId) -> Result<bool, RepositoryError> {
        match entity {
            EntityKind::Organization => live(self.stores.organizations.as_ref(), id),
            EntityKind::Borrower => live(self.stores.borrowers.as_ref(), id),
            EntityKind::Application => live(self.stores.applications.as_ref(), id),
            EntityKind::Document => live(self.stores.documents.as_ref(), id),
            EntityKind::CommunicationLog => live(self.stores.communication_logs.as_ref(), id),
        }
    }
}

fn live<T>(repository: &dyn RecordRepository<T>, id: RecordId) -> Result<bool, RepositoryError> {
    Ok(repository
        .fetch(id)?
        .is_some_and(|record| !record.is_deleted()))
}

#[derive(Debug, thiserror::Error)]
pub enum RecordServiceError {
    #[error("invalid {entity}: {reason}")]
    InvalidDraft { entity: EntityKind, reason: String },
    #[error("referenced {entity} {id} does not exist")]
    InvalidReference { entity: EntityKind, id: RecordId },
    #[error("{entity} {id} not found")]
    NotFound { entity: EntityKind, id: RecordId },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
