//! Organization, borrower, loan application, document, and communication log records with
//! soft delete and an audit trail.

pub mod domain;
mod entities;
pub mod memory;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AuditAction, AuditEntry, BorrowerRecord, CommunicationLogRecord, DocumentRecord, EntityKind,
    LoanApplicationRecord, Organization, RecordId, Stored,
};
pub use memory::{InMemoryAuditLog, InMemoryRecordStore};
pub use repository::{AuditLog, RecordFields, RecordRepository, RecordStores, RepositoryError};
pub use router::records_router;
pub use service::{RecordService, RecordServiceError};
