use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use super::domain::{AuditDraft, AuditEntry, RecordId, Stored};
use super::repository::{AuditLog, RecordRepository, RecordStores, RepositoryError};

struct Table<T> {
    next_id: RecordId,
    rows: BTreeMap<RecordId, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl<T> Table<T> {
    fn allocate(&mut self) -> RecordId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

fn lock<'a, T>(table: &'a Mutex<Table<T>>) -> Result<MutexGuard<'a, Table<T>>, RepositoryError> {
    table
        .lock()
        .map_err(|_| RepositoryError::Unavailable("in-memory table lock poisoned".to_string()))
}

/// Process-local record collection. Ids start at 1 and are never reused.
pub struct InMemoryRecordStore<T> {
    table: Mutex<Table<Stored<T>>>,
}

impl<T> Default for InMemoryRecordStore<T> {
    fn default() -> Self {
        Self {
            table: Mutex::new(Table::default()),
        }
    }
}

impl<T> RecordRepository<T> for InMemoryRecordStore<T>
where
    T: Clone + Send + Sync,
{
    fn insert(&self, fields: T, now: DateTime<Utc>) -> Result<Stored<T>, RepositoryError> {
        let mut table = lock(&self.table)?;
        let id = table.allocate();
        let record = Stored::new(id, fields, now);
        table.rows.insert(id, record.clone());
        Ok(record)
    }

    fn fetch(&self, id: RecordId) -> Result<Option<Stored<T>>, RepositoryError> {
        let table = lock(&self.table)?;
        Ok(table.rows.get(&id).cloned())
    }

    fn all(&self) -> Result<Vec<Stored<T>>, RepositoryError> {
        let table = lock(&self.table)?;
        Ok(table.rows.values().cloned().collect())
    }

    fn mark_deleted(
        &self,
        id: RecordId,
        now: DateTime<Utc>,
    ) -> Result<Option<Stored<T>>, RepositoryError> {
        let mut table = lock(&self.table)?;
        Ok(table
            .rows
            .get_mut(&id)
            .filter(|row| !row.is_deleted())
            .map(|row| {
                row.mark_deleted(now);
                row.clone()
            }))
    }
}

#[derive(Default)]
pub struct InMemoryAuditLog {
    table: Mutex<Table<AuditEntry>>,
}

impl AuditLog for InMemoryAuditLog {
    fn append(&self, draft: AuditDraft) -> Result<AuditEntry, RepositoryError> {
        let mut table = lock(&self.table)?;
        let id = table.allocate();
        let entry = AuditEntry::from_draft(id, draft);
        table.rows.insert(id, entry.clone());
        Ok(entry)
    }

    fn entries(&self) -> Result<Vec<AuditEntry>, RepositoryError> {
        let table = lock(&self.table)?;
        Ok(table.rows.values().cloned().collect())
    }
}

impl RecordStores {
    /// Fresh, empty in-memory collections.
    pub fn in_memory() -> Self {
        Self {
            organizations: Arc::new(InMemoryRecordStore::default()),
            borrowers: Arc::new(InMemoryRecordStore::default()),
            applications: Arc::new(InMemoryRecordStore::default()),
            documents: Arc::new(InMemoryRecordStore::default()),
            communication_logs: Arc::new(InMemoryRecordStore::default()),
            audit: Arc::new(InMemoryAuditLog::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential_and_deletion_marks_live_rows_once() {
        let store = InMemoryRecordStore::<String>::default();
        let now = Utc::now();

        let first = store.insert("a".to_string(), now).expect("insert");
        let second = store.insert("b".to_string(), now).expect("insert");
        assert_eq!((first.id, second.id), (1, 2));

        assert!(store.mark_deleted(9, now).expect("lookup").is_none());

        let deleted = store.mark_deleted(first.id, now).expect("delete");
        assert_eq!(deleted.map(|row| row.deleted_at), Some(Some(now)));
        assert!(store.mark_deleted(first.id, now).expect("lookup").is_none());

        assert_eq!(store.all().expect("list").len(), 2);
    }
}
