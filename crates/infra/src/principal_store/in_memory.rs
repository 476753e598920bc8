use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use warden_auth::{PrincipalRecord, PrincipalStore, Role};
use warden_core::{DomainError, DomainResult, UserId};

/// A principal to be inserted; the store assigns the id.
#[derive(Clone)]
pub struct NewPrincipal {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

impl core::fmt::Debug for NewPrincipal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NewPrincipal")
            .field("username", &self.username)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
struct Records {
    next_id: i64,
    by_id: BTreeMap<UserId, PrincipalRecord>,
}

/// In-memory principal store for tests/dev.
///
/// Ids are assigned sequentially from 1; usernames are unique.
#[derive(Debug, Default)]
pub struct InMemoryPrincipalStore {
    inner: RwLock<Records>,
}

impl InMemoryPrincipalStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Records> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Records> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn insert(&self, principal: NewPrincipal) -> DomainResult<PrincipalRecord> {
        if principal.username.trim().is_empty() {
            return Err(DomainError::validation("username must not be empty"));
        }

        let mut records = self.write();

        if records.by_id.values().any(|r| r.username == principal.username) {
            return Err(DomainError::conflict(format!(
                "username '{}' already exists",
                principal.username
            )));
        }

        records.next_id += 1;
        let record = PrincipalRecord {
            id: UserId::new(records.next_id),
            username: principal.username,
            password_hash: principal.password_hash,
            role: principal.role,
        };
        records.by_id.insert(record.id, record.clone());
        Ok(record)
    }

    /// Replace an existing record (same id).
    pub fn update(&self, record: PrincipalRecord) -> DomainResult<()> {
        let mut records = self.write();

        if !records.by_id.contains_key(&record.id) {
            return Err(DomainError::not_found(format!("user {}", record.id)));
        }
        if records
            .by_id
            .values()
            .any(|r| r.id != record.id && r.username == record.username)
        {
            return Err(DomainError::conflict(format!(
                "username '{}' already exists",
                record.username
            )));
        }

        records.by_id.insert(record.id, record);
        Ok(())
    }

    pub fn remove(&self, id: UserId) -> DomainResult<PrincipalRecord> {
        let mut records = self.write();
        records
            .by_id
            .remove(&id)
            .ok_or_else(|| DomainError::not_found(format!("user {id}")))
    }

    pub fn len(&self) -> usize {
        self.read().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn list(&self) -> Vec<PrincipalRecord> {
        self.read().by_id.values().cloned().collect()
    }
}

impl PrincipalStore for InMemoryPrincipalStore {
    fn find_by_username(&self, username: &str) -> Option<PrincipalRecord> {
        self.read()
            .by_id
            .values()
            .find(|r| r.username == username)
            .cloned()
    }

    fn find_by_id(&self, id: UserId) -> Option<PrincipalRecord> {
        self.read().by_id.get(&id).cloned()
    }

    fn exists_by_id(&self, id: UserId) -> bool {
        self.read().by_id.contains_key(&id)
    }
}
