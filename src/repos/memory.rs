//! In-memory `AccountStore` for tests.
use std::collections::HashMap;
use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::repos::account_repo::{Account, AccountStatus, AccountStore};
use crate::repos::error::{RepoError, RepoResult};

#[derive(Default)]
pub struct InMemoryAccountStore {
    accounts: Mutex<HashMap<String, Account>>,
    lookups: AtomicUsize,
    failing: bool,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every lookup fails as if the database were unreachable.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn insert(&self, key: impl Into<String>, account: Account) {
        self.accounts
            .lock()
            .expect("store lock")
            .insert(key.into(), account);
    }

    pub fn remove(&self, key: &str) {
        self.accounts.lock().expect("store lock").remove(key);
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Account>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(RepoError::Db(sqlx::Error::PoolTimedOut));
        }
        Ok(self.accounts.lock().expect("store lock").get(id).cloned())
    }
}

/// An active, verified account that never changed its password.
pub fn active_account(email: &str) -> Account {
    Account {
        id: Uuid::new_v4(),
        email: email.to_string(),
        role: "user".to_string(),
        status: AccountStatus::Active,
        is_verified: true,
        password_changed_at: None,
    }
}

pub fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).expect("valid timestamp")
}
