/*
 * Responsibility
 * - accounts テーブルの読み取り (認可ゲートが参照する最小限のカラムのみ)
 * - AccountStore trait 越しに提供し、テストでは in-memory 実装に差し替える
 * - 書き込みは行わない (アカウントの所有者は別サービス)
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::{RepoError, RepoResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountStatus {
    Active,
    Blocked,
    Other(String),
}

impl AccountStatus {
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "active",
            Self::Blocked => "blocked",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for AccountStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "active" => Self::Active,
            "blocked" => Self::Blocked,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Current state of an account as the gate sees it.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub status: AccountStatus,
    pub is_verified: bool,
    pub password_changed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, FromRow)]
struct AccountRow {
    id: Uuid,
    email: String,
    role: String,
    status: String,
    is_verified: bool,
    password_changed_at: Option<DateTime<Utc>>,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            role: row.role,
            status: AccountStatus::from(row.status.as_str()),
            is_verified: row.is_verified,
            password_changed_at: row.password_changed_at,
        }
    }
}

/// Read-only lookup used once per authorized request.
///
/// `id` is the raw identifier carried by the credential. Implementations return
/// `Ok(None)` for identifiers that cannot name an account.
#[async_trait]
pub trait AccountStore: Send + Sync + 'static {
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Account>>;
}

#[derive(Clone, Debug)]
pub struct PgAccountRepo {
    pool: PgPool,
}

impl PgAccountRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgAccountRepo {
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Account>> {
        // Primary keys are UUIDs; anything else cannot exist in the table.
        let Ok(account_id) = Uuid::parse_str(id) else {
            return Ok(None);
        };

        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, email, role, status, is_verified, password_changed_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepoError::Db)?;

        Ok(row.map(Account::from))
    }
}
