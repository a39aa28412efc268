/*
 * Responsibility
 * - accounts / me の response DTO
 */
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::repos::Account;
use crate::services::auth::AccessClaims;

#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub status: String,
    pub is_verified: bool,
    pub password_changed_at: Option<DateTime<Utc>>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email,
            role: account.role,
            status: account.status.as_str().to_string(),
            is_verified: account.is_verified,
            password_changed_at: account.password_changed_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub claims: AccessClaims,
}
