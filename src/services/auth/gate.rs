//! Per-route access gate: bearer JWT → role allow-list → live account checks.
//!
//! Checks run in a fixed order and the first failure wins:
//! credential present, signature/expiry, role, account exists, not blocked,
//! verified, password not changed after the token was issued.

use std::sync::Arc;

use axum::http::{HeaderMap, header};
use chrono::DateTime;

use crate::repos::{Account, AccountStore};
use crate::services::auth::{
    AuthService,
    access_jwt::AccessClaims,
    error::AuthError,
    role::RolePolicy,
};
use crate::state::AppState;

/// One gate per protected route group; cheap to clone.
#[derive(Clone)]
pub struct AccessGate {
    auth: Arc<AuthService>,
    accounts: Arc<dyn AccountStore>,
    policy: RolePolicy,
}

impl AccessGate {
    pub fn new(state: &AppState, policy: RolePolicy) -> Self {
        Self {
            auth: state.auth.clone(),
            accounts: state.accounts.clone(),
            policy,
        }
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub async fn authorize(&self, headers: &HeaderMap) -> Result<AccessClaims, AuthError> {
        let token = bearer_token(headers).ok_or(AuthError::MissingCredential)?;

        let claims = self.auth.verify(token)?;

        if !self.policy.permits(claims.role) {
            return Err(AuthError::RoleMismatch {
                required: self.policy.describe(),
            });
        }

        // Always read fresh: the account may have changed since the token was minted.
        let account = self
            .accounts
            .find_by_id(&claims.id)
            .await
            .map_err(AuthError::AccountLookup)?
            .ok_or(AuthError::AccountNotFound)?;

        if let Err(err) = check_standing(&account, claims.iat) {
            tracing::debug!(subject = %claims.id, reason = err.kind(), "account not in good standing");
            return Err(err);
        }

        Ok(claims)
    }
}

/// Accepts `Bearer <jwt>` or a bare `<jwt>`. Blank values count as absent.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let raw = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();

    let token = match raw.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ if raw.eq_ignore_ascii_case("bearer") => "",
        _ => raw,
    };

    (!token.is_empty()).then_some(token)
}

/// Account-state predicates, in order: blocked, unverified, stale credential.
pub fn check_standing(account: &Account, issued_at: i64) -> Result<(), AuthError> {
    if account.status.is_blocked() {
        return Err(AuthError::AccountBlocked);
    }

    if !account.is_verified {
        return Err(AuthError::AccountUnverified);
    }

    if let Some(changed_at) = account.password_changed_at {
        // An iat outside chrono's range cannot be compared; treat it as stale.
        let stale = match DateTime::from_timestamp(issued_at, 0) {
            Some(issued) => changed_at > issued,
            None => true,
        };
        if stale {
            return Err(AuthError::CredentialStale);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use chrono::Duration;

    use super::*;
    use crate::repos::AccountStatus;
    use crate::repos::memory::{InMemoryAccountStore, active_account, at};
    use crate::services::auth::access_jwt::testing::{SECRET, far_future, sign};
    use crate::services::auth::access_jwt::VerifyErrorKind;
    use crate::services::auth::role::Role;

    fn claims(id: &str, role: Role, iat: i64) -> AccessClaims {
        AccessClaims {
            id: id.into(),
            email: format!("{id}@example.com"),
            role,
            iat,
            exp: Some(far_future()),
            extra: Default::default(),
        }
    }

    fn gate(store: Arc<InMemoryAccountStore>, policy: RolePolicy) -> AccessGate {
        let state = AppState::new(Arc::new(AuthService::new(SECRET, 0)), store);
        AccessGate::new(&state, policy)
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        headers
    }

    fn store_with(id: &str, account: Account) -> Arc<InMemoryAccountStore> {
        let store = Arc::new(InMemoryAccountStore::new());
        store.insert(id, account);
        store
    }

    #[tokio::test]
    async fn missing_header_is_rejected_before_anything_else() {
        let store = Arc::new(InMemoryAccountStore::new());
        let gate = gate(store.clone(), RolePolicy::any());

        let err = gate.authorize(&HeaderMap::new()).await.unwrap_err();

        assert!(matches!(err, AuthError::MissingCredential));
        assert_eq!(err.to_string(), "token must be provided");
        assert_eq!(store.lookups(), 0);
    }

    #[tokio::test]
    async fn blank_bearer_counts_as_missing() {
        let gate = gate(Arc::new(InMemoryAccountStore::new()), RolePolicy::any());

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer   "));

        let err = gate.authorize(&headers).await.unwrap_err();
        assert!(matches!(err, AuthError::MissingCredential));
    }

    #[tokio::test]
    async fn raw_token_without_scheme_is_accepted() {
        let store = store_with("u1", active_account("u1@example.com"));
        let gate = gate(store, RolePolicy::any());
        let token = sign(&claims("u1", Role::User, 1000), SECRET);

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(&token).unwrap());

        assert!(gate.authorize(&headers).await.is_ok());
    }

    #[tokio::test]
    async fn forged_signature_surfaces_library_message() {
        let store = store_with("u1", active_account("u1@example.com"));
        let gate = gate(store.clone(), RolePolicy::any());
        let token = sign(&claims("u1", Role::User, 1000), b"wrong-secret");

        let err = gate.authorize(&bearer(&token)).await.unwrap_err();

        match &err {
            AuthError::InvalidCredential(inner) => {
                assert_eq!(inner.kind(), VerifyErrorKind::BadSignature);
                assert_eq!(err.to_string(), inner.to_string());
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(store.lookups(), 0);
    }

    #[tokio::test]
    async fn role_outside_allow_list_is_rejected_regardless_of_account() {
        // No account at all: the role check must fire first.
        let store = Arc::new(InMemoryAccountStore::new());
        let gate = gate(store.clone(), RolePolicy::new([Role::Admin]));
        let token = sign(&claims("u1", Role::User, 1000), SECRET);

        let err = gate.authorize(&bearer(&token)).await.unwrap_err();

        assert_eq!(err.to_string(), "provide one of: 'admin'");
        assert_eq!(store.lookups(), 0);
    }

    #[tokio::test]
    async fn role_message_lists_every_allowed_role_in_order() {
        let gate = gate(
            Arc::new(InMemoryAccountStore::new()),
            RolePolicy::new([Role::Admin, Role::SuperAdmin]),
        );
        let token = sign(&claims("u1", Role::User, 1000), SECRET);

        let err = gate.authorize(&bearer(&token)).await.unwrap_err();
        assert_eq!(err.to_string(), "provide one of: 'admin' or 'super_admin'");
    }

    #[tokio::test]
    async fn listed_role_passes_the_role_check() {
        let store = store_with("a1", active_account("a1@example.com"));
        let gate = gate(store, RolePolicy::new([Role::Admin, Role::SuperAdmin]));
        let token = sign(&claims("a1", Role::SuperAdmin, 1000), SECRET);

        assert!(gate.authorize(&bearer(&token)).await.is_ok());
    }

    #[tokio::test]
    async fn deleted_account_is_rejected() {
        let store = store_with("u1", active_account("u1@example.com"));
        store.remove("u1");
        let gate = gate(store, RolePolicy::any());
        let token = sign(&claims("u1", Role::User, 1000), SECRET);

        let err = gate.authorize(&bearer(&token)).await.unwrap_err();
        assert_eq!(err.to_string(), "user does not exist");
    }

    #[tokio::test]
    async fn store_failure_fails_closed() {
        let gate = gate(Arc::new(InMemoryAccountStore::failing()), RolePolicy::any());
        let token = sign(&claims("u1", Role::User, 1000), SECRET);

        let err = gate.authorize(&bearer(&token)).await.unwrap_err();
        assert!(matches!(err, AuthError::AccountLookup(_)));
    }

    #[tokio::test]
    async fn blocked_and_unverified_reports_blocked() {
        let mut account = active_account("u1@example.com");
        account.status = AccountStatus::Blocked;
        account.is_verified = false;
        let gate = gate(store_with("u1", account), RolePolicy::any());
        let token = sign(&claims("u1", Role::Admin, 1000), SECRET);

        let err = gate.authorize(&bearer(&token)).await.unwrap_err();
        assert_eq!(err.to_string(), "user is blocked");
    }

    #[tokio::test]
    async fn unverified_account_is_rejected() {
        let mut account = active_account("u1@example.com");
        account.is_verified = false;
        let gate = gate(store_with("u1", account), RolePolicy::any());
        let token = sign(&claims("u1", Role::User, 1000), SECRET);

        let err = gate.authorize(&bearer(&token)).await.unwrap_err();
        assert_eq!(err.to_string(), "account not verified");
    }

    #[tokio::test]
    async fn password_changed_after_issue_invalidates_token() {
        let mut account = active_account("u1@example.com");
        account.password_changed_at = Some(at(1001));
        let gate = gate(store_with("u1", account), RolePolicy::any());
        let token = sign(&claims("u1", Role::User, 1000), SECRET);

        let err = gate.authorize(&bearer(&token)).await.unwrap_err();
        assert_eq!(err.to_string(), "password changed, login again");
    }

    #[tokio::test]
    async fn password_changed_before_issue_is_fine() {
        let mut account = active_account("u1@example.com");
        account.password_changed_at = Some(at(999));
        let gate = gate(store_with("u1", account), RolePolicy::any());
        let token = sign(&claims("u1", Role::User, 1000), SECRET);

        assert!(gate.authorize(&bearer(&token)).await.is_ok());
    }

    #[tokio::test]
    async fn success_returns_the_decoded_payload_unchanged() {
        let store = store_with("u1", active_account("u1@example.com"));
        let gate = gate(store.clone(), RolePolicy::any());
        let expected = claims("u1", Role::User, 1000);
        let token = sign(&expected, SECRET);

        let got = gate.authorize(&bearer(&token)).await.unwrap();

        assert_eq!(got, expected);
        assert_eq!(store.lookups(), 1);
    }

    #[tokio::test]
    async fn token_without_expiry_is_allowed_for_a_healthy_account() {
        let store = store_with("u1", active_account("u1@example.com"));
        let gate = gate(store, RolePolicy::any());
        let payload = serde_json::json!({
            "id": "u1",
            "email": "u1@example.com",
            "role": "user",
            "iat": 1000,
        });
        let token = sign(&payload, SECRET);

        let got = gate.authorize(&bearer(&token)).await.unwrap();

        assert_eq!(got.exp, None);
        assert_eq!(serde_json::to_value(&got).unwrap(), payload);
    }

    #[tokio::test]
    async fn expired_token_is_rejected_before_lookup() {
        let store = store_with("u1", active_account("u1@example.com"));
        let gate = gate(store.clone(), RolePolicy::any());
        let mut expired = claims("u1", Role::User, 1000);
        expired.exp = Some((chrono::Utc::now().timestamp() - 120) as u64);

        let err = gate.authorize(&bearer(&sign(&expired, SECRET))).await.unwrap_err();

        assert!(matches!(
            &err,
            AuthError::InvalidCredential(inner) if inner.kind() == VerifyErrorKind::Expired
        ));
        assert_eq!(store.lookups(), 0);
    }

    #[tokio::test]
    async fn account_state_is_read_on_every_request() {
        let store = store_with("u1", active_account("u1@example.com"));
        let gate = gate(store.clone(), RolePolicy::any());
        let token = sign(&claims("u1", Role::User, 1000), SECRET);

        assert!(gate.authorize(&bearer(&token)).await.is_ok());

        let mut blocked = active_account("u1@example.com");
        blocked.status = AccountStatus::Blocked;
        store.insert("u1", blocked);

        let err = gate.authorize(&bearer(&token)).await.unwrap_err();
        assert!(matches!(err, AuthError::AccountBlocked));
        assert_eq!(store.lookups(), 2);
    }

    #[test]
    fn staleness_boundary_matches_issue_second() {
        let mut account = active_account("u1@example.com");

        account.password_changed_at = Some(at(1000));
        assert!(check_standing(&account, 1000).is_ok());

        // Sub-second changes after the issuing second still count as later.
        account.password_changed_at = Some(at(1000) + Duration::milliseconds(500));
        assert!(matches!(
            check_standing(&account, 1000),
            Err(AuthError::CredentialStale)
        ));

        account.password_changed_at = None;
        assert!(check_standing(&account, 1000).is_ok());
    }

    #[test]
    fn unknown_status_is_not_treated_as_blocked() {
        let mut account = active_account("u1@example.com");
        account.status = AccountStatus::Other("pending".into());
        assert!(check_standing(&account, 1000).is_ok());
    }
}
