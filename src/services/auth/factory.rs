/// Factory: build `AuthService` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::AuthService;

pub fn build_auth_service(config: &Config) -> Arc<AuthService> {
    let auth = AuthService::new(
        config.jwt_access_secret.as_bytes(),
        config.access_token_leeway_seconds,
    )
    .with_verify_error_exposure(config.expose_verify_errors)
    .with_legacy_headers(config.mirror_legacy_headers);

    tracing::debug!(auth = ?auth, "access token verifier ready");

    Arc::new(auth)
}
