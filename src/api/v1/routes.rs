/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - route 群ごとに access gate (許可ロール) を決める
 *   - /health: 公開
 *   - /me: 認証済みなら誰でも
 *   - /admin/...: admin, super_admin
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::{accounts::get_account, health::health, me::me};
use crate::middleware::auth::access;
use crate::services::auth::{Role, RolePolicy};
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    let authenticated = access::require(
        Router::new().route("/me", get(me)),
        state,
        RolePolicy::any(),
    );

    let admin = access::require(
        Router::new().route("/admin/accounts/{account_id}", get(get_account)),
        state,
        RolePolicy::new([Role::Admin, Role::SuperAdmin]),
    );

    Router::new()
        .route("/health", get(health))
        .merge(authenticated)
        .merge(admin)
}
