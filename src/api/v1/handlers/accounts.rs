/*
 * Responsibility
 * - GET /admin/accounts/{account_id} (admin / super_admin のみ, gate 側で制御)
 */
use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    api::v1::{dto::accounts::AccountResponse, extractors::AuthCtxExtractor},
    error::AppError,
    state::AppState,
};

pub async fn get_account(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(account_id): Path<String>,
) -> Result<Json<AccountResponse>, AppError> {
    tracing::info!(actor = ctx.user_id(), role = %ctx.role(), account_id, "admin account lookup");

    let account = state
        .accounts
        .find_by_id(&account_id)
        .await?
        .ok_or(AppError::not_found("account"))?;

    Ok(Json(account.into()))
}
