/*
 * Responsibility
 * - GET /me: gate が付与した claims をそのまま返す
 */
use axum::Json;

use crate::api::v1::{dto::accounts::MeResponse, extractors::AuthCtxExtractor};

pub async fn me(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<MeResponse> {
    Json(MeResponse {
        claims: ctx.claims().clone(),
    })
}
