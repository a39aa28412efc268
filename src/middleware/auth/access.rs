//! access token（HS256 JWT）検証 + アカウント状態チェック → AuthCtx を extensions に入れる
//!
//! - 判定そのものは `services::auth::gate::AccessGate` が行う (ここは HTTP の配線のみ)
//! - 拒否時は常に 401 + 固定形の JSON (`AuthRejection`)
//! - 成功時、互換用に `email` / `id` / `role` ヘッダへ claims を複写する (設定で無効化可)

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, Request},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AuthRejection;
use crate::services::auth::{AccessClaims, AccessGate, AuthError, RolePolicy};
use crate::state::AppState;

const LEGACY_EMAIL: HeaderName = HeaderName::from_static("email");
const LEGACY_ID: HeaderName = HeaderName::from_static("id");
const LEGACY_ROLE: HeaderName = HeaderName::from_static("role");

/// 指定した route 群に access gate を掛ける。`policy` が空なら認証済みであれば誰でも通す。
///
/// 例：
/// ```ignore
/// let admin = Router::new().route("/admin/accounts/{account_id}", get(get_account));
/// let admin = middleware::auth::access::require(admin, &state, RolePolicy::new([Role::Admin]));
/// ```
pub fn require(router: Router<AppState>, state: &AppState, policy: RolePolicy) -> Router<AppState> {
    let gate = AccessGate::new(state, policy);
    // route_layer: マッチした route にだけ適用する (404 は gate を通さない)
    router.route_layer(middleware::from_fn_with_state(gate, access_middleware))
}

async fn access_middleware(
    State(gate): State<AccessGate>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthRejection> {
    // クライアントが送ってきた互換ヘッダは信用しない
    strip_legacy_headers(req.headers_mut());

    let claims = match gate.authorize(req.headers()).await {
        Ok(claims) => claims,
        Err(err) => {
            log_rejection(&err);
            return Err(AuthRejection::new(
                err.client_message(gate.auth().exposes_verify_errors()),
            ));
        }
    };

    if gate.auth().mirrors_legacy_headers() {
        mirror_legacy_headers(req.headers_mut(), &claims);
    }

    tracing::debug!(subject = %claims.id, role = %claims.role, "access granted");

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(AuthCtx::new(claims));

    Ok(next.run(req).await)
}

fn log_rejection(err: &AuthError) {
    match err {
        AuthError::AccountLookup(source) => {
            tracing::error!(error = ?source, "account lookup failed during authorization");
        }
        AuthError::InvalidCredential(verify) => {
            tracing::warn!(
                reason = err.kind(),
                verify = verify.kind().as_str(),
                "access token verification failed"
            );
        }
        _ => {
            tracing::warn!(reason = err.kind(), "request rejected by access gate");
        }
    }
}

fn strip_legacy_headers(headers: &mut HeaderMap) {
    headers.remove(LEGACY_EMAIL);
    headers.remove(LEGACY_ID);
    headers.remove(LEGACY_ROLE);
}

fn mirror_legacy_headers(headers: &mut HeaderMap, claims: &AccessClaims) {
    let values = [
        (LEGACY_EMAIL, claims.email.as_str()),
        (LEGACY_ID, claims.id.as_str()),
        (LEGACY_ROLE, claims.role.as_str()),
    ];

    for (name, value) in values {
        match HeaderValue::from_str(value) {
            Ok(v) => {
                headers.insert(name, v);
            }
            Err(_) => {
                // 不正な文字を含む値はヘッダに載せられない (AuthCtx 側には残る)
                tracing::warn!(header = %name, "claim not representable as header; skipped");
            }
        }
    }
}
