/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - access gate が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - JWT 検証やアカウント状態のチェックは middleware/services 側の責務
 * - 中身は検証済み claims そのもの (追加・削除・改名なし), 生成後は不変
 */

use crate::services::auth::{AccessClaims, Role};

/// 認証済みのリクエストに付与されるコンテキスト
#[derive(Debug, Clone)]
pub struct AuthCtx {
    claims: AccessClaims,
}

impl AuthCtx {
    pub fn new(claims: AccessClaims) -> Self {
        Self { claims }
    }

    pub fn claims(&self) -> &AccessClaims {
        &self.claims
    }

    pub fn user_id(&self) -> &str {
        &self.claims.id
    }

    pub fn role(&self) -> Role {
        self.claims.role
    }
}
