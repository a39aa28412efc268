/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - auth: トークン検証 (秘密鍵は起動時に確定), accounts: アカウント参照
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::repos::AccountStore;
use crate::services::auth::AuthService;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub accounts: Arc<dyn AccountStore>,
}

impl AppState {
    pub fn new(auth: Arc<AuthService>, accounts: Arc<dyn AccountStore>) -> Self {
        Self { auth, accounts }
    }
}
