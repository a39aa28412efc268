/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: route 単位の access gate, http: 全体にかける transport 系 layer
 */
pub mod auth;
pub mod http;
