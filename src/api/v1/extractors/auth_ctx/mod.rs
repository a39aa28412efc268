/*!
 * Authenticated request context
 *
 * Responsibility:
 * - access gate が検証した claims (AuthCtx) を handler に渡す
 * - axum 依存 (extractor) は core に、型定義は types に分ける
 */

mod core;
mod types;

pub use core::AuthCtxExtractor;
pub use types::AuthCtx;
