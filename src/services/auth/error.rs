use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::auth::access_jwt::VerifyError;

/// Why the access gate refused a request. `Display` is the client-facing reason.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token must be provided")]
    MissingCredential,

    #[error(transparent)]
    InvalidCredential(#[from] VerifyError),

    #[error("provide one of: {required}")]
    RoleMismatch { required: String },

    #[error("user does not exist")]
    AccountNotFound,

    #[error("user is blocked")]
    AccountBlocked,

    #[error("account not verified")]
    AccountUnverified,

    #[error("password changed, login again")]
    CredentialStale,

    #[error("account lookup failed")]
    AccountLookup(#[source] RepoError),
}

impl AuthError {
    /// Stable label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::InvalidCredential(_) => "invalid_credential",
            Self::RoleMismatch { .. } => "role_mismatch",
            Self::AccountNotFound => "account_not_found",
            Self::AccountBlocked => "account_blocked",
            Self::AccountUnverified => "account_unverified",
            Self::CredentialStale => "credential_stale",
            Self::AccountLookup(_) => "account_lookup",
        }
    }

    /// Reason sent back in `error.message`.
    ///
    /// Verification failures carry the library's text unless masking is on.
    pub fn client_message(&self, expose_verify_errors: bool) -> String {
        match self {
            Self::InvalidCredential(_) if !expose_verify_errors => "invalid token".to_string(),
            other => other.to_string(),
        }
    }
}
