use std::collections::HashSet;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::services::auth::role::Role;

/// Access token (JWT) claims.
///
/// This is the whole decoded payload; handlers receive it unchanged.
/// Claims the gate does not read are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyErrorKind {
    Expired,
    BadSignature,
    Malformed,
    Rejected,
}

impl VerifyErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expired => "expired",
            Self::BadSignature => "bad_signature",
            Self::Malformed => "malformed",
            Self::Rejected => "rejected",
        }
    }
}

/// Verification failure. `Display` is the verification library's own text.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct VerifyError {
    kind: VerifyErrorKind,
    source: jsonwebtoken::errors::Error,
}

impl VerifyError {
    pub fn kind(&self) -> VerifyErrorKind {
        self.kind
    }
}

impl From<jsonwebtoken::errors::Error> for VerifyError {
    fn from(source: jsonwebtoken::errors::Error) -> Self {
        let kind = match source.kind() {
            ErrorKind::ExpiredSignature => VerifyErrorKind::Expired,
            ErrorKind::InvalidSignature => VerifyErrorKind::BadSignature,
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_)
            | ErrorKind::MissingRequiredClaim(_) => VerifyErrorKind::Malformed,
            _ => VerifyErrorKind::Rejected,
        };
        Self { kind, source }
    }
}

/// HS256 access-token verifier plus the gate's exposure policy.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct AuthService {
    decoding_key: DecodingKey,
    validation: Validation,
    expose_verify_errors: bool,
    mirror_legacy_headers: bool,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("AuthService")
            .field("validation", &self.validation)
            .field("expose_verify_errors", &self.expose_verify_errors)
            .field("mirror_legacy_headers", &self.mirror_legacy_headers)
            .finish()
    }
}

impl AuthService {
    pub fn new(secret: &[u8], leeway_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Tokens carry no audience. `exp` is optional but enforced when present.
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::new();
        validation.leeway = leeway_seconds;

        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            expose_verify_errors: true,
            mirror_legacy_headers: true,
        }
    }

    pub fn with_verify_error_exposure(mut self, expose: bool) -> Self {
        self.expose_verify_errors = expose;
        self
    }

    pub fn with_legacy_headers(mut self, mirror: bool) -> Self {
        self.mirror_legacy_headers = mirror;
        self
    }

    // Verify signature and expiry, then decode the claims.
    pub fn verify(&self, token: &str) -> Result<AccessClaims, VerifyError> {
        let data = jsonwebtoken::decode::<AccessClaims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }

    pub fn exposes_verify_errors(&self) -> bool {
        self.expose_verify_errors
    }

    pub fn mirrors_legacy_headers(&self) -> bool {
        self.mirror_legacy_headers
    }
}
