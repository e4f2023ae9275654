//! Signed bearer tokens.
//!
//! Tokens are HS256 JWTs carrying the username as `sub` and, for tokens
//! issued by the current auth service, a `role` claim. Nothing is persisted:
//! every use re-verifies signature and expiry, and there is no revocation.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::role::Role;

/// Username that counts as an administrator when a token has no role claim.
pub const LEGACY_ADMIN_USERNAME: &str = "admin";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // username
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        is_admin_identity(&self.sub, self.role.as_deref())
    }
}

/// Administrator check with two explicit paths.
///
/// 1. A role claim, when present, decides alone: `ADMIN` in any case.
/// 2. Without a role claim (tokens minted before roles were carried), the
///    literal username `admin` in any case is treated as the administrator.
pub fn is_admin_identity(username: &str, role: Option<&str>) -> bool {
    match role {
        Some(role) => role.eq_ignore_ascii_case(Role::Admin.as_str()),
        None => is_legacy_admin_username(username),
    }
}

pub fn is_legacy_admin_username(username: &str) -> bool {
    username.eq_ignore_ascii_case(LEGACY_ADMIN_USERNAME)
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("invalid token: {0}")]
    Invalid(String),

    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid(err.to_string()),
        }
    }
}

/// Issues and verifies tokens with a shared HMAC secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    validity: Duration,
}

impl TokenService {
    pub fn new(secret: &str, validity: Duration) -> Self {
        // Expiry is exact: no clock-skew allowance.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            validity,
        }
    }

    /// For services that only check tokens issued elsewhere.
    pub fn verifier(secret: &str) -> Self {
        Self::new(secret, Duration::zero())
    }

    pub fn issue(&self, username: &str, role: Role) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: username.to_string(),
            role: Some(role.as_str().to_string()),
            iat: now.timestamp(),
            exp: (now + self.validity).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Checks signature and expiry and returns the embedded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        Ok(data.claims)
    }

    pub fn extract_username(&self, token: &str) -> Result<String, TokenError> {
        Ok(self.verify(token)?.sub)
    }

    /// `Ok(None)` means a valid token without a role claim.
    pub fn extract_role(&self, token: &str) -> Result<Option<String>, TokenError> {
        Ok(self.verify(token)?.role)
    }

    pub fn is_admin(&self, token: &str) -> Result<bool, TokenError> {
        Ok(self.verify(token)?.is_admin())
    }
}
