/// JWT claims structure.
///
/// The signed payload carries the token type alongside identity and the
/// standard timing claims (RFC 7519). The `type` claim is checked on
/// every protected use; access and refresh tokens are never
/// interchangeable at verification time.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::auth::credentials::AuthenticatedUser;
use crate::error::{AppError, AuthError};

/// Discriminator stored in the `type` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::Access => write!(f, "access"),
            TokenType::Refresh => write!(f, "refresh"),
        }
    }
}

/// Claims signed into every issued token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Token type discriminator
    #[serde(rename = "type")]
    pub token_type: TokenType,
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// User ID, duplicated from `sub` for explicit lookup
    pub user_id: String,
    /// Login, carried by access tokens only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp), always `iat` + policy window
    pub exp: i64,
}

impl Claims {
    /// Build claims for a user with the given expiry window from now.
    pub fn new(token_type: TokenType, user: &AuthenticatedUser, window: Duration) -> Self {
        let now = chrono::Utc::now().timestamp();
        let login = match token_type {
            TokenType::Access => Some(user.login.clone()),
            TokenType::Refresh => None,
        };
        Self {
            token_type,
            sub: user.user_id.to_string(),
            user_id: user.user_id.to_string(),
            login,
            iat: now,
            exp: now + window.num_seconds(),
        }
    }

    /// Extract the user ID from the claims.
    ///
    /// # Errors
    /// Returns `InvalidToken` if the `user_id` claim is not a valid UUID.
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.user_id).map_err(|_| AppError::Auth(AuthError::InvalidToken))
    }

    /// Reject the claims unless they carry the expected token type.
    ///
    /// # Errors
    /// Returns `WrongTokenType` on mismatch.
    pub fn require_type(&self, expected: TokenType) -> Result<(), AppError> {
        if self.token_type != expected {
            return Err(AppError::Auth(AuthError::WrongTokenType {
                found: self.token_type.to_string(),
                expected: expected.to_string(),
            }));
        }
        Ok(())
    }
}
