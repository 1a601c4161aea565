/// Credential verification.
///
/// Looks up a login and compares the supplied password against the stored
/// bcrypt hash. Unknown login and wrong password are distinguished only in
/// server-side logs; the caller always gets the same `InvalidCredentials`
/// failure, so responses cannot be used to enumerate logins.

use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::password::verify_password;
use crate::error::{AppError, AuthError};

/// Minimal authenticated identity, never carries the stored hash
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub login: String,
}

/// Verify a login/password pair against the users table.
///
/// # Errors
/// - `InvalidCredentials` for unknown login or wrong password
/// - database errors propagate as storage failures
pub async fn authenticate(
    pool: &PgPool,
    login: &str,
    password: &str,
) -> Result<AuthenticatedUser, AppError> {
    let row = sqlx::query_as::<_, (Uuid, String, String)>(
        "SELECT id, login, password FROM users WHERE login = $1",
    )
    .bind(login)
    .fetch_optional(pool)
    .await?;

    match row {
        None => {
            tracing::warn!(login = login, "Login attempt for unknown login");
            Err(AppError::Auth(AuthError::InvalidCredentials))
        }
        Some((user_id, login, stored_hash)) => {
            if verify_password(password, &stored_hash) {
                tracing::info!(user_id = %user_id, login = %login, "Credentials verified");
                Ok(AuthenticatedUser { user_id, login })
            } else {
                tracing::warn!(user_id = %user_id, "Login attempt with wrong password");
                Err(AppError::Auth(AuthError::InvalidCredentials))
            }
        }
    }
}
