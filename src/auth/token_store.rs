/// Issued-token persistence.
///
/// Access tokens are recorded once per successful login for audit and
/// session tracking. Refresh tokens are intentionally never persisted;
/// only the client holds them. Records are never updated in place.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;

/// Row shape returned by a token insert
#[derive(Debug, sqlx::FromRow)]
pub struct StoredToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub is_active: Option<bool>,
}

/// Insert one issued access token.
///
/// The caller has already handed the token to the client, so a failed
/// insert is a bookkeeping divergence and must surface as a storage
/// error, never be dropped.
///
/// # Errors
/// Returns error if the insert fails
pub async fn save_token(
    pool: &PgPool,
    user_id: Uuid,
    token: &str,
    expires_at: DateTime<Utc>,
) -> Result<StoredToken, AppError> {
    let stored = sqlx::query_as::<_, StoredToken>(
        r#"
        INSERT INTO tokens (id, user_id, token, expires_at)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, token, expires_at, is_active
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(token)
    .bind(expires_at)
    .fetch_one(pool)
    .await?;

    tracing::info!(token_id = %stored.id, user_id = %stored.user_id, "Saved issued token");

    Ok(stored)
}
