/// User routes
///
/// User creation (identity + employee profile), login (token issuance),
/// and the protected salary lookup.

use actix_web::{web, HttpResponse};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{
    authenticate, create_access_token, create_refresh_token, decode_jwt, hash_password,
    save_token, Claims, JwtKeys,
};
use crate::configuration::JwtSettings;
use crate::error::{AppError, DatabaseError};
use crate::validators::{is_valid_full_name, is_valid_login, is_valid_password};

/// User creation request
#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub login: String,
    pub password: String,
    pub full_name: String,
    pub salary: i64,
    pub next_raise_date: Option<DateTime<Utc>>,
}

/// Login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

/// Created user view, joined across users and employees
#[derive(Serialize)]
pub struct UserResponse {
    pub user_id: String,
    pub employee_id: String,
    pub login: String,
    pub full_name: String,
    pub salary: i64,
    pub next_raise_date: Option<DateTime<Utc>>,
}

/// Issued token pair
#[derive(Serialize)]
pub struct TokenResponse {
    pub token_type: String,
    pub access_token: String,
    pub refresh_token: String,
}

/// Salary view for the authenticated user
#[derive(Serialize)]
pub struct SalaryResponse {
    pub user_id: String,
    pub employee_id: String,
    pub salary: i64,
    pub next_raise_date: Option<DateTime<Utc>>,
}

/// POST /user/create
///
/// Create an employee profile and its user in one transaction. The
/// unique FK on `users.employee_id` plus the insert order keep the
/// Employee-User relationship exactly 1:1.
///
/// # Errors
/// - 400: invalid login/password/full_name
/// - 409: login already registered
/// - 500: storage failure (transaction rolled back, nothing persisted)
pub async fn create_user(
    form: web::Json<CreateUserRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let login = is_valid_login(&form.login)?;
    let full_name = is_valid_full_name(&form.full_name)?;
    is_valid_password(&form.password)?;
    let password_hash = hash_password(&form.password)?;

    let mut tx = pool.begin().await?;

    let employee_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO employees (id, full_name, salary, next_raise_date)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(employee_id)
    .bind(&full_name)
    .bind(form.salary)
    .bind(form.next_raise_date)
    .execute(&mut tx)
    .await?;

    let user_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO users (id, login, password, employee_id)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(user_id)
    .bind(&login)
    .bind(&password_hash)
    .bind(employee_id)
    .execute(&mut tx)
    .await?;

    tx.commit().await?;

    tracing::info!(user_id = %user_id, employee_id = %employee_id, login = %login, "Created user");

    Ok(HttpResponse::Created().json(UserResponse {
        user_id: user_id.to_string(),
        employee_id: employee_id.to_string(),
        login,
        full_name,
        salary: form.salary,
        next_raise_date: form.next_raise_date,
    }))
}

/// POST /user/login
///
/// Verify credentials and issue an access/refresh token pair. The access
/// token is recorded in the tokens table; the refresh token is only
/// handed to the client. A failed token save is a 500: the token is
/// already out, so silent bookkeeping divergence is not acceptable.
///
/// # Errors
/// - 401 + `WWW-Authenticate: Bearer`: unknown login or wrong password,
///   indistinguishable outward
/// - 500: token save failure
pub async fn login(
    form: web::Json<LoginRequest>,
    pool: web::Data<PgPool>,
    keys: web::Data<JwtKeys>,
    jwt_settings: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let user = authenticate(pool.get_ref(), &form.login, &form.password).await?;

    let access_token = create_access_token(&user, keys.get_ref(), jwt_settings.get_ref())?;
    let refresh_token = create_refresh_token(&user, keys.get_ref(), jwt_settings.get_ref())?;

    // Read the expiry back out of the signed token so the stored record
    // matches what the client holds exactly.
    let claims = decode_jwt(&access_token, keys.get_ref())?;
    let expires_at = Utc
        .timestamp_opt(claims.exp, 0)
        .single()
        .ok_or_else(|| AppError::Internal("Token expiry out of range".to_string()))?;

    save_token(pool.get_ref(), user.user_id, &access_token, expires_at).await?;

    tracing::info!(user_id = %user.user_id, "Issued token pair");

    Ok(HttpResponse::Ok().json(TokenResponse {
        token_type: "Bearer".to_string(),
        access_token,
        refresh_token,
    }))
}

/// GET /user/salary/get
///
/// Return the authenticated user's salary. Requires a valid access
/// bearer token; claims are injected by the JWT middleware.
///
/// # Errors
/// - 401: missing, invalid, or wrong-type token (middleware)
/// - 404: no employee row joins to the identity
pub async fn get_salary(
    claims: web::ReqData<Claims>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;

    let row = sqlx::query_as::<_, (Uuid, Uuid, i64, Option<DateTime<Utc>>)>(
        r#"
        SELECT u.id, e.id, e.salary, e.next_raise_date
        FROM users u
        JOIN employees e ON u.employee_id = e.id
        WHERE u.id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool.get_ref())
    .await?;

    let (user_id, employee_id, salary, next_raise_date) = row.ok_or_else(|| {
        tracing::info!(user_id = %user_id, "Salary lookup found no employee row");
        AppError::Database(DatabaseError::NotFound("Salary not found".to_string()))
    })?;

    Ok(HttpResponse::Ok().json(SalaryResponse {
        user_id: user_id.to_string(),
        employee_id: employee_id.to_string(),
        salary,
        next_raise_date,
    }))
}
