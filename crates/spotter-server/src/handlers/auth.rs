use axum::{extract::State, Json};
use chrono::Utc;
use spotter_shared::api::{AuthResponse, LoginRequest, RefreshRequest, RegisterRequest};
use spotter_shared::User;
use uuid::Uuid;

use crate::auth::{decode_token, hash_password, sign_token, verify_password, AuthUser, Claims};
use crate::error::AppError;
use crate::routes::AppState;

async fn issue_tokens(
    state: &AppState,
    user_id: Uuid,
    email: &str,
) -> Result<AuthResponse, AppError> {
    let secret = &state.config.jwt_secret;
    let access_token = sign_token(&Claims::new(user_id, email, state.config.jwt_expires_in), secret)?;
    let refresh_token = sign_token(
        &Claims::new(user_id, email, state.config.refresh_token_expires_in),
        secret,
    )?;

    // Store refresh token hash
    let token_hash = hash_password(&refresh_token)?;
    let expires_at = Utc::now() + chrono::Duration::seconds(state.config.refresh_token_expires_in);

    sqlx::query(
        r#"
        INSERT INTO refresh_tokens (user_id, token_hash, expires_at)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(user_id)
    .bind(&token_hash)
    .bind(expires_at)
    .execute(&state.db)
    .await?;

    Ok(AuthResponse {
        access_token,
        refresh_token,
        user_id,
    })
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    if req.email.is_empty() || req.password.is_empty() || req.display_name.is_empty() {
        return Err(AppError::Validation("All fields are required".to_string()));
    }

    if req.password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(&req.email)
        .fetch_optional(&state.db)
        .await?;

    if existing.is_some() {
        return Err(AppError::AlreadyExists("Email already registered".to_string()));
    }

    let password_hash = hash_password(&req.password)?;
    let user_id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO users (id, email, password_hash, display_name)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(user_id)
    .bind(&req.email)
    .bind(&password_hash)
    .bind(&req.display_name)
    .execute(&state.db)
    .await?;

    let tokens = issue_tokens(&state, user_id, &req.email).await?;
    Ok(Json(tokens))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let row: Option<(Uuid, String, String)> =
        sqlx::query_as("SELECT id, email, password_hash FROM users WHERE email = $1")
            .bind(&req.email)
            .fetch_optional(&state.db)
            .await?;

    let (user_id, email, password_hash) = row.ok_or(AppError::Unauthorized)?;

    if !verify_password(&req.password, &password_hash)? {
        return Err(AppError::Unauthorized);
    }

    sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
        .bind(user_id)
        .execute(&state.db)
        .await?;

    let tokens = issue_tokens(&state, user_id, &email).await?;
    Ok(Json(tokens))
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let claims = decode_token(&req.refresh_token, &state.config.jwt_secret)?;

    // The presented token must match a stored, unexpired hash
    let rows: Vec<(i64, String)> = sqlx::query_as(
        "SELECT id, token_hash FROM refresh_tokens WHERE user_id = $1 AND expires_at > NOW()",
    )
    .bind(claims.sub)
    .fetch_all(&state.db)
    .await?;

    let matched = rows
        .iter()
        .find(|(_, hash)| verify_password(&req.refresh_token, hash).unwrap_or(false))
        .map(|(id, _)| *id)
        .ok_or(AppError::Unauthorized)?;

    // Rotate: drop the used token before issuing a new pair
    sqlx::query("DELETE FROM refresh_tokens WHERE id = $1")
        .bind(matched)
        .execute(&state.db)
        .await?;

    let tokens = issue_tokens(&state, claims.sub, &claims.email).await?;
    Ok(Json(tokens))
}

pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<User>, AppError> {
    let row: Option<(Uuid, String, String, chrono::DateTime<Utc>)> =
        sqlx::query_as("SELECT id, email, display_name, created_at FROM users WHERE id = $1")
            .bind(user.id)
            .fetch_optional(&state.db)
            .await?;

    let (id, email, display_name, created_at) = row.ok_or(AppError::NotFound)?;

    Ok(Json(User {
        id,
        email,
        display_name,
        created_at,
    }))
}
