use std::sync::OnceLock;

use axum::{extract::State, Json};
use chrono::Utc;
use regex::Regex;
use spotter_shared::api::{ProfileResponse, SetUsernameRequest};
use spotter_shared::Profile;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::routes::AppState;

fn username_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]{3,20}$").unwrap())
}

fn validate_username(username: &str) -> Result<(), AppError> {
    if username_pattern().is_match(username) {
        Ok(())
    } else {
        Err(AppError::Validation(
            "Username must be 3-20 characters: letters, digits, '-' or '_'".to_string(),
        ))
    }
}

/// GET /api/v1/users/me
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let row: Option<(String, Option<String>, Option<String>, Option<i64>, Option<i64>)> =
        sqlx::query_as(
            r#"
            SELECT u.display_name, s.username, s.avatar_url, s.total_points, s.total_spots
            FROM users u
            LEFT JOIN user_stats s ON s.user_id = u.id
            WHERE u.id = $1
            "#,
        )
        .bind(user.id)
        .fetch_optional(&state.db)
        .await?;

    let (display_name, username, avatar_url, total_points, total_spots) =
        row.ok_or(AppError::NotFound)?;

    Ok(Json(ProfileResponse {
        user_id: user.id,
        display_name,
        profile: Profile::from_columns(username, avatar_url),
        total_points: total_points.unwrap_or(0),
        total_spots: total_spots.unwrap_or(0),
    }))
}

/// PUT /api/v1/users/username
///
/// Registers or changes the caller's unique username. Creates the lazy stats
/// row with zero totals when this is the first thing the user ever does.
/// A rejected request leaves both users' rows untouched.
pub async fn set_username(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<SetUsernameRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    validate_username(&req.username)?;

    let taken: Option<(Uuid,)> =
        sqlx::query_as("SELECT user_id FROM user_stats WHERE username = $1")
            .bind(&req.username)
            .fetch_optional(&state.db)
            .await?;

    if let Some((owner,)) = taken {
        if owner != user.id {
            return Err(AppError::AlreadyExists("Username already taken".to_string()));
        }
    }

    // A racing registration of the same name lands on the UNIQUE index
    // instead of the pre-check; it is the same conflict either way.
    sqlx::query(
        r#"
        INSERT INTO user_stats (user_id, username, total_points, total_spots, updated_at)
        VALUES ($1, $2, 0, 0, $3)
        ON CONFLICT (user_id) DO UPDATE
        SET username = EXCLUDED.username,
            updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(user.id)
    .bind(&req.username)
    .bind(Utc::now())
    .execute(&state.db)
    .await
    .map_err(|e| AppError::conflict_on_unique(e, "Username already taken"))?;

    me(State(state), user).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_usernames() {
        for name in ["abc", "Yellow_Car-42", "a".repeat(20).as_str()] {
            assert!(validate_username(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn rejects_bad_length_and_charset() {
        for name in ["ab", "a".repeat(21).as_str(), "has space", "naïve", "dot.name", ""] {
            assert!(validate_username(name).is_err(), "{name:?} should be rejected");
        }
    }
}
