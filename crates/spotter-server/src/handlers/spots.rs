use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use spotter_shared::api::{
    CreateSpotRequest, CreateSpotResponse, SpotFeedEntry, UploadUrlResponse, UserStatsResponse,
};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::routes::AppState;

/// POST /api/v1/spots
///
/// Records a sighting and bumps the submitter's running totals. The stats
/// update is a single atomic in-place increment, so two uploads in flight
/// from the same user both land (last writer merges by addition, never
/// overwrite).
pub async fn create_spot(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateSpotRequest>,
) -> Result<Json<CreateSpotResponse>, AppError> {
    if req.image_id.is_nil() {
        return Err(AppError::Validation("Missing image reference".to_string()));
    }

    let spot_id = Uuid::new_v4();
    let points = state.config.spot_points;
    let now = Utc::now();

    let mut tx = state.db.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO spots (id, user_id, image_id, points, description, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(spot_id)
    .bind(user.id)
    .bind(req.image_id)
    .bind(points)
    .bind(&req.description)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO user_stats (user_id, total_points, total_spots, updated_at)
        VALUES ($1, $2, 1, $3)
        ON CONFLICT (user_id) DO UPDATE
        SET total_points = user_stats.total_points + EXCLUDED.total_points,
            total_spots = user_stats.total_spots + 1,
            updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(user.id)
    .bind(points)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(Json(CreateSpotResponse { spot_id }))
}

/// GET /api/v1/stats/me
pub async fn my_stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<UserStatsResponse>, AppError> {
    let row: Option<(String, Option<i64>, Option<i64>)> = sqlx::query_as(
        r#"
        SELECT u.display_name, s.total_points, s.total_spots
        FROM users u
        LEFT JOIN user_stats s ON s.user_id = u.id
        WHERE u.id = $1
        "#,
    )
    .bind(user.id)
    .fetch_optional(&state.db)
    .await?;

    let (name, total_points, total_spots) = row.ok_or(AppError::NotFound)?;

    // No stats row yet just means nothing submitted so far
    Ok(Json(UserStatsResponse {
        name,
        total_points: total_points.unwrap_or(0),
        total_spots: total_spots.unwrap_or(0),
    }))
}

/// GET /api/v1/spots/recent
///
/// The caller's ten latest spots, newest first, image references resolved to
/// fetchable URLs.
pub async fn recent_spots(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<SpotFeedEntry>>, AppError> {
    let rows: Vec<(Uuid, Uuid, i64, Option<String>, DateTime<Utc>)> = sqlx::query_as(
        r#"
        SELECT id, image_id, points, description, created_at
        FROM spots
        WHERE user_id = $1
        ORDER BY created_at DESC
        LIMIT 10
        "#,
    )
    .bind(user.id)
    .fetch_all(&state.db)
    .await?;

    let feed = rows
        .into_iter()
        .map(|(id, image_id, points, description, created_at)| SpotFeedEntry {
            id,
            points,
            description,
            image_url: format!("{}/{}", state.config.image_store_url, image_id),
            created_at,
        })
        .collect();

    Ok(Json(feed))
}

/// POST /api/v1/spots/upload-url
///
/// Hands out a pre-authorized handle for uploading image bytes directly to
/// the image store; the returned id is what `create_spot` expects back.
pub async fn upload_url(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<UploadUrlResponse>, AppError> {
    let image_id = Uuid::new_v4();

    Ok(Json(UploadUrlResponse {
        upload_url: format!("{}/{}", state.config.image_store_url, image_id),
        image_id,
    }))
}
