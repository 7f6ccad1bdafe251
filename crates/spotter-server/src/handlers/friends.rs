use axum::{
    extract::{Path, State},
    Json,
};
use spotter_shared::api::AddFriendRequest;
use spotter_shared::UserSummary;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::routes::AppState;

/// POST /api/v1/friends
///
/// Friendships are directional: adding someone makes them visible on your
/// boards, nothing more. Mutual competition means each side adds the other.
pub async fn add_friend(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<AddFriendRequest>,
) -> Result<(), AppError> {
    // Resolve the username to a player
    let friend: Option<(Uuid,)> =
        sqlx::query_as("SELECT user_id FROM user_stats WHERE username = $1")
            .bind(&req.username)
            .fetch_optional(&state.db)
            .await?;

    let (friend_id,) = friend.ok_or(AppError::NotFound)?;

    if friend_id == user.id {
        return Err(AppError::SelfReference);
    }

    let existing: Option<(Uuid,)> = sqlx::query_as(
        "SELECT friend_id FROM friendships WHERE user_id = $1 AND friend_id = $2",
    )
    .bind(user.id)
    .bind(friend_id)
    .fetch_optional(&state.db)
    .await?;

    if existing.is_some() {
        return Err(AppError::AlreadyExists(
            "Already friends with this user".to_string(),
        ));
    }

    // Direct accept, no request/approval stage. A racing duplicate add hits
    // the primary key rather than the pre-check above.
    sqlx::query(
        r#"
        INSERT INTO friendships (user_id, friend_id, status)
        VALUES ($1, $2, 'accepted')
        "#,
    )
    .bind(user.id)
    .bind(friend_id)
    .execute(&state.db)
    .await
    .map_err(|e| AppError::conflict_on_unique(e, "Already friends with this user"))?;

    Ok(())
}

/// DELETE /api/v1/friends/:friend_id
///
/// Removes exactly the caller's directional record; the reverse record, if
/// the other side added the caller, is untouched.
pub async fn remove_friend(
    State(state): State<AppState>,
    user: AuthUser,
    Path(friend_id): Path<Uuid>,
) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM friendships WHERE user_id = $1 AND friend_id = $2")
        .bind(user.id)
        .bind(friend_id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    Ok(())
}

/// GET /api/v1/friends
pub async fn list_friends(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    let rows: Vec<(Uuid, Option<String>, Option<String>, Option<i64>, Option<i64>)> =
        sqlx::query_as(
            r#"
            SELECT f.friend_id, u.display_name, s.username, s.total_points, s.total_spots
            FROM friendships f
            LEFT JOIN users u ON u.id = f.friend_id
            LEFT JOIN user_stats s ON s.user_id = f.friend_id
            WHERE f.user_id = $1 AND f.status = 'accepted'
            "#,
        )
        .bind(user.id)
        .fetch_all(&state.db)
        .await?;

    let mut friends = Vec::with_capacity(rows.len());
    for (friend_id, display_name, username, total_points, total_spots) in rows {
        // A friendship pointing at a vanished user is an integrity violation;
        // surface it in the logs and keep the response usable.
        let Some(display_name) = display_name else {
            tracing::warn!(%friend_id, "dangling friendship: user record missing");
            continue;
        };

        friends.push(UserSummary {
            user_id: friend_id,
            name: username.unwrap_or(display_name),
            total_points: total_points.unwrap_or(0),
            total_spots: total_spots.unwrap_or(0),
        });
    }

    Ok(Json(friends))
}
