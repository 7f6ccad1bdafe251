use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use spotter_shared::api::{LeaderboardScope, NextRival, RankedUser};
use spotter_shared::ranking::{self, Standing};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub scope: Option<LeaderboardScope>,
}

type StandingRow = (Uuid, String, Option<String>, i64);

fn row_to_standing(row: StandingRow) -> Standing {
    let (user_id, display_name, username, total_points) = row;
    Standing {
        user_id,
        name: username.unwrap_or(display_name),
        total_points,
    }
}

/// Snapshot of the caller's accepted friends, joined to their totals.
async fn friend_standings(state: &AppState, user_id: Uuid) -> Result<Vec<Standing>, AppError> {
    let rows: Vec<StandingRow> = sqlx::query_as(
        r#"
        SELECT s.user_id, u.display_name, s.username, s.total_points
        FROM friendships f
        JOIN user_stats s ON s.user_id = f.friend_id
        JOIN users u ON u.id = f.friend_id
        WHERE f.user_id = $1 AND f.status = 'accepted'
        "#,
    )
    .bind(user_id)
    .fetch_all(&state.db)
    .await?;

    Ok(rows.into_iter().map(row_to_standing).collect())
}

/// The viewer's own row. Starts from `users` so a player who has not
/// submitted anything yet still gets a zero-points standing; `None` only for
/// a vanished user record.
async fn own_standing(state: &AppState, user_id: Uuid) -> Result<Option<Standing>, AppError> {
    let row: Option<StandingRow> = sqlx::query_as(
        r#"
        SELECT u.id, u.display_name, s.username, COALESCE(s.total_points, 0)
        FROM users u
        LEFT JOIN user_stats s ON s.user_id = u.id
        WHERE u.id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(&state.db)
    .await?;

    Ok(row.map(row_to_standing))
}

/// GET /api/v1/leaderboard?scope=global|friends
///
/// Recomputed from current aggregates on every call; a rendered board may be
/// stale by the time it is read, which is accepted.
pub async fn leaderboard(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<LeaderboardQuery>,
) -> Result<Json<Vec<RankedUser>>, AppError> {
    let scope = params.scope.unwrap_or(LeaderboardScope::Global);

    let standings = match scope {
        LeaderboardScope::Global => {
            let rows: Vec<StandingRow> = sqlx::query_as(
                r#"
                SELECT s.user_id, u.display_name, s.username, s.total_points
                FROM user_stats s
                JOIN users u ON u.id = s.user_id
                ORDER BY s.total_points DESC
                "#,
            )
            .fetch_all(&state.db)
            .await?;

            rows.into_iter().map(row_to_standing).collect()
        }
        LeaderboardScope::Friends => {
            // Friends-scoped boards include the viewer's own row so the
            // comparison has an anchor.
            let mut standings = friend_standings(&state, user.id).await?;
            if let Some(own) = own_standing(&state, user.id).await? {
                standings.push(own);
            }
            standings
        }
    };

    Ok(Json(ranking::rank(standings, user.id)))
}

/// GET /api/v1/leaderboard/rival
///
/// The nearest friend strictly ahead of the caller, with the gap to close.
/// Null when nobody qualifies.
pub async fn next_rival(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Option<NextRival>>, AppError> {
    let own_points = own_standing(&state, user.id)
        .await?
        .map(|s| s.total_points)
        .unwrap_or(0);

    let friends = friend_standings(&state, user.id).await?;

    Ok(Json(ranking::next_rival(own_points, &friends)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use spotter_shared::ranking;

    #[test]
    fn viewer_without_stats_still_anchors_the_friends_board() {
        let viewer = Uuid::from_bytes([1; 16]);
        // Shape the own-standing query produces before the first submission:
        // no stats row joined, totals coalesced to zero.
        let own = row_to_standing((viewer, "alice".into(), None, 0));

        let rows = ranking::rank(
            vec![
                own,
                Standing {
                    user_id: Uuid::from_bytes([2; 16]),
                    name: "bob".into(),
                    total_points: 50,
                },
            ],
            viewer,
        );

        let anchor = rows.iter().find(|r| r.is_viewer).unwrap();
        assert_eq!(anchor.total_points, 0);
        assert_eq!(anchor.rank, 2);
    }
}
