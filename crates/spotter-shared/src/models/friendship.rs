use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `Pending` is reserved for a future request/approval flow; the default add
/// path inserts records directly as `Accepted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "friendship_status", rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum FriendshipStatus {
    Pending,
    Accepted,
}

/// Directional "I compete with this user" record. Mutual visibility comes
/// from each side adding the other, not from a single symmetric row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Friendship {
    pub user_id: Uuid,
    pub friend_id: Uuid,
    pub status: FriendshipStatus,
    pub created_at: DateTime<Utc>,
}
