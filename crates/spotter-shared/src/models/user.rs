use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

/// Registration state of a player profile. A stats row exists before the
/// player picks a username, so "no username yet" is an explicit variant
/// rather than a nullable field consumers have to re-check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Profile {
    Unregistered,
    Registered {
        username: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        avatar_url: Option<String>,
    },
}

impl Profile {
    pub fn from_columns(username: Option<String>, avatar_url: Option<String>) -> Self {
        match username {
            Some(username) => Profile::Registered {
                username,
                avatar_url,
            },
            None => Profile::Unregistered,
        }
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            Profile::Registered { username, .. } => Some(username),
            Profile::Unregistered => None,
        }
    }
}

/// Durable per-user aggregate: one row per player, updated in place on every
/// submission. Totals only grow in normal operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStats {
    pub user_id: Uuid,
    pub profile: Profile,
    pub total_points: i64,
    pub total_spots: i64,
    pub updated_at: DateTime<Utc>,
}

/// Compact projection of another player, as shown in friend lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub user_id: Uuid,
    pub name: String,
    pub total_points: i64,
    pub total_spots: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_from_columns_distinguishes_registration() {
        assert_eq!(Profile::from_columns(None, None), Profile::Unregistered);
        // An avatar without a username still counts as unregistered.
        assert_eq!(
            Profile::from_columns(None, Some("http://x/a.png".into())),
            Profile::Unregistered
        );
        let p = Profile::from_columns(Some("alice".into()), None);
        assert_eq!(p.username(), Some("alice"));
    }
}
