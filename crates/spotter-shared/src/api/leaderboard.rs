use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaderboardScope {
    Global,
    Friends,
}

/// One leaderboard row. Ranks are 1-based and contiguous; ties get distinct
/// sequential ranks rather than sharing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedUser {
    pub rank: u32,
    pub user_id: Uuid,
    pub name: String,
    pub total_points: i64,
    pub is_viewer: bool,
}

/// The nearest friend whose score is strictly above the viewer's own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextRival {
    pub name: String,
    pub points_diff: i64,
}
