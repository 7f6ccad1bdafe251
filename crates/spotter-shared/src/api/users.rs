use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Profile;

#[derive(Debug, Serialize, Deserialize)]
pub struct SetUsernameRequest {
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user_id: Uuid,
    pub display_name: String,
    #[serde(flatten)]
    pub profile: Profile,
    pub total_points: i64,
    pub total_spots: i64,
}
