use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSpotRequest {
    pub image_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSpotResponse {
    pub spot_id: Uuid,
}

/// A recent spot as shown in the feed, with the image reference resolved to a
/// fetchable URL.
#[derive(Debug, Serialize, Deserialize)]
pub struct SpotFeedEntry {
    pub id: Uuid,
    pub points: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

/// Pre-authorized handle for uploading image bytes directly to the image
/// store. The backend never sees the bytes themselves.
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadUrlResponse {
    pub image_id: Uuid,
    pub upload_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserStatsResponse {
    pub name: String,
    pub total_points: i64,
    pub total_spots: i64,
}
