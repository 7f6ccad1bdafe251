use std::env;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expires_in: i64,
    pub refresh_token_expires_in: i64,
    pub port: u16,
    /// Points awarded per accepted spot. Policy constant, never derived from
    /// image content.
    pub spot_points: i64,
    /// Base URL of the external image store; image ids resolve to
    /// `{base}/{id}` for fetching and uploading.
    pub image_store_url: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_expires_in: env::var("JWT_EXPIRES_IN")
                .unwrap_or_else(|_| "900".to_string()) // 15 minutes
                .parse()?,
            refresh_token_expires_in: env::var("REFRESH_TOKEN_EXPIRES_IN")
                .unwrap_or_else(|_| "604800".to_string()) // 7 days
                .parse()?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,
            spot_points: env::var("SPOT_POINTS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()?,
            image_store_url: env::var("IMAGE_STORE_URL")
                .unwrap_or_else(|_| "http://localhost:9000/spots".to_string()),
        })
    }
}
