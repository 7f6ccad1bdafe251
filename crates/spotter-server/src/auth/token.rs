use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Signed claims carried by both access and refresh tokens; the two differ
/// only in lifetime, which the caller picks when building the claims.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, email: &str, ttl_secs: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            email: email.to_owned(),
            exp: (now + Duration::seconds(ttl_secs)).timestamp(),
            iat: now.timestamp(),
        }
    }
}

pub fn sign_token(claims: &Claims, secret: &str) -> Result<String, AppError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to sign token: {}", e)))
}

/// Any decode failure (bad signature, expired, malformed) is an auth
/// failure to the caller, never a crash.
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!("Token verification failed: {}", e);
        AppError::Unauthorized
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip_preserves_claims() {
        let user_id = Uuid::new_v4();
        let token = sign_token(&Claims::new(user_id, "a@b.c", 60), "secret").unwrap();
        let claims = decode_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "a@b.c");
    }

    #[test]
    fn wrong_secret_is_unauthorized() {
        let token = sign_token(&Claims::new(Uuid::new_v4(), "a@b.c", 60), "secret").unwrap();
        assert!(matches!(
            decode_token(&token, "other"),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn expired_token_is_unauthorized() {
        // Issued well past the default decode leeway
        let token = sign_token(&Claims::new(Uuid::new_v4(), "a@b.c", -300), "secret").unwrap();
        assert!(matches!(
            decode_token(&token, "secret"),
            Err(AppError::Unauthorized)
        ));
    }
}
