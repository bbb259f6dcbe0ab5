use crate::config::AuthConfig;
use crate::error::AppError;
use crate::models::User;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents the claims encoded within a session token.
///
/// Besides the user id the token carries a denormalized snapshot of the
/// profile at login time. The snapshot is only used as a fallback when the
/// user row can no longer be read; otherwise the session resolver overlays
/// current values from storage on every request.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the user's unique identifier.
    pub sub: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: usize,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

/// Generates a session token for a freshly authenticated user.
///
/// The token lifetime and signing secret come from the injected [`AuthConfig`];
/// nothing here reads the environment.
pub fn generate_token(config: &AuthConfig, user: &User) -> Result<String, AppError> {
    let now = chrono::Utc::now();
    let expiration = now
        .checked_add_signed(chrono::Duration::hours(config.token_ttl_hours))
        .ok_or_else(|| AppError::InternalServerError("Token expiry out of range".into()))?;

    let claims = Claims {
        sub: user.id,
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        email: user.email.clone(),
        iat: now.timestamp() as usize,
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
}

/// Verifies a session token and decodes its claims.
///
/// Default validation checks are applied (signature, expiration).
/// Returns `AppError::Unauthorized` if the token is malformed, its signature
/// is invalid, or it has expired.
pub fn verify_token(config: &AuthConfig, token: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_config(ttl_hours: i64) -> AuthConfig {
        AuthConfig {
            jwt_secret: "test_secret_for_token_tests".to_string(),
            token_ttl_hours: ttl_hours,
            bcrypt_cost: 4,
        }
    }

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "alice@example.com".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Smith".to_string(),
            password_hash: None,
            image: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_token_generation_and_verification() {
        let config = test_config(24);
        let user = test_user();
        let token = generate_token(&config, &user).unwrap();
        let claims = verify_token(&config, &token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.first_name, "Alice");
        assert_eq!(claims.email, "alice@example.com");
    }

    #[test]
    fn test_token_expiration() {
        let config = test_config(24);
        let user = test_user();

        let expired = Claims {
            sub: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            iat: (Utc::now() - chrono::Duration::hours(3)).timestamp() as usize,
            exp: (Utc::now() - chrono::Duration::hours(2)).timestamp() as usize,
        };
        let expired_token = encode(
            &Header::default(),
            &expired,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .unwrap();

        match verify_token(&config, &expired_token) {
            Err(AppError::Unauthorized(msg)) => {
                assert!(msg.contains("ExpiredSignature"), "got: {}", msg);
            }
            Ok(_) => panic!("Token should have been invalid due to expiration"),
            Err(e) => panic!("Unexpected error type for expired token: {:?}", e),
        }
    }

    #[test]
    fn test_invalid_token_signature() {
        let config = test_config(24);
        let user = test_user();
        let token = generate_token(&config, &user).unwrap();

        let other_config = AuthConfig {
            jwt_secret: "a_completely_different_secret".to_string(),
            ..test_config(24)
        };

        match verify_token(&other_config, &token) {
            Err(AppError::Unauthorized(msg)) => {
                assert!(
                    msg.contains("InvalidSignature") || msg.contains("InvalidToken"),
                    "got: {}",
                    msg
                );
            }
            Ok(_) => panic!("Token should have been invalid due to signature mismatch"),
            Err(e) => panic!("Unexpected error type for invalid signature: {:?}", e),
        }
    }
}
