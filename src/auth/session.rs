//! Session resolution: turns a validated token into the caller's identity.
//!
//! [`AuthMiddleware`](super::middleware::AuthMiddleware) verifies the token and
//! stores its [`Claims`] in request extensions; the [`Identity`] extractor then
//! re-reads the user's current profile fields from storage and overlays them,
//! so profile edits show up without forcing a re-login. If the user row is gone
//! the identity falls back to the token-derived snapshot.

use actix_web::dev::Payload;
use actix_web::{web, Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::auth::token::Claims;
use crate::error::AppError;

/// The resolved caller context for a request.
///
/// Requests without a valid session never reach this extractor: the middleware
/// rejects them with 401 first, so an `Identity` argument in a handler
/// signature is the proof that the caller is non-anonymous.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub image: Option<String>,
}

#[derive(FromRow)]
struct ProfileRow {
    first_name: String,
    last_name: String,
    email: String,
    image: Option<String>,
}

impl Identity {
    fn from_claims(claims: &Claims) -> Self {
        Self {
            id: claims.sub,
            first_name: claims.first_name.clone(),
            last_name: claims.last_name.clone(),
            email: claims.email.clone(),
            image: None,
        }
    }
}

impl FromRequest for Identity {
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claims = req.extensions().get::<Claims>().cloned();
        let pool = req.app_data::<web::Data<PgPool>>().cloned();

        Box::pin(async move {
            let claims = claims.ok_or_else(|| {
                ActixError::from(AppError::Unauthorized(
                    "No session found for this request".to_string(),
                ))
            })?;

            let mut identity = Identity::from_claims(&claims);

            if let Some(pool) = pool {
                // A failed re-read (user deleted, transient storage error) is
                // tolerated: the token-derived fields stand in.
                let row = sqlx::query_as::<_, ProfileRow>(
                    "SELECT first_name, last_name, email, image FROM users WHERE id = $1",
                )
                .bind(claims.sub)
                .fetch_optional(pool.get_ref())
                .await;

                if let Ok(Some(row)) = row {
                    identity.first_name = row.first_name;
                    identity.last_name = row.last_name;
                    identity.email = row.email;
                    identity.image = row.image;
                }
            }

            Ok(identity)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use chrono::Utc;

    fn test_claims() -> Claims {
        Claims {
            sub: Uuid::new_v4(),
            first_name: "Alice".to_string(),
            last_name: "Smith".to_string(),
            email: "alice@example.com".to_string(),
            iat: Utc::now().timestamp() as usize,
            exp: (Utc::now() + chrono::Duration::hours(1)).timestamp() as usize,
        }
    }

    #[actix_rt::test]
    async fn test_identity_falls_back_to_claims_without_pool() {
        let claims = test_claims();
        let req = test::TestRequest::default().to_http_request();
        req.extensions_mut().insert(claims.clone());

        let mut payload = Payload::None;
        let identity = Identity::from_request(&req, &mut payload).await.unwrap();
        assert_eq!(identity.id, claims.sub);
        assert_eq!(identity.first_name, "Alice");
        assert_eq!(identity.email, "alice@example.com");
        assert_eq!(identity.image, None);
    }

    #[actix_rt::test]
    async fn test_identity_requires_claims() {
        // No claims in extensions: the middleware did not run or rejected the
        // request already, so the extractor must refuse with 401.
        let req = test::TestRequest::default().to_http_request();

        let mut payload = Payload::None;
        let result = Identity::from_request(&req, &mut payload).await;
        assert!(result.is_err());

        let response = result.unwrap_err().error_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
