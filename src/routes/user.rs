use crate::{
    auth::Identity,
    error::AppError,
    models::{ProfileUpdate, User, UserResponse},
};
use actix_web::{put, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

/// Updates the authenticated user's profile fields.
///
/// All three fields are submitted together; the session resolver picks the
/// new values up on the very next request, so no re-login is needed.
///
/// ## Request Body:
/// `{firstName, lastName, email}`.
///
/// ## Responses:
/// - `200 OK`: Returns the updated public user record.
/// - `400 Bad Request`: Invalid fields or the email belongs to another account.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
#[put("/profile")]
pub async fn update_profile(
    pool: web::Data<PgPool>,
    identity: Identity,
    profile_data: web::Json<ProfileUpdate>,
) -> Result<impl Responder, AppError> {
    profile_data.validate()?;

    let user = sqlx::query_as::<_, User>(
        "UPDATE users SET first_name = $1, last_name = $2, email = $3 WHERE id = $4 \
         RETURNING id, email, first_name, last_name, password_hash, image, created_at",
    )
    .bind(&profile_data.first_name)
    .bind(&profile_data.last_name)
    .bind(&profile_data.email)
    .bind(identity.id)
    .fetch_one(&**pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
            AppError::BadRequest("Email already registered".into())
        }
        _ => e.into(),
    })?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}
