use crate::{
    auth::{credentials, generate_token, hash_password, AuthResponse, LoginRequest, SignupResponse},
    config::AuthConfig,
    error::AppError,
    models::{user::default_avatar_url, SignupRequest, User, UserResponse},
};
use actix_web::{post, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

/// Register a new user with email and password.
///
/// Creates the account with a bcrypt-hashed password and a generated default
/// avatar (initials on a random palette color).
///
/// ## Responses:
/// - `201 Created`: `{message, user}`.
/// - `400 Bad Request`: Missing/invalid fields, or the email is already registered.
#[post("/signup")]
pub async fn signup(
    pool: web::Data<PgPool>,
    config: web::Data<AuthConfig>,
    signup_data: web::Json<SignupRequest>,
) -> Result<impl Responder, AppError> {
    signup_data.validate()?;

    // Check if the email is already taken
    let existing_user = sqlx::query("SELECT id FROM users WHERE email = $1")
        .bind(&signup_data.email)
        .fetch_optional(&**pool)
        .await?;

    if existing_user.is_some() {
        return Err(AppError::BadRequest("Email already registered".into()));
    }

    let password_hash = hash_password(&signup_data.password, config.bcrypt_cost)?;
    let image = default_avatar_url(&signup_data.first_name, &signup_data.last_name);

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (email, first_name, last_name, password_hash, image) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING id, email, first_name, last_name, password_hash, image, created_at",
    )
    .bind(&signup_data.email)
    .bind(&signup_data.first_name)
    .bind(&signup_data.last_name)
    .bind(&password_hash)
    .bind(&image)
    .fetch_one(&**pool)
    .await
    .map_err(|e| match &e {
        // The unique index can still fire under a concurrent signup race.
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
            AppError::BadRequest("Email already registered".into())
        }
        _ => e.into(),
    })?;

    Ok(HttpResponse::Created().json(SignupResponse {
        message: "User created successfully".to_string(),
        user: user.into(),
    }))
}

/// Login with email and password.
///
/// Verifies the credentials and returns a signed session token plus the
/// public user record.
///
/// ## Responses:
/// - `200 OK`: `{token, user}`.
/// - `401 Unauthorized`: `Invalid credentials`, identical for an unknown
///   email, a password-less account, and a wrong password.
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    config: web::Data<AuthConfig>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let user = credentials::verify(&pool, &login_data.email, &login_data.password).await?;

    let token = generate_token(&config, &user)?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        user: UserResponse::from(user),
    }))
}
