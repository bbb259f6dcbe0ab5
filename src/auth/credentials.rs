//! Credential verification for the password login path.
//!
//! Every failure mode collapses into the same [`AppError::InvalidCredentials`]
//! so that a response never reveals whether an account exists, whether it was
//! provisioned through an external identity provider (and so has no password),
//! or whether the password was simply wrong.

use sqlx::PgPool;

use crate::auth::password::verify_password;
use crate::error::AppError;
use crate::models::User;

const SELECT_USER_BY_EMAIL: &str =
    "SELECT id, email, first_name, last_name, password_hash, image, created_at \
     FROM users WHERE email = $1";

/// Looks up the user by email and checks the supplied password against the
/// stored bcrypt hash. On success returns the full user record; establishing
/// a session is the caller's responsibility.
///
/// Side effects: none beyond the read.
pub async fn verify(pool: &PgPool, email: &str, password: &str) -> Result<User, AppError> {
    if email.is_empty() || password.is_empty() {
        return Err(AppError::InvalidCredentials);
    }

    let user = sqlx::query_as::<_, User>(SELECT_USER_BY_EMAIL)
        .bind(email)
        .fetch_optional(pool)
        .await?;

    let user = user.ok_or(AppError::InvalidCredentials)?;

    // Accounts created via an external provider carry no hash and cannot
    // log in with a password.
    let password_hash = user
        .password_hash
        .as_deref()
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(password, password_hash)? {
        return Err(AppError::InvalidCredentials);
    }

    Ok(user)
}
