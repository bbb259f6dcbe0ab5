use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

lazy_static! {
    // Human names: letters, spaces, apostrophes, hyphens.
    static ref NAME_REGEX: regex::Regex = regex::Regex::new(r"^[\p{L} '-]+$").unwrap();
}

/// A user row as stored in the database.
///
/// `password_hash` is `None` for accounts provisioned through an external
/// identity provider; such accounts cannot log in with a password.
/// This type is never serialized to the wire; see [`UserResponse`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: Option<String>,
    /// Avatar image URL.
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The public projection of a [`User`], safe to return from any endpoint.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            image: user.image,
            created_at: user.created_at,
        }
    }
}

/// Payload for `POST /api/auth/signup`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(
        length(min = 1, max = 50),
        regex(path = "NAME_REGEX", message = "First name contains invalid characters")
    )]
    pub first_name: String,
    #[validate(
        length(min = 1, max = 50),
        regex(path = "NAME_REGEX", message = "Last name contains invalid characters")
    )]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
}

/// Payload for `PUT /api/user/profile`. All three fields are required;
/// profile edits always submit the full form.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[validate(
        length(min = 1, max = 50),
        regex(path = "NAME_REGEX", message = "First name contains invalid characters")
    )]
    pub first_name: String,
    #[validate(
        length(min = 1, max = 50),
        regex(path = "NAME_REGEX", message = "Last name contains invalid characters")
    )]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
}

const AVATAR_COLORS: [&str; 18] = [
    "1abc9c", "2ecc71", "3498db", "9b59b6", "34495e", "16a085", "27ae60", "2980b9", "8e44ad",
    "2c3e50", "f1c40f", "e67e22", "e74c3c", "95a5a6", "f39c12", "d35400", "c0392b", "7f8c8d",
];

/// Builds the default avatar URL assigned at signup: the user's uppercased
/// initials rendered on a randomly picked palette color.
pub fn default_avatar_url(first_name: &str, last_name: &str) -> String {
    let initials: String = first_name
        .chars()
        .take(1)
        .chain(last_name.chars().take(1))
        .flat_map(|c| c.to_uppercase())
        .collect();
    let background = AVATAR_COLORS
        .choose(&mut rand::thread_rng())
        .unwrap_or(&AVATAR_COLORS[0]);
    format!(
        "https://ui-avatars.com/api/?name={}&background={}&color=fff",
        initials, background
    )
}
