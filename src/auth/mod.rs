pub mod credentials;
pub mod middleware;
pub mod password;
pub mod session;
pub mod token;

use serde::{Deserialize, Serialize};

use crate::models::UserResponse;

// Re-export necessary items
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use session::Identity;
pub use token::{generate_token, verify_token, Claims};

/// Represents the payload for a user login request.
///
/// Deliberately unvalidated beyond presence: a malformed email must produce
/// the same `Invalid credentials` response as a wrong password, so the shapes
/// of failures cannot be told apart.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response structure after a successful login.
/// Contains the signed session token and the public user record.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The JWT for session authentication.
    pub token: String,
    pub user: UserResponse,
}

/// Response structure after a successful signup.
#[derive(Debug, Serialize, Deserialize)]
pub struct SignupResponse {
    pub message: String,
    pub user: UserResponse,
}
