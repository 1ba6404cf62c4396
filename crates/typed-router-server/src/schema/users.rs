//! Schema types for the users API.

use serde::{Deserialize, Serialize};

/// A stored user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Path captures for `/users/{id}` routes.
#[derive(Debug, Clone, Deserialize)]
pub struct UserParams {
    pub id: String,
}

/// Request to create a user, or to replace one with `PUT`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    /// Missing names decode as empty and are rejected by the handler.
    #[serde(default)]
    pub name: String,
    pub email: String,
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Query for `GET /users`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListUsersQuery {
    /// Case-insensitive substring match on the name.
    pub name: Option<String>,
    /// Maximum number of users returned.
    pub limit: Option<usize>,
}

/// Response for `GET /users`.
#[derive(Debug, Clone, Serialize)]
pub struct ListUsersResponse {
    pub users: Vec<User>,
    /// Number of users returned.
    pub total: usize,
}

/// Response after deleting a user.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteUserResponse {
    pub success: bool,
    pub id: String,
}

/// Response for `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub users: usize,
}
