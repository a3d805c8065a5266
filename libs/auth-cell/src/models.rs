use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::auth::{AuthUser, Role};

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub profession: Option<String>,
    /// Defaults to {PATIENT} when absent or empty.
    pub roles: Option<HashSet<Role>>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub roles: HashSet<Role>,
}

#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: AuthUser,
}
