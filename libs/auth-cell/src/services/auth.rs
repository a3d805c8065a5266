use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use shared_models::auth::{AuthUser, Role};
use shared_models::error::AppError;
use shared_models::user::UserRecord;
use shared_store::AppState;
use shared_utils::jwt::issue_token;

use crate::models::{AuthRequest, RegisterRequest};
use crate::services::password::{hash_password, verify_password};

/// Registration and credential checks against the user store. Session
/// tokens are signed here; they are validated by the auth middleware.
pub struct AuthService {
    state: Arc<AppState>,
}

impl AuthService {
    pub fn new(state: &Arc<AppState>) -> Self {
        Self {
            state: Arc::clone(state),
        }
    }

    pub async fn register_user(&self, request: RegisterRequest) -> Result<UserRecord, AppError> {
        if self
            .state
            .users
            .find_by_username(&request.username)
            .await
            .is_some()
        {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }

        if self.state.users.find_by_email(&request.email).await.is_some() {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }

        let roles: HashSet<Role> = match request.roles {
            Some(roles) if !roles.is_empty() => roles,
            _ => HashSet::from([Role::Patient]),
        };

        if request.profession.is_some() && !roles.contains(&Role::Provider) {
            return Err(AppError::BadRequest(
                "Only providers can have a profession".to_string(),
            ));
        }

        if request.username.trim().is_empty() || request.email.trim().is_empty() {
            return Err(AppError::BadRequest(
                "Username and email cannot be blank".to_string(),
            ));
        }

        if request.password.len() < 8 {
            return Err(AppError::BadRequest(
                "Password must be at least 8 characters long".to_string(),
            ));
        }

        let password_hash = hash_password(&request.password)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;

        let user = UserRecord {
            id: Uuid::nil(), // store-assigned
            username: request.username,
            email: request.email,
            password_hash,
            roles,
            first_name: request.first_name,
            last_name: request.last_name,
            profession: request.profession,
        };

        let saved = self.state.users.insert(user).await;
        info!("Registered user {} ({})", saved.id, saved.username);
        Ok(saved)
    }

    /// Check credentials and sign a session token carrying the role set.
    pub async fn login(&self, request: AuthRequest) -> Result<(String, AuthUser), AppError> {
        let user = self
            .state
            .users
            .find_by_username(&request.username)
            .await
            .ok_or_else(|| AppError::Auth("Invalid username or password".to_string()))?;

        let valid = verify_password(&request.password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("Failed to verify password: {}", e)))?;

        if !valid {
            debug!("Password mismatch for user {}", user.username);
            return Err(AppError::Auth("Invalid username or password".to_string()));
        }

        let auth_user = user.to_auth_user();
        let token = issue_token(
            &auth_user,
            &self.state.config.jwt_secret,
            self.state.config.token_ttl_hours,
        )
        .map_err(AppError::Internal)?;

        Ok((token, auth_user))
    }
}
