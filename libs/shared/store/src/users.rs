use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use shared_models::user::UserRecord;

/// Store of record for registered accounts, keyed by user id. Username and
/// email uniqueness is checked by the auth cell before insertion.
pub struct UserStore {
    users: RwLock<HashMap<Uuid, UserRecord>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }

    /// Persist a new account. The id is store-assigned.
    pub async fn insert(&self, mut user: UserRecord) -> UserRecord {
        let mut users = self.users.write().await;
        user.id = Uuid::new_v4();
        users.insert(user.id, user.clone());
        debug!("Persisted user {} ({})", user.id, user.username);
        user
    }

    pub async fn get(&self, id: Uuid) -> Option<UserRecord> {
        self.users.read().await.get(&id).cloned()
    }

    pub async fn find_by_username(&self, username: &str) -> Option<UserRecord> {
        self.users
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned()
    }

    pub async fn find_by_email(&self, email: &str) -> Option<UserRecord> {
        self.users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned()
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}
