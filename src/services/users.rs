//! User management service

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::user::{User, UserRole},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a new user
    pub async fn create_user(&self, name: &str, role: UserRole) -> AppResult<User> {
        let user = self.repository.users.create(name, role).await?;
        tracing::info!(user_id = %user.id, name, "user created");
        Ok(user)
    }

    /// Get a user by ID
    pub async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }
}
