//! User repository interface

use async_trait::async_trait;

use super::model::UserProfile;
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert or replace a user
    async fn save(&self, user: UserProfile) -> DomainResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<UserProfile>>;

    /// Find user by email (the login identifier)
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<UserProfile>>;

    /// Update name and phone of an existing account
    async fn update_contact(&self, id: &str, name: &str, phone: &str) -> DomainResult<()>;
}
