//! Account management
//!
//! Registration, login and profile updates, plus the guest-checkout
//! branch the committer uses: an unauthenticated booking mints an account
//! from the guest contact fields with a random temporary password, or
//! fails with `DuplicateAccount` when the email is already registered so
//! the storefront can redirect to login instead.

use std::sync::Arc;

use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::user::{UserProfile, UserRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::crypto::password;

/// Length of the temporary password minted during guest checkout
const TEMP_PASSWORD_LEN: usize = 8;

pub struct IdentityService {
    users: Arc<dyn UserRepository>,
}

impl IdentityService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Register a new account. Fails with `DuplicateAccount` when the
    /// email is taken.
    #[instrument(skip(self, plain_password))]
    pub async fn create_account(
        &self,
        name: &str,
        email: &str,
        phone: &str,
        plain_password: &str,
    ) -> DomainResult<UserProfile> {
        // emails are stored lowercased so lookups are exact
        let email = email.trim().to_ascii_lowercase();
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(DomainError::DuplicateAccount(email));
        }

        let user = UserProfile {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email,
            phone: phone.to_string(),
            password_hash: password::hash(plain_password)?,
            created_at: Utc::now(),
        };
        self.users.save(user.clone()).await?;
        info!(user_id = %user.id, "Account created");
        Ok(user)
    }

    /// Verify credentials and return the profile.
    pub async fn authenticate(&self, email: &str, plain_password: &str) -> DomainResult<UserProfile> {
        let user = self.users.find_by_email(email).await?.ok_or_else(|| {
            DomainError::Validation("Invalid email or password.".to_string())
        })?;
        if !password::verify(plain_password, &user.password_hash)? {
            return Err(DomainError::Validation(
                "Invalid email or password.".to_string(),
            ));
        }
        Ok(user)
    }

    pub async fn get_profile(&self, user_id: &str) -> DomainResult<UserProfile> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "User",
                field: "id",
                value: user_id.to_string(),
            })
    }

    pub async fn update_profile(&self, user_id: &str, name: &str, phone: &str) -> DomainResult<()> {
        // 404 before write so the error names the user, not the row count
        self.get_profile(user_id).await?;
        self.users.update_contact(user_id, name, phone).await
    }

    /// Guest checkout: create an account from the contact fields with a
    /// random temporary password. The password is logged nowhere and the
    /// user resets it through the normal recovery flow.
    #[instrument(skip(self))]
    pub async fn provision_guest(
        &self,
        name: &str,
        email: &str,
        phone: &str,
    ) -> DomainResult<UserProfile> {
        let temp_password: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(TEMP_PASSWORD_LEN)
            .map(char::from)
            .collect();
        let user = self
            .create_account(name, email, phone, &temp_password)
            .await?;
        info!(user_id = %user.id, "Guest account provisioned during checkout");
        Ok(user)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::InMemoryStorage;

    fn service() -> IdentityService {
        IdentityService::new(Arc::new(InMemoryStorage::new()))
    }

    #[tokio::test]
    async fn register_then_authenticate() {
        let svc = service();
        let user = svc
            .create_account("Putu", "putu@example.com", "+62811111111", "hunter22")
            .await
            .unwrap();

        let logged_in = svc.authenticate("putu@example.com", "hunter22").await.unwrap();
        assert_eq!(logged_in.id, user.id);

        let err = svc.authenticate("putu@example.com", "wrong").await.unwrap_err();
        assert_eq!(err.user_message(), "Invalid email or password.");
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let svc = service();
        svc.create_account("Putu", "putu@example.com", "+62811111111", "hunter22")
            .await
            .unwrap();
        let err = svc
            .provision_guest("Putu Again", "putu@example.com", "+62822222222")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateAccount(_)));
    }

    #[tokio::test]
    async fn guest_provisioning_creates_usable_profile() {
        let svc = service();
        let user = svc
            .provision_guest("Wayan", "wayan@example.com", "+62833333333")
            .await
            .unwrap();
        let fetched = svc.get_profile(&user.id).await.unwrap();
        assert_eq!(fetched.email, "wayan@example.com");
        assert!(!fetched.password_hash.is_empty());
    }

    #[tokio::test]
    async fn update_profile_changes_contact_fields() {
        let svc = service();
        let user = svc
            .create_account("Putu", "putu@example.com", "+62811111111", "hunter22")
            .await
            .unwrap();
        svc.update_profile(&user.id, "Putu W.", "+62899999999")
            .await
            .unwrap();
        let fetched = svc.get_profile(&user.id).await.unwrap();
        assert_eq!(fetched.name, "Putu W.");
        assert_eq!(fetched.phone, "+62899999999");
    }
}
