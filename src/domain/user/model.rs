//! Customer account entity

use chrono::{DateTime, Utc};

/// A customer account. Created explicitly through registration or
/// implicitly during guest checkout.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    /// Unique, used as the login identifier
    pub email: String,
    pub phone: String,
    /// Bcrypt hash, never the plaintext
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}
