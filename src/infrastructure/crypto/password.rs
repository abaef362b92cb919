//! Password hashing

use crate::domain::{DomainError, DomainResult};

/// Hash a plaintext password with bcrypt at the default cost.
pub fn hash(plain: &str) -> DomainResult<String> {
    bcrypt::hash(plain, bcrypt::DEFAULT_COST)
        .map_err(|e| DomainError::PersistenceFailed(format!("Password hashing failed: {}", e)))
}

/// Verify a plaintext password against a stored bcrypt hash.
pub fn verify(plain: &str, hashed: &str) -> DomainResult<bool> {
    bcrypt::verify(plain, hashed)
        .map_err(|e| DomainError::PersistenceFailed(format!("Password verification failed: {}", e)))
}

// ── Tests ──────────────────────────────────────────────────────
