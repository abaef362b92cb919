//! Shared helpers used across layers

pub mod currency;
pub mod errors;
pub mod retry;
