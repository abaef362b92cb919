//! Adapters: storage backends, database, payment, crypto

pub mod crypto;
pub mod database;
pub mod payment;
pub mod storage;
