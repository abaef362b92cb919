//! # Storapedia Booking Service
//!
//! Central booking system for a self-storage storefront: facility
//! directory, step-by-step reservation wizard, pricing, capacity-safe
//! commits, extensions and expiry notifications.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, types and traits
//! - **application**: Business logic, wizard, committer and services
//! - **infrastructure**: External concerns (storage, database, payment)
//! - **interfaces**: REST API with Swagger documentation
//! - **notifications**: Event bus for live dashboard updates
//! - **shared**: Errors, retry helpers and currency formatting
//! - **support**: Graceful shutdown coordination

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod notifications;
pub mod shared;
pub mod support;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::database::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

// Re-export API router
pub use interfaces::http::{create_api_router, AppState};

// Re-export notifications
pub use notifications::{create_event_bus, Event, EventBus, SharedEventBus};
