//! HTTP REST API interfaces
//!
//! - `common`: response envelope and validated JSON extractor
//! - `modules`: per-resource DTOs and handlers
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod modules;
pub mod router;

pub use router::create_api_router;

use std::sync::Arc;

use crate::application::booking::BookingService;
use crate::application::identity::IdentityService;
use crate::application::services::{DashboardService, InvoiceService, LocationDirectory};
use crate::domain::pricing::PricingTable;
use crate::domain::RepositoryProvider;
use crate::notifications::SharedEventBus;

/// Shared state for every route.
#[derive(Clone)]
pub struct AppState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub bookings: Arc<BookingService>,
    pub identity: Arc<IdentityService>,
    pub directory: Arc<LocationDirectory>,
    pub dashboard: Arc<DashboardService>,
    pub invoices: Arc<InvoiceService>,
    pub pricing: PricingTable,
    pub events: SharedEventBus,
}
