pub mod dashboard;
pub mod expiry;
pub mod invoice;
pub mod locations;

pub use dashboard::{DashboardService, DashboardSnapshot};
pub use expiry::{scan_expiring, ExpiringBooking};
pub use invoice::{InvoiceData, InvoiceService};
pub use locations::{LocationDirectory, LocationListing};
