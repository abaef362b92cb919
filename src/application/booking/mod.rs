//! The reservation wizard and committer

pub mod committer;
pub mod draft;
pub mod steps;
pub mod wizard;

pub use committer::BookingService;
pub use draft::{BookingDraft, SessionContext};
pub use steps::BookingStep;
pub use wizard::BookingWizard;
