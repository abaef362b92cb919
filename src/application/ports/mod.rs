pub mod outbound;

pub use outbound::{PaymentGateway, PaymentOutcome};
