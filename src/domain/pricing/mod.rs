pub mod model;

pub use model::{PriceBreakdown, PricingTable};
