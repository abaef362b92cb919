pub mod model;
pub mod repository;

pub use model::{GeoPoint, Location};
pub use repository::LocationRepository;
