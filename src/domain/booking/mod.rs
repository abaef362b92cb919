pub mod model;
pub mod repository;

pub use model::{
    BookingStatus, ExtensionContext, PaymentMethod, PaymentStatus, PickupDetails, Reservation,
    ServiceType, UnitSize,
};
pub use repository::BookingRepository;
