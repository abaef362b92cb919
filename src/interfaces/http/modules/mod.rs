pub mod bookings;
pub mod health;
pub mod locations;
pub mod notifications;
pub mod quotes;
pub mod users;
