//! Application services orchestrating the domain

pub mod booking;
pub mod identity;
pub mod ports;
pub mod services;
