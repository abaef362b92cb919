pub mod model;
pub mod repository;

pub use model::UserProfile;
pub use repository::UserRepository;
