pub mod brand;
pub mod car_model;
pub mod credential;
pub mod profile;
pub mod user_role;

pub use brand::Brand;
pub use car_model::{CarListing, CarModel, FuelType, Transmission};
pub use credential::Credential;
pub use profile::Profile;
pub use user_role::{Role, UserRole};
