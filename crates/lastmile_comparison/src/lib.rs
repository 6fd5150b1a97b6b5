pub mod improvement;
pub mod places;
pub mod resolver;
pub mod scenario;
pub mod synthetic;
