// Auth domain services
pub mod auth_service;
pub mod jwt_service;
pub mod state;
pub mod token_cleanup;

pub use auth_service::*;
pub use jwt_service::*;
pub use state::*;
pub use token_cleanup::*;
