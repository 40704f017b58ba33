// Auth domain module
pub mod handlers;
pub mod services;
pub mod models;

pub use handlers::*;
pub use services::*;
pub use models::*;
