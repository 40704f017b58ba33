// Shared module
pub mod config;
pub mod database;
pub mod errors;
pub mod middleware;
pub mod services;

pub use config::*;
pub use database::*;
pub use errors::*;
pub use middleware::*;
pub use services::*;
