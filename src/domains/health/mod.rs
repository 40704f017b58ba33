// Health domain module
pub mod handlers;

pub use handlers::*;
