//! User registration, JWT authentication and profile API.
//!
//! Every endpoint is bound through a [`routes::RouteTable`] built once at
//! startup; the axum router and the not-found/redirect fallback are both
//! derived from it.

pub mod api_doc;
pub mod domains;
pub mod routes;
pub mod shared;
