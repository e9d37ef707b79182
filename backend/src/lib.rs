//! Dashboard backend library modules.
//!
//! The crate follows a hexagonal layout: `domain` holds the business rules
//! and port traits, `inbound` adapts HTTP requests onto the domain,
//! `outbound` implements the ports against PostgreSQL, OAuth providers, and
//! the listing cache, and `server` wires everything into an Actix app.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by tooling.
pub use doc::ApiDoc;
/// Request tracing middleware applied to every route.
pub use middleware::Trace;
