//! Venue booking backend library modules.
//!
//! The crate is organised as a hexagonal monolith: [`domain`] owns the booking
//! lifecycle and its ports, [`inbound`] adapts HTTP requests onto those ports,
//! and [`outbound`] implements them on PostgreSQL or in memory.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(test)]
pub(crate) mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
