//! Outbound adapters implementing the domain's storage ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel.
//! - **memory**: process-local store for database-less runs and tests.
//!
//! Adapters translate between domain types and storage representations and
//! contain no business logic.

pub mod memory;
pub mod persistence;
