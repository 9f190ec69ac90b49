//! HTTP inbound adapter exposing the booking REST endpoints.

pub mod auth;
pub mod bookings;
mod bookings_dto;
pub mod error;
pub mod health;
pub mod schemas;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;
