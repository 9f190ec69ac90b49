//! Domain ports for the hexagonal boundary.
//!
//! Outbound ports (`*Repository`) are implemented by persistence adapters;
//! driving ports (`BookingCommand`, `BookingQuery`, `LoginService`) are called
//! by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod booking_command;
mod booking_history_repository;
mod booking_query;
mod booking_repository;
mod login_service;

#[cfg(test)]
pub use booking_command::MockBookingCommand;
pub use booking_command::{
    BookingCommand, CreateBookingRequest, UpdateDetailsRequest, UpdateNotesRequest,
};
#[cfg(test)]
pub use booking_history_repository::MockBookingHistoryRepository;
pub use booking_history_repository::{BookingHistoryRepository, BookingHistoryRepositoryError};
#[cfg(test)]
pub use booking_query::MockBookingQuery;
pub use booking_query::{BookingQuery, DateAvailability};
#[cfg(test)]
pub use booking_repository::MockBookingRepository;
pub use booking_repository::{BookingRepository, BookingRepositoryError, NewBooking, StatusChange};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{ConfiguredLoginService, FixtureLoginService, LoginService};
