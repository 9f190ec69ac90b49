//! Booking domain: value types, lifecycle services and ports.
//!
//! Public surface:
//! - [`Booking`], [`BookingNumber`], [`BookingStatus`] and friends describe a
//!   reservation.
//! - [`BookingNumberAllocator`], [`BookingStatusMachine`] and [`HistoryLog`]
//!   make up the lifecycle core and fail with [`BookingLifecycleError`].
//! - [`BookingService`] implements the driving ports in [`ports`].
//! - [`Error`] is the transport-agnostic payload returned by driving ports.

pub mod auth;
pub mod booking;
pub mod booking_error;
pub mod booking_history;
pub mod booking_number;
pub mod booking_service;
pub mod booking_status;
pub mod error;
pub mod ports;
pub mod trace_id;

pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::booking::{
    ActorEmail, Booking, BookingDetailsPatch, BookingDraft, BookingDraftError, BookingId,
    BookingNumber, BookingNumberError, BookingStatus, EmailValidationError,
    MAX_CUSTOMER_NAME_CHARS, MAX_EMAIL_CHARS, MAX_GUEST_COUNT, ParseBookingStatusError,
    allocation_year, normalise_notes,
};
pub use self::booking_error::BookingLifecycleError;
pub use self::booking_history::{BookingHistoryEntry, HistoryAction, HistoryDetails, HistoryLog};
pub use self::booking_number::{BookingNumberAllocator, next_booking_number};
pub use self::booking_service::BookingService;
pub use self::booking_status::{
    BookingStatusMachine, ChangeStatusCommand, plan_transition, transition_permitted,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Result alias for driving-port and handler code.
///
/// # Examples
/// ```
/// use venue_backend::domain::{ApiResult, Error};
///
/// fn lookup(found: bool) -> ApiResult<u32> {
///     if found { Ok(7) } else { Err(Error::not_found("booking 7 not found")) }
/// }
/// assert!(lookup(false).is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
