//! Port for booking row persistence.
//!
//! Adapters must enforce uniqueness of `booking_number`: number allocation
//! reads the current maximum and the insert happens later, so a concurrent
//! creation can only be detected by the store rejecting the duplicate.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{Booking, BookingDetailsPatch, BookingId, BookingNumber, BookingStatus};

use super::define_port_error;

define_port_error! {
    /// Errors raised by booking repository adapters.
    pub enum BookingRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "booking repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "booking repository query failed: {message}",
        /// The booking number is already held by another booking.
        DuplicateBookingNumber { booking_number: String } =>
            "booking number {booking_number} already exists",
        /// A stored row could not be converted into a valid booking.
        Corrupt { message: String } =>
            "stored booking is corrupt: {message}",
    }
}

/// Column values for a booking about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    /// Freshly allocated number.
    pub booking_number: BookingNumber,
    /// Initial status, normally [`BookingStatus::Inquiry`].
    pub status: BookingStatus,
    /// Customer's name.
    pub customer_name: String,
    /// Customer's email.
    pub customer_email: String,
    /// Event date.
    pub event_date: NaiveDate,
    /// Guest count, when known.
    pub guest_count: Option<u32>,
    /// Initial notes.
    pub additional_notes: Option<String>,
}

/// Field update produced by a status transition.
///
/// `None` date stamps leave the stored column untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    /// Status the booking moves to.
    pub status: BookingStatus,
    /// New `quote_sent_date`, if the transition stamps it.
    pub quote_sent_date: Option<DateTime<Utc>>,
    /// New `deposit_received_date`, if the transition stamps it.
    pub deposit_received_date: Option<DateTime<Utc>>,
    /// Modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Port for reading and writing booking rows.
///
/// Update methods return `Ok(None)` when no row has the given id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Fetch one booking.
    async fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>, BookingRepositoryError>;

    /// Insert a booking, returning the stored row.
    ///
    /// Fails with [`BookingRepositoryError::DuplicateBookingNumber`] when the
    /// number is already taken.
    async fn insert(&self, booking: &NewBooking) -> Result<Booking, BookingRepositoryError>;

    /// Apply a status transition.
    async fn update_status(
        &self,
        id: BookingId,
        change: &StatusChange,
    ) -> Result<Option<Booking>, BookingRepositoryError>;

    /// Replace `additional_notes`.
    async fn update_notes(
        &self,
        id: BookingId,
        notes: Option<String>,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Booking>, BookingRepositoryError>;

    /// Apply the populated fields of `patch`.
    async fn update_details(
        &self,
        id: BookingId,
        patch: &BookingDetailsPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Booking>, BookingRepositoryError>;

    /// Greatest stored booking number starting with `prefix`, compared as
    /// strings. Returned raw so malformed values reach the caller.
    async fn latest_booking_number(
        &self,
        prefix: &str,
    ) -> Result<Option<String>, BookingRepositoryError>;

    /// Every booking whose event falls on `date`, cancelled ones included.
    async fn find_by_event_date(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, BookingRepositoryError>;
}
