//! Driving port for booking reads.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{Booking, BookingHistoryEntry, BookingId, BookingNumber, Error};

/// Whether the venue is free on a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateAvailability {
    /// Date checked.
    pub date: NaiveDate,
    /// `true` when no active booking holds the date.
    pub available: bool,
    /// Numbers of the active bookings holding the date.
    pub conflicting_bookings: Vec<BookingNumber>,
}

/// Use-case port for booking reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingQuery: Send + Sync {
    /// Fetch one booking.
    async fn get_booking(&self, booking_id: BookingId) -> Result<Booking, Error>;

    /// Audit trail of a booking in creation order.
    async fn booking_history(
        &self,
        booking_id: BookingId,
    ) -> Result<Vec<BookingHistoryEntry>, Error>;

    /// Check availability of the venue on `date`. Cancelled bookings do not
    /// hold their date.
    async fn date_availability(&self, date: NaiveDate) -> Result<DateAvailability, Error>;
}
