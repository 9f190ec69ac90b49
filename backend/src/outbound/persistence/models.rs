//! Internal Diesel row structs for the booking tables.
//!
//! Rows are converted into domain types at the adapter boundary; none of these
//! structs leave the persistence module.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde_json::Value;

use crate::domain::ports::{BookingRepositoryError, NewBooking, StatusChange};
use crate::domain::{
    ActorEmail, Booking, BookingDetailsPatch, BookingHistoryEntry, BookingId, BookingNumber,
    BookingStatus, HistoryDetails,
};

use super::schema::{booking_history, bookings};

/// Row read from `bookings`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookingRow {
    pub id: i64,
    pub booking_number: String,
    pub status: String,
    pub customer_name: String,
    pub customer_email: String,
    pub event_date: NaiveDate,
    pub guest_count: Option<i32>,
    pub additional_notes: Option<String>,
    pub quote_sent_date: Option<DateTime<Utc>>,
    pub deposit_received_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = BookingRepositoryError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let corrupt = |what: String| {
            BookingRepositoryError::corrupt(format!("booking {}: {what}", row.id))
        };
        let booking_number =
            BookingNumber::parse(&row.booking_number).map_err(|err| corrupt(err.to_string()))?;
        let status = row
            .status
            .parse::<BookingStatus>()
            .map_err(|err| corrupt(err.to_string()))?;
        let guest_count = row
            .guest_count
            .map(u32::try_from)
            .transpose()
            .map_err(|_| corrupt("negative guest count".to_owned()))?;
        Ok(Self {
            id: BookingId::new(row.id),
            booking_number,
            status,
            customer_name: row.customer_name,
            customer_email: row.customer_email,
            event_date: row.event_date,
            guest_count,
            additional_notes: row.additional_notes,
            quote_sent_date: row.quote_sent_date,
            deposit_received_date: row.deposit_received_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Guest counts outside the signed column range are refused, never clamped.
fn guest_count_for_db(count: Option<u32>) -> Result<Option<i32>, BookingRepositoryError> {
    count
        .map(|count| {
            i32::try_from(count).map_err(|_| {
                BookingRepositoryError::query(format!(
                    "guest count {count} does not fit the guest_count column"
                ))
            })
        })
        .transpose()
}

/// Insertable booking; timestamps come from column defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bookings)]
pub(crate) struct NewBookingRow<'a> {
    pub booking_number: &'a str,
    pub status: &'a str,
    pub customer_name: &'a str,
    pub customer_email: &'a str,
    pub event_date: NaiveDate,
    pub guest_count: Option<i32>,
    pub additional_notes: Option<&'a str>,
}

impl<'a> TryFrom<&'a NewBooking> for NewBookingRow<'a> {
    type Error = BookingRepositoryError;

    fn try_from(booking: &'a NewBooking) -> Result<Self, Self::Error> {
        Ok(Self {
            booking_number: booking.booking_number.as_str(),
            status: booking.status.as_str(),
            customer_name: &booking.customer_name,
            customer_email: &booking.customer_email,
            event_date: booking.event_date,
            guest_count: guest_count_for_db(booking.guest_count)?,
            additional_notes: booking.additional_notes.as_deref(),
        })
    }
}

/// Status changeset; `None` date stamps leave the column untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = bookings)]
pub(crate) struct StatusUpdate {
    pub status: &'static str,
    pub quote_sent_date: Option<DateTime<Utc>>,
    pub deposit_received_date: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl From<&StatusChange> for StatusUpdate {
    fn from(change: &StatusChange) -> Self {
        Self {
            status: change.status.as_str(),
            quote_sent_date: change.quote_sent_date,
            deposit_received_date: change.deposit_received_date,
            updated_at: change.updated_at,
        }
    }
}

/// Notes changeset; `None` clears the column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = bookings)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct NotesUpdate<'a> {
    pub additional_notes: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

/// Details changeset; `None` fields are left untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = bookings)]
pub(crate) struct DetailsUpdate<'a> {
    pub customer_name: Option<&'a str>,
    pub customer_email: Option<&'a str>,
    pub event_date: Option<NaiveDate>,
    pub guest_count: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> DetailsUpdate<'a> {
    pub fn new(
        patch: &'a BookingDetailsPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, BookingRepositoryError> {
        Ok(Self {
            customer_name: patch.customer_name.as_deref(),
            customer_email: patch.customer_email.as_deref(),
            event_date: patch.event_date,
            guest_count: guest_count_for_db(patch.guest_count)?,
            updated_at,
        })
    }
}

/// Row read from `booking_history`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = booking_history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct HistoryRow {
    pub id: i64,
    pub booking_id: i64,
    pub action: String,
    pub details: Value,
    pub performed_by: String,
    pub created_at: DateTime<Utc>,
}

impl HistoryRow {
    /// Convert to a domain entry; `None` when `performed_by` is not a valid
    /// email.
    pub fn into_entry(self) -> Option<BookingHistoryEntry> {
        let performed_by = ActorEmail::new(&self.performed_by).ok()?;
        Some(BookingHistoryEntry {
            id: self.id,
            booking_id: BookingId::new(self.booking_id),
            details: HistoryDetails::from_stored(&self.action, self.details),
            performed_by,
            created_at: self.created_at,
        })
    }
}

/// Insertable history entry; `created_at` comes from the column default.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = booking_history)]
pub(crate) struct NewHistoryRow<'a> {
    pub booking_id: i64,
    pub action: &'a str,
    pub details: Value,
    pub performed_by: &'a str,
}
