//! Process-local booking store.
//!
//! Used when no database is configured and by behaviour tests. It honours the
//! same contracts as the PostgreSQL adapters: booking numbers are unique,
//! history is append-only, and identifiers and `created_at` are assigned by
//! the store.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;

use crate::domain::ports::{
    BookingHistoryRepository, BookingHistoryRepositoryError, BookingRepository,
    BookingRepositoryError, NewBooking, StatusChange,
};
use crate::domain::{
    ActorEmail, Booking, BookingDetailsPatch, BookingHistoryEntry, BookingId, HistoryDetails,
};

#[derive(Default)]
struct Tables {
    bookings: Vec<Booking>,
    history: Vec<BookingHistoryEntry>,
    raw_numbers: Vec<String>,
}

/// In-memory implementation of both booking ports.
#[derive(Clone)]
pub struct InMemoryBookingStore {
    tables: Arc<Mutex<Tables>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryBookingStore {
    /// Empty store stamping rows with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            tables: Arc::new(Mutex::new(Tables::default())),
            clock,
        }
    }

    /// Record a booking number as taken without a booking row, mimicking
    /// legacy or corrupt data.
    pub fn seed_booking_number(&self, raw: impl Into<String>) -> Result<(), BookingRepositoryError> {
        self.lock()?.raw_numbers.push(raw.into());
        Ok(())
    }

    /// Number of history entries across all bookings.
    pub fn history_len(&self) -> Result<usize, BookingHistoryRepositoryError> {
        self.lock_history().map(|tables| tables.history.len())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, BookingRepositoryError> {
        self.tables
            .lock()
            .map_err(|_| BookingRepositoryError::connection("in-memory store poisoned"))
    }

    fn lock_history(&self) -> Result<MutexGuard<'_, Tables>, BookingHistoryRepositoryError> {
        self.tables
            .lock()
            .map_err(|_| BookingHistoryRepositoryError::connection("in-memory store poisoned"))
    }

    fn modify(
        &self,
        id: BookingId,
        apply: impl FnOnce(&mut Booking),
    ) -> Result<Option<Booking>, BookingRepositoryError> {
        let mut tables = self.lock()?;
        Ok(tables
            .bookings
            .iter_mut()
            .find(|booking| booking.id == id)
            .map(|booking| {
                apply(booking);
                booking.clone()
            }))
    }
}

fn next_id(len: usize) -> i64 {
    i64::try_from(len).map_or(i64::MAX, |n| n + 1)
}

#[async_trait]
impl BookingRepository for InMemoryBookingStore {
    async fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>, BookingRepositoryError> {
        Ok(self.lock()?.bookings.iter().find(|b| b.id == id).cloned())
    }

    async fn insert(&self, booking: &NewBooking) -> Result<Booking, BookingRepositoryError> {
        let now = self.clock.utc();
        let mut tables = self.lock()?;
        let number = booking.booking_number.as_str();
        if tables.raw_numbers.iter().any(|taken| taken == number) {
            return Err(BookingRepositoryError::duplicate_booking_number(number));
        }
        let stored = Booking {
            id: BookingId::new(next_id(tables.bookings.len())),
            booking_number: booking.booking_number.clone(),
            status: booking.status,
            customer_name: booking.customer_name.clone(),
            customer_email: booking.customer_email.clone(),
            event_date: booking.event_date,
            guest_count: booking.guest_count,
            additional_notes: booking.additional_notes.clone(),
            quote_sent_date: None,
            deposit_received_date: None,
            created_at: now,
            updated_at: now,
        };
        tables.raw_numbers.push(number.to_owned());
        tables.bookings.push(stored.clone());
        Ok(stored)
    }

    async fn update_status(
        &self,
        id: BookingId,
        change: &StatusChange,
    ) -> Result<Option<Booking>, BookingRepositoryError> {
        self.modify(id, |booking| {
            booking.status = change.status;
            if let Some(at) = change.quote_sent_date {
                booking.quote_sent_date = Some(at);
            }
            if let Some(at) = change.deposit_received_date {
                booking.deposit_received_date = Some(at);
            }
            booking.updated_at = change.updated_at;
        })
    }

    async fn update_notes(
        &self,
        id: BookingId,
        notes: Option<String>,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Booking>, BookingRepositoryError> {
        self.modify(id, |booking| {
            booking.additional_notes = notes;
            booking.updated_at = updated_at;
        })
    }

    async fn update_details(
        &self,
        id: BookingId,
        patch: &BookingDetailsPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Booking>, BookingRepositoryError> {
        self.modify(id, |booking| {
            if let Some(name) = &patch.customer_name {
                booking.customer_name.clone_from(name);
            }
            if let Some(email) = &patch.customer_email {
                booking.customer_email.clone_from(email);
            }
            if let Some(date) = patch.event_date {
                booking.event_date = date;
            }
            if patch.guest_count.is_some() {
                booking.guest_count = patch.guest_count;
            }
            booking.updated_at = updated_at;
        })
    }

    async fn latest_booking_number(
        &self,
        prefix: &str,
    ) -> Result<Option<String>, BookingRepositoryError> {
        Ok(self
            .lock()?
            .raw_numbers
            .iter()
            .filter(|number| number.starts_with(prefix))
            .max()
            .cloned())
    }

    async fn find_by_event_date(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, BookingRepositoryError> {
        Ok(self
            .lock()?
            .bookings
            .iter()
            .filter(|booking| booking.event_date == date)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BookingHistoryRepository for InMemoryBookingStore {
    async fn append(
        &self,
        booking_id: BookingId,
        details: &HistoryDetails,
        performed_by: &ActorEmail,
    ) -> Result<BookingHistoryEntry, BookingHistoryRepositoryError> {
        let created_at = self.clock.utc();
        let mut tables = self.lock_history()?;
        if !tables.bookings.iter().any(|booking| booking.id == booking_id) {
            return Err(BookingHistoryRepositoryError::query(format!(
                "booking {booking_id} does not exist"
            )));
        }
        let entry = BookingHistoryEntry {
            id: next_id(tables.history.len()),
            booking_id,
            details: details.clone(),
            performed_by: performed_by.clone(),
            created_at,
        };
        tables.history.push(entry.clone());
        Ok(entry)
    }

    async fn list_for_booking(
        &self,
        booking_id: BookingId,
    ) -> Result<Vec<BookingHistoryEntry>, BookingHistoryRepositoryError> {
        let mut entries: Vec<_> = self
            .lock_history()?
            .history
            .iter()
            .filter(|entry| entry.booking_id == booking_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(entries)
    }
}
