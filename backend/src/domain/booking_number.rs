//! Year-scoped booking number allocation.
//!
//! The next number is derived from the greatest stored number for the year.
//! Allocation only reads; two concurrent creations can compute the same
//! number and the store's uniqueness constraint decides the winner.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, error};

use crate::domain::ports::BookingRepository;
use crate::domain::{BookingLifecycleError, BookingNumber, allocation_year};

/// Compute the number following `latest` within `year`.
///
/// Malformed stored numbers, numbers from another year, and an exhausted
/// sequence are integrity failures. The sequence never restarts silently.
///
/// # Examples
/// ```
/// use venue_backend::domain::next_booking_number;
///
/// let first = next_booking_number(2026, None).expect("first of year");
/// assert_eq!(first.as_str(), "SH-2026-0001");
///
/// let next = next_booking_number(2026, Some("SH-2026-0037")).expect("next");
/// assert_eq!(next.as_str(), "SH-2026-0038");
///
/// assert!(next_booking_number(2026, Some("SH-2026-00x7")).is_err());
/// ```
pub fn next_booking_number(
    year: i32,
    latest: Option<&str>,
) -> Result<BookingNumber, BookingLifecycleError> {
    let Some(raw) = latest else {
        return BookingNumber::new(year, 1).map_err(|err| {
            BookingLifecycleError::data_integrity(format!("cannot number bookings in {year}: {err}"))
        });
    };
    let latest = BookingNumber::parse(raw).map_err(|err| {
        BookingLifecycleError::data_integrity(format!("latest booking number is unusable: {err}"))
    })?;
    if latest.year() != year {
        return Err(BookingLifecycleError::data_integrity(format!(
            "latest booking number {latest} does not belong to {year}"
        )));
    }
    latest.successor().map_err(|err| {
        BookingLifecycleError::data_integrity(format!("booking numbers for {year} exhausted: {err}"))
    })
}

/// Allocates booking numbers from the booking store.
pub struct BookingNumberAllocator<R> {
    repository: Arc<R>,
}

impl<R> Clone for BookingNumberAllocator<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R> BookingNumberAllocator<R> {
    /// Allocate from `repository`.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

impl<R> BookingNumberAllocator<R>
where
    R: BookingRepository,
{
    /// Next free number for the year containing `today`.
    pub async fn allocate(&self, today: NaiveDate) -> Result<BookingNumber, BookingLifecycleError> {
        let year = allocation_year(today);
        let prefix = BookingNumber::prefix_for_year(year);
        let latest = self.repository.latest_booking_number(&prefix).await?;
        let number = next_booking_number(year, latest.as_deref()).inspect_err(|err| {
            error!(year, latest = ?latest, error = %err, "booking number allocation failed");
        })?;
        debug!(year, booking_number = %number, "booking number allocated");
        Ok(number)
    }
}
