//! Booking use cases behind the driving ports.
//!
//! [`BookingService`] wires the allocator, status machine and history log to
//! the booking store. Each mutation writes the booking row first and then
//! appends its history entry.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    BookingCommand, BookingHistoryRepository, BookingQuery, BookingRepository,
    CreateBookingRequest, DateAvailability, NewBooking, UpdateDetailsRequest, UpdateNotesRequest,
};
use crate::domain::{
    Booking, BookingDraftError, BookingHistoryEntry, BookingId, BookingLifecycleError,
    BookingNumberAllocator, BookingStatus, BookingStatusMachine, ChangeStatusCommand, Error,
    HistoryDetails, HistoryLog, normalise_notes,
};

/// Booking service implementing [`BookingCommand`] and [`BookingQuery`].
pub struct BookingService<B, H> {
    bookings: Arc<B>,
    history: HistoryLog<H>,
    allocator: BookingNumberAllocator<B>,
    status_machine: BookingStatusMachine<B, H>,
    clock: Arc<dyn Clock>,
}

impl<B, H> Clone for BookingService<B, H> {
    fn clone(&self) -> Self {
        Self {
            bookings: Arc::clone(&self.bookings),
            history: self.history.clone(),
            allocator: self.allocator.clone(),
            status_machine: self.status_machine.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<B, H> BookingService<B, H> {
    /// Create a service over the given stores.
    pub fn new(bookings: Arc<B>, history_repo: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        let history = HistoryLog::new(history_repo);
        Self {
            allocator: BookingNumberAllocator::new(Arc::clone(&bookings)),
            status_machine: BookingStatusMachine::new(
                Arc::clone(&bookings),
                history.clone(),
                Arc::clone(&clock),
            ),
            bookings,
            history,
            clock,
        }
    }
}

fn draft_error(error: BookingDraftError) -> Error {
    Error::invalid_request(error.to_string())
}

impl<B, H> BookingService<B, H>
where
    B: BookingRepository,
    H: BookingHistoryRepository,
{
    async fn existing(&self, booking_id: BookingId) -> Result<Booking, BookingLifecycleError> {
        self.bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| BookingLifecycleError::not_found(booking_id))
    }

    async fn create(&self, request: CreateBookingRequest) -> Result<Booking, BookingLifecycleError> {
        let CreateBookingRequest { draft, actor } = request;
        // Numbering years roll over at midnight UTC, like every stored timestamp.
        let today = self.clock.utc().date_naive();
        let booking_number = self.allocator.allocate(today).await?;
        let new_booking = NewBooking {
            booking_number,
            status: BookingStatus::default(),
            customer_name: draft.customer_name().to_owned(),
            customer_email: draft.customer_email().to_owned(),
            event_date: draft.event_date(),
            guest_count: draft.guest_count(),
            additional_notes: draft.additional_notes().map(str::to_owned),
        };
        let booking = self.bookings.insert(&new_booking).await?;
        self.history
            .append(
                booking.id,
                HistoryDetails::Created {
                    booking_number: booking.booking_number.clone(),
                    status: booking.status,
                },
                &actor,
            )
            .await?;
        info!(
            booking_id = %booking.id,
            booking_number = %booking.booking_number,
            performed_by = %actor,
            "booking created"
        );
        Ok(booking)
    }

    async fn replace_notes(&self, request: UpdateNotesRequest) -> Result<Booking, BookingLifecycleError> {
        let UpdateNotesRequest {
            booking_id,
            notes,
            actor,
        } = request;
        let notes = normalise_notes(notes);
        let updated = self
            .bookings
            .update_notes(booking_id, notes.clone(), self.clock.utc())
            .await?
            .ok_or_else(|| BookingLifecycleError::not_found(booking_id))?;
        self.history
            .append(booking_id, HistoryDetails::NotesUpdated { notes }, &actor)
            .await?;
        Ok(updated)
    }
}

#[async_trait]
impl<B, H> BookingCommand for BookingService<B, H>
where
    B: BookingRepository,
    H: BookingHistoryRepository,
{
    async fn create_booking(&self, request: CreateBookingRequest) -> Result<Booking, Error> {
        Ok(self.create(request).await?)
    }

    async fn change_status(&self, command: ChangeStatusCommand) -> Result<Booking, Error> {
        Ok(self.status_machine.apply(command).await?)
    }

    async fn update_notes(&self, request: UpdateNotesRequest) -> Result<Booking, Error> {
        Ok(self.replace_notes(request).await?)
    }

    async fn update_details(&self, request: UpdateDetailsRequest) -> Result<Booking, Error> {
        let UpdateDetailsRequest {
            booking_id,
            patch,
            actor,
        } = request;
        if patch.is_empty() {
            return Err(Error::invalid_request("at least one field must be supplied"));
        }
        let patch = patch.validated().map_err(draft_error)?;
        let current = self.existing(booking_id).await?;
        let (effective, changed_fields) = patch.effective_against(&current);
        if changed_fields.is_empty() {
            return Ok(current);
        }
        let updated = self
            .bookings
            .update_details(booking_id, &effective, self.clock.utc())
            .await
            .map_err(BookingLifecycleError::from)?
            .ok_or_else(|| BookingLifecycleError::not_found(booking_id))?;
        self.history
            .append(booking_id, HistoryDetails::Updated { changed_fields }, &actor)
            .await?;
        Ok(updated)
    }
}

#[async_trait]
impl<B, H> BookingQuery for BookingService<B, H>
where
    B: BookingRepository,
    H: BookingHistoryRepository,
{
    async fn get_booking(&self, booking_id: BookingId) -> Result<Booking, Error> {
        Ok(self.existing(booking_id).await?)
    }

    async fn booking_history(
        &self,
        booking_id: BookingId,
    ) -> Result<Vec<BookingHistoryEntry>, Error> {
        self.existing(booking_id).await?;
        Ok(self.history.entries_for(booking_id).await?)
    }

    async fn date_availability(&self, date: NaiveDate) -> Result<DateAvailability, Error> {
        let bookings = self
            .bookings
            .find_by_event_date(date)
            .await
            .map_err(BookingLifecycleError::from)?;
        let conflicting_bookings: Vec<_> = bookings
            .into_iter()
            .filter(Booking::holds_event_date)
            .map(|booking| booking.booking_number)
            .collect();
        Ok(DateAvailability {
            date,
            available: conflicting_bookings.is_empty(),
            conflicting_bookings,
        })
    }
}

#[cfg(test)]
#[path = "booking_service_tests.rs"]
mod tests;
