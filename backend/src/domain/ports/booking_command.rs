//! Driving port for booking mutations.
//!
//! Inbound adapters call [`BookingCommand`] with already-parsed payloads and
//! the authenticated admin's identity. Every successful call leaves exactly
//! one new history entry behind.

use async_trait::async_trait;

use crate::domain::{
    ActorEmail, Booking, BookingDetailsPatch, BookingDraft, BookingId, ChangeStatusCommand, Error,
};

/// Request to create a booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBookingRequest {
    /// Validated booking fields.
    pub draft: BookingDraft,
    /// Admin creating the booking.
    pub actor: ActorEmail,
}

/// Request to replace a booking's notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateNotesRequest {
    /// Booking to edit.
    pub booking_id: BookingId,
    /// New notes; blank or `None` clears them.
    pub notes: Option<String>,
    /// Admin editing the notes.
    pub actor: ActorEmail,
}

/// Request to edit customer-facing booking details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateDetailsRequest {
    /// Booking to edit.
    pub booking_id: BookingId,
    /// Fields to change.
    pub patch: BookingDetailsPatch,
    /// Admin editing the booking.
    pub actor: ActorEmail,
}

/// Use-case port for booking mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingCommand: Send + Sync {
    /// Allocate a number and store a new `inquiry` booking.
    ///
    /// A booking-number collision is reported as a conflict; callers may
    /// retry.
    async fn create_booking(&self, request: CreateBookingRequest) -> Result<Booking, Error>;

    /// Move a booking to another status.
    async fn change_status(&self, command: ChangeStatusCommand) -> Result<Booking, Error>;

    /// Replace `additional_notes`.
    async fn update_notes(&self, request: UpdateNotesRequest) -> Result<Booking, Error>;

    /// Edit name, email, event date or guest count.
    async fn update_details(&self, request: UpdateDetailsRequest) -> Result<Booking, Error>;
}
