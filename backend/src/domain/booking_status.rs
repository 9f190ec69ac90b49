//! Booking status transitions.
//!
//! Any status may follow any other, including itself. What a transition does
//! depends only on the target: entering `quoted` stamps `quote_sent_date`,
//! entering `deposit_paid` stamps `deposit_received_date`, and both stamps
//! are refreshed on every entry. The booking row is written before the
//! `status_changed` history entry is appended, so a failure in between leaves
//! an applied but unaudited change rather than an audited change that never
//! happened.
//!
//! Reading the current status and writing the new one are separate store
//! calls. Concurrent transitions on one booking are last-write-wins and the
//! recorded `from` may not match the status that was overwritten.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{BookingHistoryRepository, BookingRepository, StatusChange};
use crate::domain::{
    ActorEmail, Booking, BookingId, BookingLifecycleError, BookingStatus, HistoryDetails,
    HistoryLog, normalise_notes,
};

/// Whether a booking may move between the two statuses.
///
/// Every pair is currently allowed so admins can correct mistakes, including
/// reopening cancelled or completed bookings. Restrictions belong here and
/// nowhere else.
#[must_use]
pub const fn transition_permitted(_from: BookingStatus, _to: BookingStatus) -> bool {
    true
}

/// Compute the field update for moving a booking into `target` at `now`.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use venue_backend::domain::{BookingStatus, plan_transition};
///
/// let now = Utc::now();
/// let change = plan_transition(BookingStatus::Quoted, now);
/// assert_eq!(change.quote_sent_date, Some(now));
/// assert_eq!(change.deposit_received_date, None);
/// ```
#[must_use]
pub fn plan_transition(target: BookingStatus, now: DateTime<Utc>) -> StatusChange {
    StatusChange {
        status: target,
        quote_sent_date: (target == BookingStatus::Quoted).then_some(now),
        deposit_received_date: (target == BookingStatus::DepositPaid).then_some(now),
        updated_at: now,
    }
}

/// Request to move a booking to a new status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeStatusCommand {
    /// Booking to transition.
    pub booking_id: BookingId,
    /// Requested status exactly as received.
    pub requested_status: String,
    /// Optional note recorded in the history entry.
    pub note: Option<String>,
    /// Admin performing the change.
    pub actor: ActorEmail,
}

/// Applies status transitions and records them in the history log.
pub struct BookingStatusMachine<B, H> {
    bookings: Arc<B>,
    history: HistoryLog<H>,
    clock: Arc<dyn Clock>,
}

impl<B, H> Clone for BookingStatusMachine<B, H> {
    fn clone(&self) -> Self {
        Self {
            bookings: Arc::clone(&self.bookings),
            history: self.history.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<B, H> BookingStatusMachine<B, H> {
    /// Build a machine over the booking store and history log.
    pub fn new(bookings: Arc<B>, history: HistoryLog<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            bookings,
            history,
            clock,
        }
    }
}

impl<B, H> BookingStatusMachine<B, H>
where
    B: BookingRepository,
    H: BookingHistoryRepository,
{
    /// Validate and apply a transition, returning the updated booking.
    ///
    /// Unknown statuses and unknown bookings are rejected before anything is
    /// written.
    pub async fn apply(&self, command: ChangeStatusCommand) -> Result<Booking, BookingLifecycleError> {
        let ChangeStatusCommand {
            booking_id,
            requested_status,
            note,
            actor,
        } = command;

        let target = requested_status.parse::<BookingStatus>().inspect_err(|err| {
            warn!(%booking_id, error = %err, "rejected status change");
        })?;

        let current = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| BookingLifecycleError::not_found(booking_id))?;
        let from = current.status;

        if !transition_permitted(from, target) {
            return Err(BookingLifecycleError::TransitionNotPermitted { from, to: target });
        }

        let change = plan_transition(target, self.clock.utc());
        let updated = self
            .bookings
            .update_status(booking_id, &change)
            .await?
            .ok_or_else(|| BookingLifecycleError::not_found(booking_id))?;

        self.history
            .append(
                booking_id,
                HistoryDetails::StatusChanged {
                    from,
                    to: target,
                    note: normalise_notes(note),
                },
                &actor,
            )
            .await?;

        info!(
            %booking_id,
            booking_number = %updated.booking_number,
            %from,
            to = %target,
            performed_by = %actor,
            "booking status changed"
        );
        Ok(updated)
    }
}

#[cfg(test)]
#[path = "booking_status_tests.rs"]
mod tests;
