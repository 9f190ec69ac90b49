//! Append-only audit trail of booking mutations.
//!
//! Every mutating booking action records one [`BookingHistoryEntry`]. The
//! stored form is an action tag plus a JSON payload; [`HistoryDetails`] is the
//! typed view of that pair. Rows written by newer releases, or rows whose
//! payload no longer matches its tag, decode to
//! [`HistoryDetails::Unrecognised`] so the trail stays readable.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::ports::BookingHistoryRepository;
use crate::domain::{ActorEmail, BookingId, BookingLifecycleError, BookingNumber, BookingStatus};

/// Action tag stored alongside each history entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HistoryAction {
    /// Booking was created.
    Created,
    /// Status transition.
    StatusChanged,
    /// `additional_notes` replaced.
    NotesUpdated,
    /// Customer-facing details edited.
    Updated,
    /// Tag not known to this release.
    Other(String),
}

impl HistoryAction {
    /// Stored tag value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Created => "created",
            Self::StatusChanged => "status_changed",
            Self::NotesUpdated => "notes_updated",
            Self::Updated => "updated",
            Self::Other(tag) => tag.as_str(),
        }
    }

    /// Map a stored tag, keeping unknown values.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "created" => Self::Created,
            "status_changed" => Self::StatusChanged,
            "notes_updated" => Self::NotesUpdated,
            "updated" => Self::Updated,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action-specific payload of a history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryDetails {
    /// Booking creation.
    Created {
        /// Number allocated to the booking.
        booking_number: BookingNumber,
        /// Initial status.
        status: BookingStatus,
    },
    /// Status transition; `from` is the status read just before the write.
    StatusChanged {
        /// Previous status.
        from: BookingStatus,
        /// Requested status.
        to: BookingStatus,
        /// Optional admin note.
        note: Option<String>,
    },
    /// Notes replaced.
    NotesUpdated {
        /// New notes, `None` when cleared.
        notes: Option<String>,
    },
    /// Customer-facing fields edited.
    Updated {
        /// Wire names of the fields that changed.
        changed_fields: Vec<String>,
    },
    /// Stored entry this release cannot interpret.
    Unrecognised {
        /// Stored action tag.
        action: String,
        /// Stored payload, untouched.
        payload: Value,
    },
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct CreatedPayload {
    booking_number: BookingNumber,
    status: BookingStatus,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct StatusChangedPayload {
    from: BookingStatus,
    to: BookingStatus,
    note: Option<String>,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct NotesUpdatedPayload {
    notes: Option<String>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct UpdatedPayload {
    changed_fields: Vec<String>,
}

fn to_json<T: Serialize>(payload: &T) -> Result<Value, serde_json::Error> {
    serde_json::to_value(payload)
}

impl HistoryDetails {
    /// Tag under which this payload is stored.
    #[must_use]
    pub fn action(&self) -> HistoryAction {
        match self {
            Self::Created { .. } => HistoryAction::Created,
            Self::StatusChanged { .. } => HistoryAction::StatusChanged,
            Self::NotesUpdated { .. } => HistoryAction::NotesUpdated,
            Self::Updated { .. } => HistoryAction::Updated,
            Self::Unrecognised { action, .. } => HistoryAction::from_tag(action),
        }
    }

    /// JSON payload stored in the `details` column.
    ///
    /// # Examples
    /// ```
    /// use venue_backend::domain::{BookingStatus, HistoryDetails};
    /// use serde_json::json;
    ///
    /// let details = HistoryDetails::StatusChanged {
    ///     from: BookingStatus::Inquiry,
    ///     to: BookingStatus::Quoted,
    ///     note: Some("sent via email".to_owned()),
    /// };
    /// assert_eq!(
    ///     details.to_payload()?,
    ///     json!({ "from": "inquiry", "to": "quoted", "note": "sent via email" })
    /// );
    /// # Ok::<(), serde_json::Error>(())
    /// ```
    ///
    /// # Errors
    /// Returns the serializer's error instead of storing a placeholder.
    pub fn to_payload(&self) -> Result<Value, serde_json::Error> {
        match self {
            Self::Created {
                booking_number,
                status,
            } => to_json(&CreatedPayload {
                booking_number: booking_number.clone(),
                status: *status,
            }),
            Self::StatusChanged { from, to, note } => to_json(&StatusChangedPayload {
                from: *from,
                to: *to,
                note: note.clone(),
            }),
            Self::NotesUpdated { notes } => to_json(&NotesUpdatedPayload {
                notes: notes.clone(),
            }),
            Self::Updated { changed_fields } => to_json(&UpdatedPayload {
                changed_fields: changed_fields.clone(),
            }),
            Self::Unrecognised { payload, .. } => Ok(payload.clone()),
        }
    }

    /// Rebuild typed details from a stored `(tag, payload)` pair.
    ///
    /// Never fails: anything that does not match a known shape becomes
    /// [`HistoryDetails::Unrecognised`].
    #[must_use]
    pub fn from_stored(action: &str, payload: Value) -> Self {
        let decoded = match HistoryAction::from_tag(action) {
            HistoryAction::Created => serde_json::from_value::<CreatedPayload>(payload.clone())
                .ok()
                .map(|p| Self::Created {
                    booking_number: p.booking_number,
                    status: p.status,
                }),
            HistoryAction::StatusChanged => {
                serde_json::from_value::<StatusChangedPayload>(payload.clone())
                    .ok()
                    .map(|p| Self::StatusChanged {
                        from: p.from,
                        to: p.to,
                        note: p.note,
                    })
            }
            HistoryAction::NotesUpdated => {
                serde_json::from_value::<NotesUpdatedPayload>(payload.clone())
                    .ok()
                    .map(|p| Self::NotesUpdated { notes: p.notes })
            }
            HistoryAction::Updated => serde_json::from_value::<UpdatedPayload>(payload.clone())
                .ok()
                .map(|p| Self::Updated {
                    changed_fields: p.changed_fields,
                }),
            HistoryAction::Other(_) => None,
        };
        decoded.unwrap_or_else(|| Self::Unrecognised {
            action: action.to_owned(),
            payload,
        })
    }
}

/// One immutable audit record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingHistoryEntry {
    /// Storage-assigned identifier.
    pub id: i64,
    /// Owning booking.
    pub booking_id: BookingId,
    /// What happened.
    pub details: HistoryDetails,
    /// Admin who performed the action.
    pub performed_by: ActorEmail,
    /// Storage-assigned creation time.
    pub created_at: DateTime<Utc>,
}

impl BookingHistoryEntry {
    /// Action tag of this entry.
    #[must_use]
    pub fn action(&self) -> HistoryAction {
        self.details.action()
    }
}

/// Append-only history ledger over a [`BookingHistoryRepository`].
pub struct HistoryLog<R> {
    repository: Arc<R>,
}

impl<R> Clone for HistoryLog<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R> HistoryLog<R> {
    /// Wrap a history repository.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

impl<R> HistoryLog<R>
where
    R: BookingHistoryRepository,
{
    /// Record one action against a booking.
    pub async fn append(
        &self,
        booking_id: BookingId,
        details: HistoryDetails,
        actor: &ActorEmail,
    ) -> Result<BookingHistoryEntry, BookingLifecycleError> {
        let entry = self
            .repository
            .append(booking_id, &details, actor)
            .await
            .map_err(|err| {
                warn!(%booking_id, action = %details.action(), error = %err, "history append failed");
                BookingLifecycleError::from(err)
            })?;
        debug!(
            %booking_id,
            entry_id = entry.id,
            action = %entry.action(),
            performed_by = %entry.performed_by,
            "history entry appended"
        );
        Ok(entry)
    }

    /// Entries for a booking in creation order.
    ///
    /// Sorting happens here as well so an adapter returning rows out of order
    /// cannot scramble the trail; ties on `created_at` fall back to `id`.
    pub async fn entries_for(
        &self,
        booking_id: BookingId,
    ) -> Result<Vec<BookingHistoryEntry>, BookingLifecycleError> {
        let mut entries = self.repository.list_for_booking(booking_id).await?;
        entries.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(entries)
    }
}

#[cfg(test)]
#[path = "booking_history_tests.rs"]
mod tests;
