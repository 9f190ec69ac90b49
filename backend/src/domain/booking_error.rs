//! Failures raised by the booking lifecycle core.
//!
//! [`BookingLifecycleError`] is what the allocator, status machine and
//! history log return. Driving ports convert it into the transport-agnostic
//! [`Error`] with a stable `details.code` so clients can branch on it.

use serde_json::json;

use crate::domain::ports::{BookingHistoryRepositoryError, BookingRepositoryError};
use crate::domain::{BookingId, BookingStatus, Error, ParseBookingStatusError};

/// Typed failure of a booking lifecycle operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingLifecycleError {
    /// No booking has the requested id.
    #[error("booking {booking_id} not found")]
    NotFound {
        /// Requested identifier.
        booking_id: BookingId,
    },
    /// Requested status is not one of the known values.
    #[error(transparent)]
    InvalidStatus(#[from] ParseBookingStatusError),
    /// The transition policy refused the move.
    #[error("booking cannot move from {from} to {to}")]
    TransitionNotPermitted {
        /// Current status.
        from: BookingStatus,
        /// Requested status.
        to: BookingStatus,
    },
    /// Stored data violates a booking invariant.
    #[error("booking data integrity violated: {message}")]
    DataIntegrity {
        /// Description of the corrupt value.
        message: String,
    },
    /// Storage rejected a duplicate booking number.
    #[error("booking number {booking_number} is already taken")]
    UniqueConstraintViolation {
        /// Number that collided.
        booking_number: String,
    },
    /// Underlying storage failed.
    #[error("booking storage failed: {message}")]
    Storage {
        /// Adapter message.
        message: String,
        /// Whether the store was unreachable rather than rejecting the query.
        transient: bool,
    },
}

impl BookingLifecycleError {
    /// Shorthand for [`BookingLifecycleError::NotFound`].
    #[must_use]
    pub fn not_found(booking_id: BookingId) -> Self {
        Self::NotFound { booking_id }
    }

    /// Shorthand for [`BookingLifecycleError::DataIntegrity`].
    pub fn data_integrity(message: impl Into<String>) -> Self {
        Self::DataIntegrity {
            message: message.into(),
        }
    }
}

impl From<BookingRepositoryError> for BookingLifecycleError {
    fn from(error: BookingRepositoryError) -> Self {
        match error {
            BookingRepositoryError::Connection { message } => Self::Storage {
                message,
                transient: true,
            },
            BookingRepositoryError::Query { message } => Self::Storage {
                message,
                transient: false,
            },
            BookingRepositoryError::DuplicateBookingNumber { booking_number } => {
                Self::UniqueConstraintViolation { booking_number }
            }
            BookingRepositoryError::Corrupt { message } => Self::DataIntegrity { message },
        }
    }
}

impl From<BookingHistoryRepositoryError> for BookingLifecycleError {
    fn from(error: BookingHistoryRepositoryError) -> Self {
        match error {
            BookingHistoryRepositoryError::Connection { message } => Self::Storage {
                message,
                transient: true,
            },
            BookingHistoryRepositoryError::Query { message } => Self::Storage {
                message,
                transient: false,
            },
        }
    }
}

impl From<BookingLifecycleError> for Error {
    fn from(error: BookingLifecycleError) -> Self {
        let message = error.to_string();
        match error {
            BookingLifecycleError::NotFound { booking_id } => Error::not_found(message)
                .with_details(json!({ "code": "booking_not_found", "bookingId": booking_id })),
            BookingLifecycleError::InvalidStatus(ParseBookingStatusError { input }) => {
                let allowed: Vec<&str> = BookingStatus::ALL.iter().map(|s| s.as_str()).collect();
                Error::invalid_request(message).with_details(json!({
                    "code": "invalid_status",
                    "field": "status",
                    "value": input,
                    "allowed": allowed,
                }))
            }
            BookingLifecycleError::TransitionNotPermitted { from, to } => Error::conflict(message)
                .with_details(json!({
                    "code": "transition_not_permitted",
                    "from": from,
                    "to": to,
                })),
            BookingLifecycleError::DataIntegrity { .. } => {
                Error::internal(message).with_details(json!({ "code": "data_integrity" }))
            }
            BookingLifecycleError::UniqueConstraintViolation { booking_number } => {
                Error::conflict(message).with_details(json!({
                    "code": "booking_number_conflict",
                    "bookingNumber": booking_number,
                }))
            }
            BookingLifecycleError::Storage {
                transient: true, ..
            } => Error::service_unavailable(message),
            BookingLifecycleError::Storage { .. } => Error::internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(BookingRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(BookingRepositoryError::query("syntax"), ErrorCode::InternalError)]
    #[case(BookingRepositoryError::duplicate_booking_number("SH-2026-0002"), ErrorCode::Conflict)]
    #[case(BookingRepositoryError::corrupt("bad number"), ErrorCode::InternalError)]
    fn repository_errors_map_to_error_codes(
        #[case] source: BookingRepositoryError,
        #[case] expected: ErrorCode,
    ) {
        let error = Error::from(BookingLifecycleError::from(source));
        assert_eq!(error.code(), expected);
    }

    #[rstest]
    fn invalid_status_lists_allowed_values() {
        let parse = "archived".parse::<BookingStatus>().expect_err("unknown status");
        let error = Error::from(BookingLifecycleError::from(parse));

        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        let details = error.details().expect("details present");
        assert_eq!(details["code"], "invalid_status");
        assert_eq!(details["value"], "archived");
        assert_eq!(details["allowed"].as_array().map(Vec::len), Some(6));
    }

    #[rstest]
    fn conflicts_carry_a_stable_code() {
        let error = Error::from(BookingLifecycleError::UniqueConstraintViolation {
            booking_number: "SH-2026-0002".to_owned(),
        });
        let details = error.details().expect("details present");
        assert_eq!(details["code"], "booking_number_conflict");
        assert_eq!(details["bookingNumber"], "SH-2026-0002");
    }
}
