//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every failure becomes an `invalid_request` [`Error`] whose details name
//! the offending field and a stable machine-readable code.

use chrono::NaiveDate;
use serde_json::json;

use crate::domain::{BookingDraftError, BookingId, Error};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidDate,
    InvalidBookingId,
    InvalidValue,
}

impl ErrorCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidDate => "invalid_date",
            Self::InvalidBookingId => "invalid_booking_id",
            Self::InvalidValue => "invalid_value",
        }
    }
}

/// Wire name of a request field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    const fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, code: ErrorCode, message: String) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

fn field_value_error(field: FieldName, code: ErrorCode, message: String, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    field_error(
        field,
        ErrorCode::MissingField,
        format!("missing required field: {}", field.as_str()),
    )
}

pub(crate) fn invalid_date_error(field: FieldName, value: &str) -> Error {
    field_value_error(
        field,
        ErrorCode::InvalidDate,
        format!("{} must be a calendar date (YYYY-MM-DD)", field.as_str()),
        value,
    )
}

/// Parse a `YYYY-MM-DD` calendar date.
pub(crate) fn parse_date(value: &str, field: FieldName) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| invalid_date_error(field, value))
}

/// Parse a positive booking identifier from a path segment.
pub(crate) fn parse_booking_id(value: &str) -> Result<BookingId, Error> {
    const FIELD: FieldName = FieldName::new("bookingId");
    value
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .map(BookingId::new)
        .ok_or_else(|| {
            field_value_error(
                FIELD,
                ErrorCode::InvalidBookingId,
                "bookingId must be a positive integer".to_owned(),
                value,
            )
        })
}

/// Map draft validation failures onto the field that caused them.
pub(crate) fn draft_error(error: &BookingDraftError) -> Error {
    let field = match error {
        BookingDraftError::EmptyCustomerName | BookingDraftError::CustomerNameTooLong { .. } => {
            FieldName::new("customerName")
        }
        BookingDraftError::CustomerEmail(_) => FieldName::new("customerEmail"),
        BookingDraftError::ZeroGuests | BookingDraftError::GuestCountTooLarge { .. } => {
            FieldName::new("guestCount")
        }
    };
    field_error(field, ErrorCode::InvalidValue, error.to_string())
}
