//! Booking request/response DTOs and their parsing into domain inputs.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::ports::DateAvailability;
use crate::domain::{
    Booking, BookingDetailsPatch, BookingDraft, BookingHistoryEntry, BookingId, Error,
};
use crate::inbound::http::validation::{
    FieldName, draft_error, missing_field_error, parse_booking_id, parse_date,
};

const CUSTOMER_NAME: FieldName = FieldName::new("customerName");
const CUSTOMER_EMAIL: FieldName = FieldName::new("customerEmail");
const EVENT_DATE: FieldName = FieldName::new("eventDate");
const STATUS: FieldName = FieldName::new("status");
const DATE: FieldName = FieldName::new("date");
const NOTES: FieldName = FieldName::new("notes");

#[derive(Debug, Deserialize)]
pub(super) struct BookingPath {
    pub(super) booking_id: String,
}

impl BookingPath {
    pub(super) fn parse(self) -> Result<BookingId, Error> {
        parse_booking_id(&self.booking_id)
    }
}

/// Query string of `GET /api/v1/availability`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AvailabilityQuery {
    /// Date to check, `YYYY-MM-DD`.
    pub date: Option<String>,
}

/// Request payload for creating a booking.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingBody {
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    #[schema(example = "2026-09-12")]
    pub event_date: Option<String>,
    pub guest_count: Option<u32>,
    pub additional_notes: Option<String>,
}

/// Request payload for changing a booking's status.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangeStatusBody {
    #[schema(example = "quoted")]
    pub status: Option<String>,
    pub note: Option<String>,
}

/// Request payload replacing a booking's notes; `null` clears them.
///
/// The key itself is required so an empty object cannot wipe the notes.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNotesBody {
    /// Outer `None` when the key is absent, inner `None` for an explicit `null`.
    #[serde(default, deserialize_with = "present_key")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
}

fn present_key<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Request payload editing customer-facing booking fields.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDetailsBody {
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub event_date: Option<String>,
    pub guest_count: Option<u32>,
}

/// Booking as returned by the API.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: i64,
    #[schema(example = "SH-2026-0001")]
    pub booking_number: String,
    #[schema(example = "inquiry")]
    pub status: String,
    pub customer_name: String,
    pub customer_email: String,
    pub event_date: String,
    pub guest_count: Option<u32>,
    pub additional_notes: Option<String>,
    pub quote_sent_date: Option<String>,
    pub deposit_received_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// One audit-trail entry.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntryResponse {
    pub id: i64,
    pub booking_id: i64,
    #[schema(example = "status_changed")]
    pub action: String,
    #[schema(value_type = Object)]
    pub details: Value,
    pub performed_by: String,
    pub created_at: String,
}

/// Availability of the venue on one date.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub date: String,
    pub available: bool,
    pub conflicting_bookings: Vec<String>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id.get(),
            booking_number: booking.booking_number.to_string(),
            status: booking.status.as_str().to_owned(),
            customer_name: booking.customer_name,
            customer_email: booking.customer_email,
            event_date: booking.event_date.to_string(),
            guest_count: booking.guest_count,
            additional_notes: booking.additional_notes,
            quote_sent_date: booking.quote_sent_date.map(|at| at.to_rfc3339()),
            deposit_received_date: booking.deposit_received_date.map(|at| at.to_rfc3339()),
            created_at: booking.created_at.to_rfc3339(),
            updated_at: booking.updated_at.to_rfc3339(),
        }
    }
}

impl TryFrom<BookingHistoryEntry> for HistoryEntryResponse {
    type Error = Error;

    fn try_from(entry: BookingHistoryEntry) -> Result<Self, Self::Error> {
        let details = entry.details.to_payload().map_err(|err| {
            Error::internal(format!("history entry {} not encodable: {err}", entry.id))
        })?;
        Ok(Self {
            id: entry.id,
            booking_id: entry.booking_id.get(),
            action: entry.action().to_string(),
            details,
            performed_by: entry.performed_by.into(),
            created_at: entry.created_at.to_rfc3339(),
        })
    }
}

impl From<DateAvailability> for AvailabilityResponse {
    fn from(availability: DateAvailability) -> Self {
        Self {
            date: availability.date.to_string(),
            available: availability.available,
            conflicting_bookings: availability
                .conflicting_bookings
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

pub(super) fn parse_create_body(body: CreateBookingBody) -> Result<BookingDraft, Error> {
    let customer_name = body
        .customer_name
        .ok_or_else(|| missing_field_error(CUSTOMER_NAME))?;
    let customer_email = body
        .customer_email
        .ok_or_else(|| missing_field_error(CUSTOMER_EMAIL))?;
    let event_date = body
        .event_date
        .ok_or_else(|| missing_field_error(EVENT_DATE))?;
    let event_date = parse_date(&event_date, EVENT_DATE)?;
    BookingDraft::try_new(&customer_name, &customer_email, event_date, body.guest_count)
        .map(|draft| draft.with_notes(body.additional_notes))
        .map_err(|err| draft_error(&err))
}

pub(super) fn parse_status_body(body: ChangeStatusBody) -> Result<(String, Option<String>), Error> {
    let status = body.status.ok_or_else(|| missing_field_error(STATUS))?;
    Ok((status, body.note))
}

pub(super) fn parse_notes_body(body: UpdateNotesBody) -> Result<Option<String>, Error> {
    body.notes.ok_or_else(|| missing_field_error(NOTES))
}

pub(super) fn parse_details_body(body: UpdateDetailsBody) -> Result<BookingDetailsPatch, Error> {
    let event_date = body
        .event_date
        .map(|raw| parse_date(&raw, EVENT_DATE))
        .transpose()?;
    BookingDetailsPatch {
        customer_name: body.customer_name,
        customer_email: body.customer_email,
        event_date,
        guest_count: body.guest_count,
    }
    .validated()
    .map_err(|err| draft_error(&err))
}

pub(super) fn parse_availability_query(query: AvailabilityQuery) -> Result<chrono::NaiveDate, Error> {
    let date = query.date.ok_or_else(|| missing_field_error(DATE))?;
    parse_date(&date, DATE)
}
