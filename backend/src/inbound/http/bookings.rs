//! Booking HTTP handlers.
//!
//! ```text
//! POST  /api/v1/bookings
//! GET   /api/v1/bookings/{booking_id}
//! PATCH /api/v1/bookings/{booking_id}
//! PUT   /api/v1/bookings/{booking_id}/status
//! PUT   /api/v1/bookings/{booking_id}/notes
//! GET   /api/v1/bookings/{booking_id}/history
//! GET   /api/v1/availability?date=YYYY-MM-DD
//! ```
//!
//! Every route requires an authenticated admin session. Handlers parse the
//! payload, attach the acting admin and delegate to the booking ports.

use actix_web::{HttpResponse, get, patch, post, put, web};

use crate::domain::ChangeStatusCommand;
use crate::domain::ports::{CreateBookingRequest, UpdateDetailsRequest, UpdateNotesRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

pub use super::bookings_dto::{
    AvailabilityQuery, AvailabilityResponse, BookingResponse, ChangeStatusBody, CreateBookingBody,
    HistoryEntryResponse, UpdateDetailsBody, UpdateNotesBody,
};
use super::bookings_dto::{
    BookingPath, parse_availability_query, parse_create_body, parse_details_body,
    parse_notes_body, parse_status_body,
};

/// Register every booking route on a service config.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use venue_backend::inbound::http::bookings::configure;
///
/// let _app = App::new().service(web::scope("/api/v1").configure(configure));
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_booking)
        .service(get_booking)
        .service(update_details)
        .service(change_status)
        .service(update_notes)
        .service(booking_history)
        .service(date_availability);
}

/// Create a booking in `inquiry` status.
#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    request_body = CreateBookingBody,
    responses(
        (status = 201, description = "Booking created", body = BookingResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 409, description = "Booking number conflict; retry", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "createBooking"
)]
#[post("/bookings")]
pub async fn create_booking(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateBookingBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let draft = parse_create_body(payload.into_inner())?;
    let booking = state
        .booking_commands
        .create_booking(CreateBookingRequest { draft, actor })
        .await?;
    Ok(HttpResponse::Created().json(BookingResponse::from(booking)))
}

/// Fetch one booking.
#[utoipa::path(
    get,
    path = "/api/v1/bookings/{booking_id}",
    params(("booking_id" = i64, Path, description = "Booking identifier")),
    responses(
        (status = 200, description = "Booking", body = BookingResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "getBooking"
)]
#[get("/bookings/{booking_id}")]
pub async fn get_booking(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<BookingPath>,
) -> ApiResult<web::Json<BookingResponse>> {
    session.require_actor()?;
    let booking_id = path.into_inner().parse()?;
    let booking = state.booking_queries.get_booking(booking_id).await?;
    Ok(web::Json(BookingResponse::from(booking)))
}

/// Edit customer name, email, event date or guest count.
#[utoipa::path(
    patch,
    path = "/api/v1/bookings/{booking_id}",
    request_body = UpdateDetailsBody,
    params(("booking_id" = i64, Path, description = "Booking identifier")),
    responses(
        (status = 200, description = "Updated booking", body = BookingResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "updateBookingDetails"
)]
#[patch("/bookings/{booking_id}")]
pub async fn update_details(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<BookingPath>,
    payload: web::Json<UpdateDetailsBody>,
) -> ApiResult<web::Json<BookingResponse>> {
    let actor = session.require_actor()?;
    let booking_id = path.into_inner().parse()?;
    let patch = parse_details_body(payload.into_inner())?;
    let booking = state
        .booking_commands
        .update_details(UpdateDetailsRequest {
            booking_id,
            patch,
            actor,
        })
        .await?;
    Ok(web::Json(BookingResponse::from(booking)))
}

/// Move a booking to another status.
///
/// Any status may follow any other; entering `quoted` or `deposit_paid`
/// stamps the matching date.
#[utoipa::path(
    put,
    path = "/api/v1/bookings/{booking_id}/status",
    request_body = ChangeStatusBody,
    params(("booking_id" = i64, Path, description = "Booking identifier")),
    responses(
        (status = 200, description = "Updated booking", body = BookingResponse),
        (status = 400, description = "Unknown status value", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Transition not permitted", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "changeBookingStatus"
)]
#[put("/bookings/{booking_id}/status")]
pub async fn change_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<BookingPath>,
    payload: web::Json<ChangeStatusBody>,
) -> ApiResult<web::Json<BookingResponse>> {
    let actor = session.require_actor()?;
    let booking_id = path.into_inner().parse()?;
    let (requested_status, note) = parse_status_body(payload.into_inner())?;
    let booking = state
        .booking_commands
        .change_status(ChangeStatusCommand {
            booking_id,
            requested_status,
            note,
            actor,
        })
        .await?;
    Ok(web::Json(BookingResponse::from(booking)))
}

/// Replace the booking's admin notes.
#[utoipa::path(
    put,
    path = "/api/v1/bookings/{booking_id}/notes",
    request_body = UpdateNotesBody,
    params(("booking_id" = i64, Path, description = "Booking identifier")),
    responses(
        (status = 200, description = "Updated booking", body = BookingResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "updateBookingNotes"
)]
#[put("/bookings/{booking_id}/notes")]
pub async fn update_notes(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<BookingPath>,
    payload: web::Json<UpdateNotesBody>,
) -> ApiResult<web::Json<BookingResponse>> {
    let actor = session.require_actor()?;
    let booking_id = path.into_inner().parse()?;
    let notes = parse_notes_body(payload.into_inner())?;
    let booking = state
        .booking_commands
        .update_notes(UpdateNotesRequest {
            booking_id,
            notes,
            actor,
        })
        .await?;
    Ok(web::Json(BookingResponse::from(booking)))
}

/// Audit trail of a booking, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/bookings/{booking_id}/history",
    params(("booking_id" = i64, Path, description = "Booking identifier")),
    responses(
        (status = 200, description = "History entries", body = [HistoryEntryResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "getBookingHistory"
)]
#[get("/bookings/{booking_id}/history")]
pub async fn booking_history(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<BookingPath>,
) -> ApiResult<web::Json<Vec<HistoryEntryResponse>>> {
    session.require_actor()?;
    let booking_id = path.into_inner().parse()?;
    let entries = state.booking_queries.booking_history(booking_id).await?;
    let entries = entries
        .into_iter()
        .map(HistoryEntryResponse::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(web::Json(entries))
}

/// Check whether the venue is free on a date.
#[utoipa::path(
    get,
    path = "/api/v1/availability",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Availability", body = AvailabilityResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "getDateAvailability"
)]
#[get("/availability")]
pub async fn date_availability(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<AvailabilityQuery>,
) -> ApiResult<web::Json<AvailabilityResponse>> {
    session.require_actor()?;
    let date = parse_availability_query(query.into_inner())?;
    let availability = state.booking_queries.date_availability(date).await?;
    Ok(web::Json(AvailabilityResponse::from(availability)))
}

#[cfg(test)]
#[path = "bookings_tests.rs"]
mod tests;
