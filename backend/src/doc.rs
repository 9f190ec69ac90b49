//! OpenAPI documentation.
//!
//! [`ApiDoc`] registers every booking, auth and health path plus the error
//! schema wrappers. Swagger UI serves it in debug builds and
//! `cargo run --bin openapi-dump` prints it for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::auth::LoginRequest;
use crate::inbound::http::bookings::{
    AvailabilityResponse, BookingResponse, ChangeStatusBody, CreateBookingBody,
    HistoryEntryResponse, UpdateDetailsBody, UpdateNotesBody,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the venue booking API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Venue booking API",
        description = "Admin interface for venue bookings: creation, status lifecycle, notes, audit history and date availability."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::bookings::create_booking,
        crate::inbound::http::bookings::get_booking,
        crate::inbound::http::bookings::update_details,
        crate::inbound::http::bookings::change_status,
        crate::inbound::http::bookings::update_notes,
        crate::inbound::http::bookings::booking_history,
        crate::inbound::http::bookings::date_availability,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        LoginRequest,
        CreateBookingBody,
        ChangeStatusBody,
        UpdateNotesBody,
        UpdateDetailsBody,
        BookingResponse,
        HistoryEntryResponse,
        AvailabilityResponse,
    )),
    tags(
        (name = "auth", description = "Admin session management"),
        (name = "bookings", description = "Booking lifecycle operations"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
