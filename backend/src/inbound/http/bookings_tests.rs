//! Tests for booking HTTP handlers.

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use chrono::NaiveDate;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{
    BookingCommand, BookingQuery, DateAvailability, FixtureLoginService, MockBookingCommand,
    MockBookingQuery,
};
use crate::domain::{
    BookingLifecycleError, BookingNumber, BookingService, BookingStatus, ErrorCode,
};
use crate::inbound::http::auth::{LoginRequest, login};
use crate::inbound::http::bookings_dto::AvailabilityQuery;
use crate::inbound::http::state::HttpStatePorts;
use crate::inbound::http::test_utils::{SESSION_COOKIE, test_session_middleware};
use crate::outbound::memory::InMemoryBookingStore;
use crate::test_support::{MutableClock, fixed_instant, sample_booking};

fn state_with(commands: Arc<dyn BookingCommand>, queries: Arc<dyn BookingQuery>) -> HttpState {
    HttpState::new(HttpStatePorts {
        login: Arc::new(FixtureLoginService),
        booking_commands: commands,
        booking_queries: queries,
    })
}

fn in_memory_state() -> HttpState {
    let clock = Arc::new(MutableClock::new(fixed_instant()));
    let store = Arc::new(InMemoryBookingStore::new(clock.clone()));
    let service = Arc::new(BookingService::new(store.clone(), store, clock));
    state_with(service.clone(), service)
}

fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(web::Data::new(state)).service(
        web::scope("/api/v1")
            .wrap(test_session_middleware())
            .service(login)
            .configure(configure),
    )
}

async fn login_cookie(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
) -> Cookie<'static> {
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(LoginRequest {
            email: "admin@venue.test".to_owned(),
            password: "password".to_owned(),
        })
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(Cookie::into_owned)
        .expect("session cookie")
}

fn create_body() -> Value {
    json!({
        "customerName": "Ana Lima",
        "customerEmail": "Ana@Example.com",
        "eventDate": "2026-09-12",
        "guestCount": 120
    })
}

// DTO parsing

#[rstest]
#[case(json!({"customerEmail": "a@b.c", "eventDate": "2026-09-12"}), "customerName")]
#[case(json!({"customerName": "Ana", "eventDate": "2026-09-12"}), "customerEmail")]
#[case(json!({"customerName": "Ana", "customerEmail": "a@b.c"}), "eventDate")]
fn create_body_requires_core_fields(#[case] raw: Value, #[case] field: &str) {
    let body: CreateBookingBody = serde_json::from_value(raw).expect("body shape");

    let err = parse_create_body(body).expect_err("missing field");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    let details = err.details().expect("details");
    assert_eq!(details["field"], field);
    assert_eq!(details["code"], "missing_field");
}

#[rstest]
fn create_body_rejects_zero_guests() {
    let body = CreateBookingBody {
        customer_name: Some("Ana".to_owned()),
        customer_email: Some("ana@example.com".to_owned()),
        event_date: Some("2026-09-12".to_owned()),
        guest_count: Some(0),
        additional_notes: None,
    };

    let err = parse_create_body(body).expect_err("zero guests");

    assert_eq!(err.details().expect("details")["field"], "guestCount");
}

#[rstest]
#[case(
    json!({"customerName": "n".repeat(201), "customerEmail": "a@b.c", "eventDate": "2026-09-12"}),
    "customerName"
)]
#[case(
    json!({"customerName": "Ana", "customerEmail": "a@b.c", "eventDate": "2026-09-12",
           "guestCount": 3_000_000_000_u32}),
    "guestCount"
)]
fn create_body_rejects_values_beyond_column_limits(#[case] raw: Value, #[case] field: &str) {
    let body: CreateBookingBody = serde_json::from_value(raw).expect("body shape");

    let err = parse_create_body(body).expect_err("over the limit");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.details().expect("details")["field"], field);
}

#[rstest]
#[case(json!({"notes": "Vegan menu"}), Some(Some("Vegan menu".to_owned())))]
#[case(json!({"notes": null}), Some(None))]
#[case(json!({}), None)]
fn notes_body_tells_null_from_absent(#[case] raw: Value, #[case] expected: Option<Option<String>>) {
    let body: UpdateNotesBody = serde_json::from_value(raw).expect("body shape");

    match expected {
        Some(notes) => assert_eq!(parse_notes_body(body).expect("valid body"), notes),
        None => {
            let err = parse_notes_body(body).expect_err("missing notes");
            let details = err.details().expect("details");
            assert_eq!(details["field"], "notes");
            assert_eq!(details["code"], "missing_field");
        }
    }
}

#[rstest]
fn details_body_parses_event_date() {
    let patch = parse_details_body(UpdateDetailsBody {
        event_date: Some("2026-10-01".to_owned()),
        ..UpdateDetailsBody::default()
    })
    .expect("valid patch");

    assert_eq!(patch.event_date, NaiveDate::from_ymd_opt(2026, 10, 1));
    assert!(patch.customer_name.is_none());
}

#[rstest]
fn status_body_requires_status() {
    let err = parse_status_body(ChangeStatusBody::default()).expect_err("missing status");
    assert_eq!(err.details().expect("details")["field"], "status");
}

#[rstest]
fn availability_query_requires_date() {
    let err = parse_availability_query(AvailabilityQuery { date: None }).expect_err("no date");
    assert_eq!(err.details().expect("details")["field"], "date");
}

// Handlers against port mocks

#[actix_web::test]
async fn booking_routes_require_a_session() {
    let mut commands = MockBookingCommand::new();
    commands.expect_create_booking().never();
    let app = actix_test::init_service(test_app(state_with(
        Arc::new(commands),
        Arc::new(MockBookingQuery::new()),
    )))
    .await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/bookings")
            .set_json(create_body())
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn change_status_forwards_raw_status_note_and_actor() {
    let mut commands = MockBookingCommand::new();
    commands
        .expect_change_status()
        .withf(|command| {
            command.booking_id.get() == 3
                && command.requested_status == "quoted"
                && command.note.as_deref() == Some("sent PDF")
                && command.actor.as_ref() == "admin@venue.test"
        })
        .times(1)
        .returning(|_| Ok(sample_booking(3, BookingStatus::Quoted)));
    let app = actix_test::init_service(test_app(state_with(
        Arc::new(commands),
        Arc::new(MockBookingQuery::new()),
    )))
    .await;
    let cookie = login_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/bookings/3/status")
            .cookie(cookie)
            .set_json(json!({"status": "quoted", "note": "sent PDF"}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: BookingResponse = actix_test::read_body_json(res).await;
    assert_eq!(body.status, "quoted");
    assert_eq!(body.booking_number, "SH-2026-0003");
}

#[actix_web::test]
async fn missing_booking_maps_to_404() {
    let mut queries = MockBookingQuery::new();
    queries
        .expect_get_booking()
        .returning(|id| Err(BookingLifecycleError::not_found(id).into()));
    let app = actix_test::init_service(test_app(state_with(
        Arc::new(MockBookingCommand::new()),
        Arc::new(queries),
    )))
    .await;
    let cookie = login_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/bookings/42")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["code"], "booking_not_found");
}

#[actix_web::test]
async fn malformed_booking_id_never_reaches_the_port() {
    let mut queries = MockBookingQuery::new();
    queries.expect_get_booking().never();
    let app = actix_test::init_service(test_app(state_with(
        Arc::new(MockBookingCommand::new()),
        Arc::new(queries),
    )))
    .await;
    let cookie = login_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/bookings/abc")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn availability_lists_conflicting_numbers() {
    let mut queries = MockBookingQuery::new();
    queries.expect_date_availability().returning(|date| {
        Ok(DateAvailability {
            date,
            available: false,
            conflicting_bookings: vec![BookingNumber::new(2026, 7).expect("number")],
        })
    });
    let app = actix_test::init_service(test_app(state_with(
        Arc::new(MockBookingCommand::new()),
        Arc::new(queries),
    )))
    .await;
    let cookie = login_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/availability?date=2026-09-12")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: AvailabilityResponse = actix_test::read_body_json(res).await;
    assert!(!body.available);
    assert_eq!(body.date, "2026-09-12");
    assert_eq!(body.conflicting_bookings, vec!["SH-2026-0007".to_owned()]);
}

// Handlers against the real service and in-memory store

#[actix_web::test]
async fn lifecycle_over_http_records_history() {
    let app = actix_test::init_service(test_app(in_memory_state())).await;
    let cookie = login_cookie(&app).await;

    let created = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/bookings")
            .cookie(cookie.clone())
            .set_json(create_body())
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let created: BookingResponse = actix_test::read_body_json(created).await;
    assert_eq!(created.booking_number, "SH-2026-0001");
    assert_eq!(created.status, "inquiry");
    assert_eq!(created.customer_email, "ana@example.com");

    let quoted = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/v1/bookings/{}/status", created.id))
            .cookie(cookie.clone())
            .set_json(json!({"status": "quoted"}))
            .to_request(),
    )
    .await;
    assert_eq!(quoted.status(), StatusCode::OK);
    let quoted: BookingResponse = actix_test::read_body_json(quoted).await;
    assert_eq!(quoted.quote_sent_date, Some(fixed_instant().to_rfc3339()));

    let history = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/bookings/{}/history", created.id))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(history.status(), StatusCode::OK);
    let history: Vec<HistoryEntryResponse> = actix_test::read_body_json(history).await;
    let actions: Vec<_> = history.iter().map(|entry| entry.action.as_str()).collect();
    assert_eq!(actions, ["created", "status_changed"]);
    assert_eq!(history[1].details, json!({"from": "inquiry", "to": "quoted", "note": null}));
    assert!(history.iter().all(|entry| entry.performed_by == "admin@venue.test"));
}

#[actix_web::test]
async fn unknown_status_is_rejected_with_allowed_values() {
    let app = actix_test::init_service(test_app(in_memory_state())).await;
    let cookie = login_cookie(&app).await;
    let created = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/bookings")
            .cookie(cookie.clone())
            .set_json(create_body())
            .to_request(),
    )
    .await;
    let created: BookingResponse = actix_test::read_body_json(created).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/v1/bookings/{}/status", created.id))
            .cookie(cookie)
            .set_json(json!({"status": "archived"}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["code"], "invalid_status");
    assert_eq!(body["details"]["allowed"].as_array().map(Vec::len), Some(6));
}

#[actix_web::test]
async fn overlong_customer_name_is_an_invalid_request() {
    let mut commands = MockBookingCommand::new();
    commands.expect_create_booking().never();
    let app = actix_test::init_service(test_app(state_with(
        Arc::new(commands),
        Arc::new(MockBookingQuery::new()),
    )))
    .await;
    let cookie = login_cookie(&app).await;
    let mut body = create_body();
    body["customerName"] = Value::String("n".repeat(201));

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/bookings")
            .cookie(cookie)
            .set_json(body)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], "customerName");
}

#[actix_web::test]
async fn empty_notes_body_leaves_notes_untouched() {
    let mut commands = MockBookingCommand::new();
    commands.expect_update_notes().never();
    let app = actix_test::init_service(test_app(state_with(
        Arc::new(commands),
        Arc::new(MockBookingQuery::new()),
    )))
    .await;
    let cookie = login_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/bookings/3/notes")
            .cookie(cookie)
            .set_json(json!({}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], "notes");
}

#[actix_web::test]
async fn explicit_null_clears_notes() {
    let mut commands = MockBookingCommand::new();
    commands
        .expect_update_notes()
        .withf(|request| request.booking_id.get() == 3 && request.notes.is_none())
        .times(1)
        .returning(|_| Ok(sample_booking(3, BookingStatus::Inquiry)));
    let app = actix_test::init_service(test_app(state_with(
        Arc::new(commands),
        Arc::new(MockBookingQuery::new()),
    )))
    .await;
    let cookie = login_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/bookings/3/notes")
            .cookie(cookie)
            .set_json(json!({"notes": null}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
}
