//! Admin login and logout handlers.
//!
//! ```text
//! POST /api/v1/login {"email":"admin@venue.test","password":"password"}
//! POST /api/v1/logout
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::domain::{Error, LoginCredentials, LoginValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body for `POST /api/v1/login`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

fn map_login_validation_error(err: &LoginValidationError) -> Error {
    let (field, code) = match err {
        LoginValidationError::EmptyEmail => ("email", "empty_email"),
        LoginValidationError::EmptyPassword => ("password", "empty_password"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

/// Authenticate the admin and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error")
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from(payload.into_inner())
        .map_err(|err| map_login_validation_error(&err))?;
    let actor = state.login.authenticate(&credentials).await?;
    session.persist_actor(&actor)?;
    info!(actor = %actor, "admin logged in");
    Ok(HttpResponse::Ok().finish())
}

/// End the current session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses(
        (status = 204, description = "Session cleared")
    ),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::Value;

    use crate::domain::ActorEmail;
    use crate::domain::ports::{
        FixtureLoginService, LoginService, MockBookingCommand, MockBookingQuery, MockLoginService,
    };
    use crate::inbound::http::state::HttpStatePorts;
    use crate::inbound::http::test_utils::{SESSION_COOKIE, test_session_middleware};

    fn state_with(login_port: Arc<dyn LoginService>) -> HttpState {
        HttpState::new(HttpStatePorts {
            login: login_port,
            booking_commands: Arc::new(MockBookingCommand::new()),
            booking_queries: Arc::new(MockBookingQuery::new()),
        })
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
                .service(logout),
        )
    }

    fn login_request(email: &str, password: &str) -> actix_http::Request {
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(LoginRequest {
                email: email.to_owned(),
                password: password.to_owned(),
            })
            .to_request()
    }

    #[actix_web::test]
    async fn fixture_credentials_set_session_cookie() {
        let app = actix_test::init_service(test_app(state_with(Arc::new(FixtureLoginService)))).await;

        let res = actix_test::call_service(&app, login_request("admin@venue.test", "password")).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert!(
            res.response()
                .cookies()
                .any(|cookie| cookie.name() == SESSION_COOKIE)
        );
    }

    #[actix_web::test]
    async fn wrong_password_is_unauthorised() {
        let app = actix_test::init_service(test_app(state_with(Arc::new(FixtureLoginService)))).await;

        let res = actix_test::call_service(&app, login_request("admin@venue.test", "nope")).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[case("  ", "password", "email", "empty_email")]
    #[case("admin@venue.test", "", "password", "empty_password")]
    #[actix_web::test]
    async fn blank_fields_are_rejected_before_authentication(
        #[case] email: &str,
        #[case] password: &str,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let mut mock = MockLoginService::new();
        mock.expect_authenticate().never();
        let app = actix_test::init_service(test_app(state_with(Arc::new(mock)))).await;

        let res = actix_test::call_service(&app, login_request(email, password)).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["code"], "invalid_request");
        assert_eq!(body["details"]["field"], field);
        assert_eq!(body["details"]["code"], code);
    }

    #[actix_web::test]
    async fn login_passes_normalised_email_to_port() {
        let mut mock = MockLoginService::new();
        mock.expect_authenticate()
            .withf(|creds| creds.email() == "admin@venue.test")
            .times(1)
            .returning(|creds| Ok(ActorEmail::new(creds.email()).expect("valid email")));
        let app = actix_test::init_service(test_app(state_with(Arc::new(mock)))).await;

        let res = actix_test::call_service(&app, login_request(" Admin@Venue.TEST ", "pw")).await;

        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn logout_returns_no_content() {
        let app = actix_test::init_service(test_app(state_with(Arc::new(FixtureLoginService)))).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post().uri("/api/v1/logout").to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }
}
