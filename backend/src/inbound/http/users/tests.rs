//! Tests for identity API handlers.

use super::*;
use crate::domain::ports::{MockLoginService, MockRegistrationService};
use crate::domain::{Email, Error, FullName, IssuedToken, UserId};
use crate::inbound::http::json_config;
use crate::inbound::http::test_utils::state_with;
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use chrono::TimeZone;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use std::sync::Arc;

#[fixture]
fn rey() -> User {
    User::new(
        UserId::random(),
        Email::new("rey@jakku.example").expect("email"),
        FullName::new("Rey").expect("name"),
        [RoleName::User],
    )
}

fn registration_service(user: User) -> MockRegistrationService {
    let mut registration = MockRegistrationService::new();
    registration
        .expect_register()
        .returning(move |request| {
            if request.email().as_ref() == "taken@jakku.example" {
                Err(Error::conflict("email already registered"))
            } else {
                Ok(user.clone())
            }
        });
    registration
}

async fn post_json(
    path: &str,
    body: Value,
    configure: impl FnOnce(&mut crate::inbound::http::state::HttpStatePorts),
) -> (StatusCode, Value) {
    let state = state_with(configure);
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .app_data(json_config())
            .service(web::scope("/api/v1").service(register).service(login)),
    )
    .await;
    let request = actix_test::TestRequest::post()
        .uri(path)
        .set_json(body)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    let status = response.status();
    let bytes = actix_test::read_body(response).await;
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[rstest]
#[actix_web::test]
async fn register_returns_created_profile_without_secrets(rey: User) {
    let (status, body) = post_json(
        "/api/v1/auth/register",
        json!({
            "email": "Rey@Jakku.example",
            "password": "Scavenger1",
            "fullName": "Rey",
            "roles": ["user"],
        }),
        |ports| ports.registration = Arc::new(registration_service(rey.clone())),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "rey@jakku.example");
    assert_eq!(body["fullName"], "Rey");
    assert_eq!(body["roles"], json!(["user"]));
    assert!(body.get("password").is_none());
    assert!(body.get("passwordHash").is_none());
}

#[rstest]
#[case(json!(["jedi"]), "roles")]
#[case(json!([]), "roles")]
#[actix_web::test]
async fn register_rejects_unknown_roles(#[case] roles: Value, #[case] field: &str) {
    let (status, body) = post_json(
        "/api/v1/auth/register",
        json!({
            "email": "finn@jakku.example",
            "password": "Stormtrooper2187",
            "fullName": "Finn",
            "roles": roles,
        }),
        |_| {},
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], field);
}

#[rstest]
#[actix_web::test]
async fn register_reports_duplicate_email_as_conflict(rey: User) {
    let (status, body) = post_json(
        "/api/v1/auth/register",
        json!({
            "email": "taken@jakku.example",
            "password": "Scavenger1",
            "fullName": "Rey",
            "roles": ["user"],
        }),
        |ports| ports.registration = Arc::new(registration_service(rey.clone())),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "conflict");
}

#[rstest]
#[actix_web::test]
async fn malformed_json_is_an_invalid_request() {
    let (status, body) = post_json(
        "/api/v1/auth/register",
        json!({ "email": "rey@jakku.example" }),
        |_| {},
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
}

#[rstest]
#[actix_web::test]
async fn login_returns_bearer_token(rey: User) {
    let expires_at = Utc
        .with_ymd_and_hms(2026, 5, 4, 14, 0, 0)
        .single()
        .expect("valid instant");
    let mut service = MockLoginService::new();
    service.expect_login().returning(move |_| {
        Ok(LoginOutcome {
            user: rey.clone(),
            token: IssuedToken {
                token: "signed.jwt.token".to_owned(),
                expires_at,
            },
        })
    });

    let (status, body) = post_json(
        "/api/v1/auth/login",
        json!({ "email": "rey@jakku.example", "password": "Scavenger1" }),
        |ports| ports.login = Arc::new(service),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["accessToken"], "signed.jwt.token");
    assert_eq!(body["tokenType"], "Bearer");
    assert_eq!(body["user"]["email"], "rey@jakku.example");
    assert!(body["user"].get("passwordHash").is_none());
}

#[rstest]
#[case("", "Scavenger1", "email")]
#[case("rey@jakku.example", "", "password")]
#[actix_web::test]
async fn login_rejects_blank_fields(
    #[case] email: &str,
    #[case] password: &str,
    #[case] field: &str,
) {
    let (status, body) = post_json(
        "/api/v1/auth/login",
        json!({ "email": email, "password": password }),
        |_| {},
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], field);
    assert_eq!(body["details"]["code"], "missing_field");
}

#[rstest]
#[actix_web::test]
async fn failed_logins_are_unauthorized() {
    let mut service = MockLoginService::new();
    service
        .expect_login()
        .returning(|_| Err(Error::unauthorized("invalid credentials")));

    let (status, body) = post_json(
        "/api/v1/auth/login",
        json!({ "email": "nobody@jakku.example", "password": "Whatever1" }),
        |ports| ports.login = Arc::new(service),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "invalid credentials");
}
