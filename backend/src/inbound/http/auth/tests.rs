//! Tests for the account handlers.

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use mockall::predicate::eq;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::service_fixtures::user;
use crate::domain::User;
use crate::inbound::http::json_config;
use crate::inbound::http::test_utils::{MockPorts, test_session_middleware};

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
    App::new()
        .wrap(test_session_middleware())
        .app_data(web::Data::new(state))
        .app_data(json_config())
        .service(
            web::scope("/api/auth")
                .service(register)
                .service(login)
                .service(logout)
                .service(me)
                .service(update_me)
                .service(update_password)
                .service(delete_me)
                .service(link_payment_account)
                .service(start_onboarding)
                .service(onboarding_webhook),
        )
}

fn session_for(user: &User) -> AuthSession {
    AuthSession {
        user: user.clone(),
        token: format!("token-for-{}", user.id),
    }
}

async fn body_json(response: actix_web::dev::ServiceResponse) -> Value {
    let bytes = actix_test::read_body(response).await;
    serde_json::from_slice(&bytes).expect("JSON body")
}

fn session_cookie(
    response: &actix_web::dev::ServiceResponse,
) -> actix_web::cookie::Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(|cookie| cookie.into_owned())
        .expect("session cookie")
}

#[actix_web::test]
async fn register_returns_token_and_starts_a_session() {
    let asha = user("Asha Rao", "asha@example.com", false);
    let expected = asha.clone();
    let mut ports = MockPorts::new();
    ports
        .accounts
        .expect_register()
        .withf(|registration| {
            registration.email.as_ref() == "asha@example.com" && !registration.is_host
        })
        .times(1)
        .returning(move |_| Ok(session_for(&expected)));
    let current = asha.clone();
    ports
        .accounts
        .expect_current_user()
        .with(eq(asha.id))
        .returning(move |_| Ok(current.clone()));
    let app = actix_test::init_service(test_app(ports.into_state())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({
                "name": "Asha Rao",
                "email": "Asha@Example.com",
                "phone": "+91 98470 12345",
                "password": "trove#2024",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let cookie = session_cookie(&response);
    let body = body_json(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["token"], format!("token-for-{}", asha.id));
    assert_eq!(body["user"]["email"], "asha@example.com");

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/auth/me")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["user"]["id"], asha.id.to_string());
}

#[rstest]
#[case("abcdef!", "password_missing_digit")]
#[case("abcdef1", "password_missing_special")]
#[case("a1!", "password_too_short")]
#[actix_web::test]
async fn weak_passwords_are_rejected_before_the_service(
    #[case] password: &str,
    #[case] code: &str,
) {
    let ports = MockPorts::new();
    let app = actix_test::init_service(test_app(ports.into_state())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({
                "name": "Asha Rao",
                "email": "asha@example.com",
                "phone": "+91 98470 12345",
                "password": password,
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], "password");
    assert_eq!(body["details"]["code"], code);
}

#[actix_web::test]
async fn login_passes_the_requested_role() {
    let ravi = user("Ravi Kumar", "ravi@example.com", true);
    let mut ports = MockPorts::new();
    ports
        .accounts
        .expect_login()
        .withf(|credentials, role| {
            credentials.email().as_ref() == "ravi@example.com" && *role == Some(LoginRole::Guest)
        })
        .returning(move |_, _| Ok(session_for(&ravi.clone().viewed_as_host(false))));
    let app = actix_test::init_service(test_app(ports.into_state())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({
                "email": "ravi@example.com",
                "password": "Secret1!",
                "role": "guest",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["user"]["isHost"], false);
}

#[actix_web::test]
async fn login_rejects_unknown_roles() {
    let app = actix_test::init_service(test_app(MockPorts::new().into_state())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({
                "email": "ravi@example.com",
                "password": "Secret1!",
                "role": "admin",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["details"]["field"], "role");
}

#[actix_web::test]
async fn bad_credentials_are_unauthorised() {
    let mut ports = MockPorts::new();
    ports
        .accounts
        .expect_login()
        .returning(|_, _| Err(Error::unauthorized("invalid email or password")));
    let app = actix_test::init_service(test_app(ports.into_state())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": "ravi@example.com", "password": "nope" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["code"], "unauthorized");
    assert!(body.get("token").is_none());
}

#[actix_web::test]
async fn malformed_json_is_a_client_error() {
    let app = actix_test::init_service(test_app(MockPorts::new().into_state())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/auth/login")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{\"email\":")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "invalid_request");
}

#[actix_web::test]
async fn me_requires_authentication() {
    let app = actix_test::init_service(test_app(MockPorts::new().into_state())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/auth/me").to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

fn ports_with_bearer(user: &User) -> MockPorts {
    let mut ports = MockPorts::new();
    let id = user.id;
    ports.tokens.expect_verify().returning(move |_| Ok(id));
    ports
}

#[actix_web::test]
async fn update_me_ignores_blank_fields() {
    let asha = user("Asha Rao", "asha@example.com", false);
    let mut ports = ports_with_bearer(&asha);
    let updated = asha.clone();
    ports
        .accounts
        .expect_update_profile()
        .withf(|_, update| {
            update.name.is_none()
                && update.avatar.is_none()
                && update.phone.as_ref().map(|phone| phone.as_ref()) == Some("+91 90000 11111")
        })
        .returning(move |_, _| Ok(updated.clone()));
    let app = actix_test::init_service(test_app(ports.into_state())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri("/api/auth/updateMe")
            .insert_header(("Authorization", "Bearer token"))
            .set_json(json!({ "name": " ", "phone": "+91 90000 11111" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "success");
}

#[actix_web::test]
async fn update_password_validates_the_replacement() {
    let asha = user("Asha Rao", "asha@example.com", false);
    let app = actix_test::init_service(test_app(ports_with_bearer(&asha).into_state())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri("/api/auth/updatePassword")
            .insert_header(("Authorization", "Bearer token"))
            .set_json(json!({ "currentPassword": "Secret1!", "newPassword": "short" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["details"]["field"], "newPassword");
}

#[actix_web::test]
async fn delete_me_removes_the_account() {
    let asha = user("Asha Rao", "asha@example.com", false);
    let mut ports = ports_with_bearer(&asha);
    ports
        .accounts
        .expect_delete_account()
        .with(eq(asha.id))
        .times(1)
        .returning(|_| Ok(()));
    let app = actix_test::init_service(test_app(ports.into_state())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri("/api/auth/deleteMe")
            .insert_header(("Authorization", "Bearer token"))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["message"],
        "Account deleted successfully"
    );
}

#[actix_web::test]
async fn payment_account_is_required() {
    let asha = user("Asha Rao", "asha@example.com", false);
    let app = actix_test::init_service(test_app(ports_with_bearer(&asha).into_state())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/auth/payment-account")
            .insert_header(("Authorization", "Bearer token"))
            .set_json(json!({}))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["details"]["field"], "paymentAccountId");
    assert_eq!(body["details"]["code"], "missing_field");
}

#[actix_web::test]
async fn onboarding_returns_the_gateway_link() {
    let asha = user("Asha Rao", "asha@example.com", false);
    let mut ports = ports_with_bearer(&asha);
    ports
        .accounts
        .expect_start_onboarding()
        .withf(|_, business, phone| business == "Sea Breeze Stays" && phone.is_none())
        .returning(|_, _, _| Ok("https://pay.example/onboard/abc".to_owned()));
    let app = actix_test::init_service(test_app(ports.into_state())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/auth/payment-onboarding")
            .insert_header(("Authorization", "Bearer token"))
            .set_json(json!({ "businessName": " Sea Breeze Stays " }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["onboardingUrl"],
        "https://pay.example/onboard/abc"
    );
}

fn webhook_request(secret: Option<&str>, merchant: &str) -> actix_test::TestRequest {
    let request = actix_test::TestRequest::post()
        .uri("/api/auth/webhook/payment-onboarding")
        .set_json(json!({ "merchant": merchant, "paymentAccountId": "acc_asha" }));
    match secret {
        Some(secret) => request.insert_header((WEBHOOK_SECRET_HEADER, secret)),
        None => request,
    }
}

#[rstest]
#[case(None)]
#[case(Some("wrong"))]
#[actix_web::test]
async fn webhook_requires_the_configured_secret(#[case] secret: Option<&str>) {
    let state = MockPorts::new()
        .into_state()
        .with_webhook_secret(Some("hook-secret".to_owned()));
    let app = actix_test::init_service(test_app(state)).await;

    let merchant = user("Asha Rao", "asha@example.com", false).id.to_string();
    let response =
        actix_test::call_service(&app, webhook_request(secret, &merchant).to_request()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn webhook_links_the_merchant_account() {
    let asha = user("Asha Rao", "asha@example.com", false);
    let merchant_id = asha.id;
    let mut ports = MockPorts::new();
    let onboarded = asha.clone();
    ports
        .accounts
        .expect_complete_onboarding()
        .withf(move |merchant, account| *merchant == merchant_id && account.as_ref() == "acc_asha")
        .times(1)
        .returning(move |_, _| Ok(onboarded.clone()));
    let state = ports
        .into_state()
        .with_webhook_secret(Some("hook-secret".to_owned()));
    let app = actix_test::init_service(test_app(state)).await;

    let merchant = asha.id.to_string();
    let response = actix_test::call_service(
        &app,
        webhook_request(Some("hook-secret"), &merchant).to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[actix_web::test]
async fn webhook_is_refused_when_no_secret_is_configured() {
    let app = actix_test::init_service(test_app(MockPorts::new().into_state())).await;

    let merchant = user("Asha Rao", "asha@example.com", false).id.to_string();
    for secret in [None, Some(""), Some("hook-secret")] {
        let response =
            actix_test::call_service(&app, webhook_request(secret, &merchant).to_request()).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "secret = {secret:?}");
    }
}

#[rstest]
#[case("hook-secret", "hook-secret", true)]
#[case("hook-secreT", "hook-secret", false)]
#[case("hook-secret-and-more", "hook-secret", false)]
#[case("", "hook-secret", false)]
fn webhook_secrets_compare_by_value(
    #[case] presented: &str,
    #[case] expected: &str,
    #[case] matches: bool,
) {
    assert_eq!(secrets_match(presented, expected), matches);
}

#[actix_web::test]
async fn webhook_rejects_malformed_merchant_ids() {
    let state = MockPorts::new()
        .into_state()
        .with_webhook_secret(Some("hook-secret".to_owned()));
    let app = actix_test::init_service(test_app(state)).await;

    let response = actix_test::call_service(
        &app,
        webhook_request(Some("hook-secret"), "merchant-42").to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], "merchant");
}
