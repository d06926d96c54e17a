//! In-memory application harness for end-to-end HTTP flows.
//!
//! Wires the real services over the in-memory store, Argon2 hashing, JWT
//! tokens, the simulated payment gateway and fixture media URLs, so a test
//! exercises the same stack the server runs without a database.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::Key;
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use mockable::{Clock, DefaultClock};
use serde_json::{Value, json};
use url::Url;

use traveltrove::Trace;
use traveltrove::domain::ports::{
    BookingRepository, MediaStore, PaymentGateway, PropertyRepository, TokenIssuer,
    UserRepository,
};
use traveltrove::domain::{AccountServiceImpl, BookingServiceImpl, ListingServiceImpl};
use traveltrove::inbound::http::state::HttpState;
use traveltrove::inbound::http::{auth_scope, bookings_scope, json_config, properties_scope};
use traveltrove::outbound::media::FixtureMediaStore;
use traveltrove::outbound::memory::MemoryStore;
use traveltrove::outbound::payments::SimulatedPaymentGateway;
use traveltrove::outbound::security::{Argon2PasswordHasher, JwtTokenIssuer};

pub const WEBHOOK_SECRET: &str = "integration-webhook-secret";

fn url(raw: &str) -> Url {
    Url::parse(raw).expect("static test URL")
}

fn state() -> HttpState {
    let store = MemoryStore::new();
    let users: Arc<dyn UserRepository> = Arc::new(store.users());
    let properties: Arc<dyn PropertyRepository> = Arc::new(store.properties());
    let bookings: Arc<dyn BookingRepository> = Arc::new(store.bookings());
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let payments: Arc<dyn PaymentGateway> = Arc::new(SimulatedPaymentGateway::new(url(
        "https://gateway.example/onboard",
    )));
    let media: Arc<dyn MediaStore> =
        Arc::new(FixtureMediaStore::new(url("https://media.example/")));
    let tokens: Arc<dyn TokenIssuer> = Arc::new(JwtTokenIssuer::new(
        b"integration-secret-integration-secret",
        chrono::Duration::days(1),
        clock.clone(),
    ));

    let accounts = Arc::new(AccountServiceImpl::new(
        users.clone(),
        Arc::new(Argon2PasswordHasher::new()),
        tokens.clone(),
        payments.clone(),
        clock.clone(),
    ));
    let listings = Arc::new(ListingServiceImpl::new(
        properties.clone(),
        users.clone(),
        media,
        clock.clone(),
    ));
    let booking_service = Arc::new(BookingServiceImpl::new(
        bookings, properties, users, payments, clock,
    ));
    HttpState::new(accounts, listings, booking_service, tokens)
        .with_webhook_secret(Some(WEBHOOK_SECRET.to_owned()))
}

/// The public API over a fresh in-memory store.
pub fn marketplace_app() -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();
    App::new()
        .app_data(web::Data::new(state()))
        .app_data(json_config())
        .wrap(session)
        .wrap(Trace)
        .service(auth_scope())
        .service(properties_scope())
        .service(bookings_scope())
}

/// Send `request` and decode the JSON reply.
pub async fn send<S, B>(app: &S, request: actix_test::TestRequest) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let response = actix_test::call_service(app, request.to_request()).await;
    let status = response.status();
    let bytes = actix_test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    (status, body)
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

pub fn registration(name: &str, email: &str, is_host: bool) -> Value {
    json!({
        "name": name,
        "email": email,
        "phone": "+91 98470 12345",
        "password": "trove#2024",
        "isHost": is_host,
    })
}

/// Register an account and return its bearer token and user id.
pub async fn register<S, B>(app: &S, name: &str, email: &str, is_host: bool) -> (String, String)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = send(
        app,
        actix_test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(registration(name, email, is_host)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "registration failed: {body}");
    let token = body["token"].as_str().expect("token").to_owned();
    let id = body["user"]["id"].as_str().expect("user id").to_owned();
    (token, id)
}
