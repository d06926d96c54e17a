//! End-to-end listing and booking flows over the in-memory stack.

// Shared harness; each suite uses a subset of its helpers.
#[allow(dead_code)]
#[path = "support/app.rs"]
mod app;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use serde_json::{Value, json};

use app::{bearer, marketplace_app, register, send};

fn villa_listing() -> Value {
    json!({
        "name": "Sea Breeze",
        "type": "Villa",
        "state": "Goa",
        "city": "Panaji",
        "address": "12 Miramar Road",
        "pricePerDay": 4500,
        "maxGuests": 4,
        "facilities": ["pool", "wifi"],
        "images": (1..=5)
            .map(|n| format!("https://img.example/sea-breeze-{n}.jpg"))
            .collect::<Vec<_>>(),
    })
}

/// A host with a payout account and one complete villa listing.
async fn hosted_villa<S, B>(app: &S) -> (String, String)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (host_token, _) = register(app, "Meera Host", "meera@example.com", true).await;
    let (status, _) = send(
        app,
        actix_test::TestRequest::post()
            .uri("/api/auth/payment-account")
            .insert_header(bearer(&host_token))
            .set_json(json!({ "paymentAccountId": "acc_Nv1mS2x8QwErTy" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        app,
        actix_test::TestRequest::post()
            .uri("/api/properties")
            .insert_header(bearer(&host_token))
            .set_json(villa_listing()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "listing creation failed: {body}");
    assert_eq!(body["property"]["completionStatus"]["complete"], true);
    let property_id = body["property"]["id"].as_str().expect("property id").to_owned();
    (host_token, property_id)
}

fn two_night_stay(property_id: &str) -> Value {
    json!({
        "propertyId": property_id,
        "fromDate": "2030-05-01T12:00:00Z",
        "toDate": "2030-05-03T11:00:00Z",
        "guests": 2,
        // Ignored: the server prices the stay itself.
        "totalPrice": 1,
    })
}

#[actix_web::test]
async fn guest_books_and_pays_for_a_villa() {
    let app = actix_test::init_service(marketplace_app()).await;
    let (host_token, property_id) = hosted_villa(&app).await;
    let (guest_token, guest_id) = register(&app, "Ravi Guest", "ravi@example.com", false).await;

    let (status, body) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/bookings")
            .insert_header(bearer(&guest_token))
            .set_json(two_night_stay(&property_id)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["booking"]["paymentStatus"], "Pending");
    assert_eq!(body["booking"]["paymentMethod"], "Online");
    assert_eq!(body["checkout"]["amount"], 900_000);
    assert_eq!(body["checkout"]["currency"], "INR");
    let booking_id = body["booking"]["id"].as_str().expect("booking id").to_owned();
    let order_id = body["checkout"]["orderId"].as_str().expect("order id").to_owned();
    assert_eq!(body["booking"]["orderId"], order_id.as_str());

    let verify = || {
        actix_test::TestRequest::post()
            .uri("/api/bookings/verify")
            .insert_header(bearer(&guest_token))
            .set_json(json!({
                "bookingId": booking_id,
                "paymentId": "pay_29QQoUBi66xm2f",
                "orderId": order_id,
            }))
    };
    let (status, body) = send(&app, verify()).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["booking"]["paymentStatus"], "Paid");
    assert_eq!(body["booking"]["paymentId"], "pay_29QQoUBi66xm2f");

    let (status, _) = send(&app, verify()).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/bookings/host/bookings")
            .insert_header(bearer(&host_token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let bookings = body["bookings"].as_array().expect("bookings");
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0]["guest"]["id"], guest_id.as_str());
    assert_eq!(bookings[0]["guest"]["email"], "ravi@example.com");
}

#[actix_web::test]
async fn pay_on_location_skips_checkout() {
    let app = actix_test::init_service(marketplace_app()).await;
    let (_, property_id) = hosted_villa(&app).await;
    let (guest_token, _) = register(&app, "Ravi Guest", "ravi@example.com", false).await;

    let mut request = two_night_stay(&property_id);
    request["paymentMethod"] = json!("Pay on Location");
    let (status, body) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/bookings")
            .insert_header(bearer(&guest_token))
            .set_json(request),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["booking"]["paymentStatus"], "Pay on Location");
    assert!(body.get("checkout").is_none());

    let (_, mine) = send(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/bookings/my")
            .insert_header(bearer(&guest_token)),
    )
    .await;
    assert_eq!(mine["bookings"][0]["property"]["name"], "Sea Breeze");
}

#[actix_web::test]
async fn another_guest_cannot_verify_the_booking() {
    let app = actix_test::init_service(marketplace_app()).await;
    let (_, property_id) = hosted_villa(&app).await;
    let (guest_token, _) = register(&app, "Ravi Guest", "ravi@example.com", false).await;
    let (intruder_token, _) = register(&app, "Nosy", "nosy@example.com", false).await;

    let (_, body) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/bookings")
            .insert_header(bearer(&guest_token))
            .set_json(two_night_stay(&property_id)),
    )
    .await;

    let (status, _) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/bookings/verify")
            .insert_header(bearer(&intruder_token))
            .set_json(json!({
                "bookingId": body["booking"]["id"],
                "paymentId": "pay_29QQoUBi66xm2f",
                "orderId": body["checkout"]["orderId"],
            })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn too_many_guests_are_refused() {
    let app = actix_test::init_service(marketplace_app()).await;
    let (_, property_id) = hosted_villa(&app).await;
    let (guest_token, _) = register(&app, "Ravi Guest", "ravi@example.com", false).await;

    let mut request = two_night_stay(&property_id);
    request["guests"] = json!(9);
    let (status, body) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/bookings")
            .insert_header(bearer(&guest_token))
            .set_json(request),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
}

#[actix_web::test]
async fn guests_cannot_create_listings() {
    let app = actix_test::init_service(marketplace_app()).await;
    let (guest_token, _) = register(&app, "Ravi Guest", "ravi@example.com", false).await;

    let (status, _) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/properties")
            .insert_header(bearer(&guest_token))
            .set_json(villa_listing()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn public_search_filters_by_city_and_type() {
    let app = actix_test::init_service(marketplace_app()).await;
    let (_, property_id) = hosted_villa(&app).await;

    let search = |uri: &str| actix_test::TestRequest::get().uri(uri);
    let (status, body) = send(&app, search("/api/properties?city=Panaji&type=Villa")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["properties"][0]["id"], property_id.as_str());

    let (_, body) = send(&app, search("/api/properties?city=Margao")).await;
    assert_eq!(body["properties"].as_array().map(Vec::len), Some(0));

    let (status, _) = send(&app, search("/api/properties?type=Castle")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, search(&format!("/api/properties/{property_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["property"]["host"]["name"], "Meera Host");
}

#[actix_web::test]
async fn deleting_the_host_removes_their_listings() {
    let app = actix_test::init_service(marketplace_app()).await;
    let (host_token, property_id) = hosted_villa(&app).await;

    let (status, _) = send(
        &app,
        actix_test::TestRequest::delete()
            .uri("/api/auth/deleteMe")
            .insert_header(bearer(&host_token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        actix_test::TestRequest::get().uri(&format!("/api/properties/{property_id}")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
