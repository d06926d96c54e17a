//! Tests for listing body parsing.

use actix_web::test::TestRequest;
use rstest::rstest;
use rust_decimal::Decimal;
use serde_json::json;

use super::*;

const BOUNDARY: &str = "trove-boundary";

enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a str),
}

fn multipart_body(parts: &[Part<'_>]) -> Bytes {
    let mut body = String::new();
    for part in parts {
        body.push_str(&format!("--{BOUNDARY}\r\n"));
        match part {
            Part::Text(name, value) => {
                body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                ));
            }
            Part::File(name, file_name, content_type) => {
                body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                     Content-Type: {content_type}\r\n\r\nPIXELS\r\n"
                ));
            }
        }
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    Bytes::from(body)
}

fn multipart_request() -> HttpRequest {
    TestRequest::post()
        .insert_header((
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .to_http_request()
}

fn json_request() -> HttpRequest {
    TestRequest::post()
        .insert_header((CONTENT_TYPE, "application/json"))
        .to_http_request()
}

#[actix_web::test]
async fn json_bodies_map_to_property_fields() {
    let body = json!({
        "name": "Sea Breeze",
        "type": "House for Rent",
        "rentalType": "Lease",
        "leasePrice": 250000,
        "advanceAmount": "50000.50",
        "leaseTimeLimit": 11,
        "facilities": ["Parking"],
    });
    let form = read_listing_form(&json_request(), Bytes::from(body.to_string()))
        .await
        .expect("valid JSON listing");

    assert_eq!(form.fields.kind, Some(PropertyType::HouseForRent));
    assert_eq!(form.fields.rental_type, Some(RentalType::Lease));
    assert_eq!(form.fields.lease_price, Some(Decimal::new(250_000, 0)));
    assert_eq!(form.fields.advance_amount, Some(Decimal::new(5_000_050, 2)));
    assert_eq!(form.fields.lease_time_limit, Some(11));
    assert!(form.uploads.is_empty());
}

#[actix_web::test]
async fn unknown_property_type_names_the_field() {
    let body = json!({ "name": "Sea Breeze", "type": "Castle" });
    let err = read_listing_form(&json_request(), Bytes::from(body.to_string()))
        .await
        .expect_err("unknown type");

    let details = err.details().expect("details");
    assert_eq!(details["field"], "type");
    assert_eq!(details["code"], "unknown_type");
}

#[actix_web::test]
async fn multipart_text_and_files_are_collected() {
    let body = multipart_body(&[
        Part::Text("name", "Sea Breeze"),
        Part::Text("type", "Villa"),
        Part::Text("pricePerDay", "4500"),
        Part::Text("maxGuests", "4"),
        Part::Text("available", "false"),
        Part::Text("facilities", "[\"Pool\",\"Wifi\"]"),
        Part::Text("facilities", "Parking"),
        Part::Text("bedrooms", ""),
        Part::File("images", "front.jpg", "image/jpeg"),
        Part::File("images", "pool.png", "image/png"),
    ]);
    let form = read_listing_form(&multipart_request(), body)
        .await
        .expect("valid multipart listing");

    assert_eq!(form.fields.name.as_deref(), Some("Sea Breeze"));
    assert_eq!(form.fields.kind, Some(PropertyType::Villa));
    assert_eq!(form.fields.price_per_day, Some(Decimal::new(4500, 0)));
    assert_eq!(form.fields.max_guests, Some(4));
    assert_eq!(form.fields.available, Some(false));
    assert_eq!(form.fields.bedrooms, None);
    assert_eq!(
        form.fields.facilities,
        Some(vec!["Pool".to_owned(), "Wifi".to_owned(), "Parking".to_owned()])
    );
    assert_eq!(form.uploads.len(), 2);
    assert_eq!(form.uploads[0].file_name, "front.jpg");
    assert_eq!(form.uploads[1].content_type.as_deref(), Some("image/png"));
    assert_eq!(form.uploads[1].bytes, b"PIXELS");
}

#[actix_web::test]
async fn more_than_ten_files_are_rejected() {
    let parts: Vec<Part<'_>> = (0..=MAX_LISTING_UPLOADS)
        .map(|_| Part::File("images", "room.jpg", "image/jpeg"))
        .collect();
    let err = read_listing_form(&multipart_request(), multipart_body(&parts))
        .await
        .expect_err("too many files");

    assert_eq!(err.details().expect("details")["code"], "too_many_images");
}

#[rstest]
#[case(Part::Text("maxGuests", "four"), "maxGuests", "invalid_value")]
#[case(Part::Text("facilities", "[1, 2]"), "facilities", "invalid_value")]
#[case(Part::File("avatar", "me.jpg", "image/jpeg"), "avatar", "unexpected_file")]
#[actix_web::test]
async fn malformed_parts_name_the_field(
    #[case] part: Part<'static>,
    #[case] field: &str,
    #[case] code: &str,
) {
    let err = read_listing_form(&multipart_request(), multipart_body(&[part]))
        .await
        .expect_err("malformed part");

    let details = err.details().expect("details");
    assert_eq!(details["field"], field);
    assert_eq!(details["code"], code);
}

#[actix_web::test]
async fn missing_boundary_is_a_client_error() {
    let req = TestRequest::post()
        .insert_header((CONTENT_TYPE, "multipart/form-data"))
        .to_http_request();
    let err = read_listing_form(&req, Bytes::from_static(b"irrelevant"))
        .await
        .expect_err("no boundary");

    assert_eq!(err.code(), crate::domain::ErrorCode::InvalidRequest);
}
