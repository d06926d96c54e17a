//! Booking HTTP handlers.
//!
//! ```text
//! POST /api/bookings
//! POST /api/bookings/verify
//! GET  /api/bookings/my
//! GET  /api/bookings/host/bookings
//! ```
//!
//! Prices are always computed server-side; any `totalPrice` a client sends is
//! ignored.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{BOOKING_CURRENCY, to_minor_units};
use crate::domain::{
    Booking, BookingRequest, DurationUnit, Error, PaymentMethod, PaymentStatus,
    PaymentVerification, PropertyId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::responses::BookingBody;
use crate::inbound::http::session::Authenticated;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_value_error, parse_optional, parse_optional_rfc3339_timestamp,
};

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateBookingRequest {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub property_id: Option<String>,
    /// RFC 3339 check-in, for hotel rooms, resorts and villas.
    #[schema(example = "2025-05-01T12:00:00Z")]
    pub from_date: Option<String>,
    /// RFC 3339 check-out.
    #[schema(example = "2025-05-03T11:00:00Z")]
    pub to_date: Option<String>,
    /// Rental length, for houses let on monthly rent.
    pub duration: Option<u32>,
    /// `months` or `years`.
    pub duration_unit: Option<String>,
    /// Defaults to 1.
    pub guests: Option<u32>,
    /// `Online` (default) or `Pay on Location`.
    pub payment_method: Option<String>,
}

impl TryFrom<CreateBookingRequest> for BookingRequest {
    type Error = Error;

    fn try_from(value: CreateBookingRequest) -> Result<Self, Self::Error> {
        let property = value
            .property_id
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| {
                PropertyId::new(raw.trim()).map_err(|_| {
                    Error::invalid_field(
                        "propertyId",
                        "invalid_uuid",
                        "propertyId must be a valid UUID",
                    )
                })
            })
            .transpose()?;
        Ok(Self {
            property,
            check_in: parse_optional_rfc3339_timestamp(
                value.from_date,
                FieldName::new("fromDate"),
            )?,
            check_out: parse_optional_rfc3339_timestamp(value.to_date, FieldName::new("toDate"))?,
            duration: value.duration,
            duration_unit: parse_optional::<DurationUnit>(value.duration_unit)?,
            guests: value.guests,
            payment_method: parse_payment_method(value.payment_method)?,
        })
    }
}

fn parse_payment_method(raw: Option<String>) -> Result<Option<PaymentMethod>, Error> {
    let Some(raw) = raw.filter(|raw| !raw.trim().is_empty()) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<PaymentMethod>()
        .map(Some)
        .map_err(|_| {
            invalid_value_error(
                FieldName::new("paymentMethod"),
                "either Online or Pay on Location",
            )
        })
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct VerifyPaymentRequest {
    pub booking_id: Option<String>,
    pub payment_id: Option<String>,
    pub order_id: Option<String>,
}

impl TryFrom<VerifyPaymentRequest> for PaymentVerification {
    type Error = Error;

    fn try_from(value: VerifyPaymentRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            value.booking_id.as_deref(),
            value.payment_id.as_deref(),
            value.order_id.as_deref(),
        )
    }
}

/// What the client needs to open the gateway checkout.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutBody {
    pub order_id: String,
    /// Amount in minor units (paise).
    #[schema(example = 900000)]
    pub amount: i64,
    #[schema(example = "INR")]
    pub currency: &'static str,
}

impl CheckoutBody {
    fn for_booking(booking: &Booking) -> Result<Option<Self>, Error> {
        let Some(order_id) = booking
            .order_id
            .clone()
            .filter(|_| booking.payment_status == PaymentStatus::Pending)
        else {
            return Ok(None);
        };
        Ok(Some(Self {
            order_id,
            amount: to_minor_units(booking.total_price)?,
            currency: BOOKING_CURRENCY,
        }))
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub booking: BookingBody,
    /// Present while an online payment is outstanding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout: Option<CheckoutBody>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentResponse {
    #[schema(example = "Payment verified and booking updated")]
    pub message: &'static str,
    pub booking: BookingBody,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookingsResponse {
    pub bookings: Vec<BookingBody>,
}

/// Book a listing. The total is computed from the listing's prices.
#[utoipa::path(
    post,
    path = "/api/bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created", body = BookingResponse),
        (status = 400, description = "Invalid booking", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Listing not found", body = Error)
    ),
    tags = ["bookings"],
    operation_id = "createBooking"
)]
#[post("")]
pub async fn create_booking(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<CreateBookingRequest>,
) -> ApiResult<HttpResponse> {
    let request = BookingRequest::try_from(payload.into_inner())?;
    let booking = state.bookings.create(caller.user_id(), request).await?;
    let checkout = CheckoutBody::for_booking(&booking)?;
    Ok(HttpResponse::Created().json(BookingResponse {
        booking: booking.into(),
        checkout,
    }))
}

/// Record a completed gateway payment and pay the host out.
#[utoipa::path(
    post,
    path = "/api/bookings/verify",
    request_body = VerifyPaymentRequest,
    responses(
        (status = 200, description = "Booking paid", body = VerifyPaymentResponse),
        (status = 400, description = "Missing identifiers or order mismatch", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Booking belongs to another guest", body = Error),
        (status = 404, description = "Booking not found", body = Error),
        (status = 409, description = "Booking already paid", body = Error)
    ),
    tags = ["bookings"],
    operation_id = "verifyPayment"
)]
#[post("/verify")]
pub async fn verify_payment(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<VerifyPaymentRequest>,
) -> ApiResult<web::Json<VerifyPaymentResponse>> {
    let verification = PaymentVerification::try_from(payload.into_inner())?;
    let booking = state
        .bookings
        .verify_payment(caller.user_id(), verification)
        .await?;
    Ok(web::Json(VerifyPaymentResponse {
        message: "Payment verified and booking updated",
        booking: booking.into(),
    }))
}

/// The caller's bookings with a summary of each listing.
#[utoipa::path(
    get,
    path = "/api/bookings/my",
    responses(
        (status = 200, description = "Caller's bookings", body = BookingsResponse),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["bookings"],
    operation_id = "myBookings"
)]
#[get("/my")]
pub async fn my_bookings(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<web::Json<BookingsResponse>> {
    let views = state.bookings.guest_bookings(caller.user_id()).await?;
    Ok(web::Json(BookingsResponse {
        bookings: views.into_iter().map(BookingBody::from).collect(),
    }))
}

/// Bookings on the caller's listings with guest contact details.
#[utoipa::path(
    get,
    path = "/api/bookings/host/bookings",
    responses(
        (status = 200, description = "Bookings on the caller's listings", body = BookingsResponse),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["bookings"],
    operation_id = "hostBookings"
)]
#[get("/host/bookings")]
pub async fn host_bookings(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<web::Json<BookingsResponse>> {
    let views = state.bookings.host_bookings(caller.user_id()).await?;
    Ok(web::Json(BookingsResponse {
        bookings: views.into_iter().map(BookingBody::from).collect(),
    }))
}
