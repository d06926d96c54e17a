//! Bookings and their payment lifecycle.
//!
//! A booking starts as [`PaymentStatus::Pending`] when an online order was
//! created, or [`PaymentStatus::PayOnLocation`] when the guest chose to pay
//! at the property or the gateway could not be reached. Only an explicit
//! verification moves it to [`PaymentStatus::Paid`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::Error;
use super::property::{PropertyId, PropertySummary};
use super::user::{EmailAddress, PersonName, PhoneNumber, UserId};

/// Booking identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(Uuid);

impl BookingId {
    pub fn new(id: impl AsRef<str>) -> Result<Self, Error> {
        Uuid::parse_str(id.as_ref()).map(Self).map_err(|_| {
            Error::invalid_field("bookingId", "invalid_id", "booking id must be a valid UUID")
        })
    }

    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Settlement state of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum PaymentStatus {
    Pending,
    Paid,
    #[serde(rename = "Pay on Location")]
    PayOnLocation,
}

/// How the guest pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum PaymentMethod {
    Online,
    #[serde(rename = "Pay on Location")]
    PayOnLocation,
}

macro_rules! impl_labels {
    ($ty:ident { $($variant:ident => $label:literal),* $(,)? }) => {
        impl $ty {
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)*
                }
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok(Self::$variant),)*
                    other => Err(Error::internal(format!(
                        concat!("unknown ", stringify!($ty), " '{}'"),
                        other
                    ))),
                }
            }
        }
    };
}

impl_labels!(PaymentStatus {
    Pending => "Pending",
    Paid => "Paid",
    PayOnLocation => "Pay on Location",
});

impl_labels!(PaymentMethod {
    Online => "Online",
    PayOnLocation => "Pay on Location",
});

/// Unit of a rental duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    Months,
    Years,
}

impl DurationUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Months => "months",
            Self::Years => "years",
        }
    }
}

impl FromStr for DurationUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "months" | "month" => Ok(Self::Months),
            "years" | "year" => Ok(Self::Years),
            _ => Err(Error::invalid_field(
                "durationUnit",
                "invalid_duration_unit",
                "durationUnit must be months or years",
            )),
        }
    }
}

/// What the guest is booking: nights between two instants, or a rental
/// duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StayTerm {
    Dates {
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
    },
    Duration {
        length: u32,
        unit: DurationUnit,
    },
}

/// A guest's reservation.
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub id: BookingId,
    pub guest: UserId,
    pub property: PropertyId,
    pub term: StayTerm,
    pub guests: u32,
    pub total_price: Decimal,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub order_id: Option<String>,
    pub payment_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Record a confirmed payment.
    pub fn mark_paid(&mut self, payment_id: String, order_id: String, now: DateTime<Utc>) {
        self.payment_status = PaymentStatus::Paid;
        self.payment_id = Some(payment_id);
        self.order_id = Some(order_id);
        self.updated_at = now;
    }
}

/// Booking request as accepted from a guest. Dates and duration are both
/// optional here; which one is required depends on the property type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingRequest {
    pub property: Option<PropertyId>,
    pub check_in: Option<DateTime<Utc>>,
    pub check_out: Option<DateTime<Utc>>,
    pub duration: Option<u32>,
    pub duration_unit: Option<DurationUnit>,
    pub guests: Option<u32>,
    pub payment_method: Option<PaymentMethod>,
}

/// Proof of payment reported by the client after checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentVerification {
    pub booking: BookingId,
    pub payment_id: String,
    pub order_id: String,
}

impl PaymentVerification {
    /// All three identifiers are required.
    pub fn try_from_parts(
        booking: Option<&str>,
        payment_id: Option<&str>,
        order_id: Option<&str>,
    ) -> Result<Self, Error> {
        let booking = required("bookingId", booking)?;
        let payment_id = required("paymentId", payment_id)?;
        let order_id = required("orderId", order_id)?;
        Ok(Self {
            booking: BookingId::new(booking)?,
            payment_id: payment_id.to_owned(),
            order_id: order_id.to_owned(),
        })
    }
}

fn required<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, Error> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            Error::invalid_field(field, "missing_field", format!("{field} is required"))
        })
}

/// Contact details shown to a host for each booking on their listings.
#[derive(Debug, Clone, PartialEq)]
pub struct GuestContact {
    pub id: UserId,
    pub name: PersonName,
    pub email: EmailAddress,
    pub phone: PhoneNumber,
}

/// Booking enriched for display.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingView {
    pub booking: Booking,
    pub property: Option<PropertySummary>,
    pub guest: Option<GuestContact>,
}
