//! JSON bodies returned by the marketplace endpoints.
//!
//! Domain aggregates stay free of wire concerns; these types flatten them into
//! the camelCase shapes clients consume. Money is emitted as JSON numbers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ports::ListingView;
use crate::domain::{
    Booking, BookingView, CompletionStatus, DurationUnit, GuestContact, HostSummary,
    PaymentMethod, PaymentStatus, Property, PropertySummary, PropertyType, RentalType, StayTerm,
    User,
};

/// Public account representation. The password hash never leaves the domain.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserBody {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    #[schema(example = "Asha Rao")]
    pub name: String,
    #[schema(example = "asha@example.com")]
    pub email: String,
    #[schema(example = "+91 98470 12345")]
    pub phone: String,
    pub avatar: Option<String>,
    pub is_host: bool,
    pub payment_account_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserBody {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.to_string(),
            email: user.email.to_string(),
            phone: user.phone.to_string(),
            avatar: user.avatar.map(|url| url.to_string()),
            is_host: user.is_host,
            payment_account_id: user.payment_account.map(|id| id.to_string()),
            created_at: user.created_at,
        }
    }
}

/// Which parts of a listing are ready for guests.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletionBody {
    pub basic_info: bool,
    pub images: bool,
    pub pricing: bool,
    pub payment_account: bool,
    pub complete: bool,
}

impl From<CompletionStatus> for CompletionBody {
    fn from(status: CompletionStatus) -> Self {
        Self {
            basic_info: status.basic_info,
            images: status.images,
            pricing: status.pricing,
            payment_account: status.payment_account,
            complete: status.complete,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HostBody {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
}

impl From<HostSummary> for HostBody {
    fn from(host: HostSummary) -> Self {
        Self {
            id: host.id.to_string(),
            name: host.name.to_string(),
            email: host.email.to_string(),
            avatar: host.avatar.map(|url| url.to_string()),
        }
    }
}

/// A listing with its type-dependent price fields flattened.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PropertyBody {
    pub id: String,
    /// Owner's user id.
    pub host_id: String,
    #[serde(rename = "type")]
    pub kind: PropertyType,
    pub name: String,
    pub state: String,
    pub city: String,
    pub address: String,
    pub gps_url: Option<String>,
    pub opening_time: Option<String>,
    pub closing_time: Option<String>,
    #[serde(with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>, example = 4500.0)]
    pub price_per_day: Option<Decimal>,
    pub rental_type: Option<RentalType>,
    #[serde(with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub monthly_price: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub lease_price: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub advance_amount: Option<Decimal>,
    /// Lease term in months.
    pub lease_time_limit: Option<u32>,
    pub max_guests: Option<u32>,
    pub bedrooms: Option<u32>,
    pub facilities: Vec<String>,
    pub images: Vec<String>,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_status: Option<CompletionBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<HostBody>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Property> for PropertyBody {
    fn from(property: Property) -> Self {
        let Property {
            id,
            host,
            kind,
            name,
            location,
            opening_time,
            closing_time,
            pricing,
            max_guests,
            bedrooms,
            facilities,
            images,
            available,
            created_at,
            updated_at,
        } = property;
        Self {
            id: id.to_string(),
            host_id: host.to_string(),
            kind,
            name,
            state: location.state,
            city: location.city,
            address: location.address,
            gps_url: location.gps_url,
            opening_time,
            closing_time,
            price_per_day: pricing.price_per_day,
            rental_type: pricing.rental_type,
            monthly_price: pricing.monthly_price,
            lease_price: pricing.lease_price,
            advance_amount: pricing.advance_amount,
            lease_time_limit: pricing.lease_time_limit,
            max_guests,
            bedrooms,
            facilities,
            images,
            available,
            completion_status: None,
            host: None,
            created_at,
            updated_at,
        }
    }
}

impl From<ListingView> for PropertyBody {
    fn from(view: ListingView) -> Self {
        let mut body = Self::from(view.property);
        body.completion_status = Some(view.completion.into());
        body.host = view.host.map(HostBody::from);
        body
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PropertySummaryBody {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PropertyType,
    pub city: String,
    pub state: String,
    pub cover_image: Option<String>,
}

impl From<PropertySummary> for PropertySummaryBody {
    fn from(summary: PropertySummary) -> Self {
        Self {
            id: summary.id.to_string(),
            name: summary.name,
            kind: summary.kind,
            city: summary.city,
            state: summary.state,
            cover_image: summary.cover_image,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuestBody {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl From<GuestContact> for GuestBody {
    fn from(guest: GuestContact) -> Self {
        Self {
            id: guest.id.to_string(),
            name: guest.name.to_string(),
            email: guest.email.to_string(),
            phone: guest.phone.to_string(),
        }
    }
}

/// A booking. Daily-rate stays carry dates, rentals carry a duration.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingBody {
    pub id: String,
    pub guest_id: String,
    pub property_id: String,
    pub from_date: Option<DateTime<Utc>>,
    pub to_date: Option<DateTime<Utc>>,
    pub duration: Option<u32>,
    pub duration_unit: Option<DurationUnit>,
    pub guests: u32,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 9000.0)]
    pub total_price: Decimal,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub order_id: Option<String>,
    pub payment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<PropertySummaryBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest: Option<GuestBody>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Booking> for BookingBody {
    fn from(booking: Booking) -> Self {
        let (from_date, to_date, duration, duration_unit) = match booking.term {
            StayTerm::Dates {
                check_in,
                check_out,
            } => (Some(check_in), Some(check_out), None, None),
            StayTerm::Duration { length, unit } => (None, None, Some(length), Some(unit)),
        };
        Self {
            id: booking.id.to_string(),
            guest_id: booking.guest.to_string(),
            property_id: booking.property.to_string(),
            from_date,
            to_date,
            duration,
            duration_unit,
            guests: booking.guests,
            total_price: booking.total_price,
            payment_status: booking.payment_status,
            payment_method: booking.payment_method,
            order_id: booking.order_id,
            payment_id: booking.payment_id,
            property: None,
            guest: None,
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}

impl From<BookingView> for BookingBody {
    fn from(view: BookingView) -> Self {
        let mut body = Self::from(view.booking);
        body.property = view.property.map(PropertySummaryBody::from);
        body.guest = view.guest.map(GuestBody::from);
        body
    }
}
