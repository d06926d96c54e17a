//! Diesel row structs and their conversions to domain types.
//!
//! Rows never leave the persistence module. Reading a row re-validates it
//! through the domain constructors, so a corrupted column surfaces as a
//! query error instead of an invalid aggregate.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{
    AvatarUrl, Booking, BookingId, DurationUnit, EmailAddress, HashedPassword, Location,
    PaymentAccountId, PersonName, PhoneNumber, Property, PropertyId, PropertyPricing, StayTerm,
    User, UserAccount, UserId,
};

use super::schema::{bookings, properties, users};

/// Conversion failure message; each repository wraps it in its own error.
pub(crate) type RowError = String;

fn to_db_int(value: Option<u32>, column: &str) -> Result<Option<i32>, RowError> {
    value
        .map(|v| i32::try_from(v).map_err(|_| format!("{column} out of range: {v}")))
        .transpose()
}

fn from_db_int(value: Option<i32>, column: &str) -> Result<Option<u32>, RowError> {
    value
        .map(|v| u32::try_from(v).map_err(|_| format!("{column} is negative: {v}")))
        .transpose()
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub avatar: Option<String>,
    pub password_hash: String,
    pub is_host: bool,
    pub payment_account_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile columns rewritten by `UserRepository::update`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserProfileChangeset<'a> {
    pub name: &'a str,
    pub phone: &'a str,
    pub avatar: Option<&'a str>,
    pub is_host: bool,
    pub payment_account_id: Option<&'a str>,
}

impl<'a> From<&'a User> for UserProfileChangeset<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            name: user.name.as_ref(),
            phone: user.phone.as_ref(),
            avatar: user.avatar.as_ref().map(AsRef::as_ref),
            is_host: user.is_host,
            payment_account_id: user.payment_account.as_ref().map(AsRef::as_ref),
        }
    }
}

impl From<&UserAccount> for UserRow {
    fn from(account: &UserAccount) -> Self {
        let user = &account.user;
        Self {
            id: *user.id.as_uuid(),
            name: user.name.to_string(),
            email: user.email.to_string(),
            phone: user.phone.to_string(),
            avatar: user.avatar.as_ref().map(ToString::to_string),
            password_hash: account.password_hash.as_str().to_owned(),
            is_host: user.is_host,
            payment_account_id: user.payment_account.as_ref().map(ToString::to_string),
            created_at: user.created_at,
            updated_at: user.created_at,
        }
    }
}

impl TryFrom<UserRow> for UserAccount {
    type Error = RowError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let invalid = |err: crate::domain::UserValidationError| {
            format!("stored user {} is invalid: {err}", row.id)
        };
        let user = User {
            id: UserId::from_uuid(row.id),
            name: PersonName::new(&row.name).map_err(invalid)?,
            email: EmailAddress::new(&row.email).map_err(invalid)?,
            phone: PhoneNumber::new(&row.phone).map_err(invalid)?,
            avatar: row.avatar.as_deref().map(AvatarUrl::new).transpose().map_err(invalid)?,
            is_host: row.is_host,
            payment_account: row
                .payment_account_id
                .as_deref()
                .map(PaymentAccountId::new)
                .transpose()
                .map_err(invalid)?,
            created_at: row.created_at,
        };
        Ok(UserAccount {
            user,
            password_hash: HashedPassword::new(row.password_hash),
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = properties)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct PropertyRow {
    pub id: Uuid,
    pub host_id: Uuid,
    pub property_type: String,
    pub name: String,
    pub state: String,
    pub city: String,
    pub address: String,
    pub gps_url: Option<String>,
    pub opening_time: Option<String>,
    pub closing_time: Option<String>,
    pub price_per_day: Option<Decimal>,
    pub rental_type: Option<String>,
    pub monthly_price: Option<Decimal>,
    pub lease_price: Option<Decimal>,
    pub advance_amount: Option<Decimal>,
    pub lease_time_limit: Option<i32>,
    pub max_guests: Option<i32>,
    pub bedrooms: Option<i32>,
    pub facilities: Vec<String>,
    pub images: Vec<String>,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<&Property> for PropertyRow {
    type Error = RowError;

    fn try_from(property: &Property) -> Result<Self, Self::Error> {
        let pricing = &property.pricing;
        Ok(Self {
            id: *property.id.as_uuid(),
            host_id: *property.host.as_uuid(),
            property_type: property.kind.as_str().to_owned(),
            name: property.name.clone(),
            state: property.location.state.clone(),
            city: property.location.city.clone(),
            address: property.location.address.clone(),
            gps_url: property.location.gps_url.clone(),
            opening_time: property.opening_time.clone(),
            closing_time: property.closing_time.clone(),
            price_per_day: pricing.price_per_day,
            rental_type: pricing.rental_type.map(|kind| kind.as_str().to_owned()),
            monthly_price: pricing.monthly_price,
            lease_price: pricing.lease_price,
            advance_amount: pricing.advance_amount,
            lease_time_limit: to_db_int(pricing.lease_time_limit, "lease_time_limit")?,
            max_guests: to_db_int(property.max_guests, "max_guests")?,
            bedrooms: to_db_int(property.bedrooms, "bedrooms")?,
            facilities: property.facilities.clone(),
            images: property.images.clone(),
            available: property.available,
            created_at: property.created_at,
            updated_at: property.updated_at,
        })
    }
}

impl TryFrom<PropertyRow> for Property {
    type Error = RowError;

    fn try_from(row: PropertyRow) -> Result<Self, Self::Error> {
        let kind = row
            .property_type
            .parse()
            .map_err(|err| format!("stored property {} is invalid: {err}", row.id))?;
        let rental_type = row
            .rental_type
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(|err| format!("stored property {} is invalid: {err}", row.id))?;
        Ok(Property {
            id: PropertyId::from_uuid(row.id),
            host: UserId::from_uuid(row.host_id),
            kind,
            name: row.name,
            location: Location {
                state: row.state,
                city: row.city,
                address: row.address,
                gps_url: row.gps_url,
            },
            opening_time: row.opening_time,
            closing_time: row.closing_time,
            pricing: PropertyPricing {
                price_per_day: row.price_per_day,
                rental_type,
                monthly_price: row.monthly_price,
                lease_price: row.lease_price,
                advance_amount: row.advance_amount,
                lease_time_limit: from_db_int(row.lease_time_limit, "lease_time_limit")?,
            },
            max_guests: from_db_int(row.max_guests, "max_guests")?,
            bedrooms: from_db_int(row.bedrooms, "bedrooms")?,
            facilities: row.facilities,
            images: row.images,
            available: row.available,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookingRow {
    pub id: Uuid,
    pub guest_id: Uuid,
    pub property_id: Uuid,
    pub check_in: Option<DateTime<Utc>>,
    pub check_out: Option<DateTime<Utc>>,
    pub duration: Option<i32>,
    pub duration_unit: Option<String>,
    pub guests: i32,
    pub total_price: Decimal,
    pub payment_status: String,
    pub payment_method: String,
    pub order_id: Option<String>,
    pub payment_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payment columns rewritten by `BookingRepository::update`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = bookings)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct BookingPaymentChangeset<'a> {
    pub payment_status: &'a str,
    pub order_id: Option<&'a str>,
    pub payment_id: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Booking> for BookingPaymentChangeset<'a> {
    fn from(booking: &'a Booking) -> Self {
        Self {
            payment_status: booking.payment_status.as_str(),
            order_id: booking.order_id.as_deref(),
            payment_id: booking.payment_id.as_deref(),
            updated_at: booking.updated_at,
        }
    }
}

impl TryFrom<&Booking> for BookingRow {
    type Error = RowError;

    fn try_from(booking: &Booking) -> Result<Self, Self::Error> {
        let (check_in, check_out, duration, duration_unit) = match booking.term {
            StayTerm::Dates {
                check_in,
                check_out,
            } => (Some(check_in), Some(check_out), None, None),
            StayTerm::Duration { length, unit } => (
                None,
                None,
                to_db_int(Some(length), "duration")?,
                Some(unit.as_str().to_owned()),
            ),
        };
        Ok(Self {
            id: *booking.id.as_uuid(),
            guest_id: *booking.guest.as_uuid(),
            property_id: *booking.property.as_uuid(),
            check_in,
            check_out,
            duration,
            duration_unit,
            guests: i32::try_from(booking.guests)
                .map_err(|_| format!("guests out of range: {}", booking.guests))?,
            total_price: booking.total_price,
            payment_status: booking.payment_status.as_str().to_owned(),
            payment_method: booking.payment_method.as_str().to_owned(),
            order_id: booking.order_id.clone(),
            payment_id: booking.payment_id.clone(),
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        })
    }
}

impl TryFrom<BookingRow> for Booking {
    type Error = RowError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let invalid = |what: &str| format!("stored booking {id} has {what}");
        let term = match (row.check_in, row.check_out, row.duration, row.duration_unit) {
            (Some(check_in), Some(check_out), None, _) => StayTerm::Dates {
                check_in,
                check_out,
            },
            (None, None, Some(length), Some(unit)) => StayTerm::Duration {
                length: u32::try_from(length).map_err(|_| invalid("a negative duration"))?,
                unit: unit
                    .parse::<DurationUnit>()
                    .map_err(|_| invalid("an unknown duration unit"))?,
            },
            _ => return Err(invalid("neither dates nor a duration")),
        };
        Ok(Booking {
            id: BookingId::from_uuid(row.id),
            guest: UserId::from_uuid(row.guest_id),
            property: PropertyId::from_uuid(row.property_id),
            term,
            guests: u32::try_from(row.guests).map_err(|_| invalid("a negative guest count"))?,
            total_price: row.total_price,
            payment_status: row
                .payment_status
                .parse()
                .map_err(|_| invalid("an unknown payment status"))?,
            payment_method: row
                .payment_method
                .parse()
                .map_err(|_| invalid("an unknown payment method"))?,
            order_id: row.order_id,
            payment_id: row.payment_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use rstest::rstest;

    use super::*;
    use crate::domain::service_fixtures::{account, complete_villa, fixture_now, user};
    use crate::domain::{PaymentMethod, PaymentStatus, RentalType};

    #[rstest]
    fn user_rows_round_trip_through_validation() {
        let stored = account(user("Asha Rao", "asha@example.com", true));
        let row = UserRow::from(&stored);
        assert_eq!(row.email, "asha@example.com");
        let restored = UserAccount::try_from(row).expect("valid row");
        assert_eq!(restored.user, stored.user);
    }

    #[rstest]
    fn corrupt_user_rows_are_rejected() {
        let mut row = UserRow::from(&account(user("Asha Rao", "asha@example.com", false)));
        row.email = "not-an-email".into();
        let err = UserAccount::try_from(row).expect_err("invalid email");
        assert!(err.contains("is invalid"));
    }

    #[rstest]
    fn property_rows_keep_rental_pricing() {
        let mut villa = complete_villa(UserId::random());
        villa.pricing.rental_type = Some(RentalType::Lease);
        villa.pricing.lease_time_limit = Some(11);
        let row = PropertyRow::try_from(&villa).expect("row");
        assert_eq!(row.property_type, "Villa");
        assert_eq!(row.rental_type.as_deref(), Some("Lease"));
        assert_eq!(Property::try_from(row).expect("property"), villa);
    }

    #[rstest]
    fn unknown_property_types_are_rejected() {
        let mut row = PropertyRow::try_from(&complete_villa(UserId::random())).expect("row");
        row.property_type = "Castle".into();
        assert!(Property::try_from(row).is_err());
    }

    fn booking(term: StayTerm) -> Booking {
        Booking {
            id: BookingId::random(),
            guest: UserId::random(),
            property: PropertyId::random(),
            term,
            guests: 2,
            total_price: Decimal::new(9000, 0),
            payment_status: PaymentStatus::PayOnLocation,
            payment_method: PaymentMethod::PayOnLocation,
            order_id: None,
            payment_id: None,
            created_at: fixture_now(),
            updated_at: fixture_now(),
        }
    }

    #[rstest]
    #[case(StayTerm::Dates { check_in: fixture_now(), check_out: fixture_now() + Duration::days(2) })]
    #[case(StayTerm::Duration { length: 6, unit: DurationUnit::Months })]
    fn booking_terms_survive_storage(#[case] term: StayTerm) {
        let original = booking(term);
        let row = BookingRow::try_from(&original).expect("row");
        assert_eq!(row.payment_status, "Pay on Location");
        assert_eq!(Booking::try_from(row).expect("booking"), original);
    }

    #[rstest]
    fn half_stored_terms_are_rejected() {
        let mut row = BookingRow::try_from(&booking(StayTerm::Dates {
            check_in: fixture_now(),
            check_out: fixture_now() + Duration::days(1),
        }))
        .expect("row");
        row.check_out = None;
        let err = Booking::try_from(row).expect_err("incomplete term");
        assert!(err.contains("neither dates nor a duration"));
    }
}
