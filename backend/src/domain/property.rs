//! Property listings.
//!
//! A [`Property`] carries a different set of pricing fields depending on its
//! [`PropertyType`]: daily-rate types use `price_per_day`, rental houses use
//! either monthly rent or a lease. Which fields are filled is not enforced at
//! write time; incomplete listings are allowed and reported through
//! [`crate::domain::CompletionStatus`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::Error;
use super::user::{AvatarUrl, EmailAddress, PersonName, UserId};

/// Maximum number of listings returned by a public search.
pub const PROPERTY_LIST_LIMIT: usize = 100;

/// Exclusive upper bound on a listing price; prices are `NUMERIC(12, 2)`.
pub const MAX_PRICE: Decimal = Decimal::from_parts((10_000_000_000_u64 & 0xFFFF_FFFF) as u32, (10_000_000_000_u64 >> 32) as u32, 0, false, 0);

/// Decimal places a listing price may carry.
pub const PRICE_SCALE: u32 = 2;

/// Validation errors for listing input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValidationError {
    InvalidId,
    MissingName,
    MissingType,
    UnknownType { value: String },
    UnknownRentalType { value: String },
    NegativeAmount { field: &'static str },
    AmountTooLarge { field: &'static str },
    AmountTooPrecise { field: &'static str },
    ZeroGuests,
    BlankImageUrl,
}

impl PropertyValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidId => "id",
            Self::MissingName => "name",
            Self::MissingType | Self::UnknownType { .. } => "type",
            Self::UnknownRentalType { .. } => "rentalType",
            Self::NegativeAmount { field }
            | Self::AmountTooLarge { field }
            | Self::AmountTooPrecise { field } => field,
            Self::ZeroGuests => "maxGuests",
            Self::BlankImageUrl => "images",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidId => "invalid_id",
            Self::MissingName => "missing_name",
            Self::MissingType => "missing_type",
            Self::UnknownType { .. } => "unknown_type",
            Self::UnknownRentalType { .. } => "unknown_rental_type",
            Self::NegativeAmount { .. } => "negative_amount",
            Self::AmountTooLarge { .. } => "amount_too_large",
            Self::AmountTooPrecise { .. } => "amount_too_precise",
            Self::ZeroGuests => "zero_guests",
            Self::BlankImageUrl => "blank_image_url",
        }
    }
}

impl fmt::Display for PropertyValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "property id must be a valid UUID"),
            Self::MissingName => write!(f, "property name is required"),
            Self::MissingType => write!(f, "property type is required"),
            Self::UnknownType { value } => write!(
                f,
                "unknown property type '{value}'; expected Hotel Room, Resort, Villa, or House for Rent"
            ),
            Self::UnknownRentalType { value } => {
                write!(f, "unknown rental type '{value}'; expected Rent or Lease")
            }
            Self::NegativeAmount { field } => write!(f, "{field} must not be negative"),
            Self::AmountTooLarge { field } => {
                write!(f, "{field} must be less than {MAX_PRICE}")
            }
            Self::AmountTooPrecise { field } => {
                write!(f, "{field} must have at most {PRICE_SCALE} decimal places")
            }
            Self::ZeroGuests => write!(f, "maxGuests must be at least 1"),
            Self::BlankImageUrl => write!(f, "image URLs must not be blank"),
        }
    }
}

impl std::error::Error for PropertyValidationError {}

impl From<PropertyValidationError> for Error {
    fn from(err: PropertyValidationError) -> Self {
        Error::invalid_field(err.field(), err.code(), err.to_string())
    }
}

/// Listing identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(Uuid);

impl PropertyId {
    pub fn new(id: impl AsRef<str>) -> Result<Self, PropertyValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| PropertyValidationError::InvalidId)
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

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of accommodation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum PropertyType {
    #[serde(rename = "Hotel Room")]
    HotelRoom,
    Resort,
    Villa,
    #[serde(rename = "House for Rent")]
    HouseForRent,
}

impl PropertyType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HotelRoom => "Hotel Room",
            Self::Resort => "Resort",
            Self::Villa => "Villa",
            Self::HouseForRent => "House for Rent",
        }
    }

    /// Hotel rooms, resorts and villas are booked per night.
    pub fn is_daily_rate(self) -> bool {
        !matches!(self, Self::HouseForRent)
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyType {
    type Err = PropertyValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Hotel Room" => Ok(Self::HotelRoom),
            "Resort" => Ok(Self::Resort),
            "Villa" => Ok(Self::Villa),
            "House for Rent" => Ok(Self::HouseForRent),
            other => Err(PropertyValidationError::UnknownType {
                value: other.to_owned(),
            }),
        }
    }
}

/// How a rental house is let.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum RentalType {
    Rent,
    Lease,
}

impl RentalType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rent => "Rent",
            Self::Lease => "Lease",
        }
    }
}

impl FromStr for RentalType {
    type Err = PropertyValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Rent" => Ok(Self::Rent),
            "Lease" => Ok(Self::Lease),
            other => Err(PropertyValidationError::UnknownRentalType {
                value: other.to_owned(),
            }),
        }
    }
}

/// Where the property is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub state: String,
    pub city: String,
    pub address: String,
    pub gps_url: Option<String>,
}

/// Type-dependent price fields, in major currency units.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyPricing {
    pub price_per_day: Option<Decimal>,
    pub rental_type: Option<RentalType>,
    pub monthly_price: Option<Decimal>,
    pub lease_price: Option<Decimal>,
    pub advance_amount: Option<Decimal>,
    /// Lease term in months.
    pub lease_time_limit: Option<u32>,
}

/// A host's listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub id: PropertyId,
    pub host: UserId,
    pub kind: PropertyType,
    pub name: String,
    pub location: Location,
    pub opening_time: Option<String>,
    pub closing_time: Option<String>,
    pub pricing: PropertyPricing,
    pub max_guests: Option<u32>,
    pub bedrooms: Option<u32>,
    pub facilities: Vec<String>,
    pub images: Vec<String>,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing fields as submitted by a host. Every field is optional so the same
/// shape serves creation and partial updates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyFields {
    pub name: Option<String>,
    pub kind: Option<PropertyType>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub gps_url: Option<String>,
    pub opening_time: Option<String>,
    pub closing_time: Option<String>,
    pub price_per_day: Option<Decimal>,
    pub rental_type: Option<RentalType>,
    pub monthly_price: Option<Decimal>,
    pub lease_price: Option<Decimal>,
    pub advance_amount: Option<Decimal>,
    pub lease_time_limit: Option<u32>,
    pub max_guests: Option<u32>,
    pub bedrooms: Option<u32>,
    pub facilities: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub available: Option<bool>,
}

impl PropertyFields {
    fn validate_common(&self) -> Result<(), PropertyValidationError> {
        let amounts = [
            ("pricePerDay", self.price_per_day),
            ("monthlyPrice", self.monthly_price),
            ("leasePrice", self.lease_price),
            ("advanceAmount", self.advance_amount),
        ];
        for (field, amount) in amounts {
            let Some(amount) = amount else { continue };
            if amount < Decimal::ZERO {
                return Err(PropertyValidationError::NegativeAmount { field });
            }
            if amount >= MAX_PRICE {
                return Err(PropertyValidationError::AmountTooLarge { field });
            }
            if amount.normalize().scale() > PRICE_SCALE {
                return Err(PropertyValidationError::AmountTooPrecise { field });
            }
        }
        if self.max_guests == Some(0) {
            return Err(PropertyValidationError::ZeroGuests);
        }
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(PropertyValidationError::MissingName);
            }
        }
        if self
            .images
            .as_ref()
            .is_some_and(|images| images.iter().any(|url| url.trim().is_empty()))
        {
            return Err(PropertyValidationError::BlankImageUrl);
        }
        Ok(())
    }
}

/// Validated input for a new listing.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDraft {
    name: String,
    kind: PropertyType,
    fields: PropertyFields,
}

impl PropertyDraft {
    /// Require a name and type and check the remaining fields.
    ///
    /// # Examples
    /// ```
    /// use traveltrove::domain::{PropertyDraft, PropertyFields, PropertyType};
    ///
    /// let fields = PropertyFields {
    ///     name: Some("Sea Breeze".into()),
    ///     kind: Some(PropertyType::Villa),
    ///     ..PropertyFields::default()
    /// };
    /// assert!(PropertyDraft::new(fields).is_ok());
    /// assert!(PropertyDraft::new(PropertyFields::default()).is_err());
    /// ```
    pub fn new(fields: PropertyFields) -> Result<Self, PropertyValidationError> {
        fields.validate_common()?;
        let name = fields
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or(PropertyValidationError::MissingName)?
            .to_owned();
        let kind = fields.kind.ok_or(PropertyValidationError::MissingType)?;
        Ok(Self { name, kind, fields })
    }

    /// Materialise the listing for `host`, appending any uploaded image URLs.
    pub fn into_property(
        self,
        id: PropertyId,
        host: UserId,
        uploaded_images: Vec<String>,
        now: DateTime<Utc>,
    ) -> Property {
        let Self { name, kind, fields } = self;
        let mut images = fields.images.unwrap_or_default();
        images.extend(uploaded_images);
        Property {
            id,
            host,
            kind,
            name,
            location: Location {
                state: fields.state.unwrap_or_default(),
                city: fields.city.unwrap_or_default(),
                address: fields.address.unwrap_or_default(),
                gps_url: fields.gps_url,
            },
            opening_time: fields.opening_time,
            closing_time: fields.closing_time,
            pricing: PropertyPricing {
                price_per_day: fields.price_per_day,
                rental_type: fields.rental_type,
                monthly_price: fields.monthly_price,
                lease_price: fields.lease_price,
                advance_amount: fields.advance_amount,
                lease_time_limit: fields.lease_time_limit,
            },
            max_guests: fields.max_guests,
            bedrooms: fields.bedrooms,
            facilities: fields.facilities.unwrap_or_default(),
            images,
            available: fields.available.unwrap_or(true),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Validated partial update for an existing listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyPatch(PropertyFields);

impl PropertyPatch {
    pub fn new(fields: PropertyFields) -> Result<Self, PropertyValidationError> {
        fields.validate_common()?;
        Ok(Self(fields))
    }

    /// Apply the patch. Provided fields overwrite, uploaded images are
    /// appended after the (possibly replaced) image list.
    pub fn apply(self, property: &mut Property, uploaded_images: Vec<String>, now: DateTime<Utc>) {
        let fields = self.0;
        if let Some(name) = fields.name {
            property.name = name.trim().to_owned();
        }
        if let Some(kind) = fields.kind {
            property.kind = kind;
        }
        overwrite(&mut property.location.state, fields.state);
        overwrite(&mut property.location.city, fields.city);
        overwrite(&mut property.location.address, fields.address);
        overwrite_opt(&mut property.location.gps_url, fields.gps_url);
        overwrite_opt(&mut property.opening_time, fields.opening_time);
        overwrite_opt(&mut property.closing_time, fields.closing_time);

        let pricing = &mut property.pricing;
        overwrite_opt(&mut pricing.price_per_day, fields.price_per_day);
        overwrite_opt(&mut pricing.rental_type, fields.rental_type);
        overwrite_opt(&mut pricing.monthly_price, fields.monthly_price);
        overwrite_opt(&mut pricing.lease_price, fields.lease_price);
        overwrite_opt(&mut pricing.advance_amount, fields.advance_amount);
        overwrite_opt(&mut pricing.lease_time_limit, fields.lease_time_limit);

        overwrite_opt(&mut property.max_guests, fields.max_guests);
        overwrite_opt(&mut property.bedrooms, fields.bedrooms);
        overwrite(&mut property.facilities, fields.facilities);
        overwrite(&mut property.images, fields.images);
        property.images.extend(uploaded_images);
        overwrite(&mut property.available, fields.available);
        property.updated_at = now;
    }
}

fn overwrite<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn overwrite_opt<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

/// Search criteria for the public listing index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyFilter {
    pub city: Option<String>,
    pub kind: Option<PropertyType>,
    pub limit: usize,
}

impl Default for PropertyFilter {
    fn default() -> Self {
        Self {
            city: None,
            kind: None,
            limit: PROPERTY_LIST_LIMIT,
        }
    }
}

impl PropertyFilter {
    /// Exact match on city and type, as stored.
    pub fn matches(&self, property: &Property) -> bool {
        self.city
            .as_deref()
            .is_none_or(|city| property.location.city == city)
            && self.kind.is_none_or(|kind| property.kind == kind)
    }
}

/// Public view of a listing's host.
#[derive(Debug, Clone, PartialEq)]
pub struct HostSummary {
    pub id: UserId,
    pub name: PersonName,
    pub email: EmailAddress,
    pub avatar: Option<AvatarUrl>,
}

/// Compact listing reference embedded in booking views.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySummary {
    pub id: PropertyId,
    pub name: String,
    pub kind: PropertyType,
    pub city: String,
    pub state: String,
    pub cover_image: Option<String>,
}

impl From<&Property> for PropertySummary {
    fn from(property: &Property) -> Self {
        Self {
            id: property.id,
            name: property.name.clone(),
            kind: property.kind,
            city: property.location.city.clone(),
            state: property.location.state.clone(),
            cover_image: property.images.first().cloned(),
        }
    }
}
