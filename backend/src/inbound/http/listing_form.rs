//! Listing request bodies.
//!
//! Hosts submit listings either as JSON or as `multipart/form-data` with the
//! listing fields as text parts and up to [`MAX_LISTING_UPLOADS`] files under
//! `images`. Both shapes end up as a [`ListingForm`].
//!
//! In multipart bodies every value arrives as text: numeric and boolean parts
//! are parsed as JSON scalars, and list parts (`facilities`, `images`) accept
//! either a JSON array or one item per part.

use actix_web::HttpRequest;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::web::Bytes;
use futures_util::stream;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::ports::MediaUpload;
use crate::domain::{Error, MAX_LISTING_UPLOADS, PropertyFields, PropertyType, RentalType};
use crate::inbound::http::validation::{decode_json, parse_optional};

/// Multipart part name carrying image files.
pub const IMAGES_FIELD: &str = "images";

const SCALAR_FIELDS: &[&str] = &[
    "pricePerDay",
    "monthlyPrice",
    "leasePrice",
    "advanceAmount",
    "leaseTimeLimit",
    "maxGuests",
    "bedrooms",
    "available",
];

const LIST_FIELDS: &[&str] = &["facilities", IMAGES_FIELD];

/// Listing fields as sent by clients. Every field is optional; creation
/// requires `name` and `type`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ListingPayload {
    #[schema(example = "Sea Breeze")]
    pub name: Option<String>,
    /// `Hotel Room`, `Resort`, `Villa` or `House for Rent`.
    #[serde(rename = "type")]
    #[schema(example = "Villa")]
    pub kind: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub gps_url: Option<String>,
    pub opening_time: Option<String>,
    pub closing_time: Option<String>,
    #[schema(value_type = Option<f64>, example = 4500.0)]
    pub price_per_day: Option<Decimal>,
    /// `Rent` or `Lease`, for houses only.
    pub rental_type: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub monthly_price: Option<Decimal>,
    #[schema(value_type = Option<f64>)]
    pub lease_price: Option<Decimal>,
    #[schema(value_type = Option<f64>)]
    pub advance_amount: Option<Decimal>,
    /// Lease term in months.
    pub lease_time_limit: Option<u32>,
    pub max_guests: Option<u32>,
    pub bedrooms: Option<u32>,
    pub facilities: Option<Vec<String>>,
    /// Image URLs already hosted elsewhere.
    pub images: Option<Vec<String>>,
    pub available: Option<bool>,
}

impl TryFrom<ListingPayload> for PropertyFields {
    type Error = Error;

    fn try_from(payload: ListingPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            name: payload.name,
            kind: parse_optional::<PropertyType>(payload.kind)?,
            state: payload.state,
            city: payload.city,
            address: payload.address,
            gps_url: payload.gps_url,
            opening_time: payload.opening_time,
            closing_time: payload.closing_time,
            price_per_day: payload.price_per_day,
            rental_type: parse_optional::<RentalType>(payload.rental_type)?,
            monthly_price: payload.monthly_price,
            lease_price: payload.lease_price,
            advance_amount: payload.advance_amount,
            lease_time_limit: payload.lease_time_limit,
            max_guests: payload.max_guests,
            bedrooms: payload.bedrooms,
            facilities: payload.facilities,
            images: payload.images,
            available: payload.available,
        })
    }
}

/// Parsed listing submission.
#[derive(Debug, Default)]
pub struct ListingForm {
    pub fields: PropertyFields,
    pub uploads: Vec<MediaUpload>,
}

/// Parse a JSON or multipart listing body.
pub async fn read_listing_form(req: &HttpRequest, body: Bytes) -> Result<ListingForm, Error> {
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if content_type
        .to_ascii_lowercase()
        .starts_with("multipart/form-data")
    {
        return read_multipart(content_type, body).await;
    }
    let payload: ListingPayload = decode_json(&body)?;
    Ok(ListingForm {
        fields: payload.try_into()?,
        uploads: Vec::new(),
    })
}

fn multipart_error(err: multer::Error) -> Error {
    Error::invalid_request(format!("malformed multipart body: {err}"))
}

async fn read_multipart(content_type: &str, body: Bytes) -> Result<ListingForm, Error> {
    let boundary = multer::parse_boundary(content_type).map_err(multipart_error)?;
    let mut multipart = multer::Multipart::new(
        stream::once(async move { Ok::<_, std::io::Error>(body) }),
        boundary,
    );

    let mut values = Map::new();
    let mut uploads = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_owned();
        if let Some(file_name) = field.file_name().map(str::to_owned) {
            if name != IMAGES_FIELD {
                return Err(Error::invalid_field(
                    &name,
                    "unexpected_file",
                    format!("files are only accepted under '{IMAGES_FIELD}'"),
                ));
            }
            if uploads.len() == MAX_LISTING_UPLOADS {
                return Err(Error::invalid_field(
                    IMAGES_FIELD,
                    "too_many_images",
                    format!("at most {MAX_LISTING_UPLOADS} images can be uploaded at once"),
                ));
            }
            let content_type = field.content_type().map(ToString::to_string);
            let bytes = field.bytes().await.map_err(multipart_error)?;
            debug!(%file_name, size = bytes.len(), "received listing image");
            uploads.push(MediaUpload {
                file_name,
                content_type,
                bytes: bytes.to_vec(),
            });
            continue;
        }
        let text = field.text().await.map_err(multipart_error)?;
        insert_text_part(&mut values, name, text)?;
    }

    let payload: ListingPayload = serde_json::from_value(Value::Object(values))
        .map_err(|err| Error::invalid_request(format!("invalid listing field: {err}")))?;
    Ok(ListingForm {
        fields: payload.try_into()?,
        uploads,
    })
}

fn insert_text_part(values: &mut Map<String, Value>, name: String, text: String) -> Result<(), Error> {
    let trimmed = text.trim();
    if LIST_FIELDS.contains(&name.as_str()) {
        let items = list_items(&name, trimmed)?;
        let entry = values
            .entry(name)
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(existing) = entry {
            existing.extend(items.into_iter().map(Value::String));
        }
        return Ok(());
    }
    if SCALAR_FIELDS.contains(&name.as_str()) {
        if trimmed.is_empty() {
            return Ok(());
        }
        let scalar = serde_json::from_str::<Value>(trimmed)
            .ok()
            .filter(|value| value.is_number() || value.is_boolean())
            .ok_or_else(|| {
                Error::invalid_field(
                    &name,
                    "invalid_value",
                    format!("{name} must be a number or boolean"),
                )
            })?;
        values.insert(name, scalar);
        return Ok(());
    }
    values.insert(name, Value::String(text));
    Ok(())
}

fn list_items(name: &str, text: &str) -> Result<Vec<String>, Error> {
    if text.starts_with('[') {
        return serde_json::from_str::<Vec<String>>(text).map_err(|_| {
            Error::invalid_field(
                name,
                "invalid_value",
                format!("{name} must be a JSON array of strings"),
            )
        });
    }
    if text.is_empty() {
        return Ok(Vec::new());
    }
    Ok(vec![text.to_owned()])
}

#[cfg(test)]
mod tests;
