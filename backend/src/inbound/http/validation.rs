//! Shared validation helpers for inbound HTTP adapters.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

use crate::domain::{Error, PropertyId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidTimestamp,
    InvalidValue,
    MalformedBody,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidTimestamp => "invalid_timestamp",
            ErrorCode::InvalidValue => "invalid_value",
            ErrorCode::MalformedBody => "malformed_body",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, code: ErrorCode, message: String) -> Error {
    Error::invalid_field(field.as_str(), code.as_str(), message)
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(field, ErrorCode::MissingField, format!("{name} is required"))
}

/// Return the trimmed value, rejecting absent or blank input.
pub(crate) fn require_text(value: Option<String>, field: FieldName) -> Result<String, Error> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|raw| !raw.is_empty())
        .ok_or_else(|| missing_field_error(field))
}

pub(crate) fn parse_property_id(value: &str) -> Result<PropertyId, Error> {
    PropertyId::new(value).map_err(|_| {
        field_error(
            FieldName::new("id"),
            ErrorCode::InvalidUuid,
            "id must be a valid UUID".to_owned(),
        )
    })
}

pub(crate) fn parse_rfc3339_timestamp(
    value: &str,
    field: FieldName,
) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| {
            let name = field.as_str();
            field_error(
                field,
                ErrorCode::InvalidTimestamp,
                format!("{name} must be an RFC 3339 timestamp"),
            )
        })
}

pub(crate) fn parse_optional_rfc3339_timestamp(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<DateTime<Utc>>, Error> {
    value
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| parse_rfc3339_timestamp(&raw, field))
        .transpose()
}

/// Parse an optional enum-like value, treating blank input as absent.
pub(crate) fn parse_optional<T>(value: Option<String>) -> Result<Option<T>, Error>
where
    T: FromStr,
    T::Err: Into<Error>,
{
    value
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| raw.parse::<T>().map_err(Into::into))
        .transpose()
}

pub(crate) fn invalid_value_error(field: FieldName, expected: &str) -> Error {
    let name = field.as_str();
    field_error(
        field,
        ErrorCode::InvalidValue,
        format!("{name} must be {expected}"),
    )
}

/// Decode a JSON request body, reporting syntax or shape errors as `400`.
/// Request body that could not be decoded at all.
pub(crate) fn malformed_body_error(reason: impl std::fmt::Display) -> Error {
    Error::invalid_request(format!("malformed JSON body: {reason}"))
        .with_details(serde_json::json!({ "code": ErrorCode::MalformedBody.as_str() }))
}

pub(crate) fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, Error> {
    serde_json::from_slice(body).map_err(malformed_body_error)
}
