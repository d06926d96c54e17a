//! Wire shapes for the gateway's REST API. Amounts are minor units.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(super) struct OrderBody<'a> {
    pub amount: i64,
    pub currency: &'a str,
    pub receipt: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct OrderReply {
    pub id: String,
    pub amount: i64,
    pub currency: String,
}

#[derive(Debug, Serialize)]
pub(super) struct TransferNotes {
    #[serde(rename = "bookingId")]
    pub booking_id: String,
}

#[derive(Debug, Serialize)]
pub(super) struct TransferBody<'a> {
    pub account: &'a str,
    pub amount: i64,
    pub currency: &'a str,
    pub notes: TransferNotes,
}

#[derive(Debug, Deserialize)]
pub(super) struct TransferReply {
    pub id: String,
}

/// `{"error": {"description": "..."}}`
#[derive(Debug, Deserialize)]
pub(super) struct ErrorReply {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorDetail {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}
