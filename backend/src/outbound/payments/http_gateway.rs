//! Reqwest-backed `PaymentGateway` for a Razorpay-style REST API.
//!
//! Orders and transfers are JSON `POST`s authenticated with the key id and
//! secret as HTTP basic credentials. Onboarding links are built locally.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use zeroize::Zeroizing;

use super::dto::{ErrorReply, OrderBody, OrderReply, TransferBody, TransferNotes, TransferReply};
use super::onboarding::onboarding_url;
use crate::domain::ports::{
    OnboardingRequest, OrderRequest, PaymentGateway, PaymentGatewayError, PaymentOrder,
    TransferRequest, to_minor_units,
};

const PREVIEW_CHAR_LIMIT: usize = 160;

/// API key pair.
#[derive(Clone)]
pub struct GatewayCredentials {
    pub key_id: String,
    pub key_secret: Zeroizing<String>,
}

impl fmt::Debug for GatewayCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayCredentials")
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

pub struct HttpPaymentGateway {
    client: Client,
    api_base: Url,
    onboarding_base: Url,
    credentials: GatewayCredentials,
}

impl HttpPaymentGateway {
    /// # Errors
    /// Fails when the reqwest client cannot be constructed.
    pub fn new(
        api_base: Url,
        onboarding_base: Url,
        credentials: GatewayCredentials,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_base,
            onboarding_base,
            credentials,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, PaymentGatewayError> {
        self.api_base
            .join(path)
            .map_err(|err| PaymentGatewayError::transport(format!("bad endpoint {path}: {err}")))
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, PaymentGatewayError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.endpoint(path)?)
            .basic_auth(
                &self.credentials.key_id,
                Some(self.credentials.key_secret.as_str()),
            )
            .json(body)
            .send()
            .await
            .map_err(|err| PaymentGatewayError::transport(err.to_string()))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| PaymentGatewayError::transport(err.to_string()))?;
        debug!(path, status = status.as_u16(), "payment gateway replied");
        if !status.is_success() {
            return Err(map_status_error(status, &bytes));
        }
        serde_json::from_slice(&bytes).map_err(|err| PaymentGatewayError::decode(err.to_string()))
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn create_order(
        &self,
        request: &OrderRequest,
    ) -> Result<PaymentOrder, PaymentGatewayError> {
        let body = OrderBody {
            amount: to_minor_units(request.amount)?,
            currency: &request.currency,
            receipt: &request.receipt,
        };
        let reply: OrderReply = self.post("v1/orders", &body).await?;
        Ok(PaymentOrder {
            id: reply.id,
            amount_minor: reply.amount,
            currency: reply.currency,
        })
    }

    async fn transfer(&self, request: &TransferRequest) -> Result<String, PaymentGatewayError> {
        let body = TransferBody {
            account: request.account.as_ref(),
            amount: to_minor_units(request.amount)?,
            currency: &request.currency,
            notes: TransferNotes {
                booking_id: request.booking.to_string(),
            },
        };
        let reply: TransferReply = self.post("v1/transfers", &body).await?;
        Ok(reply.id)
    }

    async fn onboarding_link(
        &self,
        request: &OnboardingRequest,
    ) -> Result<String, PaymentGatewayError> {
        onboarding_url(&self.onboarding_base, request)
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> PaymentGatewayError {
    let message = serde_json::from_slice::<ErrorReply>(body)
        .ok()
        .and_then(|reply| match (reply.error.code, reply.error.description) {
            (Some(code), Some(description)) => Some(format!("{code}: {description}")),
            (None, Some(description)) => Some(description),
            (Some(code), None) => Some(code),
            (None, None) => None,
        })
        .unwrap_or_else(|| body_preview(body));
    PaymentGatewayError::rejected(status.as_u16(), message)
}

fn body_preview(body: &[u8]) -> String {
    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview: String = compact.chars().take(PREVIEW_CHAR_LIMIT).collect();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
