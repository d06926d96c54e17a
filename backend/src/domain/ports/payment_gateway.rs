//! Port for the external payment processor.
//!
//! The gateway creates checkout orders for online bookings, moves money to a
//! host's linked account once a payment is verified, and produces onboarding
//! links for hosts who have not linked an account yet. Amounts cross this
//! boundary in major units and are converted to minor units (paise, cents)
//! by [`to_minor_units`] inside adapters.

use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::{BookingId, Error, PaymentAccountId, PhoneNumber, UserId};

use super::define_port_error;

/// Currency used for every booking.
pub const BOOKING_CURRENCY: &str = "INR";

define_port_error! {
    /// Failures reported by payment gateway adapters.
    pub enum PaymentGatewayError {
        /// No gateway credentials were configured.
        NotConfigured => "payment gateway is not configured",
        /// The gateway could not be reached.
        Transport { message: String } => "payment gateway request failed: {message}",
        /// The gateway answered with an error status.
        Rejected { status: u16, message: String } => "payment gateway rejected the request ({status}): {message}",
        /// The gateway answer could not be understood.
        Decode { message: String } => "payment gateway response was malformed: {message}",
        /// The amount cannot be expressed in minor units.
        InvalidAmount { message: String } => "invalid payment amount: {message}",
    }
}

/// Checkout order request.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub amount: Decimal,
    pub currency: String,
    pub receipt: String,
}

/// Order created by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentOrder {
    pub id: String,
    pub amount_minor: i64,
    pub currency: String,
}

/// Payout of a verified booking to its host.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferRequest {
    pub account: PaymentAccountId,
    pub amount: Decimal,
    pub currency: String,
    pub booking: BookingId,
}

/// Details a host supplies when asking for an onboarding link.
#[derive(Debug, Clone, PartialEq)]
pub struct OnboardingRequest {
    pub user: UserId,
    pub business_name: String,
    pub phone: PhoneNumber,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(&self, request: &OrderRequest)
    -> Result<PaymentOrder, PaymentGatewayError>;

    /// Returns the gateway's transfer identifier.
    async fn transfer(&self, request: &TransferRequest) -> Result<String, PaymentGatewayError>;

    /// Returns the URL the host should visit to link an account.
    async fn onboarding_link(
        &self,
        request: &OnboardingRequest,
    ) -> Result<String, PaymentGatewayError>;
}

impl From<PaymentGatewayError> for Error {
    fn from(err: PaymentGatewayError) -> Self {
        match err {
            PaymentGatewayError::NotConfigured | PaymentGatewayError::Transport { .. } => {
                Error::service_unavailable(err.to_string())
            }
            PaymentGatewayError::Rejected { .. }
            | PaymentGatewayError::Decode { .. }
            | PaymentGatewayError::InvalidAmount { .. } => Error::internal(err.to_string()),
        }
    }
}

/// Convert a major-unit amount to minor units, rounding half away from zero.
///
/// # Examples
/// ```
/// use rust_decimal::Decimal;
/// use traveltrove::domain::ports::to_minor_units;
///
/// assert_eq!(to_minor_units(Decimal::new(425_000, 0)), Ok(42_500_000));
/// assert_eq!(to_minor_units(Decimal::new(19_995, 3)), Ok(2_000));
/// ```
pub fn to_minor_units(amount: Decimal) -> Result<i64, PaymentGatewayError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(PaymentGatewayError::invalid_amount(format!(
            "{amount} is negative"
        )));
    }
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|minor| minor.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|minor| minor.to_i64())
        .ok_or_else(|| PaymentGatewayError::invalid_amount(format!("{amount} is out of range")))
}
