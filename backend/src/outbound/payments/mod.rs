//! Payment gateway adapters.
//!
//! - [`HttpPaymentGateway`]: Razorpay-style REST API with basic auth.
//! - [`SimulatedPaymentGateway`]: test mode; fabricates order and transfer ids.
//! - [`UnconfiguredPaymentGateway`]: every call fails with `NotConfigured`.

mod dto;
mod http_gateway;
mod onboarding;
mod simulated;

pub use http_gateway::{GatewayCredentials, HttpPaymentGateway};
pub use onboarding::DEFAULT_ONBOARDING_URL;
pub use simulated::SimulatedPaymentGateway;

use async_trait::async_trait;

use crate::domain::ports::{
    OnboardingRequest, OrderRequest, PaymentGateway, PaymentGatewayError, PaymentOrder,
    TransferRequest,
};

/// Stand-in used when neither credentials nor test mode are configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredPaymentGateway;

#[async_trait]
impl PaymentGateway for UnconfiguredPaymentGateway {
    async fn create_order(
        &self,
        _request: &OrderRequest,
    ) -> Result<PaymentOrder, PaymentGatewayError> {
        Err(PaymentGatewayError::not_configured())
    }

    async fn transfer(&self, _request: &TransferRequest) -> Result<String, PaymentGatewayError> {
        Err(PaymentGatewayError::not_configured())
    }

    async fn onboarding_link(
        &self,
        _request: &OnboardingRequest,
    ) -> Result<String, PaymentGatewayError> {
        Err(PaymentGatewayError::not_configured())
    }
}
