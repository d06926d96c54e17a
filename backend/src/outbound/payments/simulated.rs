//! Test-mode gateway: no network, plausible identifiers.

use async_trait::async_trait;
use tracing::info;
use url::Url;

use super::onboarding::{onboarding_url, random_hex};
use crate::domain::ports::{
    OnboardingRequest, OrderRequest, PaymentGateway, PaymentGatewayError, PaymentOrder,
    TransferRequest, to_minor_units,
};

const ID_BYTES: usize = 8;

#[derive(Debug, Clone)]
pub struct SimulatedPaymentGateway {
    onboarding_base: Url,
}

impl SimulatedPaymentGateway {
    pub fn new(onboarding_base: Url) -> Self {
        Self { onboarding_base }
    }
}

#[async_trait]
impl PaymentGateway for SimulatedPaymentGateway {
    async fn create_order(
        &self,
        request: &OrderRequest,
    ) -> Result<PaymentOrder, PaymentGatewayError> {
        let order = PaymentOrder {
            id: format!("order_{}", random_hex(ID_BYTES)),
            amount_minor: to_minor_units(request.amount)?,
            currency: request.currency.clone(),
        };
        info!(order = %order.id, amount_minor = order.amount_minor, "simulated order created");
        Ok(order)
    }

    async fn transfer(&self, request: &TransferRequest) -> Result<String, PaymentGatewayError> {
        let amount_minor = to_minor_units(request.amount)?;
        let id = format!("trf_{}", random_hex(ID_BYTES));
        info!(
            transfer = %id,
            account = %request.account,
            booking = %request.booking,
            amount_minor,
            "simulated transfer processed"
        );
        Ok(id)
    }

    async fn onboarding_link(
        &self,
        request: &OnboardingRequest,
    ) -> Result<String, PaymentGatewayError> {
        onboarding_url(&self.onboarding_base, request)
    }
}
