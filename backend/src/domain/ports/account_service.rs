//! Driving port for account use-cases.
//!
//! Inbound adapters call this port to register, authenticate and manage
//! accounts without knowing which repository, hasher or token issuer backs
//! it.

use async_trait::async_trait;

use crate::domain::{
    Error, LoginCredentials, LoginRole, PasswordChange, PaymentAccountId, PhoneNumber,
    ProfileUpdate, Registration, User, UserId,
};

/// Result of a successful registration or login.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    /// Signed bearer token for API clients.
    pub token: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Open an account and authenticate it straight away.
    async fn register(&self, registration: Registration) -> Result<AuthSession, Error>;

    /// Check credentials. A `role` only changes the reported host flag.
    async fn login(
        &self,
        credentials: &LoginCredentials,
        role: Option<LoginRole>,
    ) -> Result<AuthSession, Error>;

    async fn current_user(&self, id: &UserId) -> Result<User, Error>;

    async fn update_profile(&self, id: &UserId, update: ProfileUpdate) -> Result<User, Error>;

    async fn change_password(&self, id: &UserId, change: PasswordChange) -> Result<User, Error>;

    async fn delete_account(&self, id: &UserId) -> Result<(), Error>;

    /// Record a payout account and mark the user as a host.
    async fn link_payment_account(
        &self,
        id: &UserId,
        account: PaymentAccountId,
    ) -> Result<User, Error>;

    /// Ask the gateway for an onboarding URL.
    async fn start_onboarding(
        &self,
        id: &UserId,
        business_name: &str,
        phone: Option<PhoneNumber>,
    ) -> Result<String, Error>;

    /// Gateway callback once a merchant finished onboarding.
    async fn complete_onboarding(
        &self,
        merchant: &UserId,
        account: PaymentAccountId,
    ) -> Result<User, Error>;
}
