//! Account domain service.
//!
//! Implements [`AccountService`] over the user repository, password hasher,
//! token issuer and payment gateway ports.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    AccountService, AuthSession, OnboardingRequest, PasswordHashError, PasswordHasher,
    PaymentGateway, TokenError, TokenIssuer, UserRepository,
};
use crate::domain::{
    Error, HashedPassword, LoginCredentials, LoginRole, Password, PasswordChange,
    PaymentAccountId, PhoneNumber, ProfileUpdate, Registration, User, UserAccount, UserId,
};

const INVALID_CREDENTIALS: &str = "invalid email or password";

/// Account service implementing the driving port.
#[derive(Clone)]
pub struct AccountServiceImpl {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenIssuer>,
    gateway: Arc<dyn PaymentGateway>,
    clock: Arc<dyn Clock>,
}

impl AccountServiceImpl {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenIssuer>,
        gateway: Arc<dyn PaymentGateway>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            gateway,
            clock,
        }
    }

    async fn load_account(&self, id: &UserId) -> Result<UserAccount, Error> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("user not found"))
    }

    async fn save(&self, user: User) -> Result<User, Error> {
        if self.users.update(&user).await? {
            Ok(user)
        } else {
            Err(Error::not_found("user not found"))
        }
    }

    fn hash(&self, password: &Password) -> Result<HashedPassword, Error> {
        self.hasher.hash(password).map_err(map_hash_error)
    }

    fn verify(&self, password: &Password, hash: &HashedPassword) -> Result<bool, Error> {
        self.hasher.verify(password, hash).map_err(map_hash_error)
    }

    fn open_session(&self, user: User) -> Result<AuthSession, Error> {
        let token = self.tokens.issue(&user.id).map_err(map_token_error)?;
        Ok(AuthSession { user, token })
    }

    async fn attach_payment_account(
        &self,
        id: &UserId,
        account: PaymentAccountId,
    ) -> Result<User, Error> {
        let mut user = self.load_account(id).await?.user;
        user.payment_account = Some(account);
        user.is_host = true;
        self.save(user).await
    }
}

fn map_hash_error(err: PasswordHashError) -> Error {
    Error::internal(err.to_string())
}

fn map_token_error(err: TokenError) -> Error {
    Error::internal(err.to_string())
}

#[async_trait]
impl AccountService for AccountServiceImpl {
    async fn register(&self, registration: Registration) -> Result<AuthSession, Error> {
        let Registration {
            name,
            email,
            phone,
            password,
            avatar,
            is_host,
        } = registration;
        let password_hash = self.hash(&password)?;
        let user = User {
            id: UserId::random(),
            name,
            email,
            phone,
            avatar,
            is_host,
            payment_account: None,
            created_at: self.clock.utc(),
        };
        self.users
            .insert(&UserAccount {
                user: user.clone(),
                password_hash,
            })
            .await?;
        info!(user_id = %user.id, is_host, "account registered");
        self.open_session(user)
    }

    async fn login(
        &self,
        credentials: &LoginCredentials,
        role: Option<LoginRole>,
    ) -> Result<AuthSession, Error> {
        let Some(account) = self.users.find_by_email(credentials.email()).await? else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        if !self.verify(credentials.password(), &account.password_hash)? {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        let user = match role {
            Some(role) => account.user.viewed_as_host(role == LoginRole::Host),
            None => account.user,
        };
        self.open_session(user)
    }

    async fn current_user(&self, id: &UserId) -> Result<User, Error> {
        Ok(self.load_account(id).await?.user)
    }

    async fn update_profile(&self, id: &UserId, update: ProfileUpdate) -> Result<User, Error> {
        if update.is_empty() {
            return Err(Error::invalid_request("no profile fields supplied"));
        }
        let mut user = self.load_account(id).await?.user;
        let ProfileUpdate {
            name,
            phone,
            avatar,
        } = update;
        if let Some(name) = name {
            user.name = name;
        }
        if let Some(phone) = phone {
            user.phone = phone;
        }
        if avatar.is_some() {
            user.avatar = avatar;
        }
        self.save(user).await
    }

    async fn change_password(&self, id: &UserId, change: PasswordChange) -> Result<User, Error> {
        let account = self.load_account(id).await?;
        if !self.verify(&change.current, &account.password_hash)? {
            return Err(Error::unauthorized("current password is incorrect"));
        }
        let hash = self.hash(&change.replacement)?;
        if !self.users.update_password(id, &hash).await? {
            return Err(Error::not_found("user not found"));
        }
        info!(user_id = %id, "password changed");
        Ok(account.user)
    }

    async fn delete_account(&self, id: &UserId) -> Result<(), Error> {
        if !self.users.delete(id).await? {
            return Err(Error::not_found("user not found"));
        }
        info!(user_id = %id, "account deleted");
        Ok(())
    }

    async fn link_payment_account(
        &self,
        id: &UserId,
        account: PaymentAccountId,
    ) -> Result<User, Error> {
        let user = self.attach_payment_account(id, account).await?;
        info!(user_id = %id, "payment account linked");
        Ok(user)
    }

    async fn start_onboarding(
        &self,
        id: &UserId,
        business_name: &str,
        phone: Option<PhoneNumber>,
    ) -> Result<String, Error> {
        let business_name = business_name.trim();
        if business_name.is_empty() {
            return Err(Error::invalid_field(
                "businessName",
                "missing_field",
                "businessName is required",
            ));
        }
        let user = self.load_account(id).await?.user;
        let request = OnboardingRequest {
            user: user.id,
            business_name: business_name.to_owned(),
            phone: phone.unwrap_or(user.phone),
        };
        self.gateway.onboarding_link(&request).await.map_err(|err| {
            warn!(user_id = %id, error = %err, "onboarding link unavailable");
            Error::from(err)
        })
    }

    async fn complete_onboarding(
        &self,
        merchant: &UserId,
        account: PaymentAccountId,
    ) -> Result<User, Error> {
        let user = self.attach_payment_account(merchant, account).await?;
        info!(user_id = %merchant, "merchant onboarding completed");
        Ok(user)
    }
}

#[cfg(test)]
mod tests;
