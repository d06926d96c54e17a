//! Account HTTP handlers.
//!
//! ```text
//! POST   /api/auth/register
//! POST   /api/auth/login
//! POST   /api/auth/logout
//! GET    /api/auth/me
//! PATCH  /api/auth/updateMe
//! PATCH  /api/auth/updatePassword
//! DELETE /api/auth/deleteMe
//! POST   /api/auth/payment-account
//! POST   /api/auth/payment-onboarding
//! POST   /api/auth/webhook/payment-onboarding
//! ```
//!
//! Successful registration and login both persist the user in the cookie
//! session and return a bearer token in the body.

use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::warn;
use utoipa::ToSchema;

use crate::domain::ports::AuthSession;
use crate::domain::{
    Error, LoginCredentials, LoginRole, PasswordChange, PaymentAccountId, PhoneNumber,
    ProfileUpdate, Registration, RegistrationParts, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::responses::UserBody;
use crate::inbound::http::session::{Authenticated, SessionContext};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_optional, require_text};

/// Header the payment gateway uses to authenticate onboarding callbacks.
pub const WEBHOOK_SECRET_HEADER: &str = "X-Webhook-Secret";

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    #[schema(example = "Asha Rao")]
    pub name: String,
    #[schema(example = "asha@example.com")]
    pub email: String,
    #[schema(example = "+91 98470 12345")]
    pub phone: String,
    #[schema(example = "trove#2024")]
    pub password: String,
    pub avatar: Option<String>,
    pub is_host: bool,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// `host` or `guest`; overrides the reported host flag for this login.
    pub role: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentAccountRequest {
    #[schema(example = "acc_Nv1mS2x8QwErTy")]
    pub payment_account_id: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct OnboardingRequest {
    pub business_name: Option<String>,
    /// Defaults to the phone number on the account.
    pub phone: Option<String>,
}

/// Callback payload; `merchant` is the user id sent when onboarding started.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct OnboardingWebhookRequest {
    pub merchant: Option<String>,
    pub payment_account_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[schema(example = "success")]
    pub status: &'static str,
    /// HS256 bearer token for API clients.
    pub token: String,
    pub user: UserBody,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            status: "success",
            token: session.token,
            user: session.user.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user: UserBody,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingResponse {
    pub onboarding_url: String,
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|raw| !raw.trim().is_empty())
}

fn parse_payment_account(raw: Option<String>) -> Result<PaymentAccountId, Error> {
    let raw = require_text(raw, FieldName::new("paymentAccountId"))?;
    Ok(PaymentAccountId::new(raw)?)
}

/// Open an account and sign it in.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let registration = Registration::try_from_parts(RegistrationParts {
        name: &payload.name,
        email: &payload.email,
        phone: &payload.phone,
        password: &payload.password,
        avatar: payload.avatar.as_deref(),
        is_host: payload.is_host,
    })?;
    let auth = state.accounts.register(registration).await?;
    session.persist_user(&auth.user.id)?;
    Ok(HttpResponse::Created().json(AuthResponse::from(auth)))
}

/// Authenticate with email and password.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = AuthResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&payload.email, &payload.password)?;
    let role: Option<LoginRole> = parse_optional(payload.role)?;
    let auth = state.accounts.login(&credentials, role).await?;
    session.persist_user(&auth.user.id)?;
    Ok(HttpResponse::Ok().json(AuthResponse::from(auth)))
}

/// Drop the session cookie. Bearer tokens stay valid until they expire.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 200, description = "Logged out")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::Ok().json(json!({ "message": "Logged out" }))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Account no longer exists", body = Error)
    ),
    tags = ["auth"],
    operation_id = "currentUser"
)]
#[get("/me")]
pub async fn me(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<web::Json<UserResponse>> {
    let user = state.accounts.current_user(caller.user_id()).await?;
    Ok(web::Json(UserResponse { user: user.into() }))
}

/// Update name, phone or avatar. Blank fields are left unchanged.
#[utoipa::path(
    patch,
    path = "/api/auth/updateMe",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["auth"],
    operation_id = "updateProfile"
)]
#[patch("/updateMe")]
pub async fn update_me(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let name = blank_to_none(payload.name);
    let phone = blank_to_none(payload.phone);
    let avatar = blank_to_none(payload.avatar);
    let update = ProfileUpdate::try_from_parts(name.as_deref(), phone.as_deref(), avatar.as_deref())?;
    let user = state
        .accounts
        .update_profile(caller.user_id(), update)
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "status": "success", "user": UserBody::from(user) })))
}

#[utoipa::path(
    patch,
    path = "/api/auth/updatePassword",
    request_body = UpdatePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = UserResponse),
        (status = 400, description = "Replacement fails the password policy", body = Error),
        (status = 401, description = "Current password is incorrect", body = Error)
    ),
    tags = ["auth"],
    operation_id = "updatePassword"
)]
#[patch("/updatePassword")]
pub async fn update_password(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<UpdatePasswordRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let change = PasswordChange::try_from_parts(&payload.current_password, &payload.new_password)?;
    let user = state
        .accounts
        .change_password(caller.user_id(), change)
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Password updated successfully",
        "user": UserBody::from(user),
    })))
}

/// Delete the caller's account together with its listings and bookings.
#[utoipa::path(
    delete,
    path = "/api/auth/deleteMe",
    responses(
        (status = 200, description = "Account deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Account already removed", body = Error)
    ),
    tags = ["auth"],
    operation_id = "deleteAccount"
)]
#[delete("/deleteMe")]
pub async fn delete_me(
    state: web::Data<HttpState>,
    session: SessionContext,
    caller: Authenticated,
) -> ApiResult<HttpResponse> {
    state.accounts.delete_account(caller.user_id()).await?;
    session.clear();
    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Account deleted successfully",
    })))
}

/// Link a payout account and become a host.
#[utoipa::path(
    post,
    path = "/api/auth/payment-account",
    request_body = PaymentAccountRequest,
    responses(
        (status = 200, description = "Account linked", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["auth"],
    operation_id = "linkPaymentAccount"
)]
#[post("/payment-account")]
pub async fn link_payment_account(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<PaymentAccountRequest>,
) -> ApiResult<HttpResponse> {
    let account = parse_payment_account(payload.into_inner().payment_account_id)?;
    let user = state
        .accounts
        .link_payment_account(caller.user_id(), account)
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Payment account saved",
        "user": UserBody::from(user),
    })))
}

/// Request a gateway onboarding link for the caller.
#[utoipa::path(
    post,
    path = "/api/auth/payment-onboarding",
    request_body = OnboardingRequest,
    responses(
        (status = 200, description = "Onboarding link", body = OnboardingResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Payment gateway unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "startPaymentOnboarding"
)]
#[post("/payment-onboarding")]
pub async fn start_onboarding(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<OnboardingRequest>,
) -> ApiResult<web::Json<OnboardingResponse>> {
    let payload = payload.into_inner();
    let business_name = require_text(payload.business_name, FieldName::new("businessName"))?;
    let phone = blank_to_none(payload.phone)
        .map(PhoneNumber::new)
        .transpose()?;
    let onboarding_url = state
        .accounts
        .start_onboarding(caller.user_id(), &business_name, phone)
        .await?;
    Ok(web::Json(OnboardingResponse { onboarding_url }))
}

/// Compare SHA-256 digests so the comparison time does not depend on where
/// the inputs first differ.
fn secrets_match(presented: &str, expected: &str) -> bool {
    let presented = Sha256::digest(presented.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());
    presented
        .iter()
        .zip(expected.iter())
        .fold(0_u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}

fn check_webhook_secret(state: &HttpState, req: &HttpRequest) -> Result<(), Error> {
    let Some(expected) = state.webhook_secret.as_deref() else {
        warn!("onboarding callback rejected: no webhook secret configured");
        return Err(Error::unauthorized("webhook secret not configured"));
    };
    let presented = req
        .headers()
        .get(WEBHOOK_SECRET_HEADER)
        .and_then(|value| value.to_str().ok());
    if presented.is_some_and(|presented| secrets_match(presented, expected)) {
        Ok(())
    } else {
        warn!("onboarding callback rejected: webhook secret mismatch");
        Err(Error::unauthorized("invalid webhook secret"))
    }
}

/// Gateway callback recording the merchant's payout account.
#[utoipa::path(
    post,
    path = "/api/auth/webhook/payment-onboarding",
    request_body = OnboardingWebhookRequest,
    params(("X-Webhook-Secret" = String, Header,
        description = "Shared secret configured for onboarding callbacks")),
    responses(
        (status = 200, description = "Merchant onboarded"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Webhook secret mismatch", body = Error),
        (status = 404, description = "Unknown merchant", body = Error)
    ),
    tags = ["auth"],
    operation_id = "paymentOnboardingWebhook",
    security([])
)]
#[post("/webhook/payment-onboarding")]
pub async fn onboarding_webhook(
    state: web::Data<HttpState>,
    req: HttpRequest,
    payload: web::Json<OnboardingWebhookRequest>,
) -> ApiResult<HttpResponse> {
    check_webhook_secret(&state, &req)?;
    let payload = payload.into_inner();
    let merchant = require_text(payload.merchant, FieldName::new("merchant"))?;
    let merchant = UserId::new(&merchant).map_err(|_| {
        Error::invalid_field("merchant", "invalid_uuid", "merchant must be a user id")
    })?;
    let account = parse_payment_account(payload.payment_account_id)?;
    state.accounts.complete_onboarding(&merchant, account).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "User onboarded" })))
}

#[cfg(test)]
mod tests;
