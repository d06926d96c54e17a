//! Adapter selection and service assembly for [`HttpState`].

use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use rand::RngCore;
use tracing::{info, warn};
use zeroize::Zeroizing;

use traveltrove::domain::ports::{
    BookingRepository, MediaStore, PaymentGateway, PropertyRepository, TokenIssuer,
    UserRepository,
};
use traveltrove::domain::{AccountServiceImpl, BookingServiceImpl, ListingServiceImpl};
use traveltrove::inbound::http::state::HttpState;
use traveltrove::outbound::media::{FixtureMediaStore, HttpMediaStore};
use traveltrove::outbound::memory::MemoryStore;
use traveltrove::outbound::payments::{
    HttpPaymentGateway, SimulatedPaymentGateway, UnconfiguredPaymentGateway,
};
use traveltrove::outbound::persistence::{
    DbPool, DieselBookingRepository, DieselPropertyRepository, DieselUserRepository,
};
use traveltrove::outbound::security::{Argon2PasswordHasher, JwtTokenIssuer};
use traveltrove::settings::{AppSettings, MediaMode, PaymentMode, SettingsError};

const GENERATED_SECRET_BYTES: usize = 48;

/// The three repositories, always backed by the same store.
struct Repositories {
    users: Arc<dyn UserRepository>,
    properties: Arc<dyn PropertyRepository>,
    bookings: Arc<dyn BookingRepository>,
}

impl Repositories {
    fn select(pool: Option<&DbPool>) -> Self {
        match pool {
            Some(pool) => Self {
                users: Arc::new(DieselUserRepository::new(pool.clone())),
                properties: Arc::new(DieselPropertyRepository::new(pool.clone())),
                bookings: Arc::new(DieselBookingRepository::new(pool.clone())),
            },
            None => {
                warn!("no database configured; data is kept in memory and lost on exit");
                let store = MemoryStore::new();
                Self {
                    users: Arc::new(store.users()),
                    properties: Arc::new(store.properties()),
                    bookings: Arc::new(store.bookings()),
                }
            }
        }
    }
}

/// Collaborators configured from [`AppSettings`].
pub struct ExternalPorts {
    pub payments: Arc<dyn PaymentGateway>,
    pub media: Arc<dyn MediaStore>,
    pub tokens: Arc<dyn TokenIssuer>,
    pub webhook_secret: Option<String>,
}

fn build_payment_gateway(
    mode: PaymentMode,
    timeout: Duration,
) -> std::io::Result<Arc<dyn PaymentGateway>> {
    Ok(match mode {
        PaymentMode::Live {
            api_base,
            onboarding_base,
            credentials,
        } => {
            info!(api = %api_base, key_id = %credentials.key_id, "payment gateway: live");
            Arc::new(
                HttpPaymentGateway::new(api_base, onboarding_base, credentials, timeout)
                    .map_err(std::io::Error::other)?,
            )
        }
        PaymentMode::Simulated { onboarding_base } => {
            info!("payment gateway: simulated test mode");
            Arc::new(SimulatedPaymentGateway::new(onboarding_base))
        }
        PaymentMode::Unconfigured => {
            warn!("payment gateway not configured; online payments will fail");
            Arc::new(UnconfiguredPaymentGateway)
        }
    })
}

fn build_media_store(mode: MediaMode, timeout: Duration) -> std::io::Result<Arc<dyn MediaStore>> {
    Ok(match mode {
        MediaMode::Http {
            endpoint,
            upload_preset,
        } => {
            info!(endpoint = %endpoint, "media store: http");
            Arc::new(
                HttpMediaStore::new(endpoint, upload_preset, timeout)
                    .map_err(std::io::Error::other)?,
            )
        }
        MediaMode::Fixture { base } => {
            info!(base = %base, "media store: fixture urls");
            Arc::new(FixtureMediaStore::new(base))
        }
    })
}

fn build_token_issuer(
    settings: &AppSettings,
    release: bool,
    clock: Arc<dyn Clock>,
) -> Result<Arc<dyn TokenIssuer>, SettingsError> {
    let secret = match settings.jwt_secret(release)? {
        Some(secret) => secret,
        None => {
            warn!("TROVE_JWT_SECRET unset; tokens will not survive a restart");
            let mut generated = Zeroizing::new(vec![0_u8; GENERATED_SECRET_BYTES]);
            rand::thread_rng().fill_bytes(&mut generated);
            generated
        }
    };
    Ok(Arc::new(JwtTokenIssuer::new(
        &secret,
        settings.jwt_ttl()?,
        clock,
    )))
}

/// Resolve every settings-driven collaborator.
///
/// # Errors
/// Invalid settings or an HTTP client that cannot be built.
pub fn build_external_ports(settings: &AppSettings, release: bool) -> std::io::Result<ExternalPorts> {
    let timeout = settings.http_timeout();
    let payments = build_payment_gateway(
        settings.payment_mode().map_err(std::io::Error::other)?,
        timeout,
    )?;
    let media = build_media_store(settings.media_mode().map_err(std::io::Error::other)?, timeout)?;
    let tokens = build_token_issuer(settings, release, Arc::new(DefaultClock))
        .map_err(std::io::Error::other)?;
    let webhook_secret = settings
        .webhook_secret(release)
        .map_err(std::io::Error::other)?;
    if webhook_secret.is_none() {
        warn!("TROVE_PAYMENT_WEBHOOK_SECRET unset; onboarding callbacks will be refused");
    }
    Ok(ExternalPorts {
        payments,
        media,
        tokens,
        webhook_secret,
    })
}

/// Wire services over the selected repositories.
pub fn build_http_state(pool: Option<&DbPool>, ports: ExternalPorts) -> web::Data<HttpState> {
    let Repositories {
        users,
        properties,
        bookings,
    } = Repositories::select(pool);
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let accounts = Arc::new(AccountServiceImpl::new(
        users.clone(),
        Arc::new(Argon2PasswordHasher::new()),
        ports.tokens.clone(),
        ports.payments.clone(),
        clock.clone(),
    ));
    let listings = Arc::new(ListingServiceImpl::new(
        properties.clone(),
        users.clone(),
        ports.media,
        clock.clone(),
    ));
    let booking_service = Arc::new(BookingServiceImpl::new(
        bookings,
        properties,
        users,
        ports.payments,
        clock,
    ));

    web::Data::new(
        HttpState::new(accounts, listings, booking_service, ports.tokens)
            .with_webhook_secret(ports.webhook_secret),
    )
}
