//! Application settings loaded via OrthoConfig.
//!
//! Every field can be supplied on the command line, in a config file or as a
//! `TROVE_*` environment variable (for example `TROVE_DATABASE_URL`). Session
//! cookie settings are separate; see
//! [`crate::inbound::http::session_config`].

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;
use zeroize::Zeroizing;

use crate::outbound::payments::{DEFAULT_ONBOARDING_URL, GatewayCredentials};
use crate::outbound::security::{DEFAULT_TOKEN_TTL_DAYS, TOKEN_SECRET_MIN_LEN};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_PAYMENT_API_BASE: &str = "https://api.razorpay.com/";
const DEFAULT_BODY_LIMIT_BYTES: usize = 25 * 1024 * 1024;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

/// Configuration problems detected at start-up.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("{name} is not valid: {message}")]
    Invalid { name: &'static str, message: String },
    #[error("{name} must be set in release builds")]
    Missing { name: &'static str },
    #[error("TROVE_JWT_SECRET must be at least {min} bytes")]
    SecretTooShort { min: usize },
}

impl SettingsError {
    fn invalid(name: &'static str, message: impl ToString) -> Self {
        Self::Invalid {
            name,
            message: message.to_string(),
        }
    }
}

/// How the payment gateway port is satisfied.
#[derive(Debug, Clone)]
pub enum PaymentMode {
    Live {
        api_base: Url,
        onboarding_base: Url,
        credentials: GatewayCredentials,
    },
    Simulated {
        onboarding_base: Url,
    },
    Unconfigured,
}

/// How listing photos are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaMode {
    Http { endpoint: Url, upload_preset: String },
    Fixture { base: Url },
}

#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TROVE")]
pub struct AppSettings {
    /// Socket address the HTTP server listens on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without it the server keeps data in memory.
    pub database_url: Option<String>,
    /// HS256 signing secret for bearer tokens.
    pub jwt_secret: Option<String>,
    /// Bearer token lifetime in days.
    pub jwt_ttl_days: Option<i64>,
    /// Use the simulated payment gateway.
    #[ortho_config(default = false)]
    pub payment_test_mode: bool,
    pub payment_key_id: Option<String>,
    pub payment_key_secret: Option<String>,
    pub payment_api_base: Option<String>,
    pub payment_onboarding_url: Option<String>,
    /// Shared secret expected on onboarding webhooks.
    pub payment_webhook_secret: Option<String>,
    /// Unsigned upload endpoint of the media host.
    pub media_upload_url: Option<String>,
    pub media_upload_preset: Option<String>,
    /// Base URL for deterministic development media links.
    pub media_fixture_base: Option<String>,
    /// Largest accepted request body, in bytes.
    pub body_limit_bytes: Option<usize>,
    /// Timeout applied to outbound HTTP calls, in seconds.
    pub http_timeout_secs: Option<u64>,
}

fn parse_url(name: &'static str, raw: &str) -> Result<Url, SettingsError> {
    Url::parse(raw.trim()).map_err(|err| SettingsError::invalid(name, err))
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl AppSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        non_blank(&self.bind_addr)
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
            .map_err(|err| SettingsError::invalid("TROVE_BIND_ADDR", err))
    }

    pub fn database_url(&self) -> Option<&str> {
        non_blank(&self.database_url)
    }

    pub fn jwt_ttl(&self) -> Result<chrono::Duration, SettingsError> {
        match self.jwt_ttl_days {
            None => Ok(chrono::Duration::days(DEFAULT_TOKEN_TTL_DAYS)),
            Some(days) if (1..=365).contains(&days) => Ok(chrono::Duration::days(days)),
            Some(days) => Err(SettingsError::invalid(
                "TROVE_JWT_TTL_DAYS",
                format!("{days} is outside 1..=365"),
            )),
        }
    }

    /// The signing secret; `None` in debug builds means "generate one".
    pub fn jwt_secret(&self, release: bool) -> Result<Option<Zeroizing<Vec<u8>>>, SettingsError> {
        match non_blank(&self.jwt_secret) {
            Some(secret) if secret.len() < TOKEN_SECRET_MIN_LEN => {
                Err(SettingsError::SecretTooShort {
                    min: TOKEN_SECRET_MIN_LEN,
                })
            }
            Some(secret) => Ok(Some(Zeroizing::new(secret.as_bytes().to_vec()))),
            None if release => Err(SettingsError::Missing {
                name: "TROVE_JWT_SECRET",
            }),
            None => Ok(None),
        }
    }

    /// Test mode wins; otherwise both keys select the live gateway.
    pub fn payment_mode(&self) -> Result<PaymentMode, SettingsError> {
        let onboarding_base = parse_url(
            "TROVE_PAYMENT_ONBOARDING_URL",
            non_blank(&self.payment_onboarding_url).unwrap_or(DEFAULT_ONBOARDING_URL),
        )?;
        if self.payment_test_mode {
            return Ok(PaymentMode::Simulated { onboarding_base });
        }
        match (
            non_blank(&self.payment_key_id),
            non_blank(&self.payment_key_secret),
        ) {
            (Some(key_id), Some(secret)) => Ok(PaymentMode::Live {
                api_base: parse_url(
                    "TROVE_PAYMENT_API_BASE",
                    non_blank(&self.payment_api_base).unwrap_or(DEFAULT_PAYMENT_API_BASE),
                )?,
                onboarding_base,
                credentials: GatewayCredentials {
                    key_id: key_id.to_owned(),
                    key_secret: Zeroizing::new(secret.to_owned()),
                },
            }),
            (None, None) => Ok(PaymentMode::Unconfigured),
            (Some(_), None) => Err(SettingsError::Missing {
                name: "TROVE_PAYMENT_KEY_SECRET",
            }),
            (None, Some(_)) => Err(SettingsError::Missing {
                name: "TROVE_PAYMENT_KEY_ID",
            }),
        }
    }

    pub fn media_mode(&self) -> Result<MediaMode, SettingsError> {
        match non_blank(&self.media_upload_url) {
            Some(endpoint) => Ok(MediaMode::Http {
                endpoint: parse_url("TROVE_MEDIA_UPLOAD_URL", endpoint)?,
                upload_preset: non_blank(&self.media_upload_preset)
                    .ok_or(SettingsError::Missing {
                        name: "TROVE_MEDIA_UPLOAD_PRESET",
                    })?
                    .to_owned(),
            }),
            None => Ok(MediaMode::Fixture {
                base: parse_url(
                    "TROVE_MEDIA_FIXTURE_BASE",
                    non_blank(&self.media_fixture_base)
                        .unwrap_or(crate::outbound::media::DEFAULT_FIXTURE_MEDIA_BASE),
                )?,
            }),
        }
    }

    /// Shared secret for onboarding callbacks.
    ///
    /// Release builds talking to the live gateway must set one; without it
    /// every callback is refused.
    pub fn webhook_secret(&self, release: bool) -> Result<Option<String>, SettingsError> {
        match non_blank(&self.payment_webhook_secret) {
            Some(secret) => Ok(Some(secret.to_owned())),
            None if release && matches!(self.payment_mode()?, PaymentMode::Live { .. }) => {
                Err(SettingsError::Missing {
                    name: "TROVE_PAYMENT_WEBHOOK_SECRET",
                })
            }
            None => Ok(None),
        }
    }

    pub fn body_limit_bytes(&self) -> usize {
        self.body_limit_bytes.unwrap_or(DEFAULT_BODY_LIMIT_BYTES)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs.unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS).max(1))
    }
}
