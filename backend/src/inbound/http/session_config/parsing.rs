//! Parsers for individual session toggles.

use actix_web::cookie::SameSite;
use mockable::Env;
use tracing::warn;

use super::{BuildMode, DEFAULT_SESSION_TTL_DAYS, SAMESITE_ENV, SessionConfigError, TTL_DAYS_ENV};

const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";
const TTL_EXPECTED: &str = "a whole number of days between 1 and 365";

/// A boolean variable and the value debug builds assume.
pub(super) struct BoolToggle {
    name: &'static str,
    debug_default: bool,
}

impl BoolToggle {
    pub(super) const fn new(name: &'static str, debug_default: bool) -> Self {
        Self {
            name,
            debug_default,
        }
    }
}

/// Debug builds log and fall back; release builds fail with `error`.
pub(super) fn or_default_in_debug<T: std::fmt::Debug>(
    mode: BuildMode,
    fallback: T,
    error: SessionConfigError,
) -> Result<T, SessionConfigError> {
    if mode.is_debug() {
        warn!(error = %error, default = ?fallback, "session toggle defaulted");
        Ok(fallback)
    } else {
        Err(error)
    }
}

pub(super) fn parse_bool_toggle<E: Env>(
    env: &E,
    mode: BuildMode,
    toggle: BoolToggle,
) -> Result<bool, SessionConfigError> {
    let Some(value) = env.string(toggle.name) else {
        return or_default_in_debug(
            mode,
            toggle.debug_default,
            SessionConfigError::MissingEnv { name: toggle.name },
        );
    };
    match parse_bool(&value) {
        Some(flag) => Ok(flag),
        None => or_default_in_debug(
            mode,
            toggle.debug_default,
            SessionConfigError::InvalidEnv {
                name: toggle.name,
                value,
                expected: BOOL_EXPECTED,
            },
        ),
    }
}

pub(super) fn parse_same_site(
    value: String,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" => or_default_in_debug(
            mode,
            SameSite::None,
            SessionConfigError::InsecureSameSiteNone,
        ),
        _ => or_default_in_debug(
            mode,
            SameSite::Lax,
            SessionConfigError::InvalidEnv {
                name: SAMESITE_ENV,
                value,
                expected: SAMESITE_EXPECTED,
            },
        ),
    }
}

/// The lifetime is optional in every build mode.
pub(super) fn parse_ttl_days(
    value: Option<String>,
    mode: BuildMode,
) -> Result<i64, SessionConfigError> {
    let Some(value) = value else {
        return Ok(DEFAULT_SESSION_TTL_DAYS);
    };
    match value.trim().parse::<i64>() {
        Ok(days) if (1..=365).contains(&days) => Ok(days),
        _ => or_default_in_debug(
            mode,
            DEFAULT_SESSION_TTL_DAYS,
            SessionConfigError::InvalidEnv {
                name: TTL_DAYS_ENV,
                value,
                expected: TTL_EXPECTED,
            },
        ),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("YES", Some(true))]
    #[case(" 0 ", Some(false))]
    #[case("maybe", None)]
    #[case("", None)]
    fn bool_spellings(#[case] raw: &str, #[case] expected: Option<bool>) {
        assert_eq!(parse_bool(raw), expected);
    }

    #[rstest]
    #[case(None, Ok(90))]
    #[case(Some("7"), Ok(7))]
    #[case(Some("0"), Err(()))]
    #[case(Some("forever"), Err(()))]
    fn ttl_in_release(#[case] raw: Option<&str>, #[case] expected: Result<i64, ()>) {
        let parsed = parse_ttl_days(raw.map(str::to_owned), BuildMode::Release).map_err(|_| ());
        assert_eq!(parsed, expected);
    }

    #[rstest]
    fn invalid_ttl_defaults_in_debug() {
        assert_eq!(
            parse_ttl_days(Some("-3".into()), BuildMode::Debug).ok(),
            Some(DEFAULT_SESSION_TTL_DAYS)
        );
    }
}
