//! User accounts and their validated value objects.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Error;

const NAME_MAX: usize = 80;

/// Validation errors for user-facing account fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    InvalidId,
    EmptyName,
    NameTooLong { max: usize },
    InvalidEmail,
    InvalidPhone,
    InvalidAvatarUrl,
    EmptyPaymentAccount,
    InvalidPaymentAccount,
}

impl UserValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidId => "id",
            Self::EmptyName | Self::NameTooLong { .. } => "name",
            Self::InvalidEmail => "email",
            Self::InvalidPhone => "phone",
            Self::InvalidAvatarUrl => "avatar",
            Self::EmptyPaymentAccount | Self::InvalidPaymentAccount => "paymentAccountId",
        }
    }

    /// Stable machine-readable code for the failure.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidId => "invalid_id",
            Self::EmptyName => "empty_name",
            Self::NameTooLong { .. } => "name_too_long",
            Self::InvalidEmail => "invalid_email",
            Self::InvalidPhone => "invalid_phone",
            Self::InvalidAvatarUrl => "invalid_avatar",
            Self::EmptyPaymentAccount => "empty_payment_account",
            Self::InvalidPaymentAccount => "invalid_payment_account",
        }
    }
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
            Self::InvalidEmail => write!(f, "email address is not valid"),
            Self::InvalidPhone => write!(
                f,
                "phone number must be 7 to 15 digits, spaces, or + - ( ) characters"
            ),
            Self::InvalidAvatarUrl => write!(f, "avatar must be an http or https URL"),
            Self::EmptyPaymentAccount => write!(f, "payment account id must not be empty"),
            Self::InvalidPaymentAccount => {
                write!(f, "payment account id must not contain whitespace")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

impl From<UserValidationError> for Error {
    fn from(err: UserValidationError) -> Self {
        Error::invalid_field(err.field(), err.code(), err.to_string())
    }
}

/// Stable user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Parse an identifier from its hyphenated string form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap a UUID read from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static PHONE_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

fn phone_regex() -> &'static Regex {
    PHONE_RE.get_or_init(|| {
        Regex::new(r"^[0-9+\-() ]{7,15}$")
            .unwrap_or_else(|error| panic!("phone regex failed to compile: {error}"))
    })
}

/// Display name of a person, trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonName(String);

impl PersonName {
    pub fn new(name: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if trimmed.chars().count() > NAME_MAX {
            return Err(UserValidationError::NameTooLong { max: NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

/// Email address, normalised to lower case.
///
/// # Examples
/// ```
/// use traveltrove::domain::EmailAddress;
///
/// let email = EmailAddress::new("  Asha@Example.COM ").unwrap();
/// assert_eq!(email.as_ref(), "asha@example.com");
/// assert!(EmailAddress::new("not-an-email").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = email.as_ref().trim().to_lowercase();
        if !email_regex().is_match(&normalised) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

/// Contact phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn new(phone: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = phone.as_ref().trim();
        if !phone_regex().is_match(trimmed) {
            return Err(UserValidationError::InvalidPhone);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

/// Absolute http(s) URL of a profile picture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvatarUrl(String);

impl AvatarUrl {
    pub fn new(url: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = url.as_ref().trim();
        let parsed = url::Url::parse(trimmed).map_err(|_| UserValidationError::InvalidAvatarUrl)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(UserValidationError::InvalidAvatarUrl);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

/// Linked account identifier at the payment gateway (e.g. `acc_...`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentAccountId(String);

impl PaymentAccountId {
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = id.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyPaymentAccount);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(UserValidationError::InvalidPaymentAccount);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

macro_rules! impl_str_views {
    ($($ty:ident),* $(,)?) => {
        $(
            impl AsRef<str> for $ty {
                fn as_ref(&self) -> &str {
                    self.0.as_str()
                }
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.0)
                }
            }
        )*
    };
}

impl_str_views!(PersonName, EmailAddress, PhoneNumber, AvatarUrl, PaymentAccountId);

/// Registered marketplace user.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub name: PersonName,
    pub email: EmailAddress,
    pub phone: PhoneNumber,
    pub avatar: Option<AvatarUrl>,
    pub is_host: bool,
    pub payment_account: Option<PaymentAccountId>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Whether the user has linked a gateway account for payouts.
    pub fn has_payment_account(&self) -> bool {
        self.payment_account.is_some()
    }

    /// Copy of the user reporting `is_host` as chosen at login.
    ///
    /// Only the presented view changes; authorisation checks always read the
    /// stored flag.
    pub fn viewed_as_host(mut self, is_host: bool) -> Self {
        self.is_host = is_host;
        self
    }
}

/// Argon2 PHC string for a stored password.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    pub fn new(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedPassword(..)")
    }
}

/// A user together with the credential needed to authenticate them.
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub user: User,
    pub password_hash: HashedPassword,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("asha@example.com", true)]
    #[case("ASHA@Example.com", true)]
    #[case("asha@example", false)]
    #[case("asha example@x.com", false)]
    #[case("", false)]
    fn email_validation(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(EmailAddress::new(raw).is_ok(), ok);
    }

    #[rstest]
    #[case("+91 98765 43210", true)]
    #[case("(022) 555-0101", true)]
    #[case("12345", false)]
    #[case("98765abc43", false)]
    #[case("1234567890123456", false)]
    fn phone_validation(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(PhoneNumber::new(raw).is_ok(), ok);
    }

    #[rstest]
    fn name_is_trimmed_and_bounded() {
        assert_eq!(PersonName::new("  Asha ").expect("valid").as_ref(), "Asha");
        assert_eq!(PersonName::new("   "), Err(UserValidationError::EmptyName));
        let long = "x".repeat(NAME_MAX + 1);
        assert_eq!(
            PersonName::new(long),
            Err(UserValidationError::NameTooLong { max: NAME_MAX })
        );
    }

    #[rstest]
    #[case("https://cdn.example.com/a.png", true)]
    #[case("ftp://cdn.example.com/a.png", false)]
    #[case("not a url", false)]
    fn avatar_requires_http_scheme(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(AvatarUrl::new(raw).is_ok(), ok);
    }

    #[rstest]
    fn payment_account_rejects_whitespace() {
        assert!(PaymentAccountId::new("acc_123").is_ok());
        assert_eq!(
            PaymentAccountId::new("acc 123"),
            Err(UserValidationError::InvalidPaymentAccount)
        );
        assert_eq!(
            PaymentAccountId::new(" "),
            Err(UserValidationError::EmptyPaymentAccount)
        );
    }

    #[rstest]
    fn user_id_rejects_padding() {
        assert_eq!(
            UserId::new(" 3fa85f64-5717-4562-b3fc-2c963f66afa6"),
            Err(UserValidationError::InvalidId)
        );
    }

    #[rstest]
    fn validation_error_maps_to_field_details() {
        let error: Error = UserValidationError::InvalidPhone.into();
        let details = error.details().expect("details");
        assert_eq!(details["field"], "phone");
        assert_eq!(details["code"], "invalid_phone");
    }
}
