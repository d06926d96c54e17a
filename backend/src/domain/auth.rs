//! Credential value objects and the password policy.
//!
//! Passwords are held in [`Zeroizing`] buffers so they are wiped from memory
//! once hashed or verified.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::Error;
use super::user::{AvatarUrl, EmailAddress, PersonName, PhoneNumber, UserValidationError};

/// Minimum password length accepted at registration and password change.
pub const PASSWORD_MIN_LEN: usize = 6;

/// Characters that satisfy the "special character" rule.
pub const PASSWORD_SPECIAL_CHARACTERS: &str = r#"!@#$%^&*()_+-=[]{};':"\|,.<>/?"#;

/// Reasons a password fails the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordPolicyError {
    Empty,
    TooShort { min: usize },
    MissingDigit,
    MissingSpecialCharacter,
}

impl PasswordPolicyError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Empty => "empty_password",
            Self::TooShort { .. } => "password_too_short",
            Self::MissingDigit => "password_missing_digit",
            Self::MissingSpecialCharacter => "password_missing_special",
        }
    }
}

impl fmt::Display for PasswordPolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "password must not be empty"),
            Self::TooShort { min } => write!(f, "password must be at least {min} characters"),
            Self::MissingDigit => write!(f, "password must contain at least one number"),
            Self::MissingSpecialCharacter => {
                write!(f, "password must contain at least one special character")
            }
        }
    }
}

impl std::error::Error for PasswordPolicyError {}

/// Plain-text password held only for the duration of a request.
#[derive(Clone)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Accept any non-empty password, for checking against a stored hash.
    pub fn presented(raw: impl Into<String>) -> Result<Self, PasswordPolicyError> {
        let raw = Zeroizing::new(raw.into());
        if raw.is_empty() {
            return Err(PasswordPolicyError::Empty);
        }
        Ok(Self(raw))
    }

    /// Accept a new password only if it satisfies the policy.
    ///
    /// # Examples
    /// ```
    /// use traveltrove::domain::{Password, PasswordPolicyError};
    ///
    /// assert!(Password::new_checked("trove#2024").is_ok());
    /// assert_eq!(
    ///     Password::new_checked("trove#").err(),
    ///     Some(PasswordPolicyError::MissingDigit)
    /// );
    /// ```
    pub fn new_checked(raw: impl Into<String>) -> Result<Self, PasswordPolicyError> {
        let password = Self::presented(raw)?;
        let text = password.expose();
        if text.chars().count() < PASSWORD_MIN_LEN {
            return Err(PasswordPolicyError::TooShort {
                min: PASSWORD_MIN_LEN,
            });
        }
        if !text.chars().any(|c| c.is_ascii_digit()) {
            return Err(PasswordPolicyError::MissingDigit);
        }
        if !text.chars().any(|c| PASSWORD_SPECIAL_CHARACTERS.contains(c)) {
            return Err(PasswordPolicyError::MissingSpecialCharacter);
        }
        Ok(password)
    }

    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(..)")
    }
}

/// Validated email/password pair presented at login.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Password,
}

impl LoginCredentials {
    /// Build credentials from raw request fields.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, Error> {
        let email = EmailAddress::new(email)?;
        let password = Password::presented(password).map_err(|err| password_error("password", err))?;
        Ok(Self { email, password })
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &Password {
        &self.password
    }
}

/// Role the caller wants to act as for this login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginRole {
    Host,
    Guest,
}

impl FromStr for LoginRole {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "host" => Ok(Self::Host),
            "guest" => Ok(Self::Guest),
            _ => Err(Error::invalid_field(
                "role",
                "invalid_role",
                "role must be either host or guest",
            )),
        }
    }
}

/// Everything needed to open a new account.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: PersonName,
    pub email: EmailAddress,
    pub phone: PhoneNumber,
    pub password: Password,
    pub avatar: Option<AvatarUrl>,
    pub is_host: bool,
}

/// Raw registration fields as received from a client.
#[derive(Debug, Clone, Default)]
pub struct RegistrationParts<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub password: &'a str,
    pub avatar: Option<&'a str>,
    pub is_host: bool,
}

impl Registration {
    /// Validate every registration field, reporting the first failure.
    pub fn try_from_parts(parts: RegistrationParts<'_>) -> Result<Self, Error> {
        let name = PersonName::new(parts.name)?;
        let email = EmailAddress::new(parts.email)?;
        let phone = PhoneNumber::new(parts.phone)?;
        let password =
            Password::new_checked(parts.password).map_err(|err| password_error("password", err))?;
        let avatar = parse_optional_avatar(parts.avatar)?;
        Ok(Self {
            name,
            email,
            phone,
            password,
            avatar,
            is_host: parts.is_host,
        })
    }
}

/// Partial profile update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub name: Option<PersonName>,
    pub phone: Option<PhoneNumber>,
    pub avatar: Option<AvatarUrl>,
}

impl ProfileUpdate {
    pub fn try_from_parts(
        name: Option<&str>,
        phone: Option<&str>,
        avatar: Option<&str>,
    ) -> Result<Self, Error> {
        Ok(Self {
            name: name.map(PersonName::new).transpose()?,
            phone: phone.map(PhoneNumber::new).transpose()?,
            avatar: parse_optional_avatar(avatar)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none() && self.avatar.is_none()
    }
}

/// Request to replace the current password.
#[derive(Debug, Clone)]
pub struct PasswordChange {
    pub current: Password,
    pub replacement: Password,
}

impl PasswordChange {
    pub fn try_from_parts(current: &str, replacement: &str) -> Result<Self, Error> {
        Ok(Self {
            current: Password::presented(current)
                .map_err(|err| password_error("currentPassword", err))?,
            replacement: Password::new_checked(replacement)
                .map_err(|err| password_error("newPassword", err))?,
        })
    }
}

fn parse_optional_avatar(raw: Option<&str>) -> Result<Option<AvatarUrl>, UserValidationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(url) => AvatarUrl::new(url).map(Some),
    }
}

fn password_error(field: &str, err: PasswordPolicyError) -> Error {
    Error::invalid_field(field, err.code(), err.to_string())
}
