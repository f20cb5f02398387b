//! Wrapper types for registration fields that have been validated.
//!
//! A value of any of these types can only be obtained through `TryFrom`, so
//! holding one is proof that the field passed its check.

use derive_more::derive::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::validators::{
    format_cpf, format_phone, strip_non_digits, validate_cpf, validate_email, validate_phone,
};

const MIN_NAME_LENGTH: usize = 2;

/// A field of the registration form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Field {
    #[display("nome")]
    Name,
    #[display("celular")]
    Phone,
    #[display("email")]
    Email,
    #[display("cpf")]
    Cpf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid {field}")]
pub struct InvalidInput {
    pub field: Field,
}

impl InvalidInput {
    fn on(field: Field) -> Self {
        Self { field }
    }
}

/// Wrapper type for a CPF that has been validated.
///
/// Only the 11 digits are kept; `Display` renders the masked form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cpf(String);

impl Cpf {
    pub fn digits(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Cpf {
    type Error = InvalidInput;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if validate_cpf(value) {
            Ok(Self(strip_non_digits(value)))
        } else {
            Err(InvalidInput::on(Field::Cpf))
        }
    }
}

impl TryFrom<String> for Cpf {
    type Error = InvalidInput;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Cpf> for String {
    fn from(cpf: Cpf) -> Self {
        cpf.0
    }
}

impl std::fmt::Display for Cpf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_cpf(&self.0))
    }
}

/// Wrapper type for a phone number (area code included) that has been validated
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Phone(String);

impl Phone {
    pub fn digits(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Phone {
    type Error = InvalidInput;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if validate_phone(value) {
            Ok(Self(strip_non_digits(value)))
        } else {
            Err(InvalidInput::on(Field::Phone))
        }
    }
}

impl TryFrom<String> for Phone {
    type Error = InvalidInput;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Phone> for String {
    fn from(phone: Phone) -> Self {
        phone.0
    }
}

impl std::fmt::Display for Phone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_phone(&self.0))
    }
}

/// Wrapper type for an email address that passed the syntactic check.
/// Surrounding whitespace is dropped, case is kept as typed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl TryFrom<&str> for Email {
    type Error = InvalidInput;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if validate_email(trimmed) {
            Ok(Self(trimmed.to_owned()))
        } else {
            Err(InvalidInput::on(Field::Email))
        }
    }
}

impl TryFrom<String> for Email {
    type Error = InvalidInput;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Wrapper type for a full name of at least two characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(try_from = "String", into = "String")]
pub struct FullName(String);

impl TryFrom<&str> for FullName {
    type Error = InvalidInput;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if trimmed.chars().count() >= MIN_NAME_LENGTH {
            Ok(Self(trimmed.to_owned()))
        } else {
            Err(InvalidInput::on(Field::Name))
        }
    }
}

impl TryFrom<String> for FullName {
    type Error = InvalidInput;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<FullName> for String {
    fn from(name: FullName) -> Self {
        name.0
    }
}

impl AsRef<str> for FullName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
