//! Registration form checks.
//!
//! Gates a submission on every field at once and reports one fixed message per
//! failing field, in form order.

use thiserror::Error;

use crate::utils::input_validation::{Cpf, Email, Field, FullName, InvalidInput, Phone};
use crate::utils::validators::{format_cpf, format_phone};

/// Raw values as typed in the form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub cpf: String,
}

/// A form whose every field passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidForm {
    pub name: FullName,
    pub phone: Phone,
    pub email: Email,
    pub cpf: Cpf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
}

impl From<InvalidInput> for FieldError {
    fn from(err: InvalidInput) -> Self {
        Self {
            field: err.field,
            message: message_for(err.field),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", join_messages(.errors))]
pub struct FormErrors {
    pub errors: Vec<FieldError>,
}

impl FormErrors {
    pub fn message(&self, field: Field) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|err| err.field == field)
            .map(|err| err.message)
    }
}

fn join_messages(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|err| err.message)
        .collect::<Vec<_>>()
        .join("; ")
}

/// User-facing message shown under a field that failed validation
pub fn message_for(field: Field) -> &'static str {
    match field {
        Field::Name => "Nome deve ter pelo menos 2 caracteres",
        Field::Phone => "Celular deve ter formato válido (DDD + número)",
        Field::Email => "Email deve terminar com .com ou .empresa",
        Field::Cpf => "CPF inválido",
    }
}

impl RegistrationForm {
    /// Reshapes a keystroke's worth of input for display in `field`
    pub fn mask(field: Field, raw: &str) -> String {
        match field {
            Field::Phone => format_phone(raw),
            Field::Cpf => format_cpf(raw),
            Field::Name | Field::Email => raw.to_owned(),
        }
    }

    pub fn validate(&self) -> Result<ValidForm, FormErrors> {
        let name = FullName::try_from(self.name.as_str());
        let phone = Phone::try_from(self.phone.as_str());
        let email = Email::try_from(self.email.as_str());
        let cpf = Cpf::try_from(self.cpf.as_str());

        match (name, phone, email, cpf) {
            (Ok(name), Ok(phone), Ok(email), Ok(cpf)) => Ok(ValidForm {
                name,
                phone,
                email,
                cpf,
            }),
            (name, phone, email, cpf) => {
                let errors = [name.err(), phone.err(), email.err(), cpf.err()]
                    .into_iter()
                    .flatten()
                    .map(FieldError::from)
                    .collect();
                Err(FormErrors { errors })
            }
        }
    }
}
