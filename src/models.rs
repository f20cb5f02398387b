//! Data model of submitted registrations

use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;
use uuid::Uuid;

use crate::utils::input_validation::{Cpf, Email, FullName, Phone};

/// A unique registration record identifier
#[derive(
    Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord, Display,
)]
pub struct RecordID(Uuid);

impl RecordID {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RecordID {
    fn default() -> Self {
        Self::new()
    }
}

/// A submitted registration.
///
/// The registration number is the sequential number handed back to the
/// person who registered.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Display)]
#[display("#{registration_number} {name} - CPF {cpf}")]
pub struct Registration {
    pub id: RecordID,
    pub name: FullName,
    pub phone: Phone,
    pub email: Email,
    pub cpf: Cpf,
    pub registration_number: u64,
}

/// Which fields a dashboard search looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, Display)]
pub enum SearchFilter {
    #[default]
    #[display("Todos")]
    All,
    #[display("CPF")]
    Cpf,
    #[display("Email")]
    Email,
    #[display("Número de registro")]
    Number,
}

impl Registration {
    /// Tells if this record matches a dashboard search term.
    ///
    /// CPF and phone are compared in their masked form, name and email
    /// case-insensitively. An empty term matches everything.
    pub fn matches(&self, filter: SearchFilter, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }

        let lowered = term.to_lowercase();
        let name_matches = || self.name.as_ref().to_lowercase().contains(&lowered);
        let email_matches = || self.email.as_ref().to_lowercase().contains(&lowered);
        let cpf_matches = || self.cpf.to_string().contains(term);

        match filter {
            SearchFilter::Cpf => cpf_matches(),
            SearchFilter::Email => email_matches(),
            SearchFilter::Number => self.registration_number.to_string().contains(term),
            SearchFilter::All => {
                name_matches()
                    || email_matches()
                    || cpf_matches()
                    || self.phone.to_string().contains(term)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Registration {
        Registration {
            id: RecordID::new(),
            name: FullName::try_from("Maria da Silva").unwrap(),
            phone: Phone::try_from("11999998888").unwrap(),
            email: Email::try_from("Maria@Example.com").unwrap(),
            cpf: Cpf::try_from("52998224725").unwrap(),
            registration_number: 42,
        }
    }

    #[test]
    fn test_empty_term_matches() {
        assert!(sample().matches(SearchFilter::Number, ""));
    }

    #[test]
    fn test_search_by_cpf_uses_mask() {
        let record = sample();
        assert!(record.matches(SearchFilter::Cpf, "529.982"));
        assert!(!record.matches(SearchFilter::Cpf, "529982"));
    }

    #[test]
    fn test_search_by_email_ignores_case() {
        let record = sample();
        assert!(record.matches(SearchFilter::Email, "maria@EXAMPLE"));
        assert!(!record.matches(SearchFilter::Email, "silva"));
    }

    #[test]
    fn test_search_by_number() {
        let record = sample();
        assert!(record.matches(SearchFilter::Number, "4"));
        assert!(!record.matches(SearchFilter::Number, "7"));
    }

    #[test]
    fn test_search_all_fields() {
        let record = sample();
        let matching = vec!["silva", "example.com", "247-25", "(11) 99999"];

        for term in matching {
            assert!(
                record.matches(SearchFilter::All, term),
                "Term {} should match",
                term
            );
        }

        assert!(!record.matches(SearchFilter::All, "42"));
    }

    #[test]
    fn test_display() {
        assert_eq!(sample().to_string(), "#42 Maria da Silva - CPF 529.982.247-25");
    }
}
