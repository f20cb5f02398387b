//! Registration form checks and record management.
//!
//! The heart of the crate is [`utils::validators`]: CPF checksum validation
//! and the live masks for CPF and phone numbers. Around it sit the validated
//! field types, the form gate, a JSON record store and the admin service.

pub mod config;
pub mod consts;
pub mod db;
pub mod form;
pub mod models;
pub mod services;
pub mod utils;

pub use utils::validators::{
    format_cpf, format_phone, validate_cpf, validate_email, validate_phone,
};
