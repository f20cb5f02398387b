//! Field validation and password helpers

pub mod input_validation;
pub mod password_utils;
pub mod validators;
