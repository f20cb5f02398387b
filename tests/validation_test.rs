//! Integration tests for the identifier checks and masks
//!
//! These go through the crate root the way a form layer would: masking on
//! every keystroke, validating on submit.

use cadastro::form::RegistrationForm;
use cadastro::utils::input_validation::Field;
use cadastro::{format_cpf, format_phone, validate_cpf, validate_email, validate_phone};

#[test]
fn test_known_cpfs() {
    assert!(validate_cpf("52998224725"));
    assert!(!validate_cpf("12345678900"));
}

#[test]
fn test_cpf_needs_exactly_eleven_digits() {
    let wrong_lengths = vec!["", "5", "5299822472", "529982247250", "529.982.247-2"];

    for cpf in wrong_lengths {
        assert!(!validate_cpf(cpf), "CPF {} with wrong length was accepted", cpf);
    }
}

#[test]
fn test_formatted_cpf_is_stable() {
    assert_eq!(format_cpf("111.444.777-35"), "111.444.777-35");
    assert_eq!(format_cpf(&format_cpf("52998224725")), "529.982.247-25");
}

#[test]
fn test_masking_keystroke_by_keystroke() {
    let typed = "52998224725";
    let mut shown = String::new();

    for c in typed.chars() {
        shown.push(c);
        shown = RegistrationForm::mask(Field::Cpf, &shown);
    }

    assert_eq!(shown, "529.982.247-25");
    assert!(validate_cpf(&shown));
}

#[test]
fn test_phone_examples() {
    assert!(validate_phone("1199999999"));
    assert!(!validate_phone("0199999999"));
    assert_eq!(format_phone("11999999999"), "(11) 99999-9999");
    assert_eq!(format_phone("1133334444"), "(11) 3333-4444");
}

#[test]
fn test_masked_phone_still_validates() {
    let numbers = vec!["1133334444", "11999999999", "2187654321"];

    for number in numbers {
        assert!(
            validate_phone(&format_phone(number)),
            "Masked phone {} no longer validates",
            number
        );
    }
}

#[test]
fn test_email_examples() {
    assert!(validate_email("user@example.com"));
    assert!(!validate_email("user@example"));
    assert!(!validate_email("user.example.com"));
}
