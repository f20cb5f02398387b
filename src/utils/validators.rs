//! Brazilian identifier validation and live formatting.
//!
//! Every function here is a pure, total mapping from a string: validators
//! answer `false` for anything malformed and formatters reshape what they can
//! without ever rejecting input.

use once_cell::sync::Lazy;
use regex::Regex;

/// CPFs made of one repeated digit pass the checksum but are never issued
const DEGENERATE_CPFS: [&str; 10] = [
    "00000000000",
    "11111111111",
    "22222222222",
    "33333333333",
    "44444444444",
    "55555555555",
    "66666666666",
    "77777777777",
    "88888888888",
    "99999999999",
];

const CPF_LENGTH: usize = 11;

static CPF_TEMPLATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{3})(\d{3})(\d{3})(\d{2})").expect("Failed to compile CPF template")
});

static LANDLINE_TEMPLATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2})(\d{4})(\d{4})").expect("Failed to compile landline template")
});

static MOBILE_TEMPLATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2})(\d{5})(\d{4})").expect("Failed to compile mobile template")
});

// Area code digits are both 1-9, then 8 (landline) or 9 (mobile) digits
static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[1-9][1-9]\d{8,9}$").expect("Failed to compile phone regex")
});

// Whitespace as browsers define it: no U+0085, but U+FEFF
const EMAIL_WHITESPACE: &str = concat!(
    r"\t\n\x0B\x0C\r\x20\xA0\x{1680}\x{2000}-\x{200A}",
    r"\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}",
);

// The TLD class is ASCII only; no case-insensitive flag, which would fold in ſ and K
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    let part = format!("[^{EMAIL_WHITESPACE}@]+");
    Regex::new(&format!(r"^{part}@{part}\.[a-zA-Z]{{2,}}$"))
        .expect("Failed to compile email regex")
});

/// Keeps only the ASCII digits of `raw`
pub fn strip_non_digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Computes a CPF check digit over `digits`, the first one weighted by `top_weight`
/// and each following one by one less.
fn check_digit(digits: &[u32], top_weight: u32) -> u32 {
    let sum: u32 = digits
        .iter()
        .zip((2..=top_weight).rev())
        .map(|(digit, weight)| digit * weight)
        .sum();

    match sum % 11 {
        remainder if remainder < 2 => 0,
        remainder => 11 - remainder,
    }
}

/// Checks a CPF number, ignoring any punctuation around the digits.
///
/// The number must have exactly 11 digits, must not be a single repeated
/// digit, and its last two digits must match the mod-11 check digits computed
/// from the preceding ones.
pub fn validate_cpf(raw: &str) -> bool {
    let clean = strip_non_digits(raw);

    if clean.len() != CPF_LENGTH {
        return false;
    }

    if DEGENERATE_CPFS.contains(&clean.as_str()) {
        return false;
    }

    let digits: Vec<u32> = clean.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits[9] != check_digit(&digits[..9], 10) {
        return false;
    }

    digits[10] == check_digit(&digits[..10], 11)
}

/// Masks a CPF as `NNN.NNN.NNN-NN`.
///
/// Fewer than 11 digits are returned bare; digits past the eleventh are kept
/// after the mask.
pub fn format_cpf(raw: &str) -> String {
    let clean = strip_non_digits(raw);
    CPF_TEMPLATE
        .replace(&clean, "${1}.${2}.${3}-${4}")
        .into_owned()
}

/// Checks a national phone number (area code and subscriber number)
pub fn validate_phone(raw: &str) -> bool {
    PHONE_REGEX.is_match(&strip_non_digits(raw))
}

/// Masks a phone number as `(DD) NNNN-NNNN` up to 10 digits, `(DD) NNNNN-NNNN` above.
pub fn format_phone(raw: &str) -> String {
    let clean = strip_non_digits(raw);
    let template = if clean.len() <= 10 {
        &LANDLINE_TEMPLATE
    } else {
        &MOBILE_TEMPLATE
    };

    template.replace(&clean, "(${1}) ${2}-${3}").into_owned()
}

/// Shallow syntactic email check: `local@domain.tld` where the TLD is at
/// least two letters. Numeric TLDs and IDNs are rejected.
pub fn validate_email(raw: &str) -> bool {
    EMAIL_REGEX.is_match(raw)
}
