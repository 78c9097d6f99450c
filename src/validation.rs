use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static DIGITS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());

/// Outcome of checking one input shape.
///
/// `success` is true iff `errors` is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub success: bool,
    pub errors: BTreeMap<String, String>,
}

impl ValidationResult {
    fn ok() -> Self {
        Self {
            success: true,
            errors: BTreeMap::new(),
        }
    }

    fn fail(field: &str, message: &str) -> Self {
        let mut errors = BTreeMap::new();
        errors.insert(field.to_string(), message.to_string());
        Self {
            success: false,
            errors,
        }
    }
}

/// A single declarative constraint on a field value.
#[derive(Debug, Clone, Copy)]
enum Rule {
    Required,
    Digits,
    MinLen(usize),
    MaxLen(usize),
    ExactLen(usize),
}

impl Rule {
    fn violated(&self, value: &str) -> bool {
        match self {
            Rule::Required => value.is_empty(),
            Rule::Digits => !DIGITS_RE.is_match(value),
            Rule::MinLen(n) => value.chars().count() < *n,
            Rule::MaxLen(n) => value.chars().count() > *n,
            Rule::ExactLen(n) => value.chars().count() != *n,
        }
    }
}

/// Evaluate the rules in declaration order. All violations are considered;
/// when several rules on the field fail, the last violated rule's message
/// wins. An empty value only ever reports the required-message.
fn check_field(field: &str, value: &str, rules: &[(Rule, &str)]) -> ValidationResult {
    if value.is_empty() {
        let message = rules
            .iter()
            .find(|(rule, _)| matches!(rule, Rule::Required))
            .map(|(_, message)| *message)
            .unwrap_or("is required");
        return ValidationResult::fail(field, message);
    }
    let mut last = None;
    for (rule, message) in rules {
        if rule.violated(value) {
            last = Some(*message);
        }
    }
    match last {
        Some(message) => ValidationResult::fail(field, message),
        None => ValidationResult::ok(),
    }
}

/// Check a phone number: digits only, 7 to 15 of them.
pub fn validate_phone(phone_number: &str) -> ValidationResult {
    check_field(
        "phoneNumber",
        phone_number,
        &[
            (Rule::Required, "Phone number is required"),
            (Rule::Digits, "Phone number must contain only digits"),
            (Rule::MinLen(7), "Phone number must be at least 7 digits"),
            (Rule::MaxLen(15), "Phone number must be at most 15 digits"),
        ],
    )
}

/// Check a one-time passcode: exactly six decimal digits.
pub fn validate_otp(otp: &str) -> ValidationResult {
    check_field(
        "otp",
        otp,
        &[
            (Rule::Required, "OTP is required"),
            (Rule::ExactLen(6), "OTP must be exactly 6 digits"),
            (Rule::Digits, "OTP must be exactly 6 digits"),
        ],
    )
}

/// Check a chatroom title: present and at most 50 characters.
pub fn validate_chatroom(title: &str) -> ValidationResult {
    check_field(
        "title",
        title,
        &[
            (Rule::Required, "Chatroom title is required"),
            (Rule::MinLen(1), "Chatroom title is required"),
            (Rule::MaxLen(50), "Chatroom title must be at most 50 characters"),
        ],
    )
}
