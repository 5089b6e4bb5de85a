use super::errors::{VerifyError, VerifyResult};

/// Normalize a phone number to digits with an optional leading `+`.
///
/// Spaces, dashes, brackets and any `+` that is not the first kept character
/// are dropped. No country-code inference is done: `998901234567` and
/// `+998901234567` stay distinct.
pub fn normalize_phone(input: &str) -> String {
    let mut normalized = String::with_capacity(input.len());
    for c in input.chars() {
        if c.is_ascii_digit() || (c == '+' && normalized.is_empty()) {
            normalized.push(c);
        }
    }
    normalized
}

/// Normalize and reject inputs that carry no digits at all.
pub fn require_phone(input: &str) -> VerifyResult<String> {
    let phone = normalize_phone(input);
    if phone.trim_start_matches('+').is_empty() {
        return Err(VerifyError::validation("phone required"));
    }
    Ok(phone)
}
