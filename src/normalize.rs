//! Validation and canonicalization of free-text fields.
//!
//! Stored contact strings keep the leading-space padding the listings sheet
//! has always used; the padding differs between branches and is part of the
//! stored format.

use crate::error::{Field, Reason, ValidationError};

pub const MIN_LOCATION_LEN: usize = 3;

/// Trimmed location, at least [`MIN_LOCATION_LEN`] characters.
pub fn location(raw: &str) -> Result<String, ValidationError> {
    let location = raw.trim();
    if location.chars().count() < MIN_LOCATION_LEN {
        return Err(ValidationError::new(
            Field::Location,
            Reason::TooShort {
                min: MIN_LOCATION_LEN,
            },
        ));
    }
    Ok(location.to_string())
}

/// Price made only of digits, separators and whitespace. Kept as typed.
pub fn price(raw: &str) -> Result<String, ValidationError> {
    let price = raw.trim();
    let valid = !price.is_empty()
        && price
            .chars()
            .all(|c| c.is_ascii_digit() || c == ',' || c == '.' || c.is_whitespace());
    if !valid {
        return Err(ValidationError::new(Field::Price, Reason::InvalidCharacters));
    }
    Ok(price.to_string())
}

/// Phone number from a shared contact. Never fails: unknown shapes are kept raw.
pub fn shared_phone(raw: &str) -> String {
    let digits = digits_only(raw);
    if digits.starts_with("251") && digits.len() == 12 {
        format!(" 0{}", &digits[3..])
    } else if digits.starts_with('9') && digits.len() == 9 {
        format!(" 0{digits}")
    } else if digits.starts_with('0') && digits.len() == 10 {
        format!("  {digits}")
    } else {
        format!("  {raw}")
    }
}

/// Phone number typed by hand: ten digits starting with 0, or nine digits
/// missing the leading zero.
pub fn typed_phone(raw: &str) -> Result<String, ValidationError> {
    let digits = digits_only(raw.trim());
    if digits.len() == 10 && digits.starts_with('0') {
        Ok(format!(" {digits}"))
    } else if digits.len() == 9 {
        Ok(format!(" 0{digits}"))
    } else {
        Err(ValidationError::new(Field::Contact, Reason::BadPhoneFormat))
    }
}

fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}
