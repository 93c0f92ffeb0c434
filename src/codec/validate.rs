//! Primitive field validators shared by every record codec

use chrono::NaiveDateTime;

use crate::error::{Result, SeatwiseError};
use crate::model::whole_seconds;

/// Canonical on-disk timestamp format (ISO-8601, local, no zone)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Accepted input formats, tried in order
const TIMESTAMP_INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Render a timestamp in the canonical format
pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse an ISO-8601 local date-time
///
/// Fractional seconds are accepted and dropped, matching what
/// `format_timestamp` writes back.
pub fn parse_timestamp(field: &str, raw: &str) -> Result<NaiveDateTime> {
    let raw = raw.trim();
    TIMESTAMP_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(whole_seconds)
        .ok_or_else(|| {
            SeatwiseError::validation(
                field,
                format!("'{}' is not a date-time (expected YYYY-MM-DDTHH:MM:SS)", raw),
            )
        })
}

/// Parse a positive integer identifier
pub fn parse_id(field: &str, raw: &str) -> Result<u64> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(SeatwiseError::validation(field, "identifier must be positive")),
        Ok(id) => Ok(id),
        Err(_) => Err(SeatwiseError::validation(
            field,
            format!("'{}' is not a numeric identifier", raw),
        )),
    }
}

/// Check an email address
///
/// Exactly one `@`, a non-empty local part, and a dotted domain with no
/// empty labels. No whitespace anywhere.
pub fn validate_email(field: &str, email: &str) -> Result<()> {
    let invalid = |reason: &str| {
        Err(SeatwiseError::validation(
            field,
            format!("'{}' is not a valid email: {}", email, reason),
        ))
    };

    if email.chars().any(char::is_whitespace) {
        return invalid("contains whitespace");
    }

    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return invalid("must contain exactly one '@'"),
    };

    if local.is_empty() {
        return invalid("missing local part");
    }
    if !domain.contains('.') {
        return invalid("domain must contain a '.'");
    }
    if domain.split('.').any(str::is_empty) {
        return invalid("domain has an empty label");
    }

    Ok(())
}

/// Check a phone number: 7 to 15 digits once common separators are removed
pub fn validate_phone(field: &str, phone: &str) -> Result<()> {
    let mut digits = 0;
    for c in phone.chars() {
        match c {
            '0'..='9' => digits += 1,
            '+' | '-' | '(' | ')' | '.' | ' ' => {}
            _ => {
                return Err(SeatwiseError::validation(
                    field,
                    format!("'{}' contains '{}'", phone, c),
                ))
            }
        }
    }

    if !(7..=15).contains(&digits) {
        return Err(SeatwiseError::validation(
            field,
            format!("'{}' must have 7 to 15 digits", phone),
        ));
    }
    Ok(())
}

/// Reject empty or whitespace-only text
pub fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SeatwiseError::validation(field, "is required"));
    }
    Ok(())
}
