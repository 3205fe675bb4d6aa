//! Passport field validator. Pure logic, no side effects.

use crate::dates::DateConvention;
use crate::envelope::ResultEnvelope;
use crate::error::{FieldViolation, ValidationError};
use crate::fields::{FieldName, PassportFields};

/// Validate a passport record against the required-field and date rules.
///
/// - First name, last name and passport number must contain a non-whitespace
///   character.
/// - Date of birth and expiration date must be empty ("unknown") or a real
///   calendar date written in `convention`.
///
/// Every violation is reported, in form order. On success the record is
/// returned unchanged, so validating twice yields the same value.
pub fn validate(
    fields: &PassportFields,
    convention: DateConvention,
) -> Result<PassportFields, ValidationError> {
    let violations: Vec<FieldViolation> = FieldName::ALL
        .into_iter()
        .filter_map(|field| check_field(field, fields.get(field), convention))
        .collect();

    if violations.is_empty() {
        Ok(fields.clone())
    } else {
        Err(ValidationError { violations })
    }
}

/// [`validate`] wrapped in a [`ResultEnvelope`] for callers that branch on a tag.
pub fn validate_envelope(
    fields: &PassportFields,
    convention: DateConvention,
) -> ResultEnvelope<PassportFields> {
    match validate(fields, convention) {
        Ok(f) => ResultEnvelope::success(f),
        Err(e) => ResultEnvelope::failure(e.to_string()),
    }
}

fn check_field(field: FieldName, value: &str, convention: DateConvention) -> Option<FieldViolation> {
    if field.is_required() {
        if value.trim().is_empty() {
            return Some(FieldViolation {
                field,
                message: required_message(field),
            });
        }
        return None;
    }

    if value.is_empty() || convention.is_valid(value) {
        None
    } else {
        Some(FieldViolation {
            field,
            message: format!(
                "{} must be in {} format or empty.",
                sentence_label(field),
                convention.pattern()
            ),
        })
    }
}

fn required_message(field: FieldName) -> String {
    format!("{} is required.", sentence_label(field))
}

/// Label in sentence case, e.g. "Date of birth".
fn sentence_label(field: FieldName) -> String {
    let label = field.label();
    let mut out = String::with_capacity(label.len());
    for (i, word) in label.split(' ').enumerate() {
        if i > 0 {
            out.push(' ');
            out.push_str(&word.to_lowercase());
        } else {
            out.push_str(word);
        }
    }
    out
}
