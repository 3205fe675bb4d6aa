//! Instruction templates and `{placeholder}` rendering.

use std::collections::HashMap;
use std::sync::LazyLock;

use passport_core::{DateConvention, FieldName, PassportFields};

/// Regex matching `{placeholder}` tokens in instruction templates.
static PLACEHOLDER_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"\{(\w+)\}").expect("valid regex"));

/// Instruction for the one-shot extraction call.
pub const EXTRACTION_TEMPLATE: &str = "\
You are an expert at reading passports. Extract the following information from the attached passport image or PDF. \
If the document is blurry and a value cannot be read, leave that field blank instead of guessing.

First Name:
Last Name:
Date of Birth ({date_format}):
Passport Number:
Expiration Date ({date_format}):

Write both dates in {date_format} format.";

/// Instruction for the correction-suggestion call.
pub const CORRECTION_TEMPLATE: &str = "\
You are an assistant that reviews passport data extracted from the attached passport image or PDF.

Given the values below and the document, suggest corrections for each field. \
Look for OCR mistakes such as confused letters and digits or unclear characters. \
If a field already looks correct, return its current value as the only suggestion. \
Order suggestions from most to least likely.

First Name: {first_name}
Last Name: {last_name}
Date of Birth: {date_of_birth}
Passport Number: {passport_number}
Expiration Date: {expiration_date}

Write every date suggestion in {date_format} format.";

/// A template referenced placeholders that had no value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Instruction template has unresolved placeholders: {}", .0.join(", "))]
pub struct PromptError(pub Vec<String>);

/// Substitute `{name}` tokens from `values` in a single pass.
///
/// Substituted text is never re-scanned, so braces inside user-entered
/// values are left alone. Any placeholder without a value fails the render
/// rather than reaching the model verbatim.
pub fn render(template: &str, values: &HashMap<&str, String>) -> Result<String, PromptError> {
    let mut unresolved = Vec::new();
    let text = PLACEHOLDER_RE
        .replace_all(template, |caps: &regex::Captures| {
            let key = &caps[1];
            match values.get(key) {
                Some(value) => value.clone(),
                None => {
                    unresolved.push(key.to_string());
                    caps[0].to_string()
                }
            }
        })
        .into_owned();
    if !unresolved.is_empty() {
        return Err(PromptError(unresolved));
    }
    Ok(text)
}

/// Render the extraction instruction.
pub fn extraction_instruction(convention: DateConvention) -> Result<String, PromptError> {
    let values = HashMap::from([("date_format", convention.pattern().to_string())]);
    render(EXTRACTION_TEMPLATE, &values)
}

/// Render the correction instruction with the current field values.
pub fn correction_instruction(
    fields: &PassportFields,
    convention: DateConvention,
) -> Result<String, PromptError> {
    let mut values: HashMap<&str, String> = FieldName::ALL
        .into_iter()
        .map(|field| (placeholder_key(field), fields.get(field).to_string()))
        .collect();
    values.insert("date_format", convention.pattern().to_string());
    render(CORRECTION_TEMPLATE, &values)
}

fn placeholder_key(field: FieldName) -> &'static str {
    match field {
        FieldName::FirstName => "first_name",
        FieldName::LastName => "last_name",
        FieldName::DateOfBirth => "date_of_birth",
        FieldName::PassportNumber => "passport_number",
        FieldName::ExpirationDate => "expiration_date",
    }
}
