//! Output schemas sent with each model request.
//!
//! Written in the OpenAPI subset that `responseSchema` accepts. Both schemas
//! are derived from [`FieldName::ALL`] so they cannot drift from the record
//! types they are parsed into.

use passport_core::{DateConvention, FieldName, SuggestionSet};
use serde_json::{json, Map, Value};

/// Schema for a `PassportFields` object.
pub fn passport_fields_schema(convention: DateConvention) -> Value {
    let mut properties = Map::new();
    for field in FieldName::ALL {
        properties.insert(
            field.as_str().to_string(),
            json!({
                "type": "STRING",
                "description": describe(field, convention),
            }),
        );
    }
    object_schema(properties)
}

/// Schema for a `SuggestionSet` object.
pub fn suggestion_set_schema(convention: DateConvention) -> Value {
    let mut properties = Map::new();
    for field in FieldName::ALL {
        properties.insert(
            SuggestionSet::key(field),
            json!({
                "type": "ARRAY",
                "items": {"type": "STRING"},
                "description": format!(
                    "Candidate values, most likely first. Each is: {}.",
                    describe(field, convention)
                ),
            }),
        );
    }
    object_schema(properties)
}

fn object_schema(properties: Map<String, Value>) -> Value {
    let required: Vec<Value> = properties.keys().cloned().map(Value::String).collect();
    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": required,
    })
}

fn describe(field: FieldName, convention: DateConvention) -> String {
    match field {
        FieldName::FirstName => "Given name(s) as printed on the document".to_string(),
        FieldName::LastName => "Surname as printed on the document".to_string(),
        FieldName::PassportNumber => "Passport number as printed on the document".to_string(),
        FieldName::DateOfBirth => format!("Holder's date of birth, formatted {}", convention.pattern()),
        FieldName::ExpirationDate => {
            format!("Date the passport expires, formatted {}", convention.pattern())
        }
    }
}
