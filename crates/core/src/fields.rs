//! Passport field schema: the five extracted fields and their suggestion lists.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// FieldName
// ---------------------------------------------------------------------------

/// One of the five passport fields.
///
/// The form model is a fixed record, so every per-field lookup goes through
/// this enum instead of a string key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    FirstName,
    LastName,
    DateOfBirth,
    PassportNumber,
    ExpirationDate,
}

impl FieldName {
    /// All fields in form order.
    pub const ALL: [FieldName; 5] = [
        FieldName::FirstName,
        FieldName::LastName,
        FieldName::DateOfBirth,
        FieldName::PassportNumber,
        FieldName::ExpirationDate,
    ];

    /// Wire key used in JSON bodies and model output.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldName::FirstName => "firstName",
            FieldName::LastName => "lastName",
            FieldName::DateOfBirth => "dateOfBirth",
            FieldName::PassportNumber => "passportNumber",
            FieldName::ExpirationDate => "expirationDate",
        }
    }

    /// Human-readable form label.
    pub fn label(self) -> &'static str {
        match self {
            FieldName::FirstName => "First Name",
            FieldName::LastName => "Last Name",
            FieldName::DateOfBirth => "Date of Birth",
            FieldName::PassportNumber => "Passport Number",
            FieldName::ExpirationDate => "Expiration Date",
        }
    }

    /// Example value shown in an empty text input. Date fields show the
    /// configured pattern instead.
    pub fn placeholder(self) -> Option<&'static str> {
        match self {
            FieldName::FirstName => Some("e.g. John"),
            FieldName::LastName => Some("e.g. Doe"),
            FieldName::PassportNumber => Some("e.g. A12345678"),
            FieldName::DateOfBirth | FieldName::ExpirationDate => None,
        }
    }

    pub fn is_date(self) -> bool {
        matches!(self, FieldName::DateOfBirth | FieldName::ExpirationDate)
    }

    /// Required fields must be non-empty; the others may be left blank.
    pub fn is_required(self) -> bool {
        !self.is_date()
    }
}

// ---------------------------------------------------------------------------
// PassportFields
// ---------------------------------------------------------------------------

/// The five extracted (or user-edited) passport values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassportFields {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub passport_number: String,
    pub expiration_date: String,
}

impl PassportFields {
    pub fn get(&self, field: FieldName) -> &str {
        match field {
            FieldName::FirstName => &self.first_name,
            FieldName::LastName => &self.last_name,
            FieldName::DateOfBirth => &self.date_of_birth,
            FieldName::PassportNumber => &self.passport_number,
            FieldName::ExpirationDate => &self.expiration_date,
        }
    }

    pub fn get_mut(&mut self, field: FieldName) -> &mut String {
        match field {
            FieldName::FirstName => &mut self.first_name,
            FieldName::LastName => &mut self.last_name,
            FieldName::DateOfBirth => &mut self.date_of_birth,
            FieldName::PassportNumber => &mut self.passport_number,
            FieldName::ExpirationDate => &mut self.expiration_date,
        }
    }

    pub fn set(&mut self, field: FieldName, value: impl Into<String>) {
        *self.get_mut(field) = value.into();
    }

    /// True when every field is the empty string (the form's blank default).
    pub fn is_blank(&self) -> bool {
        FieldName::ALL.iter().all(|f| self.get(*f).is_empty())
    }
}

// ---------------------------------------------------------------------------
// SuggestionSet
// ---------------------------------------------------------------------------

/// Ordered correction candidates per field. The first entry is the default
/// offered to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionSet {
    #[serde(default)]
    pub first_name_suggestions: Vec<String>,
    #[serde(default)]
    pub last_name_suggestions: Vec<String>,
    #[serde(default)]
    pub date_of_birth_suggestions: Vec<String>,
    #[serde(default)]
    pub passport_number_suggestions: Vec<String>,
    #[serde(default)]
    pub expiration_date_suggestions: Vec<String>,
}

impl SuggestionSet {
    pub fn get(&self, field: FieldName) -> &[String] {
        match field {
            FieldName::FirstName => &self.first_name_suggestions,
            FieldName::LastName => &self.last_name_suggestions,
            FieldName::DateOfBirth => &self.date_of_birth_suggestions,
            FieldName::PassportNumber => &self.passport_number_suggestions,
            FieldName::ExpirationDate => &self.expiration_date_suggestions,
        }
    }

    pub fn get_mut(&mut self, field: FieldName) -> &mut Vec<String> {
        match field {
            FieldName::FirstName => &mut self.first_name_suggestions,
            FieldName::LastName => &mut self.last_name_suggestions,
            FieldName::DateOfBirth => &mut self.date_of_birth_suggestions,
            FieldName::PassportNumber => &mut self.passport_number_suggestions,
            FieldName::ExpirationDate => &mut self.expiration_date_suggestions,
        }
    }

    /// Wire key of the suggestion list for `field`, e.g. `firstNameSuggestions`.
    pub fn key(field: FieldName) -> String {
        format!("{}Suggestions", field.as_str())
    }

    /// Clean up raw model suggestions against the values they were asked about.
    ///
    /// Candidates are trimmed, blanks and duplicates dropped (first occurrence
    /// wins). A field that had a non-empty input value never ends up with an
    /// empty list: its current value becomes the sole suggestion.
    pub fn normalized_against(mut self, current: &PassportFields) -> Self {
        for field in FieldName::ALL {
            let list = self.get_mut(field);
            let mut cleaned: Vec<String> = Vec::with_capacity(list.len());
            for candidate in list.drain(..) {
                let candidate = candidate.trim();
                if !candidate.is_empty() && !cleaned.iter().any(|c| c == candidate) {
                    cleaned.push(candidate.to_string());
                }
            }
            let value = current.get(field);
            if cleaned.is_empty() && !value.is_empty() {
                cleaned.push(value.to_string());
            }
            *list = cleaned;
        }
        self
    }
}
