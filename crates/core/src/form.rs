//! Editable passport form state machine.
//!
//! ```text
//!            begin_upload            complete_extraction(ok)
//!   Empty ───────────────▶ Extracting ───────────────────────▶ Extracted
//!     ▲                        │                                │    ▲
//!     │   complete_extraction  │                 begin_suggestions   │ complete_suggestions
//!     └──(err) / abort_upload──┘                                ▼    │
//!     ▲                                                       Suggesting
//!     └──────────────────────── reset (any state) ───────────────────┘
//! ```
//!
//! Every asynchronous request is stamped with a [`RequestTicket`]. Reset and
//! new uploads bump the generation, so a response that arrives after its
//! context was discarded is rejected as [`FormError::Stale`] instead of
//! repopulating the form.

use serde::Serialize;

use crate::dates::DateConvention;
use crate::document::PassportDocument;
use crate::envelope::ResultEnvelope;
use crate::error::ValidationError;
use crate::fields::{FieldName, PassportFields, SuggestionSet};
use crate::validation::validate;

/// Lifecycle phase of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormPhase {
    Empty,
    Extracting,
    Extracted,
    Suggesting,
}

/// Which kind of request a ticket belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Extraction,
    Suggestion,
}

/// Correlates an asynchronous response with the form state that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    kind: RequestKind,
    generation: u64,
}

impl RequestTicket {
    pub fn kind(&self) -> RequestKind {
        self.kind
    }
}

/// How a field should be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInput<'a> {
    /// Free-text input.
    Text,
    /// A choice among the model's suggestions.
    Choice {
        options: &'a [String],
        selected: &'a str,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("Cannot {action} while the form is {phase:?}")]
    InvalidTransition {
        phase: FormPhase,
        action: &'static str,
    },

    #[error("Response belongs to a superseded request")]
    Stale,

    #[error("No suggestion #{index} for {}", .field.label())]
    NoSuchSuggestion { field: FieldName, index: usize },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Client-side state for one upload-and-review session.
#[derive(Debug, Clone)]
pub struct PassportForm {
    convention: DateConvention,
    phase: FormPhase,
    generation: u64,
    document: Option<PassportDocument>,
    fields: PassportFields,
    suggestions: Option<SuggestionSet>,
    error: Option<String>,
}

impl PassportForm {
    pub fn new(convention: DateConvention) -> Self {
        Self {
            convention,
            phase: FormPhase::Empty,
            generation: 0,
            document: None,
            fields: PassportFields::default(),
            suggestions: None,
            error: None,
        }
    }

    // ---- accessors ----

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn convention(&self) -> DateConvention {
        self.convention
    }

    pub fn fields(&self) -> &PassportFields {
        &self.fields
    }

    pub fn document(&self) -> Option<&PassportDocument> {
        self.document.as_ref()
    }

    pub fn suggestions(&self) -> Option<&SuggestionSet> {
        self.suggestions.as_ref()
    }

    /// Error message retained from the last failed upload.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether a request is outstanding. The triggering controls stay
    /// disabled while this is true.
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, FormPhase::Extracting | FormPhase::Suggesting)
    }

    /// Whether the form holds extracted values that can be edited.
    pub fn has_extraction(&self) -> bool {
        matches!(self.phase, FormPhase::Extracted | FormPhase::Suggesting)
    }

    /// Input affordance for `field`: a picker once suggestions exist for it,
    /// free text otherwise.
    pub fn affordance(&self, field: FieldName) -> FieldInput<'_> {
        match &self.suggestions {
            Some(set) if !set.get(field).is_empty() => FieldInput::Choice {
                options: set.get(field),
                selected: self.fields.get(field),
            },
            _ => FieldInput::Text,
        }
    }

    // ---- transitions ----

    /// Discard everything and return to `Empty`. Allowed from any phase;
    /// outstanding tickets become stale.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.phase = FormPhase::Empty;
        self.document = None;
        self.fields = PassportFields::default();
        self.suggestions = None;
        self.error = None;
    }

    /// Start a new upload. Clears all previous state first.
    pub fn begin_upload(&mut self) -> Result<RequestTicket, FormError> {
        if self.phase == FormPhase::Extracting {
            return Err(self.invalid("upload a new document"));
        }
        self.reset();
        self.phase = FormPhase::Extracting;
        Ok(self.ticket(RequestKind::Extraction))
    }

    /// Record the converted document for the upload `ticket` belongs to.
    pub fn attach_document(
        &mut self,
        ticket: &RequestTicket,
        document: PassportDocument,
    ) -> Result<(), FormError> {
        self.check(ticket, RequestKind::Extraction)?;
        self.document = Some(document);
        Ok(())
    }

    /// The file could not be turned into a document. The error is retained
    /// and the form returns to `Empty` with blank fields.
    pub fn abort_upload(
        &mut self,
        ticket: &RequestTicket,
        message: impl Into<String>,
    ) -> Result<(), FormError> {
        self.check(ticket, RequestKind::Extraction)?;
        self.fail_to_empty(message.into());
        Ok(())
    }

    /// Apply the extraction result.
    pub fn complete_extraction(
        &mut self,
        ticket: &RequestTicket,
        envelope: ResultEnvelope<PassportFields>,
    ) -> Result<(), FormError> {
        self.check(ticket, RequestKind::Extraction)?;
        match envelope {
            ResultEnvelope::Success { value } => {
                self.fields = value;
                self.error = None;
                self.phase = FormPhase::Extracted;
            }
            ResultEnvelope::Failure { error } => self.fail_to_empty(error),
        }
        Ok(())
    }

    /// Overwrite one field with a user edit. No phase change.
    pub fn edit(&mut self, field: FieldName, value: impl Into<String>) -> Result<(), FormError> {
        if !self.has_extraction() {
            return Err(self.invalid("edit fields"));
        }
        self.fields.set(field, value);
        Ok(())
    }

    /// Pick suggestion `index` for `field`.
    pub fn choose_suggestion(&mut self, field: FieldName, index: usize) -> Result<(), FormError> {
        if !self.has_extraction() {
            return Err(self.invalid("choose a suggestion"));
        }
        let choice = self
            .suggestions
            .as_ref()
            .and_then(|set| set.get(field).get(index))
            .cloned()
            .ok_or(FormError::NoSuchSuggestion { field, index })?;
        self.fields.set(field, choice);
        Ok(())
    }

    /// Start a correction request with the current (possibly edited) values.
    ///
    /// Returns the ticket together with the snapshot to send.
    pub fn begin_suggestions(
        &mut self,
    ) -> Result<(RequestTicket, PassportFields, PassportDocument), FormError> {
        if self.phase != FormPhase::Extracted {
            return Err(self.invalid("request suggestions"));
        }
        let document = self
            .document
            .clone()
            .ok_or_else(|| self.invalid("request suggestions without a document"))?;
        self.phase = FormPhase::Suggesting;
        Ok((
            self.ticket(RequestKind::Suggestion),
            self.fields.clone(),
            document,
        ))
    }

    /// Apply the correction result and return to `Extracted`.
    ///
    /// On success every field with suggestions switches to choice mode,
    /// keeping its current value if it is among the options and taking the
    /// first option otherwise. On failure the suggestions stay unset.
    pub fn complete_suggestions(
        &mut self,
        ticket: &RequestTicket,
        envelope: ResultEnvelope<SuggestionSet>,
    ) -> Result<(), FormError> {
        self.check(ticket, RequestKind::Suggestion)?;
        self.phase = FormPhase::Extracted;
        if let ResultEnvelope::Success { value } = envelope {
            for field in FieldName::ALL {
                let options = value.get(field);
                let current = self.fields.get(field);
                if let Some(first) = options.first() {
                    if !options.iter().any(|o| o == current) {
                        self.fields.set(field, first.clone());
                    }
                }
            }
            self.suggestions = Some(value);
        }
        Ok(())
    }

    /// Validate the current values for the simulated save. No phase change.
    pub fn save(&self) -> Result<PassportFields, FormError> {
        if !self.has_extraction() {
            return Err(self.invalid("save"));
        }
        Ok(validate(&self.fields, self.convention)?)
    }

    // ---- private helpers ----

    fn ticket(&self, kind: RequestKind) -> RequestTicket {
        RequestTicket {
            kind,
            generation: self.generation,
        }
    }

    fn check(&self, ticket: &RequestTicket, kind: RequestKind) -> Result<(), FormError> {
        let expected_phase = match kind {
            RequestKind::Extraction => FormPhase::Extracting,
            RequestKind::Suggestion => FormPhase::Suggesting,
        };
        if ticket.kind != kind || ticket.generation != self.generation || self.phase != expected_phase
        {
            return Err(FormError::Stale);
        }
        Ok(())
    }

    fn fail_to_empty(&mut self, message: String) {
        self.phase = FormPhase::Empty;
        self.document = None;
        self.fields = PassportFields::default();
        self.suggestions = None;
        self.error = Some(message);
    }

    fn invalid(&self, action: &'static str) -> FormError {
        FormError::InvalidTransition {
            phase: self.phase,
            action,
        }
    }
}
