//! One upload-and-review session.
//!
//! Form state and the current preview handle live behind a single mutex
//! that is never held across an `.await`. Every request carries the ticket
//! issued by the form, so a response that lands after a reset or a newer
//! upload is discarded instead of repopulating the form.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use passport_core::document::mime_type_for_path;
use passport_core::error::DocumentError;
use passport_core::form::{FormError, PassportForm, RequestTicket};
use passport_core::{DateConvention, FieldName, PassportDocument, PassportFields, ResultEnvelope};
use passport_events::{EventBus, Notification};
use passport_pipeline::PassportService;

use crate::preview::{PreviewHandle, PreviewRegistry};

/// Description shown when a selected file cannot be turned into a document.
const FILE_PROCESSING_FAILED: &str = "An unexpected error occurred during file processing.";

#[derive(Debug, thiserror::Error)]
pub enum ProcessorError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error("Failed to serialize passport fields: {0}")]
    Json(#[from] serde_json::Error),
}

/// How an asynchronous step ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The response (success or failure) was applied to the form.
    Applied,
    /// The form moved on while the request was in flight; the response was
    /// dropped.
    Superseded,
}

struct Session {
    form: PassportForm,
    preview: Option<PreviewHandle>,
}

pub struct PassportProcessor<S: PassportService + ?Sized> {
    service: Arc<S>,
    events: Arc<EventBus>,
    previews: Arc<PreviewRegistry>,
    session: Mutex<Session>,
}

impl<S: PassportService + ?Sized> PassportProcessor<S> {
    pub fn new(service: Arc<S>, convention: DateConvention, events: Arc<EventBus>) -> Self {
        Self {
            service,
            events,
            previews: Arc::new(PreviewRegistry::new()),
            session: Mutex::new(Session {
                form: PassportForm::new(convention),
                preview: None,
            }),
        }
    }

    /// Snapshot of the form.
    pub fn form(&self) -> PassportForm {
        self.lock().form.clone()
    }

    /// Preview handle of the currently selected file, if any.
    pub fn preview(&self) -> Option<PreviewHandle> {
        self.lock().preview.clone()
    }

    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    // ---- file selection ----

    /// Select a file from disk and extract its fields.
    ///
    /// Read errors and unsupported file types end the upload with an
    /// `"Error"` notification; they are not returned as `Err`.
    pub async fn select_file(&self, path: impl AsRef<Path>) -> Result<Completion, ProcessorError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let bytes = tokio::fs::read(path).await;
        let size = bytes.as_ref().map(Vec::len).unwrap_or(0);
        let ticket = self.begin_upload(&file_name, size)?;

        let document = match bytes {
            Ok(bytes) => mime_type_for_path(path)
                .ok_or_else(|| DocumentError::UnsupportedMimeType(file_name.clone()).to_string())
                .and_then(|mime| {
                    PassportDocument::from_bytes(mime, &bytes).map_err(|e| e.to_string())
                }),
            Err(e) => Err(e.to_string()),
        };
        self.run_extraction(ticket, document).await
    }

    /// Select an in-memory file and extract its fields.
    pub async fn select_bytes(
        &self,
        file_name: &str,
        mime_type: &str,
        bytes: &[u8],
    ) -> Result<Completion, ProcessorError> {
        let ticket = self.begin_upload(file_name, bytes.len())?;
        let document = PassportDocument::from_bytes(mime_type, bytes).map_err(|e| e.to_string());
        self.run_extraction(ticket, document).await
    }

    /// Clear the form and swap in a fresh preview for the new file.
    fn begin_upload(&self, file_name: &str, size: usize) -> Result<RequestTicket, ProcessorError> {
        let mut session = self.lock();
        let ticket = session.form.begin_upload()?;
        let handle = self.previews.create(file_name, size);
        if let Some(old) = session.preview.replace(handle) {
            self.previews.revoke(&old);
        }
        tracing::info!(file_name, size, "Passport file selected");
        Ok(ticket)
    }

    async fn run_extraction(
        &self,
        ticket: RequestTicket,
        document: Result<PassportDocument, String>,
    ) -> Result<Completion, ProcessorError> {
        let document = match document {
            Ok(document) => document,
            Err(reason) => {
                tracing::error!(error = %reason, "Selected file could not be processed");
                let mut session = self.lock();
                if !applied(session.form.abort_upload(&ticket, reason))? {
                    return Ok(Completion::Superseded);
                }
                self.release_preview(&mut session);
                drop(session);
                self.events
                    .publish(Notification::destructive("Error", FILE_PROCESSING_FAILED));
                return Ok(Completion::Applied);
            }
        };

        if !applied(self.lock().form.attach_document(&ticket, document.clone()))? {
            return Ok(Completion::Superseded);
        }

        let envelope = self.service.request_extraction(&document).await;

        let notification = match &envelope {
            ResultEnvelope::Success { .. } => Notification::info(
                "Extraction Complete",
                "Passport data has been extracted successfully.",
            ),
            ResultEnvelope::Failure { error } => {
                Notification::destructive("Extraction Failed", error.clone())
            }
        };
        if !applied(self.lock().form.complete_extraction(&ticket, envelope))? {
            tracing::debug!("Discarding extraction result for a superseded upload");
            return Ok(Completion::Superseded);
        }
        self.events.publish(notification);
        Ok(Completion::Applied)
    }

    // ---- corrections ----

    /// Ask for correction suggestions for the current values.
    pub async fn suggest_corrections(&self) -> Result<Completion, ProcessorError> {
        let (ticket, fields, document) = self.lock().form.begin_suggestions()?;

        let envelope = self.service.request_suggestions(&fields, &document).await;

        let notification = match &envelope {
            ResultEnvelope::Success { .. } => Notification::info(
                "Suggestions Ready",
                "AI has provided correction suggestions.",
            ),
            ResultEnvelope::Failure { error } => {
                Notification::destructive("Suggestion Failed", error.clone())
            }
        };
        if !applied(self.lock().form.complete_suggestions(&ticket, envelope))? {
            tracing::debug!("Discarding suggestions for a superseded request");
            return Ok(Completion::Superseded);
        }
        self.events.publish(notification);
        Ok(Completion::Applied)
    }

    // ---- editing ----

    pub fn edit(&self, field: FieldName, value: impl Into<String>) -> Result<(), ProcessorError> {
        Ok(self.lock().form.edit(field, value)?)
    }

    pub fn choose_suggestion(&self, field: FieldName, index: usize) -> Result<(), ProcessorError> {
        Ok(self.lock().form.choose_suggestion(field, index)?)
    }

    /// Discard the session and release the preview.
    pub fn reset(&self) {
        let mut session = self.lock();
        session.form.reset();
        self.release_preview(&mut session);
        tracing::debug!("Passport session reset");
    }

    /// Validate the current values and announce them. Nothing is persisted.
    pub fn save(&self) -> Result<PassportFields, ProcessorError> {
        let fields = self.lock().form.save()?;
        let payload = serde_json::to_value(&fields)?;
        let description = serde_json::to_string_pretty(&payload)?;
        self.events.publish(
            Notification::info("Data Saved (Simulated)", description).with_payload(payload),
        );
        Ok(fields)
    }

    /// Hand out the value of `field` for the clipboard. Returns `None` (and
    /// announces nothing) when the field is empty.
    pub fn copy_field(&self, field: FieldName) -> Option<String> {
        let value = self.lock().form.fields().get(field).to_string();
        if value.trim().is_empty() {
            return None;
        }
        self.events.publish(Notification::info(
            format!("{} Copied", field.label()),
            format!("\"{value}\" has been copied to your clipboard."),
        ));
        Some(value)
    }

    // ---- private helpers ----

    fn release_preview(&self, session: &mut Session) {
        if let Some(handle) = session.preview.take() {
            self.previews.revoke(&handle);
        }
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// `Ok(true)` when a ticketed transition went through, `Ok(false)` when the
/// ticket was stale.
fn applied(result: Result<(), FormError>) -> Result<bool, ProcessorError> {
    match result {
        Ok(()) => Ok(true),
        Err(FormError::Stale) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use passport_core::form::{FieldInput, FormPhase};
    use passport_core::SuggestionSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::{broadcast, Notify};

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n";

    fn john() -> PassportFields {
        PassportFields {
            first_name: "JOHN".into(),
            last_name: "D0E".into(),
            date_of_birth: "1990-01-02".into(),
            passport_number: "A1234567".into(),
            expiration_date: "2030-01-02".into(),
        }
    }

    /// Scripted service. When `gated`, extraction waits for `release` after
    /// signalling `entered`.
    struct ScriptedService {
        extraction: ResultEnvelope<PassportFields>,
        suggestions: ResultEnvelope<SuggestionSet>,
        gated: bool,
        entered: Notify,
        release: Notify,
        extraction_calls: AtomicUsize,
        suggestion_calls: AtomicUsize,
    }

    impl ScriptedService {
        fn new(
            extraction: ResultEnvelope<PassportFields>,
            suggestions: ResultEnvelope<SuggestionSet>,
        ) -> Self {
            Self {
                extraction,
                suggestions,
                gated: false,
                entered: Notify::new(),
                release: Notify::new(),
                extraction_calls: AtomicUsize::new(0),
                suggestion_calls: AtomicUsize::new(0),
            }
        }

        fn gated(mut self) -> Self {
            self.gated = true;
            self
        }
    }

    #[async_trait]
    impl PassportService for ScriptedService {
        async fn request_extraction(
            &self,
            _document: &PassportDocument,
        ) -> ResultEnvelope<PassportFields> {
            self.extraction_calls.fetch_add(1, Ordering::SeqCst);
            if self.gated {
                self.entered.notify_one();
                self.release.notified().await;
            }
            self.extraction.clone()
        }

        async fn request_suggestions(
            &self,
            _fields: &PassportFields,
            _document: &PassportDocument,
        ) -> ResultEnvelope<SuggestionSet> {
            self.suggestion_calls.fetch_add(1, Ordering::SeqCst);
            self.suggestions.clone()
        }
    }

    fn suggestions() -> SuggestionSet {
        SuggestionSet {
            first_name_suggestions: vec!["JOHN".into()],
            last_name_suggestions: vec!["DOE".into(), "D0E".into()],
            date_of_birth_suggestions: vec!["1990-01-02".into()],
            passport_number_suggestions: vec!["A1234567".into()],
            expiration_date_suggestions: vec!["2030-01-02".into()],
        }
    }

    fn setup(
        service: ScriptedService,
    ) -> (
        Arc<PassportProcessor<ScriptedService>>,
        Arc<ScriptedService>,
        broadcast::Receiver<Notification>,
    ) {
        let service = Arc::new(service);
        let events = Arc::new(EventBus::default());
        let rx = events.subscribe();
        let processor = Arc::new(PassportProcessor::new(
            Arc::clone(&service),
            DateConvention::Iso,
            events,
        ));
        (processor, service, rx)
    }

    fn titles(rx: &mut broadcast::Receiver<Notification>) -> Vec<String> {
        let mut titles = Vec::new();
        while let Ok(n) = rx.try_recv() {
            titles.push(n.title);
        }
        titles
    }

    #[tokio::test]
    async fn successful_extraction_populates_form() {
        let (processor, _, mut rx) = setup(ScriptedService::new(
            ResultEnvelope::success(john()),
            ResultEnvelope::success(suggestions()),
        ));

        let outcome = processor.select_bytes("scan.png", "image/png", PNG).await.unwrap();

        assert_eq!(outcome, Completion::Applied);
        let form = processor.form();
        assert_eq!(form.phase(), FormPhase::Extracted);
        assert_eq!(form.fields(), &john());
        assert!(form.document().is_some());
        assert!(processor.preview().is_some());
        assert_eq!(processor.previews().live_count(), 1);
        assert_eq!(titles(&mut rx), ["Extraction Complete"]);
    }

    #[tokio::test]
    async fn failed_extraction_keeps_error_and_empty_form() {
        let (processor, _, mut rx) = setup(ScriptedService::new(
            ResultEnvelope::failure("Failed to extract passport data. Please try again."),
            ResultEnvelope::success(suggestions()),
        ));

        processor.select_bytes("scan.png", "image/png", PNG).await.unwrap();

        let form = processor.form();
        assert_eq!(form.phase(), FormPhase::Empty);
        assert_eq!(
            form.error(),
            Some("Failed to extract passport data. Please try again.")
        );
        assert!(form.fields().is_blank());

        let notification = rx.try_recv().unwrap();
        assert_eq!(notification.title, "Extraction Failed");
        assert!(notification.is_destructive());
    }

    #[tokio::test]
    async fn unconvertible_file_releases_preview_and_skips_service() {
        let (processor, service, mut rx) = setup(ScriptedService::new(
            ResultEnvelope::success(john()),
            ResultEnvelope::success(suggestions()),
        ));

        processor.select_bytes("notes.txt", "text/plain", b"hello").await.unwrap();

        assert_eq!(processor.form().phase(), FormPhase::Empty);
        assert!(processor.form().error().is_some());
        assert_eq!(processor.preview(), None);
        assert_eq!(processor.previews().live_count(), 0);
        assert_eq!(service.extraction_calls.load(Ordering::SeqCst), 0);

        let notification = rx.try_recv().unwrap();
        assert_eq!(notification.title, "Error");
        assert_eq!(notification.description, FILE_PROCESSING_FAILED);
    }

    #[tokio::test]
    async fn missing_file_is_reported_as_processing_error() {
        let (processor, _, mut rx) = setup(ScriptedService::new(
            ResultEnvelope::success(john()),
            ResultEnvelope::success(suggestions()),
        ));

        let outcome = processor
            .select_file("/definitely/not/here/passport.png")
            .await
            .unwrap();

        assert_eq!(outcome, Completion::Applied);
        assert_eq!(processor.previews().live_count(), 0);
        assert_eq!(titles(&mut rx), ["Error"]);
    }

    #[tokio::test]
    async fn stale_extraction_after_reset_is_discarded() {
        let (processor, service, mut rx) = setup(
            ScriptedService::new(
                ResultEnvelope::success(john()),
                ResultEnvelope::success(suggestions()),
            )
            .gated(),
        );

        let task = {
            let processor = Arc::clone(&processor);
            tokio::spawn(async move { processor.select_bytes("scan.png", "image/png", PNG).await })
        };

        service.entered.notified().await;
        processor.reset();
        service.release.notify_one();

        let outcome = task.await.unwrap().unwrap();

        assert_eq!(outcome, Completion::Superseded);
        let form = processor.form();
        assert_eq!(form.phase(), FormPhase::Empty);
        assert!(form.fields().is_blank());
        assert_eq!(processor.previews().live_count(), 0);
        assert!(titles(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn new_selection_releases_previous_preview() {
        let (processor, _, _rx) = setup(ScriptedService::new(
            ResultEnvelope::success(john()),
            ResultEnvelope::success(suggestions()),
        ));

        processor.select_bytes("first.png", "image/png", PNG).await.unwrap();
        let first = processor.preview().unwrap();
        processor.select_bytes("second.png", "image/png", PNG).await.unwrap();
        let second = processor.preview().unwrap();

        assert_ne!(first, second);
        assert!(!processor.previews().is_live(&first));
        assert!(processor.previews().is_live(&second));
        assert_eq!(processor.previews().live_count(), 1);

        processor.reset();
        assert_eq!(processor.previews().live_count(), 0);
    }

    #[tokio::test]
    async fn suggestions_switch_fields_to_choices() {
        let (processor, service, mut rx) = setup(ScriptedService::new(
            ResultEnvelope::success(john()),
            ResultEnvelope::success(suggestions()),
        ));
        processor.select_bytes("scan.png", "image/png", PNG).await.unwrap();

        let outcome = processor.suggest_corrections().await.unwrap();

        assert_eq!(outcome, Completion::Applied);
        assert_eq!(service.suggestion_calls.load(Ordering::SeqCst), 1);
        let form = processor.form();
        assert_eq!(form.phase(), FormPhase::Extracted);
        assert_matches!(
            form.affordance(FieldName::LastName),
            FieldInput::Choice { selected: "D0E", .. }
        );

        processor.choose_suggestion(FieldName::LastName, 0).unwrap();
        assert_eq!(processor.form().fields().last_name, "DOE");
        assert_eq!(
            titles(&mut rx),
            ["Extraction Complete", "Suggestions Ready"]
        );
    }

    #[tokio::test]
    async fn suggestion_failure_only_notifies() {
        let (processor, _, mut rx) = setup(ScriptedService::new(
            ResultEnvelope::success(john()),
            ResultEnvelope::failure("Failed to get suggestions. Please try again."),
        ));
        processor.select_bytes("scan.png", "image/png", PNG).await.unwrap();
        titles(&mut rx);

        processor.suggest_corrections().await.unwrap();

        let form = processor.form();
        assert_eq!(form.phase(), FormPhase::Extracted);
        assert!(form.suggestions().is_none());
        assert_eq!(form.error(), None);
        assert_eq!(form.affordance(FieldName::FirstName), FieldInput::Text);

        let notification = rx.try_recv().unwrap();
        assert_eq!(notification.title, "Suggestion Failed");
        assert_eq!(
            notification.description,
            "Failed to get suggestions. Please try again."
        );
    }

    #[tokio::test]
    async fn suggestions_require_an_extraction() {
        let (processor, service, _rx) = setup(ScriptedService::new(
            ResultEnvelope::success(john()),
            ResultEnvelope::success(suggestions()),
        ));

        assert_matches!(
            processor.suggest_corrections().await,
            Err(ProcessorError::Form(FormError::InvalidTransition { .. }))
        );
        assert_eq!(service.suggestion_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn save_announces_fields_as_json() {
        let (processor, _, mut rx) = setup(ScriptedService::new(
            ResultEnvelope::success(john()),
            ResultEnvelope::success(suggestions()),
        ));
        processor.select_bytes("scan.png", "image/png", PNG).await.unwrap();
        processor.edit(FieldName::LastName, "DOE").unwrap();
        titles(&mut rx);

        let saved = processor.save().unwrap();

        assert_eq!(saved.last_name, "DOE");
        let notification = rx.try_recv().unwrap();
        assert_eq!(notification.title, "Data Saved (Simulated)");
        assert!(notification.description.contains("\"lastName\": \"DOE\""));
        assert_eq!(notification.payload.unwrap()["passportNumber"], "A1234567");
        assert_eq!(processor.form().phase(), FormPhase::Extracted);
    }

    #[tokio::test]
    async fn save_rejects_invalid_values_silently() {
        let (processor, _, mut rx) = setup(ScriptedService::new(
            ResultEnvelope::success(john()),
            ResultEnvelope::success(suggestions()),
        ));
        processor.select_bytes("scan.png", "image/png", PNG).await.unwrap();
        processor.edit(FieldName::DateOfBirth, "1990-13-40").unwrap();
        titles(&mut rx);

        assert_matches!(
            processor.save(),
            Err(ProcessorError::Form(FormError::Validation(e))) if e.names(FieldName::DateOfBirth)
        );
        assert!(titles(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn copy_field_announces_non_empty_values() {
        let (processor, _, mut rx) = setup(ScriptedService::new(
            ResultEnvelope::success(john()),
            ResultEnvelope::success(suggestions()),
        ));
        processor.select_bytes("scan.png", "image/png", PNG).await.unwrap();
        processor.edit(FieldName::ExpirationDate, "").unwrap();
        titles(&mut rx);

        assert_eq!(
            processor.copy_field(FieldName::PassportNumber).as_deref(),
            Some("A1234567")
        );
        assert_eq!(processor.copy_field(FieldName::ExpirationDate), None);

        let notification = rx.try_recv().unwrap();
        assert_eq!(notification.title, "Passport Number Copied");
        assert_eq!(
            notification.description,
            "\"A1234567\" has been copied to your clipboard."
        );
        assert!(rx.try_recv().is_err());
    }
}
