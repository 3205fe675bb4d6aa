//! Preview handles for selected files.
//!
//! A handle stands in for the object URL a browser would mint for a local
//! file. The registry tracks which handles are still live so that releasing
//! them on every exit path can be checked.

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

use uuid::Uuid;

/// Opaque `blob:` reference to a selected file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewHandle(String);

impl PreviewHandle {
    pub fn url(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a live handle points at.
#[derive(Debug)]
struct PreviewEntry {
    file_name: String,
    size: usize,
}

#[derive(Debug, Default)]
pub struct PreviewRegistry {
    live: Mutex<HashMap<PreviewHandle, PreviewEntry>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a new handle for `file_name`.
    pub fn create(&self, file_name: &str, size: usize) -> PreviewHandle {
        let handle = PreviewHandle(format!("blob:passport/{}", Uuid::new_v4()));
        self.lock().insert(
            handle.clone(),
            PreviewEntry {
                file_name: file_name.to_string(),
                size,
            },
        );
        tracing::debug!(preview = %handle, file_name, "Preview created");
        handle
    }

    /// Release `handle`. Returns `false` if it was already released.
    pub fn revoke(&self, handle: &PreviewHandle) -> bool {
        match self.lock().remove(handle) {
            Some(entry) => {
                tracing::debug!(
                    preview = %handle,
                    file_name = %entry.file_name,
                    size = entry.size,
                    "Preview released"
                );
                true
            }
            None => false,
        }
    }

    pub fn is_live(&self, handle: &PreviewHandle) -> bool {
        self.lock().contains_key(handle)
    }

    pub fn live_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<PreviewHandle, PreviewEntry>> {
        self.live.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_unique_blob_urls() {
        let registry = PreviewRegistry::new();
        let a = registry.create("a.png", 3);
        let b = registry.create("a.png", 3);

        assert!(a.url().starts_with("blob:passport/"));
        assert_ne!(a, b);
        assert_eq!(registry.live_count(), 2);
        assert!(registry.is_live(&a) && registry.is_live(&b));
    }

    #[test]
    fn revoke_is_idempotent() {
        let registry = PreviewRegistry::new();
        let handle = registry.create("scan.pdf", 10);

        assert!(registry.revoke(&handle));
        assert!(!registry.revoke(&handle));
        assert!(!registry.is_live(&handle));
        assert_eq!(registry.live_count(), 0);
    }
}
