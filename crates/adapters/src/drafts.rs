//! Draft store adapters: JSON files on disk and an in-memory map.

use folio_ports::{BoxFuture, DraftKey, DraftStorePort, FormDraft};
use folio_shared::{ErrorCode, ErrorEnvelope, Result};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Stores each draft as `<directory>/<key>.json`.
///
/// Saving an empty draft removes the file. Writes go through a temporary file
/// and a rename so a crash never leaves a half-written draft behind.
#[derive(Debug, Clone)]
pub struct FileDraftStore {
    directory: PathBuf,
}

impl FileDraftStore {
    /// Store drafts under `directory` (created on first save).
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Directory holding draft files.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// File path used for `key`.
    #[must_use]
    pub fn path_for(&self, key: &DraftKey) -> PathBuf {
        self.directory.join(format!("{key}.json"))
    }
}

impl DraftStorePort for FileDraftStore {
    fn load(&self, key: DraftKey) -> BoxFuture<'_, Result<Option<FormDraft>>> {
        let path = self.path_for(&key);
        Box::pin(async move {
            let text = match tokio::fs::read_to_string(&path).await {
                Ok(text) => text,
                Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
                Err(error) => return Err(draft_io_error("read", &path, &error)),
            };
            let draft: FormDraft = serde_json::from_str(&text).map_err(|error| {
                ErrorEnvelope::expected(
                    ErrorCode::new("drafts", "corrupt"),
                    format!("stored draft is not valid: {error}"),
                )
                .with_metadata("path", path.display().to_string())
            })?;
            Ok(Some(draft))
        })
    }

    fn save(&self, key: DraftKey, draft: FormDraft) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            if draft.is_empty() {
                self.clear(key).await?;
                return Ok(());
            }

            let path = self.path_for(&key);
            let staging = self.directory.join(format!(".{key}.json.tmp"));
            let encoded = serde_json::to_string_pretty(&draft).map_err(|error| {
                ErrorEnvelope::invariant(
                    ErrorCode::new("drafts", "encode"),
                    format!("failed to encode draft: {error}"),
                )
            })?;

            tokio::fs::create_dir_all(&self.directory)
                .await
                .map_err(|error| draft_io_error("create directory", &self.directory, &error))?;
            tokio::fs::write(&staging, encoded)
                .await
                .map_err(|error| draft_io_error("write", &staging, &error))?;
            tokio::fs::rename(&staging, &path)
                .await
                .map_err(|error| draft_io_error("rename", &path, &error))?;
            Ok(())
        })
    }

    fn clear(&self, key: DraftKey) -> BoxFuture<'_, Result<bool>> {
        let path = self.path_for(&key);
        Box::pin(async move {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => Ok(true),
                Err(error) if error.kind() == ErrorKind::NotFound => Ok(false),
                Err(error) => Err(draft_io_error("remove", &path, &error)),
            }
        })
    }
}

fn draft_io_error(action: &str, path: &Path, error: &std::io::Error) -> ErrorEnvelope {
    ErrorEnvelope::io(
        ErrorCode::new("drafts", "io"),
        &format!("{action} draft"),
        path,
        error,
    )
}

/// Process-local draft store.
#[derive(Debug, Default)]
pub struct InMemoryDraftStore {
    drafts: Mutex<BTreeMap<DraftKey, FormDraft>>,
}

impl InMemoryDraftStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_drafts<T>(&self, apply: impl FnOnce(&mut BTreeMap<DraftKey, FormDraft>) -> T) -> Result<T> {
        let mut guard = self.drafts.lock().map_err(|_| {
            ErrorEnvelope::invariant(
                ErrorCode::new("drafts", "lock_poisoned"),
                "draft store lock poisoned",
            )
        })?;
        Ok(apply(&mut guard))
    }
}

impl DraftStorePort for InMemoryDraftStore {
    fn load(&self, key: DraftKey) -> BoxFuture<'_, Result<Option<FormDraft>>> {
        Box::pin(async move { self.with_drafts(|drafts| drafts.get(&key).cloned()) })
    }

    fn save(&self, key: DraftKey, draft: FormDraft) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.with_drafts(|drafts| {
                if draft.is_empty() {
                    drafts.remove(&key);
                } else {
                    drafts.insert(key, draft);
                }
            })
        })
    }

    fn clear(&self, key: DraftKey) -> BoxFuture<'_, Result<bool>> {
        Box::pin(async move { self.with_drafts(|drafts| drafts.remove(&key).is_some()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_domain::{ContactFormInput, ContactSubmission};

    fn sample_draft() -> FormDraft {
        FormDraft::from_submission(&ContactSubmission::from(&ContactFormInput {
            name: Some("Ada".to_owned()),
            subject: Some("Hello".to_owned()),
            ..ContactFormInput::default()
        }))
    }

    #[tokio::test]
    async fn in_memory_store_round_trips() -> Result<()> {
        let store = InMemoryDraftStore::new();
        let key = DraftKey::default();

        assert_eq!(store.load(key.clone()).await?, None);
        store.save(key.clone(), sample_draft()).await?;
        assert_eq!(store.load(key.clone()).await?, Some(sample_draft()));
        assert!(store.clear(key.clone()).await?);
        assert!(!store.clear(key).await?);
        Ok(())
    }

    #[tokio::test]
    async fn saving_empty_draft_removes_entry() -> Result<()> {
        let store = InMemoryDraftStore::new();
        let key = DraftKey::default();
        store.save(key.clone(), sample_draft()).await?;
        store.save(key.clone(), FormDraft::default()).await?;
        assert_eq!(store.load(key).await?, None);
        Ok(())
    }

    #[test]
    fn file_path_uses_key_as_stem() -> Result<()> {
        let store = FileDraftStore::new("/var/folio");
        let key = DraftKey::new("contact")?;
        assert_eq!(store.path_for(&key), PathBuf::from("/var/folio/contact.json"));
        Ok(())
    }
}
