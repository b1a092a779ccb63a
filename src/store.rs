use std::io::ErrorKind;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tokio::fs;
use tracing::{debug, warn};

use crate::error::AppResult;
use crate::models::VideoRecord;

/// The whole record list lives in one JSON array on disk.
///
/// Every operation reads or rewrites the complete document; there is no
/// locking, so concurrent writers race and the last save wins.
#[derive(Clone, Debug)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create the document with an empty list if it does not exist yet.
    pub async fn ensure_exists(&self) -> AppResult<()> {
        if fs::try_exists(&self.path).await? {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        self.save(&[]).await
    }

    /// Read every record. A missing or unparseable document is reset to `[]`.
    pub async fn load(&self) -> AppResult<Vec<VideoRecord>> {
        let content = match fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("[store] {:?} missing, starting with an empty list", self.path);
                self.save(&[]).await?;
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice::<Vec<VideoRecord>>(&content) {
            Ok(records) => {
                debug!("[store] Loaded {} records", records.len());
                Ok(records)
            }
            Err(e) => {
                warn!("[store] {:?} is not a valid record list ({}), resetting", self.path, e);
                self.save(&[]).await?;
                Ok(Vec::new())
            }
        }
    }

    /// Overwrite the document with `records`, pretty-printed.
    pub async fn save(&self, records: &[VideoRecord]) -> AppResult<()> {
        let mut buf = Vec::new();
        let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        records.serialize(&mut serializer)?;
        fs::write(&self.path, buf).await?;
        debug!("[store] Saved {} records", records.len());
        Ok(())
    }
}

/// First record stored under `filename`.
pub fn find<'a>(records: &'a [VideoRecord], filename: &str) -> Option<&'a VideoRecord> {
    records.iter().find(|v| v.filename == filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(title: &str, filename: &str, preview: Option<&str>) -> VideoRecord {
        VideoRecord {
            title: Some(title.into()),
            filename: filename.into(),
            preview: preview.map(Into::into),
        }
    }

    #[tokio::test]
    async fn save_then_load_preserves_order_and_fields() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("data.json"));
        let records = vec![
            record("Второе", "b.webm", Some("b.png")),
            record("First", "a.mp4", None),
            record("", "c.ogg", None),
        ];

        store.save(&records).await.unwrap();
        assert_eq!(store.load().await.unwrap(), records);
    }

    #[tokio::test]
    async fn saved_document_is_indented_and_keeps_null_preview() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("data.json"));
        store.save(&[record("Demo", "a.mp4", None)]).await.unwrap();

        let text = std::fs::read_to_string(&store.path).unwrap();
        assert!(text.contains("\n        \"title\": \"Demo\""));
        assert!(text.contains("\"preview\": null"));
    }

    #[tokio::test]
    async fn missing_document_loads_empty_and_is_created() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("data.json"));

        assert!(store.load().await.unwrap().is_empty());
        assert_eq!(std::fs::read_to_string(&store.path).unwrap().trim(), "[]");
    }

    #[tokio::test]
    async fn corrupt_document_is_reset() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, "{ not json").unwrap();
        let store = RecordStore::new(&path);

        assert!(store.load().await.unwrap().is_empty());
        assert_eq!(std::fs::read_to_string(&path).unwrap().trim(), "[]");
    }

    #[tokio::test]
    async fn null_title_and_missing_preview_load_as_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, r#"[{"title": null, "filename": "a.mp4"}]"#).unwrap();
        let store = RecordStore::new(&path);

        let records = store.load().await.unwrap();
        assert_eq!(records[0].title, None);
        assert_eq!(records[0].preview, None);
        assert_eq!(records[0].display_title(), "");
    }

    #[tokio::test]
    async fn ensure_exists_keeps_existing_document() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("data.json"));
        store.save(&[record("Demo", "a.mp4", None)]).await.unwrap();

        store.ensure_exists().await.unwrap();
        assert_eq!(store.load().await.unwrap().len(), 1);
    }

    #[test]
    fn find_returns_first_match() {
        let records = vec![
            record("one", "a.mp4", None),
            record("two", "a.mp4", Some("p.png")),
        ];
        assert_eq!(find(&records, "a.mp4").unwrap().display_title(), "one");
        assert!(find(&records, "b.mp4").is_none());
    }
}
