use serde::{Deserialize, Serialize};

use crate::{config::Config, media::MediaStore, store::RecordStore};

/// One uploaded video as persisted in the JSON document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    /// `None` when the form carried no title field; written as `null`.
    #[serde(default)]
    pub title: Option<String>,
    pub filename: String,
    #[serde(default)]
    pub preview: Option<String>,
}

impl VideoRecord {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }
}

pub struct AppState {
    pub config: Config,
    pub records: RecordStore,
    pub media: MediaStore,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            records: RecordStore::new(&config.data_file),
            media: MediaStore::new(&config.upload_dir, &config.preview_dir),
            config,
        }
    }
}
