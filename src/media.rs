use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::info;

use crate::error::AppResult;
use crate::multipart::UploadedFile;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Preview,
}

impl MediaKind {
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            MediaKind::Video => &[".mp4", ".webm", ".ogg"],
            MediaKind::Preview => &[".jpg", ".jpeg", ".png"],
        }
    }

    /// Literal, case-sensitive suffix check on the client file name.
    pub fn accepts(self, file_name: &str) -> bool {
        self.extensions().iter().any(|ext| file_name.ends_with(ext))
    }

    fn label(self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Preview => "preview",
        }
    }
}

/// Two flat directories holding uploaded videos and preview images.
#[derive(Clone, Debug)]
pub struct MediaStore {
    video_dir: PathBuf,
    preview_dir: PathBuf,
}

impl MediaStore {
    pub fn new(video_dir: impl Into<PathBuf>, preview_dir: impl Into<PathBuf>) -> Self {
        Self {
            video_dir: video_dir.into(),
            preview_dir: preview_dir.into(),
        }
    }

    pub fn dir(&self, kind: MediaKind) -> &Path {
        match kind {
            MediaKind::Video => &self.video_dir,
            MediaKind::Preview => &self.preview_dir,
        }
    }

    pub fn path_of(&self, kind: MediaKind, filename: &str) -> PathBuf {
        self.dir(kind).join(filename)
    }

    pub async fn ensure_dirs(&self) -> AppResult<()> {
        fs::create_dir_all(&self.video_dir).await?;
        fs::create_dir_all(&self.preview_dir).await?;
        Ok(())
    }

    pub async fn save_video(&self, file: &UploadedFile) -> AppResult<Option<String>> {
        self.save(MediaKind::Video, file).await
    }

    pub async fn save_preview(&self, file: &UploadedFile) -> AppResult<Option<String>> {
        self.save(MediaKind::Preview, file).await
    }

    pub async fn delete_video(&self, filename: &str) -> AppResult<()> {
        self.delete(MediaKind::Video, filename).await
    }

    pub async fn delete_preview(&self, filename: &str) -> AppResult<()> {
        self.delete(MediaKind::Preview, filename).await
    }

    /// Write `file` as-is under its own name, replacing any existing file.
    /// Returns `None` without touching the disk if the extension is not allowed.
    async fn save(&self, kind: MediaKind, file: &UploadedFile) -> AppResult<Option<String>> {
        let Some(name) = stored_name(&file.file_name) else {
            return Ok(None);
        };
        if !kind.accepts(name) {
            return Ok(None);
        }

        let path = self.path_of(kind, name);
        fs::write(&path, &file.data).await?;

        let size_mb = file.data.len() as f64 / 1024.0 / 1024.0;
        info!("[media] 💾 Saved {} {:?} ({:.2} MB)", kind.label(), path, size_mb);
        Ok(Some(name.to_string()))
    }

    async fn delete(&self, kind: MediaKind, filename: &str) -> AppResult<()> {
        let path = self.path_of(kind, filename);
        fs::remove_file(&path).await?;
        info!("[media] 🗑️  Deleted {} {:?}", kind.label(), path);
        Ok(())
    }
}

/// Final path component of a client-supplied file name.
fn stored_name(file_name: &str) -> Option<&str> {
    file_name
        .rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
}
