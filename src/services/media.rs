use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use axum::body::Bytes;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

use crate::core::config::Settings;
use crate::core::time::unix_millis_now;

const COVERS_DIR: &str = "img/courses";
const FILES_DIR: &str = "files";
const MAX_NAME_ATTEMPTS: u32 = 1000;

#[derive(Debug, Error)]
pub(crate) enum MediaError {
    #[error("The image width must be at least {0}px")]
    CoverTooNarrow(usize),
    #[error("Image validation failed")]
    UnreadableImage(#[source] imagesize::ImageError),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no free stored name for {0}")]
    NameExhausted(String),
}

/// A file part read from a multipart body.
#[derive(Debug, Clone)]
pub(crate) struct Upload {
    pub(crate) file_name: String,
    pub(crate) bytes: Bytes,
}

/// Names of the files written for one request.
#[derive(Debug, Default)]
pub(crate) struct StoredMedia {
    pub(crate) img: Option<String>,
    pub(crate) files: Vec<String>,
}

impl StoredMedia {
    /// Attachment names in the comma-joined form kept on the course row.
    pub(crate) fn joined_files(&self) -> String {
        self.files.join(",")
    }
}

/// Course covers and attachments on local disk, served under `/public`.
#[derive(Debug, Clone)]
pub(crate) struct MediaStore {
    root: PathBuf,
    min_cover_width: usize,
}

impl MediaStore {
    pub(crate) fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.storage().content_root, settings.storage().min_cover_width)
    }

    pub(crate) fn new(root: impl Into<PathBuf>, min_cover_width: usize) -> Self {
        Self { root: root.into(), min_cover_width }
    }

    pub(crate) fn root(&self) -> &Path {
        &self.root
    }

    pub(crate) fn covers_dir(&self) -> PathBuf {
        self.root.join(COVERS_DIR)
    }

    pub(crate) fn files_dir(&self) -> PathBuf {
        self.root.join(FILES_DIR)
    }

    pub(crate) async fn ensure_dirs(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(self.covers_dir()).await?;
        tokio::fs::create_dir_all(self.files_dir()).await
    }

    /// Reads only the image header; nothing touches the disk.
    pub(crate) fn check_cover(&self, bytes: &[u8]) -> Result<(), MediaError> {
        let size = imagesize::blob_size(bytes).map_err(MediaError::UnreadableImage)?;
        if size.width < self.min_cover_width {
            return Err(MediaError::CoverTooNarrow(self.min_cover_width));
        }
        Ok(())
    }

    /// Writes the cover and attachments. On failure the files already written are removed.
    pub(crate) async fn store(
        &self,
        img: Option<&Upload>,
        files: &[Upload],
    ) -> Result<StoredMedia, MediaError> {
        let millis = unix_millis_now();
        let mut stored = StoredMedia::default();

        if let Some(upload) = img {
            stored.img = Some(write_new_file(&self.covers_dir(), upload, millis).await?);
        }

        for upload in files {
            match write_new_file(&self.files_dir(), upload, millis).await {
                Ok(name) => stored.files.push(name),
                Err(err) => {
                    self.discard(&stored).await;
                    return Err(err);
                }
            }
        }

        Ok(stored)
    }

    /// Drops files written for a request that did not complete.
    pub(crate) async fn discard(&self, stored: &StoredMedia) {
        self.remove_course_media(stored.img.as_deref(), stored.files.iter().map(String::as_str))
            .await;
    }

    /// Removes a course's cover and attachments. Missing files are reported and skipped.
    pub(crate) async fn remove_course_media<'a>(
        &self,
        img: Option<&str>,
        files: impl Iterator<Item = &'a str>,
    ) {
        if let Some(img) = img {
            remove_file(&self.covers_dir(), img, "image").await;
        }

        for name in files {
            remove_file(&self.files_dir(), name, "file").await;
        }
    }
}

/// `<unix-millis>_<name>` with directories stripped and whitespace replaced by `_`.
pub(crate) fn stored_file_name(original: &str, millis: i128) -> String {
    let base = original.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String =
        base.chars().map(|c| if c.is_whitespace() { '_' } else { c }).collect();

    let cleaned = match cleaned.as_str() {
        "" | "." | ".." => "upload".to_string(),
        _ => cleaned,
    };

    format!("{millis}_{cleaned}")
}

/// Never overwrites: a taken name moves the stamp forward one millisecond and retries.
async fn write_new_file(dir: &Path, upload: &Upload, millis: i128) -> Result<String, MediaError> {
    let mut stamp = millis;

    for _ in 0..MAX_NAME_ATTEMPTS {
        let name = stored_file_name(&upload.file_name, stamp);
        let path = dir.join(&name);

        let opened =
            tokio::fs::OpenOptions::new().write(true).create_new(true).open(&path).await;
        let mut file = match opened {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                stamp += 1;
                continue;
            }
            Err(source) => return Err(MediaError::Write { path, source }),
        };

        let written = async {
            file.write_all(&upload.bytes).await?;
            file.flush().await
        }
        .await;

        if let Err(source) = written {
            drop(file);
            let _ = tokio::fs::remove_file(&path).await;
            return Err(MediaError::Write { path, source });
        }

        return Ok(name);
    }

    Err(MediaError::NameExhausted(upload.file_name.clone()))
}

async fn remove_file(dir: &Path, name: &str, kind: &'static str) {
    let Some(file_name) = Path::new(name).file_name() else {
        tracing::warn!(name, kind, "Skipping stored media with an invalid name");
        return;
    };
    let path = dir.join(file_name);

    match tokio::fs::remove_file(&path).await {
        Ok(()) => tracing::debug!(path = %path.display(), kind, "Removed course media"),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), kind, "Course media not found");
        }
        Err(err) => {
            tracing::error!(
                path = %path.display(),
                kind,
                error = %err,
                "Failed to delete course media"
            );
        }
    }
}
