//! Request-scoped temporary storage for uploaded PDFs.
//!
//! A [`TempUpload`] owns exactly one file named `{uuid}_{filename}` inside the
//! configured temp directory. The file is removed when the guard is closed or
//! dropped, whichever comes first, so every exit path of a handler (including
//! a dropped request future) cleans up after itself.

use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

/// Used on disk when the client sent no usable filename.
const FALLBACK_FILENAME: &str = "upload.pdf";

/// Keeps `{uuid}_{name}` under common filesystem name limits.
const MAX_DISK_NAME_BYTES: usize = 200;

/// An uploaded file persisted for the duration of a single request.
#[derive(Debug)]
pub struct TempUpload {
    path: TempPath,
    file: Option<File>,
    bytes_written: u64,
}

impl TempUpload {
    /// Create an empty, uniquely named file in `dir`.
    ///
    /// The file is opened with create-new semantics: a name clash is an error,
    /// never a shared file.
    pub async fn create(dir: &Path, original_filename: &str) -> io::Result<Self> {
        let dir = dir.to_path_buf();
        let prefix = format!("{}_", Uuid::new_v4());
        let suffix = disk_name(original_filename);

        let named = tokio::task::spawn_blocking(move || {
            tempfile::Builder::new()
                .prefix(&prefix)
                .suffix(&suffix)
                .rand_bytes(0)
                .tempfile_in(&dir)
        })
        .await
        .map_err(io::Error::other)??;

        let (file, path) = named.into_parts();
        debug!("Created temporary upload {}", path.display());

        Ok(Self {
            path,
            file: Some(File::from_std(file)),
            bytes_written: 0,
        })
    }

    /// Append one chunk of the upload.
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<()> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::other("upload already finished"))?;
        file.write_all(chunk).await?;
        self.bytes_written += chunk.len() as u64;
        Ok(())
    }

    /// Flush and close the write handle. The file itself stays until the guard goes away.
    pub async fn finish(&mut self) -> io::Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush().await?;
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> u64 {
        self.bytes_written
    }

    pub fn is_empty(&self) -> bool {
        self.bytes_written == 0
    }

    /// Remove the file now, logging instead of failing if that is not possible.
    pub fn close(self) {
        let Self { path, file, .. } = self;
        drop(file);
        let shown = path.display().to_string();
        match path.close() {
            Ok(()) => debug!("Removed temporary upload {}", shown),
            Err(e) => warn!("Failed to remove temporary upload {}: {}", shown, e),
        }
    }
}

/// The on-disk part of an uploaded filename: its last path component only.
pub fn disk_name(original: &str) -> String {
    let name = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    if name.is_empty() || name == "." || name == ".." {
        return FALLBACK_FILENAME.to_string();
    }

    let mut end = name.len().min(MAX_DISK_NAME_BYTES);
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    name[..end].to_string()
}

/// Make sure the temp directory exists, creating it (and parents) if needed.
pub async fn ensure_temp_dir(dir: &Path) -> io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    Ok(dir.to_path_buf())
}
