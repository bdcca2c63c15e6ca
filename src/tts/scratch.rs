//! Scratch Directory
//!
//! Per-process directory holding in-flight audio files. Each job gets a
//! unique file name and a handle that deletes the file exactly once.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

const FILE_PREFIX: &str = "speech";

#[derive(Debug)]
pub struct ScratchDir {
    root: PathBuf,
    seq: AtomicU64,
}

impl ScratchDir {
    /// Open the scratch directory, creating it if absent.
    pub async fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        tracing::debug!("Scratch directory ready: {}", root.display());
        Ok(Self {
            root,
            seq: AtomicU64::new(0),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reserve a file name for one conversion.
    ///
    /// Names are `speech_<sender>_<millis>_<seq>.<ext>`. The sequence number
    /// keeps two jobs from the same sender in the same millisecond apart.
    pub fn allocate(&self, sender_id: i64, extension: &str) -> ScratchFile {
        let millis = chrono::Utc::now().timestamp_millis();
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let name = format!("{FILE_PREFIX}_{sender_id}_{millis}_{seq}.{extension}");
        ScratchFile {
            path: self.root.join(name),
            removed: false,
        }
    }

    /// Remove the directory if nothing is left in it.
    pub async fn close(&self) {
        match tokio::fs::remove_dir(&self.root).await {
            Ok(()) => tracing::debug!("Removed scratch directory {}", self.root.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::debug!(
                "Scratch directory {} left in place: {}",
                self.root.display(),
                e
            ),
        }
    }
}

/// Handle to one job's audio file.
///
/// `remove` consumes the handle. A handle dropped without `remove` (for
/// example on an early return or a panic) deletes the file synchronously.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
    removed: bool,
}

impl ScratchFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file. Returns whether a file was actually there.
    pub async fn remove(mut self) -> bool {
        self.removed = true;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::debug!("Removed scratch file {}", self.path.display());
                true
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(e) => {
                tracing::warn!(
                    "Failed to remove scratch file {}: {}",
                    self.path.display(),
                    e
                );
                false
            }
        }
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if !self.removed {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}
