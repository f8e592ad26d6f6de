//! Clipboard and file export effects.
//!
//! Both operations end with a notification. Clipboard writes are best-effort
//! and never report failure to the caller; exports report failure both as an
//! error and as a distinct notification.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::cmd_builder::CmdBuilder;
use crate::error::ExportError;
use crate::model::encode_canonical;
use crate::notification::NotificationQueue;

pub const COPY_CONFIRMATION: &str = "Copied to clipboard!";
pub const EXPORT_CONFIRMATION: &str = "JSON file downloaded!";

// =============================================================================
// Clipboard
// =============================================================================

/// Plain-text clipboard target.
pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<()>;
}

/// Writes through whichever platform clipboard tool is installed.
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    tool: Option<CmdBuilder>,
}

impl SystemClipboard {
    /// Probe PATH for a clipboard tool.
    pub fn detect() -> Self {
        let wayland = std::env::var_os("WAYLAND_DISPLAY").is_some();
        let candidates: &[(&str, &[&str])] = &[
            ("pbcopy", &[]),
            ("wl-copy", &[]),
            ("xclip", &["-selection", "clipboard"]),
            ("xsel", &["--clipboard", "--input"]),
            ("clip", &[]),
        ];

        let tool = candidates
            .iter()
            .filter(|(program, _)| *program != "wl-copy" || wayland)
            .find(|(program, _)| which::which(program).is_ok())
            .map(|(program, args)| CmdBuilder::new(*program).args(args.iter().copied()));

        match &tool {
            Some(cmd) => debug!(tool = cmd.program(), "clipboard tool detected"),
            None => debug!("no clipboard tool on PATH"),
        }

        Self { tool }
    }

    pub fn is_available(&self) -> bool {
        self.tool.is_some()
    }
}

impl Clipboard for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        let tool = self
            .tool
            .as_ref()
            .ok_or_else(|| anyhow!("no clipboard tool found"))?;
        tool.run_with_input(text.as_bytes())
    }
}

/// In-process clipboard that remembers every write.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    writes: Arc<Mutex<Vec<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent write
    pub fn contents(&self) -> Option<String> {
        self.history().pop()
    }

    pub fn history(&self) -> Vec<String> {
        self.writes
            .lock()
            .map(|w| w.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        self.writes
            .lock()
            .map_err(|_| anyhow!("clipboard lock poisoned"))?
            .push(text.to_string());
        Ok(())
    }
}

// =============================================================================
// Sink
// =============================================================================

/// Stateless side-effect operations shared by every view.
#[derive(Clone)]
pub struct Sink {
    clipboard: Arc<dyn Clipboard>,
    download_dir: PathBuf,
    notifications: NotificationQueue,
}

impl Sink {
    pub fn new(
        clipboard: Arc<dyn Clipboard>,
        download_dir: impl Into<PathBuf>,
        notifications: NotificationQueue,
    ) -> Self {
        Self {
            clipboard,
            download_dir: download_dir.into(),
            notifications,
        }
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Copy text to the clipboard. Clipboard failures are logged and dropped.
    pub fn copy_text(&self, text: &str) {
        if let Err(e) = self.clipboard.write_text(text) {
            warn!(error = %e, "clipboard write failed");
        } else {
            debug!(len = text.len(), "copied to clipboard");
        }
        self.notifications.enqueue(COPY_CONFIRMATION);
    }

    /// Encode `data` canonically and save it as `filename` in the download
    /// directory. An existing file with that name is left untouched and the
    /// export fails with `ExportError::AlreadyExists`.
    pub fn export_file<T: Serialize + ?Sized>(
        &self,
        data: &T,
        filename: &str,
    ) -> std::result::Result<PathBuf, ExportError> {
        let result = self.write_export(data, filename);
        match &result {
            Ok(path) => {
                info!(path = %path.display(), "exported file");
                self.notifications.enqueue(EXPORT_CONFIRMATION);
            }
            Err(e) => {
                warn!(filename, error = %e, "export failed");
                self.notifications
                    .enqueue(format!("Failed to download {}: {}", filename, e));
            }
        }
        result
    }

    fn write_export<T: Serialize + ?Sized>(
        &self,
        data: &T,
        filename: &str,
    ) -> std::result::Result<PathBuf, ExportError> {
        validate_filename(filename)?;
        let bytes = encode_canonical(data)?;

        // The temp file is removed on drop unless persisted.
        let mut staged = NamedTempFile::new_in(&self.download_dir)?;
        staged.write_all(&bytes)?;
        staged.flush()?;

        let target = self.download_dir.join(filename);
        staged.persist_noclobber(&target).map_err(|e| {
            if e.error.kind() == std::io::ErrorKind::AlreadyExists {
                ExportError::AlreadyExists(filename.to_string())
            } else {
                ExportError::Persist(e)
            }
        })?;
        Ok(target)
    }
}

fn validate_filename(filename: &str) -> std::result::Result<(), ExportError> {
    let invalid = filename.trim().is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains(['/', '\\']);
    if invalid {
        return Err(ExportError::InvalidFilename(filename.to_string()));
    }
    Ok(())
}
