//! The studio session: one explicit owner for all UI state.
//!
//! Front-ends hold a `Studio` and go through it for every mutation. Nothing
//! here depends on a terminal, so tests drive it directly.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::collaborator::Collaborator;
use crate::controller::{RequestController, Submission};
use crate::error::{ExportError, FieldRejected};
use crate::model::{Disclaimer, Field};
use crate::notification::{NotificationQueue, DEFAULT_DISPLAY_DURATION};
use crate::presentation::PresentationModel;
use crate::sink::{Clipboard, Sink};

/// Knobs for building a session.
#[derive(Debug, Clone)]
pub struct StudioSettings {
    pub download_dir: PathBuf,
    pub notification_duration: Duration,
    pub disclaimer: Disclaimer,
}

impl Default for StudioSettings {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from("."),
            notification_duration: DEFAULT_DISPLAY_DURATION,
            disclaimer: Disclaimer::default(),
        }
    }
}

pub struct Studio {
    controller: RequestController,
    sink: Sink,
    notifications: NotificationQueue,
    disclaimer: Mutex<Disclaimer>,
}

impl Studio {
    pub fn new(
        collaborator: Arc<dyn Collaborator>,
        clipboard: Arc<dyn Clipboard>,
        settings: StudioSettings,
    ) -> Self {
        let notifications = NotificationQueue::with_duration(settings.notification_duration);
        Self {
            controller: RequestController::new(collaborator, notifications.clone()),
            sink: Sink::new(clipboard, settings.download_dir, notifications.clone()),
            notifications,
            disclaimer: Mutex::new(settings.disclaimer),
        }
    }

    pub fn controller(&self) -> &RequestController {
        &self.controller
    }

    pub fn sink(&self) -> &Sink {
        &self.sink
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    pub fn update_field(&self, field: Field, value: &str) -> Result<(), FieldRejected> {
        self.controller.update_field(field, value)
    }

    pub async fn submit(&self) -> Submission {
        self.controller.submit().await
    }

    /// Views over the result currently on screen, if any.
    pub fn presentation(&self) -> Option<PresentationModel> {
        self.controller.displayed_result().map(PresentationModel::new)
    }

    /// Copy the flattened blog. Returns false when there is nothing to copy.
    pub fn copy_document(&self) -> bool {
        match self.presentation() {
            Some(model) => {
                model.document().copy(&self.sink);
                true
            }
            None => false,
        }
    }

    /// Copy the social post. Returns false when there is nothing to copy.
    pub fn copy_social(&self) -> bool {
        match self.presentation() {
            Some(model) => {
                model.social().copy(&self.sink);
                true
            }
            None => false,
        }
    }

    /// Export the blog document. `Ok(None)` when there is nothing to export.
    pub fn export_document(&self, filename: &str) -> Result<Option<PathBuf>, ExportError> {
        match self.presentation() {
            Some(model) => model.document().export(&self.sink, filename).map(Some),
            None => Ok(None),
        }
    }

    pub fn disclaimer(&self) -> String {
        self.lock_disclaimer().as_str().to_string()
    }

    /// Editable at any time, including while a request is in flight.
    pub fn set_disclaimer(&self, text: impl Into<String>) {
        self.lock_disclaimer().set(text);
    }

    pub fn reset_disclaimer(&self) {
        self.lock_disclaimer().reset();
    }

    pub fn dismiss_notification(&self) {
        self.notifications.dismiss();
    }

    fn lock_disclaimer(&self) -> MutexGuard<'_, Disclaimer> {
        self.disclaimer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
