//! Transient outcome banners
//!
//! A banner is inserted in the `Entering` phase and switches to `Shown` after
//! the configured show delay. It turns `Leaving` once its visible time,
//! counted from insertion, is up, and is dropped after the remove delay.
//! With the default timing that is 100 ms, 3000 ms and 3300 ms after the
//! push. Every banner runs on its own timer task, so any number of them can
//! be live at once.

use crate::config::NotificationTiming;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Entering,
    Shown,
    Leaving,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub text: String,
    pub level: Level,
    pub phase: Phase,
    pub created_at: DateTime<Utc>,
}

/// Shared handle to the live banners
#[derive(Debug, Clone)]
pub struct Notifier {
    entries: Arc<Mutex<Vec<Notification>>>,
    timing: NotificationTiming,
}

impl Notifier {
    pub fn new(timing: NotificationTiming) -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            timing,
        }
    }

    pub fn success(&self, text: impl Into<String>) -> Uuid {
        self.push(Level::Success, text)
    }

    pub fn error(&self, text: impl Into<String>) -> Uuid {
        self.push(Level::Error, text)
    }

    /// Inserts a banner and starts its timer
    ///
    /// Outside a tokio runtime the banner stays until `dismiss` is called.
    pub fn push(&self, level: Level, text: impl Into<String>) -> Uuid {
        let notification = Notification {
            id: Uuid::new_v4(),
            text: text.into(),
            level,
            phase: Phase::Entering,
            created_at: Utc::now(),
        };
        let id = notification.id;
        debug!(%id, ?level, text = %notification.text, "notification");
        self.lock().push(notification);

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let notifier = self.clone();
                handle.spawn(async move { notifier.run_lifecycle(id).await });
            }
            Err(_) => debug!(%id, "no runtime, notification will not expire"),
        }
        id
    }

    /// Live banners in insertion order
    pub fn snapshot(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drops a banner ahead of its timer
    pub fn dismiss(&self, id: Uuid) -> bool {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|n| n.id != id);
        entries.len() != before
    }

    async fn run_lifecycle(self, id: Uuid) {
        tokio::time::sleep(self.timing.show_delay()).await;
        self.set_phase(id, Phase::Shown);

        // Visible time runs from insertion, not from the switch to Shown
        let remaining = self.timing.visible().saturating_sub(self.timing.show_delay());
        tokio::time::sleep(remaining).await;
        self.set_phase(id, Phase::Leaving);

        tokio::time::sleep(self.timing.remove_delay()).await;
        self.dismiss(id);
    }

    fn set_phase(&self, id: Uuid, phase: Phase) {
        if let Some(entry) = self.lock().iter_mut().find(|n| n.id == id) {
            entry.phase = phase;
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Notification>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(NotificationTiming::default())
    }
}
