//! Transient user notifications

use std::collections::VecDeque;
use std::fmt;

use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Error,
}

/// A short message for the user, shown once and then dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: Level,
    pub title: String,
    pub description: String,
}

impl Notification {
    #[must_use]
    pub fn success(description: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            title: "Success".to_string(),
            description: description.into(),
        }
    }

    #[must_use]
    pub fn error(description: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            title: "Error".to_string(),
            description: description.into(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}

/// Pending notifications, oldest first.
#[derive(Debug, Default)]
pub struct Notifications {
    queue: VecDeque<Notification>,
}

impl Notifications {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notification: Notification) {
        match notification.level {
            Level::Success => info!("{}", notification),
            Level::Error => warn!("{}", notification),
        }
        self.queue.push_back(notification);
    }

    /// Take every pending notification.
    pub fn drain(&mut self) -> Vec<Notification> {
        self.queue.drain(..).collect()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&Notification> {
        self.queue.back()
    }

    /// Pending notifications, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.queue.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }
}
