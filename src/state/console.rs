// Console state: the observability sink for fetch failures.
// Every report goes to the tracing log and to an in-app message list.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use crate::error::FetchError;

/// Console message level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleLevel {
    Info,
    Error,
}

/// A console message for the activity log.
#[derive(Debug, Clone)]
pub struct ConsoleMessage {
    pub level: ConsoleLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ConsoleMessage {
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(ConsoleLevel::Info, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ConsoleLevel::Error, message)
    }

    fn new(level: ConsoleLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    messages: VecDeque<ConsoleMessage>,
    unread: usize,
}

/// Cloneable handle to the shared console.
#[derive(Debug, Clone, Default)]
pub struct Console {
    inner: Arc<Mutex<Inner>>,
}

impl Console {
    /// Oldest messages are dropped past this many.
    const CAPACITY: usize = 500;

    pub fn new() -> Self {
        Self::default()
    }

    /// Report a fetch failure owned by `source`.
    pub fn report(&self, source: &str, error: &FetchError) {
        tracing::warn!(source, %error, "fetch failed");
        self.push(ConsoleMessage::error(format!("{}: {}", source, error)));
    }

    pub fn info(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!("{}", message);
        self.push(ConsoleMessage::info(message));
    }

    fn push(&self, message: ConsoleMessage) {
        let mut inner = self.lock();
        if inner.messages.len() == Self::CAPACITY {
            inner.messages.pop_front();
        }
        if message.level != ConsoleLevel::Info {
            inner.unread += 1;
        }
        inner.messages.push_back(message);
    }

    /// Snapshot of all messages, oldest first.
    pub fn messages(&self) -> Vec<ConsoleMessage> {
        self.lock().messages.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Count of errors since the console was last viewed.
    pub fn unread(&self) -> usize {
        self.lock().unread
    }

    pub fn mark_read(&self) {
        self.lock().unread = 0;
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
