//! Notice bus built on a tokio broadcast channel.
//!
//! Views subscribe to show toast-style messages; services publish without
//! caring whether anyone is listening.

use community_core::ReactionTarget;
use serde::Serialize;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Transient user-facing message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    /// Reaction target the notice is about, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<ReactionTarget>,
}

impl Notice {
    /// Informational notice
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
            target: None,
        }
    }

    /// Error notice
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
            target: None,
        }
    }

    /// Attach the reaction target
    #[must_use]
    pub fn with_target(mut self, target: ReactionTarget) -> Self {
        self.target = Some(target);
        self
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

/// Publishing side of the notice channel
#[derive(Debug, Clone)]
pub struct NoticeBus {
    sender: broadcast::Sender<Notice>,
}

impl NoticeBus {
    /// Create a bus that buffers up to `capacity` notices per slow subscriber
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish a notice. Returns the number of subscribers that will see it.
    pub fn publish(&self, notice: Notice) -> usize {
        let level = notice.level;
        match self.sender.send(notice) {
            Ok(receivers) => {
                tracing::debug!(?level, receivers, "Published notice");
                receivers
            }
            // nobody is listening
            Err(_) => 0,
        }
    }

    /// Subscribe to notices published from now on
    #[must_use]
    pub fn subscribe(&self) -> NoticeSubscriber {
        NoticeSubscriber {
            receiver: self.sender.subscribe(),
        }
    }

    /// Number of live subscribers
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Receiving side of the notice channel
#[derive(Debug)]
pub struct NoticeSubscriber {
    receiver: broadcast::Receiver<Notice>,
}

impl NoticeSubscriber {
    /// Wait for the next notice. Returns `None` once the bus is dropped.
    ///
    /// Notices overwritten while this subscriber lagged behind are skipped.
    pub async fn recv(&mut self) -> Option<Notice> {
        loop {
            match self.receiver.recv().await {
                Ok(notice) => return Some(notice),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Notice subscriber lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Take the next notice if one is already queued
    pub fn try_recv(&mut self) -> Option<Notice> {
        loop {
            match self.receiver.try_recv() {
                Ok(notice) => return Some(notice),
                Err(TryRecvError::Lagged(_)) => {}
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }

    /// Drain everything queued right now
    pub fn drain(&mut self) -> Vec<Notice> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}
