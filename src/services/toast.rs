use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ToastVariant {
    #[default]
    Default,
    Destructive,
    Success,
}

/// A user-visible confirmation emitted by a page action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Toast {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub variant: ToastVariant,
    /// Assigned by the sink on emission; FIFO order follows this number.
    pub sequence: u64,
    pub emitted_at: DateTime<Utc>,
}

impl Toast {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: None,
            variant: ToastVariant::Default,
            sequence: 0,
            emitted_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_variant(mut self, variant: ToastVariant) -> Self {
        self.variant = variant;
        self
    }
}

/// Fire-and-forget consumer of toasts. Emitters never wait on display.
pub trait ToastSink: Send + Sync {
    fn emit(&self, toast: Toast);
}

/// In-memory FIFO sink that the presentation layer drains.
#[derive(Default)]
pub struct ToastQueue {
    queue: Mutex<VecDeque<Toast>>,
    next_sequence: AtomicU64,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns every pending toast, oldest first.
    pub fn drain(&self) -> Vec<Toast> {
        self.queue.lock().drain(..).collect()
    }

    pub fn snapshot(&self) -> Vec<Toast> {
        self.queue.lock().iter().cloned().collect()
    }

    pub fn titles(&self) -> Vec<String> {
        self.queue.lock().iter().map(|t| t.title.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }
}

impl ToastSink for ToastQueue {
    fn emit(&self, mut toast: Toast) {
        toast.sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst);
        toast.emitted_at = Utc::now();
        debug!(sequence = toast.sequence, title = %toast.title, "Toast emitted");
        self.queue.lock().push_back(toast);
    }
}
