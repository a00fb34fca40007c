//! Transient notifications queued by screens and drained by the renderer.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

/// Shared toast queue. Cloning yields another handle to the same queue.
#[derive(Clone, Default)]
pub struct Toasts {
    queue: Arc<Mutex<VecDeque<Toast>>>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, kind: ToastKind, message: impl Into<String>) {
        let message = message.into();
        if kind == ToastKind::Error {
            tracing::debug!(%message, "Error toast");
        }
        if let Ok(mut queue) = self.queue.lock() {
            queue.push_back(Toast { kind, message });
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(ToastKind::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(ToastKind::Error, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(ToastKind::Info, message);
    }

    /// Everything queued so far, oldest first.
    pub fn drain(&self) -> Vec<Toast> {
        self.queue
            .lock()
            .map(|mut q| q.drain(..).collect())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<Toast> {
        self.queue.lock().ok()?.back().cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().map(|q| q.is_empty()).unwrap_or(true)
    }
}
