/// Two-step confirmation for destructive actions.
///
/// Holds the pending target until the user confirms or cancels.
#[derive(Debug, Clone)]
pub struct ConfirmDialog<T> {
    pending: Option<(T, String)>,
}

impl<T> Default for ConfirmDialog<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> ConfirmDialog<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, target: T, message: impl Into<String>) {
        self.pending = Some((target, message.into()));
    }

    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    pub fn message(&self) -> Option<&str> {
        self.pending.as_ref().map(|(_, m)| m.as_str())
    }

    pub fn target(&self) -> Option<&T> {
        self.pending.as_ref().map(|(t, _)| t)
    }

    /// Close and hand back the target to act on.
    pub fn confirm(&mut self) -> Option<T> {
        self.pending.take().map(|(t, _)| t)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
