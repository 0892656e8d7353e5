//! Debounce window for the draft writer. Each change resets the deadline
//! rather than queueing another one, so a burst of edits collapses into a
//! single write once the model has been quiet for the full window.

pub const AUTOSAVE_DEBOUNCE_MS: u64 = 1000;

#[derive(Debug, Clone, Copy)]
pub struct Debounce {
    window_ms: u64,
    deadline: Option<u64>,
}

impl Debounce {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            deadline: None,
        }
    }

    /// Restarts the quiet-period window from `now_ms`.
    pub fn bump(&mut self, now_ms: u64) {
        self.deadline = Some(now_ms + self.window_ms);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn due(&self, now_ms: u64) -> bool {
        matches!(self.deadline, Some(d) if now_ms >= d)
    }

    pub fn clear(&mut self) {
        self.deadline = None;
    }
}

impl Default for Debounce {
    fn default() -> Self {
        Self::new(AUTOSAVE_DEBOUNCE_MS)
    }
}
