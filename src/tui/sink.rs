//! TUI notice sink: queues notices for the event loop to render.

use std::sync::{Mutex, PoisonError};

use crate::message::{Notice, NoticeSink};

/// Notices waiting for the next frame.
#[derive(Default)]
pub struct TuiSink {
    pending: Mutex<Vec<Notice>>,
}

impl TuiSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all pending notices.
    pub fn drain(&self) -> Vec<Notice> {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *pending)
    }
}

impl NoticeSink for TuiSink {
    fn emit(&self, notice: &Notice) {
        tracing::debug!(notice = notice.text(), "notice");
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_empties_the_queue() {
        let sink = TuiSink::new();
        sink.emit(&Notice::info("one"));
        sink.emit(&Notice::info("two"));
        assert_eq!(sink.drain().len(), 2);
        assert!(sink.drain().is_empty());
    }
}
