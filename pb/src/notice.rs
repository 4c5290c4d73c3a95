//! User notices
//!
//! The prompt controller reports a pending session through the [`Notifier`]
//! seam. [`NoticeBoard`] shows notices as short-lived toasts in the TUI;
//! [`LogNotifier`] only writes them to the log.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info};

/// Most notices kept on the board at once
pub const MAX_NOTICES: usize = 5;

/// Default time a notice stays visible
pub const DEFAULT_NOTICE_DURATION: Duration = Duration::from_millis(3000);

/// Something that can show a short message to the user
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Notifier that only logs
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        info!(%message, "notice");
    }
}

/// A posted notice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub posted: Instant,
}

/// Shared queue of on-screen notices
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    notices: Arc<Mutex<VecDeque<Notice>>>,
    duration: Duration,
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_DURATION)
    }
}

impl NoticeBoard {
    pub fn new(duration: Duration) -> Self {
        debug!(?duration, "NoticeBoard::new: called");
        Self {
            notices: Arc::new(Mutex::new(VecDeque::new())),
            duration,
        }
    }

    /// Messages still visible at `now`, oldest first; expired ones are dropped
    pub fn active(&self, now: Instant) -> Vec<String> {
        let mut notices = self.lock();
        while notices
            .front()
            .is_some_and(|n| now.saturating_duration_since(n.posted) >= self.duration)
        {
            notices.pop_front();
        }
        notices.iter().map(|n| n.message.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Notice>> {
        self.notices.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Notifier for NoticeBoard {
    fn notify(&self, message: &str) {
        debug!(%message, "NoticeBoard::notify: called");
        let mut notices = self.lock();
        if notices.len() >= MAX_NOTICES {
            notices.pop_front();
        }
        notices.push_back(Notice {
            message: message.to_string(),
            posted: Instant::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_and_active() {
        let board = NoticeBoard::new(Duration::from_secs(3));
        assert!(board.is_empty());

        board.notify("first");
        board.notify("second");
        assert_eq!(board.active(Instant::now()), vec!["first", "second"]);
        assert_eq!(board.len(), 2);
    }

    #[test]
    fn test_notices_expire() {
        let board = NoticeBoard::new(Duration::from_millis(100));
        board.notify("short lived");
        let later = Instant::now() + Duration::from_millis(150);
        assert!(board.active(later).is_empty());
        assert!(board.is_empty());
    }

    #[test]
    fn test_board_is_bounded() {
        let board = NoticeBoard::default();
        for i in 0..(MAX_NOTICES + 3) {
            board.notify(&format!("notice {}", i));
        }
        let active = board.active(Instant::now());
        assert_eq!(active.len(), MAX_NOTICES);
        assert_eq!(active[0], "notice 3");
    }

    #[test]
    fn test_log_notifier_as_trait_object() {
        let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);
        notifier.notify("logged only");
    }

    #[test]
    fn test_clones_share_queue() {
        let board = NoticeBoard::default();
        let handle = board.clone();
        handle.notify("shared");
        assert_eq!(board.len(), 1);
        board.clear();
        assert!(handle.is_empty());
    }
}
