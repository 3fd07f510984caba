// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// User-facing notifications with de-duplication.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use docscan_core::error::ScanError;
use docscan_core::human_errors::{HumanError, humanize_error};
use tokio::time::Instant;
use tracing::{debug, info};

/// Where user-facing messages end up (a toast, a status line, a log).
pub trait MessageSink: Send + Sync {
    fn show_message(&self, text: &str);
}

/// Sink that writes messages to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl MessageSink for LogSink {
    fn show_message(&self, text: &str) {
        info!(message = text, "notification");
    }
}

/// Forwards messages to a sink, dropping a repeat of the last shown message
/// while it is still inside the window.
pub struct Notifier {
    sink: Arc<dyn MessageSink>,
    window: Duration,
    last: Mutex<Option<(String, Instant)>>,
}

impl Notifier {
    pub fn new(sink: Arc<dyn MessageSink>, window: Duration) -> Self {
        Self {
            sink,
            window,
            last: Mutex::new(None),
        }
    }

    /// Show `text`. Returns `false` when it was suppressed as a repeat.
    pub fn notify(&self, text: &str) -> bool {
        let now = Instant::now();
        let mut last = self.last.lock().expect("notifier lock poisoned");
        if let Some((previous, shown_at)) = last.as_ref()
            && previous == text
            && now.duration_since(*shown_at) < self.window
        {
            debug!(message = text, "duplicate notification suppressed");
            return false;
        }
        *last = Some((text.to_owned(), now));
        drop(last);

        self.sink.show_message(text);
        true
    }

    /// Show the user-facing message for `err` and return it.
    pub fn report(&self, err: &ScanError) -> HumanError {
        let human = humanize_error(err);
        self.notify(&human.message);
        human
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingSink;
    use super::*;

    fn notifier() -> (Arc<RecordingSink>, Notifier) {
        let sink = Arc::new(RecordingSink::default());
        let notifier = Notifier::new(sink.clone(), Duration::from_millis(3500));
        (sink, notifier)
    }

    #[tokio::test(start_paused = true)]
    async fn repeats_inside_the_window_are_suppressed() {
        let (sink, notifier) = notifier();
        assert!(notifier.notify("Connection lost"));
        tokio::time::advance(Duration::from_millis(3000)).await;
        assert!(!notifier.notify("Connection lost"));
        assert_eq!(sink.messages(), vec!["Connection lost"]);
    }

    #[tokio::test(start_paused = true)]
    async fn repeats_after_the_window_are_shown() {
        let (sink, notifier) = notifier();
        notifier.notify("Connection lost");
        tokio::time::advance(Duration::from_millis(3500)).await;
        assert!(notifier.notify("Connection lost"));
        assert_eq!(sink.messages().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn a_different_message_resets_the_window() {
        let (sink, notifier) = notifier();
        notifier.notify("Connection lost");
        notifier.notify("User canceled");
        assert!(notifier.notify("Connection lost"));
        assert_eq!(
            sink.messages(),
            vec!["Connection lost", "User canceled", "Connection lost"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn report_uses_the_stable_message() {
        let (sink, notifier) = notifier();
        let human = notifier.report(&ScanError::MrzRequired);
        assert_eq!(human.message, "Scan MRZ first");
        assert_eq!(sink.messages(), vec!["Scan MRZ first"]);
    }
}
