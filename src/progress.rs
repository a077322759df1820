//! Progress streaming for workflow execution.
//!
//! Tasks may report intermediate textual progress while they run. The engine
//! forwards each message to the caller-supplied [`Progress`] handle
//! synchronously, in the order the task emits them; it never buffers or
//! reorders. When no observer is attached the handle is disabled and
//! [`emit`](Progress::emit) is a no-op, so tasks can emit unconditionally.
//!
//! Concrete transports stay outside the engine: a handle wraps whatever
//! closure the caller provides. Convenience constructors cover the common
//! cases (in-memory channel for tests, stdout for demos).
//!
//! # Examples
//!
//! ```
//! use flowgraph::progress::Progress;
//!
//! let (progress, rx) = Progress::channel();
//! progress.emit("step one");
//! progress.emit("step two");
//! drop(progress);
//!
//! let recorded: Vec<String> = rx.iter().collect();
//! assert_eq!(recorded, vec!["step one".to_string(), "step two".to_string()]);
//! ```

use std::fmt;
use std::sync::Arc;

/// Shared unary string callback invoked once per progress message.
pub type ProgressFn = Arc<dyn Fn(&str) + Send + Sync + 'static>;

/// Handle through which tasks stream progress messages.
///
/// Cloning is cheap (`Arc`); every clone forwards to the same sink. A
/// disabled handle discards messages.
#[derive(Clone, Default)]
pub struct Progress {
    sink: Option<ProgressFn>,
}

impl Progress {
    /// A handle that discards all messages.
    #[must_use]
    pub fn disabled() -> Self {
        Self { sink: None }
    }

    /// Wraps an arbitrary closure as the message sink.
    pub fn sink(f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        Self {
            sink: Some(Arc::new(f)),
        }
    }

    /// A handle paired with a flume receiver that records every message.
    ///
    /// Useful in tests and in async consumers that want to drain messages
    /// on their own schedule. The channel is unbounded; sends never block.
    #[must_use]
    pub fn channel() -> (Self, flume::Receiver<String>) {
        let (tx, rx) = flume::unbounded();
        let progress = Self::sink(move |msg: &str| {
            // Receiver may be dropped early; late messages are discarded.
            let _ = tx.send(msg.to_owned());
        });
        (progress, rx)
    }

    /// A handle that prints each message to stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::sink(|msg: &str| println!("{msg}"))
    }

    /// Whether an observer is attached.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Forwards one message to the sink, if any.
    pub fn emit(&self, message: impl AsRef<str>) {
        if let Some(sink) = &self.sink {
            sink(message.as_ref());
        }
    }
}

impl fmt::Debug for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Progress")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_emit_is_noop() {
        let progress = Progress::disabled();
        assert!(!progress.is_enabled());
        progress.emit("dropped on the floor");
    }

    #[test]
    fn channel_preserves_order() {
        let (progress, rx) = Progress::channel();
        for i in 0..5 {
            progress.emit(format!("msg {i}"));
        }
        drop(progress);
        let recorded: Vec<String> = rx.iter().collect();
        assert_eq!(recorded, (0..5).map(|i| format!("msg {i}")).collect::<Vec<_>>());
    }

    #[test]
    fn clones_share_the_sink() {
        let (progress, rx) = Progress::channel();
        let clone = progress.clone();
        progress.emit("a");
        clone.emit("b");
        drop(progress);
        drop(clone);
        assert_eq!(rx.iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
