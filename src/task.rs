//! Task registration and uniform dispatch.
//!
//! A [`Task`] is the unit of work attached to a node: a function from the
//! incoming data value to the next one. Rather than inspecting a callable's
//! signature at call time, the capability of a task is declared at
//! registration as a tagged variant over two axes:
//!
//! - sync vs. async execution, and
//! - whether the task receives a [`Progress`] handle for streaming messages.
//!
//! The engine dispatches through [`invoke`](Task::invoke), which presents a
//! single suspension point regardless of the variant: synchronous tasks run
//! inline, asynchronous ones are awaited.
//!
//! # Examples
//!
//! ```
//! use flowgraph::task::Task;
//!
//! // Plain sync transformation.
//! let add_one: Task<i64> = Task::from_fn(|x| Ok(x + 1));
//!
//! // Sync task that also reports progress.
//! let noisy: Task<i64> = Task::from_fn_with_progress(|x, progress| {
//!     progress.emit(format!("seen {x}"));
//!     Ok(x)
//! });
//!
//! // Async task.
//! let doubled: Task<i64> = Task::from_async(|x| async move { Ok(x * 2) });
//! assert!(doubled.is_async());
//! assert!(!doubled.wants_progress());
//! ```

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::progress::Progress;

/// Boxed error produced by a failing task.
///
/// Task failures propagate out of execution unchanged; the engine attaches
/// the node name but never retries, wraps semantics, or swallows.
pub type TaskError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result of one task invocation.
pub type TaskResult<D> = Result<D, TaskError>;

type SyncFn<D> = Arc<dyn Fn(D) -> TaskResult<D> + Send + Sync>;
type SyncProgressFn<D> = Arc<dyn Fn(D, &Progress) -> TaskResult<D> + Send + Sync>;
type AsyncFn<D> = Arc<dyn Fn(D) -> BoxFuture<'static, TaskResult<D>> + Send + Sync>;
type AsyncProgressFn<D> = Arc<dyn Fn(D, Progress) -> BoxFuture<'static, TaskResult<D>> + Send + Sync>;

/// A node's unit of work, tagged by execution capability.
///
/// All variants take the incoming data by value and produce the data handed
/// to the next node (or returned as the final output when the node is a
/// finish point).
pub enum Task<D> {
    /// Synchronous task without progress reporting.
    Sync(SyncFn<D>),
    /// Synchronous task that receives a progress handle.
    SyncWithProgress(SyncProgressFn<D>),
    /// Asynchronous task without progress reporting.
    Async(AsyncFn<D>),
    /// Asynchronous task that receives a progress handle.
    AsyncWithProgress(AsyncProgressFn<D>),
}

impl<D> Clone for Task<D> {
    fn clone(&self) -> Self {
        match self {
            Task::Sync(f) => Task::Sync(Arc::clone(f)),
            Task::SyncWithProgress(f) => Task::SyncWithProgress(Arc::clone(f)),
            Task::Async(f) => Task::Async(Arc::clone(f)),
            Task::AsyncWithProgress(f) => Task::AsyncWithProgress(Arc::clone(f)),
        }
    }
}

impl<D: Send + 'static> Task<D> {
    /// Registers a synchronous task.
    pub fn from_fn(f: impl Fn(D) -> TaskResult<D> + Send + Sync + 'static) -> Self {
        Task::Sync(Arc::new(f))
    }

    /// Registers a synchronous task that streams progress.
    pub fn from_fn_with_progress(
        f: impl Fn(D, &Progress) -> TaskResult<D> + Send + Sync + 'static,
    ) -> Self {
        Task::SyncWithProgress(Arc::new(f))
    }

    /// Registers an asynchronous task.
    pub fn from_async<F, Fut>(f: F) -> Self
    where
        F: Fn(D) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TaskResult<D>> + Send + 'static,
    {
        Task::Async(Arc::new(move |data| f(data).boxed()))
    }

    /// Registers an asynchronous task that streams progress.
    pub fn from_async_with_progress<F, Fut>(f: F) -> Self
    where
        F: Fn(D, Progress) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TaskResult<D>> + Send + 'static,
    {
        Task::AsyncWithProgress(Arc::new(move |data, progress| f(data, progress).boxed()))
    }

    /// Whether this task suspends the engine when invoked.
    #[must_use]
    pub fn is_async(&self) -> bool {
        matches!(self, Task::Async(_) | Task::AsyncWithProgress(_))
    }

    /// Whether this task receives a progress handle.
    #[must_use]
    pub fn wants_progress(&self) -> bool {
        matches!(self, Task::SyncWithProgress(_) | Task::AsyncWithProgress(_))
    }

    /// Runs the task to completion, awaiting asynchronous variants.
    pub(crate) async fn invoke(&self, data: D, progress: &Progress) -> TaskResult<D> {
        match self {
            Task::Sync(f) => f(data),
            Task::SyncWithProgress(f) => f(data, progress),
            Task::Async(f) => f(data).await,
            Task::AsyncWithProgress(f) => f(data, progress.clone()).await,
        }
    }
}

impl<D> fmt::Debug for Task<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variant = match self {
            Task::Sync(_) => "Sync",
            Task::SyncWithProgress(_) => "SyncWithProgress",
            Task::Async(_) => "Async",
            Task::AsyncWithProgress(_) => "AsyncWithProgress",
        };
        f.debug_tuple(variant).finish()
    }
}
