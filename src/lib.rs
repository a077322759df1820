//! # flowgraph: a minimal directed-graph workflow engine
//!
//! flowgraph defines and executes directed-graph workflows: named task
//! nodes connected by unconditional or conditional edges, traversed from a
//! designated entry node to one of several finish nodes, with each node
//! optionally streaming textual progress to an observer in real time.
//!
//! ## Core concepts
//!
//! - **Tasks**: sync or async units of work, registered with an explicit
//!   capability descriptor ([`task::Task`])
//! - **Graph**: declarative definition via [`graphs::GraphBuilder`],
//!   validated and frozen by `compile`
//! - **Execution**: single-path sequential traversal on a
//!   [`app::CompiledGraph`], replayable and safe to run concurrently
//! - **Progress**: per-execution callback handle ([`progress::Progress`])
//!   forwarding task messages in emission order
//!
//! ## Quick start
//!
//! ```
//! use flowgraph::graphs::GraphBuilder;
//! use flowgraph::progress::Progress;
//! use flowgraph::task::Task;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // addition -> parity check -> even/odd handler
//! let graph = GraphBuilder::<i64, bool>::new()
//!     .add_node(
//!         "addition",
//!         Task::from_fn_with_progress(|x: i64, progress: &Progress| {
//!             progress.emit(format!("Added 1: {x} -> {}", x + 1));
//!             Ok(x + 1)
//!         }),
//!     )?
//!     .add_node("is_even_check", Task::from_fn(Ok))?
//!     .add_node("even_handler", Task::from_fn(|x| Ok(x)))?
//!     .add_node("odd_handler", Task::from_fn(|x: i64| Ok(-x)))?
//!     .set_entry_point("addition")
//!     .add_edge("addition", "is_even_check")
//!     .add_conditional_edges(
//!         "is_even_check",
//!         |x: &i64| x % 2 == 0,
//!         [(true, "even_handler"), (false, "odd_handler")],
//!     )
//!     .set_finish_point("even_handler")
//!     .set_finish_point("odd_handler")
//!     .compile()?;
//!
//! let (progress, messages) = Progress::channel();
//! let output = graph.execute_with_progress(5, progress).await?;
//! assert_eq!(output, 6);
//! assert_eq!(messages.recv().unwrap(), "Added 1: 5 -> 6");
//! # Ok(())
//! # }
//! ```
//!
//! ## Error handling
//!
//! Errors are rich [`miette::Diagnostic`] types and are never logged and
//! swallowed: `add_node` fails on duplicate names
//! ([`graphs::DuplicateNodeError`]), `compile` reports the violated
//! structural rule ([`graphs::GraphValidationError`]), and execution
//! surfaces routing failures and task errors unchanged
//! ([`app::ExecutionError`]). There is no retry policy anywhere in the
//! engine; resilience belongs to the tasks themselves.
//!
//! ## Module guide
//!
//! - [`types`] - node identifiers
//! - [`task`] - task registration and dispatch
//! - [`progress`] - progress streaming to a caller-supplied callback
//! - [`graphs`] - workflow definition, validation, and compilation
//! - [`app`] - compiled graphs and the execution engine
//! - [`telemetry`] - tracing subscriber setup for demos and tests

pub mod app;
pub mod graphs;
pub mod progress;
pub mod task;
pub mod telemetry;
pub mod types;
