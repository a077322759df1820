//! Graph definition and compilation for workflow execution.
//!
//! The entry point is [`GraphBuilder`]: a mutable definition object that
//! accumulates nodes, edges, conditional edges, the entry point, and finish
//! points, and freezes into an immutable
//! [`CompiledGraph`](crate::app::CompiledGraph) through
//! [`compile`](GraphBuilder::compile).
//!
//! # Core concepts
//!
//! - **Nodes**: named units of work carrying a [`Task`](crate::task::Task)
//! - **Edges**: unconditional transitions between two nodes
//! - **Conditional edges**: transitions selected by a decision function
//!   over a key-to-target path map
//! - **Entry point / finish points**: where traversal begins and ends
//! - **Compilation**: validation and one-way conversion into the executable
//!   form
//!
//! # Quick start
//!
//! ```
//! use flowgraph::graphs::GraphBuilder;
//! use flowgraph::task::Task;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let graph = GraphBuilder::<i64>::new()
//!     .add_node("double", Task::from_fn(|x| Ok(x * 2)))?
//!     .set_entry_point("double")
//!     .set_finish_point("double")
//!     .compile()?;
//!
//! assert_eq!(graph.execute(21).await?, 42);
//! # Ok(())
//! # }
//! ```

mod builder;
mod compilation;
mod edges;


pub use builder::{DuplicateNodeError, GraphBuilder};
pub use compilation::GraphValidationError;
pub use edges::{ConditionalEdge, DecisionFn, Edge};

pub(crate) use edges::{ConditionalRoute, Route};
