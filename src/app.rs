//! Compiled graphs and the execution engine.
//!
//! A [`CompiledGraph`] is the immutable, validated output of
//! [`GraphBuilder::compile`](crate::graphs::GraphBuilder::compile). It owns
//! the node registry and one routing rule per routed node, and it executes
//! workflows: starting at the entry point, each node's task is invoked with
//! the current data value, the next node is resolved statically or through
//! the node's decision function, and traversal ends when a finish point's
//! task completes.
//!
//! Execution is strictly sequential — one node at a time, one suspension
//! point per node visit — and a compiled graph holds no per-execution
//! state, so independent [`execute`](CompiledGraph::execute) calls may run
//! concurrently on the same instance.

use miette::Diagnostic;
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;
use std::hash::Hash;
use thiserror::Error;
use tracing::instrument;

use crate::graphs::{ConditionalRoute, Route};
use crate::progress::Progress;
use crate::task::{Task, TaskError};
use crate::types::NodeName;

/// Failure raised while walking a compiled graph.
#[derive(Debug, Error, Diagnostic)]
pub enum ExecutionError {
    /// A decision function produced a key with no entry in its path map.
    #[error("no conditional route out of `{node}` for decision key {key}")]
    #[diagnostic(
        code(flowgraph::execute::routing),
        help("the path map must cover every key the decision function can produce")
    )]
    Routing { node: NodeName, key: String },

    /// A task failed; the underlying error is propagated unchanged.
    #[error("task `{node}` failed")]
    #[diagnostic(code(flowgraph::execute::task))]
    Task {
        node: NodeName,
        #[source]
        source: TaskError,
    },

    /// Traversal reached a node with no registered task.
    ///
    /// Cannot occur for graphs produced by `compile`; kept so the engine
    /// never panics on a violated invariant.
    #[error("node `{0}` is not registered in this graph")]
    #[diagnostic(code(flowgraph::execute::unknown_node))]
    UnknownNode(NodeName),

    /// Traversal reached a non-finish node with no outgoing route.
    ///
    /// Cannot occur for graphs produced by `compile`; kept so the engine
    /// never panics on a violated invariant.
    #[error("no route out of non-finish node `{0}`")]
    #[diagnostic(code(flowgraph::execute::no_route))]
    NoRoute(NodeName),
}

/// Immutable, validated workflow graph ready for execution.
///
/// Produced exclusively by
/// [`GraphBuilder::compile`](crate::graphs::GraphBuilder::compile); there is
/// no way back to the mutable form. Tasks and decision functions are shared
/// behind `Arc`, so cloning a compiled graph is cheap.
///
/// # Examples
///
/// ```
/// use flowgraph::graphs::GraphBuilder;
/// use flowgraph::task::Task;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let graph = GraphBuilder::<i64>::new()
///     .add_node("add", Task::from_fn(|x| Ok(x + 1)))?
///     .add_node("double", Task::from_async(|x| async move { Ok(x * 2) }))?
///     .set_entry_point("add")
///     .add_edge("add", "double")
///     .set_finish_point("double")
///     .compile()?;
///
/// // Replayable: each call owns its traversal state.
/// assert_eq!(graph.execute(5).await?, 12);
/// assert_eq!(graph.execute(9).await?, 20);
/// # Ok(())
/// # }
/// ```
pub struct CompiledGraph<D, K = String> {
    nodes: FxHashMap<NodeName, Task<D>>,
    routes: FxHashMap<NodeName, Route<D, K>>,
    entry_point: NodeName,
    finish_points: FxHashSet<NodeName>,
}

impl<D, K> CompiledGraph<D, K> {
    /// Internal (crate) factory keeping the topology fields private.
    pub(crate) fn from_parts(
        nodes: FxHashMap<NodeName, Task<D>>,
        routes: FxHashMap<NodeName, Route<D, K>>,
        entry_point: NodeName,
        finish_points: FxHashSet<NodeName>,
    ) -> Self {
        Self {
            nodes,
            routes,
            entry_point,
            finish_points,
        }
    }

    /// The node where traversal begins.
    #[must_use]
    pub fn entry_point(&self) -> &NodeName {
        &self.entry_point
    }

    /// The nodes whose completion ends traversal.
    #[must_use]
    pub fn finish_points(&self) -> &FxHashSet<NodeName> {
        &self.finish_points
    }

    /// Whether `name` is registered in this graph.
    #[must_use]
    pub fn contains_node(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Number of registered nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl<D, K> CompiledGraph<D, K>
where
    D: Clone + Send + 'static,
    K: Eq + Hash + fmt::Debug,
{
    /// Executes the workflow with progress messages discarded.
    ///
    /// Equivalent to [`execute_with_progress`](Self::execute_with_progress)
    /// with a disabled [`Progress`] handle.
    pub async fn execute(&self, input: D) -> Result<D, ExecutionError> {
        self.execute_with_progress(input, Progress::disabled()).await
    }

    /// Executes the workflow, forwarding task progress to `progress`.
    ///
    /// Walks the graph from the entry point: each node's task is invoked
    /// with the current data value and its result becomes the input of the
    /// next node. When the current node is a finish point its result is
    /// returned. Conditional routing evaluates the node's decision function
    /// against the input the task received — not its result — which may
    /// recompute work the task already did; that duplication is accepted so
    /// a task can double as its own router.
    ///
    /// Cycles are not detected; a traversal that never reaches a finish
    /// point runs until a task or routing failure.
    ///
    /// # Errors
    ///
    /// [`ExecutionError::Task`] when a task fails (the task's error is the
    /// source, unchanged) and [`ExecutionError::Routing`] when a decision
    /// key has no path-map entry. Both abort the traversal immediately.
    #[instrument(level = "debug", skip_all, fields(entry = %self.entry_point))]
    pub async fn execute_with_progress(
        &self,
        input: D,
        progress: Progress,
    ) -> Result<D, ExecutionError> {
        // Pending routing decision for the node currently executing. The
        // conditional case retains the pre-task input for the decision
        // function.
        enum Pending<'a, D, K> {
            Direct(&'a NodeName),
            Conditional(&'a ConditionalRoute<D, K>, D),
            Terminal,
        }

        let mut current = self.entry_point.clone();
        let mut data = input;

        loop {
            let task = self
                .nodes
                .get(&current)
                .ok_or_else(|| ExecutionError::UnknownNode(current.clone()))?;
            let is_finish = self.finish_points.contains(&current);

            let pending = if is_finish {
                Pending::Terminal
            } else {
                match self.routes.get(&current) {
                    Some(Route::Direct(to)) => Pending::Direct(to),
                    Some(Route::Conditional(route)) => Pending::Conditional(route, data.clone()),
                    None => Pending::Terminal,
                }
            };

            tracing::debug!(node = %current, "running task");
            let result = task
                .invoke(data, &progress)
                .await
                .map_err(|source| ExecutionError::Task {
                    node: current.clone(),
                    source,
                })?;

            if is_finish {
                tracing::debug!(node = %current, "finish point reached");
                return Ok(result);
            }

            let next = match pending {
                Pending::Direct(to) => to.clone(),
                Pending::Conditional(route, task_input) => {
                    let key = (route.decide)(&task_input);
                    match route.targets.get(&key) {
                        Some(target) => target.clone(),
                        None => {
                            return Err(ExecutionError::Routing {
                                node: current.clone(),
                                key: format!("{key:?}"),
                            })
                        }
                    }
                }
                Pending::Terminal => return Err(ExecutionError::NoRoute(current.clone())),
            };

            tracing::debug!(from = %current, to = %next, "transition");
            current = next;
            data = result;
        }
    }
}

impl<D, K: Clone> Clone for CompiledGraph<D, K> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            routes: self.routes.clone(),
            entry_point: self.entry_point.clone(),
            finish_points: self.finish_points.clone(),
        }
    }
}

impl<D, K> fmt::Debug for CompiledGraph<D, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledGraph")
            .field("entry_point", &self.entry_point)
            .field("finish_points", &self.finish_points)
            .field("nodes", &self.nodes.len())
            .finish()
    }
}
