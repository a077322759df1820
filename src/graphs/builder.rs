//! GraphBuilder: mutable workflow definition with a fluent API.

use miette::Diagnostic;
use rustc_hash::FxHashMap;
use std::hash::Hash;
use std::sync::Arc;
use thiserror::Error;

use super::edges::{ConditionalEdge, Edge};
use crate::task::Task;
use crate::types::NodeName;

/// Attempt to register a second task under an already-taken node name.
#[derive(Debug, Error, Diagnostic)]
#[error("node `{0}` is already registered")]
#[diagnostic(
    code(flowgraph::graph::duplicate_node),
    help("each node name may be registered exactly once; pick a distinct name")
)]
pub struct DuplicateNodeError(pub NodeName);

/// Builder for workflow graphs.
///
/// Accumulates nodes, edges, conditional edges, the entry point, and finish
/// points, then freezes into an immutable
/// [`CompiledGraph`](crate::app::CompiledGraph) via
/// [`compile`](GraphBuilder::compile). Definition order is free: edges may
/// reference nodes that are registered later. Only `add_node` fails
/// eagerly (on a duplicate name); every structural rule is checked at
/// compile time.
///
/// `D` is the data type flowing between nodes; `K` is the decision-key type
/// used by conditional edges (defaults to `String`).
///
/// # Examples
///
/// ```
/// use flowgraph::graphs::GraphBuilder;
/// use flowgraph::task::Task;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let graph = GraphBuilder::<i64, bool>::new()
///     .add_node("addition", Task::from_fn(|x| Ok(x + 1)))?
///     .add_node("even", Task::from_fn(|x| Ok(x)))?
///     .add_node("odd", Task::from_fn(|x: i64| Ok(-x)))?
///     .set_entry_point("addition")
///     .add_conditional_edges("addition", |x: &i64| x % 2 == 0, [(true, "even"), (false, "odd")])
///     .set_finish_point("even")
///     .set_finish_point("odd")
///     .compile()?;
/// # let _ = graph;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct GraphBuilder<D, K = String> {
    /// Registry of tasks, keyed by node name.
    pub(crate) nodes: FxHashMap<NodeName, Task<D>>,
    /// Unconditional edges, in registration order.
    pub(crate) edges: Vec<Edge>,
    /// Conditional edges, in registration order.
    pub(crate) conditional_edges: Vec<ConditionalEdge<D, K>>,
    /// The node where traversal begins.
    pub(crate) entry_point: Option<NodeName>,
    /// Nodes whose completion ends traversal, in registration order.
    pub(crate) finish_points: Vec<NodeName>,
}

impl<D, K> Default for GraphBuilder<D, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D, K> GraphBuilder<D, K> {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: FxHashMap::default(),
            edges: Vec::new(),
            conditional_edges: Vec::new(),
            entry_point: None,
            finish_points: Vec::new(),
        }
    }

    /// Registers `task` under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateNodeError`] if `name` is already registered.
    pub fn add_node(
        mut self,
        name: impl Into<NodeName>,
        task: Task<D>,
    ) -> Result<Self, DuplicateNodeError> {
        let name = name.into();
        if self.nodes.contains_key(&name) {
            return Err(DuplicateNodeError(name));
        }
        self.nodes.insert(name, task);
        Ok(self)
    }

    /// Records an unconditional transition `from -> to`.
    ///
    /// Neither endpoint has to be registered yet; existence is validated at
    /// compile time.
    #[must_use]
    pub fn add_edge(mut self, from: impl Into<NodeName>, to: impl Into<NodeName>) -> Self {
        self.edges.push(Edge::new(from, to));
        self
    }

    /// Marks `name` as the entry point.
    ///
    /// The entry point is singular; calling this twice keeps the last value
    /// and logs a warning about the overwrite.
    #[must_use]
    pub fn set_entry_point(mut self, name: impl Into<NodeName>) -> Self {
        let name = name.into();
        if let Some(previous) = self.entry_point.replace(name.clone()) {
            if previous != name {
                tracing::warn!(%previous, entry = %name, "overwriting entry point");
            }
        }
        self
    }

    /// Marks `name` as a finish point.
    ///
    /// Finish points accumulate; registering the same name twice is
    /// idempotent.
    #[must_use]
    pub fn set_finish_point(mut self, name: impl Into<NodeName>) -> Self {
        let name = name.into();
        if !self.finish_points.contains(&name) {
            self.finish_points.push(name);
        }
        self
    }
}

impl<D, K: Eq + Hash> GraphBuilder<D, K> {
    /// Records a conditional transition out of `source`.
    ///
    /// `decide` is evaluated at execution time against the input the source
    /// node's task received; its key selects the target from `path_map`. A
    /// source may carry at most one conditional registration and must not
    /// also have an unconditional edge — both conflicts are reported by
    /// [`compile`](GraphBuilder::compile).
    #[must_use]
    pub fn add_conditional_edges<N: Into<NodeName>>(
        mut self,
        source: impl Into<NodeName>,
        decide: impl Fn(&D) -> K + Send + Sync + 'static,
        path_map: impl IntoIterator<Item = (K, N)>,
    ) -> Self {
        self.conditional_edges
            .push(ConditionalEdge::new(source, Arc::new(decide), path_map));
        self
    }
}
