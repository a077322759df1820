//! Graph validation and compilation into an executable form.
//!
//! [`GraphBuilder::compile`] checks the structural rules below and lowers
//! the builder's edge lists into one routing rule per node. It either
//! returns a fully valid [`CompiledGraph`](crate::app::CompiledGraph) or an
//! error; there is no partially compiled state.
//!
//! Rules enforced:
//!
//! 1. an entry point is set and registered;
//! 2. at least one finish point is set, each registered;
//! 3. every unconditional edge connects registered nodes, and no source has
//!    more than one unconditional edge;
//! 4. every conditional edge has a registered source, registered targets,
//!    and no source has more than one conditional registration;
//! 5. no node is routed both unconditionally and conditionally;
//! 6. every non-finish node reachable from the entry point has an outgoing
//!    route (a reachable dead end fails compilation).
//!
//! Cycles are deliberately not detected; a cyclic graph compiles and loops
//! at execution time until a task fails or the process is cancelled.

use miette::Diagnostic;
use rustc_hash::{FxHashMap, FxHashSet};
use std::hash::Hash;
use thiserror::Error;

use super::builder::GraphBuilder;
use super::edges::Route;
use crate::app::CompiledGraph;
use crate::types::NodeName;

/// Structural rule violation reported by [`GraphBuilder::compile`].
#[derive(Debug, Error, Diagnostic)]
pub enum GraphValidationError {
    /// No entry point was set.
    #[error("no entry point set")]
    #[diagnostic(
        code(flowgraph::compile::missing_entry),
        help("call set_entry_point with the node where traversal should begin")
    )]
    MissingEntryPoint,

    /// The entry point does not name a registered node.
    #[error("entry point `{0}` is not a registered node")]
    #[diagnostic(code(flowgraph::compile::unknown_entry))]
    UnknownEntryPoint(NodeName),

    /// No finish point was set.
    #[error("no finish point set")]
    #[diagnostic(
        code(flowgraph::compile::missing_finish),
        help("call set_finish_point at least once; reaching a finish node ends traversal")
    )]
    MissingFinishPoint,

    /// A finish point does not name a registered node.
    #[error("finish point `{0}` is not a registered node")]
    #[diagnostic(code(flowgraph::compile::unknown_finish))]
    UnknownFinishPoint(NodeName),

    /// An unconditional edge references an unregistered node.
    #[error("edge `{from}` -> `{to}` references unknown node `{unknown}`")]
    #[diagnostic(code(flowgraph::compile::dangling_edge))]
    DanglingEdge {
        from: NodeName,
        to: NodeName,
        unknown: NodeName,
    },

    /// A node has more than one unconditional outgoing edge.
    #[error("node `{0}` has more than one unconditional outgoing edge")]
    #[diagnostic(
        code(flowgraph::compile::conflicting_edges),
        help("a node routes to exactly one target; use conditional edges for branching")
    )]
    ConflictingEdges(NodeName),

    /// A node has more than one conditional-edge registration.
    #[error("node `{0}` has more than one conditional-edge registration")]
    #[diagnostic(code(flowgraph::compile::duplicate_conditional))]
    DuplicateConditionalEdge(NodeName),

    /// A conditional edge's source is not a registered node.
    #[error("conditional edge source `{0}` is not a registered node")]
    #[diagnostic(code(flowgraph::compile::unknown_conditional_source))]
    UnknownConditionalSource(NodeName),

    /// A conditional edge's path map points at an unregistered node.
    #[error("conditional edge from `{from}` targets unknown node `{target}`")]
    #[diagnostic(code(flowgraph::compile::unknown_conditional_target))]
    UnknownConditionalTarget { from: NodeName, target: NodeName },

    /// A node is routed both unconditionally and conditionally.
    #[error("node `{0}` has both an unconditional edge and conditional edges")]
    #[diagnostic(
        code(flowgraph::compile::ambiguous_routing),
        help("a node is either unconditionally or conditionally routed, not both")
    )]
    AmbiguousRouting(NodeName),

    /// A reachable non-finish node has no outgoing route.
    #[error("node `{0}` is reachable, is not a finish point, and has no outgoing route")]
    #[diagnostic(
        code(flowgraph::compile::dead_end),
        help("add an edge out of the node or mark it as a finish point")
    )]
    DeadEnd(NodeName),
}

impl<D, K: Eq + Hash> GraphBuilder<D, K> {
    /// Validates the graph and freezes it into a [`CompiledGraph`].
    ///
    /// Consumes the builder; the compiled form is immutable and may be
    /// executed any number of times, concurrently.
    ///
    /// # Errors
    ///
    /// Returns the first [`GraphValidationError`] encountered, identifying
    /// the violated rule and the offending node or edge.
    pub fn compile(self) -> Result<CompiledGraph<D, K>, GraphValidationError> {
        let GraphBuilder {
            nodes,
            edges,
            conditional_edges,
            entry_point,
            finish_points,
        } = self;

        let entry_point = entry_point.ok_or(GraphValidationError::MissingEntryPoint)?;
        if !nodes.contains_key(&entry_point) {
            return Err(GraphValidationError::UnknownEntryPoint(entry_point));
        }

        if finish_points.is_empty() {
            return Err(GraphValidationError::MissingFinishPoint);
        }
        for finish in &finish_points {
            if !nodes.contains_key(finish) {
                return Err(GraphValidationError::UnknownFinishPoint(finish.clone()));
            }
        }

        let mut routes: FxHashMap<NodeName, Route<D, K>> = FxHashMap::default();

        for edge in edges {
            for endpoint in [edge.from(), edge.to()] {
                if !nodes.contains_key(endpoint) {
                    return Err(GraphValidationError::DanglingEdge {
                        from: edge.from().clone(),
                        to: edge.to().clone(),
                        unknown: endpoint.clone(),
                    });
                }
            }
            let from = edge.from().clone();
            let to = edge.to().clone();
            if routes.insert(from.clone(), Route::Direct(to)).is_some() {
                return Err(GraphValidationError::ConflictingEdges(from));
            }
        }

        for conditional in conditional_edges {
            let (from, route) = conditional.into_route();
            if !nodes.contains_key(&from) {
                return Err(GraphValidationError::UnknownConditionalSource(from));
            }
            for target in route.targets.values() {
                if !nodes.contains_key(target) {
                    return Err(GraphValidationError::UnknownConditionalTarget {
                        from: from.clone(),
                        target: target.clone(),
                    });
                }
            }
            match routes.insert(from.clone(), Route::Conditional(route)) {
                None => {}
                Some(Route::Direct(_)) => {
                    return Err(GraphValidationError::AmbiguousRouting(from));
                }
                Some(Route::Conditional(_)) => {
                    return Err(GraphValidationError::DuplicateConditionalEdge(from));
                }
            }
        }

        let finish_points: FxHashSet<NodeName> = finish_points.into_iter().collect();

        // Rule 6: walk everything reachable from the entry; traversal stops
        // at finish points, so their outgoing routes are not required.
        let mut visited: FxHashSet<NodeName> = FxHashSet::default();
        let mut pending = vec![entry_point.clone()];
        while let Some(node) = pending.pop() {
            if !visited.insert(node.clone()) {
                continue;
            }
            if finish_points.contains(&node) {
                continue;
            }
            match routes.get(&node) {
                None => return Err(GraphValidationError::DeadEnd(node)),
                Some(Route::Direct(to)) => pending.push(to.clone()),
                Some(Route::Conditional(route)) => {
                    pending.extend(route.targets.values().cloned());
                }
            }
        }

        Ok(CompiledGraph::from_parts(
            nodes,
            routes,
            entry_point,
            finish_points,
        ))
    }
}
