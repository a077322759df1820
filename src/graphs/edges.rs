//! Edge types and decision functions for graph routing.
//!
//! Two routing forms exist: a plain [`Edge`] always transitions to one fixed
//! target, while a [`ConditionalEdge`] selects its target by evaluating a
//! [`DecisionFn`] and looking the resulting key up in a path map. A node is
//! routed one way or the other, never both; compilation enforces that.

use rustc_hash::FxHashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use crate::types::NodeName;

/// Decision function for conditional routing.
///
/// Evaluated against the *same input the source node's task received* — not
/// the task's output — so a task can double as its own router without the
/// routing logic observing its result. Decision functions are synchronous
/// and must not suspend.
///
/// ```
/// use flowgraph::graphs::DecisionFn;
/// use std::sync::Arc;
///
/// let parity: DecisionFn<i64, bool> = Arc::new(|x| x % 2 == 0);
/// assert!(parity(&4));
/// ```
pub type DecisionFn<D, K> = Arc<dyn Fn(&D) -> K + Send + Sync + 'static>;

/// Unconditional directed transition between two named nodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    from: NodeName,
    to: NodeName,
}

impl Edge {
    /// Creates an edge `from -> to`.
    pub fn new(from: impl Into<NodeName>, to: impl Into<NodeName>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Source node of this edge.
    #[must_use]
    pub fn from(&self) -> &NodeName {
        &self.from
    }

    /// Target node of this edge.
    #[must_use]
    pub fn to(&self) -> &NodeName {
        &self.to
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// A transition selected dynamically by a decision function.
///
/// Associates a source node with a [`DecisionFn`] and a path map from
/// decision key to target node. The path map must cover every key the
/// decision function can produce; an unmapped key is a routing failure at
/// execution time, not a silent stop.
pub struct ConditionalEdge<D, K> {
    from: NodeName,
    decide: DecisionFn<D, K>,
    targets: FxHashMap<K, NodeName>,
}

impl<D, K: Eq + Hash> ConditionalEdge<D, K> {
    /// Creates a conditional edge out of `from`.
    pub fn new<N: Into<NodeName>>(
        from: impl Into<NodeName>,
        decide: DecisionFn<D, K>,
        targets: impl IntoIterator<Item = (K, N)>,
    ) -> Self {
        Self {
            from: from.into(),
            decide,
            targets: targets
                .into_iter()
                .map(|(key, target)| (key, target.into()))
                .collect(),
        }
    }

    /// Source node of this conditional edge.
    #[must_use]
    pub fn from(&self) -> &NodeName {
        &self.from
    }

    /// The decision function.
    #[must_use]
    pub fn decide(&self) -> &DecisionFn<D, K> {
        &self.decide
    }

    /// The key-to-target path map.
    #[must_use]
    pub fn targets(&self) -> &FxHashMap<K, NodeName> {
        &self.targets
    }

    pub(crate) fn into_route(self) -> (NodeName, ConditionalRoute<D, K>) {
        (
            self.from,
            ConditionalRoute {
                decide: self.decide,
                targets: self.targets,
            },
        )
    }
}

impl<D, K: Clone> Clone for ConditionalEdge<D, K> {
    fn clone(&self) -> Self {
        Self {
            from: self.from.clone(),
            decide: Arc::clone(&self.decide),
            targets: self.targets.clone(),
        }
    }
}

impl<D, K: fmt::Debug> fmt::Debug for ConditionalEdge<D, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionalEdge")
            .field("from", &self.from)
            .field("targets", &self.targets)
            .finish_non_exhaustive()
    }
}

/// Lowered routing rule held by a compiled graph: one per routed node.
pub(crate) enum Route<D, K> {
    Direct(NodeName),
    Conditional(ConditionalRoute<D, K>),
}

pub(crate) struct ConditionalRoute<D, K> {
    pub(crate) decide: DecisionFn<D, K>,
    pub(crate) targets: FxHashMap<K, NodeName>,
}

impl<D, K: Clone> Clone for Route<D, K> {
    fn clone(&self) -> Self {
        match self {
            Route::Direct(to) => Route::Direct(to.clone()),
            Route::Conditional(route) => Route::Conditional(route.clone()),
        }
    }
}

impl<D, K: Clone> Clone for ConditionalRoute<D, K> {
    fn clone(&self) -> Self {
        Self {
            decide: Arc::clone(&self.decide),
            targets: self.targets.clone(),
        }
    }
}
