//! Neighborhood of a node, for isolating it in the view.
//!
//! ```text
//! isolate(top/a)
//!
//! top                <- ancestor
//! +-- top/a          <- focus
//! |   +-- top/a/x    <- descendant
//! +-- top/b          <- neighbor via edge top/a->top/b
//! ```

use crate::error::{HierScopeError, Result};
use crate::pipeline::GraphModel;
use serde::Serialize;
use std::collections::BTreeSet;

/// Ids that stay visible when a node is isolated
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Neighborhood {
    pub focus: String,
    pub nodes: BTreeSet<String>,
    pub edges: BTreeSet<String>,
}

impl Neighborhood {
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains(id) || self.edges.contains(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len() + self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// The node, its direct neighbors and connecting edges, all its ancestors and
/// all its descendants.
pub fn neighborhood(model: &GraphModel, id: &str) -> Result<Neighborhood> {
    let focus = model
        .node(id)
        .ok_or_else(|| HierScopeError::UnknownElement(id.to_string()))?;

    let mut result = Neighborhood {
        focus: focus.id.clone(),
        ..Default::default()
    };
    result.nodes.insert(focus.id.clone());

    for edge in model.incident_edges(&focus.id) {
        result.edges.insert(edge.id.clone());
        result.nodes.insert(edge.source.clone());
        result.nodes.insert(edge.target.clone());
    }

    let mut parent = focus.parent_id.as_deref();
    while let Some(pid) = parent {
        result.nodes.insert(pid.to_string());
        parent = model.node(pid).and_then(|n| n.parent_id.as_deref());
    }

    let mut stack = vec![focus.id.as_str()];
    while let Some(current) = stack.pop() {
        for child in model.children(current) {
            if result.nodes.insert(child.id.clone()) {
                stack.push(child.id.as_str());
            }
        }
    }

    tracing::debug!(
        "Isolated {}: {} node(s), {} edge(s)",
        id,
        result.nodes.len(),
        result.edges.len()
    );
    Ok(result)
}
