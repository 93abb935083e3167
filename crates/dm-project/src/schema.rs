//! DAG file schema definitions.

use dm_graph::{EdgeSpec, GraphBuilder, NodeSpec};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DagDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Value handed to the root when the caller does not supply one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_value: Option<i64>,
    #[serde(default)]
    pub nodes: Vec<NodeDef>,
    #[serde(default)]
    pub transitions: Vec<TransitionDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeDef {
    pub id: String,
    /// Operation text, e.g. `add 5`.
    pub implementation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransitionDef {
    pub from: String,
    pub to: String,
}

impl DagDef {
    /// Node and edge specs in declaration order.
    pub fn to_specs(&self) -> (Vec<NodeSpec>, Vec<EdgeSpec>) {
        let nodes = self
            .nodes
            .iter()
            .map(|n| NodeSpec::new(n.id.as_str(), n.implementation.as_str()))
            .collect();
        let transitions = self
            .transitions
            .iter()
            .map(|t| EdgeSpec::new(t.from.as_str(), t.to.as_str()))
            .collect();
        (nodes, transitions)
    }

    pub fn builder(&self) -> GraphBuilder {
        let (nodes, transitions) = self.to_specs();
        GraphBuilder::from_specs(nodes, transitions)
    }

    /// Display name, falling back to `fallback` (usually the file stem).
    pub fn display_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(fallback)
    }
}
