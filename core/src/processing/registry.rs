use std::collections::BTreeMap;
use std::sync::OnceLock;

use log::warn;

use crate::nodes::builtin_nodes;
use crate::prelude::DerivedNode;

/// Read-only map from node name to its definition.
pub struct NodeRegistry {
    nodes: BTreeMap<&'static str, &'static dyn DerivedNode>,
}

impl NodeRegistry {
    /// Registers `nodes` by name. A repeated name keeps the first definition.
    pub fn new(nodes: impl IntoIterator<Item = &'static dyn DerivedNode>) -> Self {
        let mut map: BTreeMap<&'static str, &'static dyn DerivedNode> = BTreeMap::new();
        for node in nodes {
            if map.contains_key(node.name()) {
                warn!("node '{}' registered twice; keeping the first", node.name());
                continue;
            }
            map.insert(node.name(), node);
        }
        Self { nodes: map }
    }

    /// The process-wide registry of every built-in node.
    pub fn builtin() -> &'static NodeRegistry {
        static REGISTRY: OnceLock<NodeRegistry> = OnceLock::new();
        REGISTRY.get_or_init(|| NodeRegistry::new(builtin_nodes()))
    }

    pub fn get(&self, name: &str) -> Option<&'static dyn DerivedNode> {
        self.nodes.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Nodes in name order.
    pub fn nodes(&self) -> impl Iterator<Item = &'static dyn DerivedNode> + '_ {
        self.nodes.values().copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.nodes.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::names;

    #[test]
    fn builtin_registry_holds_every_node_once() {
        let registry = NodeRegistry::builtin();
        assert_eq!(registry.len(), builtin_nodes().len());
        assert!(registry.contains(names::RATE_OF_CLIMB));
        assert!(registry.contains(names::ENG_N2_MAXIMUM));
        assert!(registry.get("Altitude STD").is_none());
    }

    #[test]
    fn builtin_nodes_have_operational_combinations() {
        for node in NodeRegistry::builtin().nodes() {
            assert!(
                !node.operational_combinations().is_empty(),
                "{} has no combination",
                node.name()
            );
        }
    }
}
