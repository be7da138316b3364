use crate::error::ConfigurationError;
use crate::slot::{FetchSlot, SlotKey};
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

/// The static view of a gate: slots and the dependency edges between them.
///
/// Built once at registration. It is where undeclared dependencies and
/// cycles are caught, and it can be exported as JSON for inspection.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Schematic {
    pub name: String,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub key: SlotKey,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Source,    // no dependencies
    Dependent, // waits on at least one other slot
}

/// `from` must resolve before `to` may run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub from: SlotKey,
    pub to: SlotKey,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Active,
    Done,
}

impl Schematic {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Build and validate the dependency graph of `slots`.
    pub fn from_slots(
        name: impl Into<String>,
        slots: &[FetchSlot],
    ) -> Result<Self, ConfigurationError> {
        let mut schematic = Self::new(name);
        let mut seen = AHashSet::new();

        for slot in slots {
            if !seen.insert(slot.key.as_str()) {
                return Err(ConfigurationError::DuplicateSlot(slot.key.clone()));
            }
            schematic.nodes.push(Node {
                key: slot.key.clone(),
                kind: if slot.is_independent() {
                    NodeKind::Source
                } else {
                    NodeKind::Dependent
                },
            });
        }

        for slot in slots {
            for dependency in &slot.depends_on {
                if !seen.contains(dependency.as_str()) {
                    return Err(ConfigurationError::UndeclaredDependency {
                        slot: slot.key.clone(),
                        dependency: dependency.clone(),
                    });
                }
                let edge = Edge {
                    from: dependency.clone(),
                    to: slot.key.clone(),
                };
                if !schematic.edges.contains(&edge) {
                    schematic.edges.push(edge);
                }
            }
        }

        if let Some(path) = schematic.find_cycle() {
            return Err(ConfigurationError::Cycle { path });
        }

        Ok(schematic)
    }

    pub fn dependencies_of<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.edges
            .iter()
            .filter(move |edge| edge.to == key)
            .map(|edge| edge.from.as_str())
    }

    pub fn dependents_of<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.edges
            .iter()
            .filter(move |edge| edge.from == key)
            .map(|edge| edge.to.as_str())
    }

    /// Slots ordered so that every slot comes after all of its dependencies.
    ///
    /// Ties keep declaration order.
    pub fn topological_order(&self) -> Result<Vec<SlotKey>, ConfigurationError> {
        if let Some(path) = self.find_cycle() {
            return Err(ConfigurationError::Cycle { path });
        }

        let mut placed: AHashSet<&str> = AHashSet::with_capacity(self.nodes.len());
        let mut order = Vec::with_capacity(self.nodes.len());
        while order.len() < self.nodes.len() {
            for node in &self.nodes {
                let key = node.key.as_str();
                if placed.contains(key) {
                    continue;
                }
                if self.dependencies_of(key).all(|dep| placed.contains(dep)) {
                    placed.insert(key);
                    order.push(node.key.clone());
                }
            }
        }
        Ok(order)
    }

    /// First dependency cycle found, as `a -> b -> ... -> a`.
    pub fn find_cycle(&self) -> Option<Vec<SlotKey>> {
        let mut marks = AHashMap::with_capacity(self.nodes.len());
        let mut stack = Vec::new();
        self.nodes
            .iter()
            .find_map(|node| self.visit(&node.key, &mut marks, &mut stack))
    }

    fn visit<'a>(
        &'a self,
        key: &'a str,
        marks: &mut AHashMap<&'a str, Mark>,
        stack: &mut Vec<&'a str>,
    ) -> Option<Vec<SlotKey>> {
        match marks.get(key) {
            Some(Mark::Done) => return None,
            Some(Mark::Active) => {
                let start = stack.iter().position(|k| *k == key).unwrap_or(0);
                let mut path: Vec<SlotKey> = stack[start..].iter().map(|k| k.to_string()).collect();
                path.push(key.to_string());
                return Some(path);
            }
            None => {}
        }

        marks.insert(key, Mark::Active);
        stack.push(key);
        for dependency in self.dependencies_of(key) {
            if let Some(path) = self.visit(dependency, marks, stack) {
                return Some(path);
            }
        }
        stack.pop();
        marks.insert(key, Mark::Done);
        None
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::value::SlotValues;

    fn slot(key: &str, deps: &[&str]) -> FetchSlot {
        FetchSlot::from_fn(key, |_inputs: SlotValues| async move { Ok::<_, FetchError>(()) })
            .depends_on(deps.iter().copied())
    }

    #[test]
    fn test_router_graph_order() {
        let slots = vec![
            slot("userData", &["username"]),
            slot("username", &[]),
            slot("settings", &[]),
        ];
        let schematic = Schematic::from_slots("router", &slots).unwrap();

        assert_eq!(schematic.edges.len(), 1);
        assert_eq!(schematic.nodes[0].kind, NodeKind::Dependent);
        assert_eq!(
            schematic.topological_order().unwrap(),
            vec!["username", "settings", "userData"]
        );
        assert_eq!(schematic.dependents_of("username").collect::<Vec<_>>(), vec!["userData"]);
    }

    #[test]
    fn test_detects_cycle() {
        let slots = vec![slot("a", &["c"]), slot("b", &["a"]), slot("c", &["b"])];
        let err = Schematic::from_slots("cyclic", &slots).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::Cycle {
                path: vec!["a".into(), "c".into(), "b".into(), "a".into()]
            }
        );
    }

    #[test]
    fn test_detects_self_dependency() {
        let err = Schematic::from_slots("self", &[slot("a", &["a"])]).unwrap_err();
        assert!(matches!(err, ConfigurationError::Cycle { path } if path == ["a", "a"]));
    }

    #[test]
    fn test_rejects_undeclared_and_duplicate() {
        let err = Schematic::from_slots("x", &[slot("a", &["ghost"])]).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::UndeclaredDependency {
                slot: "a".into(),
                dependency: "ghost".into()
            }
        );

        let err = Schematic::from_slots("x", &[slot("a", &[]), slot("a", &[])]).unwrap_err();
        assert_eq!(err, ConfigurationError::DuplicateSlot("a".into()));
    }
}
