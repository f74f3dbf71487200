//! In-memory view of the skill forest.
//!
//! Built from catalog rows plus the directed sibling edge list. Children are
//! derived by scanning parent references; nothing is cached in the store.
//! Every traversal tracks visited nodes so a cycle already present in stored
//! data cannot loop forever.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::core::skill::Skill;

#[derive(Debug, Clone)]
struct GraphNode {
    name: String,
    parent_id: Option<String>,
}

/// Parent/child and sibling relations for a set of skills.
#[derive(Debug, Clone, Default)]
pub struct SkillGraph {
    nodes: HashMap<String, GraphNode>,
    /// Insertion order, so children come back in catalog order.
    order: Vec<String>,
    siblings: HashMap<String, Vec<String>>,
}

/// One node of a rendered prerequisite tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    pub id: String,
    pub name: String,
    /// Set when this id already appeared higher up the same branch.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub revisited: bool,
    pub children: Vec<TreeNode>,
}

impl SkillGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from skills (in catalog order) and `(skill_id, sibling_id)` edges.
    pub fn from_parts<'a>(
        skills: impl IntoIterator<Item = &'a Skill>,
        sibling_edges: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        let mut graph = Self::new();
        for skill in skills {
            graph.add_skill(&skill.id, &skill.name, skill.parent_id.as_deref());
        }
        for (from, to) in sibling_edges {
            graph.add_sibling(from, to);
        }
        graph
    }

    pub fn add_skill(&mut self, id: &str, name: &str, parent_id: Option<&str>) {
        if !self.nodes.contains_key(id) {
            self.order.push(id.to_string());
        }
        self.nodes.insert(
            id.to_string(),
            GraphNode {
                name: name.to_string(),
                parent_id: parent_id.map(ToString::to_string),
            },
        );
    }

    pub fn add_sibling(&mut self, from: String, to: String) {
        let edges = self.siblings.entry(from).or_default();
        if !edges.contains(&to) {
            edges.push(to);
        }
    }

    pub fn set_parent(&mut self, id: &str, parent_id: Option<&str>) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent_id = parent_id.map(ToString::to_string);
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn parent(&self, id: &str) -> Option<&str> {
        self.nodes.get(id).and_then(|n| n.parent_id.as_deref())
    }

    /// Skills whose parent is `id`, in catalog order.
    pub fn children(&self, id: &str) -> Vec<&str> {
        self.order
            .iter()
            .filter(|candidate| self.parent(candidate) == Some(id))
            .map(String::as_str)
            .collect()
    }

    /// Outgoing sibling edges only; the relation is not symmetrized.
    pub fn siblings(&self, id: &str) -> Vec<&str> {
        self.siblings
            .get(id)
            .map(|edges| edges.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Skills with no parent or whose parent is not in the graph.
    pub fn roots(&self) -> Vec<&str> {
        self.order
            .iter()
            .filter(|id| self.parent(id).is_none_or(|p| !self.contains(p)))
            .map(String::as_str)
            .collect()
    }

    /// Parent chain from the immediate parent upward, stopping at a repeat.
    pub fn ancestors(&self, id: &str) -> Vec<String> {
        let mut seen = HashSet::from([id.to_string()]);
        let mut chain = Vec::new();
        let mut current = self.parent(id);
        while let Some(parent) = current {
            if !seen.insert(parent.to_string()) {
                break;
            }
            chain.push(parent.to_string());
            current = self.parent(parent);
        }
        chain
    }

    /// Would making `parent_id` the parent of `child_id` close a loop?
    ///
    /// Returns the loop as `[child, parent, ..., child]` when it would.
    pub fn detect_parent_cycle(&self, child_id: &str, parent_id: &str) -> Option<Vec<String>> {
        if child_id == parent_id {
            return Some(vec![child_id.to_string(), child_id.to_string()]);
        }

        let mut path = vec![child_id.to_string(), parent_id.to_string()];
        let mut seen = HashSet::from([parent_id.to_string()]);
        let mut current = self.parent(parent_id);
        while let Some(next) = current {
            path.push(next.to_string());
            if next == child_id {
                return Some(path);
            }
            if !seen.insert(next.to_string()) {
                // Existing loop above the parent that does not pass through child.
                return None;
            }
            current = self.parent(next);
        }
        None
    }

    /// Prerequisite tree rooted at `id`; `None` when `id` is unknown.
    pub fn tree(&self, id: &str) -> Option<TreeNode> {
        self.contains(id)
            .then(|| self.build_tree(id, &mut Vec::new()))
    }

    /// One tree per root, in catalog order.
    pub fn forest(&self) -> Vec<TreeNode> {
        self.roots()
            .into_iter()
            .filter_map(|root| self.tree(root))
            .collect()
    }

    fn build_tree(&self, id: &str, branch: &mut Vec<String>) -> TreeNode {
        let name = self
            .nodes
            .get(id)
            .map(|n| n.name.clone())
            .unwrap_or_default();

        if branch.iter().any(|seen| seen == id) {
            return TreeNode {
                id: id.to_string(),
                name,
                revisited: true,
                children: Vec::new(),
            };
        }

        branch.push(id.to_string());
        let children = self
            .children(id)
            .into_iter()
            .map(|child| self.build_tree(child, branch))
            .collect();
        branch.pop();

        TreeNode {
            id: id.to_string(),
            name,
            revisited: false,
            children,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(&str, Option<&str>)]) -> SkillGraph {
        let mut g = SkillGraph::new();
        for (id, parent) in edges {
            g.add_skill(id, &id.to_uppercase(), *parent);
        }
        g
    }

    #[test]
    fn children_come_from_parent_scan() {
        let g = graph(&[("a", None), ("b", Some("a")), ("c", Some("a")), ("d", Some("b"))]);
        assert_eq!(g.children("a"), vec!["b", "c"]);
        assert_eq!(g.children("b"), vec!["d"]);
        assert!(g.children("d").is_empty());
        assert_eq!(g.roots(), vec!["a"]);
    }

    #[test]
    fn siblings_are_directed() {
        let mut g = graph(&[("a", None), ("b", None)]);
        g.add_sibling("a".into(), "b".into());
        g.add_sibling("a".into(), "b".into());
        assert_eq!(g.siblings("a"), vec!["b"]);
        assert!(g.siblings("b").is_empty());
    }

    #[test]
    fn ancestors_walk_up_to_root() {
        let g = graph(&[("a", None), ("b", Some("a")), ("c", Some("b"))]);
        assert_eq!(g.ancestors("c"), vec!["b".to_string(), "a".to_string()]);
        assert!(g.ancestors("a").is_empty());
    }

    #[test]
    fn detects_cycle_through_ancestors() {
        let g = graph(&[("a", None), ("b", Some("a")), ("c", Some("b"))]);
        let cycle = g.detect_parent_cycle("a", "c").unwrap();
        assert_eq!(cycle, vec!["a", "c", "b", "a"]);
        assert!(g.detect_parent_cycle("c", "a").is_none());
    }

    #[test]
    fn self_parent_is_a_cycle() {
        let g = graph(&[("a", None)]);
        assert_eq!(g.detect_parent_cycle("a", "a").unwrap(), vec!["a", "a"]);
    }

    #[test]
    fn traversals_survive_stored_cycles() {
        let g = graph(&[("a", Some("b")), ("b", Some("a")), ("c", None)]);
        assert_eq!(g.ancestors("a"), vec!["b".to_string()]);

        let tree = g.tree("a").unwrap();
        assert_eq!(tree.children.len(), 1);
        let b = &tree.children[0];
        assert_eq!(b.id, "b");
        assert!(b.children[0].revisited);
        assert!(b.children[0].children.is_empty());

        // Neither a nor b is a root; c is.
        assert_eq!(g.roots(), vec!["c"]);
        assert!(g.detect_parent_cycle("c", "a").is_none());
    }

    #[test]
    fn forest_renders_each_root() {
        let g = graph(&[("a", None), ("b", Some("a")), ("x", None), ("y", Some("missing"))]);
        let forest = g.forest();
        let roots: Vec<_> = forest.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(roots, vec!["a", "x", "y"]);
        assert_eq!(forest[0].children[0].name, "B");
    }
}
