use crate::scorecards::domain::HierarchyNode;
use std::collections::HashSet;
use tracing::warn;

pub type NodeId = usize;

#[derive(Debug, Clone)]
pub struct ArenaNode<'h> {
    pub tag: &'h str,
    pub name: &'h str,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Forest flattened into a table in depth-first preorder, so a node's
/// descendants always have larger ids than the node itself.
#[derive(Debug, Clone, Default)]
pub struct HierarchyArena<'h> {
    nodes: Vec<ArenaNode<'h>>,
    roots: Vec<NodeId>,
}

enum Visit<'h> {
    Enter {
        node: &'h HierarchyNode,
        parent: Option<NodeId>,
    },
    Exit(&'h str),
}

impl<'h> HierarchyArena<'h> {
    /// Flattens `forest` with an explicit stack.
    ///
    /// A node whose tag already appears among its own ancestors is dropped
    /// together with its subtree.
    pub fn from_forest(forest: &'h [HierarchyNode]) -> Self {
        let mut arena = Self::default();
        let mut on_path: HashSet<&'h str> = HashSet::new();
        let mut stack: Vec<Visit<'h>> = forest
            .iter()
            .rev()
            .map(|node| Visit::Enter { node, parent: None })
            .collect();

        while let Some(visit) = stack.pop() {
            let (node, parent) = match visit {
                Visit::Exit(tag) => {
                    on_path.remove(tag);
                    continue;
                }
                Visit::Enter { node, parent } => (node, parent),
            };

            let tag = node.tag();
            if !on_path.insert(tag) {
                warn!(tag, "skipping hierarchy node repeated among its own ancestors");
                continue;
            }

            let id = arena.nodes.len();
            arena.nodes.push(ArenaNode {
                tag,
                name: node.name(),
                parent,
                children: Vec::new(),
            });
            match parent {
                Some(parent) => arena.nodes[parent].children.push(id),
                None => arena.roots.push(id),
            }

            stack.push(Visit::Exit(tag));
            stack.extend(
                node.ordered_children
                    .iter()
                    .rev()
                    .map(|child| Visit::Enter {
                        node: child,
                        parent: Some(id),
                    }),
            );
        }

        arena
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &ArenaNode<'h> {
        &self.nodes[id]
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &ArenaNode<'h>)> {
        self.nodes.iter().enumerate()
    }

    /// Ancestor chain from the direct parent up to the root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = self.nodes[id].parent;
        while let Some(parent) = current {
            chain.push(parent);
            current = self.nodes[parent].parent;
        }
        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorecards::tests::common::{leaf, node};

    #[test]
    fn flattens_in_preorder_with_links() {
        let forest = vec![
            node("eng", vec![node("platform", vec![leaf("infra")]), leaf("web")]),
            leaf("sales"),
        ];

        let arena = HierarchyArena::from_forest(&forest);

        let tags: Vec<&str> = arena.iter().map(|(_, node)| node.tag).collect();
        assert_eq!(tags, vec!["eng", "platform", "infra", "web", "sales"]);
        assert_eq!(arena.roots(), &[0, 4]);
        assert_eq!(arena.node(0).children, vec![1, 3]);
        assert_eq!(arena.ancestors(2), vec![1, 0]);
        assert_eq!(arena.node(2).name, "infra name");
    }

    #[test]
    fn repeated_ancestor_tag_is_skipped() {
        let forest = vec![node(
            "eng",
            vec![node("platform", vec![node("eng", vec![leaf("ghost")])]), leaf("web")],
        )];

        let arena = HierarchyArena::from_forest(&forest);

        let tags: Vec<&str> = arena.iter().map(|(_, node)| node.tag).collect();
        assert_eq!(tags, vec!["eng", "platform", "web"]);
    }

    #[test]
    fn same_tag_in_sibling_subtrees_is_kept() {
        let forest = vec![
            node("eng", vec![leaf("shared")]),
            node("ops", vec![leaf("shared")]),
        ];

        let arena = HierarchyArena::from_forest(&forest);

        assert_eq!(arena.len(), 4);
    }
}
