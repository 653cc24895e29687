mod arena;
mod drill_down;

pub use arena::{ArenaNode, HierarchyArena, NodeId};
pub use drill_down::{breadcrumbs, resolve_drill_down, Breadcrumb, DrillDownScope};

use super::domain::{HierarchyNode, ScoreRecord};
use super::grouping::GroupedScores;
use std::collections::HashSet;
use tracing::debug;

/// First node tagged `tag` in depth-first preorder across the forest.
pub fn find_hierarchy_item<'h>(
    nodes: &'h [HierarchyNode],
    tag: &str,
) -> Option<&'h HierarchyNode> {
    let mut stack: Vec<&'h HierarchyNode> = nodes.iter().rev().collect();

    while let Some(node) = stack.pop() {
        if node.tag() == tag {
            return Some(node);
        }
        stack.extend(node.ordered_children.iter().rev());
    }

    None
}

/// Rolls leaf buckets up through `forest`.
///
/// Every node maps to its own direct bucket followed by the buckets of all
/// its descendants in depth-first order, deduplicated by component ref with
/// the first occurrence kept. A tag present more than once in the forest keeps
/// the rollup of its first occurrence.
///
/// When `focus_tag` has a non-empty direct bucket in `grouped`, that bucket
/// replaces the rollup for the focus tag so the caller can show only what is
/// attached directly to the node being viewed.
pub fn rollup_scores<'a>(
    grouped: &GroupedScores<'a>,
    forest: &[HierarchyNode],
    focus_tag: Option<&str>,
) -> GroupedScores<'a> {
    let arena = HierarchyArena::from_forest(forest);
    let mut rollups: Vec<Vec<&'a ScoreRecord>> = vec![Vec::new(); arena.len()];

    // Preorder ids put descendants after their ancestors, so walking backwards
    // sees every child rollup before its parent needs it.
    for id in (0..arena.len()).rev() {
        let node = arena.node(id);
        let direct = grouped.get(node.tag).unwrap_or(&[]);
        let mut seen: HashSet<&'a str> = HashSet::new();
        let mut merged = Vec::new();

        let descendants = node
            .children
            .iter()
            .flat_map(|child| rollups[*child].iter().copied());
        for record in direct.iter().copied().chain(descendants) {
            if seen.insert(record.component_ref.as_str()) {
                merged.push(record);
            }
        }

        rollups[id] = merged;
    }

    let mut rolled_up = GroupedScores::new();
    for (id, node) in arena.iter() {
        if !rolled_up.contains_key(node.tag) {
            rolled_up.insert(node.tag, std::mem::take(&mut rollups[id]));
        }
    }

    if let Some(focus) = focus_tag.filter(|focus| rolled_up.contains_key(focus)) {
        if let Some(direct) = grouped.get(focus).filter(|records| !records.is_empty()) {
            rolled_up.insert(focus, direct.to_vec());
        }
    }

    debug!(
        nodes = arena.len(),
        focus = focus_tag.unwrap_or_default(),
        "rolled up hierarchy buckets"
    );

    rolled_up
}
