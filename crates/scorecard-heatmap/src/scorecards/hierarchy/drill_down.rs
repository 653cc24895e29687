use super::find_hierarchy_item;
use crate::scorecards::domain::HierarchyNode;
use serde::Serialize;
use std::slice;

/// Where a drill-down path lands: the node last visited and the forest
/// available for the next step.
#[derive(Debug, Clone, Copy)]
pub struct DrillDownScope<'h> {
    pub focus: Option<&'h HierarchyNode>,
    pub candidates: &'h [HierarchyNode],
}

impl<'h> DrillDownScope<'h> {
    pub fn focus_tag(&self) -> Option<&'h str> {
        self.focus.map(HierarchyNode::tag)
    }

    /// Forest to roll up for this scope: the focus subtree, or the whole
    /// candidate forest at the top level.
    pub fn rollup_forest(&self) -> &'h [HierarchyNode] {
        match self.focus {
            Some(focus) => slice::from_ref(focus),
            None => self.candidates,
        }
    }
}

/// Walks `path` one step at a time, each step searching only beneath the
/// previous one. Returns `None` as soon as a step cannot be resolved.
pub fn resolve_drill_down<'h>(
    forest: &'h [HierarchyNode],
    path: &[String],
) -> Option<DrillDownScope<'h>> {
    let mut scope = DrillDownScope {
        focus: None,
        candidates: forest,
    };

    for tag in path {
        let node = find_hierarchy_item(scope.candidates, tag)?;
        scope = DrillDownScope {
            focus: Some(node),
            candidates: &node.ordered_children,
        };
    }

    Some(scope)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub tag: String,
    pub name: String,
}

/// Labels for every step of `path`, looked up the same way
/// [`resolve_drill_down`] walks it. Once a step fails to resolve, that step and
/// every later one are shown as their raw tag.
pub fn breadcrumbs(forest: &[HierarchyNode], path: &[String]) -> Vec<Breadcrumb> {
    let mut candidates = Some(forest);

    path.iter()
        .map(|tag| {
            let node = candidates.and_then(|nodes| find_hierarchy_item(nodes, tag));
            candidates = node.map(|node| node.ordered_children.as_slice());
            Breadcrumb {
                tag: tag.clone(),
                name: node
                    .map(|node| node.name().to_string())
                    .unwrap_or_else(|| tag.clone()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorecards::tests::common::{leaf, node};

    fn forest() -> Vec<HierarchyNode> {
        vec![
            node(
                "eng",
                vec![node("platform", vec![leaf("infra")]), leaf("web")],
            ),
            node("sales", vec![leaf("infra")]),
        ]
    }

    fn named(tag: &str, name: &str) -> HierarchyNode {
        let mut node = leaf(tag);
        node.node.name = name.to_string();
        node
    }

    fn path(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|tag| tag.to_string()).collect()
    }

    #[test]
    fn empty_path_scopes_the_whole_forest() {
        let forest = forest();
        let scope = resolve_drill_down(&forest, &[]).expect("root scope");

        assert!(scope.focus.is_none());
        assert_eq!(scope.candidates.len(), 2);
        assert_eq!(scope.rollup_forest().len(), 2);
    }

    #[test]
    fn each_step_descends_into_children() {
        let forest = forest();

        let scope = resolve_drill_down(&forest, &path(&["sales", "infra"])).expect("resolves");

        assert_eq!(scope.focus_tag(), Some("infra"));
        assert!(scope.candidates.is_empty());
        assert_eq!(scope.rollup_forest()[0].tag(), "infra");
    }

    #[test]
    fn steps_do_not_restart_from_the_root() {
        let forest = forest();

        assert!(resolve_drill_down(&forest, &path(&["platform", "sales"])).is_none());
        let scope = resolve_drill_down(&forest, &path(&["platform"])).expect("nested tag");
        assert_eq!(scope.candidates[0].tag(), "infra");
    }

    #[test]
    fn breadcrumbs_fall_back_to_tags() {
        let forest = forest();

        let crumbs = breadcrumbs(&forest, &path(&["eng", "mystery"]));

        assert_eq!(
            crumbs,
            vec![
                Breadcrumb {
                    tag: "eng".to_string(),
                    name: "eng name".to_string(),
                },
                Breadcrumb {
                    tag: "mystery".to_string(),
                    name: "mystery".to_string(),
                },
            ]
        );
    }

    #[test]
    fn breadcrumbs_name_the_node_under_the_previous_step() {
        let forest = vec![
            node("eng", vec![named("oncall", "Eng On-call")]),
            node("sales", vec![named("oncall", "Sales On-call")]),
        ];

        let crumbs = breadcrumbs(&forest, &path(&["sales", "oncall"]));
        let scope = resolve_drill_down(&forest, &path(&["sales", "oncall"])).expect("resolves");

        let names: Vec<&str> = crumbs.iter().map(|crumb| crumb.name.as_str()).collect();
        assert_eq!(names, vec!["sales name", "Sales On-call"]);
        assert_eq!(scope.focus.map(HierarchyNode::name), Some("Sales On-call"));
    }

    #[test]
    fn breadcrumbs_after_an_unresolved_step_use_raw_tags() {
        let forest = forest();

        let crumbs = breadcrumbs(&forest, &path(&["platform", "sales"]));

        let names: Vec<&str> = crumbs.iter().map(|crumb| crumb.name.as_str()).collect();
        assert_eq!(names, vec!["platform name", "sales"]);
    }
}
