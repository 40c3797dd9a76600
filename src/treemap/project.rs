use crate::cluster::{ClusterNode, MetricSelector, NodePath};

#[derive(Clone, Debug, PartialEq)]
pub struct ProjectedTile {
    pub label: String,
    pub value: f64,
    pub node: NodePath,
    pub drillable: bool,
}

/// Collects every node of `focus`'s subtree (including `focus`) that sits at
/// `target_depth`. Tiles without a positive finite value are left out.
pub fn project(
    focus: &ClusterNode,
    focus_path: &[usize],
    target_depth: i32,
    selector: &MetricSelector,
) -> Vec<ProjectedTile> {
    let mut tiles = Vec::new();
    if target_depth < 0 {
        return tiles;
    }

    let mut stack: Vec<(&ClusterNode, NodePath)> = vec![(focus, focus_path.to_vec())];
    while let Some((node, path)) = stack.pop() {
        if node.depth == target_depth {
            let value = node.metric(selector);
            if value.is_finite() && value > 0.0 {
                tiles.push(ProjectedTile {
                    label: node.name.clone(),
                    value,
                    drillable: target_depth > 0 && node.has_child_at_depth(target_depth - 1),
                    node: path.clone(),
                });
            }
        }

        // Reverse push keeps pre-order output in child order.
        for (index, child) in node.children.iter().enumerate().rev() {
            let mut child_path = path.clone();
            child_path.push(index);
            stack.push((child, child_path));
        }
    }

    tiles
}
