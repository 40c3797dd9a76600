use std::collections::HashMap;

pub const SYNTHETIC_ROOT_DEPTH: i32 = 3;
pub const TOP_DEPTH: i32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Global,
    Country,
    StateUs,
}

impl MetricKind {
    pub const ALL: [Self; 3] = [Self::Global, Self::Country, Self::StateUs];

    pub fn label(self) -> &'static str {
        match self {
            Self::Global => "Global",
            Self::Country => "Country",
            Self::StateUs => "US state",
        }
    }

    pub fn needs_geo_code(self) -> bool {
        !matches!(self, Self::Global)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetricSelector {
    pub metric: MetricKind,
    pub geo_code: Option<String>,
}

impl MetricSelector {
    pub fn global() -> Self {
        Self {
            metric: MetricKind::Global,
            geo_code: None,
        }
    }

    /// Builds a selector from raw user input. Codes are trimmed and
    /// upper-cased; blank codes and codes given for `Global` are dropped.
    pub fn new(metric: MetricKind, geo_code: Option<&str>) -> Self {
        let geo_code = geo_code
            .map(|code| code.trim().to_ascii_uppercase())
            .filter(|code| !code.is_empty() && metric.needs_geo_code());
        Self { metric, geo_code }
    }

    pub fn describe(&self) -> String {
        match (&self.metric, &self.geo_code) {
            (MetricKind::Global, _) => "global".to_owned(),
            (metric, Some(code)) => format!("{} {code}", metric.label().to_lowercase()),
            (metric, None) => format!("{} (no code)", metric.label().to_lowercase()),
        }
    }
}

impl Default for MetricSelector {
    fn default() -> Self {
        Self::global()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Measures {
    pub global: Option<f64>,
    pub country: HashMap<String, f64>,
    pub state_us: HashMap<String, f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClusterNode {
    pub depth: i32,
    pub name: String,
    pub description: Option<String>,
    pub measures: Measures,
    pub children: Vec<ClusterNode>,
}

impl ClusterNode {
    pub fn new(depth: i32, name: impl Into<String>) -> Self {
        Self {
            depth,
            name: name.into(),
            description: None,
            measures: Measures::default(),
            children: Vec::new(),
        }
    }

    /// Returns the measure this node is sized by, or 0 when the selector
    /// points at data the node does not have.
    pub fn metric(&self, selector: &MetricSelector) -> f64 {
        let value = match (selector.metric, selector.geo_code.as_deref()) {
            (MetricKind::Global, _) => self.measures.global,
            (MetricKind::Country, Some(code)) => self.measures.country.get(code).copied(),
            (MetricKind::StateUs, Some(code)) => self.measures.state_us.get(code).copied(),
            (_, None) => None,
        };

        value.filter(|value| value.is_finite()).unwrap_or(0.0)
    }

    pub fn has_child_at_depth(&self, depth: i32) -> bool {
        self.children.iter().any(|child| child.depth == depth)
    }

    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(ClusterNode::subtree_len)
            .sum::<usize>()
    }
}

pub type NodePath = Vec<usize>;

#[derive(Clone, Debug)]
pub struct ClusterTree {
    root: ClusterNode,
}

impl ClusterTree {
    pub fn new(title: impl Into<String>, clusters: Vec<ClusterNode>) -> Self {
        let mut root = ClusterNode::new(SYNTHETIC_ROOT_DEPTH, title);
        root.children = clusters;
        Self { root }
    }

    pub fn root(&self) -> &ClusterNode {
        &self.root
    }

    pub fn title(&self) -> &str {
        &self.root.name
    }

    pub fn resolve(&self, path: &[usize]) -> Option<&ClusterNode> {
        path.iter()
            .try_fold(&self.root, |node, &index| node.children.get(index))
    }

    pub fn ancestor_names(&self, path: &[usize]) -> Vec<&str> {
        let mut names = vec![self.root.name.as_str()];
        let mut cursor = &self.root;
        for &index in path {
            let Some(child) = cursor.children.get(index) else {
                break;
            };
            names.push(child.name.as_str());
            cursor = child;
        }
        names
    }

    pub fn node_count(&self) -> usize {
        self.root.subtree_len() - 1
    }

    pub fn count_at_depth(&self, depth: i32) -> usize {
        let mut count = 0;
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            if node.depth == depth {
                count += 1;
            }
            stack.extend(node.children.iter());
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_with_measures() -> ClusterNode {
        let mut node = ClusterNode::new(1, "Logistics");
        node.measures.global = Some(12.5);
        node.measures.country.insert("DE".to_owned(), 4.0);
        node.measures.country.insert("FR".to_owned(), f64::NAN);
        node.measures.state_us.insert("CA".to_owned(), 7.0);
        node
    }

    #[test]
    fn global_metric_reads_scalar() {
        let node = node_with_measures();
        assert_eq!(node.metric(&MetricSelector::global()), 12.5);
    }

    #[test]
    fn missing_global_is_zero() {
        let node = ClusterNode::new(1, "Empty");
        assert_eq!(node.metric(&MetricSelector::global()), 0.0);
    }

    #[test]
    fn geo_metrics_look_up_their_own_map() {
        let node = node_with_measures();
        let de = MetricSelector::new(MetricKind::Country, Some("de"));
        let ca = MetricSelector::new(MetricKind::StateUs, Some(" ca "));
        let ca_as_country = MetricSelector::new(MetricKind::Country, Some("CA"));

        assert_eq!(node.metric(&de), 4.0);
        assert_eq!(node.metric(&ca), 7.0);
        assert_eq!(node.metric(&ca_as_country), 0.0);
    }

    #[test]
    fn non_finite_and_codeless_lookups_are_zero() {
        let node = node_with_measures();
        let fr = MetricSelector::new(MetricKind::Country, Some("FR"));
        let no_code = MetricSelector::new(MetricKind::Country, None);
        let blank = MetricSelector::new(MetricKind::StateUs, Some("   "));

        assert_eq!(node.metric(&fr), 0.0);
        assert_eq!(node.metric(&no_code), 0.0);
        assert_eq!(node.metric(&blank), 0.0);
        assert_eq!(blank.geo_code, None);
    }

    #[test]
    fn selector_drops_code_for_global() {
        let selector = MetricSelector::new(MetricKind::Global, Some("US"));
        assert_eq!(selector, MetricSelector::global());
    }

    #[test]
    fn tree_resolves_paths_and_ancestors() {
        let mut top = ClusterNode::new(2, "A");
        top.children.push(ClusterNode::new(1, "B"));
        let tree = ClusterTree::new("All clusters", vec![top]);

        assert_eq!(tree.resolve(&[]).map(|node| node.depth), Some(3));
        assert_eq!(tree.resolve(&[0, 0]).map(|node| node.name.as_str()), Some("B"));
        assert!(tree.resolve(&[0, 3]).is_none());
        assert_eq!(tree.ancestor_names(&[0, 0]), vec!["All clusters", "A", "B"]);
        assert_eq!(tree.node_count(), 2);
        assert_eq!(tree.count_at_depth(1), 1);
    }
}
