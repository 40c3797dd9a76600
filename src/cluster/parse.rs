use std::collections::HashMap;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::node::{ClusterNode, ClusterTree, Measures, TOP_DEPTH};

const DEFAULT_TITLE: &str = "All clusters";

#[derive(Clone, Debug, Default, Deserialize)]
pub(super) struct RawMeasures {
    #[serde(default)]
    pub(super) global: Option<f64>,
    #[serde(default)]
    pub(super) country: HashMap<String, Option<f64>>,
    #[serde(default, alias = "stateUS", alias = "state_US")]
    pub(super) state_us: HashMap<String, Option<f64>>,
}

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawCluster {
    #[serde(default)]
    pub(super) depth: Option<i32>,
    pub(super) name: String,
    #[serde(default)]
    pub(super) description: Option<String>,
    #[serde(default)]
    pub(super) measures: RawMeasures,
    #[serde(default)]
    pub(super) children: Vec<RawCluster>,
}

pub(super) fn parse_cluster_json(raw: &str) -> Result<ClusterTree> {
    let parsed: Value = serde_json::from_str(raw).context("invalid JSON in cluster dataset")?;

    let (title, clusters) = match parsed {
        Value::Array(_) => (DEFAULT_TITLE.to_owned(), parsed),
        Value::Object(mut object) => {
            let title = object
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or(DEFAULT_TITLE)
                .to_owned();
            let clusters = object
                .remove("clusters")
                .ok_or_else(|| anyhow!("dataset object has no \"clusters\" array"))?;
            (title, clusters)
        }
        _ => return Err(anyhow!("unexpected JSON type for cluster dataset")),
    };

    let raw_clusters =
        Vec::<RawCluster>::deserialize(clusters).context("invalid cluster list in dataset")?;

    let clusters = raw_clusters
        .into_iter()
        .map(|raw| normalize_cluster(raw, TOP_DEPTH))
        .collect();

    Ok(ClusterTree::new(title, clusters))
}

fn normalize_cluster(raw: RawCluster, expected_depth: i32) -> ClusterNode {
    let depth = raw.depth.unwrap_or(expected_depth);
    if depth != expected_depth {
        warn!(
            name = %raw.name,
            depth,
            expected_depth,
            "cluster depth does not follow its parent"
        );
    }
    if !(0..=TOP_DEPTH).contains(&depth) {
        warn!(name = %raw.name, depth, "cluster depth is outside the three-level hierarchy");
    }

    let children = raw
        .children
        .into_iter()
        .map(|child| normalize_cluster(child, depth - 1))
        .collect();

    ClusterNode {
        depth,
        name: raw.name,
        description: raw
            .description
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty()),
        measures: normalize_measures(raw.measures),
        children,
    }
}

fn normalize_measures(raw: RawMeasures) -> Measures {
    Measures {
        global: raw.global,
        country: normalize_geo_map(raw.country),
        state_us: normalize_geo_map(raw.state_us),
    }
}

fn normalize_geo_map(raw: HashMap<String, Option<f64>>) -> HashMap<String, f64> {
    raw.into_iter()
        .filter_map(|(code, value)| {
            let code = normalize_geo_key(&code);
            match value {
                Some(value) if !code.is_empty() => Some((code, value)),
                _ => None,
            }
        })
        .collect()
}

pub(super) fn normalize_geo_key(value: &str) -> String {
    value.trim().to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{MetricKind, MetricSelector};

    #[test]
    fn parses_bare_array_with_inferred_depths() {
        let raw = r#"[
            {"name": "A", "measures": {"global": 100},
             "children": [{"name": "B", "children": [{"name": "C"}]}]}
        ]"#;

        let tree = parse_cluster_json(raw).expect("dataset parses");
        assert_eq!(tree.title(), DEFAULT_TITLE);

        let a = tree.resolve(&[0]).expect("A");
        let b = tree.resolve(&[0, 0]).expect("B");
        let c = tree.resolve(&[0, 0, 0]).expect("C");
        assert_eq!((a.depth, b.depth, c.depth), (2, 1, 0));
        assert_eq!(a.metric(&MetricSelector::global()), 100.0);
        assert!(c.measures.country.is_empty());
    }

    #[test]
    fn parses_titled_object_and_normalizes_geo_keys() {
        let raw = r#"{
            "title": "Industries",
            "clusters": [
                {"depth": 2, "name": "A", "description": "  ",
                 "measures": {"global": null,
                              "country": {"us": 3.5, "de": null},
                              "state_us": {" ny ": 1}}}
            ]
        }"#;

        let tree = parse_cluster_json(raw).expect("dataset parses");
        let a = tree.resolve(&[0]).expect("A");

        assert_eq!(tree.title(), "Industries");
        assert_eq!(a.description, None);
        assert_eq!(a.measures.global, None);
        assert_eq!(a.measures.country.len(), 1);
        assert_eq!(
            a.metric(&MetricSelector::new(MetricKind::Country, Some("US"))),
            3.5
        );
        assert_eq!(
            a.metric(&MetricSelector::new(MetricKind::StateUs, Some("NY"))),
            1.0
        );
    }

    #[test]
    fn keeps_explicit_depths_that_break_the_pattern() {
        let raw = r#"[{"depth": 2, "name": "A", "children": [{"depth": 0, "name": "skip"}]}]"#;
        let tree = parse_cluster_json(raw).expect("dataset parses");
        assert_eq!(tree.resolve(&[0, 0]).map(|node| node.depth), Some(0));
    }

    #[test]
    fn rejects_malformed_documents() {
        assert!(parse_cluster_json("not json").is_err());
        assert!(parse_cluster_json("42").is_err());
        assert!(parse_cluster_json(r#"{"title": "x"}"#).is_err());
        assert!(parse_cluster_json(r#"[{"depth": 2}]"#).is_err());
    }
}
