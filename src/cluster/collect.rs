use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing::info;

use super::node::{ClusterTree, TOP_DEPTH};
use super::parse::parse_cluster_json;

const SAMPLE_DATASET: &str = include_str!("../../data/sample_clusters.json");

pub fn collect_cluster_tree(path: Option<&Path>) -> Result<ClusterTree> {
    let tree = match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read cluster dataset {}", path.display()))?;
            parse_cluster_json(&raw)
                .with_context(|| format!("failed to parse cluster dataset {}", path.display()))?
        }
        None => parse_cluster_json(SAMPLE_DATASET).context("bundled sample dataset is invalid")?,
    };

    if tree.root().children.is_empty() {
        return Err(anyhow!("cluster dataset contains no top-level clusters"));
    }

    info!(
        title = tree.title(),
        clusters = tree.node_count(),
        top_level = tree.count_at_depth(TOP_DEPTH),
        mid_level = tree.count_at_depth(1),
        leaves = tree.count_at_depth(0),
        "loaded cluster dataset"
    );

    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_sample_has_three_levels() {
        let tree = collect_cluster_tree(None).expect("sample loads");
        assert!(tree.count_at_depth(2) > 0);
        assert!(tree.count_at_depth(1) > 0);
        assert!(tree.count_at_depth(0) > 0);
    }

    #[test]
    fn missing_file_reports_path() {
        let error = collect_cluster_tree(Some(Path::new("/nonexistent/clusters.json")))
            .expect_err("missing file fails");
        assert!(format!("{error:#}").contains("/nonexistent/clusters.json"));
    }
}
