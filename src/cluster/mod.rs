mod collect;
mod node;
mod parse;

pub use collect::collect_cluster_tree;
pub use node::{ClusterNode, ClusterTree, MetricKind, MetricSelector, NodePath, TOP_DEPTH};
