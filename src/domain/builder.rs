//! Hierarchy builder: folds flat rows into a three-level tree.

use std::str::FromStr;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::{instrument, trace};

use crate::domain::entities::{BuildStats, Row, TreeNode, ROOT_LABEL};
use crate::domain::error::DomainResult;

/// Ordering of leaves under a middle node.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LeafOrder {
    /// First-seen order of the input rows
    #[default]
    Insertion,
    /// Lexicographic by leaf name
    Sorted,
}

impl FromStr for LeafOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "insertion" => Ok(Self::Insertion),
            "sorted" => Ok(Self::Sorted),
            other => Err(format!(
                "unknown leaf order '{other}', expected 'insertion' or 'sorted'"
            )),
        }
    }
}

/// Leaves collected under one (outer, middle) pair.
type LeafSet = IndexSet<String>;

/// Middle categories collected under one outer category.
type MiddleMap = IndexMap<String, LeafSet>;

/// Accumulates rows and emits the rooted hierarchy.
///
/// Every level keeps first-seen order, so the same input always produces the
/// same tree. Empty leaf labels are stored like any other value and dropped at
/// emission; outer and middle nodes are always emitted, even when childless.
#[derive(Debug)]
pub struct HierarchyBuilder {
    root_label: String,
    leaf_order: LeafOrder,
    outers: IndexMap<String, MiddleMap>,
    rows: usize,
    duplicate_leaves: usize,
}

impl Default for HierarchyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self::with_root(ROOT_LABEL)
    }

    pub fn with_root(root_label: impl Into<String>) -> Self {
        Self {
            root_label: root_label.into(),
            leaf_order: LeafOrder::default(),
            outers: IndexMap::new(),
            rows: 0,
            duplicate_leaves: 0,
        }
    }

    pub fn leaf_order(mut self, order: LeafOrder) -> Self {
        self.leaf_order = order;
        self
    }

    /// Fold one row into the accumulator.
    pub fn push(&mut self, row: Row) {
        trace!("push: {:?}", row);
        self.rows += 1;

        let Row {
            basic,
            middle,
            leaf,
        } = row;
        let leaves = self
            .outers
            .entry(basic)
            .or_default()
            .entry(middle)
            .or_default();
        if !leaves.insert(leaf) {
            self.duplicate_leaves += 1;
        }
    }

    /// Fold a fallible row stream, aborting on the first error.
    ///
    /// Nothing is emitted on failure: the caller gets the error and the
    /// partially filled builder is dropped.
    pub fn extend_rows<I>(mut self, rows: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = DomainResult<Row>>,
    {
        for row in rows {
            self.push(row?);
        }
        Ok(self)
    }

    /// Build the tree from an infallible row sequence.
    pub fn build(rows: impl IntoIterator<Item = Row>) -> TreeNode {
        let mut builder = Self::new();
        for row in rows {
            builder.push(row);
        }
        builder.finish().0
    }

    /// Emit the tree and the counters gathered so far.
    #[instrument(level = "debug", skip(self), fields(rows = self.rows))]
    pub fn finish(self) -> (TreeNode, BuildStats) {
        let mut stats = BuildStats {
            rows: self.rows,
            duplicate_leaves: self.duplicate_leaves,
            ..BuildStats::default()
        };
        let mut root = TreeNode::root(self.root_label);

        for (basic, middles) in self.outers {
            let mut outer_node = TreeNode::weighted(basic);
            for (middle, leaves) in middles {
                let mut middle_node = TreeNode::weighted(middle);
                let mut names: Vec<String> = Vec::with_capacity(leaves.len());
                for leaf in leaves {
                    if leaf.is_empty() {
                        stats.empty_leaves += 1;
                    } else {
                        names.push(leaf);
                    }
                }
                if self.leaf_order == LeafOrder::Sorted {
                    names.sort();
                }
                stats.leaves += names.len();
                middle_node
                    .children
                    .extend(names.into_iter().map(TreeNode::weighted));
                outer_node.children.push(middle_node);
                stats.middle += 1;
            }
            root.children.push(outer_node);
            stats.outer += 1;
        }

        (root, stats)
    }
}
