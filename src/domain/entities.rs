//! Domain entities: core data structures

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

/// Label of the synthetic root node.
pub const ROOT_LABEL: &str = "flavors";

/// Sizing weight carried by every non-root node.
pub const NODE_WEIGHT: u32 = 1;

/// Names of the three input columns feeding the hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ColumnNames {
    /// Outer category column
    pub outer: String,
    /// Middle category column
    pub middle: String,
    /// Leaf label column
    pub leaf: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            outer: "Basic".into(),
            middle: "Middle".into(),
            leaf: "Final".into(),
        }
    }
}

impl ColumnNames {
    pub fn as_array(&self) -> [&str; 3] {
        [&self.outer, &self.middle, &self.leaf]
    }
}

/// One input record: outer category, middle category and leaf label.
///
/// Any of the three values may be empty. An empty leaf is accepted here and
/// dropped when the tree is emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub basic: String,
    pub middle: String,
    pub leaf: String,
}

impl Row {
    pub fn new(basic: impl Into<String>, middle: impl Into<String>, leaf: impl Into<String>) -> Self {
        Self {
            basic: basic.into(),
            middle: middle.into(),
            leaf: leaf.into(),
        }
    }

    /// Assemble a row from a field lookup.
    ///
    /// `lookup` returns the value stored under a column name, or `None` when
    /// the record has no such field. The first absent column aborts with
    /// [`DomainError::MissingField`].
    ///
    /// # Arguments
    /// * `lookup` - Field accessor for one record
    /// * `columns` - Column names to read
    /// * `line` - 1-based input line, used for error reporting
    pub fn from_lookup<'a, F>(lookup: F, columns: &ColumnNames, line: u64) -> DomainResult<Self>
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let field = |name: &str| {
            lookup(name)
                .map(str::to_string)
                .ok_or_else(|| DomainError::MissingField {
                    field: name.to_string(),
                    line,
                })
        };

        Ok(Self {
            basic: field(columns.outer.as_str())?,
            middle: field(columns.middle.as_str())?,
            leaf: field(columns.leaf.as_str())?,
        })
    }
}

/// Node of the emitted hierarchy.
///
/// Serializes to the `name`/`loc`/`children` shape expected by sunburst
/// widgets. The root carries no weight, so `loc` is omitted there.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TreeNode {
    pub name: String,
    #[serde(rename = "loc", default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Create the synthetic root container.
    pub fn root(label: impl Into<String>) -> Self {
        Self {
            name: label.into(),
            weight: None,
            children: Vec::new(),
        }
    }

    /// Create a weighted non-root node without children.
    pub fn weighted(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weight: Some(NODE_WEIGHT),
            children: Vec::new(),
        }
    }

    /// Find a direct child by name.
    pub fn child(&self, name: &str) -> Option<&TreeNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Number of levels in this subtree, counting this node.
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(TreeNode::depth)
            .max()
            .unwrap_or(0)
    }

    /// Number of nodes exactly `level` steps below this one.
    pub fn count_at(&self, level: usize) -> usize {
        if level == 0 {
            1
        } else {
            self.children.iter().map(|c| c.count_at(level - 1)).sum()
        }
    }
}

/// Counters collected while folding rows into a hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    /// Data rows folded into the builder
    pub rows: usize,
    /// Emitted outer nodes
    pub outer: usize,
    /// Emitted middle nodes
    pub middle: usize,
    /// Emitted leaf nodes
    pub leaves: usize,
    /// Pairs that received an empty leaf label
    pub empty_leaves: usize,
    /// Rows whose leaf already existed under the same pair
    pub duplicate_leaves: usize,
}
