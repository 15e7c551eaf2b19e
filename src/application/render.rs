//! Output renderers for the emitted hierarchy.

use termtree::Tree;
use tracing::instrument;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::TreeNode;

/// Serialize the hierarchy into the `name`/`loc`/`children` JSON shape.
pub fn to_json(tree: &TreeNode, pretty: bool) -> ApplicationResult<String> {
    let result = if pretty {
        serde_json::to_string_pretty(tree)
    } else {
        serde_json::to_string(tree)
    };
    result.map_err(|e| ApplicationError::OperationFailed {
        context: "serialize hierarchy".to_string(),
        source: Box::new(e),
    })
}

/// Conversion into a printable box-drawing tree.
pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for TreeNode {
    #[instrument(level = "trace", skip(self), fields(name = %self.name))]
    fn to_tree_string(&self) -> Tree<String> {
        // Empty middle labels are legal, keep them visible
        let label = if self.name.is_empty() {
            "\"\"".to_string()
        } else {
            self.name.clone()
        };

        let leaves: Vec<_> = self.children.iter().map(|c| c.to_tree_string()).collect();

        Tree::new(label).with_leaves(leaves)
    }
}
