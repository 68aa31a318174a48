use serde::{Deserialize, Serialize};

use crate::database::Record;

/// Parent id of top-level nodes
pub const ROOT_ID: i64 = 0;

/// A record that takes part in a self-referencing parent/child hierarchy
pub trait HierarchyNode: Record {
    /// Column holding the parent id
    const PARENT_FIELD: &'static str = "node_id";

    /// Columns a keyword search is OR-matched across
    const KEYWORD_FIELDS: &'static [&'static str];

    fn id(&self) -> i64;

    fn parent_id(&self) -> i64;

    /// Display name
    fn label(&self) -> &str;
}

/// A node with its resolved children; serializes as the node's own fields plus `children`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode<T> {
    #[serde(flatten)]
    pub node: T,
    pub children: Vec<TreeNode<T>>,
}

impl<T> TreeNode<T> {
    pub fn new(node: T, children: Vec<TreeNode<T>>) -> Self {
        Self { node, children }
    }

    pub fn leaf(node: T) -> Self {
        Self::new(node, Vec::new())
    }
}

impl<T: HierarchyNode> TreeNode<T> {
    pub fn id(&self) -> i64 {
        self.node.id()
    }
}
