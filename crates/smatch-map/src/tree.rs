//! Schema trees: database → tables → columns.
//!
//! Nodes live in a flat arena owned by the [`SchemaTree`]. Children are
//! listed by index on their parent, and the parent link is a plain index, so
//! upward traversal never needs shared ownership.

use smatch_model::{ColumnRef, Database, EntityId};

use crate::category::CategorySet;

/// Index of a node inside its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Table,
    Column,
}

/// One schema element.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub name: String,
    pub kind: NodeKind,
    /// Table represented by this node, or owning table for a column.
    pub table_id: Option<EntityId>,
    /// Set for column nodes only.
    pub column_id: Option<EntityId>,
    /// Declared data type, set for column nodes only.
    pub category: Option<String>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty() && self.kind == NodeKind::Column
    }
}

/// Snapshot of a database's structure.
///
/// The tree is not kept in sync with the [`Database`] it was built from;
/// rebuild it after mutating the database.
#[derive(Debug, Clone)]
pub struct SchemaTree {
    nodes: Vec<TreeNode>,
}

impl SchemaTree {
    const ROOT: NodeId = NodeId(0);

    /// Creates a tree holding only a root node.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            nodes: vec![TreeNode {
                name: name.into(),
                kind: NodeKind::Root,
                table_id: None,
                column_id: None,
                category: None,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Builds the tree of a database's non-empty tables.
    ///
    /// Tables are visited in name order and columns in retrieval order, so
    /// two builds of the same database yield identical node numbering.
    pub fn from_database(db: &Database) -> Self {
        let mut tree = Self::new(db.name());
        for table in db.get_tables().into_values() {
            let table_node = tree.push(TreeNode {
                name: table.name().to_string(),
                kind: NodeKind::Table,
                table_id: Some(table.id().clone()),
                column_id: None,
                category: None,
                parent: Some(Self::ROOT),
                children: Vec::new(),
            });
            for column in table.columns() {
                tree.push(TreeNode {
                    name: column.name().to_string(),
                    kind: NodeKind::Column,
                    table_id: Some(table.id().clone()),
                    column_id: Some(column.id().clone()),
                    category: Some(column.data_type().to_string()),
                    parent: Some(table_node),
                    children: Vec::new(),
                });
            }
        }
        tree
    }

    fn push(&mut self, node: TreeNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        if let Some(parent) = node.parent {
            self.nodes[parent.0].children.push(id);
        }
        self.nodes.push(node);
        id
    }

    pub fn root(&self) -> NodeId {
        Self::ROOT
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Nodes in post-order: every node appears after all of its descendants.
    pub fn post_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(Self::ROOT, false)];
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                order.push(id);
                continue;
            }
            stack.push((id, true));
            for child in self.nodes[id.0].children.iter().rev() {
                stack.push((*child, false));
            }
        }
        order
    }

    /// Non-leaf nodes (root and tables) in post-order.
    pub fn internal_post_order(&self) -> Vec<NodeId> {
        self.post_order()
            .into_iter()
            .filter(|id| !self.node(*id).is_leaf())
            .collect()
    }

    /// All column nodes in tree order.
    pub fn leaves(&self) -> Vec<NodeId> {
        self.leaves_under(Self::ROOT)
    }

    /// Column nodes in the subtree rooted at `id`, in tree order. A leaf's
    /// subtree is the leaf itself.
    pub fn leaves_under(&self, id: NodeId) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = &self.nodes[current.0];
            if node.is_leaf() {
                leaves.push(current);
            }
            for child in node.children.iter().rev() {
                stack.push(*child);
            }
        }
        leaves
    }

    /// Adds every leaf category of this tree to `set`.
    pub fn collect_categories(&self, set: &mut CategorySet) {
        for node in &self.nodes {
            if let Some(category) = &node.category {
                set.insert(category);
            }
        }
    }

    /// Column reference for a leaf node, `None` for internal nodes.
    pub fn column_ref(&self, id: NodeId) -> Option<ColumnRef> {
        let node = self.node(id);
        let table = self.node(node.parent?);
        Some(ColumnRef {
            table_id: node.table_id.clone()?,
            table_name: table.name.clone(),
            column_id: node.column_id.clone()?,
            column_name: node.name.clone(),
        })
    }
}
