//! Category hierarchy rules and tree assembly.

use std::collections::HashMap;

use serde::Serialize;

use crate::types::DbId;

/// Maximum number of levels in the category hierarchy (root = level 1).
pub const MAX_CATEGORY_DEPTH: usize = 3;

/// Validate a proposed parent for a category.
///
/// - `category_id`: the category being updated, or `None` when creating.
/// - `parent_chain`: ids from the proposed parent up to the root, parent
///   first. Empty when `parent_id` is `None`.
/// - `subtree_height`: levels below and including the category itself
///   (1 for a leaf or a new category).
pub fn validate_parent(
    category_id: Option<DbId>,
    parent_id: Option<DbId>,
    parent_chain: &[DbId],
    subtree_height: usize,
) -> Result<(), String> {
    let Some(parent_id) = parent_id else {
        return if subtree_height > MAX_CATEGORY_DEPTH {
            Err(depth_error())
        } else {
            Ok(())
        };
    };

    if let Some(id) = category_id {
        if id == parent_id {
            return Err("A category cannot be its own parent".to_string());
        }
        if parent_chain.contains(&id) {
            return Err("A category cannot be moved under one of its descendants".to_string());
        }
    }

    if parent_chain.len() + subtree_height.max(1) > MAX_CATEGORY_DEPTH {
        return Err(depth_error());
    }
    Ok(())
}

fn depth_error() -> String {
    format!("Category hierarchy may not exceed {MAX_CATEGORY_DEPTH} levels")
}

/// Anything that can be arranged into a parent/child tree.
pub trait TreeItem {
    fn id(&self) -> DbId;
    fn parent_id(&self) -> Option<DbId>;
}

/// A node of an assembled tree. The item's own fields are flattened into
/// the serialized node.
#[derive(Debug, Clone, Serialize)]
pub struct TreeNode<T> {
    #[serde(flatten)]
    pub item: T,
    pub children: Vec<TreeNode<T>>,
}

/// Assemble a flat, already-ordered list into a forest.
///
/// Sibling order follows input order. Items whose parent is missing from the
/// list are promoted to roots so nothing is silently dropped.
pub fn build_tree<T: TreeItem>(items: Vec<T>) -> Vec<TreeNode<T>> {
    let ids: Vec<DbId> = items.iter().map(TreeItem::id).collect();
    let mut children_of: HashMap<Option<DbId>, Vec<T>> = HashMap::new();

    for item in items {
        let parent = item.parent_id().filter(|p| ids.contains(p));
        children_of.entry(parent).or_default().push(item);
    }

    fn attach<T: TreeItem>(
        parent: Option<DbId>,
        children_of: &mut HashMap<Option<DbId>, Vec<T>>,
    ) -> Vec<TreeNode<T>> {
        let items = children_of.remove(&parent).unwrap_or_default();
        items
            .into_iter()
            .map(|item| {
                let id = item.id();
                TreeNode {
                    item,
                    children: attach(Some(id), children_of),
                }
            })
            .collect()
    }

    attach(None, &mut children_of)
}

/// Height of the subtree rooted at `root` (1 for a leaf).
pub fn subtree_height(root: DbId, edges: &[(DbId, Option<DbId>)]) -> usize {
    fn height(node: DbId, edges: &[(DbId, Option<DbId>)], guard: usize) -> usize {
        if guard == 0 {
            return 1;
        }
        1 + edges
            .iter()
            .filter(|(_, parent)| *parent == Some(node))
            .map(|(child, _)| height(*child, edges, guard - 1))
            .max()
            .unwrap_or(0)
    }
    height(root, edges, edges.len() + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Serialize)]
    struct Cat {
        id: DbId,
        parent_id: Option<DbId>,
    }

    impl TreeItem for Cat {
        fn id(&self) -> DbId {
            self.id
        }
        fn parent_id(&self) -> Option<DbId> {
            self.parent_id
        }
    }

    fn cat(id: DbId, parent_id: Option<DbId>) -> Cat {
        Cat { id, parent_id }
    }

    #[test]
    fn root_category_is_valid() {
        assert!(validate_parent(None, None, &[], 1).is_ok());
    }

    #[test]
    fn own_parent_rejected() {
        let err = validate_parent(Some(4), Some(4), &[4], 1).unwrap_err();
        assert!(err.contains("its own parent"));
    }

    #[test]
    fn cycle_rejected() {
        // 1 -> 2 -> 3; moving 1 under 3 would create a cycle.
        let err = validate_parent(Some(1), Some(3), &[3, 2, 1], 3).unwrap_err();
        assert!(err.contains("descendants"));
    }

    #[test]
    fn depth_limit_enforced() {
        assert!(validate_parent(None, Some(2), &[2, 1], 1).is_ok());
        assert!(validate_parent(None, Some(3), &[3, 2, 1], 1).is_err());
        // Moving a two-level subtree under a second-level category.
        assert!(validate_parent(Some(9), Some(2), &[2, 1], 2).is_err());
    }

    #[test]
    fn tree_preserves_sibling_order() {
        let tree = build_tree(vec![
            cat(1, None),
            cat(3, Some(1)),
            cat(2, Some(1)),
            cat(4, None),
        ]);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].item.id, 1);
        let children: Vec<DbId> = tree[0].children.iter().map(|c| c.item.id).collect();
        assert_eq!(children, vec![3, 2]);
        assert!(tree[1].children.is_empty());
    }

    #[test]
    fn orphans_become_roots() {
        let tree = build_tree(vec![cat(5, Some(99)), cat(6, Some(5))]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].item.id, 5);
        assert_eq!(tree[0].children[0].item.id, 6);
    }

    #[test]
    fn tree_node_serializes_flattened() {
        let tree = build_tree(vec![cat(1, None)]);
        let json = serde_json::to_value(&tree[0]).unwrap();
        assert_eq!(json["id"], 1);
        assert!(json["children"].as_array().unwrap().is_empty());
    }

    #[test]
    fn subtree_height_counts_levels() {
        let edges = vec![(1, None), (2, Some(1)), (3, Some(2)), (4, Some(1))];
        assert_eq!(subtree_height(1, &edges), 3);
        assert_eq!(subtree_height(2, &edges), 2);
        assert_eq!(subtree_height(4, &edges), 1);
    }
}
