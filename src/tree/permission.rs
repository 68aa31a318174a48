use serde::{Deserialize, Serialize};

use crate::database::models::{Menu, PermissionKind};
use crate::tree::node::TreeNode;

/// Checkbox-tree node for the permission editor.
///
/// Menu groups are always `disabled`; only button/interface leaves can be selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionNode {
    pub key: String,
    pub label: String,
    pub value: String,
    pub disabled: bool,
    pub children: Vec<PermissionNode>,
}

impl PermissionNode {
    fn group(key: String, menu: &Menu) -> Self {
        Self {
            key,
            label: menu.menu_name.clone(),
            value: menu.route_path.clone(),
            disabled: true,
            children: Vec::new(),
        }
    }

    fn leaf(key: String, label: &str, value: &str) -> Self {
        Self {
            key,
            label: label.to_string(),
            value: value.to_string(),
            disabled: false,
            children: Vec::new(),
        }
    }
}

/// Permission tree for `kind` with every group lacking selectable leaves removed
pub fn build_permission_tree(menu_tree: &[TreeNode<Menu>], kind: PermissionKind) -> Vec<PermissionNode> {
    prune_permission_tree(transform_permission_tree(menu_tree, kind))
}

/// Map a menu tree to permission groups keyed `"{depth}-{index}"`, each followed
/// by its `kind` entries as leaves keyed `"{depth}-{index}-{entry}"` (all 1-based).
pub fn transform_permission_tree(menu_tree: &[TreeNode<Menu>], kind: PermissionKind) -> Vec<PermissionNode> {
    transform_level(menu_tree, kind, 1)
}

fn transform_level(level: &[TreeNode<Menu>], kind: PermissionKind, depth: usize) -> Vec<PermissionNode> {
    level
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let key = format!("{}-{}", depth, i + 1);
            let mut group = PermissionNode::group(key.clone(), &item.node);
            group.children = transform_level(&item.children, kind, depth + 1);
            group.children.extend(
                item.node
                    .permissions(kind)
                    .iter()
                    .enumerate()
                    .map(|(j, entry)| PermissionNode::leaf(format!("{}-{}", key, j + 1), &entry.description, &entry.code)),
            );
            group
        })
        .collect()
}

/// Keep a node when it is enabled or still has children after pruning. Keys are not renumbered.
pub fn prune_permission_tree(tree: Vec<PermissionNode>) -> Vec<PermissionNode> {
    tree.into_iter()
        .filter_map(|mut node| {
            node.children = prune_permission_tree(std::mem::take(&mut node.children));
            (!node.disabled || !node.children.is_empty()).then_some(node)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{MenuType, SubPermission};
    use sqlx::types::Json;

    fn menu(id: i64, name: &str, buttons: &[(&str, &str)]) -> Menu {
        Menu {
            id,
            menu_name: name.to_string(),
            route_path: format!("/{}", name.to_lowercase()),
            menu_type: MenuType::Route,
            buttons: Json(
                buttons
                    .iter()
                    .map(|(code, description)| SubPermission {
                        code: code.to_string(),
                        description: description.to_string(),
                    })
                    .collect(),
            ),
            ..Default::default()
        }
    }

    fn directory(id: i64, name: &str, children: Vec<TreeNode<Menu>>) -> TreeNode<Menu> {
        TreeNode::new(Menu { menu_type: MenuType::Directory, ..menu(id, name, &[]) }, children)
    }

    #[test]
    fn transform_assigns_depth_and_position_keys() {
        let tree = vec![
            directory(1, "Manage", vec![TreeNode::leaf(menu(2, "Users", &[("user:add", "Add user"), ("user:del", "Delete user")]))]),
            TreeNode::leaf(menu(3, "Home", &[("home:view", "View")])),
        ];

        let out = transform_permission_tree(&tree, PermissionKind::Buttons);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].key, "1-1");
        assert!(out[0].disabled);
        assert_eq!(out[0].value, "/manage");

        let users = &out[0].children[0];
        assert_eq!((users.key.as_str(), users.label.as_str()), ("2-1", "Users"));
        let leaves: Vec<(&str, &str, bool)> =
            users.children.iter().map(|n| (n.key.as_str(), n.value.as_str(), n.disabled)).collect();
        assert_eq!(leaves, vec![("2-1-1", "user:add", false), ("2-1-2", "user:del", false)]);

        assert_eq!(out[1].key, "1-2");
        assert_eq!(out[1].children[0].key, "1-2-1");
        assert_eq!(out[1].children[0].label, "View");
    }

    #[test]
    fn menu_children_come_before_own_leaves() {
        let mut parent = directory(1, "Manage", vec![TreeNode::leaf(menu(2, "Users", &[("user:add", "Add")]))]);
        parent.node.buttons = Json(vec![SubPermission { code: "manage:view".to_string(), description: "View".to_string() }]);

        let out = transform_permission_tree(&[parent], PermissionKind::Buttons);
        let keys: Vec<&str> = out[0].children.iter().map(|n| n.key.as_str()).collect();
        assert_eq!(keys, vec!["2-1", "1-1-1"]);
    }

    #[test]
    fn prunes_groups_without_leaves_and_restores_them_when_a_leaf_appears() {
        let bare = vec![directory(1, "Manage", vec![TreeNode::leaf(menu(2, "Users", &[]))])];
        assert!(build_permission_tree(&bare, PermissionKind::Buttons).is_empty());

        let with_button = vec![directory(1, "Manage", vec![TreeNode::leaf(menu(2, "Users", &[("user:add", "Add")]))])];
        let out = build_permission_tree(&with_button, PermissionKind::Buttons);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].key, "1-1");
        assert_eq!(out[0].children[0].key, "2-1");
        assert_eq!(out[0].children[0].children[0].value, "user:add");

        // The button list does not count toward the interface tree
        assert!(build_permission_tree(&with_button, PermissionKind::Interfaces).is_empty());
    }

    #[test]
    fn pruning_keeps_original_keys() {
        let tree = vec![directory(
            1,
            "Manage",
            vec![
                TreeNode::leaf(menu(4, "Empty", &[])),
                TreeNode::leaf(menu(3, "Roles", &[("role:add", "Add role")])),
            ],
        )];
        let out = build_permission_tree(&tree, PermissionKind::Buttons);
        let keys: Vec<&str> = out[0].children.iter().map(|n| n.key.as_str()).collect();
        assert_eq!(keys, vec!["2-2"]);
    }

    #[test]
    fn serializes_checkbox_shape() {
        let node = PermissionNode::leaf("1-1-1".to_string(), "Add", "user:add");
        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            serde_json::json!({ "key": "1-1-1", "label": "Add", "value": "user:add", "disabled": false, "children": [] })
        );
    }
}
