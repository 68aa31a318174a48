use serde::Serialize;

use crate::cli::OutputFormat;
use crate::tree::{HierarchyNode, PermissionNode, TreeNode};
use crate::services::RouteTree;

pub fn output_json<T: Serialize>(data: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Print a resolved hierarchy, one indented line per node
pub fn output_tree<T: HierarchyNode>(output_format: &OutputFormat, tree: &[TreeNode<T>]) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => output_json(&tree),
        OutputFormat::Text => {
            if tree.is_empty() {
                println!("(empty)");
            }
            for line in tree_lines(tree, 0) {
                println!("{}", line);
            }
            Ok(())
        }
    }
}

pub fn tree_lines<T: HierarchyNode>(tree: &[TreeNode<T>], depth: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for item in tree {
        lines.push(format!("{}{} (#{})", "  ".repeat(depth), item.node.label(), item.node.id()));
        lines.extend(tree_lines(&item.children, depth + 1));
    }
    lines
}

pub fn output_permissions(output_format: &OutputFormat, tree: &[PermissionNode]) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => output_json(&tree),
        OutputFormat::Text => {
            if tree.is_empty() {
                println!("(no assignable permissions)");
            }
            for line in permission_lines(tree, 0) {
                println!("{}", line);
            }
            Ok(())
        }
    }
}

fn permission_lines(tree: &[PermissionNode], depth: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for node in tree {
        let marker = if node.disabled { "" } else { "* " };
        lines.push(format!("{}{}[{}] {} = {}", "  ".repeat(depth), marker, node.key, node.label, node.value));
        lines.extend(permission_lines(&node.children, depth + 1));
    }
    lines
}

pub fn output_routes(output_format: &OutputFormat, routes: &[RouteTree]) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => output_json(&routes),
        OutputFormat::Text => {
            if routes.is_empty() {
                println!("(no routes)");
            }
            for line in route_lines(routes, 0) {
                println!("{}", line);
            }
            Ok(())
        }
    }
}

fn route_lines(routes: &[RouteTree], depth: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for route in routes {
        lines.push(format!("{}{} -> {}", "  ".repeat(depth), route.name, route.path));
        if let Some(children) = &route.children {
            lines.extend(route_lines(children, depth + 1));
        }
    }
    lines
}
