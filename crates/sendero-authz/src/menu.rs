//! Navigation tree filtering.
//!
//! # Purpose
//! Prunes the static sidebar tree down to what one role may see, using the
//! resolver as the only predicate.
//!
//! # Key invariants
//! - A leaf is kept iff its required permission holds.
//! - A parent is kept iff any filtered child survives, or it satisfies its own
//!   required permission (a parent that is also directly navigable).
//! - Output is a freshly allocated forest; the input is never mutated.
//! - Traversal is depth-first pre-order and preserves sibling order, so the
//!   same (tree, snapshot, role) always yields an equal result.
//!
//! # Examples
//! ```rust
//! use sendero_authz::{builtin, filter_tree};
//!
//! let snapshot = builtin::default_snapshot().expect("snapshot");
//! let visible = filter_tree(&builtin::menu_tree(), &snapshot, "tesorero");
//! assert!(visible.iter().any(|node| node.id == "finanzas"));
//! assert!(!visible.iter().any(|node| node.id == "voluntarios"));
//! ```
use crate::{MatrixSnapshot, ModuleCatalog, ModuleId, PermissionKind, has_permission};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredPermission {
    pub module: ModuleId,
    pub kind: PermissionKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuNode {
    pub id: String,
    pub label: String,
    pub route: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub required: RequiredPermission,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuNode>,
}

impl MenuNode {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        route: impl Into<String>,
        module: impl Into<String>,
        kind: PermissionKind,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            route: route.into(),
            icon: None,
            required: RequiredPermission {
                module: ModuleId::new(module),
                kind,
            },
            children: Vec::new(),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_children(mut self, children: Vec<MenuNode>) -> Self {
        self.children = children;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    fn permits(&self, snapshot: &MatrixSnapshot, role: &str) -> bool {
        has_permission(
            snapshot,
            role,
            self.required.module.as_str(),
            self.required.kind,
        )
    }
}

/// Return the part of `tree` visible to `role`.
pub fn filter_tree(tree: &[MenuNode], snapshot: &MatrixSnapshot, role: &str) -> Vec<MenuNode> {
    tree.iter()
        .filter_map(|node| filter_node(node, snapshot, role))
        .collect()
}

fn filter_node(node: &MenuNode, snapshot: &MatrixSnapshot, role: &str) -> Option<MenuNode> {
    let children = filter_tree(&node.children, snapshot, role);
    // Parents with visible descendants stay even without their own grant.
    if children.is_empty() && !node.permits(snapshot, role) {
        return None;
    }
    Some(MenuNode {
        id: node.id.clone(),
        label: node.label.clone(),
        route: node.route.clone(),
        icon: node.icon.clone(),
        required: node.required.clone(),
        children,
    })
}

/// Structural problems found in a navigation tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAnomaly {
    UnknownModule { node_id: String, module: ModuleId },
    DuplicateId(String),
    EmptyRoute(String),
}

impl std::fmt::Display for MenuAnomaly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MenuAnomaly::UnknownModule { node_id, module } => {
                write!(f, "menu node {node_id} requires unknown module {module}")
            }
            MenuAnomaly::DuplicateId(id) => write!(f, "duplicate menu node id {id}"),
            MenuAnomaly::EmptyRoute(id) => write!(f, "menu node {id} has an empty route"),
        }
    }
}

/// Report malformed nodes. Nodes referencing unknown modules stay in the tree
/// and are denied for every role at filter time.
pub fn validate_tree(tree: &[MenuNode], catalog: &ModuleCatalog) -> Vec<MenuAnomaly> {
    let mut seen = HashSet::new();
    let mut anomalies = Vec::new();
    let mut stack: Vec<&MenuNode> = tree.iter().rev().collect();
    while let Some(node) = stack.pop() {
        if !seen.insert(node.id.as_str()) {
            anomalies.push(MenuAnomaly::DuplicateId(node.id.clone()));
        }
        if node.route.trim().is_empty() {
            anomalies.push(MenuAnomaly::EmptyRoute(node.id.clone()));
        }
        if !catalog.contains(node.required.module.as_str()) {
            anomalies.push(MenuAnomaly::UnknownModule {
                node_id: node.id.clone(),
                module: node.required.module.clone(),
            });
        }
        stack.extend(node.children.iter().rev());
    }
    anomalies
}

/// Locate the node routed at `route` and return the path from its root.
pub fn find_route<'a>(tree: &'a [MenuNode], route: &str) -> Option<Vec<&'a MenuNode>> {
    for node in tree {
        if node.route == route {
            return Some(vec![node]);
        }
        if let Some(mut path) = find_route(&node.children, route) {
            path.insert(0, node);
            return Some(path);
        }
    }
    None
}

/// Routes of every node in `tree`, pre-order.
pub fn visible_routes(tree: &[MenuNode]) -> Vec<&str> {
    let mut routes = Vec::new();
    collect_routes(tree, &mut routes);
    routes
}

fn collect_routes<'a>(tree: &'a [MenuNode], routes: &mut Vec<&'a str>) {
    for node in tree {
        routes.push(node.route.as_str());
        collect_routes(&node.children, routes);
    }
}
