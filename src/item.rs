//! Menu item tree model
//!
//! A menu is a tree of [`MenuItemNode`]: the root is the center of the pie,
//! every other node is a wedge. Nodes optionally carry a fixed direction
//! (honored by the layout engine) and an action invoked on selection.

use std::process::Command;
use tracing::{info, warn};

/// One node of a menu tree.
#[derive(Debug, Clone)]
pub struct MenuItemNode {
    /// Display name
    pub name: String,
    /// Icon name or path (opaque here, consumed by the renderer)
    pub icon: Option<String>,
    /// Direction requested by configuration, degrees in [0, 360)
    pub fixed_angle: Option<f64>,
    /// Direction computed by the layout engine, degrees in [0, 360).
    /// The root never gets one; every other node in a shown tree does.
    pub angle: Option<f64>,
    /// Stable identifier. Ad-hoc requests may pre-assign one; otherwise
    /// the addressing pass fills in the positional form ("/2/4").
    pub id: Option<String>,
    /// Child nodes, ordered
    pub children: Vec<MenuItemNode>,
    /// What selecting this node does (absent on ad-hoc nodes and submenus)
    pub action: Option<ItemAction>,
}

impl MenuItemNode {
    /// Create a leaf node with just a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: None,
            fixed_angle: None,
            angle: None,
            id: None,
            children: Vec::new(),
            action: None,
        }
    }

    /// Number of nodes in this subtree, including self.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(MenuItemNode::node_count).sum::<usize>()
    }
}

/// Action attached to a menu item by configuration expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemAction {
    /// Spawn a command line (desktop-file style, may contain field codes)
    Launch { exec: String },
    /// Open a URI with the desktop's default handler
    OpenUri { uri: String },
}

impl ItemAction {
    /// Run the action, detached. Failures are logged, never propagated;
    /// by the time an action runs the session is already closing.
    pub fn invoke(&self) {
        match self {
            Self::Launch { exec } => {
                // Desktop files embed field codes like %u or %F that only
                // mean something to a full launcher - drop them.
                let parts: Vec<&str> = exec
                    .split_whitespace()
                    .filter(|s| !s.starts_with('%'))
                    .collect();
                let Some((program, args)) = parts.split_first() else {
                    warn!(exec = %exec, "action has an empty command line");
                    return;
                };
                info!(program = %program, "launching");
                if let Err(e) = Command::new(program).args(args).spawn() {
                    warn!(program = %program, error = %e, "failed to launch");
                }
            }
            Self::OpenUri { uri } => {
                info!(uri = %uri, "opening");
                if let Err(e) = Command::new("xdg-open").arg(uri).spawn() {
                    warn!(uri = %uri, error = %e, "failed to open");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_count_counts_whole_subtree() {
        let mut root = MenuItemNode::new("root");
        let mut sub = MenuItemNode::new("sub");
        sub.children.push(MenuItemNode::new("leaf"));
        root.children.push(sub);
        root.children.push(MenuItemNode::new("leaf2"));
        assert_eq!(root.node_count(), 4);
    }
}
