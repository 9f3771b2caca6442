//! Declarative menu expansion
//!
//! Turns a configured menu descriptor into a concrete [`MenuItemNode`]
//! tree. Static kinds map to a single node; dynamic collections (the
//! favorites list) materialize one node per element. Expansion reads the
//! descriptor and the current desktop state, never mutates either, and
//! runs fresh on every open so dynamic items track reality.

use crate::apps::{self, AppInfo};
use crate::config::{ItemDescriptor, ItemKind, MenuDescriptor};
use crate::item::{ItemAction, MenuItemNode};

/// Build the full tree for a configured menu. The descriptor's own
/// name/icon become the root (the center of the pie).
pub fn build_tree(menu: &MenuDescriptor) -> MenuItemNode {
    let mut root = MenuItemNode::new(menu.name.clone());
    root.icon = menu.icon.clone();
    root.children = expand_items(&menu.children);
    root
}

fn expand_items(descriptors: &[ItemDescriptor]) -> Vec<MenuItemNode> {
    descriptors.iter().flat_map(expand_item).collect()
}

/// Expand one declarative item into concrete nodes, one arm per kind.
fn expand_item(descriptor: &ItemDescriptor) -> Vec<MenuItemNode> {
    let mut node = MenuItemNode::new(descriptor.name.clone());
    node.icon = descriptor.icon.clone();
    node.fixed_angle = descriptor.angle;

    match &descriptor.kind {
        ItemKind::Command { exec } => {
            node.action = Some(ItemAction::Launch { exec: exec.clone() });
        }
        ItemKind::Uri { uri } => {
            node.action = Some(ItemAction::OpenUri { uri: uri.clone() });
        }
        ItemKind::Submenu { children } => {
            node.children = expand_items(children);
        }
        ItemKind::Favorites => {
            node.children = apps::load_apps(&apps::favorite_app_ids())
                .into_iter()
                .map(app_node)
                .collect();
        }
    }
    vec![node]
}

/// A node launching one application.
fn app_node(app: AppInfo) -> MenuItemNode {
    let mut node = MenuItemNode::new(app.name);
    node.icon = app.icon;
    node.action = app.exec.map(|exec| ItemAction::Launch { exec });
    node
}
