//! Configuration module
//!
//! Owns the on-disk menu configuration:
//! - the ordered list of configured menus (name, shortcut, icon, item tree)
//! - loading/saving `menus.ron` under the user config directory
//! - the shortcut set the reconciler keeps bound
//!
//! The declarative item kinds declared here are expanded into concrete
//! menu trees by the `expand` module on every open.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

/// One declarative menu item, before expansion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDescriptor {
    /// Display name
    pub name: String,
    /// Icon name or path
    #[serde(default)]
    pub icon: Option<String>,
    /// Fixed direction in degrees, [0, 360)
    #[serde(default)]
    pub angle: Option<f64>,
    /// What the item is
    pub kind: ItemKind,
}

/// The declarative item types a configured menu can contain.
///
/// One variant per type; expansion lives in the `expand` module, so adding
/// a kind means adding a variant and its expansion arm, no name lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ItemKind {
    /// Launch a command line
    Command { exec: String },
    /// Open a URI with the default handler
    Uri { uri: String },
    /// A nested menu level
    Submenu {
        #[serde(default)]
        children: Vec<ItemDescriptor>,
    },
    /// Dynamic collection: one item per favorite application, resolved
    /// fresh every time the menu opens
    Favorites,
}

/// One configured menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuDescriptor {
    /// Unique name, used to request the menu
    pub name: String,
    /// Global shortcut spec ("ctrl+alt+KeyM"), empty/absent for none
    #[serde(default)]
    pub shortcut: Option<String>,
    /// Icon shown at the center
    #[serde(default)]
    pub icon: Option<String>,
    /// Top-level items
    #[serde(default)]
    pub children: Vec<ItemDescriptor>,
}

/// The whole menu configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuConfig {
    #[serde(default)]
    pub menus: Vec<MenuDescriptor>,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            menus: vec![MenuDescriptor {
                name: "Applications".to_string(),
                shortcut: Some("ctrl+alt+KeyA".to_string()),
                icon: Some("applications-all".to_string()),
                children: vec![ItemDescriptor {
                    name: "Favorites".to_string(),
                    icon: Some("starred".to_string()),
                    angle: None,
                    kind: ItemKind::Favorites,
                }],
            }],
        }
    }
}

impl MenuConfig {
    /// Get the path to the config file
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("radial-menu")
            .join("menus.ron")
    }

    /// Load config from disk, or return defaults if not found or unreadable
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(&path) {
            Ok(content) => match ron::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "could not parse menu config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read menu config, using defaults");
                Self::default()
            }
        }
    }

    /// Save config to disk
    pub fn save(&self) -> Result<(), std::io::Error> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(path, text)
    }

    /// Look up a configured menu by name.
    pub fn menu(&self, name: &str) -> Option<&MenuDescriptor> {
        self.menus.iter().find(|m| m.name == name)
    }

    /// The menu a pressed shortcut should open. First match wins when two
    /// menus share a shortcut.
    pub fn menu_for_shortcut(&self, shortcut: &str) -> Option<&MenuDescriptor> {
        self.menus
            .iter()
            .find(|m| m.shortcut.as_deref() == Some(shortcut))
    }

    /// The distinct non-empty shortcut strings across all menus. This is
    /// exactly the set the reconciler keeps bound.
    pub fn desired_shortcuts(&self) -> HashSet<String> {
        self.menus
            .iter()
            .filter_map(|m| m.shortcut.clone())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"(
        menus: [
            (
                name: "Media",
                shortcut: Some("ctrl+alt+KeyM"),
                children: [
                    (
                        name: "Play",
                        angle: Some(90.0),
                        kind: Command(exec: "playerctl play-pause"),
                    ),
                    (
                        name: "More",
                        kind: Submenu(children: [
                            (name: "Next", kind: Command(exec: "playerctl next")),
                        ]),
                    ),
                    (
                        name: "Apps",
                        kind: Favorites,
                    ),
                ],
            ),
        ],
    )"#;

    #[test]
    fn test_parse_sample_config() {
        let config: MenuConfig = ron::from_str(SAMPLE).unwrap();
        assert_eq!(config.menus.len(), 1);
        let menu = config.menu("Media").unwrap();
        assert_eq!(menu.shortcut.as_deref(), Some("ctrl+alt+KeyM"));
        assert_eq!(menu.children.len(), 3);
        assert_eq!(menu.children[0].angle, Some(90.0));
        assert!(matches!(menu.children[2].kind, ItemKind::Favorites));
        match &menu.children[1].kind {
            ItemKind::Submenu { children } => assert_eq!(children.len(), 1),
            other => panic!("expected submenu, got {:?}", other),
        }
    }

    #[test]
    fn test_ron_round_trip() {
        let config = MenuConfig::default();
        let text =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::default()).unwrap();
        let parsed: MenuConfig = ron::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_desired_shortcuts_are_distinct_and_non_empty() {
        let mut config: MenuConfig = ron::from_str(SAMPLE).unwrap();
        config.menus.push(MenuDescriptor {
            name: "NoShortcut".to_string(),
            shortcut: Some(String::new()),
            icon: None,
            children: Vec::new(),
        });
        config.menus.push(MenuDescriptor {
            name: "SameShortcut".to_string(),
            shortcut: Some("ctrl+alt+KeyM".to_string()),
            icon: None,
            children: Vec::new(),
        });
        let desired = config.desired_shortcuts();
        assert_eq!(desired.len(), 1);
        assert!(desired.contains("ctrl+alt+KeyM"));
    }

    #[test]
    fn test_menu_lookup_by_shortcut() {
        let config: MenuConfig = ron::from_str(SAMPLE).unwrap();
        assert_eq!(
            config
                .menu_for_shortcut("ctrl+alt+KeyM")
                .map(|m| m.name.as_str()),
            Some("Media")
        );
        assert!(config.menu_for_shortcut("ctrl+KeyX").is_none());
    }
}
