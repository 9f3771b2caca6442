//! Desktop application source
//!
//! Resolves favorite application ids to launchable entries by parsing
//! their desktop files. Backs the `Favorites` dynamic item kind.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A launchable application, as far as the menu cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    /// Application id (desktop file name without .desktop)
    pub id: String,
    /// Display name
    pub name: String,
    /// Icon name or path
    pub icon: Option<String>,
    /// Executable command, field codes still included
    pub exec: Option<String>,
}

/// Standard locations for desktop entries.
fn desktop_entry_dirs() -> Vec<PathBuf> {
    let mut dirs_list = vec![
        PathBuf::from("/usr/share/applications"),
        PathBuf::from("/usr/local/share/applications"),
    ];
    if let Some(data) = dirs::data_local_dir() {
        dirs_list.push(data.join("applications"));
    }
    // Flatpak and Snap exports
    dirs_list.push(PathBuf::from("/var/lib/flatpak/exports/share/applications"));
    if let Some(home) = dirs::home_dir() {
        dirs_list.push(home.join(".local/share/flatpak/exports/share/applications"));
    }
    dirs_list.push(PathBuf::from("/var/lib/snapd/desktop/applications"));
    dirs_list
}

/// Find the desktop entry for an app id, trying an exact file name first
/// and falling back to a case-insensitive match on the last dotted
/// component (app id "slack" matches "com.slack.Slack.desktop").
fn locate_desktop_entry(app_id: &str) -> Option<PathBuf> {
    let exact = format!("{}.desktop", app_id);
    for dir in desktop_entry_dirs() {
        let candidate = dir.join(&exact);
        if candidate.exists() {
            return Some(candidate);
        }
    }

    let wanted = app_id.to_lowercase();
    for dir in desktop_entry_dirs() {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let file_name = entry.file_name();
            let Some(stem) = file_name.to_string_lossy().strip_suffix(".desktop").map(str::to_string)
            else {
                continue;
            };
            if stem.to_lowercase() == wanted {
                return Some(entry.path());
            }
            if stem
                .rsplit('.')
                .next()
                .is_some_and(|last| last.to_lowercase() == wanted)
            {
                return Some(entry.path());
            }
        }
    }
    None
}

/// Pull Name/Icon/Exec out of the [Desktop Entry] group. Deliberately
/// minimal; localized keys and actions are the renderer's problem.
fn read_desktop_entry(path: &Path) -> Option<(String, Option<String>, Option<String>)> {
    let content = fs::read_to_string(path).ok()?;
    let mut name = None;
    let mut icon = None;
    let mut exec = None;
    let mut in_entry_group = false;

    for line in content.lines() {
        let line = line.trim();
        if line.starts_with('[') {
            in_entry_group = line == "[Desktop Entry]";
            continue;
        }
        if !in_entry_group {
            continue;
        }
        if let Some(value) = line.strip_prefix("Name=") {
            name.get_or_insert_with(|| value.to_string());
        } else if let Some(value) = line.strip_prefix("Icon=") {
            icon = Some(value.to_string());
        } else if let Some(value) = line.strip_prefix("Exec=") {
            exec = Some(value.to_string());
        }
    }

    Some((name?, icon, exec))
}

/// Load a single application by id.
pub fn load_app_info(app_id: &str) -> Option<AppInfo> {
    let path = locate_desktop_entry(app_id)?;
    let (name, icon, exec) = read_desktop_entry(&path)?;
    Some(AppInfo {
        id: app_id.to_string(),
        name,
        icon,
        exec,
    })
}

/// Load several applications, skipping ids with no usable desktop entry.
pub fn load_apps(app_ids: &[String]) -> Vec<AppInfo> {
    app_ids
        .iter()
        .filter_map(|id| {
            let app = load_app_info(id);
            if app.is_none() {
                debug!(id = %id, "no desktop entry found, skipping");
            }
            app
        })
        .collect()
}

/// Path of COSMIC's dock favorites list.
fn favorites_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("cosmic/com.system76.CosmicAppList/v1/favorites"))
}

/// Read the user's favorite app ids from the COSMIC dock config.
/// The file is a RON array of desktop-file names.
pub fn favorite_app_ids() -> Vec<String> {
    let path = match favorites_path() {
        Some(p) => p,
        None => {
            warn!("could not determine config directory");
            return Vec::new();
        }
    };
    let content = match fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no favorites file");
            return Vec::new();
        }
    };
    match ron::from_str::<Vec<String>>(&content) {
        Ok(favorites) => favorites,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not parse favorites");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_apps_skips_unknown_ids() {
        let apps = load_apps(&["surely-not-a-real-desktop-entry".to_string()]);
        assert!(apps.is_empty());
    }

    #[test]
    fn test_read_desktop_entry_ignores_other_groups() {
        let dir = std::env::temp_dir().join("radial-menu-test-entry");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("sample.desktop");
        fs::write(
            &path,
            "[Desktop Entry]\nName=Sample\nIcon=sample-icon\nExec=sample %U\n\
             [Desktop Action new]\nName=Other Name\nExec=other\n",
        )
        .unwrap();

        let (name, icon, exec) = read_desktop_entry(&path).unwrap();
        assert_eq!(name, "Sample");
        assert_eq!(icon.as_deref(), Some("sample-icon"));
        assert_eq!(exec.as_deref(), Some("sample %U"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_read_desktop_entry_requires_name() {
        let dir = std::env::temp_dir().join("radial-menu-test-entry");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("nameless.desktop");
        fs::write(&path, "[Desktop Entry]\nExec=something\n").unwrap();
        assert!(read_desktop_entry(&path).is_none());
        fs::remove_file(&path).unwrap();
    }
}
