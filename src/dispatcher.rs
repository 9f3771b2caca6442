//! Request dispatcher and error taxonomy
//!
//! The boundary between external callers and the menu session. Named
//! requests are looked up in the configuration and expanded; ad-hoc
//! requests arrive as a JSON tree description (object or serialized
//! text). Every failure is mapped to one of the stable negative error
//! codes below; nothing propagates past this module uncaught.

use serde::Deserialize;
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::warn;

use crate::config::MenuConfig;
use crate::expand;
use crate::item::MenuItemNode;
use crate::layout::AngleConflict;
use crate::path::PathId;
use crate::session::{MenuRequest, MenuSession, SessionEvent};

/// Why a request was rejected. Codes are part of the wire contract and
/// never change between versions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    /// Catch-all for failures no other code describes
    #[error("unexpected failure: {0}")]
    Unknown(String),
    /// The serialized menu description was not valid JSON
    #[error("menu description is not valid JSON: {0}")]
    InvalidJson(String),
    /// The layout engine could not honor the fixed item angles
    #[error(transparent)]
    InvalidAngles(#[from] AngleConflict),
    /// The menu description has no root items
    #[error("the menu has no root items")]
    PropertyMissing,
    /// No configured menu has the requested name
    #[error("no menu named {0:?} is configured")]
    NoSuchMenu(String),
    /// Another menu session is already active
    #[error("another menu session is already active")]
    AlreadyActive,
}

impl RequestError {
    /// The stable negative wire code. Success is the non-negative
    /// session id, so the two ranges never collide.
    pub fn code(&self) -> i32 {
        match self {
            Self::Unknown(_) => -1,
            Self::InvalidJson(_) => -2,
            Self::InvalidAngles(_) => -3,
            Self::PropertyMissing => -4,
            Self::NoSuchMenu(_) => -5,
            Self::AlreadyActive => -6,
        }
    }
}

/// Shape of an ad-hoc menu description. All fields are optional; an
/// empty tree is caught by the session, not the parser.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuDescription {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub angle: Option<f64>,
    /// Caller-supplied stable id, reported back on selection
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub children: Vec<MenuDescription>,
}

impl MenuDescription {
    fn into_node(self) -> MenuItemNode {
        MenuItemNode {
            name: self.name.unwrap_or_default(),
            icon: self.icon,
            fixed_angle: self.angle,
            angle: None,
            id: self.id,
            children: self.children.into_iter().map(Self::into_node).collect(),
            action: None,
        }
    }
}

/// Translates inbound requests into session calls.
#[derive(Debug)]
pub struct Dispatcher {
    session: MenuSession,
    config: MenuConfig,
}

impl Dispatcher {
    pub fn new(config: MenuConfig, events: Sender<SessionEvent>) -> Self {
        Self {
            session: MenuSession::new(events),
            config,
        }
    }

    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    /// Swap in a fresh configuration. The active session, if any, keeps
    /// the tree it was opened with.
    pub fn set_config(&mut self, config: MenuConfig) {
        self.config = config;
    }

    /// Open a configured menu by name.
    pub fn show_menu(&mut self, name: &str) -> Result<u32, RequestError> {
        self.open_named(name, false)
    }

    /// Open a configured menu by name, in preview mode.
    pub fn preview_menu(&mut self, name: &str) -> Result<u32, RequestError> {
        self.open_named(name, true)
    }

    /// Open an ad-hoc menu from a tree description.
    pub fn show_custom_menu(&mut self, description: &serde_json::Value) -> Result<u32, RequestError> {
        self.open_custom(description, false)
    }

    /// Open an ad-hoc menu from a tree description, in preview mode.
    pub fn preview_custom_menu(
        &mut self,
        description: &serde_json::Value,
    ) -> Result<u32, RequestError> {
        self.open_custom(description, true)
    }

    fn open_named(&mut self, name: &str, preview: bool) -> Result<u32, RequestError> {
        let descriptor = self
            .config
            .menu(name)
            .ok_or_else(|| RequestError::NoSuchMenu(name.to_string()))?;
        // Expansion runs fresh on every open so dynamic collections track
        // the current desktop state.
        let tree = expand::build_tree(descriptor);
        self.session.open(MenuRequest {
            tree,
            preview,
            configured: true,
        })
    }

    fn open_custom(
        &mut self,
        description: &serde_json::Value,
        preview: bool,
    ) -> Result<u32, RequestError> {
        // A string payload holds serialized JSON: a syntax error there is
        // InvalidJson, while a well-formed value of the wrong shape is a
        // structural failure (PropertyMissing).
        let value = match description {
            serde_json::Value::String(text) => serde_json::from_str::<serde_json::Value>(text)
                .map_err(|e| RequestError::InvalidJson(e.to_string()))?,
            other => other.clone(),
        };
        let description: MenuDescription =
            serde_json::from_value(value).map_err(|_| RequestError::PropertyMissing)?;
        self.session.open(MenuRequest {
            tree: description.into_node(),
            preview,
            configured: false,
        })
    }

    /// The input collaborator reported a completed selection.
    ///
    /// A report for an already-closed session is dropped (the report and
    /// the close can race); a malformed path cannot come from our own
    /// addressing step and panics.
    pub fn select_item(&mut self, path_text: &str) {
        if !self.session.is_active() {
            warn!(path = path_text, "selection for a closed session, dropping");
            return;
        }
        let path = PathId::parse(path_text).unwrap_or_else(|| {
            panic!("selection path {:?} is not a valid index path", path_text)
        });
        self.session.resolve(&path);
    }

    /// The input collaborator reported a cancellation.
    pub fn cancel_menu(&mut self) {
        if !self.session.is_active() {
            warn!("cancel for a closed session, dropping");
            return;
        }
        self.session.cancel();
    }
}
