//! Radial context-menu core
//!
//! Everything needed to drive a hierarchical pie menu, minus the pixels:
//! - collision-free angular layout with fixed-angle anchors and a
//!   reserved back-link direction (`layout`)
//! - root-relative index addressing of tree nodes (`path`)
//! - the single-active-session lifecycle (`session`)
//! - request dispatch and the stable error taxonomy (`dispatcher`)
//! - diff-based global shortcut reconciliation (`shortcuts`)
//!
//! The daemon binary wires these to a JSONL control channel, the menu
//! configuration file and the OS hotkey table.

pub mod apps;
pub mod commands;
pub mod config;
pub mod dispatcher;
pub mod expand;
pub mod hotkeys;
pub mod item;
pub mod layout;
pub mod path;
pub mod session;
pub mod shortcuts;

pub use dispatcher::{Dispatcher, RequestError};
pub use item::{ItemAction, MenuItemNode};
pub use path::PathId;
pub use session::{MenuSession, SessionEvent};
