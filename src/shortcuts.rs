//! Shortcut reconciliation
//!
//! Keeps the desktop-level binding table in sync with the shortcut
//! strings the menu configuration asks for. The table itself lives
//! behind [`ShortcutBinder`]; this module only decides what to bind and
//! unbind, as a two-pass diff so unchanged shortcuts are never touched
//! (rebinding has a cost and its own failure mode).

use std::collections::HashSet;
use thiserror::Error;
use tracing::{info, warn};

/// A bind or unbind the binding table rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct BindError(pub String);

/// Contract with the desktop-level binding table. The table is owned by
/// the reconciler: nothing else mutates it.
pub trait ShortcutBinder {
    /// Bind a shortcut spec; pressing it will be reported by the backend.
    fn bind(&mut self, shortcut: &str) -> Result<(), BindError>;
    /// Release a previously bound shortcut.
    fn unbind(&mut self, shortcut: &str) -> Result<(), BindError>;
    /// The currently bound set.
    fn bound(&self) -> HashSet<String>;
}

/// Bring the bound set in line with `desired`.
///
/// Stale entries are unbound, missing ones bound, unchanged ones left
/// alone. Each failure is independent: it is logged, collected for the
/// caller to surface, and never blocks the rest of the reconciliation.
pub fn reconcile(
    binder: &mut dyn ShortcutBinder,
    desired: &HashSet<String>,
) -> Vec<(String, BindError)> {
    let bound = binder.bound();
    let mut failures = Vec::new();

    for stale in bound.difference(desired) {
        match binder.unbind(stale) {
            Ok(()) => info!(shortcut = %stale, "unbound"),
            Err(e) => {
                warn!(shortcut = %stale, error = %e, "failed to unbind");
                failures.push((stale.clone(), e));
            }
        }
    }

    for fresh in desired.difference(&bound) {
        match binder.bind(fresh) {
            Ok(()) => info!(shortcut = %fresh, "bound"),
            Err(e) => {
                warn!(shortcut = %fresh, error = %e, "failed to bind");
                failures.push((fresh.clone(), e));
            }
        }
    }

    failures
}
