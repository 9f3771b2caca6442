//! Menu session state machine
//!
//! At most one menu is ever open. A request becomes an `Active` session
//! through [`MenuSession::open`]; user input resolves it through
//! [`MenuSession::resolve`] or [`MenuSession::cancel`], both of which
//! return the machine to `Idle` and hand the outcome to the session event
//! channel. The tree is owned by the session while it is shown and dropped
//! on close.

use std::sync::mpsc::Sender;
use tracing::{debug, info};

use crate::dispatcher::RequestError;
use crate::item::MenuItemNode;
use crate::layout;
use crate::path::{self, PathId};

/// A fully materialized request, ready to be shown.
#[derive(Debug)]
pub struct MenuRequest {
    /// Root of the tree; its children are the top-level wedges.
    pub tree: MenuItemNode,
    /// Preview sessions never invoke item actions.
    pub preview: bool,
    /// Whether the tree came from persisted configuration (selection runs
    /// the item's action) or from an ad-hoc caller (selection is reported).
    pub configured: bool,
}

/// Outcome of a session, delivered on the event channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Selected {
        session_id: u32,
        /// The selected node's assigned id ("/2/4", or a caller id)
        path: String,
        configured: bool,
        preview: bool,
    },
    Cancelled {
        session_id: u32,
        configured: bool,
    },
}

#[derive(Debug)]
struct ActiveMenu {
    session_id: u32,
    tree: MenuItemNode,
    preview: bool,
    configured: bool,
}

#[derive(Debug)]
enum State {
    Idle,
    Active(ActiveMenu),
}

/// The process-wide menu session.
#[derive(Debug)]
pub struct MenuSession {
    state: State,
    next_session_id: u32,
    events: Sender<SessionEvent>,
}

impl MenuSession {
    pub fn new(events: Sender<SessionEvent>) -> Self {
        Self {
            state: State::Idle,
            next_session_id: 0,
            events,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, State::Active(_))
    }

    /// Session id of the currently shown menu, if any.
    pub fn active_session_id(&self) -> Option<u32> {
        match &self.state {
            State::Active(active) => Some(active.session_id),
            State::Idle => None,
        }
    }

    /// Lay out and show a menu. On success the machine is `Active` and the
    /// freshly allocated session id is returned.
    ///
    /// While a session is active every further `open` is rejected with
    /// [`RequestError::AlreadyActive`] and leaves the shown menu untouched.
    pub fn open(&mut self, mut request: MenuRequest) -> Result<u32, RequestError> {
        if self.is_active() {
            return Err(RequestError::AlreadyActive);
        }
        if request.tree.children.is_empty() {
            return Err(RequestError::PropertyMissing);
        }

        // The root is the center, not a wedge: layout starts at its
        // children, with no back-link at the top level.
        layout::assign_angles(&mut request.tree.children, None)?;
        path::assign_ids(&mut request.tree.children, "");

        let session_id = self.next_session_id;
        self.next_session_id += 1;

        info!(
            session_id,
            items = request.tree.node_count() - 1,
            preview = request.preview,
            "menu session opened"
        );
        self.state = State::Active(ActiveMenu {
            session_id,
            tree: request.tree,
            preview: request.preview,
            configured: request.configured,
        });
        Ok(session_id)
    }

    /// Resolve the active session to the node at `path`, invoke its action
    /// (unless previewing) and return to `Idle`.
    ///
    /// Panics when no session is active or `path` does not address a node
    /// of the shown tree: selection paths come from our own addressing
    /// step, so either is a bug in the input collaborator.
    pub fn resolve(&mut self, path: &PathId) {
        let active = match std::mem::replace(&mut self.state, State::Idle) {
            State::Active(active) => active,
            State::Idle => panic!("resolve called without an active menu session"),
        };

        let node = path::resolve(&active.tree, path);
        let node_id = node
            .id
            .clone()
            .expect("every node of a shown tree carries an id");
        info!(session_id = active.session_id, path = %node_id, "menu item selected");

        if !active.preview {
            if let Some(action) = &node.action {
                action.invoke();
            }
        }

        let _ = self.events.send(SessionEvent::Selected {
            session_id: active.session_id,
            path: node_id,
            configured: active.configured,
            preview: active.preview,
        });
        // `active` drops here, and the tree with it.
    }

    /// Close the active session without a selection.
    ///
    /// Panics when no session is active, same contract as [`resolve`].
    ///
    /// [`resolve`]: MenuSession::resolve
    pub fn cancel(&mut self) {
        let active = match std::mem::replace(&mut self.state, State::Idle) {
            State::Active(active) => active,
            State::Idle => panic!("cancel called without an active menu session"),
        };
        debug!(session_id = active.session_id, "menu session cancelled");
        let _ = self.events.send(SessionEvent::Cancelled {
            session_id: active.session_id,
            configured: active.configured,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::{channel, Receiver};

    fn session() -> (MenuSession, Receiver<SessionEvent>) {
        let (tx, rx) = channel();
        (MenuSession::new(tx), rx)
    }

    fn request(n: usize) -> MenuRequest {
        let mut tree = MenuItemNode::new("root");
        for i in 0..n {
            tree.children.push(MenuItemNode::new(format!("item {}", i)));
        }
        MenuRequest {
            tree,
            preview: false,
            configured: false,
        }
    }

    #[test]
    fn test_open_allocates_monotonic_ids() {
        let (mut session, _rx) = session();
        let first = session.open(request(2)).unwrap();
        session.cancel();
        let second = session.open(request(2)).unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_open_rejects_empty_tree() {
        let (mut session, _rx) = session();
        assert!(matches!(
            session.open(request(0)),
            Err(RequestError::PropertyMissing)
        ));
        assert!(!session.is_active());
    }

    #[test]
    fn test_open_propagates_layout_failure() {
        let (mut session, _rx) = session();
        let mut req = request(2);
        req.tree.children[0].fixed_angle = Some(200.0);
        req.tree.children[1].fixed_angle = Some(100.0);
        assert!(matches!(
            session.open(req),
            Err(RequestError::InvalidAngles(_))
        ));
        assert!(!session.is_active());
    }

    #[test]
    fn test_second_open_rejected_and_leaves_session_untouched() {
        let (mut session, _rx) = session();
        let id = session.open(request(2)).unwrap();
        assert!(matches!(
            session.open(request(3)),
            Err(RequestError::AlreadyActive)
        ));
        assert_eq!(session.active_session_id(), Some(id));
    }

    #[test]
    fn test_resolve_reports_selection_and_idles() {
        let (mut session, rx) = session();
        let id = session.open(request(3)).unwrap();
        session.resolve(&PathId::root().child(1));
        assert!(!session.is_active());
        assert_eq!(
            rx.try_recv().unwrap(),
            SessionEvent::Selected {
                session_id: id,
                path: "/1".to_string(),
                configured: false,
                preview: false,
            }
        );
        // A fresh open succeeds again.
        assert!(session.open(request(1)).is_ok());
    }

    #[test]
    fn test_cancel_reports_and_idles() {
        let (mut session, rx) = session();
        let id = session.open(request(2)).unwrap();
        session.cancel();
        assert!(!session.is_active());
        assert_eq!(
            rx.try_recv().unwrap(),
            SessionEvent::Cancelled {
                session_id: id,
                configured: false,
            }
        );
    }

    #[test]
    #[should_panic(expected = "without an active menu session")]
    fn test_resolve_while_idle_panics() {
        let (mut session, _rx) = session();
        session.resolve(&PathId::root());
    }

    #[test]
    #[should_panic(expected = "without an active menu session")]
    fn test_cancel_while_idle_panics() {
        let (mut session, _rx) = session();
        session.cancel();
    }
}
