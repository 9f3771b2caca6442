//! Hierarchical item addressing
//!
//! Every node of a shown tree gets a stable identifier: the sequence of
//! child indices from the root, written "/2/4" at the boundary. Internally
//! paths stay a value type ([`PathId`]) so in-process resolution never
//! re-parses strings.
//!
//! Paths are only ever produced by [`assign_ids`] and echoed back by the
//! input collaborator, so [`resolve`] treats a bad path as a bug in a
//! trusted caller and panics instead of returning an error.

use crate::item::MenuItemNode;
use std::fmt;

/// Root-relative index path of a node within one tree snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PathId(Vec<usize>);

impl PathId {
    /// The root itself.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// The path of this node's `index`-th child.
    pub fn child(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(index);
        Self(segments)
    }

    pub fn segments(&self) -> &[usize] {
        &self.0
    }

    /// Parse the boundary form ("/2/4"). Empty segments are ignored, so
    /// "/" and "" both address the root. Returns `None` if any segment is
    /// not a non-negative index.
    pub fn parse(text: &str) -> Option<Self> {
        let mut segments = Vec::new();
        for part in text.split('/') {
            if part.is_empty() {
                continue;
            }
            segments.push(part.parse().ok()?);
        }
        Some(Self(segments))
    }
}

impl fmt::Display for PathId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "/");
        }
        for segment in &self.0 {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

/// Assign identifiers to every node below `parent_path`, depth first.
///
/// Nodes that already carry a caller-supplied id keep it (ad-hoc requests
/// may pre-assign ids meaningful to the caller); everything else gets the
/// positional form. Children always nest under their parent's final id.
pub fn assign_ids(items: &mut [MenuItemNode], parent_path: &str) {
    for (index, item) in items.iter_mut().enumerate() {
        if item.id.is_none() {
            item.id = Some(format!("{}/{}", parent_path, index));
        }
        let own = item.id.clone().unwrap_or_default();
        assign_ids(&mut item.children, &own);
    }
}

/// Walk `path` down from `root` and return the addressed node.
///
/// Panics if a segment is out of range: paths come from this module's own
/// addressing step, so a mismatch means the caller handed us a path from a
/// different tree snapshot.
pub fn resolve<'a>(root: &'a MenuItemNode, path: &PathId) -> &'a MenuItemNode {
    let mut node = root;
    for &index in path.segments() {
        node = node.children.get(index).unwrap_or_else(|| {
            panic!(
                "path {} addresses child {} of {:?}, which has only {} children",
                path,
                index,
                node.name,
                node.children.len()
            )
        });
    }
    node
}
