//! Focus resolution over an explicit containment arena.
//!
//! The widget tree is mirrored as parent indices so resolution never
//! depends on a live toolkit object graph: each node optionally carries
//! the pane it belongs to, and `resolve` ascends parent links testing for
//! a pane at every step. Root is the safe default when the ascent runs
//! out.

use super::pane::PaneId;

/// Handle into the focus arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    pane: Option<PaneId>,
}

/// Parent-index arena mirroring the widget containment hierarchy.
///
/// Nodes only ever point at earlier nodes, so every ascent is a bounded
/// walk and `resolve` is a pure function of the structure.
#[derive(Debug, Clone)]
pub struct FocusMap {
    nodes: Vec<Node>,
}

impl Default for FocusMap {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusMap {
    /// Arena with only the root node, owned by the Root pane.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                pane: Some(PaneId::Root),
            }],
        }
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Register a container or leaf under `parent`. Pass the owning pane
    /// for pane-boundary containers and `None` for everything nested
    /// below them.
    pub fn insert(&mut self, parent: NodeId, pane: Option<PaneId>) -> NodeId {
        let parent = NodeId(parent.0.min(self.nodes.len().saturating_sub(1)));
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: Some(parent),
            pane,
        });
        id
    }

    /// Which pane owns `from`. Ascends the containment chain, testing at
    /// every level, and returns Root if no pane boundary is crossed.
    /// Never fails: an unknown node resolves to Root.
    #[must_use]
    pub fn resolve(&self, from: NodeId) -> PaneId {
        let mut current = from;
        loop {
            let Some(node) = self.nodes.get(current.0) else {
                return PaneId::Root;
            };
            if let Some(pane) = node.pane {
                return pane;
            }
            match node.parent {
                Some(parent) => current = parent,
                None => return PaneId::Root,
            }
        }
    }
}

/// Successor in the canonical focus ring (Root, UserPrompt, SystemPrompt,
/// Context, ModelSelection, Response), wrapping at the end.
#[must_use]
pub fn next_pane(current: PaneId) -> PaneId {
    let idx = PaneId::ALL.iter().position(|p| *p == current).unwrap_or(0);
    PaneId::ALL[(idx + 1) % PaneId::ALL.len()]
}

/// Predecessor in the canonical focus ring, wrapping at the start.
#[must_use]
pub fn previous_pane(current: PaneId) -> PaneId {
    let idx = PaneId::ALL.iter().position(|p| *p == current).unwrap_or(0);
    PaneId::ALL[(idx + PaneId::ALL.len() - 1) % PaneId::ALL.len()]
}
