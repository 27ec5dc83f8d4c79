//! Pane layout core: identities, the row/pane tree, the height-tier state
//! machine, and focus resolution.

pub mod focus;
pub mod machine;
pub mod pane;
pub mod tree;

pub use focus::{FocusMap, NodeId, next_pane, previous_pane};
pub use machine::{DispatchOutcome, LayoutAction, LayoutEffect, Transition, dispatch};
pub use pane::{DisplayState, HeightTier, Pane, PaneId, PaneStatus};
pub use tree::{Axis, PaneTree, Row};
