//! Per-pane transition logic: minimize, maximize, height cycling, hide.
//!
//! Transitions are pure data: `tier_transition` maps (tier, action) to a
//! destination tier plus a list of side-effect instructions, and
//! `dispatch` is the single choke point that applies them to the tree.
//! Every (state, action) pair has a defined destination; nothing here
//! panics or fails.

use super::pane::{DisplayState, HeightTier, PaneId};
use super::tree::PaneTree;

/// Actions a user can aim at one pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutAction {
    ToggleMaximize,
    ToggleMinimize,
    IncreaseHeight,
    DecreaseHeight,
    Hide,
    Unhide,
}

/// Cross-cutting side effects a tier transition asks the tree to perform.
/// Maximizing touches rows and siblings outside the target pane, so the
/// transition function returns instructions instead of mutating globals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutEffect {
    /// Suppress every other row and every sibling in the target's row;
    /// record the target as the maximized pane.
    ApplyMaximize,
    /// Clear all suppression and drop the maximized reference.
    ClearMaximize,
}

/// Destination of a tier transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub tier: HeightTier,
    pub effects: Vec<LayoutEffect>,
}

impl Transition {
    fn to(tier: HeightTier) -> Self {
        Self {
            tier,
            effects: Vec::new(),
        }
    }

    fn with(tier: HeightTier, effect: LayoutEffect) -> Self {
        Self {
            tier,
            effects: vec![effect],
        }
    }
}

/// The height-tier state machine. Total over all (tier, action) pairs for
/// the four tier actions; `Hide`/`Unhide` never reach this function.
///
/// One ordered dial: repeated increase reaches the same Maximized state as
/// the dedicated toggle, and cycling past either end wraps instead of
/// saturating.
#[must_use]
pub fn tier_transition(tier: HeightTier, action: LayoutAction) -> Transition {
    use HeightTier::*;
    use LayoutAction::*;
    use LayoutEffect::*;

    match (tier, action) {
        (Maximized, ToggleMaximize) => Transition::with(Normal, ClearMaximize),
        (_, ToggleMaximize) => Transition::with(Maximized, ApplyMaximize),

        // Minimize toggles against Normal; a maximized pane stays put.
        (Maximized, ToggleMinimize) => Transition::to(Maximized),
        (Minimized, ToggleMinimize) => Transition::to(Normal),
        (_, ToggleMinimize) => Transition::to(Minimized),

        (Minimized, IncreaseHeight) => Transition::to(Normal),
        (Normal, IncreaseHeight) => Transition::to(Doubled),
        (Doubled, IncreaseHeight) => Transition::to(Tripled),
        (Tripled, IncreaseHeight) => Transition::with(Maximized, ApplyMaximize),
        (Maximized, IncreaseHeight) => Transition::with(Minimized, ClearMaximize),

        (Maximized, DecreaseHeight) => Transition::with(Tripled, ClearMaximize),
        (Tripled, DecreaseHeight) => Transition::to(Doubled),
        (Doubled, DecreaseHeight) => Transition::to(Normal),
        (Normal, DecreaseHeight) => Transition::to(Minimized),
        (Minimized, DecreaseHeight) => Transition::with(Maximized, ApplyMaximize),

        (tier, Hide | Unhide) => Transition::to(tier),
    }
}

/// Outcome reported back to the caller for user-facing notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Applied,
    /// Target was Root: nothing to resize, reported as a notice upstream.
    NoTarget,
    /// Defined no-op (e.g. minimizing a maximized pane).
    Unchanged,
}

/// Apply `action` to `target` on the tree. This is the only mutation path
/// for pane state, which is what keeps the one-maximized-pane invariant
/// enforceable.
pub fn dispatch(tree: &mut PaneTree, target: PaneId, action: LayoutAction) -> DispatchOutcome {
    let Some(pane) = tree.pane(target) else {
        return DispatchOutcome::NoTarget;
    };

    match action {
        LayoutAction::Hide => {
            if pane.display == DisplayState::Hidden {
                return DispatchOutcome::Unchanged;
            }
            tree.set_display(target, DisplayState::Hidden);
            return DispatchOutcome::Applied;
        }
        LayoutAction::Unhide => {
            if pane.display == DisplayState::Visible {
                return DispatchOutcome::Unchanged;
            }
            tree.set_display(target, DisplayState::Visible);
            return DispatchOutcome::Applied;
        }
        _ => {}
    }

    // Hidden panes are excluded from height cycling until unhidden.
    if pane.display == DisplayState::Hidden {
        return DispatchOutcome::Unchanged;
    }

    let before = pane.tier;
    let transition = tier_transition(before, action);
    if transition.tier == before && transition.effects.is_empty() {
        return DispatchOutcome::Unchanged;
    }

    for effect in &transition.effects {
        match effect {
            LayoutEffect::ApplyMaximize => tree.apply_maximize(target),
            LayoutEffect::ClearMaximize => tree.clear_maximize(),
        }
    }
    tree.set_tier(target, transition.tier);
    DispatchOutcome::Applied
}
