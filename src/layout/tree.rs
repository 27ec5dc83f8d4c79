//! The pane tree: rows of panes, owned by index, mutated only through the
//! state machine's dispatch in `machine`.

use super::pane::{DisplayState, HeightTier, Pane, PaneId, PaneStatus};

/// Layout axis of a row. Affects rendering only, never transition logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// A fixed ordered group of 1-2 panes sharing one strip of the screen.
#[derive(Debug, Clone)]
pub struct Row {
    pub axis: Axis,
    pub panes: Vec<PaneId>,
    /// Set while a pane in another row is maximized. Derived state: cleared
    /// wholesale on restore, never persisted.
    pub suppressed: bool,
}

impl Row {
    fn new(axis: Axis, panes: Vec<PaneId>) -> Self {
        Self {
            axis,
            panes,
            suppressed: false,
        }
    }
}

/// Root container owning every row and, transitively, every pane.
///
/// All layout mutation flows through `machine::dispatch`; the setters here
/// are crate-private so no other component can bypass the transition
/// functions and break the single-maximized-pane invariant.
#[derive(Debug, Clone)]
pub struct PaneTree {
    rows: Vec<Row>,
    panes: [Pane; PaneId::CHILDREN.len()],
    maximized: Option<PaneId>,
}

impl Default for PaneTree {
    fn default() -> Self {
        Self::new()
    }
}

impl PaneTree {
    /// Build the fixed three-row layout: prompts on top, context and model
    /// selection in the middle, response across the bottom.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: vec![
                Row::new(
                    Axis::Horizontal,
                    vec![PaneId::UserPrompt, PaneId::SystemPrompt],
                ),
                Row::new(
                    Axis::Horizontal,
                    vec![PaneId::Context, PaneId::ModelSelection],
                ),
                Row::new(Axis::Vertical, vec![PaneId::Response]),
            ],
            panes: PaneId::CHILDREN.map(Pane::new),
            maximized: None,
        }
    }

    fn index_of(id: PaneId) -> Option<usize> {
        PaneId::CHILDREN.iter().position(|p| *p == id)
    }

    /// Panel state for a non-root pane. Root has no stored state.
    #[must_use]
    pub fn pane(&self, id: PaneId) -> Option<&Pane> {
        Self::index_of(id).map(|i| &self.panes[i])
    }

    pub(crate) fn pane_mut(&mut self, id: PaneId) -> Option<&mut Pane> {
        Self::index_of(id).map(|i| &mut self.panes[i])
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn maximized_pane(&self) -> Option<PaneId> {
        self.maximized
    }

    /// Root followed by all panes in canonical order, for focus cycling.
    #[must_use]
    pub fn pane_list(&self) -> [PaneId; 6] {
        PaneId::ALL
    }

    /// All non-root panes, for bulk operations.
    #[must_use]
    pub fn child_panes(&self) -> [PaneId; 5] {
        PaneId::CHILDREN
    }

    /// Index of the row owning `id`, or None for Root.
    #[must_use]
    pub fn row_of(&self, id: PaneId) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| row.panes.contains(&id))
    }

    /// Single status per pane. Hidden wins over Maximized wins over
    /// Minimized; all other tiers render as Visible. Root is always
    /// Visible.
    #[must_use]
    pub fn status_of(&self, id: PaneId) -> PaneStatus {
        let Some(pane) = self.pane(id) else {
            return PaneStatus::Visible;
        };
        if pane.display == DisplayState::Hidden {
            PaneStatus::Hidden
        } else if pane.tier == HeightTier::Maximized {
            PaneStatus::Maximized
        } else if pane.tier == HeightTier::Minimized {
            PaneStatus::Minimized
        } else {
            PaneStatus::Visible
        }
    }

    /// Reset every pane to Visible/Normal and clear all suppression and
    /// the maximized reference. Idempotent.
    pub fn reset_layout(&mut self) {
        for pane in &mut self.panes {
            pane.display = DisplayState::Visible;
            pane.tier = HeightTier::Normal;
            pane.suppressed = false;
        }
        for row in &mut self.rows {
            row.suppressed = false;
        }
        self.maximized = None;
    }

    /// Hide every non-root pane. Height tiers are untouched.
    pub fn hide_all_children(&mut self) {
        for pane in &mut self.panes {
            pane.display = DisplayState::Hidden;
        }
    }

    /// Show every non-root pane, restoring whatever tier each had before
    /// it was hidden.
    pub fn show_all_children(&mut self) {
        for pane in &mut self.panes {
            pane.display = DisplayState::Visible;
        }
    }

    pub(crate) fn set_tier(&mut self, id: PaneId, tier: HeightTier) {
        if let Some(pane) = self.pane_mut(id) {
            pane.tier = tier;
        }
    }

    pub(crate) fn set_display(&mut self, id: PaneId, display: DisplayState) {
        if let Some(pane) = self.pane_mut(id) {
            pane.display = display;
        }
    }

    /// Apply maximize suppression for `target`: every other row is
    /// row-hidden, and so is every sibling within the target's row. If a
    /// different pane is currently maximized it is first restored to
    /// Normal, keeping "at most one maximized pane" true at every step.
    pub(crate) fn apply_maximize(&mut self, target: PaneId) {
        if let Some(prev) = self.maximized
            && prev != target
        {
            self.clear_maximize();
            self.set_tier(prev, HeightTier::Normal);
        }

        let Some(target_row) = self.row_of(target) else {
            return;
        };
        for (idx, row) in self.rows.iter_mut().enumerate() {
            row.suppressed = idx != target_row;
        }
        for pane in &mut self.panes {
            pane.suppressed = pane.id != target && self.rows[target_row].panes.contains(&pane.id);
        }
        self.maximized = Some(target);
    }

    /// Exact inverse of `apply_maximize`: clear all row and sibling
    /// suppression and drop the maximized reference.
    pub(crate) fn clear_maximize(&mut self) {
        for row in &mut self.rows {
            row.suppressed = false;
        }
        for pane in &mut self.panes {
            pane.suppressed = false;
        }
        self.maximized = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_child_belongs_to_exactly_one_row() {
        let tree = PaneTree::new();
        for id in tree.child_panes() {
            let owners = tree
                .rows()
                .iter()
                .filter(|row| row.panes.contains(&id))
                .count();
            assert_eq!(owners, 1, "{id:?} should live in exactly one row");
        }
        assert_eq!(tree.row_of(PaneId::Root), None);
    }

    #[test]
    fn row_layout_matches_fixed_hierarchy() {
        let tree = PaneTree::new();
        assert_eq!(tree.row_of(PaneId::UserPrompt), Some(0));
        assert_eq!(tree.row_of(PaneId::SystemPrompt), Some(0));
        assert_eq!(tree.row_of(PaneId::Context), Some(1));
        assert_eq!(tree.row_of(PaneId::ModelSelection), Some(1));
        assert_eq!(tree.row_of(PaneId::Response), Some(2));
        assert_eq!(tree.rows()[2].axis, Axis::Vertical);
    }

    #[test]
    fn reset_layout_is_idempotent() {
        let mut tree = PaneTree::new();
        tree.set_tier(PaneId::Context, HeightTier::Tripled);
        tree.set_display(PaneId::Response, DisplayState::Hidden);
        tree.apply_maximize(PaneId::UserPrompt);

        tree.reset_layout();
        let once = tree.clone();
        tree.reset_layout();

        assert_eq!(format!("{once:?}"), format!("{tree:?}"));
        assert_eq!(tree.maximized_pane(), None);
        for id in tree.child_panes() {
            assert_eq!(tree.status_of(id), PaneStatus::Visible);
        }
    }

    #[test]
    fn hide_then_show_restores_prior_tier() {
        let mut tree = PaneTree::new();
        tree.set_tier(PaneId::Context, HeightTier::Doubled);
        tree.set_tier(PaneId::Response, HeightTier::Minimized);

        tree.hide_all_children();
        for id in tree.child_panes() {
            assert_eq!(tree.status_of(id), PaneStatus::Hidden);
        }

        tree.show_all_children();
        assert_eq!(tree.pane(PaneId::Context).unwrap().tier, HeightTier::Doubled);
        assert_eq!(
            tree.pane(PaneId::Response).unwrap().tier,
            HeightTier::Minimized
        );
    }

    #[test]
    fn maximize_suppresses_other_rows_and_siblings() {
        let mut tree = PaneTree::new();
        tree.apply_maximize(PaneId::UserPrompt);

        assert!(!tree.rows()[0].suppressed);
        assert!(tree.rows()[1].suppressed);
        assert!(tree.rows()[2].suppressed);
        assert!(tree.pane(PaneId::SystemPrompt).unwrap().suppressed);
        assert!(!tree.pane(PaneId::UserPrompt).unwrap().suppressed);
        // Panes in other rows are covered by row suppression alone.
        assert!(!tree.pane(PaneId::Context).unwrap().suppressed);
    }

    #[test]
    fn maximize_switches_target_transactionally() {
        let mut tree = PaneTree::new();
        tree.set_tier(PaneId::UserPrompt, HeightTier::Maximized);
        tree.apply_maximize(PaneId::UserPrompt);

        tree.apply_maximize(PaneId::SystemPrompt);
        tree.set_tier(PaneId::SystemPrompt, HeightTier::Maximized);

        assert_eq!(tree.maximized_pane(), Some(PaneId::SystemPrompt));
        assert_eq!(
            tree.pane(PaneId::UserPrompt).unwrap().tier,
            HeightTier::Normal
        );
        assert!(tree.pane(PaneId::UserPrompt).unwrap().suppressed);
        assert!(!tree.rows()[0].suppressed);
    }

    #[test]
    fn status_precedence_hidden_beats_maximized() {
        let mut tree = PaneTree::new();
        tree.set_tier(PaneId::Context, HeightTier::Maximized);
        tree.set_display(PaneId::Context, DisplayState::Hidden);
        assert_eq!(tree.status_of(PaneId::Context), PaneStatus::Hidden);
    }

    #[test]
    fn root_is_always_visible() {
        let tree = PaneTree::new();
        assert_eq!(tree.status_of(PaneId::Root), PaneStatus::Visible);
        assert!(tree.pane(PaneId::Root).is_none());
    }
}
