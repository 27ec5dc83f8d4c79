//! Integration tests for the pane layout state machine's invariants.

#[path = "../src/layout/mod.rs"]
mod layout;

use layout::{
    DispatchOutcome, FocusMap, HeightTier, LayoutAction, PaneId, PaneStatus, PaneTree, dispatch,
    next_pane,
};

fn assert_single_maximized(tree: &PaneTree) {
    let maximized: Vec<PaneId> = PaneId::CHILDREN
        .into_iter()
        .filter(|id| tree.pane(*id).unwrap().tier == HeightTier::Maximized)
        .collect();
    match tree.maximized_pane() {
        Some(id) => assert_eq!(maximized, vec![id], "maximized reference out of sync"),
        None => assert!(maximized.is_empty(), "stray maximized tier: {maximized:?}"),
    }
}

#[test]
fn at_most_one_maximized_across_action_storm() {
    let actions = [
        LayoutAction::ToggleMaximize,
        LayoutAction::IncreaseHeight,
        LayoutAction::DecreaseHeight,
        LayoutAction::ToggleMinimize,
        LayoutAction::Hide,
        LayoutAction::Unhide,
    ];
    let mut tree = PaneTree::new();
    // Deterministic storm: every pane gets every action in a rolling
    // pattern, checking the invariant after each step.
    for round in 0..actions.len() {
        for (offset, pane) in PaneId::CHILDREN.into_iter().enumerate() {
            let action = actions[(round + offset) % actions.len()];
            let _ = dispatch(&mut tree, pane, action);
            assert_single_maximized(&tree);
        }
    }
}

#[test]
fn hide_unhide_round_trip_restores_exact_tier() {
    let mut tree = PaneTree::new();
    dispatch(&mut tree, PaneId::Context, LayoutAction::IncreaseHeight);
    dispatch(&mut tree, PaneId::Context, LayoutAction::IncreaseHeight);
    let before = tree.pane(PaneId::Context).unwrap().tier;
    assert_eq!(before, HeightTier::Tripled);

    dispatch(&mut tree, PaneId::Context, LayoutAction::Hide);
    assert_eq!(tree.status_of(PaneId::Context), PaneStatus::Hidden);
    dispatch(&mut tree, PaneId::Context, LayoutAction::Unhide);

    assert_eq!(tree.pane(PaneId::Context).unwrap().tier, before);
    assert_eq!(tree.status_of(PaneId::Context), PaneStatus::Visible);
}

#[test]
fn reset_layout_twice_equals_once() {
    let mut tree = PaneTree::new();
    dispatch(&mut tree, PaneId::UserPrompt, LayoutAction::ToggleMaximize);
    dispatch(&mut tree, PaneId::Response, LayoutAction::Hide);

    tree.reset_layout();
    let after_once = format!("{tree:?}");
    tree.reset_layout();
    assert_eq!(format!("{tree:?}"), after_once);
}

#[test]
fn five_increases_from_minimized_complete_the_cycle() {
    let mut tree = PaneTree::new();
    dispatch(&mut tree, PaneId::UserPrompt, LayoutAction::ToggleMinimize);
    let pristine = format!("{:?}", {
        let mut t = PaneTree::new();
        dispatch(&mut t, PaneId::UserPrompt, LayoutAction::ToggleMinimize);
        t
    });

    for _ in 0..5 {
        dispatch(&mut tree, PaneId::UserPrompt, LayoutAction::IncreaseHeight);
        assert_single_maximized(&tree);
    }

    // Back at Minimized with no residual suppression anywhere.
    assert_eq!(format!("{tree:?}"), pristine);
}

#[test]
fn focus_resolution_from_three_levels_deep() {
    let mut map = FocusMap::new();
    let container = map.insert(map.root(), Some(PaneId::Context));
    let body = map.insert(container, None);
    let list = map.insert(body, None);
    let leaf = map.insert(list, None);

    assert_eq!(map.resolve(leaf), PaneId::Context);
}

#[test]
fn focus_cycle_returns_to_root_after_six_steps() {
    let mut current = PaneId::Root;
    for _ in 0..6 {
        current = next_pane(current);
    }
    assert_eq!(current, PaneId::Root);
}

#[test]
fn maximize_switch_restores_previous_pane() {
    let mut tree = PaneTree::new();
    dispatch(&mut tree, PaneId::UserPrompt, LayoutAction::ToggleMaximize);
    dispatch(&mut tree, PaneId::SystemPrompt, LayoutAction::ToggleMaximize);

    assert_eq!(tree.maximized_pane(), Some(PaneId::SystemPrompt));
    assert_eq!(
        tree.pane(PaneId::UserPrompt).unwrap().tier,
        HeightTier::Normal
    );
    assert!(!tree.rows()[0].suppressed);
    assert!(tree.rows()[1].suppressed);
    assert!(tree.rows()[2].suppressed);
    assert_single_maximized(&tree);
}

#[test]
fn bulk_hide_show_preserves_every_tier() {
    let mut tree = PaneTree::new();
    dispatch(&mut tree, PaneId::UserPrompt, LayoutAction::ToggleMinimize);
    dispatch(&mut tree, PaneId::Context, LayoutAction::IncreaseHeight);

    let tiers_before: Vec<HeightTier> = PaneId::CHILDREN
        .into_iter()
        .map(|id| tree.pane(id).unwrap().tier)
        .collect();

    tree.hide_all_children();
    tree.show_all_children();

    let tiers_after: Vec<HeightTier> = PaneId::CHILDREN
        .into_iter()
        .map(|id| tree.pane(id).unwrap().tier)
        .collect();
    assert_eq!(tiers_after, tiers_before);
}

#[test]
fn hidden_status_wins_over_prior_maximize() {
    let mut tree = PaneTree::new();
    dispatch(&mut tree, PaneId::Response, LayoutAction::ToggleMaximize);
    dispatch(&mut tree, PaneId::Response, LayoutAction::Hide);
    assert_eq!(tree.status_of(PaneId::Response), PaneStatus::Hidden);
}

#[test]
fn root_transitions_are_noop_notices_not_errors() {
    let mut tree = PaneTree::new();
    let before = format!("{tree:?}");
    assert_eq!(
        dispatch(&mut tree, PaneId::Root, LayoutAction::IncreaseHeight),
        DispatchOutcome::NoTarget
    );
    assert_eq!(format!("{tree:?}"), before);
}
