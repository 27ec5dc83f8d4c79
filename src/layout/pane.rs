//! Pane identities and per-pane visual state.

/// Stable identity for every pane in the application, plus the synthetic
/// root. The set is fixed at startup and never changes at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PaneId {
    Root,
    UserPrompt,
    SystemPrompt,
    Context,
    ModelSelection,
    Response,
}

impl PaneId {
    /// Canonical order used for sequential focus cycling. Root comes first.
    pub const ALL: [PaneId; 6] = [
        PaneId::Root,
        PaneId::UserPrompt,
        PaneId::SystemPrompt,
        PaneId::Context,
        PaneId::ModelSelection,
        PaneId::Response,
    ];

    /// Same order minus Root, used for bulk child operations.
    pub const CHILDREN: [PaneId; 5] = [
        PaneId::UserPrompt,
        PaneId::SystemPrompt,
        PaneId::Context,
        PaneId::ModelSelection,
        PaneId::Response,
    ];

    /// Display title used in pane chrome and the management menu.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            PaneId::Root => "Root",
            PaneId::UserPrompt => "User Prompt",
            PaneId::SystemPrompt => "System Prompt",
            PaneId::Context => "Context",
            PaneId::ModelSelection => "Model Selection",
            PaneId::Response => "Response",
        }
    }

    /// Panes whose text content the user edits directly.
    #[must_use]
    pub fn is_editable(self) -> bool {
        matches!(
            self,
            PaneId::UserPrompt | PaneId::SystemPrompt | PaneId::Context
        )
    }
}

/// Whether a pane is shown at all. Independent from the height tier: hiding
/// a pane keeps its tier, which is restored on unhide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    Visible,
    Hidden,
}

/// Ordered height tier controlling a pane's share of vertical space.
///
/// The order matters: `increase_height` walks it upward and wraps from
/// Maximized back to Minimized, `decrease_height` walks it downward and
/// wraps the other way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HeightTier {
    Minimized,
    Normal,
    Doubled,
    Tripled,
    Maximized,
}

impl HeightTier {
    /// Relative layout weight for rows containing a pane at this tier.
    /// Minimized and Maximized are handled specially by the renderer.
    #[must_use]
    pub fn weight(self) -> u16 {
        match self {
            HeightTier::Minimized | HeightTier::Normal => 1,
            HeightTier::Doubled => 2,
            HeightTier::Tripled | HeightTier::Maximized => 3,
        }
    }
}

/// One leaf content unit. Mutable fields are exactly the display state, the
/// height tier, and the derived suppression flag; identity is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pane {
    pub id: PaneId,
    pub display: DisplayState,
    pub tier: HeightTier,
    /// Temporarily hidden because a sibling in the same row is maximized.
    /// Distinct from `display`: suppression is cleared wholesale when the
    /// maximize ends and never touches the pane's own state.
    pub suppressed: bool,
}

impl Pane {
    #[must_use]
    pub fn new(id: PaneId) -> Self {
        Self {
            id,
            display: DisplayState::Visible,
            tier: HeightTier::Normal,
            suppressed: false,
        }
    }

    /// Whether the pane currently occupies screen space.
    #[must_use]
    pub fn is_shown(&self) -> bool {
        self.display == DisplayState::Visible && !self.suppressed
    }
}

/// Single status shown per pane in the menu and status bar. Precedence
/// resolves overlap: Hidden > Maximized > Minimized > Visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneStatus {
    Visible,
    Hidden,
    Minimized,
    Maximized,
}

impl PaneStatus {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            PaneStatus::Visible => "Visible",
            PaneStatus::Hidden => "Hidden",
            PaneStatus::Minimized => "Minimized",
            PaneStatus::Maximized => "Maximized",
        }
    }
}
