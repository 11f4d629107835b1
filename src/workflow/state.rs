//! Workflow state and draft input.

use crate::models::{IngredientDraft, NutritionResult, Origin, SelectedFile};

/// Sequence token identifying one dispatch.
///
/// Tokens increase monotonically. A completion carrying anything but
/// the current in-flight token is stale and gets discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DispatchToken(pub(crate) u64);

impl std::fmt::Display for DispatchToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Draft input carried through `Pending` and `Failed` so a failure can
/// hand the user back their entry state intact.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryDraft {
    Photo {
        preview: Option<SelectedFile>,
    },
    Manual {
        meal_name: String,
        rows: Vec<IngredientDraft>,
    },
}

impl EntryDraft {
    /// Entry path this draft came from.
    pub fn origin(&self) -> Origin {
        match self {
            EntryDraft::Photo { .. } => Origin::Photo,
            EntryDraft::Manual { .. } => Origin::Manual,
        }
    }
}

/// The single authoritative workflow state.
///
/// Exactly one variant is active at a time; every intent or service
/// completion replaces the value wholesale. No history is kept.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowState {
    /// No input mode chosen yet.
    Idle,
    /// Photo path chosen; preview present once a file is picked.
    PhotoCapture { preview: Option<SelectedFile> },
    /// Manual path chosen; meal name and rows are the draft input.
    ManualEntry {
        meal_name: String,
        rows: Vec<IngredientDraft>,
    },
    /// A request is in flight.
    Pending {
        origin: Origin,
        token: DispatchToken,
        draft: EntryDraft,
    },
    /// The service answered with nutrition facts.
    Results { result: NutritionResult },
    /// The service failed; the draft is retained for dismiss.
    Failed {
        origin: Origin,
        message: String,
        draft: EntryDraft,
    },
}

impl WorkflowState {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowState::Idle => "idle",
            WorkflowState::PhotoCapture { .. } => "photo_capture",
            WorkflowState::ManualEntry { .. } => "manual_entry",
            WorkflowState::Pending { .. } => "pending",
            WorkflowState::Results { .. } => "results",
            WorkflowState::Failed { .. } => "failed",
        }
    }

    /// True while a request is in flight.
    pub fn is_pending(&self) -> bool {
        matches!(self, WorkflowState::Pending { .. })
    }
}
