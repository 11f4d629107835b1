//! User intents and transition side effects.

use crate::models::{ImageRequest, ManualMealRequest, SelectedFile};

use super::state::DispatchToken;

/// Which field of an ingredient row an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowField {
    Ingredient,
    Amount,
}

/// A user-triggered event consumed by the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    ChoosePhoto,
    ChooseManual,
    FileSelected(SelectedFile),
    AddRow,
    RemoveRow(u64),
    EditRow {
        id: u64,
        field: RowField,
        value: String,
    },
    EditMealName(String),
    ConfirmAnalyze,
    Calculate,
    Restart,
    DismissError,
}

/// Payload of a dispatch, one variant per entry path.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchPayload {
    Image(ImageRequest),
    Manual(ManualMealRequest),
}

/// A network request the engine must issue, tagged with its sequence
/// token for stale-response detection.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch {
    pub token: DispatchToken,
    pub payload: DispatchPayload,
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Issue the network request for this dispatch.
    Dispatch(Dispatch),
    /// Surface a transient validation message; no state change.
    Notify(String),
}
