//! View adapter contract.
//!
//! The display layer is an external collaborator: it renders whatever
//! state the workflow is in and pushes user intents back through the
//! engine. Presentation details, such as how long a transient
//! validation banner stays visible, belong to the implementor.

use crate::workflow::WorkflowState;

/// Trait for rendering workflow state to the user.
pub trait ViewAdapter: Send + Sync {
    /// Render the authoritative state after a transition.
    fn render_state(&self, state: &WorkflowState);

    /// Show a transient validation message; the current state and any
    /// draft input stay untouched.
    fn show_validation_message(&self, message: &str);
}
