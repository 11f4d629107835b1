//! Workflow state machine and its async driver.
//!
//! The controller is a pure state machine: intents in, at most one side
//! effect out. The engine wires it to the service client and the view,
//! processing intents and service completions strictly in arrival
//! order.

pub mod controller;
pub mod engine;
pub mod event;
pub mod state;

pub use controller::WorkflowController;
pub use engine::{IntentSender, WorkflowEngine};
pub use event::{Command, Dispatch, DispatchPayload, Intent, RowField};
pub use state::{DispatchToken, EntryDraft, WorkflowState};
