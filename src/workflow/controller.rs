//! The workflow state machine.
//!
//! Pure and synchronous: every intent or service completion is applied
//! here and the controller is already in its new state when the call
//! returns. Network traffic is requested through [`Command::Dispatch`]
//! and carried out by the engine, so the `Pending` mark is in place
//! before any request leaves the process.

use tracing::{debug, warn};

use crate::builder;
use crate::error::ServiceError;
use crate::models::{IngredientDraft, NutritionResult, Origin, SelectedFile};

use super::event::{Command, Dispatch, DispatchPayload, Intent, RowField};
use super::state::{DispatchToken, EntryDraft, WorkflowState};

/// Generic user-facing message for a failed photo analysis.
const PHOTO_FAILED_MESSAGE: &str = "Failed to analyze food photo. Please try again.";

/// Generic user-facing message for a failed nutrition calculation.
const MANUAL_FAILED_MESSAGE: &str = "Failed to calculate nutrition. Please try again.";

/// Shown when analyze is confirmed before a photo was picked.
const NO_PHOTO_MESSAGE: &str = "Please select a photo first";

/// State machine coordinating mode selection, input collection, request
/// dispatch and the loading/error cycle.
pub struct WorkflowController {
    state: WorkflowState,
    next_row_id: u64,
    next_token: u64,
    in_flight: Option<DispatchToken>,
}

impl WorkflowController {
    pub fn new() -> Self {
        Self {
            state: WorkflowState::Idle,
            next_row_id: 0,
            next_token: 0,
            in_flight: None,
        }
    }

    /// Current authoritative state.
    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    /// Apply a user intent, returning at most one side effect for the
    /// caller to carry out.
    pub fn handle_intent(&mut self, intent: Intent) -> Option<Command> {
        match intent {
            Intent::ChoosePhoto => self.choose(EntryDraft::Photo { preview: None }),
            Intent::ChooseManual => self.choose(EntryDraft::Manual {
                meal_name: String::new(),
                rows: Vec::new(),
            }),
            Intent::FileSelected(file) => self.file_selected(file),
            Intent::AddRow => self.add_row(),
            Intent::RemoveRow(id) => self.remove_row(id),
            Intent::EditRow { id, field, value } => self.edit_row(id, field, value),
            Intent::EditMealName(value) => self.edit_meal_name(value),
            Intent::ConfirmAnalyze => self.confirm_analyze(),
            Intent::Calculate => self.calculate(),
            Intent::Restart => self.restart(),
            Intent::DismissError => self.dismiss_error(),
        }
    }

    /// Apply a service completion.
    ///
    /// Completions whose token is no longer in flight are stale and get
    /// discarded without touching the current state.
    pub fn resolve(
        &mut self,
        token: DispatchToken,
        outcome: Result<NutritionResult, ServiceError>,
    ) {
        if self.in_flight != Some(token) {
            debug!("Discarding stale response for dispatch {token}");
            return;
        }
        let (origin, draft) = match &self.state {
            WorkflowState::Pending { origin, draft, .. } => (*origin, draft.clone()),
            state => {
                warn!("Completion for dispatch {token} arrived in {} state", state.name());
                return;
            }
        };
        self.in_flight = None;
        match outcome {
            Ok(result) => {
                debug!("{origin} dispatch {token} succeeded");
                self.state = WorkflowState::Results { result };
            }
            Err(err) => {
                warn!("{origin} dispatch {token} failed: {err}");
                let message = match origin {
                    Origin::Photo => PHOTO_FAILED_MESSAGE,
                    Origin::Manual => MANUAL_FAILED_MESSAGE,
                };
                self.state = WorkflowState::Failed {
                    origin,
                    message: message.to_string(),
                    draft,
                };
            }
        }
    }

    fn choose(&mut self, draft: EntryDraft) -> Option<Command> {
        match &self.state {
            WorkflowState::Idle => {}
            WorkflowState::Pending { .. } => {
                debug!("Mode selected while a request is in flight; superseding it");
                self.in_flight = None;
            }
            state => {
                debug!("Ignoring mode selection in {} state", state.name());
                return None;
            }
        }
        self.state = Self::entry_state(draft);
        None
    }

    fn file_selected(&mut self, file: SelectedFile) -> Option<Command> {
        match &self.state {
            WorkflowState::PhotoCapture { .. } => {
                // Preview only; no network call until analyze is confirmed.
                self.state = WorkflowState::PhotoCapture {
                    preview: Some(file),
                };
            }
            state => debug!("Ignoring file selection in {} state", state.name()),
        }
        None
    }

    fn add_row(&mut self) -> Option<Command> {
        let id = self.next_row_id;
        match &mut self.state {
            WorkflowState::ManualEntry { rows, .. } => {
                rows.push(IngredientDraft::new(id));
                self.next_row_id += 1;
            }
            state => debug!("Ignoring row addition in {} state", state.name()),
        }
        None
    }

    fn remove_row(&mut self, id: u64) -> Option<Command> {
        match &mut self.state {
            WorkflowState::ManualEntry { rows, .. } => rows.retain(|row| row.id != id),
            state => debug!("Ignoring row removal in {} state", state.name()),
        }
        None
    }

    fn edit_row(&mut self, id: u64, field: RowField, value: String) -> Option<Command> {
        match &mut self.state {
            WorkflowState::ManualEntry { rows, .. } => {
                match rows.iter_mut().find(|row| row.id == id) {
                    Some(row) => match field {
                        RowField::Ingredient => row.name = value,
                        RowField::Amount => row.amount = value,
                    },
                    None => debug!("Edit for unknown row id {id}"),
                }
            }
            state => debug!("Ignoring row edit in {} state", state.name()),
        }
        None
    }

    fn edit_meal_name(&mut self, value: String) -> Option<Command> {
        match &mut self.state {
            WorkflowState::ManualEntry { meal_name, .. } => *meal_name = value,
            state => debug!("Ignoring meal name edit in {} state", state.name()),
        }
        None
    }

    fn confirm_analyze(&mut self) -> Option<Command> {
        let preview = match &self.state {
            WorkflowState::PhotoCapture { preview } => preview.clone(),
            WorkflowState::Pending { .. } => {
                debug!("Analyze requested while a request is already in flight");
                return None;
            }
            state => {
                debug!("Ignoring analyze in {} state", state.name());
                return None;
            }
        };

        let Some(file) = preview else {
            return Some(Command::Notify(NO_PHOTO_MESSAGE.to_string()));
        };

        let request = match builder::build_image_request(&file) {
            Ok(request) => request,
            Err(err) => return Some(Command::Notify(err.to_string())),
        };

        self.dispatch(
            EntryDraft::Photo {
                preview: Some(file),
            },
            DispatchPayload::Image(request),
        )
    }

    fn calculate(&mut self) -> Option<Command> {
        let (meal_name, rows) = match &self.state {
            WorkflowState::ManualEntry { meal_name, rows } => (meal_name.clone(), rows.clone()),
            WorkflowState::Pending { .. } => {
                debug!("Calculate requested while a request is already in flight");
                return None;
            }
            state => {
                debug!("Ignoring calculate in {} state", state.name());
                return None;
            }
        };

        let request = match builder::build_manual_request(&meal_name, &rows) {
            Ok(request) => request,
            Err(err) => return Some(Command::Notify(err.to_string())),
        };

        self.dispatch(
            EntryDraft::Manual { meal_name, rows },
            DispatchPayload::Manual(request),
        )
    }

    /// Enter `Pending` and hand the caller the request to issue. The
    /// state change happens before the network call so that any intent
    /// arriving during the wait is classified against `Pending`.
    fn dispatch(&mut self, draft: EntryDraft, payload: DispatchPayload) -> Option<Command> {
        let token = DispatchToken(self.next_token);
        self.next_token += 1;
        let origin = draft.origin();
        self.in_flight = Some(token);
        self.state = WorkflowState::Pending {
            origin,
            token,
            draft,
        };
        debug!("Dispatching {origin} request {token}");
        Some(Command::Dispatch(Dispatch { token, payload }))
    }

    fn restart(&mut self) -> Option<Command> {
        if self.state.is_pending() {
            debug!("Restart while a request is in flight; its response will be discarded");
        }
        self.in_flight = None;
        self.state = WorkflowState::Idle;
        None
    }

    fn dismiss_error(&mut self) -> Option<Command> {
        let draft = match &self.state {
            WorkflowState::Failed { draft, .. } => draft.clone(),
            state => {
                debug!("Ignoring dismiss in {} state", state.name());
                return None;
            }
        };
        self.state = Self::entry_state(draft);
        None
    }

    fn entry_state(draft: EntryDraft) -> WorkflowState {
        match draft {
            EntryDraft::Photo { preview } => WorkflowState::PhotoCapture { preview },
            EntryDraft::Manual { meal_name, rows } => {
                WorkflowState::ManualEntry { meal_name, rows }
            }
        }
    }
}

impl Default for WorkflowController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_result;

    fn png_file() -> SelectedFile {
        SelectedFile {
            bytes: vec![0x89, 0x50, 0x4e, 0x47],
            mime_type: "image/png".to_string(),
            file_name: Some("meal.png".to_string()),
        }
    }

    /// Drive a controller into `ManualEntry` with one complete row and
    /// return the dispatch produced by `Calculate`.
    fn manual_dispatch(controller: &mut WorkflowController) -> Dispatch {
        assert!(controller.handle_intent(Intent::ChooseManual).is_none());
        assert!(controller.handle_intent(Intent::AddRow).is_none());
        let id = match controller.state() {
            WorkflowState::ManualEntry { rows, .. } => rows[0].id,
            state => panic!("unexpected state {}", state.name()),
        };
        controller.handle_intent(Intent::EditRow {
            id,
            field: RowField::Ingredient,
            value: "Egg".to_string(),
        });
        controller.handle_intent(Intent::EditRow {
            id,
            field: RowField::Amount,
            value: "2".to_string(),
        });
        controller.handle_intent(Intent::EditMealName("Omelette".to_string()));
        match controller.handle_intent(Intent::Calculate) {
            Some(Command::Dispatch(dispatch)) => dispatch,
            other => panic!("expected dispatch, got {other:?}"),
        }
    }

    #[test]
    fn starts_idle() {
        let controller = WorkflowController::new();
        assert_eq!(*controller.state(), WorkflowState::Idle);
    }

    #[test]
    fn choose_photo_then_file_then_analyze_dispatches_image() {
        let mut controller = WorkflowController::new();
        controller.handle_intent(Intent::ChoosePhoto);
        assert_eq!(
            *controller.state(),
            WorkflowState::PhotoCapture { preview: None }
        );

        controller.handle_intent(Intent::FileSelected(png_file()));
        match controller.state() {
            WorkflowState::PhotoCapture {
                preview: Some(file),
            } => assert_eq!(file.mime_type, "image/png"),
            state => panic!("unexpected state {}", state.name()),
        }

        let command = controller.handle_intent(Intent::ConfirmAnalyze);
        match command {
            Some(Command::Dispatch(Dispatch {
                payload: DispatchPayload::Image(request),
                ..
            })) => assert_eq!(request.mime_type, "image/png"),
            other => panic!("expected image dispatch, got {other:?}"),
        }
        match controller.state() {
            WorkflowState::Pending { origin, .. } => assert_eq!(*origin, Origin::Photo),
            state => panic!("unexpected state {}", state.name()),
        }
    }

    #[test]
    fn analyze_without_preview_notifies_without_transition() {
        let mut controller = WorkflowController::new();
        controller.handle_intent(Intent::ChoosePhoto);
        let command = controller.handle_intent(Intent::ConfirmAnalyze);
        assert!(matches!(command, Some(Command::Notify(_))));
        assert_eq!(
            *controller.state(),
            WorkflowState::PhotoCapture { preview: None }
        );
    }

    #[test]
    fn analyze_with_non_image_preview_notifies_and_keeps_preview() {
        let mut controller = WorkflowController::new();
        controller.handle_intent(Intent::ChoosePhoto);
        let file = SelectedFile {
            bytes: vec![1, 2],
            mime_type: "text/plain".to_string(),
            file_name: Some("notes.txt".to_string()),
        };
        controller.handle_intent(Intent::FileSelected(file.clone()));

        let command = controller.handle_intent(Intent::ConfirmAnalyze);
        match command {
            Some(Command::Notify(message)) => {
                assert_eq!(message, "Unsupported file type: text/plain");
            }
            other => panic!("expected notify, got {other:?}"),
        }
        assert_eq!(
            *controller.state(),
            WorkflowState::PhotoCapture {
                preview: Some(file)
            }
        );
    }

    #[test]
    fn calculate_with_incomplete_input_preserves_draft() {
        let mut controller = WorkflowController::new();
        controller.handle_intent(Intent::ChooseManual);
        controller.handle_intent(Intent::AddRow);
        let id = match controller.state() {
            WorkflowState::ManualEntry { rows, .. } => rows[0].id,
            state => panic!("unexpected state {}", state.name()),
        };
        controller.handle_intent(Intent::EditRow {
            id,
            field: RowField::Ingredient,
            value: "Egg".to_string(),
        });
        // Amount and meal name still blank.
        let command = controller.handle_intent(Intent::Calculate);
        match command {
            Some(Command::Notify(message)) => {
                assert_eq!(message, "Please fill in all fields");
            }
            other => panic!("expected notify, got {other:?}"),
        }
        match controller.state() {
            WorkflowState::ManualEntry { rows, .. } => {
                assert_eq!(rows.len(), 1);
                assert_eq!(rows[0].name, "Egg");
            }
            state => panic!("unexpected state {}", state.name()),
        }
    }

    #[test]
    fn row_operations_address_rows_by_id() {
        let mut controller = WorkflowController::new();
        controller.handle_intent(Intent::ChooseManual);
        controller.handle_intent(Intent::AddRow);
        controller.handle_intent(Intent::AddRow);
        let (first, second) = match controller.state() {
            WorkflowState::ManualEntry { rows, .. } => (rows[0].id, rows[1].id),
            state => panic!("unexpected state {}", state.name()),
        };
        assert_ne!(first, second);

        controller.handle_intent(Intent::RemoveRow(first));
        controller.handle_intent(Intent::RemoveRow(999));
        match controller.state() {
            WorkflowState::ManualEntry { rows, .. } => {
                assert_eq!(rows.len(), 1);
                assert_eq!(rows[0].id, second);
            }
            state => panic!("unexpected state {}", state.name()),
        }
    }

    #[test]
    fn calculate_dispatches_validated_payload() {
        let mut controller = WorkflowController::new();
        let dispatch = manual_dispatch(&mut controller);
        match dispatch.payload {
            DispatchPayload::Manual(request) => {
                assert_eq!(request.meal_name, "Omelette");
                assert_eq!(request.ingredients.len(), 1);
                assert_eq!(request.ingredients[0].name, "Egg");
                assert_eq!(request.ingredients[0].amount, "2");
            }
            payload => panic!("expected manual payload, got {payload:?}"),
        }
        match controller.state() {
            WorkflowState::Pending { origin, .. } => assert_eq!(*origin, Origin::Manual),
            state => panic!("unexpected state {}", state.name()),
        }
    }

    #[test]
    fn second_dispatch_attempt_while_pending_is_a_no_op() {
        let mut controller = WorkflowController::new();
        let _dispatch = manual_dispatch(&mut controller);
        assert!(controller.handle_intent(Intent::Calculate).is_none());
        assert!(controller.handle_intent(Intent::ConfirmAnalyze).is_none());
        assert!(controller.state().is_pending());
    }

    #[test]
    fn success_completion_moves_to_results() {
        let mut controller = WorkflowController::new();
        let dispatch = manual_dispatch(&mut controller);
        controller.resolve(dispatch.token, Ok(sample_result()));
        match controller.state() {
            WorkflowState::Results { result } => {
                assert_eq!(result.meal_name, "Omelette");
                assert_eq!(result.calories, 220.0);
            }
            state => panic!("unexpected state {}", state.name()),
        }

        controller.handle_intent(Intent::Restart);
        assert_eq!(*controller.state(), WorkflowState::Idle);
    }

    #[test]
    fn failure_completion_moves_to_failed_with_draft() {
        let mut controller = WorkflowController::new();
        let dispatch = manual_dispatch(&mut controller);
        controller.resolve(
            dispatch.token,
            Err(ServiceError::ServerRejected(
                reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            )),
        );
        match controller.state() {
            WorkflowState::Failed {
                origin,
                message,
                draft,
            } => {
                assert_eq!(*origin, Origin::Manual);
                assert_eq!(message, "Failed to calculate nutrition. Please try again.");
                match draft {
                    EntryDraft::Manual { rows, .. } => {
                        assert_eq!(rows[0].name, "Egg");
                        assert_eq!(rows[0].amount, "2");
                    }
                    draft => panic!("expected manual draft, got {draft:?}"),
                }
            }
            state => panic!("unexpected state {}", state.name()),
        }
    }

    #[test]
    fn dismiss_returns_to_entry_state_without_redispatch() {
        let mut controller = WorkflowController::new();
        let dispatch = manual_dispatch(&mut controller);
        controller.resolve(
            dispatch.token,
            Err(ServiceError::Network("connection refused".to_string())),
        );

        assert!(controller.handle_intent(Intent::DismissError).is_none());
        match controller.state() {
            WorkflowState::ManualEntry { meal_name, rows } => {
                assert_eq!(meal_name, "Omelette");
                assert_eq!(rows[0].name, "Egg");
            }
            state => panic!("unexpected state {}", state.name()),
        }
    }

    #[test]
    fn restart_from_failed_goes_idle() {
        let mut controller = WorkflowController::new();
        let dispatch = manual_dispatch(&mut controller);
        controller.resolve(
            dispatch.token,
            Err(ServiceError::Decode("bad body".to_string())),
        );
        controller.handle_intent(Intent::Restart);
        assert_eq!(*controller.state(), WorkflowState::Idle);
    }

    #[test]
    fn stale_response_after_restart_is_discarded() {
        let mut controller = WorkflowController::new();
        let first = manual_dispatch(&mut controller);

        controller.handle_intent(Intent::Restart);
        let second = manual_dispatch(&mut controller);

        // Late success for the superseded request must not win.
        let mut stale = sample_result();
        stale.meal_name = "Stale".to_string();
        controller.resolve(first.token, Ok(stale));
        assert!(controller.state().is_pending());

        controller.resolve(second.token, Ok(sample_result()));
        match controller.state() {
            WorkflowState::Results { result } => assert_eq!(result.meal_name, "Omelette"),
            state => panic!("unexpected state {}", state.name()),
        }
    }

    #[test]
    fn mode_switch_while_pending_supersedes_dispatch() {
        let mut controller = WorkflowController::new();
        let dispatch = manual_dispatch(&mut controller);

        controller.handle_intent(Intent::ChoosePhoto);
        assert_eq!(
            *controller.state(),
            WorkflowState::PhotoCapture { preview: None }
        );

        controller.resolve(dispatch.token, Ok(sample_result()));
        assert_eq!(
            *controller.state(),
            WorkflowState::PhotoCapture { preview: None }
        );
    }

    #[test]
    fn entry_intents_are_ignored_outside_their_state() {
        let mut controller = WorkflowController::new();
        assert!(controller.handle_intent(Intent::AddRow).is_none());
        assert!(controller
            .handle_intent(Intent::FileSelected(png_file()))
            .is_none());
        assert!(controller.handle_intent(Intent::DismissError).is_none());
        assert_eq!(*controller.state(), WorkflowState::Idle);
    }
}
