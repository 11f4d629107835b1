//! Event-loop driver wiring the controller to the service client and
//! the view.
//!
//! Single-threaded and cooperative: one loop consumes user intents and
//! service completions strictly in arrival order, so there is exactly
//! one authoritative state at any instant. Network calls run as spawned
//! tasks whose outcome is posted back into the loop as a completion.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::client::AnalysisService;
use crate::error::ServiceError;
use crate::models::NutritionResult;
use crate::view::ViewAdapter;

use super::controller::WorkflowController;
use super::event::{Command, Dispatch, DispatchPayload, Intent};
use super::state::DispatchToken;

/// Outcome of a spawned dispatch, routed back into the engine loop.
struct Completion {
    token: DispatchToken,
    outcome: Result<NutritionResult, ServiceError>,
}

/// Cloneable handle for feeding user intents into a running engine.
#[derive(Clone)]
pub struct IntentSender {
    tx: mpsc::UnboundedSender<Intent>,
}

impl IntentSender {
    /// Queue an intent. Returns false once the engine has shut down.
    pub fn send(&self, intent: Intent) -> bool {
        self.tx.send(intent).is_ok()
    }
}

/// Drives the workflow: applies intents and completions through the
/// controller, issues dispatches, and renders after every transition.
pub struct WorkflowEngine {
    controller: WorkflowController,
    service: Arc<dyn AnalysisService>,
    view: Arc<dyn ViewAdapter>,
    intents_rx: mpsc::UnboundedReceiver<Intent>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: usize,
    instance_id: Uuid,
}

impl WorkflowEngine {
    /// Build an engine and the intent handle the view layer pushes
    /// through.
    pub fn new(
        service: Arc<dyn AnalysisService>,
        view: Arc<dyn ViewAdapter>,
    ) -> (Self, IntentSender) {
        let (intents_tx, intents_rx) = mpsc::unbounded_channel();
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let engine = Self {
            controller: WorkflowController::new(),
            service,
            view,
            intents_rx,
            completions_tx,
            completions_rx,
            in_flight: 0,
            instance_id: Uuid::new_v4(),
        };
        (engine, IntentSender { tx: intents_tx })
    }

    /// Run until every [`IntentSender`] is dropped and no dispatch is
    /// still in flight.
    pub async fn run(mut self) {
        info!("Workflow engine {} started", self.instance_id);
        self.view.render_state(self.controller.state());

        let mut intents_open = true;
        while intents_open || self.in_flight > 0 {
            tokio::select! {
                completion = self.completions_rx.recv() => {
                    if let Some(Completion { token, outcome }) = completion {
                        self.in_flight -= 1;
                        self.controller.resolve(token, outcome);
                        self.view.render_state(self.controller.state());
                    }
                }
                intent = self.intents_rx.recv(), if intents_open => {
                    match intent {
                        Some(intent) => self.apply(intent),
                        None => intents_open = false,
                    }
                }
            }
        }

        info!("Workflow engine {} stopped", self.instance_id);
    }

    fn apply(&mut self, intent: Intent) {
        match self.controller.handle_intent(intent) {
            Some(Command::Dispatch(dispatch)) => {
                // Pending is already the authoritative state; render it
                // before the request leaves.
                self.view.render_state(self.controller.state());
                self.spawn_dispatch(dispatch);
            }
            Some(Command::Notify(message)) => {
                self.view.show_validation_message(&message);
            }
            None => self.view.render_state(self.controller.state()),
        }
    }

    fn spawn_dispatch(&mut self, dispatch: Dispatch) {
        self.in_flight += 1;
        let service = Arc::clone(&self.service);
        let completions = self.completions_tx.clone();
        let instance_id = self.instance_id;
        tokio::spawn(async move {
            let Dispatch { token, payload } = dispatch;
            let outcome = match payload {
                DispatchPayload::Image(request) => service.submit_image(request).await,
                DispatchPayload::Manual(request) => service.submit_manual(&request).await,
            };
            if completions
                .send(Completion { token, outcome })
                .is_err()
            {
                debug!("Engine {instance_id} gone before dispatch {token} completed");
            }
        });
    }
}
