//! Testing utilities and fixtures.
//!
//! Mocks for the two external collaborators (analysis service, view)
//! plus the nutrition fixture shared across the test suite.

use std::collections::VecDeque;
use std::sync::Mutex as StdMutex;

use async_trait::async_trait;
use tokio::sync::{Mutex, Semaphore};

use crate::client::AnalysisService;
use crate::error::ServiceError;
use crate::models::{ImageRequest, ManualMealRequest, NutritionResult};
use crate::view::ViewAdapter;
use crate::workflow::WorkflowState;

/// Mock analysis service with queued outcomes and call recording.
pub struct MockAnalysisService {
    /// Predefined outcomes, returned in submission order.
    responses: Mutex<VecDeque<Result<NutritionResult, ServiceError>>>,
    /// Recorded image submissions.
    image_calls: Mutex<Vec<ImageRequest>>,
    /// Recorded manual submissions.
    manual_calls: Mutex<Vec<ManualMealRequest>>,
    /// When present, each submission waits for one `release` first.
    gate: Option<Semaphore>,
}

impl MockAnalysisService {
    /// Mock whose submissions complete immediately.
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            image_calls: Mutex::new(Vec::new()),
            manual_calls: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Mock whose submissions block until [`release`](Self::release)
    /// is called, for asserting in-flight behavior.
    pub fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::new()
        }
    }

    /// Queue the outcome for the next submission.
    pub async fn add_response(&self, outcome: Result<NutritionResult, ServiceError>) {
        self.responses.lock().await.push_back(outcome);
    }

    /// Let one gated submission complete.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    /// Number of image submissions seen so far.
    pub async fn image_call_count(&self) -> usize {
        self.image_calls.lock().await.len()
    }

    /// Number of manual submissions seen so far.
    pub async fn manual_call_count(&self) -> usize {
        self.manual_calls.lock().await.len()
    }

    /// Recorded manual submissions.
    pub async fn manual_calls(&self) -> Vec<ManualMealRequest> {
        self.manual_calls.lock().await.clone()
    }

    async fn next_outcome(&self) -> Result<NutritionResult, ServiceError> {
        if let Some(gate) = &self.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(ServiceError::Network("No mock response configured".to_string())))
    }
}

impl Default for MockAnalysisService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnalysisService for MockAnalysisService {
    async fn submit_image(
        &self,
        request: ImageRequest,
    ) -> Result<NutritionResult, ServiceError> {
        self.image_calls.lock().await.push(request);
        self.next_outcome().await
    }

    async fn submit_manual(
        &self,
        request: &ManualMealRequest,
    ) -> Result<NutritionResult, ServiceError> {
        self.manual_calls.lock().await.push(request.clone());
        self.next_outcome().await
    }
}

/// View adapter that records every render and message for assertions.
#[derive(Default)]
pub struct RecordingView {
    states: StdMutex<Vec<WorkflowState>>,
    messages: StdMutex<Vec<String>>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every state rendered so far, in order.
    pub fn states(&self) -> Vec<WorkflowState> {
        self.states.lock().expect("view lock poisoned").clone()
    }

    /// The most recently rendered state.
    pub fn last_state(&self) -> Option<WorkflowState> {
        self.states.lock().expect("view lock poisoned").last().cloned()
    }

    /// Every validation message shown so far, in order.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().expect("view lock poisoned").clone()
    }
}

impl ViewAdapter for RecordingView {
    fn render_state(&self, state: &WorkflowState) {
        self.states
            .lock()
            .expect("view lock poisoned")
            .push(state.clone());
    }

    fn show_validation_message(&self, message: &str) {
        self.messages
            .lock()
            .expect("view lock poisoned")
            .push(message.to_string());
    }
}

/// Nutrition facts fixture for the omelette example used across the
/// test suite.
pub fn sample_result() -> NutritionResult {
    NutritionResult {
        meal_name: "Omelette".to_string(),
        serving_size_grams: 150.0,
        calories: 220.0,
        carbs_grams: 2.0,
        protein_grams: 14.0,
        fat_grams: 16.0,
        fiber_grams: 0.0,
    }
}
