//! # Mealflow
//!
//! Client-side workflow controller for a food-logging widget. A meal
//! arrives either as a photo or as a manual ingredient list, gets
//! submitted to a remote nutrition-analysis service, and the returned
//! nutrition facts drive what the display layer shows next.
//!
//! The display layer itself is an external collaborator: it implements
//! [`view::ViewAdapter`] and pushes user intents into the
//! [`workflow::WorkflowEngine`], which owns the single authoritative
//! [`workflow::WorkflowState`] value.
//!
//! ## Modules
//!
//! - `builder` - Request validation and assembly
//! - `client` - HTTP client for the two analysis operations
//! - `config` - Service endpoint configuration
//! - `error` - Error taxonomy
//! - `logging` - Tracing subscriber setup for embedders
//! - `models` - Data model and wire (de)serialization
//! - `testing` - Mocks and fixtures for tests and embedders
//! - `view` - Rendering contract consumed by the workflow engine
//! - `workflow` - The state machine and its async driver

pub mod builder;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod view;
pub mod workflow;

pub mod testing;
