//! Data model for meal input and nutrition facts.
//!
//! Serde attributes pin the wire field names of the analysis-service
//! contract; internal names stay idiomatic Rust.

use serde::{Deserialize, Serialize};

/// Single validated ingredient included in a manual request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ingredient {
    /// Ingredient name, serialized as `ingredient` on the wire.
    #[serde(rename = "ingredient")]
    pub name: String,
    /// Free-form amount, e.g. "2" or "100g".
    pub amount: String,
}

/// Mutable ingredient row as entered by the user.
///
/// Rows carry a controller-assigned id so the view can address them in
/// remove/edit intents without the controller knowing anything about
/// how rows are displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientDraft {
    pub id: u64,
    pub name: String,
    pub amount: String,
}

impl IngredientDraft {
    /// New empty row with the given id.
    pub fn new(id: u64) -> Self {
        Self {
            id,
            name: String::new(),
            amount: String::new(),
        }
    }
}

/// File handed over by the picker, held as the photo preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub bytes: Vec<u8>,
    /// Declared content type; may be empty when the picker has none.
    pub mime_type: String,
    pub file_name: Option<String>,
}

/// Validated manual-entry payload for the nutrition-calculation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ManualMealRequest {
    pub meal_name: String,
    pub ingredients: Vec<Ingredient>,
}

/// Validated image payload for the image-analysis endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub bytes: Vec<u8>,
    /// Always starts with `image/`.
    pub mime_type: String,
    pub file_name: Option<String>,
}

/// Nutrition facts returned by the analysis service.
///
/// Constructed only by decoding a successful response; never modified
/// afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NutritionResult {
    pub meal_name: String,
    #[serde(rename = "servingSize")]
    pub serving_size_grams: f64,
    pub calories: f64,
    #[serde(rename = "carbs")]
    pub carbs_grams: f64,
    #[serde(rename = "protein")]
    pub protein_grams: f64,
    #[serde(rename = "fat")]
    pub fat_grams: f64,
    #[serde(rename = "fiber")]
    pub fiber_grams: f64,
}

/// Which entry path produced the current pending/result/failed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Photo,
    Manual,
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Origin::Photo => write!(f, "photo"),
            Origin::Manual => write!(f, "manual"),
        }
    }
}
