//! Request validation and assembly.
//!
//! Raw user input becomes a validated payload here or it does not leave
//! the controller: builder failures never reach the network layer.

use crate::error::ValidationError;
use crate::models::{ImageRequest, Ingredient, IngredientDraft, ManualMealRequest, SelectedFile};

/// Assemble a manual-entry payload from draft rows.
///
/// Rows with either field blank after trimming are dropped silently;
/// surviving rows keep their relative order and duplicates are kept as
/// entered. Fields are stored trimmed. Fails with
/// [`ValidationError::MissingFields`] when the trimmed meal name is
/// empty or no rows survive the filter.
pub fn build_manual_request(
    meal_name: &str,
    rows: &[IngredientDraft],
) -> Result<ManualMealRequest, ValidationError> {
    let meal_name = meal_name.trim();
    let ingredients: Vec<Ingredient> = rows
        .iter()
        .filter_map(|row| {
            let name = row.name.trim();
            let amount = row.amount.trim();
            if name.is_empty() || amount.is_empty() {
                return None;
            }
            Some(Ingredient {
                name: name.to_string(),
                amount: amount.to_string(),
            })
        })
        .collect();

    if meal_name.is_empty() || ingredients.is_empty() {
        return Err(ValidationError::MissingFields);
    }

    Ok(ManualMealRequest {
        meal_name: meal_name.to_string(),
        ingredients,
    })
}

/// Validate a picked file as an image payload.
///
/// The declared content type wins; when the picker supplies none, the
/// type is guessed from the file name. Anything that does not resolve
/// to `image/*` fails with [`ValidationError::UnsupportedType`].
pub fn build_image_request(file: &SelectedFile) -> Result<ImageRequest, ValidationError> {
    let mime_type = if file.mime_type.is_empty() {
        file.file_name
            .as_deref()
            .map(|name| {
                mime_guess::from_path(name)
                    .first_or_octet_stream()
                    .essence_str()
                    .to_string()
            })
            .unwrap_or_default()
    } else {
        file.mime_type.clone()
    };

    if !mime_type.starts_with("image/") {
        return Err(ValidationError::UnsupportedType(mime_type));
    }

    Ok(ImageRequest {
        bytes: file.bytes.clone(),
        mime_type,
        file_name: file.file_name.clone(),
    })
}
