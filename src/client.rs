//! Analysis service client.
//!
//! One HTTP operation per entry path: multipart image upload and JSON
//! nutrition calculation. Failures are classified, not retried; retry
//! policy belongs to the caller.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use tracing::debug;

use crate::config::ServiceConfig;
use crate::error::{Error, ServiceError};
use crate::models::{ImageRequest, ManualMealRequest, NutritionResult};

/// Multipart field name the image-analysis endpoint expects.
const IMAGE_FIELD: &str = "image";

/// Trait for the remote nutrition-analysis operations, providing a
/// testable abstraction over the HTTP transport.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Submit a photo for image analysis.
    async fn submit_image(
        &self,
        request: ImageRequest,
    ) -> Result<NutritionResult, ServiceError>;

    /// Submit a manual ingredient list for nutrition calculation.
    async fn submit_manual(
        &self,
        request: &ManualMealRequest,
    ) -> Result<NutritionResult, ServiceError>;
}

/// HTTP implementation backed by a pooled `reqwest` client.
pub struct HttpAnalysisClient {
    client: Client,
    analyze_image_url: Url,
    calculate_nutrition_url: Url,
}

impl HttpAnalysisClient {
    /// Create a client from endpoint configuration.
    pub fn new(config: &ServiceConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            analyze_image_url: config.analyze_image_url()?,
            calculate_nutrition_url: config.calculate_nutrition_url()?,
        })
    }

    async fn decode_response(
        response: reqwest::Response,
    ) -> Result<NutritionResult, ServiceError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::ServerRejected(status));
        }
        response
            .json::<NutritionResult>()
            .await
            .map_err(|e| ServiceError::Decode(format!("Failed to parse response: {e}")))
    }
}

#[async_trait]
impl AnalysisService for HttpAnalysisClient {
    async fn submit_image(
        &self,
        request: ImageRequest,
    ) -> Result<NutritionResult, ServiceError> {
        debug!(
            "Submitting {} byte image to {}",
            request.bytes.len(),
            self.analyze_image_url
        );

        let mut part = Part::bytes(request.bytes)
            .mime_str(&request.mime_type)
            .map_err(|e| ServiceError::Network(format!("Invalid content type: {e}")))?;
        if let Some(name) = request.file_name {
            part = part.file_name(name);
        }
        let form = Form::new().part(IMAGE_FIELD, part);

        let response = self
            .client
            .post(self.analyze_image_url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| ServiceError::Network(format!("Image analysis request failed: {e}")))?;

        Self::decode_response(response).await
    }

    async fn submit_manual(
        &self,
        request: &ManualMealRequest,
    ) -> Result<NutritionResult, ServiceError> {
        debug!(
            "Submitting {} ingredients to {}",
            request.ingredients.len(),
            self.calculate_nutrition_url
        );

        let response = self
            .client
            .post(self.calculate_nutrition_url.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                ServiceError::Network(format!("Nutrition calculation request failed: {e}"))
            })?;

        Self::decode_response(response).await
    }
}
