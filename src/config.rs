//! Endpoint configuration for the analysis service.
//!
//! The two endpoint base paths are the only configuration surface of
//! the crate.

use std::time::Duration;
use url::Url;

use crate::error::{Error, Result};

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default path of the image-analysis endpoint
pub const ANALYZE_IMAGE_PATH: &str = "/api/analyze-image";

/// Default path of the nutrition-calculation endpoint
pub const CALCULATE_NUTRITION_PATH: &str = "/api/calculate-nutrition";

/// Where the two analysis operations are served from.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub base_url: Url,
    pub analyze_image_path: String,
    pub calculate_nutrition_path: String,
    pub timeout: Duration,
}

impl ServiceConfig {
    /// Configuration with default paths and timeout under `base_url`.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| Error::Config(format!("Invalid base URL: {e}")))?;
        Ok(Self {
            base_url,
            analyze_image_path: ANALYZE_IMAGE_PATH.to_string(),
            calculate_nutrition_path: CALCULATE_NUTRITION_PATH.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Full URL of the image-analysis endpoint.
    pub fn analyze_image_url(&self) -> Result<Url> {
        self.join(&self.analyze_image_path)
    }

    /// Full URL of the nutrition-calculation endpoint.
    pub fn calculate_nutrition_url(&self) -> Result<Url> {
        self.join(&self.calculate_nutrition_path)
    }

    fn join(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::Config(format!("Invalid endpoint path {path}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_default_paths_onto_base() {
        let config = ServiceConfig::new("http://localhost:3000").expect("valid base");
        assert_eq!(
            config.analyze_image_url().expect("joins").as_str(),
            "http://localhost:3000/api/analyze-image"
        );
        assert_eq!(
            config.calculate_nutrition_url().expect("joins").as_str(),
            "http://localhost:3000/api/calculate-nutrition"
        );
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(ServiceConfig::new("not a url").is_err());
    }
}
