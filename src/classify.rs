//! Remote classification of an extracted abstract.
//!
//! The service receives `{"text": "<abstract>"}` and answers with one
//! prediction per label:
//!
//! ```json
//! {"predictions": [{"sdg": {"label": "Quality Education", ...}, "prediction": 0.4257}, ...]}
//! ```
//!
//! Classification is an optional enrichment. [`Classifier::classify`] never
//! fails: transport errors, non-2xx statuses and malformed bodies are logged
//! and produce an empty list. Use [`Classifier::try_classify`] to see the
//! error instead.

use crate::config::ClassifierConfig;
use crate::error::ClassificationError;
use crate::output::Classification;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct ClassifyResponse {
    predictions: Vec<Prediction>,
}

#[derive(Deserialize)]
struct Prediction {
    sdg: PredictionLabel,
    prediction: f64,
}

#[derive(Deserialize)]
struct PredictionLabel {
    label: String,
}

/// HTTP client for the classification service.
#[derive(Debug, Clone)]
pub struct Classifier {
    client: reqwest::Client,
    config: ClassifierConfig,
}

impl Classifier {
    pub fn new(config: ClassifierConfig) -> Result<Self, ClassificationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Labels at or above the confidence floor, in service order.
    /// Any failure is logged and yields an empty list.
    pub async fn classify(&self, text: &str) -> Vec<Classification> {
        match self.try_classify(text).await {
            Ok(labels) => labels,
            Err(e) => {
                error!("Classification via {} failed: {}", self.config.endpoint, e);
                Vec::new()
            }
        }
    }

    /// Like [`Classifier::classify`] but surfaces the failure.
    pub async fn try_classify(&self, text: &str) -> Result<Vec<Classification>, ClassificationError> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&ClassifyRequest { text })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClassificationError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let parsed: ClassifyResponse =
            serde_json::from_str(&body).map_err(|e| ClassificationError::Decode(e.to_string()))?;

        let labels: Vec<Classification> = parsed
            .predictions
            .into_iter()
            .filter(|p| p.prediction >= self.config.min_confidence)
            .map(|p| Classification {
                label: p.sdg.label,
                score: percent(p.prediction),
            })
            .collect();

        debug!("Classifier kept {} labels", labels.len());
        Ok(labels)
    }
}

/// 0–1 probability as a percentage rounded to two decimals.
fn percent(probability: f64) -> f64 {
    (probability * 100.0 * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounds_to_two_decimals() {
        assert_eq!(percent(0.425_678), 42.57);
        assert_eq!(percent(0.15), 15.0);
        assert_eq!(percent(1.0), 100.0);
        assert_eq!(percent(0.0), 0.0);
    }

    #[test]
    fn request_body_shape() {
        let body = serde_json::to_value(ClassifyRequest { text: "abc" }).unwrap();
        assert_eq!(body, serde_json::json!({"text": "abc"}));
    }

    #[test]
    fn response_ignores_extra_fields() {
        let json = r#"{"predictions":[{"sdg":{"label":"Climate Action","code":"13"},"prediction":0.3,"extra":1}]}"#;
        let parsed: ClassifyResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.predictions[0].sdg.label, "Climate Action");
    }
}
