//! HTTP client for a text-classification inference endpoint
//!
//! The served model reports raw class labels (e.g. `LABEL_0`/`LABEL_1`);
//! which raw label means "citation site" is explicit configuration
//! (`citing_label`), never inferred from class order.

use async_trait::async_trait;

use crate::config::ClassifierConfig;
use crate::error::{Error, Result};
use crate::providers::classifier::SentenceClassifier;
use crate::types::SentenceLabel;

/// Citing-sentence classifier backed by an inference endpoint
pub struct HfClassifier {
    client: reqwest::Client,
    endpoint: String,
    citing_label: String,
}

impl HfClassifier {
    /// Create a new classifier client from configuration
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            citing_label: config.citing_label.clone(),
        }
    }
}

#[derive(serde::Serialize)]
struct ClassifyRequest<'a> {
    inputs: &'a [String],
}

#[derive(serde::Deserialize)]
struct RawPrediction {
    label: String,
    score: f32,
}

/// Pick the top-scoring prediction per input and map its raw label to the
/// boolean citing flag.
fn map_predictions(
    predictions: Vec<Vec<RawPrediction>>,
    citing_label: &str,
) -> Result<Vec<SentenceLabel>> {
    predictions
        .into_iter()
        .map(|mut ranked| {
            ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
            ranked
                .into_iter()
                .next()
                .map(|top| SentenceLabel {
                    citing: top.label == citing_label,
                    score: top.score,
                })
                .ok_or_else(|| Error::Classifier("empty prediction for input".to_string()))
        })
        .collect()
}

#[async_trait]
impl SentenceClassifier for HfClassifier {
    async fn classify(&self, sentences: &[String]) -> Result<Vec<SentenceLabel>> {
        if sentences.is_empty() {
            return Ok(Vec::new());
        }

        let request = ClassifyRequest { inputs: sentences };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Classifier(format!("classify request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Classifier(format!(
                "classification failed ({}): {}",
                status, body
            )));
        }

        let predictions: Vec<Vec<RawPrediction>> = response
            .json()
            .await
            .map_err(|e| Error::Classifier(format!("failed to parse classify response: {}", e)))?;

        if predictions.len() != sentences.len() {
            return Err(Error::Classifier(format!(
                "classify response length mismatch: {} inputs, {} predictions",
                sentences.len(),
                predictions.len()
            )));
        }

        map_predictions(predictions, &self.citing_label)
    }

    fn name(&self) -> &str {
        "hf-text-classification"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_configured_label_to_citing() {
        let predictions = vec![
            vec![
                RawPrediction { label: "LABEL_0".into(), score: 0.2 },
                RawPrediction { label: "LABEL_1".into(), score: 0.8 },
            ],
            vec![
                RawPrediction { label: "LABEL_0".into(), score: 0.9 },
                RawPrediction { label: "LABEL_1".into(), score: 0.1 },
            ],
        ];

        let labels = map_predictions(predictions, "LABEL_1").unwrap();
        assert_eq!(labels.len(), 2);
        assert!(labels[0].citing);
        assert!((labels[0].score - 0.8).abs() < f32::EPSILON);
        assert!(!labels[1].citing);
    }

    #[test]
    fn label_mapping_is_configuration_not_position() {
        let predictions = vec![vec![RawPrediction { label: "citing".into(), score: 0.99 }]];

        let labels = map_predictions(predictions, "citing").unwrap();
        assert!(labels[0].citing);

        let predictions = vec![vec![RawPrediction { label: "citing".into(), score: 0.99 }]];
        let labels = map_predictions(predictions, "LABEL_1").unwrap();
        assert!(!labels[0].citing);
    }
}
