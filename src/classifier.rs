//! Client side of the creativity classification service.
//!
//! The classifier is an external collaborator. The editor flow awaits
//! [`analyze_note`] before calling `add`/`update`, so a verdict is only ever
//! attached as part of one store mutation. Failures degrade to a
//! non-creative verdict and are never retried.
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{KnError, Result};

pub const EMPTY_NOTE_EXPLANATION: &str = "Note is empty.";
pub const UNAVAILABLE_EXPLANATION: &str = "Could not analyze creativity.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationRequest {
    pub note_content: String,
}

/// Verdict returned by the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreativityAssessment {
    pub is_creative: bool,
    pub creativity_explanation: String,
}

impl CreativityAssessment {
    pub fn not_creative(explanation: &str) -> Self {
        CreativityAssessment {
            is_creative: false,
            creativity_explanation: explanation.to_string(),
        }
    }
}

#[async_trait]
pub trait CreativityClassifier: Send + Sync {
    async fn classify(&self, request: ClassificationRequest) -> Result<CreativityAssessment>;
}

/// Posts the request as JSON to a fixed endpoint.
pub struct HttpClassifier {
    http: Client,
    endpoint: String,
}

impl HttpClassifier {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let http = Client::builder().build()?;
        Ok(HttpClassifier {
            http,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl CreativityClassifier for HttpClassifier {
    async fn classify(&self, request: ClassificationRequest) -> Result<CreativityAssessment> {
        debug!("Requesting creativity verdict from {}", self.endpoint);
        let resp = self.http.post(&self.endpoint).json(&request).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(KnError::ClassifierError {
                message: format!("service returned {}: {}", status, text),
            });
        }

        Ok(resp.json::<CreativityAssessment>().await?)
    }
}

/// Stand-in used when no classifier endpoint is configured.
pub struct DisabledClassifier;

#[async_trait]
impl CreativityClassifier for DisabledClassifier {
    async fn classify(&self, _request: ClassificationRequest) -> Result<CreativityAssessment> {
        Err(KnError::ClassifierError {
            message: "no classifier endpoint configured".to_string(),
        })
    }
}

/// Classifies `content`, substituting a non-creative verdict when the
/// content is blank, the call fails, or it exceeds `timeout`.
pub async fn analyze_note(
    classifier: &dyn CreativityClassifier,
    content: &str,
    timeout: Duration,
) -> CreativityAssessment {
    if content.trim().is_empty() {
        return CreativityAssessment::not_creative(EMPTY_NOTE_EXPLANATION);
    }

    let request = ClassificationRequest {
        note_content: content.to_string(),
    };

    match tokio::time::timeout(timeout, classifier.classify(request)).await {
        Ok(Ok(assessment)) => assessment,
        Ok(Err(e)) => {
            warn!("Error analyzing note creativity: {}", e);
            CreativityAssessment::not_creative(UNAVAILABLE_EXPLANATION)
        }
        Err(_) => {
            warn!("Creativity analysis timed out after {:?}", timeout);
            CreativityAssessment::not_creative(UNAVAILABLE_EXPLANATION)
        }
    }
}
