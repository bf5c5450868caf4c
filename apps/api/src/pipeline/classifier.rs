//! Classifier adapter: turns a frozen model's class probabilities into a
//! `(category, confidence)` pair.
//!
//! The model is loaded once at startup and shared read-only behind
//! `Arc<dyn TextClassifier>`. Swap the backend (or inject a mock in tests)
//! without touching the assembler or handlers.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::models::resume::ClassificationResult;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("text produced no tokens the model can vectorize")]
    Unvectorizable,

    #[error("model produced a non-finite probability")]
    NonFinite,

    #[error("invalid model artifact: {0}")]
    InvalidArtifact(String),

    #[error("failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The classifier could not score a text. Reported per document; only callers
/// that explicitly choose to mask it turn it into the `Unknown` sentinel.
#[derive(Debug, Clone, Error)]
#[error("classification unavailable: {reason}")]
pub struct ClassificationUnavailable {
    pub reason: String,
}

/// A pre-trained multi-class probabilistic text classifier.
pub trait TextClassifier: Send + Sync {
    /// The fixed label set, in the order probabilities are reported.
    fn labels(&self) -> &[String];

    /// One probability per label, in `labels()` order.
    fn predict_proba(&self, text: &str) -> Result<Vec<f64>, ModelError>;
}

/// Adapts any `TextClassifier` to the category/confidence contract.
#[derive(Clone)]
pub struct ClassifierAdapter {
    model: Arc<dyn TextClassifier>,
}

impl ClassifierAdapter {
    pub fn new(model: Arc<dyn TextClassifier>) -> Self {
        Self { model }
    }

    pub fn labels(&self) -> &[String] {
        self.model.labels()
    }

    /// Empty or whitespace-only text yields the sentinel without touching the model.
    /// Ties go to the label that comes first in the model's ordering.
    pub fn classify(&self, text: &str) -> Result<ClassificationResult, ClassificationUnavailable> {
        if text.trim().is_empty() {
            return Ok(ClassificationResult::unknown());
        }

        let probabilities = self
            .model
            .predict_proba(text)
            .map_err(|e| ClassificationUnavailable {
                reason: e.to_string(),
            })?;

        let labels = self.model.labels();
        if probabilities.len() != labels.len() || labels.is_empty() {
            return Err(ClassificationUnavailable {
                reason: format!(
                    "model returned {} probabilities for {} labels",
                    probabilities.len(),
                    labels.len()
                ),
            });
        }
        if probabilities.iter().any(|p| !p.is_finite()) {
            return Err(ClassificationUnavailable {
                reason: ModelError::NonFinite.to_string(),
            });
        }

        let mut best = 0;
        for (i, &p) in probabilities.iter().enumerate().skip(1) {
            if p > probabilities[best] {
                best = i;
            }
        }

        Ok(ClassificationResult {
            category: labels[best].clone(),
            confidence: to_percentage(probabilities[best]),
        })
    }
}

/// `round(p * 100, 2)`, clamped into [0, 100].
fn to_percentage(probability: f64) -> f64 {
    ((probability * 100.0).clamp(0.0, 100.0) * 100.0).round() / 100.0
}

// ────────────────────────────────────────────────────────────────────────────
// LinearTextModel: TF-IDF features scored by a softmax linear layer
// ────────────────────────────────────────────────────────────────────────────

/// Word runs of two or more characters, read from lower-cased text.
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern is valid"));

/// On-disk model artifact (JSON).
#[derive(Debug, Deserialize)]
pub struct ModelArtifact {
    pub labels: Vec<String>,
    pub vocabulary: HashMap<String, usize>,
    pub idf: Vec<f64>,
    /// One row per label, one column per vocabulary feature.
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
    #[serde(default)]
    pub sublinear_tf: bool,
}

/// Multinomial logistic regression over L2-normalized TF-IDF vectors.
#[derive(Debug)]
pub struct LinearTextModel {
    artifact: ModelArtifact,
}

impl LinearTextModel {
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ModelError> {
        let n_labels = artifact.labels.len();
        let n_features = artifact.idf.len();

        if n_labels == 0 {
            return Err(ModelError::InvalidArtifact("label set is empty".to_string()));
        }
        if artifact.intercepts.len() != n_labels || artifact.coefficients.len() != n_labels {
            return Err(ModelError::InvalidArtifact(format!(
                "expected {n_labels} coefficient rows and intercepts, found {} and {}",
                artifact.coefficients.len(),
                artifact.intercepts.len()
            )));
        }
        if let Some(row) = artifact.coefficients.iter().find(|r| r.len() != n_features) {
            return Err(ModelError::InvalidArtifact(format!(
                "coefficient row has {} features, idf has {n_features}",
                row.len()
            )));
        }
        if let Some((token, index)) = artifact.vocabulary.iter().find(|(_, &i)| i >= n_features) {
            return Err(ModelError::InvalidArtifact(format!(
                "vocabulary entry '{token}' points at feature {index} of {n_features}"
            )));
        }

        Ok(Self { artifact })
    }

    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Self::from_artifact(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let model = Self::from_json(&std::fs::read_to_string(path)?)?;
        info!(
            "Classifier loaded from {} ({} labels, {} features)",
            path.display(),
            model.artifact.labels.len(),
            model.artifact.idf.len()
        );
        Ok(model)
    }

    fn vectorize(&self, text: &str) -> Result<HashMap<usize, f64>, ModelError> {
        let lowered = text.to_lowercase();
        let mut token_count = 0usize;
        let mut counts: HashMap<usize, f64> = HashMap::new();

        for token in TOKEN_RE.find_iter(&lowered) {
            token_count += 1;
            if let Some(&index) = self.artifact.vocabulary.get(token.as_str()) {
                *counts.entry(index).or_default() += 1.0;
            }
        }
        if token_count == 0 {
            return Err(ModelError::Unvectorizable);
        }

        let mut features: HashMap<usize, f64> = counts
            .into_iter()
            .map(|(index, tf)| {
                let tf = if self.artifact.sublinear_tf { 1.0 + tf.ln() } else { tf };
                (index, tf * self.artifact.idf[index])
            })
            .collect();

        let norm = features.values().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            features.values_mut().for_each(|v| *v /= norm);
        }
        Ok(features)
    }
}

impl TextClassifier for LinearTextModel {
    fn labels(&self) -> &[String] {
        &self.artifact.labels
    }

    fn predict_proba(&self, text: &str) -> Result<Vec<f64>, ModelError> {
        let features = self.vectorize(text)?;

        let scores: Vec<f64> = self
            .artifact
            .coefficients
            .iter()
            .zip(&self.artifact.intercepts)
            .map(|(row, intercept)| {
                intercept
                    + features
                        .iter()
                        .map(|(&index, value)| row[index] * value)
                        .sum::<f64>()
            })
            .collect();

        let probabilities = softmax(&scores);
        if probabilities.iter().any(|p| !p.is_finite()) {
            return Err(ModelError::NonFinite);
        }
        Ok(probabilities)
    }
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}
