use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Category reported when classification cannot meaningfully run.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Where a document came from. Serialized flat into the record as either
/// `resume_id` (dataset row position) or `filename` (upload name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentId {
    ResumeId(usize),
    Filename(String),
}

/// One document's raw text, alive only for the duration of a parse request.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub id: DocumentId,
    pub text: String,
}

impl RawDocument {
    pub fn row(position: usize, text: impl Into<String>) -> Self {
        Self {
            id: DocumentId::ResumeId(position),
            text: text.into(),
        }
    }

    pub fn upload(filename: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: DocumentId::Filename(filename.into()),
            text: text.into(),
        }
    }
}

/// Heuristically extracted fields. Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: BTreeSet<String>,
    pub sections: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub category: String,
    /// Percentage in [0, 100], rounded to two decimals.
    pub confidence: f64,
}

impl ClassificationResult {
    pub fn unknown() -> Self {
        Self {
            category: UNKNOWN_CATEGORY.to_string(),
            confidence: 0.0,
        }
    }
}

/// The caller-facing result of processing one document. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    #[serde(flatten)]
    pub id: DocumentId,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: BTreeSet<String>,
    pub sections: BTreeMap<String, String>,
    pub category: String,
    pub confidence: f64,
    /// Set when the sentinel category was substituted for a classifier failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification_error: Option<String>,
}

impl ResumeRecord {
    pub fn new(
        id: DocumentId,
        fields: ExtractedFields,
        classification: ClassificationResult,
    ) -> Self {
        let ExtractedFields {
            name,
            email,
            phone,
            skills,
            sections,
        } = fields;

        Self {
            id,
            name,
            email,
            phone,
            skills,
            sections,
            category: classification.category,
            confidence: classification.confidence,
            classification_error: None,
        }
    }

    pub fn with_classification_error(mut self, reason: impl Into<String>) -> Self {
        self.classification_error = Some(reason.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_fields() -> ExtractedFields {
        ExtractedFields {
            name: Some("Jane Doe".to_string()),
            email: Some("jane@example.com".to_string()),
            phone: None,
            skills: ["Python", "SQL"].iter().map(|s| s.to_string()).collect(),
            sections: BTreeMap::new(),
        }
    }

    #[test]
    fn test_row_record_serializes_resume_id() {
        let record = ResumeRecord::new(
            DocumentId::ResumeId(3),
            sample_fields(),
            ClassificationResult {
                category: "Data Science".to_string(),
                confidence: 87.25,
            },
        );

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["resume_id"], 3);
        assert!(json.get("filename").is_none());
        assert_eq!(json["name"], "Jane Doe");
        assert!(json["phone"].is_null());
        assert_eq!(json["skills"], serde_json::json!(["Python", "SQL"]));
        assert_eq!(json["category"], "Data Science");
        assert_eq!(json["confidence"], 87.25);
        assert!(json.get("classification_error").is_none());
    }

    #[test]
    fn test_upload_record_serializes_filename() {
        let record = ResumeRecord::new(
            DocumentId::Filename("cv.pdf".to_string()),
            ExtractedFields::default(),
            ClassificationResult::unknown(),
        )
        .with_classification_error("model produced a non-finite probability");

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["filename"], "cv.pdf");
        assert!(json.get("resume_id").is_none());
        assert_eq!(json["category"], "Unknown");
        assert_eq!(json["confidence"], 0.0);
        assert_eq!(
            json["classification_error"],
            "model produced a non-finite probability"
        );
    }

    #[test]
    fn test_unknown_sentinel() {
        let unknown = ClassificationResult::unknown();
        assert_eq!(unknown.category, "Unknown");
        assert_eq!(unknown.confidence, 0.0);
    }
}
