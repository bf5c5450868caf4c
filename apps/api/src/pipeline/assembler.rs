//! Resume record assembly: normalize once, run every extractor and the
//! classifier over the same text, merge into one `ResumeRecord`.

use tracing::{debug, warn};

use crate::models::resume::{ClassificationResult, RawDocument, ResumeRecord};
use crate::pipeline::classifier::{ClassificationUnavailable, ClassifierAdapter};
use crate::pipeline::extractors::extract_fields;
use crate::pipeline::normalizer::NormalizedText;

/// Stateless apart from the injected, read-only classifier.
#[derive(Clone)]
pub struct ResumeAssembler {
    classifier: ClassifierAdapter,
}

impl ResumeAssembler {
    pub fn new(classifier: ClassifierAdapter) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &ClassifierAdapter {
        &self.classifier
    }

    /// Single-document mode. A classifier failure is returned to the caller,
    /// never silently replaced by the sentinel.
    pub fn assemble_one(
        &self,
        document: RawDocument,
    ) -> Result<ResumeRecord, ClassificationUnavailable> {
        let (record, classification) = self.assemble(document);
        classification.map(|_| record)
    }

    /// Batch mode. Lazily yields one record per document, in source order,
    /// stopping after `limit` records when it is positive. A document whose
    /// classification fails still yields its extracted fields, with the
    /// sentinel category and the failure reason attached.
    pub fn assemble_many<'a, I>(
        &'a self,
        documents: I,
        limit: Option<i64>,
    ) -> impl Iterator<Item = ResumeRecord> + 'a
    where
        I: IntoIterator<Item = RawDocument>,
        I::IntoIter: 'a,
    {
        documents
            .into_iter()
            .take(effective_limit(limit))
            .map(move |document| match self.assemble(document) {
                (record, Ok(())) => record,
                (record, Err(e)) => {
                    warn!(id = ?record.id, "Classification failed, using sentinel: {e}");
                    record.with_classification_error(e.reason)
                }
            })
    }

    /// Builds the record; on classifier failure the record carries the sentinel
    /// and the error is handed back for the caller's policy.
    fn assemble(
        &self,
        document: RawDocument,
    ) -> (ResumeRecord, Result<(), ClassificationUnavailable>) {
        let text = NormalizedText::new(&document.text);
        let fields = extract_fields(&text);

        let (classification, outcome) = match self.classifier.classify(text.cased()) {
            Ok(result) => (result, Ok(())),
            Err(e) => (ClassificationResult::unknown(), Err(e)),
        };

        debug!(
            id = ?document.id,
            skills = fields.skills.len(),
            sections = fields.sections.len(),
            category = %classification.category,
            "Assembled resume record"
        );

        (ResumeRecord::new(document.id, fields, classification), outcome)
    }
}

/// `None` or a non-positive limit means "all".
pub fn effective_limit(limit: Option<i64>) -> usize {
    match limit {
        Some(n) if n > 0 => usize::try_from(n).unwrap_or(usize::MAX),
        _ => usize::MAX,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::resume::DocumentId;
    use crate::pipeline::classifier::tests::FixedClassifier;

    fn assembler_with(model: FixedClassifier) -> ResumeAssembler {
        ResumeAssembler::new(ClassifierAdapter::new(Arc::new(model)))
    }

    fn rows(n: usize) -> Vec<RawDocument> {
        (0..n)
            .map(|i| RawDocument::row(i, format!("Person Number\nresume {i} python")))
            .collect()
    }

    #[test]
    fn test_assemble_one_merges_fields_and_classification() {
        let assembler = assembler_with(FixedClassifier::new(&["HR", "Data Science"], &[0.3, 0.7]));
        let record = assembler
            .assemble_one(RawDocument::upload(
                "jane.pdf",
                "  Jane Doe \r\njane@example.com\nPython, SQL\n",
            ))
            .unwrap();

        assert_eq!(record.id, DocumentId::Filename("jane.pdf".to_string()));
        assert_eq!(record.name.as_deref(), Some("Jane Doe"));
        assert_eq!(record.email.as_deref(), Some("jane@example.com"));
        assert_eq!(record.phone, None);
        assert!(record.skills.contains("Python") && record.skills.contains("SQL"));
        assert_eq!(record.category, "Data Science");
        assert_eq!(record.confidence, 70.0);
        assert_eq!(record.classification_error, None);
    }

    #[test]
    fn test_assemble_one_empty_text_is_sentinel() {
        let model = Arc::new(FixedClassifier::new(&["A"], &[1.0]));
        let assembler = ResumeAssembler::new(ClassifierAdapter::new(model.clone()));
        let record = assembler
            .assemble_one(RawDocument::upload("blank.pdf", "  \n "))
            .unwrap();
        assert_eq!(record.category, "Unknown");
        assert_eq!(record.confidence, 0.0);
        assert_eq!(record.name, None);
        assert_eq!(model.call_count(), 0);
    }

    #[test]
    fn test_assemble_one_surfaces_classifier_failure() {
        let assembler = assembler_with(FixedClassifier::failing(&["A"]));
        let err = assembler
            .assemble_one(RawDocument::upload("cv.docx", "Jane Doe"))
            .unwrap_err();
        assert!(err.reason.contains("boom"));
    }

    #[test]
    fn test_assemble_many_preserves_order_without_limit() {
        let assembler = assembler_with(FixedClassifier::new(&["A", "B"], &[0.6, 0.4]));
        for limit in [None, Some(0), Some(-5)] {
            let records: Vec<_> = assembler.assemble_many(rows(7), limit).collect();
            let ids: Vec<_> = records.iter().map(|r| r.id.clone()).collect();
            let expected: Vec<_> = (0..7).map(DocumentId::ResumeId).collect();
            assert_eq!(ids, expected, "limit {limit:?}");
        }
    }

    #[test]
    fn test_assemble_many_honors_limit() {
        let assembler = assembler_with(FixedClassifier::new(&["A"], &[1.0]));
        for (n, limit, expected) in [(10, 3, 3), (2, 5, 2), (0, 4, 0), (5, 5, 5)] {
            let records: Vec<_> = assembler.assemble_many(rows(n), Some(limit)).collect();
            assert_eq!(records.len(), expected);
            for (i, record) in records.iter().enumerate() {
                assert_eq!(record.id, DocumentId::ResumeId(i));
            }
        }
    }

    #[test]
    fn test_assemble_many_is_lazy() {
        let model = Arc::new(FixedClassifier::new(&["A"], &[1.0]));
        let assembler = ResumeAssembler::new(ClassifierAdapter::new(model.clone()));
        let mut records = assembler.assemble_many(rows(100), None);
        assert!(records.next().is_some());
        assert!(records.next().is_some());
        assert_eq!(model.call_count(), 2);
    }

    #[test]
    fn test_batch_isolates_classifier_failures() {
        let assembler = assembler_with(FixedClassifier::failing(&["A"]));
        let docs = vec![
            RawDocument::row(0, "Jane Doe\njane@example.com"),
            RawDocument::row(1, ""),
        ];
        let records: Vec<_> = assembler.assemble_many(docs, None).collect();
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].name.as_deref(), Some("Jane Doe"));
        assert_eq!(records[0].email.as_deref(), Some("jane@example.com"));
        assert_eq!(records[0].category, "Unknown");
        assert_eq!(records[0].confidence, 0.0);
        assert!(records[0].classification_error.is_some());

        // Empty text never reaches the model, so it is a plain sentinel
        assert_eq!(records[1].category, "Unknown");
        assert_eq!(records[1].classification_error, None);
    }

    #[test]
    fn test_effective_limit() {
        assert_eq!(effective_limit(None), usize::MAX);
        assert_eq!(effective_limit(Some(0)), usize::MAX);
        assert_eq!(effective_limit(Some(-1)), usize::MAX);
        assert_eq!(effective_limit(Some(25)), 25);
    }
}
