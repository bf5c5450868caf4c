//! Locates the resume free-text column and yields its rows as documents.

use std::io::Cursor;

use bytes::Bytes;
use csv::{ByteRecordsIntoIter, ReaderBuilder};
use tracing::{debug, warn};

use crate::dataset::DatasetError;
use crate::models::resume::RawDocument;

/// Lazy iterator over the resume column. Identifiers are 0-based data-row
/// positions; a malformed row is skipped but still consumes its position.
pub struct ResumeTexts {
    records: ByteRecordsIntoIter<Cursor<Bytes>>,
    column: usize,
    position: usize,
}

impl Iterator for ResumeTexts {
    type Item = RawDocument;

    fn next(&mut self) -> Option<RawDocument> {
        loop {
            let result = self.records.next()?;
            let position = self.position;
            self.position += 1;

            match result {
                Ok(record) => {
                    let text = record
                        .get(self.column)
                        .map(|field| String::from_utf8_lossy(field).into_owned())
                        .unwrap_or_default();
                    return Some(RawDocument::row(position, text));
                }
                Err(e) => warn!(position, "Skipping malformed dataset row: {e}"),
            }
        }
    }
}

/// Reads the header and picks the first column whose name contains "resume"
/// (case-insensitive). Fails with a schema error before any row is read.
pub fn load_texts(data: Bytes) -> Result<ResumeTexts, DatasetError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(Cursor::new(data));

    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|h| String::from_utf8_lossy(h).into_owned())
        .collect();
    let column = find_resume_column(&headers)?;
    debug!(column = %headers[column], "Resume column located");

    Ok(ResumeTexts {
        records: reader.into_byte_records(),
        column,
        position: 0,
    })
}

fn find_resume_column(headers: &[String]) -> Result<usize, DatasetError> {
    headers
        .iter()
        .position(|h| h.to_lowercase().contains("resume"))
        .ok_or_else(|| {
            DatasetError::Schema(format!(
                "no resume text column among [{}]",
                headers.join(", ")
            ))
        })
}
