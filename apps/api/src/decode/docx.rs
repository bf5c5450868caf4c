//! Minimal DOCX reader: streams `word/document.xml` and keeps the run text.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use crate::decode::DecodeError;

const DOCUMENT_PART: &str = "word/document.xml";

pub fn extract_text(bytes: &[u8]) -> Result<String, DecodeError> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|e| DecodeError::Docx(e.to_string()))?;
    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| DecodeError::Docx(format!("{DOCUMENT_PART}: {e}")))?;

    let mut raw = Vec::new();
    part.read_to_end(&mut raw)
        .map_err(|e| DecodeError::Docx(e.to_string()))?;

    text_from_document_xml(&String::from_utf8_lossy(&raw))
}

/// Text runs in document order. Tabs and breaks count only inside a run
/// (`w:r`); paragraph ends become newlines. Matching is on local names so
/// the namespace prefix does not matter.
fn text_from_document_xml(xml: &str) -> Result<String, DecodeError> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_run = false;
    let mut in_run_text = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| DecodeError::Docx(format!("{DOCUMENT_PART}: {e}")))?;
        match event {
            Event::Start(tag) => match tag.local_name().as_ref() {
                b"r" => in_run = true,
                b"t" => in_run_text = in_run,
                _ => {}
            },
            Event::End(tag) => match tag.local_name().as_ref() {
                b"r" => in_run = false,
                b"t" => in_run_text = false,
                b"p" => text.push('\n'),
                _ => {}
            },
            Event::Empty(tag) => match tag.local_name().as_ref() {
                b"tab" if in_run => text.push('\t'),
                b"br" | b"cr" if in_run => text.push('\n'),
                b"p" => text.push('\n'),
                _ => {}
            },
            Event::Text(run) if in_run_text => {
                let unescaped = run
                    .unescape()
                    .map_err(|e| DecodeError::Docx(format!("{DOCUMENT_PART}: {e}")))?;
                text.push_str(&unescaped);
            }
            Event::CData(run) if in_run_text => {
                text.push_str(&String::from_utf8_lossy(&run.into_inner()));
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    use super::*;

    const DOCUMENT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>
<w:p><w:r><w:t>Jane</w:t></w:r><w:r><w:t xml:space="preserve"> Doe</w:t></w:r></w:p>
<w:p><w:r><w:t>jane@example.com</w:t></w:r></w:p>
<w:p><w:r><w:t>R&amp;D</w:t><w:tab/><w:t>Python</w:t><w:br/><w:t>SQL</w:t></w:r></w:p>
</w:body></w:document>"#;

    fn build_docx(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, contents) in parts {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(contents.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_extracts_paragraph_text() {
        let bytes = build_docx(&[(DOCUMENT_PART, DOCUMENT_XML)]);
        let text = extract_text(&bytes).unwrap();
        assert_eq!(text, "Jane Doe\njane@example.com\nR&D\tPython\nSQL\n");
    }

    #[test]
    fn test_attributed_breaks_and_numeric_entities() {
        let xml = concat!(
            r#"<w:document xmlns:w="urn:w"><w:body><w:p><w:r>"#,
            r#"<w:t>Jane Doe</w:t><w:br w:type="textWrapping"/>"#,
            r#"<w:t>jane@example.com</w:t><w:tab w:val="x"/>"#,
            r#"<w:t>O&#8217;Neil &#x26; Co</w:t>"#,
            r#"</w:r></w:p></w:body></w:document>"#,
        );
        let text = text_from_document_xml(xml).unwrap();
        assert_eq!(text, "Jane Doe\njane@example.com\tO\u{2019}Neil & Co\n");
    }

    #[test]
    fn test_tab_stops_in_paragraph_properties_are_not_text() {
        let xml = concat!(
            r#"<w:document xmlns:w="urn:w"><w:body>"#,
            r#"<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr>"#,
            r#"<w:r><w:t>Summary</w:t></w:r></w:p><w:p/>"#,
            r#"<w:p><w:r><w:t>Rust</w:t></w:r></w:p></w:body></w:document>"#,
        );
        let text = text_from_document_xml(xml).unwrap();
        assert_eq!(text, "Summary\n\nRust\n");
    }

    #[test]
    fn test_malformed_document_xml_is_error() {
        let bytes = build_docx(&[(DOCUMENT_PART, "<w:p><w:r><w:t>Jane</w:p>")]);
        assert!(matches!(extract_text(&bytes), Err(DecodeError::Docx(_))));
    }

    #[test]
    fn test_missing_document_part_is_error() {
        let bytes = build_docx(&[("word/other.xml", "<x/>")]);
        assert!(matches!(extract_text(&bytes), Err(DecodeError::Docx(_))));
    }

    #[test]
    fn test_non_zip_is_error() {
        let bytes = b"\xd0\xcf\x11\xe0 legacy doc";
        assert!(matches!(extract_text(bytes), Err(DecodeError::Docx(_))));
    }
}
