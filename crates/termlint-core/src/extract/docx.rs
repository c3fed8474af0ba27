//! DOCX text extraction.
//!
//! Reads `word/document.xml` from the package and joins the text of the
//! body-level paragraphs with newlines. Table cells, text boxes, content
//! controls (`w:sdt`), headers and footers are not part of the body paragraph
//! sequence and are skipped.

use std::io::{Cursor, Read};

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::{Result, TermlintError};
use crate::types::DocumentPages;

const FORMAT: &str = "docx";
const DOCUMENT_PART: &str = "word/document.xml";

/// Extracts a DOCX package as a single page.
pub fn extract_docx(bytes: &[u8]) -> Result<DocumentPages> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| TermlintError::extraction(FORMAT, e))?;
    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| TermlintError::extraction(FORMAT, e))?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)?;

    let paragraphs = body_paragraphs(&xml)?;
    Ok(DocumentPages::single(paragraphs.join("\n")))
}

/// Collects the plain text of each body-level `w:p` in document order.
pub fn body_paragraphs(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_reader(xml.as_bytes());
    reader.trim_text(false);

    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;
    let mut nested = 0usize; // w:tbl / w:txbxContent / w:sdt depth
    let mut in_run = false;
    let mut in_text = false;
    let mut buf = Vec::new();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| TermlintError::extraction(FORMAT, e))?;
        match event {
            Event::Start(tag) => match tag.name().as_ref() {
                b"w:tbl" | b"w:txbxContent" | b"w:sdt" => nested += 1,
                b"w:p" if nested == 0 => current = Some(String::new()),
                b"w:r" => in_run = true,
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::End(tag) => match tag.name().as_ref() {
                b"w:tbl" | b"w:txbxContent" | b"w:sdt" => nested = nested.saturating_sub(1),
                b"w:p" if nested == 0 => {
                    if let Some(text) = current.take() {
                        paragraphs.push(text);
                    }
                }
                b"w:r" => in_run = false,
                b"w:t" => in_text = false,
                _ => {}
            },
            Event::Empty(tag) if nested == 0 => match tag.name().as_ref() {
                b"w:p" => paragraphs.push(String::new()),
                b"w:tab" if in_run => {
                    if let Some(text) = current.as_mut() {
                        text.push('\t');
                    }
                }
                b"w:br" | b"w:cr" if in_run => {
                    if let Some(text) = current.as_mut() {
                        text.push('\n');
                    }
                }
                _ => {}
            },
            Event::Text(content) if in_text && nested == 0 => {
                if let Some(text) = current.as_mut() {
                    let unescaped = content
                        .unescape()
                        .map_err(|e| TermlintError::extraction(FORMAT, e))?;
                    text.push_str(&unescaped);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn document_xml(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        )
    }

    fn build_docx(body: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file(DOCUMENT_PART, zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(document_xml(body).as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn joins_paragraphs_with_newlines() {
        let body = "<w:p><w:r><w:t>Привезли </w:t></w:r><w:r><w:t>бронетехніку.</w:t></w:r></w:p>\
                    <w:p><w:r><w:t>Танк стояв поруч.</w:t></w:r></w:p>";
        let pages = extract_docx(&build_docx(body)).unwrap();
        assert_eq!(
            pages.pages(),
            &["Привезли бронетехніку.\nТанк стояв поруч.".to_string()]
        );
    }

    #[test]
    fn empty_paragraphs_are_kept() {
        let body = "<w:p/><w:p><w:r><w:t>Текст</w:t></w:r></w:p><w:p></w:p>";
        let paragraphs = body_paragraphs(&document_xml(body)).unwrap();
        assert_eq!(
            paragraphs,
            vec![String::new(), "Текст".to_string(), String::new()]
        );
    }

    #[test]
    fn tabs_breaks_and_entities() {
        let body = r#"<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr><w:r><w:t>A</w:t><w:tab/><w:t xml:space="preserve">B &amp; C</w:t><w:br/><w:t>D</w:t></w:r></w:p>"#;
        let paragraphs = body_paragraphs(&document_xml(body)).unwrap();
        assert_eq!(paragraphs, vec!["A\tB & C\nD".to_string()]);
    }

    #[test]
    fn tables_are_not_body_paragraphs() {
        let body = "<w:p><w:r><w:t>До</w:t></w:r></w:p>\
                    <w:tbl><w:tr><w:tc><w:p><w:r><w:t>Комірка</w:t></w:r></w:p></w:tc></w:tr></w:tbl>\
                    <w:p><w:r><w:t>Після</w:t></w:r></w:p>";
        let paragraphs = body_paragraphs(&document_xml(body)).unwrap();
        assert_eq!(paragraphs, vec!["До".to_string(), "Після".to_string()]);
    }

    #[test]
    fn content_controls_are_not_body_paragraphs() {
        let body = "<w:p><w:r><w:t>До</w:t></w:r></w:p>\
                    <w:sdt><w:sdtPr/><w:sdtContent><w:p><w:r><w:t>Поле</w:t></w:r></w:p></w:sdtContent></w:sdt>\
                    <w:p><w:r><w:t>Після</w:t></w:r><w:sdt><w:sdtContent><w:r><w:t>!</w:t></w:r></w:sdtContent></w:sdt></w:p>";
        let paragraphs = body_paragraphs(&document_xml(body)).unwrap();
        assert_eq!(paragraphs, vec!["До".to_string(), "Після".to_string()]);
    }

    #[test]
    fn not_a_zip_is_extraction_error() {
        let err = extract_docx(b"plain text").unwrap_err();
        assert!(matches!(err, TermlintError::Extraction { format: "docx", .. }));
    }

    #[test]
    fn zip_without_document_part_is_extraction_error() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("other.xml", zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"<x/>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        assert!(matches!(
            extract_docx(&bytes).unwrap_err(),
            TermlintError::Extraction { .. }
        ));
    }
}
