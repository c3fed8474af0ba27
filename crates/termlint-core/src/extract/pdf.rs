//! PDF text-layer extraction, one block per physical page.

use lopdf::Document;
use tracing::warn;

use crate::error::{Result, TermlintError};
use crate::types::DocumentPages;

const FORMAT: &str = "pdf";

/// Extracts the text layer of every page.
///
/// A page whose text cannot be decoded (scanned image, exotic font
/// encoding) yields an empty block so page numbering stays intact.
pub fn extract_pdf(bytes: &[u8]) -> Result<DocumentPages> {
    let document = Document::load_mem(bytes).map_err(|e| TermlintError::extraction(FORMAT, e))?;

    let pages = document
        .get_pages()
        .into_keys()
        .map(|number| match document.extract_text(&[number]) {
            Ok(text) => text,
            Err(e) => {
                warn!(page = number, error = %e, "page has no extractable text layer");
                String::new()
            }
        })
        .collect();

    Ok(DocumentPages::new(pages))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{Dictionary, Object, Stream, dictionary};

    use crate::dictionary::TermDictionary;
    use crate::matcher::RuleMatcher;
    use crate::types::TermEntry;

    fn blank_pdf(num_pages: usize) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut kids = Vec::new();
        for _ in 0..num_pages {
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => Object::Reference(pages_id),
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            });
            kids.push(Object::Reference(page_id));
        }

        let mut pages = Dictionary::new();
        pages.set("Type", Object::Name(b"Pages".to_vec()));
        pages.set("Count", num_pages as i64);
        pages.set("Kids", kids);
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }

    /// One page per entry; an empty entry gets no content stream.
    fn text_pdf(texts: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids = Vec::new();
        for text in texts {
            let mut page = dictionary! {
                "Type" => "Page",
                "Parent" => Object::Reference(pages_id),
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Resources" => resources_id,
            };
            if !text.is_empty() {
                let content = Content {
                    operations: vec![
                        Operation::new("BT", vec![]),
                        Operation::new("Tf", vec!["F1".into(), 12.into()]),
                        Operation::new("Td", vec![72.into(), 720.into()]),
                        Operation::new("Tj", vec![Object::string_literal(*text)]),
                        Operation::new("ET", vec![]),
                    ],
                };
                let content_id =
                    doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
                page.set("Contents", content_id);
            }
            kids.push(Object::Reference(doc.add_object(page)));
        }

        let mut pages = Dictionary::new();
        pages.set("Type", Object::Name(b"Pages".to_vec()));
        pages.set("Count", texts.len() as i64);
        pages.set("Kids", kids);
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }

    #[test]
    fn one_block_per_page_with_gaps_kept() {
        let bytes = text_pdf(&["The tank arrived.", "", "Old tank here"]);
        let pages = extract_pdf(&bytes).unwrap();

        assert_eq!(pages.len(), 3);
        assert_eq!(pages.pages()[0].trim(), "The tank arrived.");
        assert_eq!(pages.pages()[1], "");
        assert_eq!(pages.pages()[2].trim(), "Old tank here");
    }

    #[test]
    fn rule_hits_carry_physical_page_numbers() {
        let bytes = text_pdf(&["The tank arrived.", "", "Old tank here"]);
        let pages = extract_pdf(&bytes).unwrap();
        let dictionary = TermDictionary::new(vec![TermEntry::new("tank")]);
        let analysis = RuleMatcher::new(&dictionary).unwrap().analyze(&pages);

        let hit_pages: Vec<_> = analysis.matches.iter().map(|m| m.page).collect();
        assert_eq!(hit_pages, vec![1, 3]);
        assert!(analysis.unmatched.is_empty());
    }

    #[test]
    fn pages_without_text_are_empty_blocks() {
        let pages = extract_pdf(&blank_pdf(3)).unwrap();
        assert_eq!(pages.len(), 3);
        assert!(pages.is_blank());
    }

    #[test]
    fn garbage_is_extraction_error() {
        let err = extract_pdf(b"%PDF-not really").unwrap_err();
        assert!(matches!(err, TermlintError::Extraction { format: "pdf", .. }));
    }
}
