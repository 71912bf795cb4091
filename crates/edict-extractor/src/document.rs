//! Document text extraction

use crate::error::ExtractionError;
use tracing::{debug, warn};

/// Separator placed between consecutive pages
pub const PAGE_SEPARATOR: &str = "\n";

/// Converts raw document bytes to plain text
///
/// Implementations are pure transforms. A successful result is never empty
/// or whitespace-only.
pub trait DocumentExtractor: Send + Sync + 'static {
    /// Extract the whole document as one string, page order preserved
    fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractionError>;
}

/// PDF extractor backed by lopdf
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    /// Create a new extractor
    pub fn new() -> Self {
        Self
    }
}

impl DocumentExtractor for PdfTextExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let document = lopdf::Document::load_mem(bytes)
            .map_err(|e| ExtractionError::InvalidDocument(e.to_string()))?;

        let pages = document.get_pages();
        let mut page_texts = Vec::with_capacity(pages.len());

        // BTreeMap keys are page numbers, so iteration follows page order
        for page_number in pages.keys() {
            match document.extract_text(&[*page_number]) {
                Ok(text) => page_texts.push(text),
                Err(e) => warn!("Could not extract text from page {}: {}", page_number, e),
            }
        }

        let text = page_texts.join(PAGE_SEPARATOR);
        let text = text.trim();
        if text.is_empty() {
            return Err(ExtractionError::NoText { pages: pages.len() });
        }

        debug!(
            "Extracted {} characters from {} pages",
            text.chars().count(),
            pages.len()
        );
        Ok(text.to_string())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    /// Build a PDF with one page per entry; empty entries become blank pages
    pub(crate) fn pdf_with_pages(page_texts: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in page_texts {
            let operations = if text.is_empty() {
                Vec::new()
            } else {
                vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ]
            };
            let content = Content { operations };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_texts.len() as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_extracts_pages_in_order() {
        let bytes = pdf_with_pages(&["Primeira pagina", "Segunda pagina"]);

        let text = PdfTextExtractor::new().extract_text(&bytes).unwrap();
        let first = text.find("Primeira").unwrap();
        let second = text.find("Segunda").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_blank_pages_are_no_text() {
        let bytes = pdf_with_pages(&["", ""]);

        let err = PdfTextExtractor::new().extract_text(&bytes).unwrap_err();
        assert_eq!(err, ExtractionError::NoText { pages: 2 });
    }

    #[test]
    fn test_garbage_is_invalid_document() {
        let err = PdfTextExtractor::new()
            .extract_text(b"definitely not a pdf")
            .unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidDocument(_)));
    }

    #[test]
    fn test_result_is_trimmed() {
        let bytes = pdf_with_pages(&["Edital 01/2025"]);

        let text = PdfTextExtractor::new().extract_text(&bytes).unwrap();
        assert_eq!(text, text.trim());
        assert!(text.contains("Edital 01/2025"));
    }
}
