use crate::error::IngestError;
use lopdf::Document;
use std::path::Path;

pub trait PdfExtractor {
    fn extract_text(&self, path: &Path) -> Result<String, IngestError>;
}

#[derive(Default)]
pub struct LopdfExtractor;

impl PdfExtractor for LopdfExtractor {
    fn extract_text(&self, path: &Path) -> Result<String, IngestError> {
        let document =
            Document::load(path).map_err(|error| IngestError::ExtractionFailed(error.to_string()))?;

        let mut text = String::new();
        for (page_no, _page_id) in document.get_pages() {
            let page_text = document
                .extract_text(&[page_no])
                .map_err(|error| IngestError::ExtractionFailed(error.to_string()))?;

            if !page_text.trim().is_empty() {
                if !text.is_empty() {
                    text.push('\n');
                }
                text.push_str(&page_text);
            }
        }

        // Image-only scans parse fine but carry no text layer.
        if text.trim().is_empty() {
            return Err(IngestError::ExtractionFailed(format!(
                "pdf had no readable text: {}",
                path.display()
            )));
        }

        Ok(text)
    }
}
