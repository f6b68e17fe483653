//! PDF text extraction

use std::path::Path;

use crate::error::{Error, Result};

use super::{apply_options, ExtractOptions, TextExtractor};

/// Extracts plain text from PDF manuscripts.
///
/// Hyphenated line breaks are rejoined and line wraps collapsed to spaces
/// before sectioning, so sentence splitting downstream operates on flowing
/// text rather than on PDF layout lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    /// Create a new PDF extractor
    pub fn new() -> Self {
        Self
    }

    /// Rejoin words split across line breaks and collapse layout newlines
    fn reflow(text: &str) -> String {
        let rejoined = text.replace("-\n", "");
        rejoined.replace('\n', " ")
    }
}

impl TextExtractor for PdfExtractor {
    fn extract(&self, path: &Path, options: &ExtractOptions) -> Result<String> {
        let raw = pdf_extract::extract_text(path)
            .map_err(|e| Error::Extraction(format!("failed to read {}: {}", path.display(), e)))?;

        apply_options(&Self::reflow(&raw), options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflow_rejoins_hyphenated_words() {
        let text = "transfor-\nmer models gen-\neralize";
        assert_eq!(PdfExtractor::reflow(text), "transformer models generalize");
    }

    #[test]
    fn reflow_collapses_line_wraps() {
        let text = "one line\nanother line";
        assert_eq!(PdfExtractor::reflow(text), "one line another line");
    }
}
