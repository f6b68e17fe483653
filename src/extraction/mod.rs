//! Manuscript text extraction
//!
//! The extractor is a narrow collaborator: it turns a file into cleaned
//! plain text, optionally dropping the abstract and reference sections and
//! stripping inline citation markers.

pub mod pdf;
pub mod sentences;

use std::path::Path;

use crate::citation::strip_citations;
use crate::error::{Error, Result};

pub use pdf::PdfExtractor;
pub use sentences::split_into_sentences;

/// Options controlling which sections and markers are removed from the
/// extracted text
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    /// Drop everything from the "References" marker onward
    pub remove_references: bool,
    /// Drop everything up to and including the "Abstract" marker.
    /// Errors when the text has no such marker.
    pub remove_abstract: bool,
    /// Strip inline citation markers ([1], [1-3], <TAG:key>, ...)
    pub remove_reference_markers: bool,
}

/// Extracts plain text from a manuscript file
pub trait TextExtractor: Send + Sync {
    /// Extract cleaned text from the file at `path`
    fn extract(&self, path: &Path, options: &ExtractOptions) -> Result<String>;
}

/// Apply section and marker removal to already-extracted text.
///
/// References removal is a no-op when the marker is absent; abstract
/// removal on text without an "Abstract" marker is caller misuse and
/// fails immediately.
pub fn apply_options(text: &str, options: &ExtractOptions) -> Result<String> {
    let mut text = text.to_string();

    if options.remove_references {
        if let Some((before, _)) = text.split_once("References") {
            text = before.to_string();
        }
    }

    if options.remove_abstract {
        let (_, after) = text.split_once("Abstract").ok_or_else(|| {
            Error::Extraction("abstract removal requested but no \"Abstract\" marker found".into())
        })?;
        text = after.to_string();
    }

    if options.remove_reference_markers {
        text = strip_citations(&text);
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAPER: &str = "Title Page\nAbstract This work studies things. \
        Introduction follows. Deep models [1] are used. \
        References [1] A. Author. Some Paper.";

    #[test]
    fn removes_reference_section() {
        let options = ExtractOptions {
            remove_references: true,
            ..Default::default()
        };
        let text = apply_options(PAPER, &options).unwrap();
        assert!(!text.contains("A. Author"));
        assert!(text.contains("Deep models"));
    }

    #[test]
    fn removes_abstract_prefix() {
        let options = ExtractOptions {
            remove_abstract: true,
            ..Default::default()
        };
        let text = apply_options(PAPER, &options).unwrap();
        assert!(!text.contains("Title Page"));
        assert!(text.starts_with(" This work studies things."));
    }

    #[test]
    fn missing_abstract_marker_is_an_error() {
        let options = ExtractOptions {
            remove_abstract: true,
            ..Default::default()
        };
        let err = apply_options("No such section here.", &options).unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
    }

    #[test]
    fn strips_markers_when_requested() {
        let options = ExtractOptions {
            remove_reference_markers: true,
            ..Default::default()
        };
        let text = apply_options("Deep models [1] are used.", &options).unwrap();
        assert_eq!(text, "Deep modelsare used.");
    }
}
