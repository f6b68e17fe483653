//! Fixed-size chunking of paper bodies
//!
//! Chunks exist only to bound embedding-model input length; the canonical
//! retrievable unit stays the paper. Windows are measured in characters
//! and respect UTF-8 boundaries.

use crate::error::{Error, Result};

/// A windowed fragment of a paper body
#[derive(Debug, Clone, PartialEq)]
pub struct TextChunk {
    /// Fragment text
    pub content: String,
    /// Start offset within the source text, in characters
    pub start_offset: usize,
}

/// Sliding-window chunker with fixed size and overlap
#[derive(Debug, Clone)]
pub struct Chunker {
    chunk_size: usize,
    overlap: usize,
}

impl Chunker {
    /// Create a chunker. The overlap must be smaller than the chunk size.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 || overlap >= chunk_size {
            return Err(Error::Config(format!(
                "invalid chunking: size {} with overlap {}",
                chunk_size, overlap
            )));
        }
        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    /// Split text into overlapping windows, each tracking its start
    /// offset in characters.
    pub fn split(&self, text: &str) -> Vec<TextChunk> {
        if text.is_empty() {
            return Vec::new();
        }

        let byte_offsets: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        let total_chars = byte_offsets.len();
        let step = self.chunk_size - self.overlap;

        let mut chunks = Vec::new();
        let mut start = 0;

        loop {
            let end = (start + self.chunk_size).min(total_chars);
            let byte_start = byte_offsets[start];
            let byte_end = if end == total_chars {
                text.len()
            } else {
                byte_offsets[end]
            };

            chunks.push(TextChunk {
                content: text[byte_start..byte_end].to_string(),
                start_offset: start,
            });

            if end == total_chars {
                break;
            }
            start += step;
        }

        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_a_single_chunk() {
        let chunker = Chunker::new(300, 100).unwrap();
        let chunks = chunker.split("A short abstract.");

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "A short abstract.");
        assert_eq!(chunks[0].start_offset, 0);
    }

    #[test]
    fn windows_overlap_and_track_offsets() {
        let chunker = Chunker::new(10, 4).unwrap();
        let text = "abcdefghijklmnopqrstuvwxyz";
        let chunks = chunker.split(text);

        assert_eq!(chunks[0].content, "abcdefghij");
        assert_eq!(chunks[0].start_offset, 0);
        assert_eq!(chunks[1].content, "ghijklmnop");
        assert_eq!(chunks[1].start_offset, 6);

        // Consecutive windows share exactly the configured overlap
        assert!(chunks[0].content.ends_with("ghij"));
        assert!(chunks[1].content.starts_with("ghij"));

        // The final chunk reaches the end of the text
        assert!(chunks.last().unwrap().content.ends_with('z'));
    }

    #[test]
    fn respects_multibyte_boundaries() {
        let chunker = Chunker::new(5, 2).unwrap();
        let text = "αβγδεζηθικλμ";
        let chunks = chunker.split(text);

        assert_eq!(chunks[0].content.chars().count(), 5);
        let rebuilt: String = chunks
            .iter()
            .flat_map(|c| c.content.chars())
            .collect();
        assert!(rebuilt.contains('μ'));
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        let chunker = Chunker::new(300, 100).unwrap();
        assert!(chunker.split("").is_empty());
    }

    #[test]
    fn rejects_overlap_not_smaller_than_size() {
        assert!(Chunker::new(100, 100).is_err());
        assert!(Chunker::new(0, 0).is_err());
    }
}
