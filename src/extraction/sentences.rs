//! Sentence splitting

use unicode_segmentation::UnicodeSegmentation;

/// Split plain text into an ordered sequence of trimmed sentences,
/// dropping empty fragments.
pub fn split_into_sentences(text: &str) -> Vec<String> {
    text.split_sentence_bounds()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_sentence_boundaries() {
        let sentences = split_into_sentences(
            "Deep learning models [1] achieve high accuracy. Neural networks are powerful tools.",
        );
        assert_eq!(
            sentences,
            vec![
                "Deep learning models [1] achieve high accuracy.",
                "Neural networks are powerful tools.",
            ]
        );
    }

    #[test]
    fn empty_text_yields_no_sentences() {
        assert!(split_into_sentences("").is_empty());
        assert!(split_into_sentences("   ").is_empty());
    }

    #[test]
    fn preserves_order() {
        let sentences = split_into_sentences("First one. Second one. Third one.");
        assert_eq!(sentences.len(), 3);
        assert!(sentences[0].starts_with("First"));
        assert!(sentences[2].starts_with("Third"));
    }
}
