//! Citation-marker detection shared by the dataset ETL and the live
//! sentence filter
//!
//! Matches bracketed numeric citation groups with optional ranges and
//! comma-separated lists (`[1]`, `[1-3]`, `[1, 3]`, `[1, 3-5]`), optionally
//! surrounded by spaces, plus the `<TAG:identifier>` form used for
//! non-numeric citation keys. Both paths must agree on this pattern, so it
//! lives in exactly one place.

use once_cell::sync::Lazy;
use regex::Regex;

static CITATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r" ?(?:\[\d+(?:-\d+|(?:, ?\d+(?:-\d+)?)*)+\]|<[A-Z]+:[a-zA-Z0-9._:/-]*>) ?")
        .expect("invalid citation regex")
});

/// Check whether a sentence contains an explicit citation marker
pub fn contains_citation(sentence: &str) -> bool {
    CITATION_RE.is_match(sentence)
}

/// Remove all citation markers from a piece of text
pub fn strip_citations(text: &str) -> String {
    CITATION_RE.replace_all(text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_numeric_marker_forms() {
        assert!(contains_citation("Deep models [1] work well."));
        assert!(contains_citation("Earlier studies [1-3] agree."));
        assert!(contains_citation("Related work [1, 3] differs."));
        assert!(contains_citation("Surveys [1, 3-5] cover this."));
        assert!(contains_citation("See[2]here."));
    }

    #[test]
    fn matches_tagged_marker_form() {
        assert!(contains_citation(
            "Fixed-parameter tractability <GC:and.downey.fellows> is known."
        ));
        assert!(contains_citation("A result <REF:smith.2019/v2> holds."));
    }

    #[test]
    fn ignores_non_citation_brackets() {
        assert!(!contains_citation("Neural networks are powerful tools."));
        assert!(!contains_citation("The interval [a, b] is closed."));
        assert!(!contains_citation("Set membership x < y holds."));
    }

    #[test]
    fn strips_markers() {
        assert_eq!(
            strip_citations("Deep models [1] work well."),
            "Deep modelswork well."
        );
        assert_eq!(
            strip_citations("Results <GC:doe.2020> were confirmed [2, 4-6] later."),
            "Resultswere confirmedlater."
        );
    }

    #[test]
    fn strip_is_idempotent() {
        let sentences = [
            "Deep models [1] work well.",
            "Earlier studies [1-3] and surveys [2, 4-6] agree.",
            "A known result <GC:and.downey.fellows> applies here.",
            "No markers in this sentence at all.",
        ];

        for sentence in sentences {
            let once = strip_citations(sentence);
            let twice = strip_citations(&once);
            assert_eq!(once, twice, "stripping must be idempotent: {sentence}");
        }
    }
}
