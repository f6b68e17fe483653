//! Per-sentence pipeline state
//!
//! Each citing sentence flows through a strictly linear two-step machine:
//! Start → Retrieved → Reordered. Steps validate the stage they enter in
//! and advance it, so an out-of-order invocation surfaces as an internal
//! error instead of silently producing garbage.

use crate::error::{Error, Result};
use crate::types::CandidatePaper;

/// Pipeline stage of one sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Nothing has run yet
    Start,
    /// Candidate papers retrieved from the index
    Retrieved,
    /// Final recommendation list produced
    Reordered,
}

/// State threaded through the two-step pipeline of one sentence
#[derive(Debug, Clone)]
pub struct RetrievalState {
    stage: Stage,
    /// The citing sentence under consideration
    pub sentence: String,
    /// Instruction-prefixed query used for embedding and reranking
    pub query: String,
    /// Candidates produced by the retrieve step
    pub retrieved: Vec<CandidatePaper>,
    /// Ordered recommendation titles produced by the reorder step
    pub reordered: Vec<String>,
}

impl RetrievalState {
    /// Create the initial state for a sentence
    pub fn new(sentence: String, query: String) -> Self {
        Self {
            stage: Stage::Start,
            sentence,
            query,
            retrieved: Vec::new(),
            reordered: Vec::new(),
        }
    }

    /// Current stage
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Fail unless the state is in the stage a step expects to enter in
    pub(crate) fn expect_stage(&self, expected: Stage, step: &str) -> Result<()> {
        if self.stage != expected {
            return Err(Error::Internal(format!(
                "step {} entered in stage {:?}, expected {:?}",
                step, self.stage, expected
            )));
        }
        Ok(())
    }

    /// Advance Start → Retrieved with the retrieved candidate set
    pub(crate) fn into_retrieved(mut self, candidates: Vec<CandidatePaper>) -> Self {
        self.stage = Stage::Retrieved;
        self.retrieved = candidates;
        self
    }

    /// Advance Retrieved → Reordered with the final titles
    pub(crate) fn into_reordered(mut self, titles: Vec<String>) -> Self {
        self.stage = Stage::Reordered;
        self.reordered = titles;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_start() {
        let state = RetrievalState::new("a sentence".into(), "a query".into());
        assert_eq!(state.stage(), Stage::Start);
        assert!(state.retrieved.is_empty());
        assert!(state.reordered.is_empty());
    }

    #[test]
    fn advances_linearly() {
        let state = RetrievalState::new("s".into(), "q".into());
        let state = state.into_retrieved(Vec::new());
        assert_eq!(state.stage(), Stage::Retrieved);
        let state = state.into_reordered(Vec::new());
        assert_eq!(state.stage(), Stage::Reordered);
    }

    #[test]
    fn stage_mismatch_is_an_internal_error() {
        let state = RetrievalState::new("s".into(), "q".into());
        assert!(state.expect_stage(Stage::Start, "retrieve").is_ok());
        let err = state.expect_stage(Stage::Retrieved, "reorder").unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
    }
}
