//! Listwise LLM reranker over an OpenAI-compatible chat completions API
//!
//! The model receives the query and the numbered candidate set in one
//! prompt and answers with a ranked permutation like `[3] > [1] > [5]`.
//! Identifiers outside the candidate range and repeats are dropped, and
//! the result is capped at `top_n`. An answer ranking nothing is a valid
//! empty result.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::RerankerConfig;
use crate::error::{Error, Result};
use crate::providers::reranker::Reranker;
use crate::types::CandidatePaper;

static RANK_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(\d+)\]").expect("invalid ranking regex"));

/// LLM reranker client
pub struct RankLlmReranker {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl RankLlmReranker {
    /// Create a new reranker. Fails when the API key is empty; callers
    /// must fix the environment before retrying.
    pub fn new(config: &RerankerConfig, api_key: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(Error::Config(format!(
                "{} is not set",
                config.api_key_env
            )));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    /// Create a reranker with the API key taken from the configured
    /// environment variable, validated once at startup.
    pub fn from_env(config: &RerankerConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).unwrap_or_default();
        Self::new(config, api_key)
    }

    fn build_prompt(query: &str, candidates: &[CandidatePaper], top_n: usize) -> String {
        let mut prompt = format!(
            "I will provide you with {} passages, each indicated by a numerical identifier [].\n\
             Rank the passages by how relevant they are to the search query.\n\n\
             Search query: {}\n\n",
            candidates.len(),
            query
        );

        for (i, candidate) in candidates.iter().enumerate() {
            prompt.push_str(&format!("[{}] {}\n\n", i + 1, candidate.content));
        }

        prompt.push_str(&format!(
            "List only the passages that are relevant to the query, at most {}, \
             most relevant first, in the format [2] > [1] > [4]. \
             Answer with the ranking only. If no passage is relevant, answer \"none\".",
            top_n
        ));

        prompt
    }
}

/// Parse a ranked permutation answer into zero-based candidate indices.
///
/// Out-of-range identifiers and repeats are discarded; order of the
/// remaining identifiers is preserved.
fn parse_ranking(answer: &str, candidate_count: usize) -> Vec<usize> {
    let mut seen = vec![false; candidate_count];
    let mut indices = Vec::new();

    for capture in RANK_ID_RE.captures_iter(answer) {
        let Ok(number) = capture[1].parse::<usize>() else {
            continue;
        };
        if number == 0 || number > candidate_count {
            continue;
        }
        let index = number - 1;
        if !seen[index] {
            seen[index] = true;
            indices.push(index);
        }
    }

    indices
}

#[derive(serde::Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(serde::Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(serde::Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(serde::Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(serde::Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[async_trait]
impl Reranker for RankLlmReranker {
    async fn rerank(
        &self,
        query: &str,
        candidates: &[CandidatePaper],
        top_n: usize,
    ) -> Result<Vec<CandidatePaper>> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: Self::build_prompt(query, candidates, top_n),
            }],
            temperature: 0.0,
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Reranker(format!("rerank request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Reranker(format!(
                "reranking failed ({}): {}",
                status, body
            )));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Reranker(format!("failed to parse rerank response: {}", e)))?;

        let answer = chat
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::Reranker("no answer in rerank response".to_string()))?;

        let ranking = parse_ranking(&answer, candidates.len());

        Ok(ranking
            .into_iter()
            .take(top_n)
            .map(|i| candidates[i].clone())
            .collect())
    }

    fn name(&self) -> &str {
        "rank-llm"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(title: &str) -> CandidatePaper {
        CandidatePaper {
            id: title.to_lowercase(),
            title: title.to_string(),
            content: format!("{}\n\nAbstract of {}", title, title),
        }
    }

    #[test]
    fn parses_ranked_permutation() {
        assert_eq!(parse_ranking("[2] > [1] > [3]", 3), vec![1, 0, 2]);
    }

    #[test]
    fn drops_repeats_and_out_of_range_identifiers() {
        assert_eq!(parse_ranking("[2] > [9] > [2] > [1] > [0]", 3), vec![1, 0]);
    }

    #[test]
    fn empty_ranking_is_valid() {
        assert!(parse_ranking("none", 5).is_empty());
        assert!(parse_ranking("", 5).is_empty());
    }

    #[test]
    fn prompt_numbers_candidates_from_one() {
        let candidates = vec![candidate("First"), candidate("Second")];
        let prompt = RankLlmReranker::build_prompt("some query", &candidates, 5);

        assert!(prompt.contains("[1] First"));
        assert!(prompt.contains("[2] Second"));
        assert!(prompt.contains("some query"));
    }

    #[test]
    fn empty_api_key_fails_construction() {
        let config = RerankerConfig::default();
        assert!(matches!(
            RankLlmReranker::new(&config, String::new()),
            Err(Error::Config(_))
        ));
    }
}
