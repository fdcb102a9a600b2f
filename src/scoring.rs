//! Ease-of-implementation scoring for GitHub issues.
//!
//! One LLM call per issue with a fixed rubric. Replies are validated: a
//! non-numeric reply is an error the caller reports, and out-of-range values
//! are clamped into the rubric's scale.

use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use crate::llm::{ChatMessage, LlmClient, Role};

/// The rubric scale: 1 (difficult) to 5 (easy).
pub const MIN_SCORE: i64 = 1;
pub const MAX_SCORE: i64 = 5;

const RUBRIC_PROMPT: &str = "Please score the ease of implementation of this issue. \
Higher scores indicate easier implementation. \
Use the following scale: 1 (difficult) to 5 (easy). Respond with a single number.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoreError {
    #[error("Scoring reply was not a number: {0:?}")]
    NotANumber(String),
}

/// Scores issues via a fixed rubric prompt.
pub struct IssueScorer {
    llm: Arc<dyn LlmClient>,
    model: String,
}

impl IssueScorer {
    pub fn new(llm: Arc<dyn LlmClient>, model: String) -> Self {
        Self { llm, model }
    }

    /// Score each issue body in turn, one LLM call per issue.
    pub async fn score(&self, issues: &[String]) -> anyhow::Result<Vec<i64>> {
        let mut scores = Vec::with_capacity(issues.len());
        for issue in issues {
            let messages = [
                ChatMessage::text(Role::System, RUBRIC_PROMPT),
                ChatMessage::text(Role::User, issue.clone()),
            ];
            let reply = self.llm.complete(&self.model, &messages).await?;
            scores.push(parse_score(&reply)?);
        }
        Ok(scores)
    }
}

/// Parse a scoring reply into an integer in `[MIN_SCORE, MAX_SCORE]`.
///
/// The first whitespace-separated token must be an integer; anything else is
/// a `ScoreError::NotANumber`. Out-of-range integers are clamped to the
/// nearest bound.
pub fn parse_score(reply: &str) -> Result<i64, ScoreError> {
    let token = reply
        .split_whitespace()
        .next()
        .ok_or_else(|| ScoreError::NotANumber(reply.to_string()))?;
    let value: i64 = token
        .trim_matches(|c: char| !c.is_ascii_digit() && c != '-')
        .parse()
        .map_err(|_| ScoreError::NotANumber(reply.to_string()))?;

    if !(MIN_SCORE..=MAX_SCORE).contains(&value) {
        warn!(score = value, "Score outside 1-5 scale; clamping");
        return Ok(value.clamp(MIN_SCORE, MAX_SCORE));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_integers_round_trip() {
        for n in MIN_SCORE..=MAX_SCORE {
            assert_eq!(parse_score(&n.to_string()).unwrap(), n);
        }
    }

    #[test]
    fn tolerates_surrounding_whitespace_and_punctuation() {
        assert_eq!(parse_score("  3  ").unwrap(), 3);
        assert_eq!(parse_score("4.").unwrap(), 4);
        assert_eq!(parse_score("5\n").unwrap(), 5);
    }

    #[test]
    fn out_of_range_clamps() {
        assert_eq!(parse_score("9").unwrap(), 5);
        assert_eq!(parse_score("0").unwrap(), 1);
        assert_eq!(parse_score("-2").unwrap(), 1);
    }

    #[test]
    fn non_numeric_is_an_error() {
        assert!(matches!(
            parse_score("probably a three"),
            Err(ScoreError::NotANumber(_))
        ));
        assert!(matches!(parse_score(""), Err(ScoreError::NotANumber(_))));
    }
}
