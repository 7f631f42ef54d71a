use std::fmt;

use serde::{Deserialize, Serialize};

use crate::scoring::ScoreResult;

/// Number of candidates kept when no other bound is given.
pub const DEFAULT_TOP_N: usize = 3;

const PREVIEW_CHARS: usize = 50;

/// A text to score, tagged with the caller's identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub identifier: String,
    pub text: String,
}

impl Candidate {
    pub fn new(identifier: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub identifier: String,
    pub text: String,
    pub congruence_score: f64,
    pub computed_perplexity: f64,
}

impl RankedCandidate {
    pub fn new(candidate: &Candidate, result: &ScoreResult) -> Self {
        Self {
            identifier: candidate.identifier.clone(),
            text: candidate.text.clone(),
            congruence_score: result.congruence_score,
            computed_perplexity: result.computed_perplexity,
        }
    }

    /// First characters of the text, ellipsized.
    pub fn preview(&self) -> String {
        if self.text.chars().count() > PREVIEW_CHARS {
            let head: String = self.text.chars().take(PREVIEW_CHARS).collect();
            format!("{head}...")
        } else {
            self.text.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedEvaluation {
    pub identifier: String,
    pub error: String,
}

/// Outcome of ranking a batch of candidates.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RankingReport {
    /// Best candidates, highest score first.
    pub ranked: Vec<RankedCandidate>,
    pub failed: Vec<FailedEvaluation>,
    /// Number of candidates submitted.
    pub total: usize,
}

impl RankingReport {
    pub fn best(&self) -> Option<&RankedCandidate> {
        self.ranked.first()
    }
}

impl fmt::Display for RankingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total == 0 {
            return writeln!(f, "No candidates submitted.");
        }
        if self.ranked.is_empty() {
            return writeln!(f, "No candidate could be evaluated ({} failed).", self.failed.len());
        }

        writeln!(f, "Top {} congruence scores:", self.ranked.len())?;
        for (rank, candidate) in self.ranked.iter().enumerate() {
            writeln!(
                f,
                "  {}. [{}] score {:.2}: \"{}\"",
                rank + 1,
                candidate.identifier,
                candidate.congruence_score,
                candidate.preview()
            )?;
        }
        if !self.failed.is_empty() {
            writeln!(f, "  ({} candidates failed to evaluate)", self.failed.len())?;
        }
        Ok(())
    }
}

/// Sorts by descending score, keeping submission order among ties, and keeps `top_n`.
pub fn rank_by_score(mut scored: Vec<RankedCandidate>, top_n: usize) -> Vec<RankedCandidate> {
    scored.sort_by(|a, b| b.congruence_score.total_cmp(&a.congruence_score));
    scored.truncate(top_n);
    scored
}
