//! HTTP client for the congruence service.
//!
//! [`EvaluationClient::rank`] scores a batch of identified candidate texts (for example,
//! decryption attempts) one request at a time and keeps the best ones. [`caesar`] builds those
//! attempts for a Caesar-shifted ciphertext.

pub mod caesar;
pub mod error;
pub mod ranking;

#[cfg(test)]
mod tests;

use std::time::Duration;

use tracing::{debug, warn};

pub use caesar::shift_candidates;
pub use error::ClientError;
pub use ranking::{
    Candidate, DEFAULT_TOP_N, FailedEvaluation, RankedCandidate, RankingReport, rank_by_score,
};

use crate::gateway::EvaluateRequest;
use crate::gateway::error::ErrorResponse;
use crate::scoring::ScoreResult;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct EvaluationClient {
    client: reqwest::Client,
    base_url: String,
}

impl EvaluationClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Client for a service on this machine at [`DEFAULT_BASE_URL`].
    pub fn local() -> Result<Self, ClientError> {
        Self::new(DEFAULT_BASE_URL)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }

    /// Scores a single text.
    pub async fn evaluate(&self, text: &str) -> Result<ScoreResult, ClientError> {
        let request = EvaluateRequest {
            text: text.to_string(),
        };

        let resp = self
            .client
            .post(self.url("/evaluate"))
            .json(&request)
            .send()
            .await?;

        let status = resp.status().as_u16();
        match status {
            200 => {
                let body = resp.text().await?;
                serde_json::from_str(&body).map_err(|e| ClientError::MalformedResponse {
                    reason: e.to_string(),
                    body: truncate_body(&body),
                })
            }
            400 => Err(ClientError::BadRequest(error_message(resp).await)),
            503 => Err(ClientError::ModelUnavailable),
            status => {
                let body = resp.text().await.unwrap_or_default();
                Err(ClientError::UnexpectedStatus(status, truncate_body(&body)))
            }
        }
    }

    /// Scores every candidate and returns the `top_n` best.
    ///
    /// Candidates whose evaluation fails are logged, listed in
    /// [`RankingReport::failed`] and left out of the ranking.
    pub async fn rank(&self, candidates: &[Candidate], top_n: usize) -> RankingReport {
        let mut scored = Vec::with_capacity(candidates.len());
        let mut failed = Vec::new();

        for candidate in candidates {
            match self.evaluate(&candidate.text).await {
                Ok(result) => {
                    debug!(
                        identifier = %candidate.identifier,
                        score = result.congruence_score,
                        "Candidate evaluated"
                    );
                    scored.push(RankedCandidate::new(candidate, &result));
                }
                Err(e) => {
                    warn!(
                        identifier = %candidate.identifier,
                        error = %e,
                        "Candidate evaluation failed, skipping"
                    );
                    failed.push(FailedEvaluation {
                        identifier: candidate.identifier.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        RankingReport {
            total: candidates.len(),
            ranked: rank_by_score(scored, top_n),
            failed,
        }
    }
}

async fn error_message(resp: reqwest::Response) -> String {
    let body = resp.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(err) => err.error,
        Err(_) => truncate_body(&body),
    }
}

const MAX_BODY_PREVIEW: usize = 80;

fn truncate_body(body: &str) -> String {
    if body.chars().count() > MAX_BODY_PREVIEW {
        let head: String = body.chars().take(MAX_BODY_PREVIEW).collect();
        format!("{head}...")
    } else {
        body.to_string()
    }
}
