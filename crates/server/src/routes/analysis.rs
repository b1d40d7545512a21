use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use review_core::{classify, find_deviation, pgn};

use crate::book_cache::BOOK_CACHE;
use crate::clients::evaluator::{self, EvaluatorClient};
use crate::config::Config;
use crate::error::AppError;

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub pgn: Option<String>,
}

/// POST /api/analyze
///
/// Tokenizes the transcript, finds the opening deviation, obtains a per-ply
/// evaluation series from the remote evaluator — substituting a synthetic
/// series when it is unreachable — and returns the quality report.
pub async fn analyze_game(
    Extension(config): Extension<Config>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<JsonValue>, AppError> {
    let transcript = req.pgn.unwrap_or_default();
    if transcript.trim().is_empty() {
        return Err(AppError::BadRequest("PGN is required".into()));
    }

    let moves = pgn::tokenize(&transcript);
    let deviation = find_deviation(&BOOK_CACHE, &moves);

    let evaluator = EvaluatorClient::new(&config.evaluator_url, config.evaluator_timeout_secs);
    let (evaluations, source) = match evaluator.evaluate(&transcript).await {
        Ok(evaluations) => (evaluations, "engine"),
        Err(e) => {
            tracing::warn!("Evaluator unavailable, substituting synthetic series: {e}");
            let mut rng = rand::thread_rng();
            (
                evaluator::synthetic_evaluations(&mut rng, moves.len()),
                "synthetic",
            )
        }
    };

    let report = classify(&moves, &evaluations, deviation.as_ref());

    let mut body = serde_json::to_value(&report).map_err(anyhow::Error::from)?;
    body["openingDeviation"] = serde_json::to_value(&deviation).map_err(anyhow::Error::from)?;
    body["evaluationSource"] = JsonValue::String(source.to_string());
    body["plies"] = JsonValue::from(moves.len());
    body["white"] = opt_header(&transcript, "White");
    body["black"] = opt_header(&transcript, "Black");
    body["eco"] = opt_header(&transcript, "ECO");

    Ok(Json(body))
}

fn opt_header(transcript: &str, name: &str) -> JsonValue {
    match pgn::extract_header(transcript, name) {
        Some(v) => JsonValue::String(v),
        None => JsonValue::Null,
    }
}
