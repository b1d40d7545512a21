use axum::{extract::Path, extract::Query, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

use review_core::{find_deviation, pgn};

use crate::book_cache::BOOK_CACHE;
use crate::clients::lichess::{GameSummary, LichessClient};
use crate::error::AppError;

const DEFAULT_MAX_GAMES: usize = 50;
const MAX_GAMES_CAP: usize = 200;

#[derive(Deserialize)]
pub struct PlayerGamesQuery {
    pub max: Option<usize>,
}

/// Aggregate record for one player's fetched games.
#[derive(Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub total: usize,
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
    pub white_games: usize,
    pub white_wins: usize,
    pub white_win_percentage: u32,
    pub black_games: usize,
    pub black_wins: usize,
    pub black_win_percentage: u32,
    pub most_played_opening: OpeningCount,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningCount {
    pub eco: String,
    pub name: String,
    pub count: usize,
}

impl Default for OpeningCount {
    fn default() -> Self {
        Self {
            eco: "Unknown".to_string(),
            name: "Unknown Opening".to_string(),
            count: 0,
        }
    }
}

/// GET /api/players/{username}/games
pub async fn get_player_games(
    Path(username): Path<String>,
    Query(q): Query<PlayerGamesQuery>,
) -> Result<Json<JsonValue>, AppError> {
    let username = username.trim().to_string();
    if username.is_empty() {
        return Err(AppError::BadRequest("Username is required".into()));
    }

    let max = q.max.unwrap_or(DEFAULT_MAX_GAMES).min(MAX_GAMES_CAP);

    let client = LichessClient::new();
    let games = client
        .fetch_user_games(&username, max)
        .await
        .map_err(map_provider_error)?;

    let stats = player_stats(&games);

    Ok(Json(json!({
        "username": username,
        "games": games,
        "stats": stats,
    })))
}

/// GET /api/games/{game_id}
pub async fn get_game_detail(Path(game_id): Path<String>) -> Result<Json<JsonValue>, AppError> {
    let client = LichessClient::new();
    let detail = client
        .fetch_game(&game_id)
        .await
        .map_err(map_provider_error)?;

    // The provider usually ships the move list; fall back to tokenizing
    // its transcript when it doesn't.
    let moves = if detail.moves.is_empty() {
        pgn::tokenize(&detail.pgn)
    } else {
        detail.moves.clone()
    };

    let deviation = find_deviation(&BOOK_CACHE, &moves);

    let mut body = serde_json::to_value(&detail).map_err(anyhow::Error::from)?;
    body["openingDeviation"] = serde_json::to_value(deviation).map_err(anyhow::Error::from)?;

    Ok(Json(body))
}

fn map_provider_error(e: String) -> AppError {
    if e.contains("not found") || e.contains("Not found") {
        AppError::NotFound(e)
    } else {
        AppError::Upstream(e)
    }
}

/// Win/loss/draw totals, per-color win rates and the most played opening.
pub fn player_stats(games: &[GameSummary]) -> PlayerStats {
    let mut stats = PlayerStats {
        total: games.len(),
        ..Default::default()
    };

    let mut opening_counts: std::collections::HashMap<(String, String), usize> =
        std::collections::HashMap::new();

    for game in games {
        match game.result.as_str() {
            "win" => stats.wins += 1,
            "loss" => stats.losses += 1,
            _ => stats.draws += 1,
        }

        if game.color == "white" {
            stats.white_games += 1;
            if game.result == "win" {
                stats.white_wins += 1;
            }
        } else {
            stats.black_games += 1;
            if game.result == "win" {
                stats.black_wins += 1;
            }
        }

        *opening_counts
            .entry((game.opening_eco.clone(), game.opening_name.clone()))
            .or_default() += 1;
    }

    stats.white_win_percentage = win_percentage(stats.white_wins, stats.white_games);
    stats.black_win_percentage = win_percentage(stats.black_wins, stats.black_games);

    // Ties broken by ECO code so the result is deterministic.
    if let Some(((eco, name), count)) = opening_counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0 .0.cmp(&a.0 .0)))
    {
        stats.most_played_opening = OpeningCount { eco, name, count };
    }

    stats
}

fn win_percentage(wins: usize, games: usize) -> u32 {
    if games == 0 {
        return 0;
    }
    ((wins as f64 / games as f64) * 100.0).round() as u32
}
