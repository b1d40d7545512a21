//! Lichess game-data provider client.
//!
//! Supplies per-player game lists and per-game detail; the analysis core
//! never talks to this service directly.

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

const LICHESS_API_BASE: &str = "https://lichess.org/api";

/// One game from the player's history, shaped for table display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    pub id: String,
    pub created_at: i64,
    pub opponent: String,
    pub opponent_rating: Option<i64>,
    /// Side the queried player held: "white" or "black".
    pub color: String,
    /// Outcome for the queried player: "win", "loss" or "draw".
    pub result: String,
    pub time_control: String,
    pub opening_eco: String,
    pub opening_name: String,
    pub moves: Vec<String>,
    pub pgn: String,
}

/// Full detail for one game.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDetail {
    pub id: String,
    pub created_at: i64,
    pub white: PlayerInfo,
    pub black: PlayerInfo,
    /// "1-0", "0-1" or "1/2-1/2".
    pub result: String,
    pub opening_eco: String,
    pub opening_name: String,
    pub time_control: String,
    pub moves: Vec<String>,
    pub pgn: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInfo {
    pub username: String,
    pub rating: Option<i64>,
}

pub struct LichessClient {
    client: Client,
}

impl LichessClient {
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent("ChessInsights/1.0")
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .unwrap();
        Self { client }
    }

    /// Fetch recent rated games for a user (ndjson export).
    pub async fn fetch_user_games(
        &self,
        username: &str,
        max_games: usize,
    ) -> Result<Vec<GameSummary>, String> {
        let url = format!("{LICHESS_API_BASE}/games/user/{username}");

        let params = [
            ("max", max_games.to_string()),
            ("rated", "true".to_string()),
            ("perfType", "blitz,rapid,classical".to_string()),
            ("pgnInJson", "true".to_string()),
            ("opening", "true".to_string()),
        ];

        // Rate limit
        tokio::time::sleep(std::time::Duration::from_secs(1)).await;

        let resp = self
            .client
            .get(&url)
            .query(&params)
            .header("Accept", "application/x-ndjson")
            .send()
            .await
            .map_err(|e| format!("Request error: {e}"))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err("User not found".to_string());
        }

        if !resp.status().is_success() {
            return Err(format!("HTTP {}", resp.status()));
        }

        let text = resp
            .text()
            .await
            .map_err(|e| format!("Body read error: {e}"))?;

        let mut games = Vec::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match serde_json::from_str::<Value>(line) {
                Ok(raw) => games.push(summarize_game(&raw, username)),
                Err(e) => {
                    tracing::warn!("Failed to parse Lichess game JSON: {e}");
                }
            }
        }

        Ok(games)
    }

    /// Fetch full detail for one game by id.
    pub async fn fetch_game(&self, game_id: &str) -> Result<GameDetail, String> {
        let url = format!("{LICHESS_API_BASE}/game/{game_id}");

        tokio::time::sleep(std::time::Duration::from_millis(100)).await;

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| format!("Request error: {e}"))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err("Game not found".to_string());
        }

        if !resp.status().is_success() {
            return Err(format!("HTTP {}", resp.status()));
        }

        let raw: Value = resp
            .json()
            .await
            .map_err(|e| format!("JSON parse error: {e}"))?;

        Ok(detail_from_json(&raw))
    }
}

impl Default for LichessClient {
    fn default() -> Self {
        Self::new()
    }
}

fn summarize_game(raw: &Value, username: &str) -> GameSummary {
    let user_is_white = player_name(raw, "white")
        .map(|n| n.eq_ignore_ascii_case(username))
        .unwrap_or(false);
    let (own, other) = if user_is_white {
        ("white", "black")
    } else {
        ("black", "white")
    };

    GameSummary {
        id: raw["id"].as_str().unwrap_or_default().to_string(),
        created_at: raw["createdAt"].as_i64().unwrap_or(0),
        opponent: player_name(raw, other)
            .unwrap_or("Anonymous")
            .to_string(),
        opponent_rating: raw["players"][other]["rating"].as_i64(),
        color: own.to_string(),
        result: determine_result(
            raw["status"].as_str().unwrap_or_default(),
            raw["winner"].as_str(),
            user_is_white,
        )
        .to_string(),
        time_control: time_control_bucket(raw["clock"]["initial"].as_i64()).to_string(),
        opening_eco: raw["opening"]["eco"].as_str().unwrap_or("Unknown").to_string(),
        opening_name: raw["opening"]["name"]
            .as_str()
            .unwrap_or("Unknown Opening")
            .to_string(),
        moves: split_moves(&raw["moves"]),
        pgn: raw["pgn"].as_str().unwrap_or_default().to_string(),
    }
}

fn detail_from_json(raw: &Value) -> GameDetail {
    let result = match (raw["status"].as_str(), raw["winner"].as_str()) {
        (Some("draw") | Some("stalemate"), _) => "1/2-1/2",
        (_, Some("white")) => "1-0",
        (_, Some("black")) => "0-1",
        _ => "1/2-1/2",
    };

    GameDetail {
        id: raw["id"].as_str().unwrap_or_default().to_string(),
        created_at: raw["createdAt"].as_i64().unwrap_or(0),
        white: PlayerInfo {
            username: player_name(raw, "white").unwrap_or("Anonymous").to_string(),
            rating: raw["players"]["white"]["rating"].as_i64(),
        },
        black: PlayerInfo {
            username: player_name(raw, "black").unwrap_or("Anonymous").to_string(),
            rating: raw["players"]["black"]["rating"].as_i64(),
        },
        result: result.to_string(),
        opening_eco: raw["opening"]["eco"].as_str().unwrap_or("Unknown").to_string(),
        opening_name: raw["opening"]["name"]
            .as_str()
            .unwrap_or("Unknown Opening")
            .to_string(),
        time_control: time_control_bucket(raw["clock"]["initial"].as_i64()).to_string(),
        moves: split_moves(&raw["moves"]),
        pgn: raw["pgn"].as_str().unwrap_or_default().to_string(),
    }
}

fn player_name<'a>(raw: &'a Value, side: &str) -> Option<&'a str> {
    raw["players"][side]["user"]["name"].as_str()
}

fn split_moves(value: &Value) -> Vec<String> {
    value
        .as_str()
        .unwrap_or_default()
        .split_whitespace()
        .map(|m| m.to_string())
        .collect()
}

/// Outcome from the queried player's side.
fn determine_result(status: &str, winner: Option<&str>, user_is_white: bool) -> &'static str {
    if status == "draw" || status == "stalemate" {
        return "draw";
    }
    match winner {
        Some("white") if user_is_white => "win",
        Some("black") if !user_is_white => "win",
        Some("white") | Some("black") => "loss",
        _ => "draw",
    }
}

/// Bucket a clock's initial seconds into a display time control.
fn time_control_bucket(initial_secs: Option<i64>) -> &'static str {
    match initial_secs {
        None => "Unknown",
        Some(s) if s < 180 => "bullet",
        Some(s) if s < 480 => "blitz",
        Some(s) if s < 1500 => "rapid",
        Some(_) => "classical",
    }
}
