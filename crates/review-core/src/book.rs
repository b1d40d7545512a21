//! Opening book and deviation matcher.
//!
//! The book maps a position key — the space-joined SAN moves played so far,
//! empty string for the starting position — to the ordered list of moves
//! considered theory there (first entry is the main line). It is not a board
//! representation and performs no legality checking.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Games shorter than this are not assessed for an opening deviation.
pub const MIN_PLIES: usize = 4;

/// Deviations are an opening phenomenon; never scan past this ply.
pub const SCAN_LIMIT: usize = 20;

/// Immutable position-key → theory-moves mapping, built once and read-only
/// for the process lifetime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpeningBook {
    positions: HashMap<String, Vec<String>>,
}

impl OpeningBook {
    /// Built-in default table covering the most common first moves.
    /// Serves as the fallback when no book file is configured.
    pub fn builtin() -> Self {
        let entries: &[(&str, &[&str])] = &[
            ("", &["e4", "d4", "Nf3", "c4"]),
            ("e4", &["e5", "c5", "e6", "c6"]),
            ("e4 e5", &["Nf3", "f4", "Bc4"]),
            ("e4 e5 Nf3", &["Nc6", "Nf6", "f5"]),
            ("e4 e5 Nf3 Nc6", &["Bb5", "Bc4", "d4"]),
            ("d4", &["d5", "Nf6", "f5"]),
            ("d4 d5", &["c4", "Nf3", "Bf4"]),
            ("d4 Nf6", &["c4", "Nf3", "Bg5"]),
            ("Nf3", &["d5", "Nf6", "c5"]),
            ("c4", &["e5", "Nf6", "c5"]),
        ];

        let positions = entries
            .iter()
            .map(|(key, moves)| {
                (
                    key.to_string(),
                    moves.iter().map(|m| m.to_string()).collect(),
                )
            })
            .collect();

        Self { positions }
    }

    /// Theory moves at a position key, main line first.
    pub fn lookup(&self, position_key: &str) -> Option<&[String]> {
        self.positions.get(position_key).map(|m| m.as_slice())
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl From<HashMap<String, Vec<String>>> for OpeningBook {
    fn from(positions: HashMap<String, Vec<String>>) -> Self {
        Self { positions }
    }
}

/// The first out-of-book move of a game, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deviation {
    /// 0-indexed ply of the deviating move.
    pub ply_index: usize,
    /// 1-indexed full-move number (ply / 2 + 1).
    pub move_number: usize,
    pub actual_move: String,
    /// The book's main-line continuation at the position.
    pub suggested_move: String,
    /// Position key before the deviating ply.
    pub position_key: String,
    pub explanation: String,
}

/// Walk the move sequence against the book and return the first move played
/// at a covered position that is not among its listed continuations.
///
/// A position key the book does not cover is uncharted, not a deviation; the
/// scan keeps extending the key and moving on. Fully deterministic for a
/// fixed book and move list.
pub fn find_deviation(book: &OpeningBook, moves: &[String]) -> Option<Deviation> {
    if moves.len() < MIN_PLIES {
        return None;
    }

    let mut position_key = String::new();

    for (i, mv) in moves.iter().take(SCAN_LIMIT).enumerate() {
        if let Some(theory) = book.lookup(&position_key) {
            if let Some(main_line) = theory.first() {
                if !theory.iter().any(|t| t == mv) {
                    return Some(Deviation {
                        ply_index: i,
                        move_number: i / 2 + 1,
                        actual_move: mv.clone(),
                        suggested_move: main_line.clone(),
                        position_key: position_key.clone(),
                        explanation: format!(
                            "This move deviates from the main theoretical line. \
                             The book continuation {main_line} is more commonly \
                             played and leads to well-studied positions."
                        ),
                    });
                }
            }
        }

        if !position_key.is_empty() {
            position_key.push(' ');
        }
        position_key.push_str(mv);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn san(moves: &[&str]) -> Vec<String> {
        moves.iter().map(|m| m.to_string()).collect()
    }

    fn test_book() -> OpeningBook {
        let mut positions = HashMap::new();
        positions.insert("".to_string(), san(&["e4"]));
        positions.insert("e4".to_string(), san(&["e5"]));
        positions.insert("e4 e5".to_string(), san(&["Nf3"]));
        positions.insert("e4 e5 Nf3".to_string(), san(&["Nc6"]));
        positions.insert("e4 e5 Nf3 Nc6".to_string(), san(&["Bb5", "Bc4", "d4"]));
        OpeningBook::from(positions)
    }

    #[test]
    fn test_short_game_not_assessed() {
        let book = test_book();
        assert!(find_deviation(&book, &san(&["e4", "e5", "Bc4"])).is_none());
        assert!(find_deviation(&book, &[]).is_none());
    }

    #[test]
    fn test_uncharted_is_not_a_deviation() {
        // Bc4 is listed at "e4 e5 Nf3 Nc6"; the key after it is not covered,
        // so f5 is uncharted rather than wrong.
        let book = test_book();
        let moves = san(&["e4", "e5", "Nf3", "Nc6", "Bc4", "f5"]);
        assert!(find_deviation(&book, &moves).is_none());
    }

    #[test]
    fn test_first_out_of_book_move_reported() {
        let book = test_book();
        let moves = san(&["e4", "e5", "Bc4", "Nc6", "Nf3", "Nf6"]);
        let dev = find_deviation(&book, &moves).unwrap();
        assert_eq!(dev.ply_index, 2);
        assert_eq!(dev.move_number, 2);
        assert_eq!(dev.actual_move, "Bc4");
        assert_eq!(dev.suggested_move, "Nf3");
        assert_eq!(dev.position_key, "e4 e5");
        assert!(dev.explanation.contains("Nf3"));
    }

    #[test]
    fn test_any_listed_move_follows_theory() {
        let book = test_book();
        // Second-listed Bc4 at "e4 e5 Nf3 Nc6" is still theory.
        let moves = san(&["e4", "e5", "Nf3", "Nc6", "Bc4", "Nf6", "d3", "Bc5"]);
        assert!(find_deviation(&book, &moves).is_none());
    }

    #[test]
    fn test_scan_stops_at_limit() {
        let mut positions = HashMap::new();
        // Cover a deep position so a late mismatch would be visible if scanned.
        let mut key = String::new();
        for i in 0..SCAN_LIMIT + 2 {
            let mv = format!("m{i}");
            positions.insert(key.clone(), vec![mv.clone()]);
            if !key.is_empty() {
                key.push(' ');
            }
            key.push_str(&mv);
        }
        let book = OpeningBook::from(positions);

        let mut moves: Vec<String> = (0..SCAN_LIMIT).map(|i| format!("m{i}")).collect();
        moves.push("x".to_string()); // past the limit
        assert!(find_deviation(&book, &moves).is_none());
    }

    #[test]
    fn test_deterministic() {
        let book = test_book();
        let moves = san(&["e4", "e5", "Bc4", "Nc6"]);
        assert_eq!(find_deviation(&book, &moves), find_deviation(&book, &moves));
    }

    #[test]
    fn test_book_from_json() {
        let book: OpeningBook = serde_json::from_str(
            r#"{"e4": ["e5", "c5"], "e4 e5": ["Nf3"]}"#,
        )
        .unwrap();
        assert_eq!(book.len(), 2);
        assert_eq!(book.lookup("e4").unwrap()[0], "e5");
        assert!(book.lookup("d4").is_none());
    }

    #[test]
    fn test_builtin_book_covers_root() {
        let book = OpeningBook::builtin();
        assert!(!book.is_empty());
        assert_eq!(book.lookup("").unwrap()[0], "e4");
    }
}
