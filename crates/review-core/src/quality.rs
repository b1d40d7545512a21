//! Move-quality classification — pure functions only.
//!
//! Evaluations arrive one per ply (centipawns, positive = better for White),
//! produced by an external engine or the server's substitute path. The
//! classifier owns the thresholding policy and the aggregate accuracy score.

use serde::{Deserialize, Serialize};

use crate::book::Deviation;

/// Swing thresholds (centipawns, adverse to the mover).
pub const INACCURACY_THRESHOLD: i32 = 50;
pub const MISTAKE_THRESHOLD: i32 = 150;
pub const BLUNDER_THRESHOLD: i32 = 300;

/// Accuracy penalty per finding. Fixed policy, reproduced for output
/// compatibility with existing consumers.
const INACCURACY_PENALTY: i32 = 2;
const MISTAKE_PENALTY: i32 = 5;
const BLUNDER_PENALTY: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Inaccuracy,
    Mistake,
    Blunder,
}

impl Severity {
    /// Classify an adverse swing magnitude; below the inaccuracy threshold
    /// nothing is flagged.
    fn from_adverse_swing(magnitude: i32) -> Option<Self> {
        if magnitude >= BLUNDER_THRESHOLD {
            Some(Severity::Blunder)
        } else if magnitude >= MISTAKE_THRESHOLD {
            Some(Severity::Mistake)
        } else if magnitude >= INACCURACY_THRESHOLD {
            Some(Severity::Inaccuracy)
        } else {
            None
        }
    }

    fn penalty(self) -> i32 {
        match self {
            Severity::Inaccuracy => INACCURACY_PENALTY,
            Severity::Mistake => MISTAKE_PENALTY,
            Severity::Blunder => BLUNDER_PENALTY,
        }
    }
}

/// A ply whose evaluation swing crossed a severity threshold, adverse to
/// the side that moved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalMoment {
    pub ply_index: usize,
    #[serde(rename = "move")]
    pub played: String,
    /// Filled only when an alternative is independently known (the opening
    /// book's suggestion at that ply); the classifier never invents one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_move: Option<String>,
    /// Signed swing from the mover's perspective (negative = adverse).
    pub evaluation_delta: i32,
    pub severity: Severity,
    pub explanation: String,
}

/// Complete result of one quality analysis. Self-contained and stateless.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityReport {
    pub evaluation_trend: Vec<i32>,
    pub critical_moments: Vec<CriticalMoment>,
    /// Integer percentage, always in [0, 100].
    pub accuracy: i32,
}

/// White moves on even plies (0-indexed).
pub fn is_white_to_move(ply_index: usize) -> bool {
    ply_index % 2 == 0
}

/// Classify every ply transition and aggregate an accuracy score.
///
/// A length mismatch between `moves` and `evaluations` is not an error: both
/// are silently truncated to the shorter length. Never fails; an empty input
/// yields an empty trend, no critical moments, and accuracy 100.
pub fn classify(
    moves: &[String],
    evaluations: &[i32],
    opening_hint: Option<&Deviation>,
) -> QualityReport {
    let n = moves.len().min(evaluations.len());
    let mut critical_moments = Vec::new();

    for i in 1..n {
        let raw_delta = evaluations[i] - evaluations[i - 1];
        // Evaluations are White-relative; flip the sign for Black's plies so
        // the delta always reads "how much did this move hurt the mover".
        let mover_delta = if is_white_to_move(i) {
            raw_delta
        } else {
            -raw_delta
        };

        if mover_delta >= 0 {
            continue;
        }

        let Some(severity) = Severity::from_adverse_swing(-mover_delta) else {
            continue;
        };

        let suggested_move = opening_hint
            .filter(|d| d.ply_index == i)
            .map(|d| d.suggested_move.clone());

        critical_moments.push(CriticalMoment {
            ply_index: i,
            played: moves[i].clone(),
            suggested_move,
            evaluation_delta: mover_delta,
            severity,
            explanation: explain(severity, mover_delta),
        });
    }

    let penalty: i32 = critical_moments.iter().map(|m| m.severity.penalty()).sum();

    QualityReport {
        evaluation_trend: evaluations[..n].to_vec(),
        critical_moments,
        accuracy: (100 - penalty).clamp(0, 100),
    }
}

fn explain(severity: Severity, mover_delta: i32) -> String {
    let magnitude = mover_delta.abs();
    match severity {
        Severity::Inaccuracy => {
            format!("Slightly worsens the position, giving up {magnitude} centipawns.")
        }
        Severity::Mistake => {
            format!("Significantly worsens the position, giving up {magnitude} centipawns.")
        }
        Severity::Blunder => format!(
            "Loses material or a decisive advantage, giving up {magnitude} centipawns."
        ),
    }
}
