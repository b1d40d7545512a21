//! End-to-end core pipeline: raw transcript -> tokens -> deviation -> report.

use review_core::{book, classify, find_deviation, pgn, OpeningBook, Severity};

const ANNOTATED_PGN: &str = r#"[Event "Rated blitz game"]
[Site "https://lichess.org/abcd1234"]
[White "alice"]
[Black "bob"]
[Result "1-0"]
[ECO "C50"]

1. e4 e5 2. Nf3 {solid} Nc6 3. Bc4 (3. Bb5 {the Ruy Lopez} a6) Bc5?!
4. c3 Nf6 5. d4! exd4 6. cxd4 Bb4+ 1-0"#;

#[test]
fn tokenizer_feeds_the_matcher() {
    let moves = pgn::tokenize(ANNOTATED_PGN);
    assert_eq!(
        moves,
        vec![
            "e4", "e5", "Nf3", "Nc6", "Bc4", "Bc5", "c3", "Nf6", "d4", "exd4", "cxd4", "Bb4"
        ]
    );

    // Bc4 is second-listed theory at "e4 e5 Nf3 Nc6"; the Italian line then
    // leaves book coverage, so no deviation is reported.
    let book = OpeningBook::builtin();
    assert!(find_deviation(&book, &moves).is_none());
}

#[test]
fn deviation_flows_into_the_report() {
    let book = OpeningBook::builtin();
    let pgn = "1. e4 e5 2. Qh5 Nc6 3. Bc4 g6 4. Qf3 Nf6";
    let moves = pgn::tokenize(pgn);

    let deviation = find_deviation(&book, &moves).expect("Qh5 is out of book");
    assert_eq!(deviation.ply_index, 2);
    assert_eq!(deviation.move_number, 2);
    assert_eq!(deviation.actual_move, "Qh5");
    assert_eq!(deviation.suggested_move, "Nf3");
    assert_eq!(deviation.position_key, "e4 e5");

    // Engine says the queen sortie gives up 160 centipawns.
    let evals = [20, 15, -145, -150, -140, -150, -160, -155];
    let report = classify(&moves, &evals, Some(&deviation));

    assert_eq!(report.evaluation_trend.len(), moves.len());
    assert_eq!(report.critical_moments.len(), 1);
    let moment = &report.critical_moments[0];
    assert_eq!(moment.ply_index, 2);
    assert_eq!(moment.severity, Severity::Mistake);
    assert_eq!(moment.suggested_move.as_deref(), Some("Nf3"));
    assert_eq!(report.accuracy, 95);
}

#[test]
fn report_serializes_with_consumer_field_names() {
    let moves = pgn::tokenize("1. e4 e5 2. Nf3 Ke7");
    let report = classify(&moves, &[20, 20, 25, 350], None);
    let json = serde_json::to_value(&report).unwrap();

    assert!(json.get("evaluationTrend").is_some());
    assert!(json.get("criticalMoments").is_some());
    assert_eq!(json["accuracy"], 90);
    let moment = &json["criticalMoments"][0];
    assert_eq!(moment["severity"], "blunder");
    assert_eq!(moment["move"], "Ke7");
    assert_eq!(moment["plyIndex"], 3);
    // No independently known alternative: the field is absent, not null.
    assert!(moment.get("suggestedMove").is_none());
}

#[test]
fn repeated_analysis_is_byte_identical() {
    let moves = pgn::tokenize(ANNOTATED_PGN);
    let evals: Vec<i32> = (0..moves.len() as i32).map(|i| 10 * i).collect();

    let a = serde_json::to_string(&classify(&moves, &evals, None)).unwrap();
    let b = serde_json::to_string(&classify(&moves, &evals, None)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn garbage_transcript_degrades_gracefully() {
    let moves = pgn::tokenize("not a chess game at all");
    assert_eq!(moves, vec!["not", "a", "chess", "game", "at", "all"]);

    // Garbage tokens deviate from theory immediately.
    let deviation = find_deviation(&OpeningBook::builtin(), &moves).unwrap();
    assert_eq!(deviation.ply_index, 0);
    assert_eq!(deviation.suggested_move, "e4");

    let report = classify(&moves, &[], None);
    assert_eq!(report.accuracy, 100);
    assert!(report.critical_moments.is_empty());
}

#[test]
fn scan_limit_bounds_the_walk() {
    assert_eq!(book::SCAN_LIMIT, 20);
    assert_eq!(book::MIN_PLIES, 4);
}
