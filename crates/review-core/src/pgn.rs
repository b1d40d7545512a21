//! PGN transcript tokenizer — lightweight regex-based normalization.
//!
//! This is purely textual: no legality checking, no move disambiguation.
//! Garbage tokens that survive the stripping rules pass through unchanged.

use regex::Regex;

/// Normalize a raw PGN-like transcript into an ordered sequence of SAN move
/// tokens, index 0 = White's first ply.
///
/// Total over all input: empty or unparseable text yields an empty (or
/// best-effort) sequence, never an error. The stripping rules run in a fixed
/// order; each rule must not reintroduce text removed by an earlier one.
pub fn tokenize(pgn: &str) -> Vec<String> {
    if pgn.trim().is_empty() {
        return Vec::new();
    }

    // Remove metadata headers
    let header_re = Regex::new(r"\[[^\]]*\]").unwrap();
    let text = header_re.replace_all(pgn, " ");

    // Remove comments in braces
    let comment_re = Regex::new(r"\{[^}]*\}").unwrap();
    let text = comment_re.replace_all(&text, " ");

    // Remove variations in parentheses
    let variation_re = Regex::new(r"\([^)]*\)").unwrap();
    let text = variation_re.replace_all(&text, " ");

    // Remove numeric annotation glyphs ($1, $14, ...)
    let nag_re = Regex::new(r"\$\d+").unwrap();
    let text = nag_re.replace_all(&text, " ");

    // Remove move-quality punctuation attached to moves
    let glyph_re = Regex::new(r"[!?+#=]+").unwrap();
    let text = glyph_re.replace_all(&text, "");

    // Remove move-number markers ("12." as well as "12..." continuations)
    let move_number_re = Regex::new(r"\d+\.+").unwrap();
    let text = move_number_re.replace_all(&text, " ");

    // Remove game-result tokens wherever they occur
    let result_re = Regex::new(r"1/2-1/2|1-0|0-1|\*").unwrap();
    let text = result_re.replace_all(&text, " ");

    text.split_whitespace().map(|s| s.to_string()).collect()
}

/// Extract a string value from a PGN header (e.g. White, ECO).
pub fn extract_header(pgn: &str, header_name: &str) -> Option<String> {
    let pattern = format!(r#"\[{}\s+"([^"]*)"\]"#, regex::escape(header_name));
    let re = Regex::new(&pattern).ok()?;
    let value = re.captures(pgn)?.get(1)?.as_str().to_string();
    if value.is_empty() { None } else { Some(value) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_basic() {
        let moves = tokenize("1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 1-0");
        assert_eq!(moves, vec!["e4", "e5", "Nf3", "Nc6", "Bb5", "a6"]);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n\t ").is_empty());
    }

    #[test]
    fn test_tokenize_strips_headers() {
        let pgn = r#"[Event "Rated blitz game"]
[White "Player1"]
[Result "0-1"]

1. d4 d5 2. c4 e6 0-1"#;
        assert_eq!(tokenize(pgn), vec!["d4", "d5", "c4", "e6"]);
    }

    #[test]
    fn test_tokenize_strips_comments_and_variations() {
        let pgn = "1. e4 {best by test} e5 2. Nf3 (2. f4 {the King's Gambit} exf4) Nc6";
        assert_eq!(tokenize(pgn), vec!["e4", "e5", "Nf3", "Nc6"]);
    }

    #[test]
    fn test_tokenize_strips_annotations() {
        let pgn = "1. e4! e5?? 2. Nf3 $2 Nc6+ 3. Bb5# 1/2-1/2";
        assert_eq!(tokenize(pgn), vec!["e4", "e5", "Nf3", "Nc6", "Bb5"]);
    }

    #[test]
    fn test_tokenize_black_move_continuation() {
        // "4... exd5" markers appear after stripped comments in exports
        let pgn = "4. exd5 {forced} 4... Nxd5 5. Nf3";
        assert_eq!(tokenize(pgn), vec!["exd5", "Nxd5", "Nf3"]);
    }

    #[test]
    fn test_tokenize_leaves_no_stripped_patterns() {
        let pgn = "1. e4 {cmt} e5 (1... c5 $4) 2. Nf3! Nc6 1/2-1/2 *";
        for token in tokenize(pgn) {
            assert!(!token.contains('{') && !token.contains('}'));
            assert!(!token.contains('(') && !token.contains(')'));
            assert!(!token.contains('$'));
            assert!(token != "1-0" && token != "0-1" && token != "1/2-1/2" && token != "*");
        }
    }

    #[test]
    fn test_tokenize_idempotent_inputs() {
        let pgn = "1. e4 e5 2. Nf3 Nc6";
        assert_eq!(tokenize(pgn), tokenize(pgn));
    }

    #[test]
    fn test_extract_header() {
        let pgn = r#"[White "Carlsen"]
[ECO "B90"]"#;
        assert_eq!(extract_header(pgn, "White"), Some("Carlsen".to_string()));
        assert_eq!(extract_header(pgn, "ECO"), Some("B90".to_string()));
        assert_eq!(extract_header(pgn, "Black"), None);
    }
}
