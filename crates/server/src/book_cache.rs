//! In-memory opening book cache.
//!
//! The book is loaded from a JSON file at startup for instant lookups.
//! When no file is configured (or it fails to parse) the compiled-in
//! default table is used instead, so deviation analysis always has a book.

use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::LazyLock;

use review_core::OpeningBook;

/// Default path to the JSON book file; override with `BOOK_FILE`.
pub const BOOK_FILE_PATH: &str = "data/opening_book.json";

/// Global read-only book, loaded at first access.
pub static BOOK_CACHE: LazyLock<OpeningBook> = LazyLock::new(|| {
    let path = env::var("BOOK_FILE").unwrap_or_else(|_| BOOK_FILE_PATH.to_string());
    match load_book(&path) {
        Ok(book) => {
            tracing::info!("Loaded opening book from {}: {} positions", path, book.len());
            book
        }
        Err(e) => {
            tracing::warn!("Failed to load opening book from {path}: {e}");
            tracing::warn!("Falling back to the built-in book");
            OpeningBook::builtin()
        }
    }
});

/// Load a book from a JSON file mapping position keys to theory moves.
pub fn load_book<P: AsRef<Path>>(path: P) -> anyhow::Result<OpeningBook> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let book: OpeningBook = serde_json::from_reader(reader)?;
    Ok(book)
}
