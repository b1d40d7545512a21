//! Pure game-review primitives: transcript tokenizing, opening-book
//! deviation detection, and move-quality classification.
//!
//! Everything in this crate is a stateless function over immutable inputs —
//! no I/O, no async, no shared mutable state. The HTTP layer in the `server`
//! crate composes these per request.

pub mod book;
pub mod pgn;
pub mod quality;

pub use book::{find_deviation, Deviation, OpeningBook};
pub use quality::{classify, CriticalMoment, QualityReport, Severity};
