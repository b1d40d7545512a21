pub mod evaluator;
pub mod lichess;
