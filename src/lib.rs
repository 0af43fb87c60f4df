// Library interface for codebreaker
// This allows integration tests to access internal modules

pub mod board;
pub mod cli;
pub mod clue;
pub mod code;
pub mod error;
pub mod game_state;
pub mod generator;
pub mod logging;
pub mod profile;
pub mod solver;
pub mod tui;

// Re-export commonly used items for easier testing
pub use board::{Board, Flags, GuessForm};
pub use clue::{Clue, ClueNumber, MarkState, SlotRef};
pub use code::{Code, Score, check_answer};
pub use error::GameError;
pub use game_state::{Game, GameInterface, UserAction, game_loop};
pub use generator::{ClueGenerator, CoveragePolicy, GeneratorConfig, Round};
pub use profile::ClueProfile;
pub use solver::{all_codes, consistent_codes, filter_candidates, is_consistent};
