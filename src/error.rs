use thiserror::Error;

use crate::profile::ClueProfile;
use std::fmt;

/// What the generator was trying to produce when it gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationTarget {
    Clue(ClueProfile),
    Coverage,
}

impl fmt::Display for GenerationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clue(profile) => write!(f, "a \"{profile}\" clue"),
            Self::Coverage => write!(f, "clues covering every code digit"),
        }
    }
}

/// Errors surfaced by the puzzle core to its front-ends.
///
/// None of these are fatal: the game loop reports them and keeps going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("could not generate {target} after {attempts} attempts")]
    GenerationFailed {
        target: GenerationTarget,
        attempts: usize,
    },
    #[error("no digit is selected")]
    InvalidSelection,
    #[error("guess is incomplete: {filled} of 4 digits entered")]
    IncompleteGuess { filled: usize },
    #[error("no clue can score {correct} correct and {misplaced} misplaced")]
    InvalidProfile { correct: u8, misplaced: u8 },
    #[error("'{0}' is not a code of 4 distinct digits")]
    InvalidCode(String),
    #[error("clue {0} does not exist")]
    UnknownClue(usize),
    #[error("clue number {0} does not exist")]
    UnknownNumber(usize),
    #[error("this round has no \"nothing correct\" clue")]
    NoNothingCorrectClue,
    #[error("guess position {0} does not exist")]
    UnknownPosition(usize),
}
