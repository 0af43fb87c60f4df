use crate::code::{CODE_LENGTH, Score};
use crate::error::GameError;
use std::fmt;

pub const CLUE_COUNT: usize = 5;

/// Target `(correct, misplaced)` score a generated clue must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClueProfile {
    correct: u8,
    misplaced: u8,
}

impl ClueProfile {
    pub const ONE_MISPLACED: Self = Self::from_counts(0, 1);
    pub const TWO_MISPLACED: Self = Self::from_counts(0, 2);
    pub const ONE_CORRECT: Self = Self::from_counts(1, 0);
    pub const NOTHING_CORRECT: Self = Self::from_counts(0, 0);
    pub const TWO_CORRECT: Self = Self::from_counts(2, 0);

    /// The five clues of a round, in display order.
    pub const STANDARD: [Self; CLUE_COUNT] = [
        Self::ONE_MISPLACED,
        Self::TWO_MISPLACED,
        Self::ONE_CORRECT,
        Self::NOTHING_CORRECT,
        Self::TWO_CORRECT,
    ];

    const fn from_counts(correct: u8, misplaced: u8) -> Self {
        Self { correct, misplaced }
    }

    /// Validates that some guess of four distinct digits can score exactly
    /// this against some code.
    ///
    /// Three digits in place leave a single code digit and a single slot, so
    /// that digit is either correct or absent: `(3, 1)` never happens.
    pub fn new(correct: u8, misplaced: u8) -> Result<Self, GameError> {
        let total = usize::from(correct) + usize::from(misplaced);
        if total > CODE_LENGTH || (correct == 3 && misplaced == 1) {
            return Err(GameError::InvalidProfile { correct, misplaced });
        }
        Ok(Self::from_counts(correct, misplaced))
    }

    #[must_use]
    pub fn correct(self) -> u8 {
        self.correct
    }

    #[must_use]
    pub fn misplaced(self) -> u8 {
        self.misplaced
    }

    #[must_use]
    pub fn matches(self, score: Score) -> bool {
        score.correct == self.correct && score.misplaced == self.misplaced
    }
}

impl From<ClueProfile> for Score {
    fn from(profile: ClueProfile) -> Self {
        Score {
            correct: profile.correct,
            misplaced: profile.misplaced,
        }
    }
}

fn count_word(n: u8) -> &'static str {
    match n {
        1 => "one",
        2 => "two",
        3 => "three",
        _ => "four",
    }
}

impl fmt::Display for ClueProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.correct, self.misplaced) {
            (0, 0) => write!(f, "nothing correct"),
            (0, m) => write!(f, "{} correct, wrongly placed", count_word(m)),
            (c, 0) => write!(f, "{} correct, correctly placed", count_word(c)),
            (c, m) => write!(
                f,
                "{} correctly placed, {} wrongly placed",
                count_word(c),
                count_word(m)
            ),
        }
    }
}
