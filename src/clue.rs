use crate::code::{CODE_LENGTH, Code, Score};
use crate::profile::ClueProfile;

/// Player markup on a single clue digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkState {
    #[default]
    Default,
    Correct,
    Misplaced,
    Wrong,
}

/// Address of one digit slot: clue index, then position within the clue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotRef {
    pub clue: usize,
    pub number: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClueNumber {
    pub value: u8,
    pub position: usize,
    pub state: MarkState,
}

/// A labelled guess from a generated round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clue {
    pub profile: ClueProfile,
    pub numbers: [ClueNumber; CODE_LENGTH],
    pub position: usize,
}

impl Clue {
    #[must_use]
    pub fn new(position: usize, profile: ClueProfile, guess: &Code) -> Self {
        let digits = guess.digits();
        let numbers = std::array::from_fn(|i| ClueNumber {
            value: digits[i],
            position: i,
            state: MarkState::Default,
        });
        Self {
            profile,
            numbers,
            position,
        }
    }

    /// The guess this clue carries.
    #[must_use]
    pub fn guess(&self) -> Code {
        Code::from_raw(std::array::from_fn(|i| self.numbers[i].value))
    }

    #[must_use]
    pub fn label(&self) -> String {
        self.profile.to_string()
    }

    #[must_use]
    pub fn contains(&self, digit: u8) -> bool {
        self.numbers.iter().any(|n| n.value == digit)
    }

    /// Score of this clue's guess against `code`.
    #[must_use]
    pub fn score_against(&self, code: &Code) -> Score {
        code.score(&self.guess())
    }

    #[must_use]
    pub fn is_satisfied_by(&self, code: &Code) -> bool {
        self.profile.matches(self.score_against(code))
    }

    #[must_use]
    pub fn is_untouched(&self) -> bool {
        self.numbers.iter().all(|n| n.state == MarkState::Default)
    }
}
