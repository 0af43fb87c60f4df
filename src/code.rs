use crate::error::GameError;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

pub const CODE_LENGTH: usize = 4;
pub const DIGIT_COUNT: u8 = 10;

/// Four distinct decimal digits.
///
/// Used both for the hidden code and for the guess carried by each clue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Code([u8; CODE_LENGTH]);

/// How a guess scores against a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Score {
    pub correct: u8,
    pub misplaced: u8,
}

/// Per-digit verdict of a guess against a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Misplaced,
    Absent,
}

impl Code {
    /// Builds a code from digits, rejecting duplicates and values above 9.
    pub fn new(digits: [u8; CODE_LENGTH]) -> Result<Self, GameError> {
        let valid = digits.iter().all(|&d| d < DIGIT_COUNT)
            && (0..CODE_LENGTH).all(|i| !digits[i + 1..].contains(&digits[i]));
        if valid {
            Ok(Self(digits))
        } else {
            Err(GameError::InvalidCode(
                digits.iter().map(|d| d.to_string()).collect(),
            ))
        }
    }

    /// Skips validation; callers hold digits that came out of a valid code.
    pub(crate) fn from_raw(digits: [u8; CODE_LENGTH]) -> Self {
        Self(digits)
    }

    /// Draws digits one at a time, skipping any already taken, until four
    /// distinct digits are collected.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut digits = [0; CODE_LENGTH];
        let mut len = 0;
        while len < CODE_LENGTH {
            let digit = rng.random_range(0..DIGIT_COUNT);
            if !digits[..len].contains(&digit) {
                digits[len] = digit;
                len += 1;
            }
        }
        Self(digits)
    }

    #[must_use]
    pub fn digits(&self) -> [u8; CODE_LENGTH] {
        self.0
    }

    #[must_use]
    pub fn contains(&self, digit: u8) -> bool {
        self.0.contains(&digit)
    }

    #[must_use]
    pub fn position_of(&self, digit: u8) -> Option<usize> {
        self.0.iter().position(|&d| d == digit)
    }

    #[must_use]
    pub fn verdict(&self, position: usize, digit: u8) -> Verdict {
        match self.position_of(digit) {
            Some(p) if p == position => Verdict::Correct,
            Some(_) => Verdict::Misplaced,
            None => Verdict::Absent,
        }
    }

    /// Scores `guess` against this code.
    ///
    /// Both sides hold distinct digits, so each guess digit matches at most
    /// one code slot.
    #[must_use]
    pub fn score(&self, guess: &Code) -> Score {
        let mut score = Score::default();
        for (position, &digit) in guess.0.iter().enumerate() {
            match self.verdict(position, digit) {
                Verdict::Correct => score.correct += 1,
                Verdict::Misplaced => score.misplaced += 1,
                Verdict::Absent => {}
            }
        }
        score
    }
}

impl FromStr for Code {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GameError::InvalidCode(s.to_string());
        let trimmed = s.trim();
        if trimmed.chars().count() != CODE_LENGTH {
            return Err(invalid());
        }
        let mut digits = [0; CODE_LENGTH];
        for (slot, c) in digits.iter_mut().zip(trimmed.chars()) {
            *slot = c
                .to_digit(10)
                .and_then(|d| u8::try_from(d).ok())
                .ok_or_else(invalid)?;
        }
        Self::new(digits).map_err(|_| invalid())
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in self.0 {
            write!(f, "{d}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} correct, {} misplaced", self.correct, self.misplaced)
    }
}

/// Order-sensitive comparison of a submitted guess with the code.
#[must_use]
pub fn check_answer(guess: &str, code: &Code) -> bool {
    guess.trim() == code.to_string()
}
