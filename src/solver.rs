use crate::clue::Clue;
use crate::code::{CODE_LENGTH, Code, DIGIT_COUNT};
use crate::profile::ClueProfile;

/// Every code of four distinct digits, in ascending order.
#[must_use]
pub fn all_codes() -> Vec<Code> {
    let mut codes = Vec::with_capacity(5040);
    let mut digits = [0u8; CODE_LENGTH];
    push_codes(&mut codes, &mut digits, 0);
    codes
}

fn push_codes(codes: &mut Vec<Code>, digits: &mut [u8; CODE_LENGTH], len: usize) {
    if len == CODE_LENGTH {
        codes.push(Code::from_raw(*digits));
        return;
    }
    for d in 0..DIGIT_COUNT {
        if !digits[..len].contains(&d) {
            digits[len] = d;
            push_codes(codes, digits, len + 1);
        }
    }
}

/// Keeps the candidates against which `guess` scores exactly `profile`.
#[must_use]
pub fn filter_candidates(candidates: &[Code], guess: &Code, profile: ClueProfile) -> Vec<Code> {
    candidates
        .iter()
        .filter(|candidate| profile.matches(candidate.score(guess)))
        .copied()
        .collect()
}

/// `true` when `code` satisfies every clue's label.
#[must_use]
pub fn is_consistent(code: &Code, clues: &[Clue]) -> bool {
    clues.iter().all(|clue| clue.is_satisfied_by(code))
}

/// Every code a player could still deduce from `clues`.
#[must_use]
pub fn consistent_codes(clues: &[Clue]) -> Vec<Code> {
    clues.iter().fold(all_codes(), |pool, clue| {
        filter_candidates(&pool, &clue.guess(), clue.profile)
    })
}

/// Outcome of offering a candidate clue to [`Constraints`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// The clue narrows the pool; holds the narrowed pool.
    Accept(Vec<Code>),
    /// The secret would no longer satisfy every clue.
    Contradiction,
    /// The clue rules out nothing the earlier clues had not.
    Redundant,
}

/// Running set of facts established by the clues accepted so far, kept as
/// the pool of codes still consistent with all of them.
#[derive(Debug, Clone)]
pub struct Constraints {
    pool: Vec<Code>,
}

impl Default for Constraints {
    fn default() -> Self {
        Self::new()
    }
}

impl Constraints {
    #[must_use]
    pub fn new() -> Self {
        Self { pool: all_codes() }
    }

    #[must_use]
    pub fn pool(&self) -> &[Code] {
        &self.pool
    }

    /// Classifies `guess` as a clue with `profile` for `secret`. A guess whose
    /// own score against `secret` differs from `profile` is a contradiction.
    #[must_use]
    pub fn admit(&self, secret: &Code, guess: &Code, profile: ClueProfile) -> Admission {
        if !profile.matches(secret.score(guess)) {
            return Admission::Contradiction;
        }
        let narrowed = filter_candidates(&self.pool, guess, profile);
        if !narrowed.contains(secret) {
            Admission::Contradiction
        } else if narrowed.len() == self.pool.len() {
            Admission::Redundant
        } else {
            Admission::Accept(narrowed)
        }
    }

    pub fn accept(&mut self, narrowed: Vec<Code>) {
        self.pool = narrowed;
    }
}
