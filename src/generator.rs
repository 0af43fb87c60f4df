//! Clue generation.
//!
//! A round is built by rejection sampling: for each profile, random guesses
//! are drawn until one scores exactly that profile against the code and adds
//! information the earlier clues did not. A final coverage pass makes sure
//! every code digit shows up somewhere in the clues.

use crate::clue::{Clue, SlotRef};
use crate::code::{CODE_LENGTH, Code};
use crate::error::{GameError, GenerationTarget};
use crate::profile::{CLUE_COUNT, ClueProfile};
use crate::solver::{Admission, Constraints};
use log::{debug, info, warn};
use rand::Rng;

pub const DEFAULT_MAX_ATTEMPTS: usize = 10_000;
pub const DEFAULT_MAX_ROUNDS: usize = 100;

/// What to do when the drawn clues leave a code digit out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoveragePolicy {
    /// Overwrite the first slot holding a digit absent from the code with the
    /// missing digit. The patched clue is not re-scored, so its label can be
    /// wrong afterwards; see [`Round::mismatched_clues`].
    #[default]
    Patch,
    /// Throw the clue set away and draw a new one for the same code.
    Redraw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Guesses drawn per clue before giving up.
    pub max_attempts: usize,
    /// Clue sets drawn per code under [`CoveragePolicy::Redraw`].
    pub max_rounds: usize,
    /// Reject guesses that rule out no code the earlier clues left open.
    pub require_progress: bool,
    pub coverage: CoveragePolicy,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            max_rounds: DEFAULT_MAX_ROUNDS,
            require_progress: true,
            coverage: CoveragePolicy::default(),
        }
    }
}

/// A hidden code and the clues generated for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    code: Code,
    clues: Vec<Clue>,
    patched: Vec<SlotRef>,
}

impl Round {
    /// Wraps a code and clues built elsewhere, e.g. a hand-made puzzle.
    #[must_use]
    pub fn new(code: Code, clues: Vec<Clue>) -> Self {
        Self {
            code,
            clues,
            patched: Vec::new(),
        }
    }

    #[must_use]
    pub fn code(&self) -> &Code {
        &self.code
    }

    #[must_use]
    pub fn clues(&self) -> &[Clue] {
        &self.clues
    }

    /// Slots overwritten by the coverage pass.
    #[must_use]
    pub fn patched_slots(&self) -> &[SlotRef] {
        &self.patched
    }

    #[must_use]
    pub fn covers_code(&self) -> bool {
        missing_digits(&self.code, &self.clues).is_empty()
    }

    /// Indices of clues whose guess no longer scores what their label says.
    #[must_use]
    pub fn mismatched_clues(&self) -> Vec<usize> {
        self.clues
            .iter()
            .filter(|clue| !clue.is_satisfied_by(&self.code))
            .map(|clue| clue.position)
            .collect()
    }

    /// Index of the "nothing correct" clue, if the round has one.
    #[must_use]
    pub fn nothing_correct_clue(&self) -> Option<usize> {
        self.clues
            .iter()
            .position(|clue| clue.profile == ClueProfile::NOTHING_CORRECT)
    }

    #[must_use]
    pub fn into_parts(self) -> (Code, Vec<Clue>) {
        (self.code, self.clues)
    }
}

/// Produces rounds for a fixed list of clue profiles.
#[derive(Debug, Clone)]
pub struct ClueGenerator {
    profiles: [ClueProfile; CLUE_COUNT],
    config: GeneratorConfig,
}

impl Default for ClueGenerator {
    fn default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}

impl ClueGenerator {
    /// Generator for the five standard profiles.
    #[must_use]
    pub fn new(config: GeneratorConfig) -> Self {
        Self::with_profiles(ClueProfile::STANDARD, config)
    }

    #[must_use]
    pub fn with_profiles(profiles: [ClueProfile; CLUE_COUNT], config: GeneratorConfig) -> Self {
        Self { profiles, config }
    }

    #[must_use]
    pub fn profiles(&self) -> &[ClueProfile; CLUE_COUNT] {
        &self.profiles
    }

    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Draws a fresh code and generates its clues.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::GenerationFailed`] when a retry budget runs out.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Round, GameError> {
        let code = Code::random(rng);
        self.generate_for_code(code, rng)
    }

    /// Generates clues for a known code.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::GenerationFailed`] when a retry budget runs out.
    pub fn generate_for_code<R: Rng + ?Sized>(
        &self,
        code: Code,
        rng: &mut R,
    ) -> Result<Round, GameError> {
        let rounds = match self.config.coverage {
            CoveragePolicy::Patch => 1,
            CoveragePolicy::Redraw => self.config.max_rounds,
        };

        for round in 1..=rounds {
            let mut clues = match self.draw_clues(&code, rng) {
                Ok(clues) => clues,
                Err(e) if round < rounds => {
                    debug!("round {round}: {e}, redrawing");
                    continue;
                }
                Err(e) => return Err(e),
            };
            let missing = missing_digits(&code, &clues);
            if missing.is_empty() {
                info!("generated clues for {} in {} round(s)", code, round);
                return Ok(Round {
                    code,
                    clues,
                    patched: Vec::new(),
                });
            }

            match self.config.coverage {
                CoveragePolicy::Patch => {
                    let patched = patch_coverage(&code, &mut clues, &missing);
                    return Ok(Round {
                        code,
                        clues,
                        patched,
                    });
                }
                CoveragePolicy::Redraw => {
                    debug!("round {} misses digits {:?}, redrawing", round, missing);
                }
            }
        }

        Err(GameError::GenerationFailed {
            target: GenerationTarget::Coverage,
            attempts: rounds,
        })
    }

    fn draw_clues<R: Rng + ?Sized>(
        &self,
        code: &Code,
        rng: &mut R,
    ) -> Result<Vec<Clue>, GameError> {
        let mut constraints = Constraints::new();
        let mut clues = Vec::with_capacity(CLUE_COUNT);
        for (position, &profile) in self.profiles.iter().enumerate() {
            let guess = self.draw_guess(code, profile, &mut constraints, rng)?;
            clues.push(Clue::new(position, profile, &guess));
        }
        Ok(clues)
    }

    fn draw_guess<R: Rng + ?Sized>(
        &self,
        code: &Code,
        profile: ClueProfile,
        constraints: &mut Constraints,
        rng: &mut R,
    ) -> Result<Code, GameError> {
        for attempt in 1..=self.config.max_attempts {
            let guess = Code::random(rng);
            match constraints.admit(code, &guess, profile) {
                Admission::Accept(narrowed) => {
                    debug!(
                        "\"{}\": {} after {} attempt(s), {} codes remain",
                        profile,
                        guess,
                        attempt,
                        narrowed.len()
                    );
                    constraints.accept(narrowed);
                    return Ok(guess);
                }
                // a pinned pool has nothing left to narrow
                Admission::Redundant
                    if !self.config.require_progress || constraints.pool().len() == 1 =>
                {
                    return Ok(guess);
                }
                Admission::Redundant | Admission::Contradiction => {}
            }
        }

        Err(GameError::GenerationFailed {
            target: GenerationTarget::Clue(profile),
            attempts: self.config.max_attempts,
        })
    }
}

/// Code digits that appear in none of the clues.
fn missing_digits(code: &Code, clues: &[Clue]) -> Vec<u8> {
    code.digits()
        .into_iter()
        .filter(|&d| !clues.iter().any(|clue| clue.contains(d)))
        .collect()
}

fn patch_coverage(code: &Code, clues: &mut [Clue], missing: &[u8]) -> Vec<SlotRef> {
    let mut patched = Vec::new();
    for &digit in missing {
        let slot = clues.iter().enumerate().find_map(|(clue, c)| {
            (0..CODE_LENGTH)
                .find(|&number| !code.contains(c.numbers[number].value))
                .map(|number| SlotRef { clue, number })
        });
        let Some(slot) = slot else {
            warn!("no slot left to place missing digit {digit}");
            continue;
        };
        let number = &mut clues[slot.clue].numbers[slot.number];
        warn!(
            "clue {} slot {}: {} replaced by missing digit {digit}, label no longer checked",
            slot.clue + 1,
            slot.number + 1,
            number.value
        );
        number.value = digit;
        patched.push(slot);
    }
    patched
}
