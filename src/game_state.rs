use crate::board::{Board, Flags};
use crate::code::Code;
use crate::error::GameError;
use crate::generator::{ClueGenerator, Round};
use crate::solver::consistent_codes;
use log::{info, warn};
use rand::Rng;

/// A player gesture, as decoded by a front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    Select { clue: usize, number: usize },
    MarkCorrect,
    MarkMisplaced,
    MarkWrong,
    /// `None` targets the "nothing correct" clue.
    MarkClueWrong(Option<usize>),
    Reset,
    SetDigit { position: usize, digit: u8 },
    ClearDigit(usize),
    /// Fills the whole guess form at once.
    EnterGuess(Code),
    Submit,
    Hint,
    NewGame,
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessOutcome {
    pub guess: String,
    pub matched: bool,
    pub attempts: usize,
}

/// What applying an action produced, for the front-end to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Flags(Flags),
    Guess(GuessOutcome),
    /// Number of codes still consistent with the clues.
    Hint(usize),
}

/// One round in play: the generated puzzle plus the player's markup.
#[derive(Debug, Clone)]
pub struct Game {
    round: Round,
    board: Board,
    attempts: usize,
    won: bool,
}

impl Game {
    #[must_use]
    pub fn new(round: Round) -> Self {
        let board = Board::new(round.clues().to_vec());
        Self {
            round,
            board,
            attempts: 0,
            won: false,
        }
    }

    #[must_use]
    pub fn round(&self) -> &Round {
        &self.round
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[must_use]
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    #[must_use]
    pub fn is_won(&self) -> bool {
        self.won
    }

    /// Checks the guess form against the code.
    pub fn submit_guess(&mut self) -> Result<GuessOutcome, GameError> {
        let matched = self.board.guess().submit(self.round.code())?;
        self.attempts += 1;
        self.won |= matched;
        info!(
            "guess {} #{}: {}",
            self.board.guess(),
            self.attempts,
            if matched { "match" } else { "no match" }
        );
        Ok(GuessOutcome {
            guess: self.board.guess().to_string(),
            matched,
            attempts: self.attempts,
        })
    }

    /// Applies one in-round action. `NewGame` and `Exit` belong to the loop
    /// and leave the game untouched.
    pub fn apply(&mut self, action: &UserAction) -> Result<ActionOutcome, GameError> {
        let flags = match action {
            UserAction::Select { clue, number } => self.board.select(*clue, *number)?,
            UserAction::MarkCorrect => self.board.mark_correct()?,
            UserAction::MarkMisplaced => self.board.mark_misplaced()?,
            UserAction::MarkWrong => self.board.mark_wrong()?,
            UserAction::MarkClueWrong(clue) => {
                let clue = clue
                    .or(self.board.nothing_correct_clue())
                    .ok_or(GameError::NoNothingCorrectClue)?;
                self.board.mark_entire_clue_wrong(clue)?
            }
            UserAction::Reset => self.board.reset_all(),
            UserAction::SetDigit { position, digit } => {
                self.board.guess_mut().set(*position, *digit)?;
                self.board.flags()
            }
            UserAction::ClearDigit(position) => {
                self.board.guess_mut().clear(*position)?;
                self.board.flags()
            }
            UserAction::EnterGuess(code) => {
                for (position, digit) in code.digits().into_iter().enumerate() {
                    self.board.guess_mut().set(position, digit)?;
                }
                self.board.flags()
            }
            UserAction::Submit => return self.submit_guess().map(ActionOutcome::Guess),
            UserAction::Hint => {
                return Ok(ActionOutcome::Hint(consistent_codes(self.board.clues()).len()));
            }
            UserAction::NewGame | UserAction::Exit => self.board.flags(),
        };
        Ok(ActionOutcome::Flags(flags))
    }
}

/// Trait for front-ends driving the game loop.
pub trait GameInterface {
    fn display_round(&mut self, game: &Game);
    /// `None` when the input could not be understood; the loop asks again.
    fn read_action(&mut self) -> Option<UserAction>;
    fn display_flags(&mut self, flags: &Flags);
    fn display_result(&mut self, outcome: &GuessOutcome);
    fn display_hint(&mut self, remaining: usize);
    fn display_error(&mut self, error: &GameError);
    fn display_new_game(&mut self);
    fn display_exit_message(&mut self);
}

fn start_game<R, I>(
    generator: &ClueGenerator,
    rng: &mut R,
    interface: &mut I,
) -> Result<Game, GameError>
where
    R: Rng + ?Sized,
    I: GameInterface + ?Sized,
{
    match generator.generate(rng) {
        Ok(round) => {
            if !round.patched_slots().is_empty() {
                warn!(
                    "round patched for coverage, clues {:?} disagree with their labels",
                    round.mismatched_clues()
                );
            }
            let game = Game::new(round);
            interface.display_round(&game);
            interface.display_flags(&game.board().flags());
            Ok(game)
        }
        Err(e) => {
            warn!("generation failed: {e}");
            interface.display_error(&e);
            Err(e)
        }
    }
}

/// Plays rounds until the player exits.
pub fn game_loop<R, I>(generator: &ClueGenerator, rng: &mut R, interface: &mut I)
where
    R: Rng + ?Sized,
    I: GameInterface + ?Sized,
{
    let mut game = start_game(generator, rng, interface);

    loop {
        let Some(action) = interface.read_action() else {
            continue;
        };

        match action {
            UserAction::Exit => {
                interface.display_exit_message();
                break;
            }
            UserAction::NewGame => {
                if let Ok(previous) = &game {
                    info!("abandoning round with code {}", previous.round().code());
                }
                interface.display_new_game();
                game = start_game(generator, rng, interface);
            }
            action => match &mut game {
                Ok(current) => match current.apply(&action) {
                    Ok(ActionOutcome::Flags(flags)) => {
                        interface.display_round(current);
                        interface.display_flags(&flags);
                    }
                    Ok(ActionOutcome::Guess(outcome)) => interface.display_result(&outcome),
                    Ok(ActionOutcome::Hint(remaining)) => interface.display_hint(remaining),
                    Err(e) => interface.display_error(&e),
                },
                Err(e) => interface.display_error(e),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clue::{Clue, MarkState};
    use crate::generator::{CoveragePolicy, GeneratorConfig};
    use crate::profile::ClueProfile;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::VecDeque;

    fn fixed_game() -> Game {
        let clue = |position, profile, guess: &str| {
            Clue::new(position, profile, &guess.parse().unwrap())
        };
        Game::new(Round::new(
            "6824".parse().unwrap(),
            vec![
                clue(0, ClueProfile::ONE_MISPLACED, "1639"),
                clue(1, ClueProfile::TWO_MISPLACED, "2961"),
                clue(2, ClueProfile::ONE_CORRECT, "5809"),
                clue(3, ClueProfile::NOTHING_CORRECT, "7591"),
                clue(4, ClueProfile::TWO_CORRECT, "6853"),
            ],
        ))
    }

    #[derive(Debug, PartialEq)]
    enum Event {
        Round,
        Flags(Flags),
        Result(GuessOutcome),
        Hint(usize),
        Error(GameError),
        NewGame,
        Exit,
    }

    /// Replays scripted actions and records what the loop showed.
    struct ScriptedInterface {
        actions: VecDeque<Option<UserAction>>,
        events: Vec<Event>,
    }

    impl ScriptedInterface {
        fn new(actions: Vec<Option<UserAction>>) -> Self {
            Self {
                actions: actions.into(),
                events: Vec::new(),
            }
        }
    }

    impl GameInterface for ScriptedInterface {
        fn display_round(&mut self, _game: &Game) {
            self.events.push(Event::Round);
        }

        fn read_action(&mut self) -> Option<UserAction> {
            self.actions.pop_front().unwrap_or(Some(UserAction::Exit))
        }

        fn display_flags(&mut self, flags: &Flags) {
            self.events.push(Event::Flags(*flags));
        }

        fn display_result(&mut self, outcome: &GuessOutcome) {
            self.events.push(Event::Result(outcome.clone()));
        }

        fn display_hint(&mut self, remaining: usize) {
            self.events.push(Event::Hint(remaining));
        }

        fn display_error(&mut self, error: &GameError) {
            self.events.push(Event::Error(error.clone()));
        }

        fn display_new_game(&mut self) {
            self.events.push(Event::NewGame);
        }

        fn display_exit_message(&mut self) {
            self.events.push(Event::Exit);
        }
    }

    #[test]
    fn test_submit_wrong_then_right() {
        let mut game = fixed_game();
        game.apply(&UserAction::EnterGuess("1234".parse().unwrap()))
            .unwrap();
        let ActionOutcome::Guess(outcome) = game.apply(&UserAction::Submit).unwrap() else {
            panic!("expected a guess outcome");
        };
        assert!(!outcome.matched);
        assert!(!game.is_won());

        game.apply(&UserAction::EnterGuess("6824".parse().unwrap()))
            .unwrap();
        let outcome = game.submit_guess().unwrap();
        assert!(outcome.matched);
        assert_eq!(outcome.attempts, 2);
        assert!(game.is_won());
    }

    #[test]
    fn test_submit_incomplete_guess_is_rejected() {
        let mut game = fixed_game();
        game.apply(&UserAction::SetDigit {
            position: 0,
            digit: 6,
        })
        .unwrap();
        assert_eq!(
            game.apply(&UserAction::Submit),
            Err(GameError::IncompleteGuess { filled: 1 })
        );
        assert_eq!(game.attempts(), 0);
    }

    #[test]
    fn test_mark_clue_wrong_defaults_to_nothing_correct() {
        let mut game = fixed_game();
        let ActionOutcome::Flags(flags) = game.apply(&UserAction::MarkClueWrong(None)).unwrap()
        else {
            panic!("expected flags");
        };
        assert!(!flags.mark_all_wrong_enabled);
        assert!(
            game.board().clues()[3]
                .numbers
                .iter()
                .all(|n| n.state == MarkState::Wrong)
        );
    }

    #[test]
    fn test_hint_counts_consistent_codes() {
        let mut game = fixed_game();
        let ActionOutcome::Hint(remaining) = game.apply(&UserAction::Hint).unwrap() else {
            panic!("expected a hint");
        };
        assert!(remaining >= 1);
        assert!(remaining < 5040);
    }

    #[test]
    fn test_game_loop_reports_errors_and_exits() {
        let generator = ClueGenerator::new(GeneratorConfig {
            coverage: CoveragePolicy::Redraw,
            ..GeneratorConfig::default()
        });
        let mut interface = ScriptedInterface::new(vec![
            None,
            Some(UserAction::MarkCorrect),
            Some(UserAction::Select { clue: 0, number: 0 }),
            Some(UserAction::Exit),
        ]);
        game_loop(&generator, &mut StdRng::seed_from_u64(4), &mut interface);

        let events = &interface.events;
        assert_eq!(events[0], Event::Round);
        assert!(matches!(events[1], Event::Flags(_)));
        assert_eq!(events[2], Event::Error(GameError::InvalidSelection));
        assert_eq!(events[3], Event::Round);
        assert!(matches!(events[4], Event::Flags(f) if f.markup_enabled));
        assert_eq!(events.last(), Some(&Event::Exit));
    }

    #[test]
    fn test_game_loop_new_game_regenerates() {
        let generator = ClueGenerator::default();
        let mut interface = ScriptedInterface::new(vec![Some(UserAction::NewGame)]);
        game_loop(&generator, &mut StdRng::seed_from_u64(8), &mut interface);

        let rounds = interface
            .events
            .iter()
            .filter(|e| matches!(e, Event::Round))
            .count();
        assert_eq!(rounds, 2);
        assert!(interface.events.contains(&Event::NewGame));
    }

    #[test]
    fn test_game_loop_generation_failure_is_recoverable() {
        let generator = ClueGenerator::new(GeneratorConfig {
            max_attempts: 0,
            ..GeneratorConfig::default()
        });
        let mut interface = ScriptedInterface::new(vec![
            Some(UserAction::Hint),
            Some(UserAction::NewGame),
        ]);
        game_loop(&generator, &mut StdRng::seed_from_u64(0), &mut interface);

        let errors = interface
            .events
            .iter()
            .filter(|e| matches!(e, Event::Error(GameError::GenerationFailed { .. })))
            .count();
        assert_eq!(errors, 3);
        assert_eq!(interface.events.last(), Some(&Event::Exit));
    }
}
