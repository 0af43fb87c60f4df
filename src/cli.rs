use crate::board::Flags;
use crate::clue::{ClueNumber, MarkState};
use crate::code::{CODE_LENGTH, Code};
use crate::error::GameError;
use crate::game_state::{Game, GameInterface, GuessOutcome, UserAction};
use crate::generator::{CoveragePolicy, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_ROUNDS, GeneratorConfig};
use clap::{Parser, ValueEnum};
use std::io::BufRead;
use std::path::PathBuf;

/// How to handle code digits that no clue shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CoverageArg {
    /// Overwrite a clue slot with the missing digit (clue labels may become wrong)
    Patch,
    /// Draw the clues again until every code digit appears
    Redraw,
}

impl From<CoverageArg> for CoveragePolicy {
    fn from(arg: CoverageArg) -> Self {
        match arg {
            CoverageArg::Patch => Self::Patch,
            CoverageArg::Redraw => Self::Redraw,
        }
    }
}

/// Code breaker: deduce a 4-digit code from five clues
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Seed for reproducible rounds
    #[arg(long)]
    pub seed: Option<u64>,

    /// Guesses drawn per clue before generation gives up
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: usize,

    /// What to do when a code digit appears in no clue
    #[arg(long, value_enum, default_value_t = CoverageArg::Redraw)]
    pub coverage: CoverageArg,

    /// Line-oriented interface instead of the terminal UI
    #[arg(long)]
    pub plain: bool,

    /// Log file path (defaults to the user cache dir in terminal UI mode)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    #[must_use]
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            max_attempts: self.max_attempts,
            max_rounds: DEFAULT_MAX_ROUNDS,
            require_progress: true,
            coverage: self.coverage.into(),
        }
    }
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

const HELP: &str = "\
Commands (clues, numbers and positions count from 1):
  select <clue> <number>   select or deselect a clue digit (s)
  correct | misplaced | wrong   mark the selected digit (c, m, w)
  clue-wrong [<clue>]      mark a whole clue wrong (a)
  reset                    clear all markup (r)
  set <position> <digit>   fill one guess position
  clear <position>         empty one guess position
  guess <dddd>             fill the whole guess (g)
  submit                   check the guess
  hint                     count the codes that still fit (h)
  next                     start a new game (n)
  exit                     quit (q)";

fn parse_index(arg: Option<&str>, what: &str) -> Result<usize, String> {
    let arg = arg.ok_or_else(|| format!("Missing {what}."))?;
    match arg.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(format!("Invalid {what} '{arg}', expected a number from 1.")),
    }
}

fn parse_digit(arg: Option<&str>) -> Result<u8, String> {
    let arg = arg.ok_or_else(|| "Missing digit.".to_string())?;
    match arg.parse::<u8>() {
        Ok(d) if d <= 9 => Ok(d),
        _ => Err(format!("Invalid digit '{arg}'.")),
    }
}

/// Decodes one input line into an action.
pub fn parse_command(line: &str) -> Result<UserAction, String> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Err("Enter a command, or 'help'.".to_string());
    };
    let action = match command.to_lowercase().as_str() {
        "select" | "s" => UserAction::Select {
            clue: parse_index(words.next(), "clue")?,
            number: parse_index(words.next(), "number")?,
        },
        "correct" | "c" => UserAction::MarkCorrect,
        "misplaced" | "m" => UserAction::MarkMisplaced,
        "wrong" | "w" => UserAction::MarkWrong,
        "clue-wrong" | "a" => match words.next() {
            Some(arg) => UserAction::MarkClueWrong(Some(parse_index(Some(arg), "clue")?)),
            None => UserAction::MarkClueWrong(None),
        },
        "reset" | "r" => UserAction::Reset,
        "set" => UserAction::SetDigit {
            position: parse_index(words.next(), "position")?,
            digit: parse_digit(words.next())?,
        },
        "clear" => UserAction::ClearDigit(parse_index(words.next(), "position")?),
        "guess" | "g" => {
            let arg = words.next().ok_or_else(|| "Missing guess.".to_string())?;
            let code: Code = arg.parse().map_err(|_| {
                format!("Invalid guess '{arg}'. Enter {CODE_LENGTH} distinct digits.")
            })?;
            UserAction::EnterGuess(code)
        }
        "submit" => UserAction::Submit,
        "hint" | "h" => UserAction::Hint,
        "next" | "n" => UserAction::NewGame,
        "exit" | "quit" | "q" => UserAction::Exit,
        other => return Err(format!("Unknown command '{other}'. Type 'help' for a list.")),
    };
    if words.next().is_some() {
        return Err(format!("Too many arguments for '{command}'."));
    }
    Ok(action)
}

fn format_number(number: &ClueNumber, selected: bool) -> String {
    let mark = match number.state {
        MarkState::Default => ' ',
        MarkState::Correct => '+',
        MarkState::Misplaced => '~',
        MarkState::Wrong => 'x',
    };
    if selected {
        format!("[{}{mark}]", number.value)
    } else {
        format!(" {}{mark} ", number.value)
    }
}

pub fn display_round(game: &Game) {
    let board = game.board();
    println!();
    for (i, clue) in board.clues().iter().enumerate() {
        let numbers: String = clue
            .numbers
            .iter()
            .enumerate()
            .map(|(n, number)| {
                let selected = board.selected().is_some_and(|s| s.clue == i && s.number == n);
                format_number(number, selected)
            })
            .collect();
        println!("{}. {numbers}  {}", i + 1, clue.label());
    }
    println!("Guess: {}", board.guess());
}

pub fn display_flags(flags: &Flags) {
    let mut actions = Vec::new();
    if flags.markup_enabled {
        actions.push("correct/misplaced/wrong");
    }
    if flags.mark_all_wrong_enabled {
        actions.push("clue-wrong");
    }
    if flags.reset_enabled {
        actions.push("reset");
    }
    actions.extend(["guess", "submit", "hint", "next", "exit"]);
    println!("Available: {}", actions.join(", "));
}

pub fn display_result(outcome: &GuessOutcome) {
    if outcome.matched {
        println!(
            "{} is the code! Solved after {} guess(es). Type 'next' for a new game.",
            outcome.guess, outcome.attempts
        );
    } else {
        println!("{} is not the code (guess {}).", outcome.guess, outcome.attempts);
    }
}

pub fn display_hint(remaining: usize) {
    println!("{remaining} code(s) still fit the clues.");
}

pub fn display_error(error: &GameError) {
    println!("Error: {error}");
}

pub fn display_new_game_message() {
    println!("New game started.");
}

pub fn display_exit_message() {
    println!("Exiting.");
}

/// CLI implementation of the `GameInterface` trait over any `BufRead`.
pub struct CliInterface<R: BufRead> {
    reader: R,
}

impl<R: BufRead> CliInterface<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> GameInterface for CliInterface<R> {
    fn display_round(&mut self, game: &Game) {
        display_round(game);
    }

    fn read_action(&mut self) -> Option<UserAction> {
        println!("\nEnter a command ('help' for a list):");
        let mut input = String::new();
        match self.reader.read_line(&mut input) {
            // end of input ends the session
            Ok(0) | Err(_) => return Some(UserAction::Exit),
            Ok(_) => {}
        }
        let input = input.trim();
        if input.eq_ignore_ascii_case("help") {
            println!("{HELP}");
            return None;
        }
        match parse_command(input) {
            Ok(action) => Some(action),
            Err(message) => {
                println!("{message}");
                None
            }
        }
    }

    fn display_flags(&mut self, flags: &Flags) {
        display_flags(flags);
    }

    fn display_result(&mut self, outcome: &GuessOutcome) {
        display_result(outcome);
    }

    fn display_hint(&mut self, remaining: usize) {
        display_hint(remaining);
    }

    fn display_error(&mut self, error: &GameError) {
        display_error(error);
    }

    fn display_new_game(&mut self) {
        display_new_game_message();
    }

    fn display_exit_message(&mut self) {
        display_exit_message();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_cli_defaults() {
        let cli = Cli::parse_from(["codebreaker"]);
        assert_eq!(cli.seed, None);
        assert_eq!(cli.max_attempts, DEFAULT_MAX_ATTEMPTS);
        assert_eq!(cli.coverage, CoverageArg::Redraw);
        assert!(!cli.plain);
        assert_eq!(cli.generator_config().coverage, CoveragePolicy::Redraw);
    }

    #[test]
    fn test_parse_cli_with_options() {
        let cli = Cli::parse_from([
            "codebreaker",
            "--seed",
            "42",
            "--coverage",
            "patch",
            "--max-attempts",
            "50",
            "--plain",
            "-v",
        ]);
        assert_eq!(cli.seed, Some(42));
        assert!(cli.plain);
        assert!(cli.verbose);
        let config = cli.generator_config();
        assert_eq!(config.coverage, CoveragePolicy::Patch);
        assert_eq!(config.max_attempts, 50);
    }

    #[test]
    fn test_parse_select_is_one_based() {
        assert_eq!(
            parse_command("select 2 4"),
            Ok(UserAction::Select { clue: 1, number: 3 })
        );
        assert_eq!(
            parse_command("S 1 1"),
            Ok(UserAction::Select { clue: 0, number: 0 })
        );
        assert!(parse_command("select 0 1").is_err());
        assert!(parse_command("select 1").is_err());
        assert!(parse_command("select 1 2 3").is_err());
    }

    #[test]
    fn test_parse_markup_commands() {
        assert_eq!(parse_command("c"), Ok(UserAction::MarkCorrect));
        assert_eq!(parse_command("misplaced"), Ok(UserAction::MarkMisplaced));
        assert_eq!(parse_command("W"), Ok(UserAction::MarkWrong));
        assert_eq!(parse_command("clue-wrong"), Ok(UserAction::MarkClueWrong(None)));
        assert_eq!(parse_command("a 4"), Ok(UserAction::MarkClueWrong(Some(3))));
        assert_eq!(parse_command("reset"), Ok(UserAction::Reset));
    }

    #[test]
    fn test_parse_guess_commands() {
        assert_eq!(
            parse_command("set 3 7"),
            Ok(UserAction::SetDigit {
                position: 2,
                digit: 7
            })
        );
        assert!(parse_command("set 3 10").is_err());
        assert_eq!(parse_command("clear 1"), Ok(UserAction::ClearDigit(0)));
        assert_eq!(
            parse_command("guess 3841"),
            Ok(UserAction::EnterGuess("3841".parse().unwrap()))
        );
        assert!(parse_command("guess 3341").is_err());
        assert!(parse_command("guess 384").is_err());
        assert_eq!(parse_command("submit"), Ok(UserAction::Submit));
    }

    #[test]
    fn test_parse_session_commands() {
        assert_eq!(parse_command("hint"), Ok(UserAction::Hint));
        assert_eq!(parse_command("next"), Ok(UserAction::NewGame));
        assert_eq!(parse_command("EXIT"), Ok(UserAction::Exit));
        assert_eq!(parse_command("q"), Ok(UserAction::Exit));
        assert!(parse_command("").is_err());
        assert!(parse_command("dance").is_err());
    }

    #[test]
    fn test_read_action_valid_command() {
        let mut interface = CliInterface::new(Cursor::new("  correct  \n"));
        assert_eq!(interface.read_action(), Some(UserAction::MarkCorrect));
    }

    #[test]
    fn test_read_action_invalid_then_valid() {
        let mut interface = CliInterface::new(Cursor::new("bogus\nhelp\nnext\n"));
        assert_eq!(interface.read_action(), None);
        assert_eq!(interface.read_action(), None);
        assert_eq!(interface.read_action(), Some(UserAction::NewGame));
    }

    #[test]
    fn test_read_action_end_of_input_exits() {
        let mut interface = CliInterface::new(Cursor::new(""));
        assert_eq!(interface.read_action(), Some(UserAction::Exit));
    }

    #[test]
    fn test_format_number_marks_state_and_selection() {
        let number = ClueNumber {
            value: 7,
            position: 0,
            state: MarkState::Wrong,
        };
        assert_eq!(format_number(&number, false), " 7x ");
        assert_eq!(format_number(&number, true), "[7x]");
    }
}
