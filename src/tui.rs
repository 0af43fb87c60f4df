//! TUI (Terminal User Interface) module for the code breaker
//!
//! This module provides an interactive terminal interface using Ratatui.
//!
//! # Architecture
//! - `TuiInterface`: terminal setup, rendering, and the `GameInterface` impl
//! - `Cursor`: keyboard focus over the clue digits and guess positions,
//!   turning key presses into `UserAction`s
//!
//! The interface keeps a snapshot of the last displayed round, so rendering
//! never needs the game itself.

use crate::board::{Flags, GuessForm};
use crate::clue::{Clue, MarkState, SlotRef};
use crate::code::CODE_LENGTH;
use crate::error::GameError;
use crate::game_state::{Game, GameInterface, GuessOutcome, UserAction};
use crate::{debug_log, info_log};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io;

const EVENT_POLL_TIMEOUT_MS: u64 = 100;
const ASCII_CONTROL_CHAR_THRESHOLD: u32 = 32;

// Style constants for consistent UI
const HEADER_STYLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
const ERROR_STYLE: Style = Style::new().fg(Color::Red);
const INFO_STYLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
const MESSAGE_STYLE: Style = Style::new().fg(Color::Cyan);
const DISABLED_STYLE: Style = Style::new().fg(Color::DarkGray);

fn mark_colors(state: MarkState) -> (Color, Color) {
    match state {
        MarkState::Default => (Color::DarkGray, Color::White),
        MarkState::Correct => (Color::Green, Color::Black),
        MarkState::Misplaced => (Color::Yellow, Color::Black),
        MarkState::Wrong => (Color::Gray, Color::Black),
    }
}

/// Keyboard focus: one clue digit and one guess position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Cursor {
    clue: usize,
    number: usize,
    position: usize,
}

impl Cursor {
    fn focused(self) -> SlotRef {
        SlotRef {
            clue: self.clue,
            number: self.number,
        }
    }

    fn move_by(&mut self, clue_delta: isize, number_delta: isize, clue_count: usize) {
        let wrap = |value: usize, delta: isize, len: usize| {
            if len == 0 {
                return 0;
            }
            (value as isize + delta).rem_euclid(len as isize) as usize
        };
        self.clue = wrap(self.clue, clue_delta, clue_count);
        self.number = wrap(self.number, number_delta, CODE_LENGTH);
    }

    /// Maps a key press to an action, moving the cursor as a side effect.
    fn map_key(
        &mut self,
        key: KeyEvent,
        guess: &GuessForm,
        clue_count: usize,
    ) -> Option<UserAction> {
        if key.modifiers.contains(KeyModifiers::ALT)
            || key.modifiers.contains(KeyModifiers::CONTROL)
        {
            debug_log!("map_key() - Ignoring key with modifier: {:?}", key.modifiers);
            return None;
        }

        match key.code {
            KeyCode::Up => self.move_by(-1, 0, clue_count),
            KeyCode::Down => self.move_by(1, 0, clue_count),
            KeyCode::Left => self.move_by(0, -1, clue_count),
            KeyCode::Right => self.move_by(0, 1, clue_count),
            KeyCode::Char(' ') => {
                return Some(UserAction::Select {
                    clue: self.clue,
                    number: self.number,
                });
            }
            KeyCode::Char('c' | 'C') => return Some(UserAction::MarkCorrect),
            KeyCode::Char('m' | 'M') => return Some(UserAction::MarkMisplaced),
            KeyCode::Char('w' | 'W') => return Some(UserAction::MarkWrong),
            KeyCode::Char('a' | 'A') => return Some(UserAction::MarkClueWrong(None)),
            KeyCode::Char('r' | 'R') => return Some(UserAction::Reset),
            KeyCode::Char('h' | 'H') => return Some(UserAction::Hint),
            KeyCode::Char('n' | 'N') => {
                *self = Self::default();
                return Some(UserAction::NewGame);
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let position = self.position;
                self.position = (self.position + 1).min(CODE_LENGTH - 1);
                return Some(UserAction::SetDigit {
                    position,
                    digit: c as u8 - b'0',
                });
            }
            KeyCode::Backspace => {
                if guess.get(self.position).is_none() && self.position > 0 {
                    self.position -= 1;
                }
                return Some(UserAction::ClearDigit(self.position));
            }
            KeyCode::Tab => self.position = (self.position + 1) % CODE_LENGTH,
            KeyCode::Enter => return Some(UserAction::Submit),
            KeyCode::Esc => return Some(UserAction::Exit),
            _ => {
                debug_log!("map_key() - Ignoring key: {:?}", key.code);
            }
        }
        None
    }
}

/// Context for rendering the UI - groups related parameters to avoid too many function arguments.
struct RenderContext<'a> {
    clues: &'a [Clue],
    selected: Option<SlotRef>,
    guess: &'a GuessForm,
    cursor: Cursor,
    flags: Option<Flags>,
    message: &'a str,
    error_message: &'a str,
    status: &'a str,
}

/// Main TUI interface component.
///
/// Manages terminal rendering, input handling, and round display.
pub struct TuiInterface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    clues: Vec<Clue>,
    selected: Option<SlotRef>,
    guess: GuessForm,
    cursor: Cursor,
    flags: Option<Flags>,
    message: String,
    error_message: String,
    status: String,
}

impl TuiInterface {
    pub fn new() -> Result<Self, io::Error> {
        info_log!("TuiInterface::new() - Initializing TUI");
        enable_raw_mode()?;
        info_log!("Raw mode enabled");
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        info_log!("Terminal setup complete: alternate screen, cursor hidden");
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        info_log!("Terminal backend created");

        Ok(Self {
            terminal,
            clues: Vec::new(),
            selected: None,
            guess: GuessForm::new(),
            cursor: Cursor::default(),
            flags: None,
            message: String::new(),
            error_message: String::new(),
            status: "Generating clues...".to_string(),
        })
    }

    pub fn cleanup(&mut self) -> Result<(), io::Error> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }

    /// Draw the current UI state to the terminal.
    fn draw(&mut self) -> Result<(), io::Error> {
        let ctx = RenderContext {
            clues: &self.clues,
            selected: self.selected,
            guess: &self.guess,
            cursor: self.cursor,
            flags: self.flags,
            message: &self.message,
            error_message: &self.error_message,
            status: &self.status,
        };

        self.terminal.draw(|f| {
            Self::render_static(f, &ctx);
        })?;
        Ok(())
    }

    fn draw_or_log(&mut self) {
        if let Err(e) = self.draw() {
            debug_log!("Draw error: {}", e);
        }
    }

    fn render_static(f: &mut Frame, ctx: &RenderContext) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),  // Title
                Constraint::Length(13), // Clues and guess
                Constraint::Min(5),     // Info panel
                Constraint::Length(3),  // Status line
                Constraint::Length(4),  // Instructions
            ])
            .split(f.area());

        Self::render_title(f, chunks[0]);
        Self::render_board(f, chunks[1], ctx);
        Self::render_info(f, chunks[2], ctx.message, ctx.error_message);
        Self::render_status(f, chunks[3], ctx.status);
        Self::render_instructions(f, chunks[4], ctx.flags);
    }

    fn render_title(f: &mut Frame, area: Rect) {
        let title = Paragraph::new("CODE BREAKER")
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, area);
    }

    fn clue_line<'a>(clue: &'a Clue, index: usize, ctx: &RenderContext) -> Line<'a> {
        let mut spans = vec![Span::raw(format!("  {}. ", index + 1))];
        for (n, number) in clue.numbers.iter().enumerate() {
            let slot = SlotRef {
                clue: index,
                number: n,
            };
            let (bg, fg) = mark_colors(number.state);
            let mut style = Style::default().fg(fg).bg(bg);
            if ctx.selected == Some(slot) {
                style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
            }
            let (open, close) = if ctx.cursor.focused() == slot {
                ('>', '<')
            } else {
                (' ', ' ')
            };
            spans.push(Span::styled(
                format!("{open}{}{close}", number.value),
                style,
            ));
            spans.push(Span::raw(" "));
        }
        spans.push(Span::raw(format!("  {}", clue.label())));
        Line::from(spans)
    }

    fn guess_line(guess: &GuessForm, position: usize) -> Line<'static> {
        let mut spans = vec![Span::raw("  Guess: ")];
        for i in 0..CODE_LENGTH {
            let digit = guess.get(i).map_or('_', |d| char::from(b'0' + d));
            let style = if i == position {
                Style::default().fg(Color::Black).bg(Color::White)
            } else {
                Style::default().fg(Color::White).bg(Color::DarkGray)
            };
            spans.push(Span::styled(format!(" {digit} "), style));
            spans.push(Span::raw(" "));
        }
        Line::from(spans)
    }

    fn render_board(f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let mut lines = Vec::new();
        for (i, clue) in ctx.clues.iter().enumerate() {
            lines.push(Self::clue_line(clue, i, ctx));
            lines.push(Line::from(""));
        }
        lines.push(Self::guess_line(ctx.guess, ctx.cursor.position));

        let paragraph =
            Paragraph::new(lines).block(Block::default().title("Clues").borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_info(f: &mut Frame, area: Rect, message: &str, error_message: &str) {
        let mut lines = Vec::new();
        if !message.is_empty() {
            lines.push(Line::from(vec![Span::styled(message, MESSAGE_STYLE)]));
        }
        if !error_message.is_empty() {
            lines.push(Line::from(vec![Span::styled(error_message, ERROR_STYLE)]));
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().title("Information").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_instructions(f: &mut Frame, area: Rect, flags: Option<Flags>) {
        let enabled = |on: bool, text: &'static str| {
            Span::styled(text, if on { INFO_STYLE } else { DISABLED_STYLE })
        };
        let flags = flags.unwrap_or(Flags {
            markup_enabled: false,
            mark_all_wrong_enabled: false,
            reset_enabled: false,
        });
        let markup = Line::from(vec![
            Span::raw("ARROWS: Move | SPACE: Select | "),
            enabled(flags.markup_enabled, "C/M/W: Correct/Misplaced/Wrong"),
            Span::raw(" | "),
            enabled(flags.mark_all_wrong_enabled, "A: All wrong"),
            Span::raw(" | "),
            enabled(flags.reset_enabled, "R: Reset"),
        ]);
        let guess = Line::from(concat!(
            "0-9: Fill guess | BACKSPACE: Clear | TAB: Next slot | ",
            "ENTER: Submit | H: Hint | N: New | ESC: Quit",
        ));

        let paragraph = Paragraph::new(vec![markup, guess])
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_status(f: &mut Frame, area: Rect, status: &str) {
        let status_text = if status.is_empty() { "Ready" } else { status };
        let paragraph = Paragraph::new(status_text)
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL).title("Status"));
        f.render_widget(paragraph, area);
    }

    fn handle_input(&mut self) -> Result<Option<UserAction>, io::Error> {
        if !event::poll(std::time::Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            return Ok(None);
        }

        let event = event::read()?;
        debug_log!("handle_input() - Event received: {:?}", event);

        match event {
            Event::Mouse(_) | Event::FocusGained | Event::FocusLost | Event::Paste(_) => {
                debug_log!("handle_input() - Ignoring non-key event");
                Ok(None)
            }
            Event::Resize(_, _) => {
                self.draw_or_log();
                Ok(None)
            }
            Event::Key(key) => {
                // Only Press events, so a key never registers twice
                if key.kind != event::KeyEventKind::Press {
                    debug_log!(
                        "handle_input() - Ignoring non-Press key event: {:?}",
                        key.kind
                    );
                    return Ok(None);
                }

                // Alt-tab can leak replacement or control characters
                if let KeyCode::Char(c) = key.code
                    && (c == '\u{FFFD}' || (c as u32) < ASCII_CONTROL_CHAR_THRESHOLD)
                {
                    debug_log!(
                        "handle_input() - Ignoring invalid character from escape sequence: {:?}",
                        c
                    );
                    return Ok(None);
                }

                debug_log!(
                    "handle_input() - Key event received: code={:?}, modifiers={:?}",
                    key.code,
                    key.modifiers
                );
                self.error_message.clear();
                let action = self.cursor.map_key(key, &self.guess, self.clues.len());
                if action.is_none() {
                    self.draw_or_log();
                }
                Ok(action)
            }
        }
    }
}

impl GameInterface for TuiInterface {
    fn display_round(&mut self, game: &Game) {
        let board = game.board();
        self.clues = board.clues().to_vec();
        self.selected = board.selected();
        self.guess = *board.guess();
        self.status = match board.selected() {
            Some(slot) => format!("Selected clue {} digit {}", slot.clue + 1, slot.number + 1),
            None => format!("Guesses so far: {}", game.attempts()),
        };
        self.draw_or_log();
    }

    fn read_action(&mut self) -> Option<UserAction> {
        info_log!("read_action() - Starting input loop");
        loop {
            if self.draw().is_err() {
                info_log!("read_action() - Draw failed, returning Exit");
                return Some(UserAction::Exit);
            }

            match self.handle_input() {
                Ok(Some(action)) => {
                    info_log!("read_action() - Action received: {:?}", action);
                    return Some(action);
                }
                Ok(None) => {}
                Err(e) => {
                    info_log!("read_action() - Error handling input: {}, returning Exit", e);
                    return Some(UserAction::Exit);
                }
            }
        }
    }

    fn display_flags(&mut self, flags: &Flags) {
        self.flags = Some(*flags);
        self.draw_or_log();
    }

    fn display_result(&mut self, outcome: &GuessOutcome) {
        if outcome.matched {
            self.message = format!(
                "✓ {} is the code! Solved in {} guess(es). Press N for a new game.",
                outcome.guess, outcome.attempts
            );
            self.status = "Solved".to_string();
        } else {
            self.message = format!("{} is not the code.", outcome.guess);
            self.status = format!("Guesses so far: {}", outcome.attempts);
        }
        self.draw_or_log();
    }

    fn display_hint(&mut self, remaining: usize) {
        self.message = format!("{remaining} code(s) still fit the clues.");
        self.draw_or_log();
    }

    fn display_error(&mut self, error: &GameError) {
        self.error_message = error.to_string();
        self.draw_or_log();
    }

    fn display_new_game(&mut self) {
        self.clues.clear();
        self.selected = None;
        self.guess = GuessForm::new();
        self.cursor = Cursor::default();
        self.flags = None;
        self.message = "New game started.".to_string();
        self.error_message.clear();
        self.status = "Generating clues...".to_string();
        self.draw_or_log();
    }

    fn display_exit_message(&mut self) {
        self.message = "Exiting...".to_string();
        self.status = "Exiting application...".to_string();
        self.draw_or_log();
    }
}

impl Drop for TuiInterface {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
