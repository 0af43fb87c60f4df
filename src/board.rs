//! Player markup over the clues of a round.
//!
//! The board owns the single selection, the per-digit markup and the guess
//! form. Marking a digit correct or wrong propagates to every other slot
//! holding the same digit value, found through a digit index built once per
//! round.

use crate::clue::{Clue, ClueNumber, MarkState, SlotRef};
use crate::code::{CODE_LENGTH, Code, DIGIT_COUNT, check_answer};
use crate::error::GameError;
use crate::profile::ClueProfile;
use log::debug;
use std::collections::HashMap;
use std::fmt;

/// UI enablement derived from the current markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flags {
    pub markup_enabled: bool,
    pub mark_all_wrong_enabled: bool,
    pub reset_enabled: bool,
}

/// The four guess input positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GuessForm([Option<u8>; CODE_LENGTH]);

impl GuessForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, position: usize) -> Option<u8> {
        self.0.get(position).copied().flatten()
    }

    pub fn set(&mut self, position: usize, digit: u8) -> Result<(), GameError> {
        if digit >= DIGIT_COUNT {
            return Err(GameError::InvalidCode(digit.to_string()));
        }
        let slot = self
            .0
            .get_mut(position)
            .ok_or(GameError::UnknownPosition(position))?;
        *slot = Some(digit);
        Ok(())
    }

    pub fn clear(&mut self, position: usize) -> Result<(), GameError> {
        let slot = self
            .0
            .get_mut(position)
            .ok_or(GameError::UnknownPosition(position))?;
        *slot = None;
        Ok(())
    }

    pub fn clear_all(&mut self) {
        self.0 = [None; CODE_LENGTH];
    }

    #[must_use]
    pub fn filled(&self) -> usize {
        self.0.iter().filter(|d| d.is_some()).count()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.filled() == CODE_LENGTH
    }

    /// Checks the form against the code.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::IncompleteGuess`] unless every position is filled.
    pub fn submit(&self, code: &Code) -> Result<bool, GameError> {
        if !self.is_complete() {
            return Err(GameError::IncompleteGuess {
                filled: self.filled(),
            });
        }
        Ok(check_answer(&self.to_string(), code))
    }
}

impl fmt::Display for GuessForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in self.0 {
            match d {
                Some(d) => write!(f, "{d}")?,
                None => write!(f, "_")?,
            }
        }
        Ok(())
    }
}

/// Digit value to every slot holding it.
#[derive(Debug, Clone, Default)]
struct DigitIndex([Vec<SlotRef>; DIGIT_COUNT as usize]);

impl DigitIndex {
    fn build(clues: &[Clue]) -> Self {
        let mut index = Self::default();
        for (clue, c) in clues.iter().enumerate() {
            for (number, n) in c.numbers.iter().enumerate() {
                index.0[usize::from(n.value)].push(SlotRef { clue, number });
            }
        }
        index
    }

    fn occurrences(&self, digit: u8) -> &[SlotRef] {
        &self.0[usize::from(digit)]
    }
}

#[derive(Debug, Clone)]
pub struct Board {
    clues: Vec<Clue>,
    index: DigitIndex,
    selected: Option<SlotRef>,
    guess: GuessForm,
    nothing_correct: Option<usize>,
    /// States of a digit's slots from before one of them was marked correct.
    saved: HashMap<SlotRef, Vec<(SlotRef, MarkState)>>,
}

impl Board {
    #[must_use]
    pub fn new(clues: Vec<Clue>) -> Self {
        let index = DigitIndex::build(&clues);
        let nothing_correct = clues
            .iter()
            .position(|clue| clue.profile == ClueProfile::NOTHING_CORRECT);
        Self {
            clues,
            index,
            selected: None,
            guess: GuessForm::new(),
            nothing_correct,
            saved: HashMap::new(),
        }
    }

    #[must_use]
    pub fn clues(&self) -> &[Clue] {
        &self.clues
    }

    #[must_use]
    pub fn number(&self, slot: SlotRef) -> Option<&ClueNumber> {
        self.clues.get(slot.clue)?.numbers.get(slot.number)
    }

    #[must_use]
    pub fn selected(&self) -> Option<SlotRef> {
        self.selected
    }

    #[must_use]
    pub fn guess(&self) -> &GuessForm {
        &self.guess
    }

    pub fn guess_mut(&mut self) -> &mut GuessForm {
        &mut self.guess
    }

    #[must_use]
    pub fn nothing_correct_clue(&self) -> Option<usize> {
        self.nothing_correct
    }

    #[must_use]
    pub fn flags(&self) -> Flags {
        let mark_all_wrong_enabled = self.nothing_correct.is_some_and(|i| {
            !self.clues[i]
                .numbers
                .iter()
                .all(|n| n.state == MarkState::Wrong)
        });
        Flags {
            markup_enabled: self.selected.is_some(),
            mark_all_wrong_enabled,
            reset_enabled: !self.clues.iter().all(Clue::is_untouched),
        }
    }

    /// Toggles the selection of one clue digit. Selecting a digit drops any
    /// other selection.
    pub fn select(&mut self, clue: usize, number: usize) -> Result<Flags, GameError> {
        let slot = self.slot(clue, number)?;
        self.selected = if self.selected == Some(slot) {
            None
        } else {
            Some(slot)
        };
        Ok(self.flags())
    }

    /// Toggles the selected slot into and out of correct.
    ///
    /// Marking correct forces every other slot with the same digit to
    /// misplaced and fills the guess form at the slot's position. Toggling
    /// back restores the states those slots had before and clears the
    /// position.
    pub fn mark_correct(&mut self) -> Result<Flags, GameError> {
        let slot = self.require_selection()?;
        let digit = self.value(slot);
        let occurrences = self.index.occurrences(digit).to_vec();

        if self.state(slot) == MarkState::Correct {
            let saved = self.saved.remove(&slot).unwrap_or_else(|| {
                occurrences
                    .iter()
                    .map(|&s| (s, MarkState::Default))
                    .collect()
            });
            for (s, state) in saved {
                self.set_state(s, state);
                if state == MarkState::Correct {
                    self.guess.0[s.number] = Some(digit);
                }
            }
        } else {
            let saved: Vec<(SlotRef, MarkState)> =
                occurrences.iter().map(|&s| (s, self.state(s))).collect();
            for &other in occurrences.iter().filter(|&&s| s != slot) {
                self.set_state(other, MarkState::Misplaced);
            }
            self.set_state(slot, MarkState::Correct);
            self.guess.0[slot.number] = Some(digit);
            self.saved.insert(slot, saved);
        }
        debug!("mark_correct {digit} at clue {} slot {}", slot.clue, slot.number);
        Ok(self.flags())
    }

    /// Toggles only the selected slot between default and misplaced.
    pub fn mark_misplaced(&mut self) -> Result<Flags, GameError> {
        let slot = self.require_selection()?;
        let next = toggled(self.state(slot), MarkState::Misplaced);
        self.set_state(slot, next);
        Ok(self.flags())
    }

    /// Toggles every slot holding the selected digit between default and
    /// wrong, in lockstep with the selected slot.
    pub fn mark_wrong(&mut self) -> Result<Flags, GameError> {
        let slot = self.require_selection()?;
        let digit = self.value(slot);
        let next = toggled(self.state(slot), MarkState::Wrong);
        self.set_digit_state(digit, next);
        debug!("mark_wrong {digit} -> {next:?}");
        Ok(self.flags())
    }

    /// Marks every digit of `clue`, and every other occurrence of those
    /// digits, as wrong.
    pub fn mark_entire_clue_wrong(&mut self, clue: usize) -> Result<Flags, GameError> {
        let digits: Vec<u8> = self
            .clues
            .get(clue)
            .ok_or(GameError::UnknownClue(clue))?
            .numbers
            .iter()
            .map(|n| n.value)
            .collect();
        for digit in digits {
            self.set_digit_state(digit, MarkState::Wrong);
        }
        Ok(self.flags())
    }

    pub fn reset_all(&mut self) -> Flags {
        for clue in &mut self.clues {
            for number in &mut clue.numbers {
                number.state = MarkState::Default;
            }
        }
        self.guess.clear_all();
        self.selected = None;
        self.saved.clear();
        self.flags()
    }

    fn slot(&self, clue: usize, number: usize) -> Result<SlotRef, GameError> {
        if clue >= self.clues.len() {
            return Err(GameError::UnknownClue(clue));
        }
        if number >= CODE_LENGTH {
            return Err(GameError::UnknownNumber(number));
        }
        Ok(SlotRef { clue, number })
    }

    fn require_selection(&self) -> Result<SlotRef, GameError> {
        self.selected.ok_or(GameError::InvalidSelection)
    }

    fn value(&self, slot: SlotRef) -> u8 {
        self.clues[slot.clue].numbers[slot.number].value
    }

    fn state(&self, slot: SlotRef) -> MarkState {
        self.clues[slot.clue].numbers[slot.number].state
    }

    fn set_digit_state(&mut self, digit: u8, state: MarkState) {
        let slots = self.index.occurrences(digit).to_vec();
        for slot in slots {
            self.set_state(slot, state);
        }
    }

    /// Leaving `Correct` takes the auto-filled digit back out of the form.
    fn set_state(&mut self, slot: SlotRef, state: MarkState) {
        let number = &mut self.clues[slot.clue].numbers[slot.number];
        if number.state == MarkState::Correct
            && state != MarkState::Correct
            && self.guess.0[number.position] == Some(number.value)
        {
            self.guess.0[number.position] = None;
        }
        if number.state == MarkState::Correct && state != MarkState::Correct {
            self.saved.remove(&slot);
        }
        number.state = state;
    }
}

fn toggled(current: MarkState, target: MarkState) -> MarkState {
    if current == target {
        MarkState::Default
    } else {
        target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clue(position: usize, profile: ClueProfile, guess: &str) -> Clue {
        Clue::new(position, profile, &guess.parse().unwrap())
    }

    /// Clues for the code 6824.
    fn board() -> Board {
        Board::new(vec![
            clue(0, ClueProfile::ONE_MISPLACED, "1639"),
            clue(1, ClueProfile::TWO_MISPLACED, "2961"),
            clue(2, ClueProfile::ONE_CORRECT, "5809"),
            clue(3, ClueProfile::NOTHING_CORRECT, "7591"),
            clue(4, ClueProfile::TWO_CORRECT, "6853"),
        ])
    }

    fn states_of(board: &Board, digit: u8) -> Vec<MarkState> {
        board
            .index
            .occurrences(digit)
            .iter()
            .map(|&s| board.state(s))
            .collect()
    }

    fn all_states(board: &Board) -> Vec<MarkState> {
        board
            .clues()
            .iter()
            .flat_map(|c| c.numbers.iter().map(|n| n.state))
            .collect()
    }

    #[test]
    fn test_fixture_is_consistent_with_code() {
        let secret: Code = "6824".parse().unwrap();
        assert!(board().clues().iter().all(|c| c.is_satisfied_by(&secret)));
    }

    #[test]
    fn test_initial_flags() {
        let board = board();
        assert_eq!(
            board.flags(),
            Flags {
                markup_enabled: false,
                mark_all_wrong_enabled: true,
                reset_enabled: false,
            }
        );
        assert_eq!(board.nothing_correct_clue(), Some(3));
    }

    #[test]
    fn test_select_is_single_and_toggles() {
        let mut board = board();
        assert!(board.select(0, 1).unwrap().markup_enabled);
        assert_eq!(board.selected(), Some(SlotRef { clue: 0, number: 1 }));

        board.select(2, 3).unwrap();
        assert_eq!(board.selected(), Some(SlotRef { clue: 2, number: 3 }));

        assert!(!board.select(2, 3).unwrap().markup_enabled);
        assert_eq!(board.selected(), None);
    }

    #[test]
    fn test_select_rejects_unknown_slots() {
        let mut board = board();
        assert_eq!(board.select(5, 0), Err(GameError::UnknownClue(5)));
        assert_eq!(board.select(0, 4), Err(GameError::UnknownNumber(4)));
    }

    #[test]
    fn test_markup_requires_selection() {
        let mut board = board();
        assert_eq!(board.mark_correct(), Err(GameError::InvalidSelection));
        assert_eq!(board.mark_misplaced(), Err(GameError::InvalidSelection));
        assert_eq!(board.mark_wrong(), Err(GameError::InvalidSelection));
    }

    #[test]
    fn test_mark_correct_propagates_misplaced() {
        let mut board = board();
        // the 8 of "6853" sits where the code has it
        board.select(4, 1).unwrap();
        let flags = board.mark_correct().unwrap();
        assert!(flags.reset_enabled);

        assert_eq!(board.state(SlotRef { clue: 4, number: 1 }), MarkState::Correct);
        assert_eq!(board.state(SlotRef { clue: 2, number: 1 }), MarkState::Misplaced);
        let correct = states_of(&board, 8)
            .into_iter()
            .filter(|&s| s == MarkState::Correct)
            .count();
        assert_eq!(correct, 1);
        assert_eq!(board.guess().get(1), Some(8));
    }

    #[test]
    fn test_mark_correct_twice_restores() {
        let mut board = board();
        let before = all_states(&board);
        board.select(0, 1).unwrap();
        board.mark_correct().unwrap();
        assert_ne!(all_states(&board), before);

        let flags = board.mark_correct().unwrap();
        assert_eq!(all_states(&board), before);
        assert_eq!(board.guess().get(1), None);
        assert!(!flags.reset_enabled);
    }

    #[test]
    fn test_mark_correct_twice_restores_earlier_markup() {
        let mut board = board();
        // 6 of "2961" misplaced, 6 of "6853" misplaced too
        board.select(1, 2).unwrap();
        board.mark_misplaced().unwrap();
        board.select(4, 0).unwrap();
        board.mark_misplaced().unwrap();
        let before = all_states(&board);

        // the 6 of "1639"
        board.select(0, 1).unwrap();
        board.mark_correct().unwrap();
        assert_eq!(board.state(SlotRef { clue: 0, number: 1 }), MarkState::Correct);
        board.mark_correct().unwrap();
        assert_eq!(all_states(&board), before);
        assert_eq!(board.guess().get(1), None);

        // toggling from misplaced comes back to misplaced
        board.select(4, 0).unwrap();
        board.mark_correct().unwrap();
        assert_eq!(board.guess().get(0), Some(6));
        board.mark_correct().unwrap();
        assert_eq!(all_states(&board), before);
        assert_eq!(board.guess().get(0), None);
    }

    #[test]
    fn test_reset_forgets_saved_markup() {
        let mut board = board();
        board.select(1, 2).unwrap();
        board.mark_misplaced().unwrap();
        board.select(0, 1).unwrap();
        board.mark_correct().unwrap();
        board.reset_all();

        board.select(0, 1).unwrap();
        board.mark_correct().unwrap();
        board.mark_correct().unwrap();
        assert!(board.clues().iter().all(Clue::is_untouched));
    }

    #[test]
    fn test_mark_correct_moves_between_positions() {
        let mut board = board();
        // 6 at position 1 of "1639", then at position 2 of "2961"
        board.select(0, 1).unwrap();
        board.mark_correct().unwrap();
        assert_eq!(board.guess().get(1), Some(6));

        board.select(1, 2).unwrap();
        board.mark_correct().unwrap();
        assert_eq!(board.state(SlotRef { clue: 0, number: 1 }), MarkState::Misplaced);
        assert_eq!(board.guess().get(1), None);
        assert_eq!(board.guess().get(2), Some(6));
    }

    #[test]
    fn test_mark_misplaced_does_not_propagate() {
        let mut board = board();
        board.select(0, 0).unwrap();
        board.mark_misplaced().unwrap();
        assert_eq!(
            states_of(&board, 1),
            vec![
                MarkState::Misplaced,
                MarkState::Default,
                MarkState::Default
            ]
        );
        board.mark_misplaced().unwrap();
        assert!(board.clues().iter().all(Clue::is_untouched));
    }

    #[test]
    fn test_mark_wrong_propagates_everywhere() {
        let mut board = board();
        board.select(3, 1).unwrap();
        board.mark_wrong().unwrap();
        assert!(states_of(&board, 5).iter().all(|&s| s == MarkState::Wrong));
        assert_eq!(states_of(&board, 5).len(), 3);

        board.mark_wrong().unwrap();
        assert!(states_of(&board, 5).iter().all(|&s| s == MarkState::Default));
    }

    #[test]
    fn test_mark_wrong_over_correct_clears_guess() {
        let mut board = board();
        board.select(2, 1).unwrap();
        board.mark_correct().unwrap();
        assert_eq!(board.guess().get(1), Some(8));

        board.mark_wrong().unwrap();
        assert!(states_of(&board, 8).iter().all(|&s| s == MarkState::Wrong));
        assert_eq!(board.guess().get(1), None);
    }

    #[test]
    fn test_mark_entire_clue_wrong() {
        let mut board = board();
        let flags = board.mark_entire_clue_wrong(3).unwrap();
        assert!(!flags.mark_all_wrong_enabled);
        assert!(flags.reset_enabled);
        for digit in [7, 5, 9, 1] {
            assert!(states_of(&board, digit).iter().all(|&s| s == MarkState::Wrong));
        }
        assert_eq!(board.state(SlotRef { clue: 4, number: 1 }), MarkState::Default);
        assert_eq!(
            board.mark_entire_clue_wrong(9),
            Err(GameError::UnknownClue(9))
        );
    }

    #[test]
    fn test_mark_all_wrong_flag_tracks_nothing_correct_clue() {
        let mut board = board();
        board.mark_entire_clue_wrong(3).unwrap();
        board.select(3, 0).unwrap();
        let flags = board.mark_wrong().unwrap();
        assert!(flags.mark_all_wrong_enabled);
    }

    #[test]
    fn test_reset_all() {
        let mut board = board();
        board.select(4, 1).unwrap();
        board.mark_correct().unwrap();
        board.mark_entire_clue_wrong(3).unwrap();
        board.guess_mut().set(0, 6).unwrap();

        let flags = board.reset_all();
        assert!(all_states(&board).iter().all(|&s| s == MarkState::Default));
        assert_eq!(board.guess().filled(), 0);
        assert_eq!(board.selected(), None);
        assert_eq!(
            flags,
            Flags {
                markup_enabled: false,
                mark_all_wrong_enabled: true,
                reset_enabled: false,
            }
        );
    }

    #[test]
    fn test_guess_form_submit() {
        let secret: Code = "6824".parse().unwrap();
        let mut form = GuessForm::new();
        form.set(0, 6).unwrap();
        form.set(1, 8).unwrap();
        assert_eq!(form.to_string(), "68__");
        assert_eq!(
            form.submit(&secret),
            Err(GameError::IncompleteGuess { filled: 2 })
        );

        form.set(2, 2).unwrap();
        form.set(3, 4).unwrap();
        assert_eq!(form.submit(&secret), Ok(true));

        form.set(3, 1).unwrap();
        assert_eq!(form.submit(&secret), Ok(false));

        assert_eq!(form.set(4, 1), Err(GameError::UnknownPosition(4)));
        assert!(form.set(0, 10).is_err());
        form.clear(0).unwrap();
        assert_eq!(form.get(0), None);
    }
}
