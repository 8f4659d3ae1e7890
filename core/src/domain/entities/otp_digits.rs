//! Digit slots of a one-time code being typed by the user.

use serde::{Deserialize, Serialize};

use rl_shared::otp_input::numeric_chars;

/// Number of digits in a ResqLine verification code
pub const CODE_LENGTH: usize = 4;

/// Fixed-size sequence of digit slots, each empty or holding one ASCII digit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpDigits {
    slots: [Option<char>; CODE_LENGTH],
}

impl OtpDigits {
    /// Create an all-empty set of slots
    pub fn new() -> Self {
        Self::default()
    }

    /// Digit stored at `index`, `None` when empty or out of range
    pub fn get(&self, index: usize) -> Option<char> {
        self.slots.get(index).copied().flatten()
    }

    pub fn is_empty_at(&self, index: usize) -> bool {
        self.get(index).is_none()
    }

    /// True when every slot holds a digit
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn filled_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Concatenation of the filled slots in order
    pub fn code(&self) -> String {
        self.slots.iter().flatten().collect()
    }

    /// Slots rendered for UI binding: `""` or a one-digit string
    pub fn as_strings(&self) -> Vec<String> {
        self.slots
            .iter()
            .map(|slot| slot.map(String::from).unwrap_or_default())
            .collect()
    }

    pub fn clear(&mut self) {
        self.slots = [None; CODE_LENGTH];
    }

    /// Write raw input at `index` and return the slot that should take focus.
    ///
    /// Non-digits are discarded. One digit fills `index`; several digits
    /// (a paste) fill consecutive slots from `index`, dropping whatever does
    /// not fit. Input without digits clears the slot and keeps focus there.
    pub fn write(&mut self, index: usize, value: &str) -> usize {
        let last = CODE_LENGTH - 1;
        if index > last {
            return last;
        }

        let digits = numeric_chars(value);
        if digits.is_empty() {
            self.slots[index] = None;
            return index;
        }

        let mut last_written = index;
        for (offset, digit) in digits.into_iter().enumerate() {
            let slot = index + offset;
            if slot > last {
                break;
            }
            self.slots[slot] = Some(digit);
            last_written = slot;
        }

        self.focus_after(last_written)
    }

    fn focus_after(&self, written: usize) -> usize {
        let last = CODE_LENGTH - 1;
        if written >= last {
            return last;
        }
        (written + 1..CODE_LENGTH)
            .find(|&slot| self.is_empty_at(slot))
            .unwrap_or(written + 1)
    }
}
