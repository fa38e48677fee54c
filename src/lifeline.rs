use std::time::Duration;

pub const MAX_HINTS: u8 = 2;
pub const FREEZE_DURATION: Duration = Duration::from_secs(5);

/// Per-question hint and freeze usage. Neither touches the score.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lifelines {
    hints_used: u8,
    freeze_used: bool,
}

impl Lifelines {
    /// Uses one hint. Returns `false` once the cap is reached.
    pub fn use_hint(&mut self) -> bool {
        if self.hints_used >= MAX_HINTS {
            return false;
        }
        self.hints_used += 1;
        true
    }

    /// Uses the freeze. Returns `false` if it was already used.
    pub fn use_freeze(&mut self) -> bool {
        !std::mem::replace(&mut self.freeze_used, true)
    }

    pub fn hints_used(&self) -> u8 {
        self.hints_used
    }

    pub fn hints_left(&self) -> u8 {
        MAX_HINTS - self.hints_used
    }

    pub fn hint_shown(&self) -> bool {
        self.hints_used > 0
    }

    pub fn freeze_used(&self) -> bool {
        self.freeze_used
    }
}
