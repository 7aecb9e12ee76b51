//! Looping type-then-erase effect for the header role line.

pub const TYPE_STEP_MS: u32 = 50;
pub const ERASE_STEP_MS: u32 = 20;
pub const HOLD_MS: u32 = 1_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Typing,
    Holding,
    Erasing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Typewriter {
    text: &'static str,
    shown: usize,
    phase: Phase,
}

impl Typewriter {
    pub const fn new(text: &'static str) -> Self {
        Self {
            text,
            shown: 0,
            phase: Phase::Typing,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Prefix currently on screen, cut on a character boundary.
    pub fn visible(&self) -> &'static str {
        let end = self
            .text
            .char_indices()
            .nth(self.shown)
            .map_or(self.text.len(), |(index, _)| index);
        &self.text[..end]
    }

    /// Wait before the next [`advance`](Self::advance).
    pub fn delay_ms(&self) -> u32 {
        match self.phase {
            Phase::Typing => TYPE_STEP_MS,
            Phase::Holding => HOLD_MS,
            Phase::Erasing => ERASE_STEP_MS,
        }
    }

    pub fn advance(self) -> Self {
        let total = self.text.chars().count();

        match self.phase {
            Phase::Typing => {
                let shown = (self.shown + 1).min(total);
                let phase = if shown == total {
                    Phase::Holding
                } else {
                    Phase::Typing
                };
                Self { shown, phase, ..self }
            }
            Phase::Holding => Self {
                phase: Phase::Erasing,
                ..self
            },
            Phase::Erasing => {
                let shown = self.shown.saturating_sub(1);
                let phase = if shown == 0 {
                    Phase::Typing
                } else {
                    Phase::Erasing
                };
                Self { shown, phase, ..self }
            }
        }
    }
}
