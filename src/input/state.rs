//! Raw signal state machine
//!
//! Tracks a per-code edge state that is promoted once per simulation step:
//!
//! ```text
//!            sample true             next step
//!   None ──────────────────► Press ───────────► Repeat
//!    ▲                         │                  │
//!    │ next step               │ sample false     │ sample false
//!    │                         ▼                  ▼
//!    └──────────────────── Release ◄──────────────┘
//! ```
//!
//! Entries are created lazily the first time a code is observed and are never
//! evicted; the code domain is small and bounded.

use crate::input::code::AbstractCode;
use std::collections::HashMap;
use std::fmt;
use tracing::trace;

/// Edge state of a code or of a whole binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ButtonState {
    #[default]
    None,
    Press,
    Repeat,
    Release,
}

impl ButtonState {
    /// Physically held: `Press` or `Repeat`.
    pub fn is_pressed(self) -> bool {
        matches!(self, ButtonState::Press | ButtonState::Repeat)
    }

    /// Physically released: `None` or `Release`.
    pub fn is_unpressed(self) -> bool {
        !self.is_pressed()
    }
}

impl fmt::Display for ButtonState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ButtonState::None => "none",
            ButtonState::Press => "press",
            ButtonState::Repeat => "repeat",
            ButtonState::Release => "release",
        };
        f.write_str(name)
    }
}

/// One raw observation for a code during a step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SignalSample {
    /// A digital button.
    Digital(bool),
    /// One polarity of an axis; `magnitude` is kept independently of `held`.
    Analog { held: bool, magnitude: f32 },
}

impl SignalSample {
    pub fn is_held(self) -> bool {
        match self {
            SignalSample::Digital(held) => held,
            SignalSample::Analog { held, .. } => held,
        }
    }
}

/// Per-code edge detector plus the last analog magnitude of every axis code.
#[derive(Debug, Default, Clone)]
pub struct RawSignalStates {
    states: HashMap<AbstractCode, ButtonState>,
    values: HashMap<AbstractCode, f32>,
}

impl RawSignalStates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Promotes `Press` to `Repeat` and `Release` to `None`.
    ///
    /// Must run exactly once per simulation step, before that step's samples
    /// are ingested and before bindings are evaluated.
    pub fn advance(&mut self) {
        for (code, state) in self.states.iter_mut() {
            match state {
                ButtonState::Press => {
                    trace!("{} press -> repeat", code);
                    *state = ButtonState::Repeat;
                }
                ButtonState::Release => {
                    trace!("{} release -> none", code);
                    *state = ButtonState::None;
                }
                _ => {}
            }
        }
    }

    /// Feeds one sample. Only a change in held-ness produces an edge.
    pub fn ingest(&mut self, code: AbstractCode, sample: SignalSample) {
        if let SignalSample::Analog { magnitude, .. } = sample {
            self.values.insert(code, magnitude);
        }

        let held = sample.is_held();
        let current = self.state(code);
        if held != current.is_pressed() {
            let next = if held {
                ButtonState::Press
            } else {
                ButtonState::Release
            };
            trace!("{} {} -> {}", code, current, next);
            self.states.insert(code, next);
        }
    }

    /// Current state of a code; unseen codes are `None`.
    pub fn state(&self, code: AbstractCode) -> ButtonState {
        self.states.get(&code).copied().unwrap_or_default()
    }

    /// Last analog magnitude observed for an axis code.
    pub fn value(&self, code: AbstractCode) -> Option<f32> {
        self.values.get(&code).copied()
    }

    /// Number of codes observed so far.
    pub fn tracked(&self) -> usize {
        self.states.len()
    }

    /// Drops every edge back to `None`, e.g. when the active device goes away.
    pub fn release_all(&mut self) {
        for state in self.states.values_mut() {
            if state.is_pressed() {
                *state = ButtonState::Release;
            }
        }
        self.values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::code::{GamepadAxis, GamepadButton};

    fn step(states: &mut RawSignalStates, code: AbstractCode, sample: Option<bool>) -> ButtonState {
        states.advance();
        if let Some(held) = sample {
            states.ingest(code, SignalSample::Digital(held));
        }
        states.state(code)
    }

    #[test]
    fn press_repeat_release_none() {
        let code = AbstractCode::button(GamepadButton::A);
        let mut states = RawSignalStates::new();

        assert_eq!(step(&mut states, code, Some(true)), ButtonState::Press);
        assert_eq!(step(&mut states, code, Some(true)), ButtonState::Repeat);
        assert_eq!(step(&mut states, code, Some(false)), ButtonState::Release);
        assert_eq!(step(&mut states, code, None), ButtonState::None);
    }

    #[test]
    fn press_promotes_even_without_a_sample() {
        let code = AbstractCode::button(GamepadButton::B);
        let mut states = RawSignalStates::new();

        step(&mut states, code, Some(true));
        assert_eq!(step(&mut states, code, None), ButtonState::Repeat);
        assert_eq!(step(&mut states, code, None), ButtonState::Repeat);
    }

    #[test]
    fn release_on_the_press_step() {
        let code = AbstractCode::button(GamepadButton::X);
        let mut states = RawSignalStates::new();

        step(&mut states, code, Some(true));
        states.ingest(code, SignalSample::Digital(false));
        assert_eq!(states.state(code), ButtonState::Release);
    }

    #[test]
    fn repress_from_release_is_a_new_press() {
        let code = AbstractCode::button(GamepadButton::Y);
        let mut states = RawSignalStates::new();

        step(&mut states, code, Some(true));
        step(&mut states, code, Some(false));
        assert_eq!(step(&mut states, code, Some(true)), ButtonState::Press);
    }

    #[test]
    fn analog_magnitude_is_stored_independently() {
        let code = AbstractCode::axis(GamepadAxis::LeftTrigger, true);
        let mut states = RawSignalStates::new();

        states.advance();
        states.ingest(code, SignalSample::Analog { held: false, magnitude: 0.2 });
        assert_eq!(states.state(code), ButtonState::None);
        assert_eq!(states.value(code), Some(0.2));

        states.advance();
        states.ingest(code, SignalSample::Analog { held: true, magnitude: 0.8 });
        assert_eq!(states.state(code), ButtonState::Press);
        assert_eq!(states.value(code), Some(0.8));
    }

    #[test]
    fn unseen_codes_are_idle() {
        let states = RawSignalStates::new();
        assert_eq!(states.state(AbstractCode(3)), ButtonState::None);
        assert_eq!(states.tracked(), 0);
    }

    #[test]
    fn release_all_releases_held_codes() {
        let code = AbstractCode::button(GamepadButton::Start);
        let mut states = RawSignalStates::new();
        step(&mut states, code, Some(true));

        states.release_all();
        assert_eq!(states.state(code), ButtonState::Release);
        states.advance();
        assert_eq!(states.state(code), ButtonState::None);
    }
}
