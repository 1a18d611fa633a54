//! Movement override
//!
//! Turns the four directional bindings into a locomotion vector that replaces
//! the player's keyboard-driven movement for exactly one simulation step.

use crate::input::binding::{ids, BindingId};
use crate::input::state::ButtonState;
use tracing::trace;

/// Speed multiplier applied while the player is sneaking.
pub const SNEAK_SPEED_FACTOR: f32 = 0.3;

/// The four directional bindings the override listens to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveDirection {
    Forward,
    Back,
    Left,
    Right,
}

impl MoveDirection {
    pub fn from_binding(binding: &BindingId) -> Option<Self> {
        match binding.as_str() {
            ids::FORWARD => Some(MoveDirection::Forward),
            ids::BACK => Some(MoveDirection::Back),
            ids::LEFT => Some(MoveDirection::Left),
            ids::RIGHT => Some(MoveDirection::Right),
            _ => None,
        }
    }

    /// +1 for forward/left, -1 for back/right.
    fn sign(self) -> f32 {
        match self {
            MoveDirection::Forward | MoveDirection::Left => 1.0,
            MoveDirection::Back | MoveDirection::Right => -1.0,
        }
    }

    fn is_longitudinal(self) -> bool {
        matches!(self, MoveDirection::Forward | MoveDirection::Back)
    }
}

/// The consumer's movement input, overwritten when an override is pending.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerInput {
    pub pressing_forward: bool,
    pub pressing_back: bool,
    pub pressing_left: bool,
    pub pressing_right: bool,
    pub movement_forward: f32,
    pub movement_sideways: f32,
}

/// Pending locomotion state with a one-shot apply flag.
#[derive(Clone, Debug, Default)]
pub struct MovementOverride {
    analog_movement: bool,
    should_override: bool,
    pressing_forward: bool,
    pressing_back: bool,
    pressing_left: bool,
    pressing_right: bool,
    movement_forward: f32,
    movement_sideways: f32,
}

impl MovementOverride {
    pub fn new(analog_movement: bool) -> Self {
        Self {
            analog_movement,
            ..Self::default()
        }
    }

    /// Records one directional binding event.
    ///
    /// Returns whether an override is now pending. Bindings other than the four
    /// directions are ignored and return `false`.
    pub fn press(
        &mut self,
        binding: &BindingId,
        value: f32,
        state: ButtonState,
        sneaking: bool,
    ) -> bool {
        let Some(direction) = MoveDirection::from_binding(binding) else {
            return false;
        };

        let sign = if state.is_unpressed() {
            0.0
        } else {
            direction.sign()
        };
        self.should_override = sign != 0.0;

        let magnitude = if self.analog_movement {
            value.powi(2)
        } else {
            1.0
        };
        let speed = if sneaking { SNEAK_SPEED_FACTOR } else { 1.0 };

        if direction.is_longitudinal() {
            self.pressing_forward = sign > 0.0;
            self.pressing_back = sign < 0.0;
            self.movement_forward = sign * magnitude * speed;
        } else {
            self.pressing_left = sign > 0.0;
            self.pressing_right = sign < 0.0;
            self.movement_sideways = sign * magnitude * speed;
        }

        trace!(
            "Movement {:?} {} -> forward {:.3}, sideways {:.3}",
            direction,
            state,
            self.movement_forward,
            self.movement_sideways
        );
        self.should_override
    }

    /// Copies the pending override onto `input` and clears it.
    ///
    /// A step without controller movement leaves `input` untouched.
    pub fn apply_to(&mut self, input: &mut PlayerInput) {
        if !self.should_override {
            return;
        }
        input.pressing_forward = self.pressing_forward;
        input.pressing_back = self.pressing_back;
        input.pressing_left = self.pressing_left;
        input.pressing_right = self.pressing_right;
        input.movement_forward = self.movement_forward;
        input.movement_sideways = self.movement_sideways;
        self.should_override = false;
    }

    pub fn is_pending(&self) -> bool {
        self.should_override
    }

    /// Drops any pending override, e.g. when a screen opens.
    pub fn cancel(&mut self) {
        self.should_override = false;
    }
}
