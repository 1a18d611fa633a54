//! Abstract codes
//!
//! Every physical input the engine can observe is folded into a single integer
//! space. Digital buttons occupy the low range; each analog axis is split into
//! two polarity codes living in a reserved sub-range so that one stick can drive
//! two bindings with opposite meaning ("stick up" and "stick down").
//!
//! ```text
//!   0 ..  15   gamepad buttons (digital)
//! 100 .. 106   axis, positive polarity (analog)
//! 200 .. 206   axis, negative polarity (analog)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// First code of the positive axis polarity range.
pub const AXIS_POSITIVE_BASE: u16 = 100;
/// First code of the negative axis polarity range.
pub const AXIS_NEGATIVE_BASE: u16 = 200;

/// Integer identifying a button or one polarity of an axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbstractCode(pub u16);

/// Standard gamepad buttons, in mapping-database order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GamepadButton {
    A,
    B,
    X,
    Y,
    LeftBumper,
    RightBumper,
    Back,
    Start,
    Guide,
    LeftThumb,
    RightThumb,
    DPadUp,
    DPadRight,
    DPadDown,
    DPadLeft,
}

/// Standard gamepad axes, in mapping-database order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GamepadAxis {
    LeftX,
    LeftY,
    RightX,
    RightY,
    LeftTrigger,
    RightTrigger,
}

pub const BUTTON_COUNT: usize = 15;
pub const AXIS_COUNT: usize = 6;

impl GamepadButton {
    pub const ALL: [GamepadButton; BUTTON_COUNT] = [
        GamepadButton::A,
        GamepadButton::B,
        GamepadButton::X,
        GamepadButton::Y,
        GamepadButton::LeftBumper,
        GamepadButton::RightBumper,
        GamepadButton::Back,
        GamepadButton::Start,
        GamepadButton::Guide,
        GamepadButton::LeftThumb,
        GamepadButton::RightThumb,
        GamepadButton::DPadUp,
        GamepadButton::DPadRight,
        GamepadButton::DPadDown,
        GamepadButton::DPadLeft,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            GamepadButton::A => "button_a",
            GamepadButton::B => "button_b",
            GamepadButton::X => "button_x",
            GamepadButton::Y => "button_y",
            GamepadButton::LeftBumper => "left_bumper",
            GamepadButton::RightBumper => "right_bumper",
            GamepadButton::Back => "back",
            GamepadButton::Start => "start",
            GamepadButton::Guide => "guide",
            GamepadButton::LeftThumb => "left_thumb",
            GamepadButton::RightThumb => "right_thumb",
            GamepadButton::DPadUp => "dpad_up",
            GamepadButton::DPadRight => "dpad_right",
            GamepadButton::DPadDown => "dpad_down",
            GamepadButton::DPadLeft => "dpad_left",
        }
    }
}

impl GamepadAxis {
    pub const ALL: [GamepadAxis; AXIS_COUNT] = [
        GamepadAxis::LeftX,
        GamepadAxis::LeftY,
        GamepadAxis::RightX,
        GamepadAxis::RightY,
        GamepadAxis::LeftTrigger,
        GamepadAxis::RightTrigger,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Name of one polarity. Positive Y points up.
    fn polarity_name(self, positive: bool) -> &'static str {
        match (self, positive) {
            (GamepadAxis::LeftX, true) => "left_stick_right",
            (GamepadAxis::LeftX, false) => "left_stick_left",
            (GamepadAxis::LeftY, true) => "left_stick_up",
            (GamepadAxis::LeftY, false) => "left_stick_down",
            (GamepadAxis::RightX, true) => "right_stick_right",
            (GamepadAxis::RightX, false) => "right_stick_left",
            (GamepadAxis::RightY, true) => "right_stick_up",
            (GamepadAxis::RightY, false) => "right_stick_down",
            (GamepadAxis::LeftTrigger, true) => "left_trigger",
            (GamepadAxis::LeftTrigger, false) => "left_trigger_inverted",
            (GamepadAxis::RightTrigger, true) => "right_trigger",
            (GamepadAxis::RightTrigger, false) => "right_trigger_inverted",
        }
    }
}

impl AbstractCode {
    pub const fn button(button: GamepadButton) -> Self {
        AbstractCode(button as u16)
    }

    /// Code for one polarity of an axis.
    pub const fn axis(axis: GamepadAxis, positive: bool) -> Self {
        if positive {
            AbstractCode(AXIS_POSITIVE_BASE + axis as u16)
        } else {
            AbstractCode(AXIS_NEGATIVE_BASE + axis as u16)
        }
    }

    /// Whether this code carries an analog magnitude.
    pub fn is_axis(self) -> bool {
        self.as_axis().is_some()
    }

    /// Splits an axis code back into its axis and polarity.
    pub fn as_axis(self) -> Option<(GamepadAxis, bool)> {
        let (offset, positive) = if (AXIS_POSITIVE_BASE..AXIS_NEGATIVE_BASE).contains(&self.0) {
            (self.0 - AXIS_POSITIVE_BASE, true)
        } else if self.0 >= AXIS_NEGATIVE_BASE {
            (self.0 - AXIS_NEGATIVE_BASE, false)
        } else {
            return None;
        };
        GamepadAxis::ALL
            .get(offset as usize)
            .map(|axis| (*axis, positive))
    }

    pub fn as_button(self) -> Option<GamepadButton> {
        GamepadButton::ALL.get(self.0 as usize).copied()
    }
}

impl From<GamepadButton> for AbstractCode {
    fn from(button: GamepadButton) -> Self {
        AbstractCode::button(button)
    }
}

impl fmt::Display for AbstractCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(button) = self.as_button() {
            write!(f, "{}", button.name())
        } else if let Some((axis, positive)) = self.as_axis() {
            write!(f, "{}", axis.polarity_name(positive))
        } else {
            write!(f, "code_{}", self.0)
        }
    }
}

/// Renders a code list the way bindings are shown in logs: `button_a+right_bumper`.
pub fn codes_to_string(codes: &[AbstractCode]) -> String {
    codes
        .iter()
        .map(|code| code.to_string())
        .collect::<Vec<_>>()
        .join("+")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_codes_round_trip_their_polarity() {
        let up = AbstractCode::axis(GamepadAxis::LeftY, true);
        let down = AbstractCode::axis(GamepadAxis::LeftY, false);

        assert_ne!(up, down);
        assert_eq!(up.as_axis(), Some((GamepadAxis::LeftY, true)));
        assert_eq!(down.as_axis(), Some((GamepadAxis::LeftY, false)));
        assert!(up.is_axis());
    }

    #[test]
    fn buttons_are_not_analog() {
        for button in GamepadButton::ALL {
            let code = AbstractCode::button(button);
            assert!(!code.is_axis());
            assert_eq!(code.as_button(), Some(button));
        }
    }

    #[test]
    fn unknown_codes_are_neither_button_nor_axis() {
        let code = AbstractCode(57);
        assert!(code.as_button().is_none());
        assert!(!code.is_axis());
        assert_eq!(code.to_string(), "code_57");
        assert!(!AbstractCode(AXIS_POSITIVE_BASE + 40).is_axis());
    }

    #[test]
    fn chords_render_joined() {
        let codes = [
            AbstractCode::button(GamepadButton::A),
            AbstractCode::axis(GamepadAxis::RightTrigger, true),
        ];
        assert_eq!(codes_to_string(&codes), "button_a+right_trigger");
    }
}
