//! Conversion of polled pad state into abstract-code samples

use crate::config::DeadZones;
use crate::input::code::{AbstractCode, GamepadAxis, GamepadButton, AXIS_COUNT, BUTTON_COUNT};
use crate::input::state::SignalSample;

/// One polled reading of a standard gamepad.
///
/// Stick axes are in `[-1, 1]` with positive Y up, triggers in `[0, 1]`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PadSnapshot {
    pub buttons: [bool; BUTTON_COUNT],
    pub axes: [f32; AXIS_COUNT],
}

impl PadSnapshot {
    pub fn with_button(mut self, button: GamepadButton, held: bool) -> Self {
        self.buttons[button.index()] = held;
        self
    }

    pub fn with_axis(mut self, axis: GamepadAxis, value: f32) -> Self {
        self.axes[axis.index()] = value;
        self
    }
}

/// Every code's sample for one simulation step
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawSample {
    entries: Vec<(AbstractCode, SignalSample)>,
}

impl RawSample {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, code: AbstractCode, sample: SignalSample) {
        self.entries.push((code, sample));
    }

    pub fn digital(mut self, code: AbstractCode, held: bool) -> Self {
        self.push(code, SignalSample::Digital(held));
        self
    }

    /// Analog entry, held while the magnitude is above zero.
    pub fn analog(mut self, code: AbstractCode, magnitude: f32) -> Self {
        self.push(
            code,
            SignalSample::Analog {
                held: magnitude > 0.0,
                magnitude,
            },
        );
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &(AbstractCode, SignalSample)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Buttons become digital codes; every axis is split into its two
    /// polarity codes after dead-zone rescaling.
    pub fn from_snapshot(snapshot: &PadSnapshot, dead_zones: &DeadZones) -> Self {
        let mut sample = Self {
            entries: Vec::with_capacity(BUTTON_COUNT + 2 * AXIS_COUNT),
        };

        for button in GamepadButton::ALL {
            sample.push(
                AbstractCode::button(button),
                SignalSample::Digital(snapshot.buttons[button.index()]),
            );
        }

        for axis in GamepadAxis::ALL {
            let dead_zone = match axis {
                GamepadAxis::LeftX | GamepadAxis::LeftY => dead_zones.left_stick,
                GamepadAxis::RightX | GamepadAxis::RightY => dead_zones.right_stick,
                GamepadAxis::LeftTrigger | GamepadAxis::RightTrigger => dead_zones.triggers,
            };
            let value = apply_deadzone(snapshot.axes[axis.index()], dead_zone);
            sample = sample
                .analog(AbstractCode::axis(axis, true), value.max(0.0))
                .analog(AbstractCode::axis(axis, false), (-value).max(0.0));
        }
        sample
    }
}

// Rescales the value to the range outside the dead zone
fn apply_deadzone(value: f32, deadzone: f32) -> f32 {
    let value = value.clamp(-1.0, 1.0);
    if value.abs() < deadzone || deadzone >= 1.0 {
        0.0
    } else {
        let sign = if value < 0.0 { -1.0 } else { 1.0 };
        sign * (value.abs() - deadzone) / (1.0 - deadzone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(sample: &RawSample, code: AbstractCode) -> SignalSample {
        sample
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, s)| *s)
            .unwrap()
    }

    #[test]
    fn dead_zone_rescales_outside_values() {
        assert_eq!(apply_deadzone(0.1, 0.2), 0.0);
        assert_eq!(apply_deadzone(-0.1, 0.2), 0.0);
        assert_eq!(apply_deadzone(1.0, 0.2), 1.0);
        assert!((apply_deadzone(0.6, 0.2) - 0.5).abs() < 1e-6);
        assert!((apply_deadzone(-0.6, 0.2) + 0.5).abs() < 1e-6);
    }

    #[test]
    fn axes_split_into_polarities() {
        let snapshot = PadSnapshot::default()
            .with_button(GamepadButton::A, true)
            .with_axis(GamepadAxis::LeftY, 1.0)
            .with_axis(GamepadAxis::RightX, -0.1);
        let dead_zones = DeadZones::default();
        let sample = RawSample::from_snapshot(&snapshot, &dead_zones);

        assert_eq!(sample.len(), BUTTON_COUNT + 2 * AXIS_COUNT);
        assert_eq!(
            find(&sample, AbstractCode::button(GamepadButton::A)),
            SignalSample::Digital(true)
        );
        assert_eq!(
            find(&sample, AbstractCode::axis(GamepadAxis::LeftY, true)),
            SignalSample::Analog {
                held: true,
                magnitude: 1.0
            }
        );
        assert_eq!(
            find(&sample, AbstractCode::axis(GamepadAxis::LeftY, false)),
            SignalSample::Analog {
                held: false,
                magnitude: 0.0
            }
        );
        // inside the right stick dead zone
        assert!(!find(&sample, AbstractCode::axis(GamepadAxis::RightX, false)).is_held());
    }
}
