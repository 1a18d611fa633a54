use crate::controller::device::{DeviceEvent, DeviceEventKind, HardwareLayer};
use crate::controller::sample::PadSnapshot;
use crate::error::DeviceError;
use crate::input::code::{GamepadAxis, GamepadButton};
use gilrs::{Axis, Button, Event, EventType, Gamepad, GamepadId, Gilrs, GilrsBuilder, MappingSource};
use tracing::{debug, error, info, warn};

/// Hardware layer over gilrs
pub struct GilrsHardware {
    gilrs: Gilrs,
    last_error: Option<String>,
}

impl GilrsHardware {
    pub fn new() -> Result<Self, DeviceError> {
        info!("Initializing gilrs controller interface");
        let gilrs = match Gilrs::new() {
            Ok(g) => {
                info!("Successfully initialized gilrs");
                g
            }
            Err(gilrs::Error::NotImplemented(g)) => {
                warn!("Gamepads are not supported on this platform, continuing without");
                g
            }
            Err(e) => {
                error!("Failed to initialize gilrs: {}", e);
                return Err(DeviceError::Backend(e.to_string()));
            }
        };

        for (id, gamepad) in gilrs.gamepads() {
            info!(
                "  ID: {}, Name: {}, GUID: {}",
                id,
                gamepad.name(),
                guid_string(gamepad.uuid())
            );
        }

        Ok(Self {
            gilrs,
            last_error: None,
        })
    }

    fn pad(&self, slot: usize) -> Option<Gamepad<'_>> {
        self.gilrs
            .gamepads()
            .find(|(id, _)| usize::from(*id) == slot)
            .map(|(_, gamepad)| gamepad)
    }
}

impl HardwareLayer for GilrsHardware {
    fn is_present(&self, slot: usize) -> bool {
        self.pad(slot).is_some_and(|g| g.is_connected())
    }

    fn is_gamepad(&self, slot: usize) -> bool {
        self.pad(slot)
            .is_some_and(|g| g.mapping_source() != MappingSource::None)
    }

    fn guid(&self, slot: usize) -> Option<String> {
        self.pad(slot).map(|g| guid_string(g.uuid()))
    }

    fn name(&self, slot: usize) -> Option<String> {
        self.pad(slot).map(|g| g.name().to_string())
    }

    /// gilrs only takes mappings at construction, so the context is rebuilt.
    fn update_mappings(&mut self, data: &str) -> Result<(), DeviceError> {
        match GilrsBuilder::new().add_mappings(data).build() {
            Ok(g) => {
                self.gilrs = g;
                Ok(())
            }
            Err(gilrs::Error::NotImplemented(g)) => {
                self.gilrs = g;
                self.last_error = Some("Gamepads are not supported on this platform".into());
                Ok(())
            }
            Err(e) => Err(DeviceError::Backend(e.to_string())),
        }
    }

    fn take_error(&mut self) -> Option<String> {
        self.last_error.take()
    }

    fn snapshot(&self, slot: usize) -> Option<PadSnapshot> {
        let gamepad = self.pad(slot)?;
        if !gamepad.is_connected() {
            return None;
        }

        let mut snapshot = PadSnapshot::default();
        for button in GamepadButton::ALL {
            snapshot.buttons[button.index()] = gamepad.is_pressed(map_button(button));
        }
        for axis in GamepadAxis::ALL {
            snapshot.axes[axis.index()] = match axis {
                GamepadAxis::LeftX => gamepad.value(Axis::LeftStickX),
                GamepadAxis::LeftY => gamepad.value(Axis::LeftStickY),
                GamepadAxis::RightX => gamepad.value(Axis::RightStickX),
                GamepadAxis::RightY => gamepad.value(Axis::RightStickY),
                GamepadAxis::LeftTrigger => trigger_value(&gamepad, Button::LeftTrigger2),
                GamepadAxis::RightTrigger => trigger_value(&gamepad, Button::RightTrigger2),
            };
        }
        Some(snapshot)
    }

    fn poll_events(&mut self) -> Vec<DeviceEvent> {
        let mut events = Vec::new();
        while let Some(Event { id, event, .. }) = self.gilrs.next_event() {
            let kind = match event {
                EventType::Connected => DeviceEventKind::Connected,
                EventType::Disconnected => DeviceEventKind::Disconnected,
                _ => continue,
            };
            debug!("Gamepad {} {:?}", id, kind);
            events.push(DeviceEvent::now(slot_of(id), kind));
        }
        events
    }
}

fn slot_of(id: GamepadId) -> usize {
    usize::from(id)
}

fn trigger_value(gamepad: &Gamepad<'_>, button: Button) -> f32 {
    gamepad
        .button_data(button)
        .map(|data| data.value())
        .unwrap_or(0.0)
}

fn guid_string(uuid: [u8; 16]) -> String {
    uuid.iter().map(|byte| format!("{:02x}", byte)).collect()
}

fn map_button(button: GamepadButton) -> Button {
    match button {
        GamepadButton::A => Button::South,
        GamepadButton::B => Button::East,
        GamepadButton::X => Button::West,
        GamepadButton::Y => Button::North,
        GamepadButton::LeftBumper => Button::LeftTrigger,
        GamepadButton::RightBumper => Button::RightTrigger,
        GamepadButton::Back => Button::Select,
        GamepadButton::Start => Button::Start,
        GamepadButton::Guide => Button::Mode,
        GamepadButton::LeftThumb => Button::LeftThumb,
        GamepadButton::RightThumb => Button::RightThumb,
        GamepadButton::DPadUp => Button::DPadUp,
        GamepadButton::DPadRight => Button::DPadRight,
        GamepadButton::DPadDown => Button::DPadDown,
        GamepadButton::DPadLeft => Button::DPadLeft,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guid_is_lowercase_hex() {
        let mut uuid = [0u8; 16];
        uuid[0] = 0x03;
        uuid[4] = 0x5e;
        uuid[15] = 0xff;
        assert_eq!(guid_string(uuid), "030000005e00000000000000000000ff");
    }

    #[test]
    fn face_buttons_follow_positions() {
        assert_eq!(map_button(GamepadButton::A), Button::South);
        assert_eq!(map_button(GamepadButton::Y), Button::North);
        assert_eq!(map_button(GamepadButton::LeftBumper), Button::LeftTrigger);
    }
}
