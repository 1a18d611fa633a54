//! In-memory hardware layer for tests

use crate::controller::device::{DeviceEvent, DeviceEventKind, HardwareLayer};
use crate::controller::sample::PadSnapshot;
use crate::error::DeviceError;
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default)]
struct MockPad {
    guid: String,
    gamepad: bool,
    snapshot: PadSnapshot,
}

#[derive(Debug, Default)]
pub(crate) struct MockHardware {
    pads: BTreeMap<usize, MockPad>,
    mappings: Vec<String>,
    pending_error: Option<String>,
    fail_update: Option<String>,
    events: Vec<DeviceEvent>,
}

impl MockHardware {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn connect(&mut self, slot: usize, guid: &str, gamepad: bool) {
        self.pads.insert(
            slot,
            MockPad {
                guid: guid.to_string(),
                gamepad,
                snapshot: PadSnapshot::default(),
            },
        );
        self.events
            .push(DeviceEvent::now(slot, DeviceEventKind::Connected));
    }

    pub(crate) fn disconnect(&mut self, slot: usize) {
        if self.pads.remove(&slot).is_some() {
            self.events
                .push(DeviceEvent::now(slot, DeviceEventKind::Disconnected));
        }
    }

    pub(crate) fn set_snapshot(&mut self, slot: usize, snapshot: PadSnapshot) {
        if let Some(pad) = self.pads.get_mut(&slot) {
            pad.snapshot = snapshot;
        }
    }

    /// The next mapping update is accepted but leaves an error behind.
    pub(crate) fn fail_next_update(&mut self, message: &str) {
        self.fail_update = Some(message.to_string());
    }

    pub(crate) fn mappings(&self) -> &[String] {
        &self.mappings
    }
}

impl HardwareLayer for MockHardware {
    fn is_present(&self, slot: usize) -> bool {
        self.pads.contains_key(&slot)
    }

    fn is_gamepad(&self, slot: usize) -> bool {
        self.pads.get(&slot).is_some_and(|pad| pad.gamepad)
    }

    fn guid(&self, slot: usize) -> Option<String> {
        self.pads.get(&slot).map(|pad| pad.guid.clone())
    }

    fn name(&self, slot: usize) -> Option<String> {
        self.pads.get(&slot).map(|_| format!("Mock Pad {}", slot))
    }

    fn update_mappings(&mut self, data: &str) -> Result<(), DeviceError> {
        self.mappings.extend(
            data.lines()
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string),
        );
        self.pending_error = self.fail_update.take();
        Ok(())
    }

    fn take_error(&mut self) -> Option<String> {
        self.pending_error.take()
    }

    fn snapshot(&self, slot: usize) -> Option<PadSnapshot> {
        self.pads.get(&slot).map(|pad| pad.snapshot.clone())
    }

    fn poll_events(&mut self) -> Vec<DeviceEvent> {
        std::mem::take(&mut self.events)
    }
}
