//! Device registry and the hardware seam it sits on

use crate::controller::sample::PadSnapshot;
use crate::error::DeviceError;
use chrono::{DateTime, Local};
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

/// Number of device slots the hardware layer exposes.
pub const MAX_DEVICES: usize = 16;
pub const LAST_DEVICE: usize = MAX_DEVICES - 1;

/// What the registry needs from the platform's gamepad layer.
///
/// Every query is a cache lookup on the hardware side and must not block.
pub trait HardwareLayer {
    fn is_present(&self, slot: usize) -> bool;
    fn is_gamepad(&self, slot: usize) -> bool;
    fn guid(&self, slot: usize) -> Option<String>;
    fn name(&self, slot: usize) -> Option<String>;
    /// Feeds an SDL-style mapping database.
    fn update_mappings(&mut self, data: &str) -> Result<(), DeviceError>;
    /// Last error the layer recorded, cleared on read.
    fn take_error(&mut self) -> Option<String>;
    fn snapshot(&self, slot: usize) -> Option<PadSnapshot>;
    /// Hotplug events since the last call.
    fn poll_events(&mut self) -> Vec<DeviceEvent>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceEventKind {
    Connected,
    Disconnected,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DeviceEvent {
    pub slot: usize,
    pub kind: DeviceEventKind,
    pub timestamp: DateTime<Local>,
}

impl DeviceEvent {
    pub fn now(slot: usize, kind: DeviceEventKind) -> Self {
        Self {
            slot,
            kind,
            timestamp: Local::now(),
        }
    }
}

/// Non-blocking message for the host to display
#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Local>,
}

impl Notification {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            timestamp: Local::now(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.timestamp.format("%H:%M:%S"),
            self.title,
            self.message
        )
    }
}

/// Handle to one device slot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Device {
    id: usize,
}

impl Device {
    pub fn id(&self) -> usize {
        self.id
    }
}

/// Fixed slot table of device handles
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    slots: [Option<Device>; MAX_DEVICES],
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached handle for `id`; out-of-range ids are clamped to the last slot.
    pub fn resolve(&mut self, id: usize) -> Device {
        let slot = if id > LAST_DEVICE {
            let err = DeviceError::InvalidDeviceId {
                id,
                clamped: LAST_DEVICE,
            };
            warn!("{}", err);
            LAST_DEVICE
        } else {
            id
        };
        *self.slots[slot].get_or_insert_with(|| {
            debug!("Caching device handle for slot {}", slot);
            Device { id: slot }
        })
    }

    pub fn is_connected<H: HardwareLayer>(&self, hw: &H, device: Device) -> bool {
        hw.is_present(device.id)
    }

    pub fn is_standard_gamepad<H: HardwareLayer>(&self, hw: &H, device: Device) -> bool {
        hw.is_present(device.id) && hw.is_gamepad(device.id)
    }

    /// Highest-id connected device reporting `guid`.
    pub fn find_best_match<H: HardwareLayer>(&mut self, hw: &H, guid: &str) -> Option<Device> {
        let slot = (0..MAX_DEVICES).rev().find(|slot| {
            hw.is_present(*slot)
                && hw
                    .guid(*slot)
                    .is_some_and(|found| found.eq_ignore_ascii_case(guid))
        })?;
        Some(self.resolve(slot))
    }

    /// Connected devices in slot order.
    pub fn connected<H: HardwareLayer>(&mut self, hw: &H) -> Vec<Device> {
        (0..MAX_DEVICES)
            .filter(|slot| hw.is_present(*slot))
            .map(|slot| self.resolve(slot))
            .collect()
    }

    /// Reloads the mapping database from `path`.
    ///
    /// A missing or unreadable file is skipped. A hardware error after the
    /// attempt comes back as a notification.
    pub fn reload_mapping_database<H: HardwareLayer>(
        &mut self,
        hw: &mut H,
        path: Option<&Path>,
        debug_devices: bool,
    ) -> Option<Notification> {
        let mut failure = None;
        if let Some(path) = path {
            match std::fs::read_to_string(path) {
                Ok(data) => match hw.update_mappings(&data) {
                    Ok(()) => info!("Loaded controller mappings from {}", path.display()),
                    Err(err) => {
                        warn!("{}", err);
                        failure = Some(err.to_string());
                    }
                },
                Err(err) => {
                    let err = DeviceError::MappingLoad {
                        path: path.to_path_buf(),
                        reason: err.to_string(),
                    };
                    debug!("Skipping mapping reload: {}", err);
                }
            }
        }

        if debug_devices {
            for device in self.connected(hw) {
                info!(
                    "Controller #{}: name {:?}, GUID {:?}, gamepad {}",
                    device.id,
                    hw.name(device.id),
                    hw.guid(device.id),
                    hw.is_gamepad(device.id)
                );
            }
        }

        if let Some(err) = hw.take_error() {
            warn!("Hardware layer reported: {}", err);
            failure = Some(err);
        }
        failure.map(|message| Notification::new("Controller mappings", message))
    }
}
