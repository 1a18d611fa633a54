pub mod device;
pub mod gilrs_backend;
pub mod sample;

#[cfg(test)]
pub(crate) mod testing;

pub use device::{
    Device, DeviceEvent, DeviceEventKind, DeviceRegistry, HardwareLayer, Notification,
};
pub use gilrs_backend::GilrsHardware;
pub use sample::{PadSnapshot, RawSample};
