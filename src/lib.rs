//! Gamepad controls for a real-time game: edge-triggered, conflict-free
//! binding events plus a virtual pointer and analog movement override.

pub mod config;
pub mod controller;
pub mod controls;
pub mod error;
pub mod input;
pub mod movement;
pub mod pointer;

pub use config::{ControlsConfig, ControlsMode};
pub use controls::Controls;
