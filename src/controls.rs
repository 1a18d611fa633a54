//! Controller session: devices, input state and controls-mode switching

use crate::config::{ControllerRef, ControlsConfig, ControlsMode};
use crate::controller::device::{
    Device, DeviceEvent, DeviceEventKind, DeviceRegistry, HardwareLayer, Notification,
};
use crate::controller::sample::RawSample;
use crate::error::BindingError;
use crate::input::binding::AppContext;
use crate::input::code::AbstractCode;
use crate::input::defaults::register_defaults;
use crate::input::manager::InputManager;
use crate::input::registry::{BindingChange, BindingRegistry};
use crate::input::resolution::PassReport;
use crate::movement::PlayerInput;
use std::path::PathBuf;
use tracing::{debug, info};

pub struct Controls<A, H> {
    config: ControlsConfig,
    mappings_path: Option<PathBuf>,
    hardware: H,
    devices: DeviceRegistry,
    input: InputManager<A>,
    previous_mode: Option<ControlsMode>,
    notifications: Vec<Notification>,
    /// The last tick ran a controller step
    stepping: bool,
    /// Last real cursor position reported by the host
    hardware_cursor: Option<(f64, f64)>,
}

impl<A: AppContext + 'static, H: HardwareLayer> Controls<A, H> {
    /// Registers the stock bindings and applies the persisted chords.
    pub fn new(config: ControlsConfig, hardware: H, window: (u32, u32)) -> Result<Self, BindingError> {
        let mut registry = BindingRegistry::new();
        register_defaults(&mut registry, config.pointer_speed, config.virtual_mouse)?;
        registry.load_bindings(&config.bindings);

        let input = InputManager::new(registry, window, config.analog_movement);
        let mappings_path = config.mappings_file.clone();
        Ok(Self {
            config,
            mappings_path,
            hardware,
            devices: DeviceRegistry::new(),
            input,
            previous_mode: None,
            notifications: Vec::new(),
            stepping: false,
            hardware_cursor: None,
        })
    }

    pub fn with_mappings_path(mut self, path: PathBuf) -> Self {
        self.mappings_path = Some(path);
        self
    }

    /// Loads the mapping database and settles the initial controls mode.
    pub fn init(&mut self) {
        self.reload_mappings();
        if self.config.auto_switch_mode {
            self.switch_controls_mode();
        }
        info!(
            "Controls ready in {} mode, {} bindings",
            self.config.controls_mode,
            self.input.registry().len()
        );
    }

    pub fn reload_mappings(&mut self) {
        if let Some(notification) = self.devices.reload_mapping_database(
            &mut self.hardware,
            self.mappings_path.as_deref(),
            self.config.debug,
        ) {
            self.notifications.push(notification);
        }
    }

    /// Device selected by the config; GUIDs fall back to slot 0 when unmatched.
    pub fn active_controller(&mut self) -> Device {
        match &self.config.controller {
            ControllerRef::Id(id) => self.devices.resolve(*id),
            ControllerRef::Guid(guid) => match self.devices.find_best_match(&self.hardware, guid) {
                Some(device) => device,
                None => self.devices.resolve(0),
            },
        }
    }

    pub fn poll_devices(&mut self) {
        for event in self.hardware.poll_events() {
            self.on_device_event(&event);
        }
    }

    pub fn on_device_event(&mut self, event: &DeviceEvent) {
        let name = self
            .hardware
            .name(event.slot)
            .unwrap_or_else(|| format!("#{}", event.slot));
        let (title, message) = match event.kind {
            DeviceEventKind::Connected => ("Controller connected", name),
            DeviceEventKind::Disconnected => ("Controller disconnected", format!("#{}", event.slot)),
        };
        info!(
            "{} at {}: {}",
            title,
            event.timestamp.format("%H:%M:%S%.3f"),
            message
        );
        self.notifications.push(Notification::new(title, message));

        if self.config.auto_switch_mode {
            self.switch_controls_mode();
        }
    }

    /// Re-derives the controls mode from the active device.
    pub fn switch_controls_mode(&mut self) -> ControlsMode {
        let device = self.active_controller();
        let current = self.config.controls_mode;
        if self.devices.is_standard_gamepad(&self.hardware, device) {
            if current != ControlsMode::Controller {
                self.previous_mode = Some(current);
                self.set_controls_mode(ControlsMode::Controller);
            }
        } else if current == ControlsMode::Controller {
            let restored = self.previous_mode.take().unwrap_or_default();
            self.set_controls_mode(restored);
        }
        self.config.controls_mode
    }

    /// Entering controller mode moves the virtual pointer to the real cursor.
    pub fn set_controls_mode(&mut self, mode: ControlsMode) {
        if self.config.controls_mode != mode {
            info!("Controls mode {} -> {}", self.config.controls_mode, mode);
            self.config.controls_mode = mode;
            if mode == ControlsMode::Controller {
                if let Some((x, y)) = self.hardware_cursor {
                    self.input
                        .pointer_mut()
                        .reset_to_current_hardware_cursor(x, y);
                }
            }
        }
    }

    pub fn update_hardware_cursor(&mut self, x: f64, y: f64) {
        self.hardware_cursor = Some((x, y));
    }

    pub fn controls_mode(&self) -> ControlsMode {
        self.config.controls_mode
    }

    /// One simulation step. Returns `None` when controller input is inactive.
    ///
    /// The first tick after stepping stops (mode switch, lost device, lost
    /// focus) releases every held binding.
    pub fn tick(&mut self, app: &mut A) -> Option<PassReport> {
        self.poll_devices();
        if self.config.controls_mode != ControlsMode::Controller {
            return self.suspend(app);
        }
        if !app.is_window_focused() && !self.config.unfocused_input {
            debug!("Window unfocused, skipping controller step");
            return self.suspend(app);
        }

        let device = self.active_controller();
        let Some(snapshot) = self.hardware.snapshot(device.id()) else {
            return self.suspend(app);
        };
        let sample = RawSample::from_snapshot(&snapshot, &self.config.dead_zones);
        self.stepping = true;
        Some(self.input.step(app, &sample))
    }

    fn suspend(&mut self, app: &mut A) -> Option<PassReport> {
        if !self.stepping {
            return None;
        }
        self.stepping = false;
        debug!("Controller step stopped, releasing held bindings");
        Some(self.input.release_all(app))
    }

    pub fn render_position(&self, fraction: f32) -> (f64, f64) {
        self.input.render_position(fraction)
    }

    pub fn apply_movement(&mut self, player: &mut PlayerInput) {
        self.input.apply_movement(player);
    }

    /// Rebinds and records the change in the config.
    pub fn rebind(&mut self, id: &str, codes: Vec<AbstractCode>) -> Result<BindingChange, BindingError> {
        let change = self.input.registry_mut().rebind(id, codes)?;
        self.config.store_binding(&change);
        Ok(change)
    }

    pub fn reset_binding(&mut self, id: &str) -> Result<BindingChange, BindingError> {
        let change = self.input.registry_mut().reset(id)?;
        self.config.store_binding(&change);
        Ok(change)
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn config(&self) -> &ControlsConfig {
        &self.config
    }

    pub fn input(&self) -> &InputManager<A> {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputManager<A> {
        &mut self.input
    }

    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hardware
    }
}
