use crate::error::ConfigError;
use crate::input::code::AbstractCode;
use crate::input::registry::BindingChange;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const CONFIG_DIR: &str = "padcontrols";
const CONFIG_FILE: &str = "config.toml";

/// Which input scheme drives the application
#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ControlsMode {
    /// Keyboard and mouse
    #[default]
    Default,
    Controller,
}

impl fmt::Display for ControlsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlsMode::Default => write!(f, "default"),
            ControlsMode::Controller => write!(f, "controller"),
        }
    }
}

/// Selected controller: a slot id, or a GUID resolved against connected devices
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum ControllerRef {
    Id(usize),
    Guid(String),
}

impl Default for ControllerRef {
    fn default() -> Self {
        ControllerRef::Id(0)
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DeadZones {
    pub left_stick: f32,
    pub right_stick: f32,
    pub triggers: f32,
}

impl Default for DeadZones {
    fn default() -> Self {
        Self {
            left_stick: 0.25,
            right_stick: 0.25,
            triggers: 0.05,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ControlsConfig {
    pub controls_mode: ControlsMode,
    /// Follow controller hotplug with the controls mode
    pub auto_switch_mode: bool,
    /// Verbose logging and per-device diagnostics on mapping reload
    pub debug: bool,
    /// Keep polling while the window is unfocused
    pub unfocused_input: bool,
    pub analog_movement: bool,
    pub virtual_mouse: bool,
    /// Pixels per step at full right-stick deflection
    pub pointer_speed: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mappings_file: Option<PathBuf>,
    pub controller: ControllerRef,
    pub dead_zones: DeadZones,
    /// Chords that differ from the defaults, keyed by binding identity
    pub bindings: BTreeMap<String, Vec<AbstractCode>>,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            controls_mode: ControlsMode::Default,
            auto_switch_mode: true,
            debug: false,
            unfocused_input: false,
            analog_movement: true,
            virtual_mouse: true,
            pointer_speed: 25.0,
            mappings_file: None,
            controller: ControllerRef::default(),
            dead_zones: DeadZones::default(),
            bindings: BTreeMap::new(),
        }
    }
}

impl ControlsConfig {
    /// `<config dir>/padcontrols/config.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let mut path = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        path.push(CONFIG_DIR);
        path.push(CONFIG_FILE);
        Ok(path)
    }

    /// Mapping database next to the config file unless one is configured.
    pub fn mappings_path(&self, config_path: &Path) -> PathBuf {
        match &self.mappings_file {
            Some(path) => path.clone(),
            None => config_path.with_file_name("gamecontrollerdb.txt"),
        }
    }

    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let config: Self = toml::from_str(&content)?;
        debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Missing file yields the defaults; a malformed one is still an error.
    pub async fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        let exists = tokio::fs::try_exists(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        if exists {
            Self::load(path).await
        } else {
            warn!(
                "Config file {} does not exist, using defaults",
                path.display()
            );
            Ok(Self::default())
        }
    }

    pub async fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| ConfigError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        let content = toml::to_string_pretty(self)?;
        tokio::fs::write(path, content)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Records a rebind; chords equal to the default are dropped from the file.
    pub fn store_binding(&mut self, change: &BindingChange) {
        let key = change.id.as_str().to_string();
        if change.is_default {
            self.bindings.remove(&key);
        } else {
            self.bindings.insert(key, change.codes.clone());
        }
    }
}
