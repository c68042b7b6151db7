use crate::fan::FanControl;
use crate::{Error, Result};
use nbfc_rpc::{TransportOptions, default_socket_path};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Panel configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Service socket (defaults to `$NBFC_SOCKET` or the well-known path)
    #[serde(default = "default_socket_path")]
    pub socket_path: PathBuf,

    /// Period of the background status poll, 0 for manual refresh only
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_ms: u64,

    /// Percentage added or removed per slider step
    #[serde(default = "default_slider_step")]
    pub slider_step: u8,

    /// Fan slots shown by the panel, in display order
    #[serde(default = "default_fans")]
    pub fans: Vec<FanSlot>,
}

/// One controllable fan as shown by the panel
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FanSlot {
    pub label: String,

    /// Fan index as numbered by the service
    pub index: usize,
}

impl FanSlot {
    pub fn new(label: impl Into<String>, index: usize) -> Self {
        Self {
            label: label.into(),
            index,
        }
    }
}

fn default_poll_interval() -> u64 {
    2000
}
fn default_connect_timeout() -> u64 {
    2000
}
fn default_idle_timeout() -> u64 {
    500
}
fn default_slider_step() -> u8 {
    5
}
fn default_fans() -> Vec<FanSlot> {
    vec![FanSlot::new("CPU Fan", 0), FanSlot::new("GPU Fan", 1)]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            socket_path: default_socket_path(),
            poll_interval_ms: default_poll_interval(),
            connect_timeout_ms: default_connect_timeout(),
            idle_timeout_ms: default_idle_timeout(),
            slider_step: default_slider_step(),
            fans: default_fans(),
        }
    }
}

impl Config {
    /// Load config from file, falling back to defaults when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// describes an unusable fan layout.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        super::validation::warn_unknown_fields(&content, "config.json");
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the fan layout.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if no fan slots are configured or two slots
    /// point at the same service fan.
    pub fn validate(&self) -> Result<()> {
        if self.fans.is_empty() {
            return Err(Error::Config("no fan slots configured".to_string()));
        }

        let mut seen = HashSet::new();
        for slot in &self.fans {
            if !seen.insert(slot.index) {
                return Err(Error::Config(format!(
                    "fan index {} is configured more than once",
                    slot.index
                )));
            }
        }
        Ok(())
    }

    /// `None` when periodic polling is disabled.
    #[must_use]
    pub fn poll_interval(&self) -> Option<Duration> {
        (self.poll_interval_ms > 0).then(|| Duration::from_millis(self.poll_interval_ms))
    }

    /// Slider step as a percentage, never zero.
    #[must_use]
    pub fn slider_step(&self) -> f64 {
        f64::from(self.slider_step.clamp(1, 100))
    }

    #[must_use]
    pub fn transport_options(&self) -> TransportOptions {
        TransportOptions {
            socket_path: self.socket_path.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            idle_timeout: Duration::from_millis(self.idle_timeout_ms),
            ..TransportOptions::default()
        }
    }

    /// Fresh control state for every configured slot, all in Manual at 0%.
    #[must_use]
    pub fn fan_controls(&self) -> Vec<FanControl> {
        self.fans
            .iter()
            .map(|slot| FanControl::new(slot.label.clone(), slot.index))
            .collect()
    }
}
