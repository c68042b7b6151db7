//! Per-fan control state.
//!
//! A [`FanControl`] has two kinds of entry points. The user path
//! ([`FanControl::manual_edit`], [`FanControl::toggle_auto`]) returns the
//! command to send, if any. The remote path ([`FanControl::sync_auto`])
//! returns nothing, so bringing a fan in line with the service can never
//! produce traffic back to it.

use nbfc_types::{Command, FanSpeed, clamp_percent};

/// Mode of a single fan as the panel models it
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FanMode {
    /// The client's last explicit speed governs
    Manual(f64),
    /// The service's own curve governs
    Auto,
}

#[derive(Debug, Clone)]
pub struct FanControl {
    label: String,
    fan_index: usize,

    /// Value re-sent when leaving Auto
    last_manual_value: f64,

    /// Value shown on the slider
    value: f64,

    auto_active: bool,
}

impl FanControl {
    /// Control for service fan `fan_index`, in Manual at 0%.
    pub fn new(label: impl Into<String>, fan_index: usize) -> Self {
        Self {
            label: label.into(),
            fan_index,
            last_manual_value: 0.0,
            value: 0.0,
            auto_active: false,
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn fan_index(&self) -> usize {
        self.fan_index
    }

    /// Value currently shown on the slider
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[must_use]
    pub fn last_manual_value(&self) -> f64 {
        self.last_manual_value
    }

    #[must_use]
    pub fn is_auto(&self) -> bool {
        self.auto_active
    }

    /// Direct edits are accepted only in Manual.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        !self.auto_active
    }

    #[must_use]
    pub fn mode(&self) -> FanMode {
        if self.auto_active {
            FanMode::Auto
        } else {
            FanMode::Manual(self.last_manual_value)
        }
    }

    /// Label next to the slider: `42%`, or `Auto` while the service governs.
    #[must_use]
    pub fn value_text(&self) -> String {
        if self.auto_active {
            "Auto".to_string()
        } else {
            format!("{:.0}%", self.value)
        }
    }

    /// The user moved the slider.
    ///
    /// Ignored while Auto is active, since the slider is disabled then.
    pub fn manual_edit(&mut self, value: f64) -> Option<Command> {
        if self.auto_active {
            tracing::debug!("Fan {} is in auto mode, ignoring edit", self.fan_index);
            return None;
        }

        let value = clamp_percent(value);
        self.value = value;
        self.last_manual_value = value;
        Some(Command::set_fan_speed(
            self.fan_index,
            FanSpeed::Percent(value),
        ))
    }

    /// The user flipped the auto toggle.
    ///
    /// Entering Auto remembers the slider value; leaving it restores that
    /// value and re-sends it, since the service keeps no copy of it.
    pub fn toggle_auto(&mut self, enabled: bool) -> Option<Command> {
        if enabled == self.auto_active {
            return None;
        }

        if enabled {
            self.last_manual_value = self.value;
            self.auto_active = true;
            Some(Command::set_fan_speed(self.fan_index, FanSpeed::Auto))
        } else {
            self.auto_active = false;
            self.value = self.last_manual_value;
            Some(Command::set_fan_speed(
                self.fan_index,
                FanSpeed::Percent(self.last_manual_value),
            ))
        }
    }

    /// Bring the mode in line with what the service reports.
    ///
    /// Never touches `last_manual_value`; leaving Auto puts it back on the
    /// slider.
    pub fn sync_auto(&mut self, auto_mode: bool) {
        if auto_mode == self.auto_active {
            return;
        }

        tracing::debug!(
            "Fan {} switched to {} by the service",
            self.fan_index,
            if auto_mode { "auto" } else { "manual" }
        );
        self.auto_active = auto_mode;
        if !auto_mode {
            self.value = self.last_manual_value;
        }
    }
}
