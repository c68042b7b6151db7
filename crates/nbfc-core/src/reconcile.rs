//! Status reconciliation.
//!
//! Turns a polled [`StatusSnapshot`] into display values and brings each
//! fan's mode in line with the service. No I/O happens here and no command
//! is produced.

use nbfc_types::StatusSnapshot;

use crate::fan::FanControl;

/// Shown for the temperature before the first successful poll
pub const UNKNOWN_TEMPERATURE_TEXT: &str = "--°C";
pub const UNKNOWN_SPEED_TEXT: &str = "Speed: --%";
pub const UNKNOWN_TARGET_TEXT: &str = "Target: --%";
pub const UNKNOWN_AUTO_TEXT: &str = "Auto: --";

/// Display values derived from one snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct UiUpdate {
    pub temperature: f64,

    /// Active service configuration, e.g. the notebook model
    pub config: String,

    pub read_only: bool,

    /// Only fans present in both the snapshot and the configured slots
    pub fans: Vec<FanUpdate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FanUpdate {
    /// Fan index as numbered by the service
    pub fan_index: usize,
    pub current_speed: f64,
    pub target_speed: f64,
    pub auto_mode: bool,
}

impl UiUpdate {
    #[must_use]
    pub fn temperature_text(&self) -> String {
        format_temperature(self.temperature)
    }

    #[must_use]
    pub fn fan(&self, fan_index: usize) -> Option<&FanUpdate> {
        self.fans.iter().find(|fan| fan.fan_index == fan_index)
    }
}

impl FanUpdate {
    #[must_use]
    pub fn speed_text(&self) -> String {
        format!("Speed: {:.1}%", self.current_speed)
    }

    #[must_use]
    pub fn target_text(&self) -> String {
        format!("Target: {:.1}%", self.target_speed)
    }

    #[must_use]
    pub fn auto_text(&self) -> String {
        format!("Auto: {}", self.auto_mode)
    }
}

#[must_use]
pub fn format_temperature(temperature: f64) -> String {
    format!("{temperature:.1}°C")
}

/// Reconcile `controls` against `snapshot`.
///
/// The service is authoritative for each fan's mode, so disagreeing
/// controls are switched through the no-emit path. Controls whose fan is
/// missing from the snapshot are left as they are, and snapshot fans
/// without a configured control are ignored.
pub fn reconcile(snapshot: &StatusSnapshot, controls: &mut [FanControl]) -> UiUpdate {
    let mut fans = Vec::with_capacity(controls.len());

    for control in controls.iter_mut() {
        let Some(status) = snapshot.fan(control.fan_index()) else {
            tracing::debug!(
                "Fan {} missing from status, keeping previous display",
                control.fan_index()
            );
            continue;
        };

        control.sync_auto(status.auto_mode);
        fans.push(FanUpdate {
            fan_index: control.fan_index(),
            current_speed: status.current_speed,
            target_speed: status.target_speed,
            auto_mode: status.auto_mode,
        });
    }

    UiUpdate {
        temperature: snapshot.temperature,
        config: snapshot.config.clone(),
        read_only: snapshot.read_only,
        fans,
    }
}
