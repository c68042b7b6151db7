use crate::reconcile::UiUpdate;

/// Receives display values from the engine.
///
/// Implemented by whatever renders the panel. Callbacks only carry data;
/// nothing a surface does here is treated as user input.
pub trait ControlSurface {
    fn temperature_updated(&mut self, temperature: f64);

    fn fan_status_updated(
        &mut self,
        fan_index: usize,
        current_speed: f64,
        target_speed: f64,
        auto_mode: bool,
    );

    /// Active service configuration and whether it accepts speed changes.
    fn service_updated(&mut self, _config: &str, _read_only: bool) {}
}

impl UiUpdate {
    /// Deliver this update to a surface, temperature first.
    pub fn apply_to<S: ControlSurface + ?Sized>(&self, surface: &mut S) {
        surface.service_updated(&self.config, self.read_only);
        surface.temperature_updated(self.temperature);
        for fan in &self.fans {
            surface.fan_status_updated(
                fan.fan_index,
                fan.current_speed,
                fan.target_speed,
                fan.auto_mode,
            );
        }
    }
}
