//! The panel: fan controls plus the wiring to the workers.
//!
//! A [`Panel`] lives on the task that renders it. User input arrives through
//! the `on_*` methods and may emit commands; polled status arrives through
//! [`Panel::apply_status`] and never does.
//!
//! Every entry point takes `&mut self`, so user input cannot interleave with
//! an `apply_status` call. Reconciliation goes through
//! [`FanControl::sync_auto`], which has no command to return.

use nbfc_types::{Command, StatusSnapshot};
use tracing::debug;

use crate::fan::FanControl;
use crate::reconcile::{UiUpdate, reconcile};
use crate::surface::ControlSurface;
use crate::worker::{CommandSender, RefreshHandle};

pub struct Panel {
    controls: Vec<FanControl>,
    commands: CommandSender,
    refresh: RefreshHandle,
    last_update: Option<UiUpdate>,
}

impl Panel {
    #[must_use]
    pub fn new(controls: Vec<FanControl>, commands: CommandSender, refresh: RefreshHandle) -> Self {
        Self {
            controls,
            commands,
            refresh,
            last_update: None,
        }
    }

    #[must_use]
    pub fn controls(&self) -> &[FanControl] {
        &self.controls
    }

    #[must_use]
    pub fn control(&self, fan_index: usize) -> Option<&FanControl> {
        self.controls.iter().find(|c| c.fan_index() == fan_index)
    }

    /// Most recent update applied, `None` before the first successful poll
    #[must_use]
    pub fn last_update(&self) -> Option<&UiUpdate> {
        self.last_update.as_ref()
    }

    pub fn on_manual_edit(&mut self, fan_index: usize, value: f64) {
        self.user_input(fan_index, |control| control.manual_edit(value));
    }

    pub fn on_auto_toggled(&mut self, fan_index: usize, enabled: bool) {
        self.user_input(fan_index, |control| control.toggle_auto(enabled));
    }

    pub fn on_refresh_requested(&self) {
        self.refresh.request();
    }

    /// Reconcile the controls with `snapshot` and push the result to `surface`.
    pub fn apply_status<S: ControlSurface + ?Sized>(
        &mut self,
        snapshot: &StatusSnapshot,
        surface: &mut S,
    ) {
        let update = reconcile(snapshot, &mut self.controls);
        update.apply_to(surface);

        debug!(
            "Applied status: {} of {} fans reported",
            update.fans.len(),
            self.controls.len()
        );
        self.last_update = Some(update);
    }

    fn user_input(&mut self, fan_index: usize, event: impl FnOnce(&mut FanControl) -> Option<Command>) {
        let Some(control) = self.controls.iter_mut().find(|c| c.fan_index() == fan_index) else {
            debug!("No control for fan {}", fan_index);
            return;
        };

        if let Some(command) = event(control) {
            debug!("Queueing {}", command);
            self.commands.send(command);
        }
    }
}
