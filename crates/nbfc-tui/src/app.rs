//! Application state and key handling for the TUI.

use std::collections::HashMap;

use chrono::{DateTime, Local};
use crossterm::event::KeyCode;
use nbfc_core::{ControlSurface, FanControl, FanUpdate, Panel, StatusSnapshot, clamp_percent};

/// Values shown in the status block, filled in by reconciliation
#[derive(Debug, Default)]
pub struct StatusView {
    pub temperature: Option<f64>,
    pub config: Option<String>,
    pub read_only: bool,
    pub fans: HashMap<usize, FanUpdate>,
    pub updated_at: Option<DateTime<Local>>,
}

impl ControlSurface for StatusView {
    fn temperature_updated(&mut self, temperature: f64) {
        self.temperature = Some(temperature);
    }

    fn fan_status_updated(
        &mut self,
        fan_index: usize,
        current_speed: f64,
        target_speed: f64,
        auto_mode: bool,
    ) {
        self.fans.insert(
            fan_index,
            FanUpdate {
                fan_index,
                current_speed,
                target_speed,
                auto_mode,
            },
        );
    }

    fn service_updated(&mut self, config: &str, read_only: bool) {
        self.config = Some(config.to_string());
        self.read_only = read_only;
    }
}

/// Main application state
pub struct App {
    pub panel: Panel,
    pub status: StatusView,

    /// Position in `panel.controls()`
    pub selected: usize,

    pub slider_step: f64,
    pub should_quit: bool,
}

impl App {
    pub fn new(panel: Panel, slider_step: f64) -> Self {
        Self {
            panel,
            status: StatusView::default(),
            selected: 0,
            slider_step,
            should_quit: false,
        }
    }

    pub fn selected_control(&self) -> Option<&FanControl> {
        self.panel.controls().get(self.selected)
    }

    pub fn apply_status(&mut self, snapshot: &StatusSnapshot) {
        self.panel.apply_status(snapshot, &mut self.status);
        self.status.updated_at = Some(Local::now());
    }

    /// Handle a key press. Returns true if the screen needs a redraw.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                false
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                true
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let last = self.panel.controls().len().saturating_sub(1);
                self.selected = (self.selected + 1).min(last);
                true
            }
            KeyCode::Left | KeyCode::Char('h') => self.adjust_selected(-self.slider_step),
            KeyCode::Right | KeyCode::Char('l') => self.adjust_selected(self.slider_step),
            KeyCode::Char('a' | ' ') => self.toggle_selected(),
            KeyCode::Char('r') => {
                self.panel.on_refresh_requested();
                false
            }
            _ => false,
        }
    }

    // Unchanged after clamping means the slider is already at a bound
    #[allow(clippy::float_cmp)]
    fn adjust_selected(&mut self, delta: f64) -> bool {
        let Some(control) = self.selected_control() else {
            return false;
        };
        if !control.is_editable() {
            return false;
        }

        let fan_index = control.fan_index();
        let current = control.value();
        let value = clamp_percent(current + delta);
        if value == current {
            return false;
        }

        self.panel.on_manual_edit(fan_index, value);
        true
    }

    fn toggle_selected(&mut self) -> bool {
        let Some(control) = self.selected_control() else {
            return false;
        };
        let (fan_index, enabled) = (control.fan_index(), !control.is_auto());

        self.panel.on_auto_toggled(fan_index, enabled);
        true
    }
}
