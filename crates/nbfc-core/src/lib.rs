//! Engine behind the NBFC panel.
//!
//! - [`fan`]: per-fan Manual/Auto state and the commands user input produces
//! - [`reconcile`]: folding a polled status into display values
//! - [`panel`]: the controls as owned by the rendering task
//! - [`worker`]: background dispatch and polling
//! - [`config`]: the panel's JSON config, loaded by the front ends

pub mod config;
pub mod fan;
pub mod panel;
pub mod reconcile;
pub mod surface;
pub mod worker;

mod error;

#[cfg(test)]
mod tests;

pub use error::{Error, Result};
pub use fan::{FanControl, FanMode};
pub use panel::Panel;
pub use reconcile::{FanUpdate, UiUpdate, reconcile};
pub use surface::ControlSurface;

pub use nbfc_types::*;
