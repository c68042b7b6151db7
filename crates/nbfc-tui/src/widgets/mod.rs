//! TUI widgets for nbfc-tui.
//!
//! - [`Slider`] - Fan speed slider, dimmed while the service governs the fan
//! - [`toggle_spans`] - Auto mode checkbox

mod slider;
mod toggle;

pub use slider::Slider;
pub use toggle::toggle_spans;
