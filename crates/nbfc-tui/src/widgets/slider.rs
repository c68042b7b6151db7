//! Slider widget for TUI display.
//!
//! Renders a horizontal 0-100% slider with filled/empty sections and a
//! value label.
//!
//! # Example
//!
//! ```text
//! [################....] 75%
//! [::::::::::::::::::::] Auto
//! ```

use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
};

const FILLED_CHAR: char = '\u{2588}'; // Full block
const EMPTY_CHAR: char = '\u{2591}'; // Light shade

/// Theme colors matching colors.rs
const SUCCESS_COLOR: Color = Color::Rgb(0xb5, 0xcc, 0xba);
const OUTLINE_COLOR: Color = Color::Rgb(0x94, 0x8f, 0x94);
const PRIMARY_COLOR: Color = Color::Rgb(0xcb, 0xc4, 0xcb);

const MIN_BAR_WIDTH: usize = 5;

/// A fan speed slider rendered as `[####....] value`.
pub struct Slider<'a> {
    value: f64,
    display_value: &'a str,
    selected: bool,
    disabled: bool,
}

impl<'a> Slider<'a> {
    /// Slider at `value` percent, labelled with `display_value`.
    #[must_use]
    pub fn new(value: f64, display_value: &'a str) -> Self {
        Self {
            value,
            display_value,
            selected: false,
            disabled: false,
        }
    }

    #[must_use]
    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Dimmed bar that ignores the value, for fans in auto mode.
    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    fn percentage(&self) -> f64 {
        (self.value / 100.0).clamp(0.0, 1.0)
    }

    // Percentage is f64, bar width is bounded by terminal size
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn render_inline(&self, available_width: usize) -> Vec<Span<'a>> {
        let mut spans = Vec::new();

        let value_width = self.display_value.chars().count() + 1;

        let bracket_width = 2;
        let bar_width = available_width
            .saturating_sub(bracket_width)
            .saturating_sub(value_width)
            .max(MIN_BAR_WIDTH);

        let filled_count = if self.disabled {
            0
        } else {
            (self.percentage() * bar_width as f64).round() as usize
        };
        let empty_count = bar_width.saturating_sub(filled_count);

        let bracket_style = if self.selected {
            Style::default().fg(PRIMARY_COLOR)
        } else {
            Style::default().fg(OUTLINE_COLOR)
        };
        let value_style = match (self.selected, self.disabled) {
            (_, true) => Style::default()
                .fg(OUTLINE_COLOR)
                .add_modifier(Modifier::ITALIC),
            (true, false) => Style::default()
                .fg(PRIMARY_COLOR)
                .add_modifier(Modifier::BOLD),
            (false, false) => Style::default().fg(PRIMARY_COLOR),
        };
        let empty_style = if self.disabled {
            Style::default()
                .fg(OUTLINE_COLOR)
                .add_modifier(Modifier::DIM)
        } else {
            Style::default().fg(OUTLINE_COLOR)
        };

        spans.push(Span::styled("[", bracket_style));

        if filled_count > 0 {
            spans.push(Span::styled(
                FILLED_CHAR.to_string().repeat(filled_count),
                Style::default().fg(SUCCESS_COLOR),
            ));
        }

        if empty_count > 0 {
            spans.push(Span::styled(
                EMPTY_CHAR.to_string().repeat(empty_count),
                empty_style,
            ));
        }

        spans.push(Span::styled("]", bracket_style));

        spans.push(Span::styled(format!(" {}", self.display_value), value_style));

        spans
    }
}
