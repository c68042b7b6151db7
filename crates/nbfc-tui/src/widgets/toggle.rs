use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
};

const SUCCESS_COLOR: Color = Color::Rgb(0xb5, 0xcc, 0xba);
const OUTLINE_COLOR: Color = Color::Rgb(0x94, 0x8f, 0x94);

/// Checkbox for a fan's auto mode: `[x] Auto` or `[ ] Auto`.
#[must_use]
pub fn toggle_spans(active: bool, selected: bool) -> Vec<Span<'static>> {
    let mark = if active { "[x]" } else { "[ ]" };
    let mut mark_style = Style::default().fg(if active { SUCCESS_COLOR } else { OUTLINE_COLOR });
    if selected {
        mark_style = mark_style.add_modifier(Modifier::BOLD);
    }

    vec![
        Span::styled(mark, mark_style),
        Span::styled(" Auto", Style::default().fg(OUTLINE_COLOR)),
    ]
}
