//! Panel rendering.

use crate::{app::App, colors};
use nbfc_core::reconcile::{
    UNKNOWN_AUTO_TEXT, UNKNOWN_SPEED_TEXT, UNKNOWN_TARGET_TEXT, UNKNOWN_TEMPERATURE_TEXT,
    format_temperature,
};
use nbfc_tui::widgets::{Slider, toggle_spans};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

const LABEL_WIDTH: usize = 12;
const TOGGLE_WIDTH: usize = 10;

pub fn render(f: &mut Frame, app: &App) {
    // Fan rows plus block borders
    let fan_rows = u16::try_from(app.panel.controls().len()).unwrap_or(u16::MAX);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(fan_rows.saturating_add(2)),
            Constraint::Length(fan_rows.saturating_add(3)),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_controls(f, app, chunks[0]);
    render_status(f, app, chunks[1]);
    render_footer(f, chunks[3]);
}

fn panel_block(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_alignment(Alignment::Left)
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(colors::OUTLINE))
}

fn render_controls(f: &mut Frame, app: &App, area: Rect) {
    let title = match (&app.status.config, app.status.read_only) {
        (Some(config), true) => format!(" Fan Control - {config} (read-only) "),
        (Some(config), false) => format!(" Fan Control - {config} "),
        (None, _) => " Fan Control ".to_string(),
    };
    let block = panel_block(title);
    let inner_width = usize::from(block.inner(area).width);

    let slider_width = inner_width
        .saturating_sub(LABEL_WIDTH)
        .saturating_sub(TOGGLE_WIDTH);

    let lines: Vec<Line> = app
        .panel
        .controls()
        .iter()
        .enumerate()
        .map(|(i, control)| {
            let selected = i == app.selected;
            let value_text = control.value_text();

            let label_style = if selected {
                Style::default()
                    .fg(colors::PRIMARY)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors::ON_SURFACE)
            };
            let marker = if selected { "> " } else { "  " };

            let mut spans = vec![Span::styled(
                format!(
                    "{marker}{:<width$}",
                    control.label(),
                    width = LABEL_WIDTH.saturating_sub(2)
                ),
                label_style,
            )];
            spans.extend(
                Slider::new(control.value(), &value_text)
                    .selected(selected)
                    .disabled(control.is_auto())
                    .render_inline(slider_width)
                    .into_iter()
                    .map(|span| Span::styled(span.content.into_owned(), span.style)),
            );
            spans.push(Span::raw("  "));
            spans.extend(toggle_spans(control.is_auto(), selected));
            Line::from(spans)
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let title = match app.status.updated_at {
        Some(at) => format!(" Status - updated {} ", at.format("%H:%M:%S")),
        None => " Status ".to_string(),
    };

    let temperature = app
        .status
        .temperature
        .map_or_else(|| UNKNOWN_TEMPERATURE_TEXT.to_string(), format_temperature);

    let mut lines = vec![Line::from(vec![
        Span::styled("Temperature: ", Style::default().fg(colors::SUBTEXT)),
        Span::styled(
            temperature,
            Style::default()
                .fg(colors::WARNING)
                .add_modifier(Modifier::BOLD),
        ),
    ])];

    for control in app.panel.controls() {
        let (speed, target, auto) = app.status.fans.get(&control.fan_index()).map_or_else(
            || {
                (
                    UNKNOWN_SPEED_TEXT.to_string(),
                    UNKNOWN_TARGET_TEXT.to_string(),
                    UNKNOWN_AUTO_TEXT.to_string(),
                )
            },
            |fan| (fan.speed_text(), fan.target_text(), fan.auto_text()),
        );

        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<width$}", control.label(), width = LABEL_WIDTH),
                Style::default().fg(colors::ON_SURFACE),
            ),
            Span::styled(format!("{speed:<16}"), Style::default().fg(colors::SUCCESS)),
            Span::styled(format!("{target:<16}"), Style::default().fg(colors::SUBTEXT)),
            Span::styled(auto, Style::default().fg(colors::SUBTEXT)),
        ]));
    }

    f.render_widget(Paragraph::new(lines).block(panel_block(title)), area);
}

fn render_footer(f: &mut Frame, area: Rect) {
    let hint = Line::from(Span::styled(
        "Up/Down select  Left/Right adjust  a auto  r refresh  q quit",
        Style::default()
            .fg(colors::SUBTEXT)
            .add_modifier(Modifier::ITALIC),
    ));
    f.render_widget(Paragraph::new(hint).alignment(Alignment::Center), area);
}
