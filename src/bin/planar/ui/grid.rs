//! Note grid and step ring widgets.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use planar_cv::engine::PanelView;

/// One cell per grid slot: the degree, or a dot for a rest. The selected
/// slot is highlighted; the slot under the play cursor is marked.
pub fn render_grid(frame: &mut Frame, area: Rect, view: &PanelView) {
    let block = Block::default().title(" Grid ").borders(Borders::ALL);

    let playing_slot = view.steps.get(view.cursor).map(|s| s.slot);

    let mut spans = Vec::with_capacity(view.grid.len() * 2);
    for (slot, degree) in view.grid.iter().enumerate() {
        let cell = match degree {
            Some(d) => format!(" {:>2} ", d),
            None => "  · ".to_string(),
        };
        let mut style = Style::default().fg(Color::White);
        if Some(slot) == playing_slot {
            style = style.fg(Color::Green).add_modifier(Modifier::BOLD);
        }
        if slot == view.selected_slot {
            style = style.bg(Color::DarkGray).add_modifier(Modifier::UNDERLINED);
        }
        spans.push(Span::styled(cell, style));
        spans.push(Span::raw(" "));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

/// The expanded step ring as slot/plane pairs, with the cursor marked,
/// plus the current plane offset table.
pub fn render_steps(frame: &mut Frame, area: Rect, view: &PanelView) {
    let block = Block::default()
        .title(format!(" Steps ({}) ", view.steps.len()))
        .borders(Borders::ALL);

    let mut step_spans = Vec::with_capacity(view.steps.len() * 2);
    for (i, step) in view.steps.iter().enumerate() {
        let text = format!("{}/{}", step.slot, step.plane);
        let style = if i == view.cursor {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        step_spans.push(Span::styled(text, style));
        step_spans.push(Span::raw(" "));
    }

    let offsets = view
        .plane_offsets
        .iter()
        .take(view.active_planes.saturating_sub(1) as usize)
        .enumerate()
        .map(|(i, o)| format!("p{}+{}", i + 2, o))
        .collect::<Vec<_>>()
        .join(" ");
    let offset_line = Line::from(Span::styled(
        format!(
            "offsets: {}",
            if offsets.is_empty() { "-" } else { offsets.as_str() }
        ),
        Style::default().fg(Color::DarkGray),
    ));

    let text = vec![Line::from(step_spans), offset_line];
    frame.render_widget(Paragraph::new(text).block(block), area);
}
