//! TUI module for planar
//!
//! Renders the note grid, the expanded step ring, and the six output
//! voltages from a [`PanelView`] snapshot plus the simulated CV state.

mod grid;
mod outputs;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use planar_cv::engine::PanelView;
use planar_cv::io::sim::SimCv;

use grid::{render_grid, render_steps};
use outputs::render_outputs;

pub fn draw(
    frame: &mut Frame,
    view: &PanelView,
    cv: &SimCv,
    bpm: f64,
    root_volts: f32,
    status: &str,
) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Status bar
            Constraint::Length(4), // Note grid
            Constraint::Length(4), // Step ring
            Constraint::Min(8),    // Outputs
            Constraint::Length(1), // Help bar
        ])
        .split(area);

    render_status(frame, chunks[0], view, bpm, root_volts, status);
    render_grid(frame, chunks[1], view);
    render_steps(frame, chunks[2], view);
    render_outputs(frame, chunks[3], cv);

    let help = Paragraph::new(
        " [Q] Quit  [Tab] Slot  [←→] Note  [↑↓] Planes  [S] Shuffle  [R] Randomize  [M] Mode+Reset  [ [ / ] ] Root  [Space] Pulse  [+/-] BPM",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[4]);
}

fn render_status(
    frame: &mut Frame,
    area: ratatui::layout::Rect,
    view: &PanelView,
    bpm: f64,
    root_volts: f32,
    status: &str,
) {
    let block = Block::default().title(" planar ").borders(Borders::ALL);

    let line = Line::from(vec![
        Span::styled(
            format!(" BPM: {:.0}  ", bpm),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("{}  ", view.root_mode.label()),
            Style::default().fg(Color::Green),
        ),
        Span::styled(
            format!("root {} ({:+.2} V)  ", view.root_midi, root_volts),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!(
                "planes {}  {}  ",
                view.active_planes,
                if view.shuffle { "shuffled" } else { "ordered" }
            ),
            Style::default().fg(Color::White),
        ),
        Span::styled(status.to_string(), Style::default().fg(Color::DarkGray)),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}
