//! Output voltage gauges, one per CV jack.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Gauge},
    Frame,
};

use planar_cv::engine::CHANNEL_SCALES;
use planar_cv::io::sim::SimCv;
use planar_cv::pitch::{MIDI_CEIL, MIDI_FLOOR};

/// Full-scale span of the gauges in volts.
const VOLT_SPAN: f32 = (MIDI_CEIL as f32 - MIDI_FLOOR as f32) / 12.0;

pub fn render_outputs(frame: &mut Frame, area: Rect, cv: &SimCv) {
    let block = Block::default().title(" Outputs ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1); 6])
        .split(inner);

    for (assign, row) in CHANNEL_SCALES.iter().zip(rows.iter()) {
        let volts = cv.voltage_of(assign.channel);
        let gated = cv.is_on(assign.channel);

        let label = format!(
            "CV{} {:<4} {:+}  {}",
            assign.channel.index() + 1,
            assign.scale.label(),
            assign.octave_shift,
            if gated {
                format!("{:.2} V", volts)
            } else {
                "off".to_string()
            }
        );

        let ratio = if gated {
            (volts / VOLT_SPAN).clamp(0.0, 1.0) as f64
        } else {
            0.0
        };

        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(if gated { Color::Cyan } else { Color::DarkGray }))
            .ratio(ratio)
            .label(label);
        frame.render_widget(gauge, *row);
    }
}
