//! planar - terminal simulator for the planar sequencer engine
//!
//! Run with: cargo run --bin planar [bank.json]
//!
//! Keyboard stands in for the module hardware: an internal clock drives
//! the sequence, keys map to the two buttons and three analog controls.

mod app;
mod ui;

use std::path::PathBuf;

use app::Planar;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let bank_path = std::env::args().nth(1).map(PathBuf::from);
    let mut app = Planar::new(bank_path);

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();
    result
}
