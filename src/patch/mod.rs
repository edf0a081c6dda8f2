//! Patch persistence: a bank is one JSON document holding everything a
//! power cycle would otherwise lose. Saves are debounced so knob sweeps
//! do not hammer the filesystem; loads fall back to the default patch
//! rather than surfacing errors into the performance loop.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::pitch::RootMode;
use crate::{GRID_SLOTS, MAX_PLANES};

/// Bump when the bank layout changes incompatibly.
pub const BANK_VERSION: u32 = 1;

/// The persisted part of a patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    pub version: u32,
    pub grid: [Option<u8>; GRID_SLOTS],
    pub plane_offsets: [u8; (MAX_PLANES - 1) as usize],
    pub active_planes: u8,
    pub shuffle: bool,
    pub root_mode: RootMode,
}

impl Default for Bank {
    fn default() -> Self {
        let mut grid = [None; GRID_SLOTS];
        grid[0] = Some(0);
        Self {
            version: BANK_VERSION,
            grid,
            plane_offsets: [7; (MAX_PLANES - 1) as usize],
            active_planes: 1,
            shuffle: false,
            root_mode: RootMode::default(),
        }
    }
}

/// Errors from bank file IO.
#[derive(Debug)]
pub enum BankError {
    Io(std::io::Error),
    Format(serde_json::Error),
    /// The file parsed but was written by an incompatible version.
    Version { found: u32 },
}

impl std::fmt::Display for BankError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BankError::Io(e) => write!(f, "bank file io: {}", e),
            BankError::Format(e) => write!(f, "bank file format: {}", e),
            BankError::Version { found } => {
                write!(
                    f,
                    "bank version {} incompatible with {}",
                    found, BANK_VERSION
                )
            }
        }
    }
}

impl std::error::Error for BankError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BankError::Io(e) => Some(e),
            BankError::Format(e) => Some(e),
            BankError::Version { .. } => None,
        }
    }
}

impl From<std::io::Error> for BankError {
    fn from(e: std::io::Error) -> Self {
        BankError::Io(e)
    }
}

impl From<serde_json::Error> for BankError {
    fn from(e: serde_json::Error) -> Self {
        BankError::Format(e)
    }
}

/// Write a bank as pretty JSON.
pub fn save_bank(path: &Path, bank: &Bank) -> Result<(), BankError> {
    let json = serde_json::to_string_pretty(bank)?;
    fs::write(path, json)?;
    Ok(())
}

/// Read and version-check a bank.
pub fn load_bank(path: &Path) -> Result<Bank, BankError> {
    let json = fs::read_to_string(path)?;
    let bank: Bank = serde_json::from_str(&json)?;
    if bank.version != BANK_VERSION {
        return Err(BankError::Version {
            found: bank.version,
        });
    }
    Ok(bank)
}

/// Load a bank, falling back to the default patch on any failure.
pub fn load_or_default(path: &Path) -> Bank {
    match load_bank(path) {
        Ok(bank) => bank,
        Err(e) => {
            log::warn!("bank load failed ({}), starting from defaults", e);
            Bank::default()
        }
    }
}

/// Pure debounce clock for bank saves, driven by loop ticks so it works
/// identically on hardware, in the simulator, and in tests.
///
/// `touch` marks the patch dirty; `due` answers once the patch has then
/// been left alone for the configured number of ticks.
#[derive(Debug, Clone, Copy)]
pub struct DebouncedSaver {
    dirty_at: Option<u64>,
    delay_ticks: u64,
}

impl DebouncedSaver {
    pub fn new(delay_ticks: u64) -> Self {
        Self {
            dirty_at: None,
            delay_ticks,
        }
    }

    pub fn touch(&mut self, now: u64) {
        self.dirty_at = Some(now);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty_at.is_some()
    }

    /// True exactly once per quiet period; clears the dirty flag.
    pub fn due(&mut self, now: u64) -> bool {
        match self.dirty_at {
            Some(since) if now.saturating_sub(since) >= self.delay_ticks => {
                self.dirty_at = None;
                true
            }
            _ => false,
        }
    }
}
