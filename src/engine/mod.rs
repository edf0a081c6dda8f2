pub mod poller;
pub mod sequencer;

pub use poller::{Controller, PanelView};
pub use sequencer::{PlanarSequencer, ChannelAssign, CHANNEL_SCALES};
