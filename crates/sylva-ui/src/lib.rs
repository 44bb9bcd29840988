//! Sylva UI - Widgets for the audio sketchpad
//!
//! Panels return action enums from their `show` functions; the app applies
//! them against the engine and store. Nothing in here touches audio or
//! disk directly.
//!
//! - `Theme`: the fixed forest palette
//! - `WaveformView`: envelope display with playhead and click-to-seek
//! - `show_transport`: play/stop/loop row
//! - `widgets`: toggle switch and primary button

pub mod theme;
pub mod transport;
pub mod waveform;
pub mod widgets;

pub use theme::Theme;
pub use transport::{show_transport, TransportAction, TransportState};
pub use waveform::{WaveformAction, WaveformView};
