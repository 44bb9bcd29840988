//! Sylva Audio - Real-time playback engine
//!
//! Plays the single active buffer through the system output device with
//! seek, loop, and click-free boundary fades.
//!
//! Architecture:
//! - `Transport`: Atomic cursor and flags shared with the audio callback
//! - `Renderer`: Allocation-free callback half, also usable headless
//! - `PlaybackSession`: Control-thread owner of buffer and stream
//! - `Fader`: Linear boundary ramps, whole-buffer and per-sample forms
//! - `Envelope`: Peak-per-pixel reduction for the waveform display

pub mod envelope;
pub mod error;
pub mod fade;
pub mod session;

pub use envelope::{position_for_x, Envelope};
pub use error::{AudioError, AudioResult};
pub use fade::Fader;
pub use session::{PlaybackSession, Renderer, Transport};
