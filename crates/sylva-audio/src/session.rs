//! Playback session: one buffer, one output stream at a time.
//!
//! The control thread owns a [`PlaybackSession`] and drives it from the UI.
//! The device callback owns a [`Renderer`], which reads the shared buffer
//! through an [`Arc`] and exchanges cursor and flags with the control thread
//! through a [`Transport`] of atomics. No locks cross the boundary, and the
//! callback never allocates, blocks, or logs.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, SampleFormat, SizedSample, Stream, StreamConfig};
use crossbeam_channel::{unbounded, Receiver, Sender};
use sylva_core::{SharedBuffer, CHANNELS};
use tracing::{debug, info, warn};

use crate::error::{AudioError, AudioResult};
use crate::fade::Fader;

/// Cursor and flags shared between the control thread and the audio
/// callback.
///
/// The cursor counts samples per channel from the start of the buffer and
/// stays within `0..=len`. Writes use release ordering and reads acquire,
/// so a seek published by the UI is seen by the next callback. Concurrent
/// writers are last-writer-wins; a seek landing mid-callback may be
/// overwritten by that callback's own cursor advance, which self-corrects
/// one buffer later.
pub struct Transport {
    cursor: AtomicUsize,
    playing: AtomicBool,
    looping: AtomicBool,
}

impl Transport {
    /// A transport at position zero, stopped.
    pub fn new(looping: bool) -> Self {
        Self {
            cursor: AtomicUsize::new(0),
            playing: AtomicBool::new(false),
            looping: AtomicBool::new(looping),
        }
    }

    /// Current playback position in samples per channel.
    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::Acquire)
    }

    /// Move the playback position.
    pub fn seek(&self, sample: usize) {
        self.cursor.store(sample, Ordering::Release);
    }

    /// True while an output stream is expected to render audio.
    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Acquire)
    }

    /// Mark the transport as playing.
    pub fn start(&self) {
        self.playing.store(true, Ordering::Release);
    }

    /// Mark the transport as stopped. The cursor is left untouched.
    pub fn halt(&self) {
        self.playing.store(false, Ordering::Release);
    }

    /// Whether playback wraps at the end of the buffer.
    pub fn looping(&self) -> bool {
        self.looping.load(Ordering::Acquire)
    }

    /// Toggle wrap-around playback. Takes effect at the next callback.
    pub fn set_looping(&self, looping: bool) {
        self.looping.store(looping, Ordering::Release);
    }
}

/// The callback-side half of a session.
///
/// Fills interleaved stereo device buffers from the shared sample buffer,
/// applying the boundary fade gains by absolute position. One renderer is
/// moved into each output stream; it can also be driven directly for
/// headless rendering.
pub struct Renderer {
    buffer: SharedBuffer,
    transport: Arc<Transport>,
    fader: Fader,
}

impl Renderer {
    pub fn new(buffer: SharedBuffer, transport: Arc<Transport>, fader: Fader) -> Self {
        Self {
            buffer,
            transport,
            fader,
        }
    }

    /// Render the next `out.len() / 2` frames.
    ///
    /// Reads the cursor once on entry and publishes it once on exit. When a
    /// non-looping buffer runs out mid-request the remainder is filled with
    /// silence, the transport is halted so the control thread can reap the
    /// stream, and the cursor keeps the final chunk's start position. When
    /// looping, the shortfall is fetched from position zero, which places
    /// the fade-in ramp on the wrapped portion.
    pub fn fill<T>(&self, out: &mut [T])
    where
        T: SizedSample + FromSample<f32>,
    {
        let len = self.buffer.len();
        if !self.transport.is_playing() || len == 0 {
            out.fill(T::EQUILIBRIUM);
            return;
        }

        let left = self.buffer.left();
        let right = self.buffer.right();
        let total = out.len() / CHANNELS;
        let start = self.transport.cursor().min(len);

        let mut pos = start;
        let mut written = 0usize;
        while written < total {
            if pos >= len {
                if !self.transport.looping() {
                    break;
                }
                pos = 0;
            }
            let n = (len - pos).min(total - written);
            for i in 0..n {
                let gain = self.fader.gain_at(pos + i, len);
                let frame = (written + i) * CHANNELS;
                out[frame] = T::from_sample(left[pos + i] * gain);
                out[frame + 1] = T::from_sample(right[pos + i] * gain);
            }
            written += n;
            pos += n;
        }

        if written < total {
            // Non-looping buffer exhausted: pad with silence and halt so the
            // control thread tears the stream down. The cursor stays at the
            // final chunk's start, so stop-then-play resumes the tail.
            out[written * CHANNELS..].fill(T::EQUILIBRIUM);
            self.transport.halt();
        } else {
            self.transport
                .seek(if self.transport.looping() { pos % len } else { pos });
        }
    }
}

/// Owns the loaded buffer and the output stream, and exposes every
/// control-thread entry point: load, play, stop, seek, loop toggle.
///
/// At most one stream exists at a time; `cpal::Stream` is not `Send`, so
/// the session must stay on the thread that created it.
pub struct PlaybackSession {
    transport: Arc<Transport>,
    fader: Fader,
    buffer: Option<SharedBuffer>,
    stream: Option<Stream>,
    error_tx: Sender<cpal::StreamError>,
    error_rx: Receiver<cpal::StreamError>,
}

impl PlaybackSession {
    /// A session with no buffer loaded.
    pub fn new(fade_samples: usize, looping: bool) -> Self {
        let (error_tx, error_rx) = unbounded();
        Self {
            transport: Arc::new(Transport::new(looping)),
            fader: Fader::new(fade_samples),
            buffer: None,
            stream: None,
            error_tx,
            error_rx,
        }
    }

    /// Install a new buffer, stopping any current playback and rewinding
    /// the cursor to zero.
    pub fn set_buffer(&mut self, buffer: SharedBuffer) {
        self.stop();
        self.transport.seek(0);
        info!(
            samples = buffer.len(),
            sample_rate = buffer.sample_rate(),
            "buffer loaded"
        );
        self.buffer = Some(buffer);
    }

    /// The currently loaded buffer, if any.
    pub fn buffer(&self) -> Option<&SharedBuffer> {
        self.buffer.as_ref()
    }

    /// Start playback from the current cursor position.
    ///
    /// A no-op when already playing or when no non-empty buffer is loaded.
    /// On a device failure the session stays idle and the error is returned
    /// for the caller to surface; there is no automatic retry.
    pub fn play(&mut self) -> AudioResult<()> {
        if self.transport.is_playing() {
            return Ok(());
        }
        let Some(buffer) = self.buffer.clone() else {
            return Ok(());
        };
        if buffer.is_empty() {
            return Ok(());
        }

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;
        let supported = device.default_output_config()?;
        let sample_format = supported.sample_format();
        let config = StreamConfig {
            channels: CHANNELS as u16,
            sample_rate: cpal::SampleRate(buffer.sample_rate()),
            buffer_size: cpal::BufferSize::Default,
        };

        info!(
            device = %device.name().unwrap_or_else(|_| "unknown".into()),
            sample_rate = buffer.sample_rate(),
            format = ?sample_format,
            cursor = self.transport.cursor(),
            "opening output stream"
        );

        let renderer = Renderer::new(buffer, Arc::clone(&self.transport), self.fader);

        // Raised before the stream starts so the first callback renders
        // audio; lowered again if anything below fails.
        self.transport.start();
        let result = match sample_format {
            SampleFormat::F32 => self.open_stream::<f32>(&device, &config, renderer),
            SampleFormat::I16 => self.open_stream::<i16>(&device, &config, renderer),
            SampleFormat::U16 => self.open_stream::<u16>(&device, &config, renderer),
            other => Err(AudioError::UnsupportedFormat(other)),
        };
        match result {
            Ok(stream) => {
                self.stream = Some(stream);
                Ok(())
            }
            Err(err) => {
                self.transport.halt();
                Err(err)
            }
        }
    }

    fn open_stream<T>(
        &self,
        device: &Device,
        config: &StreamConfig,
        renderer: Renderer,
    ) -> AudioResult<Stream>
    where
        T: SizedSample + FromSample<f32> + Send + 'static,
    {
        let error_tx = self.error_tx.clone();
        let stream = device.build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                renderer.fill(data);
            },
            move |err| {
                // Runs outside the audio callback; forwarding never blocks.
                let _ = error_tx.send(err);
            },
            None,
        )?;
        stream.play()?;
        Ok(stream)
    }

    /// Stop playback and close the stream. The cursor keeps its position,
    /// so a later `play` resumes from the same place.
    pub fn stop(&mut self) {
        self.transport.halt();
        if let Some(stream) = self.stream.take() {
            drop(stream);
            info!(cursor = self.transport.cursor(), "playback stopped");
        }
    }

    /// Per-frame housekeeping for the control thread.
    ///
    /// Reaps the stream once the callback has halted the transport (a
    /// non-looping buffer played to its end), and surfaces a device error
    /// raised since the last call. The failed stream is torn down before
    /// the error is returned.
    pub fn tick(&mut self) -> Option<AudioError> {
        if let Ok(err) = self.error_rx.try_recv() {
            warn!(error = %err, "output stream failed");
            self.stop();
            return Some(AudioError::Stream(err));
        }
        if self.stream.is_some() && !self.transport.is_playing() {
            self.stop();
        }
        None
    }

    /// Move the cursor, clamped to the buffer length. A no-op when no
    /// buffer is loaded. Takes effect at the next callback whether or not
    /// playback is running.
    pub fn seek_to(&self, sample: usize) {
        if let Some(buffer) = &self.buffer {
            let clamped = sample.min(buffer.len());
            self.transport.seek(clamped);
            debug!(sample = clamped, "seek");
        }
    }

    /// Current cursor position in samples per channel.
    pub fn cursor(&self) -> usize {
        self.transport.cursor()
    }

    /// Cursor position as a fraction of the buffer length, for drawing
    /// the playhead.
    pub fn position_fraction(&self) -> f32 {
        match &self.buffer {
            Some(buffer) if !buffer.is_empty() => {
                self.transport.cursor() as f32 / buffer.len() as f32
            }
            _ => 0.0,
        }
    }

    /// Elapsed playback time in seconds at the current cursor.
    pub fn elapsed_secs(&self) -> f32 {
        match &self.buffer {
            Some(buffer) if buffer.sample_rate() > 0 => {
                self.transport.cursor() as f32 / buffer.sample_rate() as f32
            }
            _ => 0.0,
        }
    }

    /// True while an output stream is rendering.
    pub fn is_playing(&self) -> bool {
        self.transport.is_playing()
    }

    /// Whether playback wraps at the buffer end.
    pub fn looping(&self) -> bool {
        self.transport.looping()
    }

    /// Toggle wrap-around playback, effective from the next callback.
    pub fn set_looping(&self, looping: bool) {
        self.transport.set_looping(looping);
    }
}
