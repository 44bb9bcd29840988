//! Integration tests for the playback engine.
//!
//! These drive [`Renderer::fill`] directly with device-sized chunks, the
//! same way a cpal callback would, so the end-of-buffer and loop-seam
//! behavior is checked without opening an output device.

use std::sync::Arc;

use sylva_audio::{position_for_x, Envelope, Fader, PlaybackSession, Renderer, Transport};
use sylva_core::{SharedBuffer, StereoBuffer};

const SAMPLE_RATE: u32 = 32_000;
const CALLBACK_FRAMES: usize = 512;
const FADE_SAMPLES: usize = 640; // 20 ms at 32 kHz

fn one_second_buffer() -> SharedBuffer {
    let len = SAMPLE_RATE as usize;
    Arc::new(StereoBuffer::new(
        vec![0.5; len],
        vec![-0.5; len],
        SAMPLE_RATE,
    ))
}

fn running_renderer(looping: bool) -> (Renderer, Arc<Transport>) {
    let transport = Arc::new(Transport::new(looping));
    transport.start();
    let renderer = Renderer::new(
        one_second_buffer(),
        Arc::clone(&transport),
        Fader::new(FADE_SAMPLES),
    );
    (renderer, transport)
}

#[test]
fn one_second_clip_halts_after_the_last_callback() {
    let (renderer, transport) = running_renderer(false);
    let mut out = [0.0f32; CALLBACK_FRAMES * 2];

    // 62 full callbacks consume 31 744 of the 32 000 samples.
    for _ in 0..62 {
        renderer.fill(&mut out);
    }
    assert!(transport.is_playing());
    assert_eq!(transport.cursor(), 31_744);

    // The 63rd gets the remaining 256 frames plus zero padding.
    renderer.fill(&mut out);
    let expected = 0.5 * Fader::new(FADE_SAMPLES).gain_at(31_744, 32_000);
    assert!((out[0] - expected).abs() < 1e-6);
    assert!(out[256 * 2..].iter().all(|&s| s == 0.0));
    assert!(!transport.is_playing());
    assert_eq!(transport.cursor(), 31_744);
}

#[test]
fn looping_wraps_into_a_fresh_fade_in() {
    let (renderer, transport) = running_renderer(true);
    let mut out = [0.0f32; CALLBACK_FRAMES * 2];

    for _ in 0..63 {
        renderer.fill(&mut out);
    }

    // The last callback crossed the seam: 256 tail frames, then the head
    // again, starting from silence.
    assert!(transport.is_playing());
    assert_eq!(transport.cursor(), 256);
    assert_eq!(out[256 * 2], 0.0);
    let expected = 0.5 * Fader::new(FADE_SAMPLES).gain_at(100, 32_000);
    assert!((out[(256 + 100) * 2] - expected).abs() < 1e-6);
}

#[test]
fn seek_lands_at_unity_gain_mid_buffer() {
    let (renderer, transport) = running_renderer(false);
    let mut out = [0.0f32; CALLBACK_FRAMES * 2];

    transport.seek(16_000);
    renderer.fill(&mut out);

    assert!((out[0] - 0.5).abs() < 1e-6);
    assert!((out[1] + 0.5).abs() < 1e-6);
    assert_eq!(transport.cursor(), 16_512);
}

#[test]
fn envelope_and_seek_agree_on_position() {
    let len = SAMPLE_RATE as usize;
    let mut mono = vec![0.1f32; len];
    mono[16_000] = 0.9;

    let envelope = Envelope::compute(&mono, 800);
    assert_eq!(envelope.width(), 800);

    // A click at the horizontal middle of an 800 px strip seeks to the
    // sample whose envelope column holds the spike.
    let position = position_for_x(400.0, 800.0, len);
    assert_eq!(position, 16_000);
    let column = position * 800 / len;
    assert!((envelope.columns()[column] - 0.9).abs() < 1e-6);
}

#[test]
fn session_is_inert_without_audio_data() {
    let mut session = PlaybackSession::new(FADE_SAMPLES, false);

    assert!(session.play().is_ok());
    assert!(!session.is_playing());
    assert_eq!(session.cursor(), 0);
    assert_eq!(session.elapsed_secs(), 0.0);

    session.seek_to(5_000);
    assert_eq!(session.cursor(), 0);
    assert!(session.tick().is_none());
}

#[test]
fn swapping_the_buffer_rewinds_the_session() {
    let mut session = PlaybackSession::new(FADE_SAMPLES, true);
    session.set_buffer(one_second_buffer());

    session.seek_to(5_000);
    assert_eq!(session.cursor(), 5_000);
    assert!((session.elapsed_secs() - 5_000.0 / 32_000.0).abs() < 1e-6);

    session.set_buffer(one_second_buffer());
    assert_eq!(session.cursor(), 0);
}
