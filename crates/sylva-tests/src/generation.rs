//! Integration tests for the generation pipeline.
//!
//! Each test runs the real chain — procedural backend, tensor
//! canonicalization, post-processing, WAV store — against a temp
//! directory, checking what the app relies on at the seams.

use chrono::{Local, TimeZone};
use sylva_core::AppConfig;
use sylva_gen::{backend::model, post_process, GenerationBackend, ProceduralBackend, PEAK_TARGET};
use sylva_store::{file_stem, SampleStore};

#[test]
fn generated_audio_round_trips_through_the_store() {
    let backend = ProceduralBackend::new();
    let raw = backend
        .generate("warm tape hiss", model::token_budget(2.0))
        .unwrap();
    let buffer = post_process(raw, 64_000, model::SAMPLE_RATE);
    assert_eq!(buffer.len(), 64_000);
    assert!(buffer.peak() <= PEAK_TARGET + 1e-4);

    let dir = tempfile::tempdir().unwrap();
    let store = SampleStore::new(dir.path());
    let path = store.write(&buffer, "warm-tape-hiss-20240301-120000").unwrap();

    // 32-bit float WAV stores samples bit-exactly.
    let restored = store.read(&path).unwrap();
    assert_eq!(restored.sample_rate(), buffer.sample_rate());
    assert_eq!(restored.left(), buffer.left());
    assert_eq!(restored.right(), buffer.right());
}

#[test]
fn requested_duration_is_honored_exactly() {
    let config = AppConfig::new();
    let backend = ProceduralBackend::new();

    for &duration in &[1.0f32, 2.5, 8.0] {
        let tokens = model::token_budget(duration);
        let target = config.samples_for_duration(duration);
        let raw = backend.generate("rain on a tin roof", tokens).unwrap();
        let buffer = post_process(raw, target, config.sample_rate);
        assert_eq!(buffer.len(), target);
        assert!((buffer.duration_secs() - duration).abs() < 1e-3);
    }
}

#[test]
fn token_budget_respects_the_position_limit() {
    assert_eq!(model::token_budget(30.0), model::MAX_POSITION_EMBEDDINGS);
    assert_eq!(model::token_budget(60.0), model::MAX_POSITION_EMBEDDINGS);

    // Within the limit the budget covers the request to one token of slack.
    let tokens = model::token_budget(5.0);
    assert!(tokens < model::MAX_POSITION_EMBEDDINGS);
    let samples = model::samples_for_tokens(tokens);
    assert!((samples as f64 - 5.0 * 32_000.0).abs() <= model::samples_per_token());
}

#[test]
fn same_prompt_writes_identical_files() {
    let backend = ProceduralBackend::new();
    let dir = tempfile::tempdir().unwrap();
    let store = SampleStore::new(dir.path());

    let mut paths = Vec::new();
    for stem in ["take-one", "take-two"] {
        let raw = backend.generate("soft piano chord", 256).unwrap();
        let buffer = post_process(raw, 32_000, model::SAMPLE_RATE);
        paths.push(store.write(&buffer, stem).unwrap());
    }

    let first = store.read(&paths[0]).unwrap();
    let second = store.read(&paths[1]).unwrap();
    assert_eq!(first.left(), second.left());
    assert_eq!(first.right(), second.right());
}

#[test]
fn library_names_and_orders_generations() {
    let backend = ProceduralBackend::new();
    let dir = tempfile::tempdir().unwrap();
    let store = SampleStore::new(dir.path());
    let raw = backend.generate("gentle rain", 64).unwrap();
    let buffer = post_process(raw, 8_000, model::SAMPLE_RATE);

    let earlier = file_stem(
        "gentle rain",
        Local.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
    );
    let later = file_stem(
        "gentle rain",
        Local.with_ymd_and_hms(2024, 3, 1, 10, 0, 1).unwrap(),
    );
    store.write(&buffer, &earlier).unwrap();
    store.write(&buffer, &later).unwrap();

    let listed = store.list().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].stem, later);
    assert_eq!(listed[1].stem, earlier);
}
