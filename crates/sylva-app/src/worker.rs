//! Background generation worker.
//!
//! One worker per request: runs the backend off the UI thread, reports
//! coarse progress over a channel, persists the result, and hands the
//! finished buffer back. Cancellation is cooperative and only takes
//! effect between stages; a cancelled worker goes quiet rather than
//! reporting.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{unbounded, Receiver, Sender};
use sylva_core::{AppConfig, StereoBuffer};
use sylva_gen::{backend::model, post_process, GenerationBackend};
use sylva_store::{file_stem, SampleStore};
use tracing::{error, info};

/// Progress and completion events from the worker thread.
#[derive(Debug)]
pub enum WorkerEvent {
    /// Percent complete plus the stage being entered.
    Progress(u8, &'static str),
    Finished { buffer: StereoBuffer, path: PathBuf },
    Failed(String),
}

/// Everything the worker thread needs, captured before spawning.
struct Job {
    prompt: String,
    duration_secs: f32,
    target_samples: usize,
    sample_rate: u32,
    max_tokens: usize,
}

/// Handle to one in-flight generation.
pub struct GenerationWorker {
    events: Receiver<WorkerEvent>,
    cancel: Arc<AtomicBool>,
}

impl GenerationWorker {
    /// Spawn a generation of `duration_secs` seconds for `prompt`.
    pub fn spawn(
        backend: Arc<dyn GenerationBackend>,
        store: SampleStore,
        config: &AppConfig,
        prompt: String,
        duration_secs: f32,
    ) -> Self {
        let (tx, events) = unbounded();
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);
        let job = Job {
            target_samples: config.samples_for_duration(duration_secs),
            sample_rate: config.sample_rate,
            max_tokens: model::token_budget(duration_secs),
            prompt,
            duration_secs,
        };
        thread::spawn(move || run(&*backend, &store, &job, &tx, &flag));
        Self { events, cancel }
    }

    /// Drain one pending event, if any. Called once per UI frame.
    pub fn poll(&self) -> Option<WorkerEvent> {
        self.events.try_recv().ok()
    }

    /// Ask the worker to stop at the next stage boundary.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }
}

impl Drop for GenerationWorker {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn run(
    backend: &dyn GenerationBackend,
    store: &SampleStore,
    job: &Job,
    tx: &Sender<WorkerEvent>,
    cancel: &AtomicBool,
) {
    let cancelled = || cancel.load(Ordering::Relaxed);
    // The receiver disappearing just means nobody is listening anymore.
    let send = |event| {
        let _ = tx.send(event);
    };

    send(WorkerEvent::Progress(10, "Preparing model..."));
    if cancelled() {
        return;
    }

    info!(
        prompt = %job.prompt,
        duration_secs = job.duration_secs,
        max_tokens = job.max_tokens,
        backend = backend.info().name,
        "generation started"
    );

    send(WorkerEvent::Progress(30, "Generating audio..."));
    let raw = match backend.generate(&job.prompt, job.max_tokens) {
        Ok(raw) => raw,
        Err(err) => {
            error!(error = %err, "generation failed");
            send(WorkerEvent::Failed(err.to_string()));
            return;
        }
    };
    if cancelled() {
        return;
    }

    send(WorkerEvent::Progress(80, "Processing audio..."));
    let buffer = post_process(raw, job.target_samples, job.sample_rate);

    let stem = file_stem(&job.prompt, chrono::Local::now());
    let path = match store.write(&buffer, &stem) {
        Ok(path) => path,
        Err(err) => {
            error!(error = %err, "failed to save sample");
            send(WorkerEvent::Failed(err.to_string()));
            return;
        }
    };
    if cancelled() {
        return;
    }

    send(WorkerEvent::Progress(100, "Generation complete!"));
    send(WorkerEvent::Finished { buffer, path });
}
