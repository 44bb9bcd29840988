//! Sylva - AI audio sketchpad
//!
//! Binary entry point: window setup, the egui update loop, and the glue
//! between the generation worker, the sample store, and playback.

mod worker;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use eframe::egui;
use serde::{Deserialize, Serialize};
use sylva_audio::PlaybackSession;
use sylva_core::{AppConfig, SharedBuffer};
use sylva_gen::{GenerationBackend, ProceduralBackend};
use sylva_store::SampleStore;
use sylva_ui::{
    show_transport, widgets, Theme, TransportAction, TransportState, WaveformAction, WaveformView,
};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use worker::{GenerationWorker, WorkerEvent};

const APP_NAME: &str = "Sylva";

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!(version = env!("CARGO_PKG_VERSION"), "Sylva starting...");

    let config = AppConfig::new();
    config.validate()?;
    config.ensure_dirs()?;
    info!(
        cache_dir = %config.cache_dir.display(),
        samples_dir = %config.samples_dir().display(),
        "directories ready"
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 700.0])
            .with_title(APP_NAME),
        renderer: eframe::Renderer::Wgpu,
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        options,
        Box::new(move |cc| Ok(Box::new(SylvaApp::new(cc, config)))),
    )?;

    Ok(())
}

/// User-tweakable state persisted across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Settings {
    prompt: String,
    duration_secs: f32,
    looping: bool,
}

impl Settings {
    /// First-launch values; looping defaults on for a sketchpad.
    fn initial(config: &AppConfig) -> Self {
        Self {
            prompt: String::new(),
            duration_secs: config.default_duration_secs,
            looping: true,
        }
    }
}

struct SylvaApp {
    config: AppConfig,
    settings: Settings,
    backend: Arc<dyn GenerationBackend>,
    store: SampleStore,
    session: PlaybackSession,
    waveform: WaveformView,
    /// The buffer currently displayed and loaded into the session.
    buffer: Option<SharedBuffer>,
    /// On-disk file behind `buffer`, used by Export.
    current_path: Option<PathBuf>,
    worker: Option<GenerationWorker>,
    progress: Option<(u8, &'static str)>,
    status: String,
    sample_count: usize,
}

impl SylvaApp {
    fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        Theme::apply(&cc.egui_ctx);

        let mut settings: Settings = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_else(|| Settings::initial(&config));
        settings.duration_secs = settings
            .duration_secs
            .clamp(config.min_duration_secs, config.max_duration_secs);

        let backend = init_backend(&config);
        let store = SampleStore::new(config.samples_dir());
        let sample_count = store.list().map(|samples| samples.len()).unwrap_or(0);
        let session = PlaybackSession::new(config.fade_samples(), settings.looping);
        let status = format!("Ready — {} backend", backend.info().name);

        Self {
            config,
            settings,
            backend,
            store,
            session,
            waveform: WaveformView::new(),
            buffer: None,
            current_path: None,
            worker: None,
            progress: None,
            status,
            sample_count,
        }
    }

    fn start_generation(&mut self) {
        let prompt = self.settings.prompt.trim().to_owned();
        if prompt.is_empty() || self.worker.is_some() {
            return;
        }
        self.progress = Some((0, "Starting..."));
        self.status = "Generating...".to_owned();
        self.worker = Some(GenerationWorker::spawn(
            Arc::clone(&self.backend),
            self.store.clone(),
            &self.config,
            prompt,
            self.settings.duration_secs,
        ));
    }

    fn handle_worker_event(&mut self, event: WorkerEvent) {
        match event {
            WorkerEvent::Progress(pct, stage) => {
                self.progress = Some((pct, stage));
            }
            WorkerEvent::Finished { buffer, path } => {
                let shared: SharedBuffer = Arc::new(buffer);
                self.session.set_buffer(Arc::clone(&shared));
                self.buffer = Some(shared);
                self.sample_count = self
                    .store
                    .list()
                    .map(|samples| samples.len())
                    .unwrap_or(self.sample_count + 1);
                self.status = match path.file_name() {
                    Some(name) => format!("Saved {}", name.to_string_lossy()),
                    None => "Saved".to_owned(),
                };
                self.current_path = Some(path);
                self.progress = None;
                self.worker = None;
            }
            WorkerEvent::Failed(message) => {
                self.status = format!("Generation failed: {message}");
                self.progress = None;
                self.worker = None;
            }
        }
    }

    fn play(&mut self) {
        if let Err(err) = self.session.play() {
            warn!(error = %err, "could not start playback");
            self.status = format!("Playback error: {err}");
        }
    }

    /// Seek from the waveform. A press while idle also starts playback.
    fn seek(&mut self, sample: usize) {
        self.session.seek_to(sample);
        if !self.session.is_playing() {
            self.play();
        }
    }

    fn export_current(&mut self) {
        let Some(source) = self.current_path.clone() else {
            return;
        };
        let default_name = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "sample.wav".to_owned());
        let Some(dest) = rfd::FileDialog::new()
            .add_filter("WAV audio", &["wav"])
            .set_file_name(default_name)
            .save_file()
        else {
            return;
        };
        match std::fs::copy(&source, &dest) {
            Ok(_) => {
                info!(from = %source.display(), to = %dest.display(), "sample exported");
                self.status = format!("Exported to {}", dest.display());
            }
            Err(err) => {
                warn!(error = %err, "export failed");
                self.status = format!("Export failed: {err}");
            }
        }
    }

    fn show_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    let exportable = self.current_path.is_some();
                    if ui
                        .add_enabled(exportable, egui::Button::new("Export WAV..."))
                        .clicked()
                    {
                        self.export_current();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("Help", |ui| {
                    if ui.button("About").clicked() {
                        self.status = format!("{APP_NAME} v{}", env!("CARGO_PKG_VERSION"));
                        ui.close_menu();
                    }
                });
            });
        });
    }

    fn show_prompt_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("prompt_panel")
            .frame(Theme::panel_frame())
            .show(ctx, |ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut self.settings.prompt)
                        .hint_text("Describe a sound: warm tape hiss, gentle rain, soft piano...")
                        .char_limit(self.config.max_prompt_len)
                        .desired_width(f32::INFINITY),
                );

                ui.add_space(Theme::SPACING * 0.5);
                ui.horizontal(|ui| {
                    ui.label("Duration");
                    ui.add(
                        egui::Slider::new(
                            &mut self.settings.duration_secs,
                            self.config.min_duration_secs..=self.config.max_duration_secs,
                        )
                        .fixed_decimals(1)
                        .suffix(" s"),
                    );

                    let busy = self.worker.is_some();
                    let label = if busy { "Generating..." } else { "Generate" };
                    let enabled = !busy && !self.settings.prompt.trim().is_empty();
                    if widgets::primary_button(ui, label, enabled).clicked() {
                        self.start_generation();
                    }
                });

                if let Some((pct, stage)) = self.progress {
                    ui.add_space(Theme::SPACING * 0.5);
                    ui.add(egui::ProgressBar::new(f32::from(pct) / 100.0).text(stage));
                }
            });
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(&self.status).size(Theme::FONT_XS));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        egui::RichText::new(format!("{} samples in library", self.sample_count))
                            .size(Theme::FONT_XS)
                            .color(Theme::text_dim()),
                    );
                });
            });
        });
    }

    fn show_central(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(Theme::panel_frame())
            .show(ctx, |ui| {
                let playhead = self.session.cursor();
                let actions = self.waveform.show(ui, self.buffer.as_ref(), playhead);
                for action in actions {
                    match action {
                        WaveformAction::Seek(sample) => self.seek(sample),
                    }
                }

                ui.add_space(Theme::SPACING);
                let state = TransportState {
                    playing: self.session.is_playing(),
                    looping: self.session.looping(),
                    elapsed_secs: self.session.elapsed_secs(),
                    total_secs: self
                        .buffer
                        .as_ref()
                        .map(|buffer| buffer.duration_secs())
                        .unwrap_or(0.0),
                    has_buffer: self.buffer.is_some(),
                };
                for action in show_transport(ui, state) {
                    match action {
                        TransportAction::Play => self.play(),
                        TransportAction::Stop => self.session.stop(),
                        TransportAction::ToggleLoop => {
                            let next = !self.session.looping();
                            self.session.set_looping(next);
                            self.settings.looping = next;
                        }
                    }
                }
            });
    }
}

impl eframe::App for SylvaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Drain worker events before drawing so this frame shows them.
        let mut events = Vec::new();
        if let Some(worker) = &self.worker {
            while let Some(event) = worker.poll() {
                events.push(event);
            }
        }
        for event in events {
            self.handle_worker_event(event);
        }

        if let Some(err) = self.session.tick() {
            self.status = format!("Audio error: {err}");
        }

        self.show_menu_bar(ctx);
        self.show_prompt_panel(ctx);
        self.show_status_bar(ctx);
        self.show_central(ctx);

        // The playhead moves between input events, and worker progress
        // arrives on its own schedule; keep the UI fresh for both.
        if self.session.is_playing() {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else if self.worker.is_some() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.settings);
    }
}

/// Pick the generation backend once at startup.
///
/// With the `onnx` feature enabled and a cached model present, inference
/// runs through ONNX Runtime; anything missing falls back to the
/// procedural synth so the app always starts usable.
#[cfg_attr(not(feature = "onnx"), allow(unused_variables))]
fn init_backend(config: &AppConfig) -> Arc<dyn GenerationBackend> {
    #[cfg(feature = "onnx")]
    {
        use sylva_gen::{ModelCache, ModelId, OnnxBackend};

        let cache = ModelCache::new(config.models_dir());
        match cache
            .ensure(ModelId::MusicgenStereoSmall)
            .and_then(|path| OnnxBackend::load(&path))
        {
            Ok(backend) => {
                let info = backend.info();
                info!(
                    backend = info.name,
                    decodes_audio = info.decodes_audio,
                    "backend ready"
                );
                return Arc::new(backend);
            }
            Err(err) => {
                warn!(error = %err, "ONNX backend unavailable, using procedural synth");
            }
        }
    }

    let backend = ProceduralBackend::new();
    let info = backend.info();
    info!(
        backend = info.name,
        decodes_audio = info.decodes_audio,
        "backend ready"
    );
    Arc::new(backend)
}
