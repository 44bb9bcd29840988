//! Waveform display: mirrored envelope columns, playhead, click-to-seek.

use std::sync::Arc;

use egui::{Align2, FontId, Pos2, Sense, Stroke, Vec2};
use sylva_audio::{position_for_x, Envelope};
use sylva_core::SharedBuffer;

use crate::theme::Theme;

/// Actions the waveform view can request from the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveformAction {
    /// Move the playback cursor to this sample position.
    Seek(usize),
}

/// The central waveform widget.
///
/// Draws one vertical line per pixel column, mirrored around the center
/// line, with the playhead on top. The envelope is cached against the
/// buffer identity and the drawn width, so it is recomputed only when a
/// new buffer arrives or the window is resized.
pub struct WaveformView {
    envelope: Envelope,
    cache_key: Option<(usize, usize)>,
}

impl WaveformView {
    pub fn new() -> Self {
        Self {
            envelope: Envelope::compute(&[], 0),
            cache_key: None,
        }
    }

    /// Draw the widget. `playhead` is the cursor position in samples.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        buffer: Option<&SharedBuffer>,
        playhead: usize,
    ) -> Vec<WaveformAction> {
        let mut actions = Vec::new();
        let width = ui.available_width();
        let (response, painter) = ui.allocate_painter(
            Vec2::new(width, Theme::WAVEFORM_HEIGHT),
            Sense::click_and_drag(),
        );
        let rect = response.rect;

        painter.rect_filled(rect, Theme::RADIUS, Theme::panel());

        let Some(buffer) = buffer else {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "Generate a sample to begin",
                FontId::proportional(Theme::FONT_MD),
                Theme::text_dim(),
            );
            return actions;
        };

        let inner = rect.shrink(Theme::WAVEFORM_PADDING);
        let columns = inner.width().max(0.0) as usize;

        // Identity of the Arc, not the contents: a new generation always
        // arrives as a new allocation.
        let key = (Arc::as_ptr(buffer) as usize, columns);
        if self.cache_key != Some(key) {
            self.envelope = Envelope::compute(&buffer.mono_fold(), columns);
            self.cache_key = Some(key);
        }

        // Mirrored columns around the vertical center.
        let mid_y = inner.center().y;
        let half_h = inner.height() * 0.5;
        for (i, &amp) in self.envelope.columns().iter().enumerate() {
            let x = inner.left() + i as f32;
            let h = amp.clamp(0.0, 1.0) * half_h;
            painter.line_segment(
                [Pos2::new(x, mid_y - h), Pos2::new(x, mid_y + h)],
                Stroke::new(Theme::WAVEFORM_LINE_WIDTH, Theme::waveform()),
            );
        }

        // Playhead with a soft glow.
        if !buffer.is_empty() {
            let frac = (playhead as f32 / buffer.len() as f32).clamp(0.0, 1.0);
            let x = inner.left() + frac * inner.width();
            let top = Pos2::new(x, rect.top() + 4.0);
            let bottom = Pos2::new(x, rect.bottom() - 4.0);
            painter.line_segment(
                [top, bottom],
                Stroke::new(
                    Theme::PLAYHEAD_WIDTH + 2.0,
                    Theme::with_alpha(Theme::playhead(), 40),
                ),
            );
            painter.line_segment(
                [top, bottom],
                Stroke::new(Theme::PLAYHEAD_WIDTH, Theme::playhead()),
            );
        }

        // Press or drag seeks; clicks in the padding clamp to the edges.
        if response.clicked() || response.dragged() || response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                let sample = position_for_x(pos.x - inner.left(), inner.width(), buffer.len());
                actions.push(WaveformAction::Seek(sample));
            }
        }

        actions
    }
}

impl Default for WaveformView {
    fn default() -> Self {
        Self::new()
    }
}
