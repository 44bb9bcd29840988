//! Transport row: play/stop, loop toggle, time readout.

use egui::{Align, Layout, RichText};

use crate::theme::Theme;
use crate::widgets;

/// Actions the transport row can request from the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportAction {
    Play,
    Stop,
    ToggleLoop,
}

/// Current transport state, as the row displays it.
#[derive(Debug, Clone, Copy)]
pub struct TransportState {
    pub playing: bool,
    pub looping: bool,
    pub elapsed_secs: f32,
    pub total_secs: f32,
    /// False until a buffer is loaded; disables play.
    pub has_buffer: bool,
}

/// Draw the transport row and report what the user asked for.
pub fn show_transport(ui: &mut egui::Ui, state: TransportState) -> Vec<TransportAction> {
    let mut actions = Vec::new();

    ui.horizontal(|ui| {
        let label = if state.playing { "Stop" } else { "Play" };
        if widgets::primary_button(ui, label, state.has_buffer).clicked() {
            actions.push(if state.playing {
                TransportAction::Stop
            } else {
                TransportAction::Play
            });
        }

        ui.add_space(Theme::SPACING);
        if widgets::toggle_switch(ui, state.looping) {
            actions.push(TransportAction::ToggleLoop);
        }
        ui.label(
            RichText::new("Loop")
                .size(Theme::FONT_SM)
                .color(Theme::text()),
        );

        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            ui.label(
                RichText::new(time_readout(&state))
                    .size(Theme::FONT_SM)
                    .monospace()
                    .color(Theme::text_dim()),
            );
        });
    });

    actions
}

/// Elapsed/total readout, with a placeholder until a buffer is loaded.
fn time_readout(state: &TransportState) -> String {
    if state.has_buffer {
        format!("{:.1}s / {:.1}s", state.elapsed_secs, state.total_secs)
    } else {
        "--.-s / --.-s".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readout_formats_tenths() {
        let state = TransportState {
            playing: true,
            looping: false,
            elapsed_secs: 1.26,
            total_secs: 5.0,
            has_buffer: true,
        };
        assert_eq!(time_readout(&state), "1.3s / 5.0s");
    }

    #[test]
    fn test_readout_placeholder_without_buffer() {
        let state = TransportState {
            playing: false,
            looping: true,
            elapsed_secs: 0.0,
            total_secs: 0.0,
            has_buffer: false,
        };
        assert_eq!(time_readout(&state), "--.-s / --.-s");
    }
}
