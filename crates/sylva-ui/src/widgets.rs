//! Shared UI widgets — toggle switch, primary button.

use crate::theme::Theme;
use egui::{self, Pos2, Rounding, Stroke, Vec2};

/// Animated on/off switch, sized for the transport row. Returns `true`
/// when the user clicked it this frame.
pub fn toggle_switch(ui: &mut egui::Ui, on: bool) -> bool {
    let (resp, painter) = ui.allocate_painter(Vec2::new(36.0, 18.0), egui::Sense::click());
    let rect = resp.rect;
    let radius = rect.height() / 2.0;

    let track = if on {
        Theme::with_alpha(Theme::accent(), 90)
    } else {
        Theme::panel()
    };
    painter.rect_filled(rect, Rounding::same(radius), track);
    painter.rect_stroke(
        rect,
        Rounding::same(radius),
        Stroke::new(
            0.5,
            if on {
                Theme::with_alpha(Theme::accent(), 130)
            } else {
                Theme::panel_hover()
            },
        ),
    );

    let t = ui
        .ctx()
        .animate_bool_with_time(resp.id.with("knob"), on, 0.12);
    let knob_r = radius - 2.0;
    let knob_x = egui::lerp(rect.left() + radius..=rect.right() - radius, t);
    let knob = if on {
        if resp.hovered() {
            Theme::accent_hover()
        } else {
            Theme::accent()
        }
    } else {
        Theme::text_dim()
    };
    painter.circle_filled(Pos2::new(knob_x, rect.center().y), knob_r, knob);

    resp.clicked()
}

/// Accent-filled button for the one primary action on screen.
pub fn primary_button(ui: &mut egui::Ui, label: &str, enabled: bool) -> egui::Response {
    let text = egui::RichText::new(label)
        .size(Theme::FONT_SM)
        .strong()
        .color(if enabled {
            Theme::text()
        } else {
            Theme::text_dim()
        });
    let fill = if enabled {
        Theme::accent()
    } else {
        Theme::panel()
    };
    ui.add_enabled(
        enabled,
        egui::Button::new(text)
            .fill(fill)
            .rounding(Rounding::same(Theme::RADIUS)),
    )
}
