//! Forest theme — the fixed green palette and styling.

use egui::{Color32, Rounding, Stroke};

/// Central theme. One palette, applied once at startup.
pub struct Theme;

impl Theme {
    // ── Typography ─────────────────────────────────────────────
    pub const FONT_XS: f32 = 11.0; // status line, meta
    pub const FONT_SM: f32 = 13.0; // body copy, buttons
    pub const FONT_MD: f32 = 15.0; // hints, headers

    // ── Spacing ────────────────────────────────────────────────
    pub const SPACING: f32 = 12.0; // between related items
    pub const MARGIN: f32 = 16.0; // panel padding

    // ── Shape ──────────────────────────────────────────────────
    pub const RADIUS: f32 = 6.0;

    // ── Waveform geometry ──────────────────────────────────────
    pub const WAVEFORM_HEIGHT: f32 = 120.0;
    pub const WAVEFORM_PADDING: f32 = 16.0;
    pub const WAVEFORM_LINE_WIDTH: f32 = 1.0;
    pub const PLAYHEAD_WIDTH: f32 = 2.0;

    // ── Palette ────────────────────────────────────────────────
    /// Dark forest green — main background.
    pub const fn bg() -> Color32 {
        Color32::from_rgb(60, 109, 78)
    }
    /// Darker forest green — panels, input backing, waveform backing.
    pub const fn panel() -> Color32 {
        Color32::from_rgb(42, 77, 55)
    }
    /// Secondary hover.
    pub const fn panel_hover() -> Color32 {
        Color32::from_rgb(58, 93, 71)
    }
    /// Light forest green — primary actions and highlights.
    pub const fn accent() -> Color32 {
        Color32::from_rgb(133, 183, 158)
    }
    /// Accent hover.
    pub const fn accent_hover() -> Color32 {
        Color32::from_rgb(150, 200, 175)
    }
    pub const fn text() -> Color32 {
        Color32::WHITE
    }
    /// Muted green-grey for disabled and secondary text.
    pub const fn text_dim() -> Color32 {
        Color32::from_rgb(90, 125, 103)
    }
    /// Lighter green for envelope columns.
    pub const fn waveform() -> Color32 {
        Color32::from_rgb(168, 201, 181)
    }
    /// Very light green for the playhead line.
    pub const fn playhead() -> Color32 {
        Color32::from_rgb(212, 231, 220)
    }

    // ── Color helpers ──────────────────────────────────────────

    /// Premultiplied copy of `c` at alpha `a`.
    pub const fn with_alpha(c: Color32, a: u8) -> Color32 {
        Color32::from_rgba_premultiplied(
            (c.r() as u16 * a as u16 / 255) as u8,
            (c.g() as u16 * a as u16 / 255) as u8,
            (c.b() as u16 * a as u16 / 255) as u8,
            a,
        )
    }

    // ── Theme application ──────────────────────────────────────

    /// Install the forest palette on an egui context. Called once at startup.
    pub fn apply(ctx: &egui::Context) {
        let mut style = (*ctx.style()).clone();
        let visuals = &mut style.visuals;
        *visuals = egui::Visuals::dark();

        visuals.panel_fill = Self::bg();
        visuals.window_fill = Self::bg();
        visuals.extreme_bg_color = Self::panel();
        visuals.faint_bg_color = Self::panel();

        visuals.widgets.noninteractive.bg_fill = Self::panel();
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, Self::text());
        visuals.widgets.noninteractive.rounding = Rounding::same(Self::RADIUS);

        visuals.widgets.inactive.bg_fill = Self::panel();
        visuals.widgets.inactive.weak_bg_fill = Self::panel();
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, Self::text());
        visuals.widgets.inactive.rounding = Rounding::same(Self::RADIUS);

        visuals.widgets.hovered.bg_fill = Self::panel_hover();
        visuals.widgets.hovered.weak_bg_fill = Self::panel_hover();
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, Self::text());
        visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, Self::accent());
        visuals.widgets.hovered.rounding = Rounding::same(Self::RADIUS);

        visuals.widgets.active.bg_fill = Self::accent();
        visuals.widgets.active.weak_bg_fill = Self::accent();
        visuals.widgets.active.fg_stroke = Stroke::new(1.0, Self::text());
        visuals.widgets.active.rounding = Rounding::same(Self::RADIUS);

        visuals.widgets.open.bg_fill = Self::panel_hover();
        visuals.widgets.open.fg_stroke = Stroke::new(1.0, Self::text());
        visuals.widgets.open.rounding = Rounding::same(Self::RADIUS);

        visuals.selection.bg_fill = Self::with_alpha(Self::accent(), 110);
        visuals.selection.stroke = Stroke::new(1.0, Self::accent());

        visuals.slider_trailing_fill = true;
        visuals.override_text_color = Some(Self::text());
        visuals.window_rounding = Rounding::same(Self::RADIUS);

        style.spacing.item_spacing = egui::Vec2::splat(Self::SPACING * 0.5);
        style.spacing.button_padding = egui::Vec2::new(16.0, 8.0);

        ctx.set_style(style);
    }

    /// Full-bleed frame with the standard panel margin.
    pub fn panel_frame() -> egui::Frame {
        egui::Frame::none()
            .fill(Self::bg())
            .inner_margin(egui::Margin::same(Self::MARGIN))
    }
}
