use eframe::egui::{Color32, Painter, Pos2, Rect};

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        color.a(),
    )
}

/// Scales the alpha channel, used to cross-fade frames.
pub(super) fn with_opacity(color: Color32, opacity: f32) -> Color32 {
    color.gamma_multiply(opacity.clamp(0.0, 1.0))
}

pub(super) fn draw_background(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));
}

/// Maps a layout-space point into the screen rect hosting the tile region.
pub(super) fn layout_to_screen(tiles_screen: Rect, pos: Pos2) -> Pos2 {
    tiles_screen.min + pos.to_vec2()
}

pub(super) fn screen_to_layout(tiles_screen: Rect, pos: Pos2) -> Pos2 {
    (pos - tiles_screen.min).to_pos2()
}

pub(super) fn layout_rect_to_screen(tiles_screen: Rect, rect: Rect) -> Rect {
    Rect::from_min_max(
        layout_to_screen(tiles_screen, rect.min),
        layout_to_screen(tiles_screen, rect.max),
    )
}

fn normalize_log(value: f64, min: f64, max: f64) -> f32 {
    let min = min.max(f64::MIN_POSITIVE);
    let max = max.max(min);
    let value = value.clamp(min, max);

    let denominator = max.ln() - min.ln();
    if denominator.abs() < f64::EPSILON {
        return 0.5;
    }

    ((value.ln() - min.ln()) / denominator).clamp(0.0, 1.0) as f32
}

pub(super) fn metric_color(value: f64, min: f64, max: f64) -> Color32 {
    let t = normalize_log(value, min, max);
    let r = (55.0 + (190.0 * t)) as u8;
    let g = (150.0 - (70.0 * t)) as u8;
    let b = (215.0 - (155.0 * t)) as u8;
    Color32::from_rgb(r, g, b)
}
