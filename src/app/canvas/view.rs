use std::sync::Arc;

use eframe::egui::{
    Align2, Color32, FontId, Painter, Rect, Sense, Stroke, StrokeKind, Ui, Vec2, pos2, vec2,
};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::treemap::{
    Camera, HEADER_HEIGHT, NavigationFrame, TransitionLayer, ZoomDirection, wrap_label,
};
use crate::util::format_value;

use super::super::render_utils::{
    blend_color, dim_color, draw_background, layout_rect_to_screen, metric_color, with_opacity,
};
use super::super::{SearchMatchCache, SearchMatchKey, ViewModel};

const LABEL_FONT_SIZE: f32 = 12.0;
const LABEL_LINE_HEIGHT: f32 = 14.0;
const LABEL_INSET: Vec2 = vec2(4.0, 3.0);
const HEADER_FONT_SIZE: f32 = 14.0;
const VALUE_LINE_OPACITY: f32 = 0.7;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

/// Per-layer drawing inputs that do not depend on the individual tile.
struct TileStyle<'a> {
    opacity: f32,
    hovered: Option<usize>,
    matches: Option<&'a [bool]>,
}

impl ViewModel {
    fn cached_search_matches(&mut self) -> Option<Arc<Vec<bool>>> {
        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        let navigator = self.treemap.navigator();
        let frame = navigator.current();
        let key = SearchMatchKey {
            query: query.to_owned(),
            focus: frame.focus.clone(),
            depth: frame.depth,
            selector: navigator.selector().clone(),
        };

        if let Some(cached) = &self.search_match_cache
            && cached.key == key
        {
            return Some(Arc::clone(&cached.matches));
        }

        let matcher = SkimMatcherV2::default();
        let matches = frame
            .tiles
            .iter()
            .map(|tile| fuzzy_match_score(&matcher, &tile.label, query).is_some())
            .collect::<Vec<_>>();
        let matches = Arc::new(matches);

        self.search_match_cache = Some(SearchMatchCache {
            key,
            matches: Arc::clone(&matches),
        });

        Some(matches)
    }

    pub(in crate::app) fn draw_treemap(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click());
        let painter = ui.painter_at(rect);

        let header_bottom = (rect.top() + HEADER_HEIGHT).min(rect.bottom());
        let header_screen = Rect::from_min_max(rect.min, pos2(rect.right(), header_bottom));
        let tiles_screen = Rect::from_min_max(pos2(rect.left(), header_bottom), rect.max);

        self.treemap.resize(tiles_screen.size());
        let now = ui.input(|input| input.time);
        self.treemap.tick(now);
        self.handle_canvas_input(ui, &response, tiles_screen, now);

        draw_background(&painter, rect);

        let search_matches = self.cached_search_matches();
        let tile_painter = painter.with_clip_rect(tiles_screen);
        let camera = *self.treemap.camera();

        match (self.treemap.transition(), self.treemap.transition_frames()) {
            (Some(transition), Some((incoming, outgoing))) => {
                let sample = transition.sample(now);
                let incoming_style = TileStyle {
                    opacity: sample.incoming_opacity,
                    hovered: None,
                    matches: None,
                };
                let outgoing_style = TileStyle {
                    opacity: sample.outgoing_opacity,
                    hovered: None,
                    matches: search_matches.as_deref().map(Vec::as_slice),
                };

                // Zooming in stacks the overlay on top; zooming out slides the
                // leaving frame over its parent.
                match transition.direction {
                    ZoomDirection::In => {
                        draw_layer(
                            &tile_painter,
                            tiles_screen,
                            &camera,
                            outgoing,
                            &transition.outgoing,
                            &outgoing_style,
                        );
                        draw_layer(
                            &tile_painter,
                            tiles_screen,
                            &camera,
                            incoming,
                            &transition.incoming,
                            &incoming_style,
                        );
                    }
                    ZoomDirection::Out => {
                        draw_layer(
                            &tile_painter,
                            tiles_screen,
                            &camera,
                            incoming,
                            &transition.incoming,
                            &incoming_style,
                        );
                        draw_layer(
                            &tile_painter,
                            tiles_screen,
                            &camera,
                            outgoing,
                            &transition.outgoing,
                            &outgoing_style,
                        );
                    }
                }
            }
            _ => {
                let frame = self.treemap.navigator().current();
                let style = TileStyle {
                    opacity: 1.0,
                    hovered: self.hovered,
                    matches: search_matches.as_deref().map(Vec::as_slice),
                };
                draw_layer(
                    &tile_painter,
                    tiles_screen,
                    &camera,
                    frame,
                    &TransitionLayer::full_scale(frame),
                    &style,
                );

                if frame.tiles.is_empty() {
                    painter.text(
                        tiles_screen.center(),
                        Align2::CENTER_CENTER,
                        format!(
                            "No cluster has data for {} at this level.",
                            self.treemap.navigator().selector().describe()
                        ),
                        FontId::proportional(15.0),
                        Color32::from_gray(170),
                    );
                }
            }
        }

        let breadcrumb = self.treemap.navigator().breadcrumb().join(" / ");
        draw_header(
            &painter,
            header_screen,
            &breadcrumb,
            ui.visuals().strong_text_color(),
        );

        if self.treemap.is_animating() {
            ui.ctx().request_repaint();
        }
    }
}

fn value_range(frame: &NavigationFrame) -> (f64, f64) {
    frame
        .tiles
        .iter()
        .fold((f64::INFINITY, 0.0_f64), |(min, max), tile| {
            (min.min(tile.value), max.max(tile.value))
        })
}

fn draw_layer(
    painter: &Painter,
    tiles_screen: Rect,
    camera: &Camera,
    frame: &NavigationFrame,
    layer: &TransitionLayer,
    style: &TileStyle<'_>,
) {
    if style.opacity <= 0.0 {
        return;
    }

    let (min_value, max_value) = value_range(frame);
    let search_active = style
        .matches
        .is_some_and(|matches| matches.iter().any(|matched| *matched));

    for &(index, rect) in &layer.tiles {
        let Some(tile) = frame.tiles.get(index) else {
            continue;
        };

        let screen = layout_rect_to_screen(tiles_screen, camera.map_rect(rect));
        if screen.width() < 0.5 || screen.height() < 0.5 || !screen.intersects(tiles_screen) {
            continue;
        }

        let is_match = style
            .matches
            .and_then(|matches| matches.get(index))
            .copied()
            .unwrap_or(false);

        let base_color = metric_color(tile.value, min_value, max_value);
        let base_color = if tile.drillable {
            base_color
        } else {
            dim_color(base_color, 0.72)
        };
        let color = if style.hovered == Some(index) && tile.drillable {
            blend_color(base_color, Color32::from_rgb(255, 164, 101), 0.55)
        } else if is_match {
            blend_color(base_color, Color32::from_rgb(103, 196, 255), 0.68)
        } else if search_active {
            dim_color(base_color, 0.45)
        } else {
            base_color
        };

        painter.rect_filled(screen, 0.0, with_opacity(color, style.opacity));
        painter.rect_stroke(
            screen,
            0.0,
            Stroke::new(
                1.0,
                with_opacity(Color32::from_rgba_unmultiplied(15, 15, 15, 190), style.opacity),
            ),
            StrokeKind::Inside,
        );

        draw_tile_label(painter, screen, &tile.label, tile.value, style.opacity);
    }
}

fn draw_tile_label(painter: &Painter, screen: Rect, label: &str, value: f64, opacity: f32) {
    let lines = wrap_label(label, screen.width() - LABEL_INSET.x * 2.0, LABEL_FONT_SIZE);
    if lines.is_empty() || screen.height() < LABEL_LINE_HEIGHT + LABEL_INSET.y {
        return;
    }

    let label_painter = painter.with_clip_rect(screen.intersect(painter.clip_rect()));
    let text_color = Color32::from_gray(238);
    let origin = screen.min + LABEL_INSET;

    for (row, line) in lines.iter().enumerate() {
        label_painter.text(
            origin + vec2(0.0, row as f32 * LABEL_LINE_HEIGHT),
            Align2::LEFT_TOP,
            line,
            FontId::proportional(LABEL_FONT_SIZE),
            with_opacity(text_color, opacity),
        );
    }

    label_painter.text(
        origin + vec2(0.0, lines.len() as f32 * LABEL_LINE_HEIGHT),
        Align2::LEFT_TOP,
        format_value(value),
        FontId::proportional(LABEL_FONT_SIZE),
        with_opacity(text_color, opacity * VALUE_LINE_OPACITY),
    );
}

fn draw_header(painter: &Painter, header_screen: Rect, breadcrumb: &str, color: Color32) {
    painter.rect_filled(header_screen, 0.0, Color32::from_rgb(32, 38, 46));

    let header_painter = painter.with_clip_rect(header_screen);
    let anchor = header_screen.left_center() + vec2(8.0, 0.0);
    // Default fonts ship no bold face; a half-pixel overdraw thickens the strokes.
    for offset in [Vec2::ZERO, vec2(0.5, 0.0)] {
        header_painter.text(
            anchor + offset,
            Align2::LEFT_CENTER,
            breadcrumb,
            FontId::proportional(HEADER_FONT_SIZE),
            color,
        );
    }
}
