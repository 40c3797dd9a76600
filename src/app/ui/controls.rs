use eframe::egui::{self, Ui};

use crate::cluster::{MetricKind, MetricSelector};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Treemap Controls");
        ui.separator();
        ui.add_space(4.0);

        let mut selector_changed = false;

        ui.label("Metric");
        ui.horizontal_wrapped(|ui| {
            for metric in MetricKind::ALL {
                let hover = match metric {
                    MetricKind::Global => "Size clusters by their worldwide total.",
                    MetricKind::Country => "Size clusters by one country's measure.",
                    MetricKind::StateUs => "Size clusters by one US state's measure.",
                };
                selector_changed |= ui
                    .selectable_value(&mut self.metric, metric, metric.label())
                    .on_hover_text(hover)
                    .changed();
            }
        });

        ui.add_space(4.0);
        ui.add_enabled_ui(self.metric.needs_geo_code(), |ui| {
            let hint = match self.metric {
                MetricKind::StateUs => "State code, e.g. CA",
                _ => "Country code, e.g. US",
            };
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.geo_input)
                    .hint_text(hint)
                    .char_limit(8),
            );
            if response.changed() {
                self.geo_input = self.geo_input.to_ascii_uppercase();
                selector_changed = true;
            }
        });

        if selector_changed {
            let selector = MetricSelector::new(self.metric, Some(&self.geo_input));
            if self.treemap.set_selector(selector) {
                self.hovered = None;
                self.search_match_cache = None;
            }
        }

        if self.metric.needs_geo_code() && self.treemap.navigator().selector().geo_code.is_none() {
            ui.small("Enter a code to size clusters by this geography.");
        }

        ui.separator();

        ui.label("Search (cluster name)")
            .on_hover_text("Fuzzy-highlight matching tiles in the current level.");
        ui.text_edit_singleline(&mut self.search)
            .on_hover_text("Matching tiles are tinted; the layout does not change.");

        ui.separator();

        let navigator = self.treemap.navigator();
        let can_drill_up = navigator.can_drill_up() && !self.treemap.is_animating();
        if ui
            .add_enabled(can_drill_up, egui::Button::new("Up one level"))
            .on_hover_text("Same as clicking the background or pressing Escape.")
            .clicked()
        {
            let now = ui.input(|input| input.time);
            self.treemap.request_drill_up(now);
            ui.ctx().request_repaint();
        }

        ui.add_space(6.0);
        ui.small("Click a highlighted tile to zoom in. Click the background, the header, or press Escape to zoom out.");
    }
}
