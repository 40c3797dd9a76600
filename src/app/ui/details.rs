use eframe::egui::{self, RichText, Ui};

use crate::util::{format_share, format_value};

use super::super::ViewModel;

impl ViewModel {
    const RANKING_ROW_HEIGHT: f32 = 22.0;

    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Level Details");
        ui.add_space(6.0);

        let navigator = self.treemap.navigator();
        let frame = navigator.current();
        let Some(focus) = navigator.tree().resolve(&frame.focus) else {
            ui.label("The focused cluster no longer exists in the dataset.");
            return;
        };

        let total = frame.tiles.iter().map(|tile| tile.value).sum::<f64>();

        ui.label(RichText::new(focus.name.as_str()).strong());
        ui.small(navigator.breadcrumb().join(" / "));
        ui.add_space(4.0);
        if let Some(description) = &focus.description {
            ui.label(description.as_str());
        }
        ui.label(format!("Showing depth {} of the hierarchy", frame.depth));
        ui.label(format!("Measure: {}", navigator.selector().describe()));
        ui.label(format!("Visible tiles: {}", frame.tiles.len()));
        ui.label(format!("Total: {}", format_value(total)));

        ui.separator();
        ui.label(RichText::new("Hovered tile").strong());
        match self.hovered.and_then(|index| frame.tiles.get(index)) {
            Some(tile) => {
                ui.label(tile.label.as_str());
                ui.label(format!(
                    "{}  ({} of this level)",
                    format_value(tile.value),
                    format_share(tile.value, total)
                ));
                if let Some(description) = navigator
                    .tree()
                    .resolve(&tile.node)
                    .and_then(|node| node.description.as_deref())
                {
                    ui.small(description);
                }
                if tile.drillable {
                    ui.small("Click to zoom in.");
                }
            }
            None => {
                ui.label("Hover a tile to inspect it.");
            }
        }

        ui.separator();
        ui.label(RichText::new("Largest tiles").strong());
        if frame.tiles.is_empty() {
            ui.label("No cluster has data for this measure at this level.");
            return;
        }

        let mut ranking = (0..frame.tiles.len()).collect::<Vec<_>>();
        ranking.sort_by(|a, b| frame.tiles[*b].value.total_cmp(&frame.tiles[*a].value));

        let animating = self.treemap.is_animating();
        let mut drill_target = None;

        egui::ScrollArea::vertical()
            .id_salt("tile_ranking_scroll")
            .auto_shrink([false, false])
            .show_rows(ui, Self::RANKING_ROW_HEIGHT, ranking.len(), |ui, row_range| {
                for index in row_range {
                    let Some(&tile_index) = ranking.get(index) else {
                        continue;
                    };
                    let tile = &frame.tiles[tile_index];
                    let label = format!(
                        "{}  ({}, {})",
                        tile.label,
                        format_value(tile.value),
                        format_share(tile.value, total)
                    );

                    if tile.drillable && !animating {
                        if ui.link(label).on_hover_text("Zoom into this cluster").clicked() {
                            drill_target = Some(tile_index);
                        }
                    } else {
                        ui.label(label);
                    }
                }
            });

        if let Some(tile_index) = drill_target {
            let now = ui.input(|input| input.time);
            if self.treemap.request_drill_down(tile_index, now) {
                self.hovered = None;
                ui.ctx().request_repaint();
            }
        }
    }
}
