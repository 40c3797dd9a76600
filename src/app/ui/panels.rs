use eframe::egui::{self, Align, Context, Layout, Vec2};

use crate::cluster::ClusterTree;
use crate::treemap::TreemapState;
use crate::util::format_value;

use super::super::{AppConfig, ViewModel};

impl ViewModel {
    /// Placeholder size until the first paint measures the canvas.
    const INITIAL_CANVAS: Vec2 = Vec2::new(960.0, 640.0);

    pub(in crate::app) fn new(tree: ClusterTree, config: &AppConfig) -> Self {
        let selector = config.selector.clone();
        let geo_input = selector.geo_code.clone().unwrap_or_default();
        let metric = selector.metric;
        let treemap = TreemapState::new(tree, selector, Self::INITIAL_CANVAS)
            .with_duration(config.zoom_seconds);

        Self {
            treemap,
            metric,
            geo_input,
            search: String::new(),
            hovered: None,
            search_match_cache: None,
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        config: &AppConfig,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("cluster-treemap");
                    ui.separator();
                    let tree = self.treemap.navigator().tree();
                    ui.label(format!("dataset: {}", tree.title()));
                    match &config.data_path {
                        Some(path) => ui.label(format!("file: {}", path.display())),
                        None => ui.label("file: bundled sample"),
                    };
                    ui.label(format!("clusters: {}", tree.node_count()));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload data"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.frame_summary_text());
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Reloading cluster hierarchy...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_treemap(ui);
            }
        });
    }

    fn frame_summary_text(&self) -> String {
        let navigator = self.treemap.navigator();
        let frame = navigator.current();
        let total = frame.tiles.iter().map(|tile| tile.value).sum::<f64>();
        format!(
            "{} | level {} | {} tiles | total {}",
            navigator.selector().describe(),
            frame.depth,
            frame.tiles.len(),
            format_value(total)
        )
    }
}
