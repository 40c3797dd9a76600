use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};
use tracing::error;

use crate::cluster::{ClusterTree, MetricKind, MetricSelector, NodePath, collect_cluster_tree};
use crate::treemap::TreemapState;

mod canvas;
mod render_utils;
mod ui;

/// Startup options gathered from the command line.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub data_path: Option<PathBuf>,
    pub selector: MetricSelector,
    pub zoom_seconds: f64,
}

pub struct TreemapApp {
    config: AppConfig,
    state: AppState,
    reload_rx: Option<Receiver<Result<ClusterTree, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<ClusterTree, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    treemap: TreemapState,
    metric: MetricKind,
    geo_input: String,
    search: String,
    hovered: Option<usize>,
    search_match_cache: Option<SearchMatchCache>,
}

struct SearchMatchCache {
    key: SearchMatchKey,
    matches: Arc<Vec<bool>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct SearchMatchKey {
    query: String,
    focus: NodePath,
    depth: i32,
    selector: MetricSelector,
}

impl TreemapApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let state = Self::start_load(config.data_path.clone());
        Self {
            config,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(data_path: Option<PathBuf>) -> Receiver<Result<ClusterTree, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = collect_cluster_tree(data_path.as_deref()).map_err(|error| {
                error!("{error:#}");
                format!("{error:#}")
            });
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(data_path: Option<PathBuf>) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(data_path),
        }
    }
}

impl eframe::App for TreemapApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(result) => {
                        transition = Some(match result {
                            Ok(tree) => AppState::Ready(Box::new(ViewModel::new(tree, &self.config))),
                            Err(error) => AppState::Error(error),
                        });
                    }
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition =
                            Some(AppState::Error("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading cluster hierarchy...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load the cluster hierarchy");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.config.data_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.config, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.config.data_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            transition = Some(match result {
                                Ok(tree) => {
                                    AppState::Ready(Box::new(ViewModel::new(tree, &self.config)))
                                }
                                Err(error) => AppState::Error(error),
                            });
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(AppState::Error(
                                "Background load worker disconnected".to_owned(),
                            ));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
