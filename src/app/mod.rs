use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};
use steer_graph::graph::{GraphDelegate, GraphView, NodeId, Provider};
use steer_graph::source::{GraphDocument, GraphSource};
use tracing::{info, warn};

mod graph;
mod render_utils;
mod ui;

use render_utils::OrbitCamera;

type LoadResult = Result<GraphDocument, String>;

pub struct SteerGraphApp {
    source: GraphSource,
    planar: bool,
    state: AppState,
    reload: Option<PendingReload>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum ReloadScope {
    All,
    Node(NodeId),
}

struct PendingReload {
    scope: ReloadScope,
    rx: Receiver<LoadResult>,
}

struct ViewModel {
    graph: GraphView,
    document: GraphDocument,
    camera: OrbitCamera,
    live_layout: bool,
    layout_moving: bool,
    hovered: Option<NodeId>,
    node_search: String,
    reload_target: Option<NodeId>,
    reload_requested: Option<ReloadScope>,
    reload_error: Option<String>,
    signal_from: String,
    signal_to: String,
    signal_status: Option<String>,
    show_fps_bar: bool,
    fps_show_average: bool,
    fps_show_frame_time: bool,
    fps_current: f32,
    fps_samples: VecDeque<f32>,
}

/// Logs every selection coming out of the graph view.
struct LogDelegate;

impl GraphDelegate for LogDelegate {
    fn node_selected(&mut self, node: &NodeId) {
        info!(node = %node, "node selected");
    }
}

impl SteerGraphApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, source: GraphSource, planar: bool) -> Self {
        let state = Self::start_load(&source);
        Self {
            source,
            planar,
            state,
            reload: None,
        }
    }

    fn spawn_load(source: GraphSource) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = source.load().map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(source: &GraphSource) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(source.clone()),
        }
    }

    fn poll_reload(reload: &mut Option<PendingReload>, model: &mut ViewModel) {
        let Some(pending) = reload.take() else {
            return;
        };

        match pending.rx.try_recv() {
            Ok(Ok(document)) => {
                model.reload_error = None;
                model.apply_document(document, &pending.scope);
            }
            Ok(Err(error)) => {
                warn!(%error, "graph reload failed");
                model.reload_error = Some(error);
            }
            Err(TryRecvError::Empty) => {
                *reload = Some(pending);
            }
            Err(TryRecvError::Disconnected) => {
                model.reload_error = Some("Background load worker disconnected".to_owned());
            }
        }
    }
}

impl eframe::App for SteerGraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(result) => {
                        transition = Some(match result {
                            Ok(document) => {
                                AppState::Ready(Box::new(ViewModel::new(document, self.planar)))
                            }
                            Err(error) => AppState::Error(error),
                        });
                    }
                    Err(TryRecvError::Empty) => {}
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(AppState::Error(
                            "Background load worker disconnected".to_owned(),
                        ));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading graph...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
                ctx.request_repaint();
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load graph");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(&self.source));
                    }
                });
            }
            AppState::Ready(model) => {
                let is_reloading = self.reload.is_some();
                model.show(ctx, &self.source.describe(), is_reloading);

                if let Some(scope) = model.reload_requested.take()
                    && self.reload.is_none()
                {
                    self.reload = Some(PendingReload {
                        scope,
                        rx: Self::spawn_load(self.source.clone()),
                    });
                }

                Self::poll_reload(&mut self.reload, model);
                if self.reload.is_some() {
                    ctx.request_repaint();
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload = None;
            self.state = next_state;
        }
    }
}

impl ViewModel {
    /// Swaps in a freshly loaded document and pushes it into the view, either
    /// wholesale or for a single node.
    fn apply_document(&mut self, document: GraphDocument, scope: &ReloadScope) {
        self.document = document;
        self.layout_moving = true;
        match scope {
            ReloadScope::All => {
                if let Some(layout) = self.document.layout {
                    self.graph.set_layout_config(layout);
                }
                if let Some(scene) = self.document.scene {
                    self.graph.set_scene_config(scene);
                }
                let provider = Provider::from_document(&self.document);
                self.graph.reload(&provider);
                info!(nodes = self.graph.model().node_count(), "graph reloaded");
            }
            ReloadScope::Node(node) => {
                let provider = Provider::from_document(&self.document);
                self.graph.reload_node(node, &provider);
                info!(node = %node, "node reloaded");
            }
        }

        if let Some(target) = &self.reload_target
            && !self.graph.model().contains(target.as_str())
        {
            self.reload_target = None;
        }
    }
}
