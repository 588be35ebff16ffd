use std::collections::VecDeque;

use eframe::egui::{self, Align, Context, Layout};
use steer_graph::graph::{Dimensionality, GraphView, NodeId, Provider};
use steer_graph::source::GraphDocument;

use super::super::render_utils::OrbitCamera;
use super::super::{LogDelegate, ReloadScope, ViewModel};

impl ViewModel {
    pub(in crate::app) fn new(document: GraphDocument, planar: bool) -> Self {
        let dimensionality = if planar {
            Dimensionality::Planar
        } else {
            Dimensionality::Spatial
        };
        let mut graph = GraphView::new(
            document.layout.unwrap_or_default(),
            document.scene.unwrap_or_default(),
            dimensionality,
        );
        graph.set_delegate(Box::new(LogDelegate));
        graph.reload(&Provider::from_document(&document));

        Self {
            graph,
            document,
            camera: OrbitCamera::default(),
            live_layout: true,
            layout_moving: true,
            hovered: None,
            node_search: String::new(),
            reload_target: None,
            reload_requested: None,
            reload_error: None,
            signal_from: String::new(),
            signal_to: String::new(),
            signal_status: None,
            show_fps_bar: true,
            fps_show_average: true,
            fps_show_frame_time: false,
            fps_current: 0.0,
            fps_samples: VecDeque::new(),
        }
    }

    pub(in crate::app) fn show(&mut self, ctx: &Context, source_label: &str, is_reloading: bool) {
        self.update_fps_counter(ctx);

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("steer-graph");
                    ui.separator();
                    ui.label(format!("source: {source_label}"));
                    ui.label(format!("nodes: {}", self.graph.model().node_count()));
                    ui.label(format!("links: {}", self.graph.model().link_count()));
                    let reload_button =
                        ui.add_enabled(!is_reloading, egui::Button::new("Reload graph"));
                    if reload_button.clicked() {
                        self.reload_requested = Some(ReloadScope::All);
                    }
                    if is_reloading {
                        ui.spinner();
                    }
                    if let Some(error) = &self.reload_error {
                        ui.colored_label(egui::Color32::LIGHT_RED, error.as_str());
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.layout_status_text());
                        if let Some(fps_text) = self.fps_display_text() {
                            ui.label(fps_text);
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("controls_scroll")
                    .show(ui, |ui| self.draw_controls(ui, is_reloading));
            });

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_graph(ui));

        if !self.graph.signals().is_empty() {
            ctx.request_repaint();
        }
    }

    pub(in crate::app) fn set_selected(&mut self, selected: Option<NodeId>) {
        self.graph.select(selected);
    }
}
