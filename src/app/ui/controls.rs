use eframe::egui::{self, RichText, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use steer_graph::graph::{NodeAppearance, NodeId, Rgba};

use super::super::render_utils::OrbitCamera;
use super::super::{ReloadScope, ViewModel};

const PICKER_ROWS: usize = 12;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

/// Best matches first, ties by name. An empty query lists everything.
fn rank_nodes<'a>(
    nodes: impl Iterator<Item = &'a NodeId>,
    query: &str,
    limit: usize,
) -> Vec<NodeId> {
    let query = query.trim();
    if query.is_empty() {
        return nodes.take(limit).cloned().collect();
    }

    let matcher = SkimMatcherV2::default();
    let mut scored = nodes
        .filter_map(|id| fuzzy_match_score(&matcher, id.as_str(), query).map(|score| (score, id)))
        .collect::<Vec<_>>();
    scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));
    scored
        .into_iter()
        .take(limit)
        .map(|(_, id)| id.clone())
        .collect()
}

fn signal_appearance() -> NodeAppearance {
    NodeAppearance {
        color: Rgba::rgb(64, 128, 255),
        size: 0.8,
        ..NodeAppearance::default()
    }
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui, is_reloading: bool) {
        ui.heading("Graph Controls");
        ui.separator();
        ui.add_space(4.0);

        self.draw_view_controls(ui);
        ui.separator();
        self.draw_node_picker(ui, is_reloading);
        ui.separator();
        self.draw_signal_sender(ui);
        ui.separator();
        self.draw_tuning(ui);
        ui.separator();

        ui.checkbox(&mut self.show_fps_bar, "FPS Display")
            .on_hover_text("Show frame statistics in the top bar.");
        if self.show_fps_bar {
            ui.indent("fps_display_options", |ui| {
                ui.checkbox(&mut self.fps_show_average, "Show average FPS");
                ui.checkbox(&mut self.fps_show_frame_time, "Show frame time");
            });
        }
    }

    fn draw_view_controls(&mut self, ui: &mut Ui) {
        let mut planar = self.graph.is_planar();
        if ui
            .checkbox(&mut planar, "Flat graph")
            .on_hover_text("Lay the graph out on the z = 0 plane.")
            .changed()
        {
            self.graph.set_planar(planar);
            self.layout_moving = true;
        }

        ui.checkbox(&mut self.live_layout, "Live layout")
            .on_hover_text("Pause to freeze every agent where it is.");

        ui.horizontal(|ui| {
            if ui.button("Reset camera").clicked() {
                self.camera = OrbitCamera::default();
            }
            if ui
                .add_enabled(
                    self.graph.selected().is_some(),
                    egui::Button::new("Clear selection"),
                )
                .clicked()
            {
                self.set_selected(None);
            }
        });
    }

    fn draw_node_picker(&mut self, ui: &mut Ui, is_reloading: bool) {
        ui.label(RichText::new("Nodes").strong());
        ui.text_edit_singleline(&mut self.node_search)
            .on_hover_text("Fuzzy search by node name.");

        let matches = rank_nodes(
            self.graph.model().node_ids(),
            &self.node_search,
            PICKER_ROWS,
        );
        if matches.is_empty() {
            ui.label("No matching nodes.");
        }
        for id in matches {
            let is_target = self.reload_target.as_ref() == Some(&id);
            if ui.selectable_label(is_target, id.as_str()).clicked() {
                self.reload_target = Some(id.clone());
                self.set_selected(Some(id));
            }
        }

        ui.horizontal(|ui| {
            let can_reload = !is_reloading && self.reload_target.is_some();
            if ui
                .add_enabled(can_reload, egui::Button::new("Reload node"))
                .on_hover_text("Re-read the source and refresh only this node's links.")
                .clicked()
                && let Some(target) = self.reload_target.clone()
            {
                self.reload_requested = Some(ReloadScope::Node(target));
            }
            if let Some(target) = &self.reload_target {
                ui.label(target.as_str());
            }
        });
    }

    fn draw_signal_sender(&mut self, ui: &mut Ui) {
        ui.label(RichText::new("Visual signal").strong());
        egui::Grid::new("signal_grid").num_columns(2).show(ui, |ui| {
            ui.label("From");
            ui.text_edit_singleline(&mut self.signal_from);
            ui.end_row();
            ui.label("To");
            ui.text_edit_singleline(&mut self.signal_to);
            ui.end_row();
        });

        if ui.button("Send").clicked() {
            let from = NodeId::from(self.signal_from.trim());
            let to = NodeId::from(self.signal_to.trim());
            let sent = self.graph.send_visual_signal(&from, &to, signal_appearance());
            self.signal_status = Some(if sent {
                format!("{from} -> {to}")
            } else {
                "Unknown node, signal dropped".to_owned()
            });
        }
        if let Some(status) = &self.signal_status {
            ui.small(status.as_str());
        }
    }

    fn draw_tuning(&mut self, ui: &mut Ui) {
        ui.label(RichText::new("Layout tuning").strong());

        let mut layout = *self.graph.layout_config();
        let mut changed = false;
        changed |= ui
            .add(
                egui::Slider::new(&mut layout.separation_distance, 1.0..=40.0)
                    .text("Separation distance"),
            )
            .changed();
        changed |= ui
            .add(
                egui::Slider::new(&mut layout.separation_weight, 0.0..=30.0)
                    .text("Separation weight"),
            )
            .changed();
        changed |= ui
            .add(
                egui::Slider::new(&mut layout.compaction_weight, 0.0..=10.0)
                    .text("Compaction weight"),
            )
            .changed();
        changed |= ui
            .add(
                egui::Slider::new(&mut layout.link_weight, 0.0..=4.0).text("Link weight"),
            )
            .changed();
        changed |= ui
            .add(
                egui::Slider::new(&mut layout.idle_weight, 0.0..=5.0).text("Idle weight"),
            )
            .changed();
        changed |= ui
            .add(
                egui::Slider::new(&mut layout.max_speed, 0.5..=40.0).text("Max speed"),
            )
            .changed();
        changed |= ui
            .add(
                egui::Slider::new(&mut layout.max_acceleration, 1.0..=120.0)
                    .text("Max acceleration"),
            )
            .changed();
        changed |= ui
            .add(
                egui::Slider::new(&mut layout.damping, 0.5..=1.0).text("Damping"),
            )
            .changed();
        if changed {
            self.graph.set_layout_config(layout);
            self.layout_moving = true;
        }

        let mut scene = *self.graph.scene_config();
        let mut scene_changed = false;
        scene_changed |= ui
            .add(
                egui::Slider::new(&mut scene.arrow_head_fraction, 0.0..=0.5).text("Arrow head"),
            )
            .changed();
        scene_changed |= ui
            .add(
                egui::Slider::new(&mut scene.signal_duration, 0.2..=5.0)
                    .text("Signal duration (s)"),
            )
            .changed();
        if scene_changed {
            self.graph.set_scene_config(scene);
        }
    }
}
