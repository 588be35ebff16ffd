use eframe::egui::{self, Rect, Ui};
use steer_graph::graph::NodeId;

use super::super::ViewModel;
use super::view::ScreenNode;

impl ViewModel {
    pub(in crate::app) fn handle_graph_zoom(&mut self, ui: &Ui, response: &egui::Response) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let zoom_factor = (1.0 - (scroll * 0.0018)).clamp(0.85, 1.15);
        self.camera.zoom(zoom_factor);
    }

    /// Left drag orbits (or pans when flat), right and middle drag pan.
    pub(in crate::app) fn handle_graph_drag(&mut self, response: &egui::Response) {
        let delta = response.drag_delta();
        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.camera.pan += delta;
        } else if response.dragged_by(egui::PointerButton::Primary) {
            if self.graph.is_planar() {
                self.camera.pan += delta;
            } else {
                self.camera.orbit(delta);
            }
        }
    }

    pub(in crate::app) fn hovered_node(
        &self,
        ui: &Ui,
        rect: Rect,
        screen_nodes: &[ScreenNode],
    ) -> Option<NodeId> {
        let pointer = ui.input(|input| input.pointer.hover_pos())?;
        if !rect.contains(pointer) {
            return None;
        }

        screen_nodes
            .iter()
            .filter_map(|node| {
                let distance = node.pos.distance(pointer);
                (distance <= node.radius.max(6.0)).then_some((node, distance))
            })
            .min_by(|a, b| a.0.depth.total_cmp(&b.0.depth).then(a.1.total_cmp(&b.1)))
            .map(|(node, _)| node.id.clone())
    }

    pub(in crate::app) fn apply_graph_selection(&mut self, selected: Option<NodeId>) {
        self.set_selected(selected);
    }
}
