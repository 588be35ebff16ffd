use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Shape, Stroke, Ui, vec2};
use steer_graph::graph::{LineShape, NodeId, NodeShape};
use steer_graph::util::truncate_label;

use super::super::ViewModel;
use super::super::render_utils::{
    Projected, arrow_triangle, blend_color, circle_visible, depth_fade, draw_background,
    segment_visible, to_color32,
};

const MAX_FRAME_DT: f32 = 0.1;
const LABEL_MAX_CHARS: usize = 28;

pub(in crate::app) struct ScreenNode {
    pub id: NodeId,
    pub index: usize,
    pub pos: Pos2,
    pub radius: f32,
    pub depth: f32,
}

impl ViewModel {
    fn advance_layout(&mut self, ui: &Ui) {
        if !self.live_layout {
            return;
        }

        let dt = ui.input(|input| input.stable_dt).min(MAX_FRAME_DT);
        let moving = self.graph.tick(dt);
        if moving || self.layout_moving {
            ui.ctx().request_repaint();
        }
        self.layout_moving = moving;
    }

    fn screen_nodes(&self, rect: Rect) -> Vec<ScreenNode> {
        let planar = self.graph.is_planar();
        let mut screen_nodes = self
            .graph
            .scene()
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| {
                let Projected { pos, scale, depth } =
                    self.camera.project(rect, planar, node.position)?;
                let radius = (node.appearance.size * 0.5 * scale).clamp(3.0, 60.0);
                circle_visible(rect, pos, radius).then(|| ScreenNode {
                    id: node.id.clone(),
                    index,
                    pos,
                    radius,
                    depth,
                })
            })
            .collect::<Vec<_>>();

        // Far to near.
        screen_nodes.sort_by(|a, b| b.depth.total_cmp(&a.depth));
        screen_nodes
    }

    fn draw_links(&self, painter: &egui::Painter, rect: Rect) {
        let planar = self.graph.is_planar();
        let distance = self.camera.distance;

        for link in &self.graph.scene().links {
            let geometry = &link.geometry;
            let (Some(start), Some(end)) = (
                self.camera.project(rect, planar, geometry.shaft_start),
                self.camera.project(rect, planar, geometry.shaft_end),
            ) else {
                continue;
            };
            if !segment_visible(rect, start.pos, end.pos, 12.0) {
                continue;
            }

            let scale = (start.scale + end.scale) * 0.5;
            let color = depth_fade(
                to_color32(link.property.color),
                (start.depth + end.depth) * 0.5,
                distance,
            );
            let width = match link.property.line_shape {
                LineShape::Wire => 1.0,
                LineShape::Round | LineShape::Square => {
                    (link.property.line_width * scale).clamp(1.0, 12.0)
                }
            };

            if geometry.shaft_length > f32::EPSILON {
                painter.line_segment([start.pos, end.pos], Stroke::new(width, color));
                if link.property.line_shape == LineShape::Round {
                    painter.circle_filled(start.pos, width * 0.5, color);
                    painter.circle_filled(end.pos, width * 0.5, color);
                }
            }

            let Some(head) = geometry.arrow_head else {
                continue;
            };
            let (Some(base), Some(tip)) = (
                self.camera.project(rect, planar, head.base),
                self.camera.project(rect, planar, head.tip),
            ) else {
                continue;
            };
            let half_width = (head.length * tip.scale * 0.4).clamp(width, 24.0);
            if let Some(points) = arrow_triangle(base.pos, tip.pos, half_width) {
                painter.add(Shape::convex_polygon(points.to_vec(), color, Stroke::NONE));
            }
        }
    }

    fn draw_nodes(&self, painter: &egui::Painter, screen_nodes: &[ScreenNode]) {
        let scene = self.graph.scene();
        let selected = self.graph.selected();

        for screen_node in screen_nodes {
            let Some(node) = scene.nodes.get(screen_node.index) else {
                continue;
            };
            let is_hovered = self.hovered.as_ref() == Some(&screen_node.id);
            let is_selected = selected == Some(&screen_node.id);

            let mut color = depth_fade(
                to_color32(node.appearance.color),
                screen_node.depth,
                self.camera.distance,
            );
            if is_hovered {
                color = blend_color(color, Color32::WHITE, 0.3);
            }
            let outline = Stroke::new(1.0, blend_color(color, Color32::BLACK, 0.5));

            match node.appearance.shape {
                NodeShape::Sphere => {
                    painter.circle(screen_node.pos, screen_node.radius, color, outline);
                }
                NodeShape::Box => {
                    let side = screen_node.radius * 2.0;
                    painter.rect(
                        Rect::from_center_size(screen_node.pos, vec2(side, side)),
                        side * 0.1,
                        color,
                        outline,
                        egui::StrokeKind::Inside,
                    );
                }
            }

            if screen_node.radius >= 5.0 || is_hovered || is_selected {
                let label = node.appearance.label.as_deref().unwrap_or(node.id.as_str());
                painter.text(
                    screen_node.pos + vec2(0.0, screen_node.radius + 4.0),
                    Align2::CENTER_TOP,
                    truncate_label(label, LABEL_MAX_CHARS),
                    FontId::proportional(12.0),
                    blend_color(color, Color32::WHITE, 0.6),
                );
            }
        }
    }

    fn draw_selection_halo(
        &self,
        painter: &egui::Painter,
        rect: Rect,
        screen_nodes: &[ScreenNode],
    ) {
        let Some(position) = self.graph.scene().selection else {
            return;
        };
        let Some(projected) = self.camera.project(rect, self.graph.is_planar(), position) else {
            return;
        };

        let radius = self
            .graph
            .selected()
            .and_then(|id| screen_nodes.iter().find(|node| &node.id == id))
            .map_or(10.0, |node| node.radius);
        painter.circle_stroke(
            projected.pos,
            radius + 5.0,
            Stroke::new(2.0, Color32::from_rgb(250, 204, 21)),
        );
    }

    fn draw_signals(&self, painter: &egui::Painter, rect: Rect) {
        let planar = self.graph.is_planar();
        for signal in &self.graph.scene().signals {
            let Some(projected) = self.camera.project(rect, planar, signal.position) else {
                continue;
            };
            let radius = (signal.appearance.size * 0.25 * projected.scale).clamp(3.0, 20.0);
            let color = to_color32(signal.appearance.color);
            painter.circle_filled(projected.pos, radius, color);
            painter.circle_stroke(
                projected.pos,
                radius * 1.8,
                Stroke::new(1.0, color.gamma_multiply(0.4)),
            );
        }
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.handle_graph_zoom(ui, &response);
        self.handle_graph_drag(&response);
        self.advance_layout(ui);

        let screen_nodes = self.screen_nodes(rect);
        self.hovered = self.hovered_node(ui, rect, &screen_nodes);
        if self.hovered.is_some() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        }

        let painter = ui.painter_at(rect);
        draw_background(&painter, rect, self.camera.pan);
        self.draw_links(&painter, rect);
        self.draw_nodes(&painter, &screen_nodes);
        self.draw_selection_halo(&painter, rect, &screen_nodes);
        self.draw_signals(&painter, rect);

        if self.graph.model().is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "The graph is empty",
                FontId::proportional(16.0),
                Color32::GRAY,
            );
        }

        if response.clicked() {
            self.apply_graph_selection(self.hovered.clone());
        }
    }
}
