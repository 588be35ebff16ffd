use eframe::egui::{self, RichText, Ui};
use steer_graph::graph::{LineShape, LinkProperty, NodeShape};

use super::super::ViewModel;
use super::super::render_utils::to_color32;

fn describe_property(property: &LinkProperty, custom: bool) -> String {
    if !custom {
        return "default".to_owned();
    }

    let shape = match property.line_shape {
        LineShape::Round => "round",
        LineShape::Square => "square",
        LineShape::Wire => "wire",
    };
    let (start, end) = property.span();
    let mut text = format!(
        "{shape}, width {:.2}, {start:.2}..{end:.2}",
        property.line_width
    );
    if property.arrow_shaped {
        text.push_str(", arrow");
    }
    text
}

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection Details");
        ui.add_space(6.0);

        let Some(selected_id) = self.graph.selected().cloned() else {
            ui.label("Select a node in the graph or the node list.");
            return;
        };

        let model = self.graph.model();
        if !model.contains(selected_id.as_str()) {
            ui.label(RichText::new(selected_id.as_str()).strong());
            ui.label("This node is not part of the current graph.");
            return;
        }

        let appearance = model
            .appearance(selected_id.as_str())
            .cloned()
            .unwrap_or_default();
        let metadata = model
            .metadata(selected_id.as_str())
            .cloned()
            .unwrap_or_default();
        let outgoing = model
            .outgoing(selected_id.as_str())
            .map(|target| {
                let property = model.link_property(&selected_id, target);
                let custom = model.has_custom_link_property(&selected_id, target);
                let dangling = !model.contains(target.as_str());
                (target.clone(), describe_property(&property, custom), dangling)
            })
            .collect::<Vec<_>>();
        let incoming = model
            .incoming(selected_id.as_str())
            .cloned()
            .collect::<Vec<_>>();
        let agent = self
            .graph
            .layout()
            .agent(selected_id.as_str())
            .map(|agent| (agent.position(), agent.velocity()));

        let mut next_selection = None;

        let fallback = selected_id.as_str();
        let title = appearance.label.as_deref().unwrap_or(fallback);
        ui.label(RichText::new(title).strong());
        ui.small(selected_id.as_str());
        ui.add_space(6.0);

        ui.horizontal(|ui| {
            let shape = match appearance.shape {
                NodeShape::Sphere => "sphere",
                NodeShape::Box => "box",
            };
            ui.label(format!("Shape: {shape}, size {:.2}", appearance.size));
            let (swatch, _) = ui.allocate_exact_size(egui::vec2(14.0, 14.0), egui::Sense::hover());
            ui.painter()
                .rect_filled(swatch, 2.0, to_color32(appearance.color));
        });

        if let Some((position, velocity)) = agent {
            ui.label(format!(
                "Position: ({:.2}, {:.2}, {:.2})",
                position.x, position.y, position.z
            ));
            ui.label(format!("Speed: {:.3}", velocity.length()));
        }

        ui.separator();
        ui.label(RichText::new("Metadata").strong());
        if metadata.is_empty() {
            ui.label("None.");
        } else {
            egui::Grid::new("metadata_grid").num_columns(2).show(ui, |ui| {
                for (key, value) in &metadata {
                    ui.label(key.as_str());
                    ui.label(value.to_string());
                    ui.end_row();
                }
            });
        }

        ui.separator();
        let heading = format!("Outgoing links ({})", outgoing.len());
        ui.label(RichText::new(heading).strong());
        for (target, property, dangling) in &outgoing {
            ui.horizontal(|ui| {
                if *dangling {
                    ui.label(format!("{target} (missing)"));
                } else if ui.link(target.as_str()).clicked() {
                    next_selection = Some(target.clone());
                }
                ui.small(property.as_str());
            });
        }

        ui.separator();
        let heading = format!("Incoming links ({})", incoming.len());
        ui.label(RichText::new(heading).strong());
        for source in &incoming {
            if ui.link(source.as_str()).clicked() {
                next_selection = Some(source.clone());
            }
        }

        if let Some(next) = next_selection {
            self.set_selected(Some(next));
        }
    }
}
