use std::collections::HashMap;

use glam::Vec3;
use tracing::trace;

use super::config::SceneConfig;
use super::layout::LayoutEngine;
use super::math::{link_orientation, try_direction};
use super::model::{GraphModel, LinkKey, LinkProperty, NodeAppearance, NodeId};
use super::signal::SignalQueue;

#[derive(Clone, Debug, PartialEq)]
pub struct NodeTransform {
    pub id: NodeId,
    pub position: Vec3,
    pub appearance: NodeAppearance,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArrowHead {
    pub base: Vec3,
    pub tip: Vec3,
    pub length: f32,
}

/// Placement of a link primitive authored along +y with unit length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkGeometry {
    /// Midpoint of the source..target span.
    pub anchor: Vec3,
    pub direction: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    /// Distance between the endpoints.
    pub length: f32,
    pub shaft_start: Vec3,
    pub shaft_end: Vec3,
    pub shaft_length: f32,
    pub arrow_head: Option<ArrowHead>,
}

impl LinkGeometry {
    /// `None` when the endpoints coincide and no direction exists.
    pub fn between(
        source: Vec3,
        target: Vec3,
        property: &LinkProperty,
        config: &SceneConfig,
    ) -> Option<Self> {
        let span = target - source;
        let direction = try_direction(span)?;
        let length = span.length();
        let (yaw, pitch) = link_orientation(span);

        let (start, end) = property.span();
        let head = if property.arrow_shaped {
            config.arrow_head_fraction.clamp(0.0, end - start)
        } else {
            0.0
        };
        let shaft_end_fraction = end - head;
        let shaft_end = source + span * shaft_end_fraction;

        Some(Self {
            anchor: source + span * 0.5,
            direction,
            yaw,
            pitch,
            length,
            shaft_start: source + span * start,
            shaft_end,
            shaft_length: length * (shaft_end_fraction - start),
            arrow_head: property.arrow_shaped.then(|| ArrowHead {
                base: shaft_end,
                tip: source + span * end,
                length: length * head,
            }),
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinkTransform {
    pub key: LinkKey,
    pub property: LinkProperty,
    pub geometry: LinkGeometry,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SignalTransform {
    pub source: NodeId,
    pub target: NodeId,
    pub position: Vec3,
    pub progress: f32,
    pub appearance: NodeAppearance,
}

/// Everything a renderer needs for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    pub nodes: Vec<NodeTransform>,
    pub links: Vec<LinkTransform>,
    pub signals: Vec<SignalTransform>,
    pub selection: Option<Vec3>,
}

impl Scene {
    pub fn node(&self, id: &str) -> Option<&NodeTransform> {
        self.nodes.iter().find(|node| node.id.as_str() == id)
    }

    pub fn link(&self, source: &str, target: &str) -> Option<&LinkTransform> {
        self.links
            .iter()
            .find(|link| link.key.source.as_str() == source && link.key.target.as_str() == target)
    }
}

/// Projects the model and the agent positions into a [`Scene`].
///
/// The only state kept between frames is the last valid geometry per link,
/// reused while a link's endpoints coincide.
pub struct SceneSynchronizer {
    config: SceneConfig,
    last_valid: HashMap<LinkKey, LinkGeometry>,
}

impl SceneSynchronizer {
    pub fn new(config: SceneConfig) -> Self {
        Self {
            config,
            last_valid: HashMap::new(),
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SceneConfig) {
        self.config = config;
        self.last_valid.clear();
    }

    pub fn clear(&mut self) {
        self.last_valid.clear();
    }

    pub fn sync(
        &mut self,
        model: &GraphModel,
        layout: &LayoutEngine,
        selected: Option<&NodeId>,
        signals: &SignalQueue,
    ) -> Scene {
        let nodes = model
            .node_ids()
            .filter_map(|id| {
                let position = layout.position(id.as_str())?;
                Some(NodeTransform {
                    id: id.clone(),
                    position,
                    appearance: model.appearance(id.as_str()).cloned().unwrap_or_default(),
                })
            })
            .collect::<Vec<_>>();

        let mut links = Vec::with_capacity(model.link_count());
        for (source, target) in model.links() {
            let (Some(from), Some(to)) = (
                layout.position(source.as_str()),
                layout.position(target.as_str()),
            ) else {
                trace!(%source, %target, "link endpoint has no agent, skipped");
                continue;
            };

            let key = LinkKey::new(source.clone(), target.clone());
            let property = model.link_property(source, target);
            let geometry = match LinkGeometry::between(from, to, &property, &self.config) {
                Some(geometry) => {
                    self.last_valid.insert(key.clone(), geometry);
                    geometry
                }
                None => match self.last_valid.get(&key) {
                    Some(previous) => *previous,
                    None => {
                        trace!(%source, %target, "degenerate link without prior geometry, skipped");
                        continue;
                    }
                },
            };

            links.push(LinkTransform {
                key,
                property,
                geometry,
            });
        }
        self.last_valid
            .retain(|key, _| model.has_link(key.source.as_str(), key.target.as_str()));

        let signals = signals
            .iter()
            .filter_map(|signal| {
                let from = layout.position(signal.source.as_str())?;
                let to = layout.position(signal.target.as_str())?;
                let progress = signal.progress(self.config.signal_duration);
                Some(SignalTransform {
                    source: signal.source.clone(),
                    target: signal.target.clone(),
                    position: from.lerp(to, progress),
                    progress,
                    appearance: signal.appearance.clone(),
                })
            })
            .collect();

        Scene {
            nodes,
            links,
            signals,
            selection: selected.and_then(|id| layout.position(id.as_str())),
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::vec3;

    use super::*;

    #[test]
    fn default_link_spans_endpoints() {
        let geometry = LinkGeometry::between(
            Vec3::ZERO,
            vec3(2.0, 0.0, 0.0),
            &LinkProperty::default(),
            &SceneConfig::default(),
        )
        .expect("distinct endpoints");

        assert_eq!(geometry.anchor, vec3(1.0, 0.0, 0.0));
        assert_eq!(geometry.length, 2.0);
        assert_eq!(geometry.shaft_length, 2.0);
        assert_eq!(geometry.shaft_start, Vec3::ZERO);
        assert_eq!(geometry.shaft_end, vec3(2.0, 0.0, 0.0));
        assert!(geometry.arrow_head.is_none());
    }

    #[test]
    fn arrow_head_shortens_shaft() {
        let property = LinkProperty {
            arrow_shaped: true,
            ..LinkProperty::default()
        };
        let geometry = LinkGeometry::between(
            Vec3::ZERO,
            vec3(2.0, 0.0, 0.0),
            &property,
            &SceneConfig::default(),
        )
        .expect("distinct endpoints");

        assert!((geometry.shaft_length - 1.8).abs() < 1e-6);
        let head = geometry.arrow_head.expect("arrow head");
        assert_eq!(head.tip, vec3(2.0, 0.0, 0.0));
        assert!((head.base.x - 1.8).abs() < 1e-6);
        assert!((head.length - 0.2).abs() < 1e-6);
    }

    #[test]
    fn partial_span_uses_fractions() {
        let property = LinkProperty {
            starting_distance: 0.25,
            ending_distance: 0.75,
            ..LinkProperty::default()
        };
        let geometry = LinkGeometry::between(
            Vec3::ZERO,
            vec3(0.0, 4.0, 0.0),
            &property,
            &SceneConfig::default(),
        )
        .expect("distinct endpoints");

        assert_eq!(geometry.shaft_start, vec3(0.0, 1.0, 0.0));
        assert_eq!(geometry.shaft_end, vec3(0.0, 3.0, 0.0));
        assert_eq!(geometry.shaft_length, 2.0);
        assert_eq!(geometry.anchor, vec3(0.0, 2.0, 0.0));
    }

    #[test]
    fn coincident_endpoints_have_no_geometry() {
        let point = vec3(1.0, 1.0, 1.0);
        let geometry = LinkGeometry::between(
            point,
            point,
            &LinkProperty::default(),
            &SceneConfig::default(),
        );
        assert!(geometry.is_none());
    }
}
