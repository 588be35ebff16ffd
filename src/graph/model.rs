use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::provider::Provider;

/// Opaque node name. Any character is allowed, separators included.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for NodeId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Directed edge identity. A->B and B->A are distinct keys.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LinkKey {
    pub source: NodeId,
    pub target: NodeId,
}

impl LinkKey {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    pub const WHITE: Self = Self([255, 255, 255, 255]);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }

    pub fn r(self) -> u8 {
        self.0[0]
    }

    pub fn g(self) -> u8 {
        self.0[1]
    }

    pub fn b(self) -> u8 {
        self.0[2]
    }

    pub fn a(self) -> u8 {
        self.0[3]
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineShape {
    #[default]
    Round,
    Square,
    Wire,
}

/// Styling of one directed link. Distances are fractions of the segment from
/// the source (0.0) to the target (1.0).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkProperty {
    pub line_shape: LineShape,
    pub line_width: f32,
    pub color: Rgba,
    pub arrow_shaped: bool,
    pub starting_distance: f32,
    pub ending_distance: f32,
}

impl Default for LinkProperty {
    fn default() -> Self {
        Self {
            line_shape: LineShape::Round,
            line_width: 0.1,
            color: Rgba::WHITE,
            arrow_shaped: false,
            starting_distance: 0.0,
            ending_distance: 1.0,
        }
    }
}

impl LinkProperty {
    /// Span fractions with `starting <= ending`, both inside `[0, 1]`.
    pub fn span(&self) -> (f32, f32) {
        let start = sanitize_fraction(self.starting_distance, 0.0);
        let end = sanitize_fraction(self.ending_distance, 1.0);
        if start <= end {
            (start, end)
        } else {
            (end, start)
        }
    }
}

fn sanitize_fraction(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        fallback
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeShape {
    #[default]
    Sphere,
    Box,
}

/// Renderable placeholder for a node. The core never draws it, it only
/// carries it to the scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeAppearance {
    pub shape: NodeShape,
    pub color: Rgba,
    pub size: f32,
    pub label: Option<String>,
}

impl Default for NodeAppearance {
    fn default() -> Self {
        Self {
            shape: NodeShape::Sphere,
            color: Rgba::WHITE,
            size: 1.0,
            label: None,
        }
    }
}

pub type Metadata = BTreeMap<String, serde_json::Value>;

/// Snapshot of the graph as last pulled from the provider.
#[derive(Debug, Default)]
pub struct GraphModel {
    nodes: BTreeSet<NodeId>,
    outgoing: BTreeMap<NodeId, BTreeSet<NodeId>>,
    link_properties: BTreeMap<LinkKey, LinkProperty>,
    appearances: BTreeMap<NodeId, NodeAppearance>,
    metadata: BTreeMap<NodeId, Metadata>,
}

impl GraphModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.outgoing.clear();
        self.link_properties.clear();
        self.appearances.clear();
        self.metadata.clear();
    }

    pub fn reload(&mut self, provider: &Provider<'_>) {
        self.clear();
        self.nodes = provider.source.node_names().into_iter().collect();

        let names = self.nodes.iter().cloned().collect::<Vec<_>>();
        for name in &names {
            self.pull_node(name, provider);
        }

        debug!(
            nodes = self.nodes.len(),
            links = self.link_count(),
            "graph model reloaded"
        );
    }

    /// Replaces one node's links, link properties, appearance and metadata.
    pub fn reload_node(&mut self, name: &NodeId, provider: &Provider<'_>) {
        self.forget_node_entries(name);

        if !self.nodes.contains(name) {
            if provider
                .source
                .node_names()
                .iter()
                .any(|known| known == name)
            {
                self.nodes.insert(name.clone());
            } else {
                debug!(node = %name, "reload requested for a node the provider does not list");
                return;
            }
        }

        self.pull_node(name, provider);
        debug!(
            node = %name,
            links = self.outgoing.get(name).map_or(0, BTreeSet::len),
            "graph model node reloaded"
        );
    }

    fn forget_node_entries(&mut self, name: &NodeId) {
        if let Some(targets) = self.outgoing.remove(name) {
            for target in targets {
                self.link_properties
                    .remove(&LinkKey::new(name.clone(), target));
            }
        }
        self.appearances.remove(name);
        self.metadata.remove(name);
    }

    fn pull_node(&mut self, name: &NodeId, provider: &Provider<'_>) {
        let targets = provider
            .source
            .outgoing_links(name)
            .into_iter()
            .collect::<BTreeSet<_>>();

        for target in &targets {
            if let Some(property) = provider.presentation.link_property(name, target) {
                self.link_properties
                    .insert(LinkKey::new(name.clone(), target.clone()), property);
            }
        }

        self.outgoing.insert(name.clone(), targets);
        self.appearances
            .insert(name.clone(), provider.presentation.node_appearance(name));
        let metadata = provider.presentation.metadata(name);
        if !metadata.is_empty() {
            self.metadata.insert(name.clone(), metadata);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains(name)
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.iter()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Outgoing targets as pulled, dangling ones included.
    pub fn outgoing(&self, name: &str) -> impl Iterator<Item = &NodeId> {
        self.outgoing.get(name).into_iter().flatten()
    }

    pub fn incoming(&self, name: &str) -> impl Iterator<Item = &NodeId> {
        self.outgoing
            .iter()
            .filter(move |(_, targets)| targets.contains(name))
            .map(|(source, _)| source)
    }

    pub fn has_link(&self, source: &str, target: &str) -> bool {
        self.outgoing
            .get(source)
            .is_some_and(|targets| targets.contains(target))
    }

    /// Every pulled link in source order.
    pub fn links(&self) -> impl Iterator<Item = (&NodeId, &NodeId)> {
        self.outgoing
            .iter()
            .flat_map(|(source, targets)| targets.iter().map(move |target| (source, target)))
    }

    pub fn link_count(&self) -> usize {
        self.outgoing.values().map(BTreeSet::len).sum()
    }

    /// Property of the link, or the default one when the provider had none.
    pub fn link_property(&self, source: &NodeId, target: &NodeId) -> LinkProperty {
        self.link_properties
            .get(&LinkKey::new(source.clone(), target.clone()))
            .copied()
            .unwrap_or_default()
    }

    pub fn has_custom_link_property(&self, source: &NodeId, target: &NodeId) -> bool {
        self.link_properties
            .contains_key(&LinkKey::new(source.clone(), target.clone()))
    }

    pub fn appearance(&self, name: &str) -> Option<&NodeAppearance> {
        self.appearances.get(name)
    }

    pub fn metadata(&self, name: &str) -> Option<&Metadata> {
        self.metadata.get(name)
    }
}
