use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::graph::{
    GraphDataSource, GraphPresentation, LayoutConfig, LinkProperty, Metadata, NodeAppearance,
    NodeId, SceneConfig,
};
use crate::util::stable_color;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeEntry {
    pub name: NodeId,
    #[serde(default)]
    pub links: Vec<NodeId>,
    #[serde(default)]
    pub appearance: Option<NodeAppearance>,
    #[serde(default)]
    pub metadata: Metadata,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinkPropertyEntry {
    pub from: NodeId,
    pub to: NodeId,
    #[serde(flatten)]
    pub property: LinkProperty,
}

/// Graph file contents. Serves as both data source and presentation.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub nodes: Vec<NodeEntry>,
    #[serde(default)]
    pub link_properties: Vec<LinkPropertyEntry>,
    #[serde(default)]
    pub layout: Option<LayoutConfig>,
    #[serde(default)]
    pub scene: Option<SceneConfig>,
    #[serde(skip)]
    node_index: HashMap<NodeId, usize>,
    #[serde(skip)]
    link_index: HashMap<(NodeId, NodeId), usize>,
}

impl GraphDocument {
    pub fn new(nodes: Vec<NodeEntry>, link_properties: Vec<LinkPropertyEntry>) -> Self {
        let mut document = Self {
            nodes,
            link_properties,
            ..Self::default()
        };
        document.reindex();
        document
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let mut document: Self =
            serde_json::from_str(raw).context("failed to parse graph document json")?;
        document.reindex();
        Ok(document)
    }

    /// First entry wins when a name or a link is listed twice.
    fn reindex(&mut self) {
        self.node_index.clear();
        for (index, entry) in self.nodes.iter().enumerate() {
            self.node_index.entry(entry.name.clone()).or_insert(index);
        }

        self.link_index.clear();
        for (index, entry) in self.link_properties.iter().enumerate() {
            self.link_index
                .entry((entry.from.clone(), entry.to.clone()))
                .or_insert(index);
        }
    }

    fn entry(&self, node: &NodeId) -> Option<&NodeEntry> {
        self.node_index
            .get(node)
            .and_then(|index| self.nodes.get(*index))
    }

    pub fn node_count(&self) -> usize {
        self.node_index.len()
    }
}

impl GraphDataSource for GraphDocument {
    fn node_names(&self) -> Vec<NodeId> {
        let mut names = self
            .nodes
            .iter()
            .map(|entry| entry.name.clone())
            .collect::<Vec<_>>();
        names.sort();
        names.dedup();
        names
    }

    fn outgoing_links(&self, node: &NodeId) -> Vec<NodeId> {
        self.entry(node)
            .map(|entry| entry.links.clone())
            .unwrap_or_default()
    }
}

impl GraphPresentation for GraphDocument {
    fn node_appearance(&self, node: &NodeId) -> NodeAppearance {
        match self.entry(node).and_then(|entry| entry.appearance.clone()) {
            Some(appearance) => appearance,
            None => NodeAppearance {
                color: stable_color(node.as_str()),
                ..NodeAppearance::default()
            },
        }
    }

    fn link_property(&self, from: &NodeId, to: &NodeId) -> Option<LinkProperty> {
        self.link_index
            .get(&(from.clone(), to.clone()))
            .and_then(|index| self.link_properties.get(*index))
            .map(|entry| entry.property)
    }

    fn metadata(&self, node: &NodeId) -> Metadata {
        self.entry(node)
            .map(|entry| entry.metadata.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{LineShape, NodeShape};

    const SAMPLE: &str = r#"{
        "nodes": [
            { "name": "a-b", "links": ["c"], "appearance": { "shape": "box", "label": "first" } },
            { "name": "c", "metadata": { "owner": "ops" } },
            { "name": "a-b", "links": ["ignored"] }
        ],
        "link_properties": [
            { "from": "a-b", "to": "c", "line_shape": "square", "arrow_shaped": true }
        ],
        "layout": { "link_weight": 0.8 }
    }"#;

    #[test]
    fn parses_nodes_links_and_sections() {
        let document = GraphDocument::from_json(SAMPLE).expect("valid document");

        assert_eq!(
            document.node_names(),
            vec![NodeId::from("a-b"), NodeId::from("c")]
        );
        assert_eq!(
            document.outgoing_links(&"a-b".into()),
            vec![NodeId::from("c")]
        );
        assert!(document.outgoing_links(&"missing".into()).is_empty());
        assert_eq!(document.layout.map(|layout| layout.link_weight), Some(0.8));
        assert!(document.scene.is_none());
    }

    #[test]
    fn presentation_comes_from_entries() {
        let document = GraphDocument::from_json(SAMPLE).expect("valid document");

        let appearance = document.node_appearance(&"a-b".into());
        assert_eq!(appearance.shape, NodeShape::Box);
        assert_eq!(appearance.label.as_deref(), Some("first"));
        assert_eq!(appearance.size, 1.0);

        let property = document
            .link_property(&"a-b".into(), &"c".into())
            .expect("explicit property");
        assert_eq!(property.line_shape, LineShape::Square);
        assert!(property.arrow_shaped);
        assert_eq!(property.ending_distance, 1.0);
        assert!(document.link_property(&"c".into(), &"a-b".into()).is_none());

        let metadata = document.metadata(&"c".into());
        assert_eq!(metadata.get("owner"), Some(&serde_json::json!("ops")));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(GraphDocument::from_json("{ \"nodes\": 3 }").is_err());
    }
}
