use crate::graph::{LineShape, LinkProperty, NodeAppearance, NodeId, NodeShape, Rgba};
use crate::util::stable_color;

use super::document::{GraphDocument, LinkPropertyEntry, NodeEntry};

const NAMES: [&str; 7] = [
    "Alpha", "Bravo", "Charlie", "Delta", "Echo", "Foxtrot", "Golf",
];

fn demo_links(name: &str) -> &'static [&'static str] {
    match name {
        "Alpha" => &["Bravo"],
        "Bravo" => &["Charlie"],
        "Charlie" => &[],
        "Delta" => &["Alpha", "Bravo", "Charlie"],
        _ => &["Delta"],
    }
}

fn demo_color(name: &str) -> Rgba {
    match name {
        "Alpha" => Rgba::rgb(255, 0, 0),
        "Bravo" => Rgba::rgb(0, 255, 0),
        "Charlie" => Rgba::rgb(0, 0, 255),
        "Delta" => Rgba::rgb(255, 255, 0),
        other => stable_color(other),
    }
}

/// Seven-node graph shown when no file is given: boxes, square arrows
/// colored after their target.
pub fn demo_document() -> GraphDocument {
    let nodes = NAMES
        .iter()
        .map(|name| NodeEntry {
            name: NodeId::from(*name),
            links: demo_links(name)
                .iter()
                .map(|target| NodeId::from(*target))
                .collect(),
            appearance: Some(NodeAppearance {
                shape: NodeShape::Box,
                color: demo_color(name),
                size: 1.0,
                label: Some((*name).to_owned()),
            }),
            metadata: Default::default(),
        })
        .collect::<Vec<_>>();

    let link_properties = nodes
        .iter()
        .flat_map(|entry| {
            entry.links.iter().map(|target| LinkPropertyEntry {
                from: entry.name.clone(),
                to: target.clone(),
                property: LinkProperty {
                    line_shape: LineShape::Square,
                    color: demo_color(target.as_str()),
                    arrow_shaped: true,
                    ..LinkProperty::default()
                },
            })
        })
        .collect();

    GraphDocument::new(nodes, link_properties)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphDataSource, GraphPresentation};

    #[test]
    fn demo_graph_shape() {
        let document = demo_document();
        assert_eq!(document.node_count(), 7);
        assert_eq!(
            document.outgoing_links(&"Delta".into()),
            vec![
                NodeId::from("Alpha"),
                NodeId::from("Bravo"),
                NodeId::from("Charlie"),
            ]
        );
        assert_eq!(
            document.outgoing_links(&"Golf".into()),
            vec![NodeId::from("Delta")]
        );
        assert!(document.outgoing_links(&"Charlie".into()).is_empty());

        let property = document
            .link_property(&"Echo".into(), &"Delta".into())
            .expect("every demo link is styled");
        assert!(property.arrow_shaped);
        assert_eq!(property.color, Rgba::rgb(255, 255, 0));
    }
}
