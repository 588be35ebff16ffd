use super::model::{LinkProperty, Metadata, NodeAppearance, NodeId};

/// Structure of the graph. Pulled on every reload, never pushed.
pub trait GraphDataSource {
    fn node_names(&self) -> Vec<NodeId>;

    /// Targets of the node's outgoing links. Unknown nodes have none.
    fn outgoing_links(&self, node: &NodeId) -> Vec<NodeId>;
}

/// Optional presentation queries, kept apart from the structure so a plain
/// data source can be paired with [`DefaultPresentation`].
pub trait GraphPresentation {
    fn node_appearance(&self, node: &NodeId) -> NodeAppearance;

    /// `None` means the default [`LinkProperty`].
    fn link_property(&self, from: &NodeId, to: &NodeId) -> Option<LinkProperty>;

    /// Passed through to the view untouched.
    fn metadata(&self, node: &NodeId) -> Metadata;
}

/// Sphere placeholders, default links, no metadata.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultPresentation;

impl GraphPresentation for DefaultPresentation {
    fn node_appearance(&self, _node: &NodeId) -> NodeAppearance {
        NodeAppearance::default()
    }

    fn link_property(&self, _from: &NodeId, _to: &NodeId) -> Option<LinkProperty> {
        None
    }

    fn metadata(&self, _node: &NodeId) -> Metadata {
        Metadata::new()
    }
}

/// Data source paired with the presentation used for the same pull.
#[derive(Clone, Copy)]
pub struct Provider<'a> {
    pub source: &'a dyn GraphDataSource,
    pub presentation: &'a dyn GraphPresentation,
}

impl<'a> Provider<'a> {
    pub fn new(source: &'a dyn GraphDataSource) -> Self {
        Self {
            source,
            presentation: &DefaultPresentation,
        }
    }

    pub fn with_presentation(mut self, presentation: &'a dyn GraphPresentation) -> Self {
        self.presentation = presentation;
        self
    }

    /// Uses one value for both roles.
    pub fn from_document<T>(document: &'a T) -> Self
    where
        T: GraphDataSource + GraphPresentation,
    {
        Self {
            source: document,
            presentation: document,
        }
    }
}
