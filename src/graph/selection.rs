use tracing::debug;

use super::model::{GraphModel, NodeId};

/// Receives selection changes pushed by the view.
pub trait GraphDelegate {
    fn node_selected(&mut self, node: &NodeId);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopDelegate;

impl GraphDelegate for NoopDelegate {
    fn node_selected(&mut self, _node: &NodeId) {}
}

/// Current selection. Holds the name only, never the node itself.
pub struct SelectionController {
    selected: Option<NodeId>,
    delegate: Box<dyn GraphDelegate>,
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionController {
    pub fn new() -> Self {
        Self {
            selected: None,
            delegate: Box::new(NoopDelegate),
        }
    }

    pub fn set_delegate(&mut self, delegate: Box<dyn GraphDelegate>) {
        self.delegate = delegate;
    }

    /// Returns whether the selection changed. The delegate hears about new
    /// selections only; clearing is silent.
    pub fn select(&mut self, node: Option<NodeId>) -> bool {
        if self.selected == node {
            return false;
        }

        self.selected = node;
        if let Some(node) = &self.selected {
            self.delegate.node_selected(node);
        }
        true
    }

    pub fn current(&self) -> Option<&NodeId> {
        self.selected.as_ref()
    }

    /// Clears a selection whose node left the model.
    pub fn retain_existing(&mut self, model: &GraphModel) {
        if let Some(node) = &self.selected
            && !model.contains(node.as_str())
        {
            debug!(node = %node, "selected node vanished, selection cleared");
            self.selected = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    struct Recorder(Rc<RefCell<Vec<String>>>);

    impl GraphDelegate for Recorder {
        fn node_selected(&mut self, node: &NodeId) {
            self.0.borrow_mut().push(node.to_string());
        }
    }

    #[test]
    fn delegate_hears_changes_but_not_deselection() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut selection = SelectionController::new();
        selection.set_delegate(Box::new(Recorder(Rc::clone(&seen))));

        assert!(selection.select(Some("a".into())));
        assert!(!selection.select(Some("a".into())));
        assert!(selection.select(Some("b".into())));
        assert!(selection.select(None));
        assert_eq!(selection.current(), None);
        assert_eq!(*seen.borrow(), vec!["a".to_owned(), "b".to_owned()]);
    }

    #[test]
    fn unknown_nodes_are_selectable() {
        let mut selection = SelectionController::new();
        assert!(selection.select(Some("nowhere".into())));
        assert_eq!(selection.current().map(NodeId::as_str), Some("nowhere"));

        selection.retain_existing(&GraphModel::new());
        assert_eq!(selection.current(), None);
    }
}
