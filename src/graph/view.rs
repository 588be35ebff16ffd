use tracing::debug;

use super::agent::Dimensionality;
use super::config::{LayoutConfig, SceneConfig};
use super::layout::LayoutEngine;
use super::model::{GraphModel, NodeAppearance, NodeId};
use super::provider::Provider;
use super::scene::{Scene, SceneSynchronizer};
use super::selection::{GraphDelegate, SelectionController};
use super::signal::SignalQueue;

/// The enclosing graph view: owns the model, the agents and the selection,
/// and keeps the latest [`Scene`] for the renderer.
///
/// Everything runs on the caller's thread. A driver calls [`Self::update`]
/// once per frame and issues reloads or selections between frames.
pub struct GraphView {
    model: GraphModel,
    layout: LayoutEngine,
    synchronizer: SceneSynchronizer,
    selection: SelectionController,
    signals: SignalQueue,
    last_update: Option<f64>,
    scene: Scene,
}

impl Default for GraphView {
    fn default() -> Self {
        Self::new(
            LayoutConfig::default(),
            SceneConfig::default(),
            Dimensionality::default(),
        )
    }
}

impl GraphView {
    pub fn new(
        layout_config: LayoutConfig,
        scene_config: SceneConfig,
        dimensionality: Dimensionality,
    ) -> Self {
        Self {
            model: GraphModel::new(),
            layout: LayoutEngine::new(layout_config, dimensionality),
            synchronizer: SceneSynchronizer::new(scene_config),
            selection: SelectionController::new(),
            signals: SignalQueue::new(),
            last_update: None,
            scene: Scene::default(),
        }
    }

    pub fn set_delegate(&mut self, delegate: Box<dyn GraphDelegate>) {
        self.selection.set_delegate(delegate);
    }

    /// Pulls the whole graph again. Agents of nodes that survive keep their
    /// position and velocity.
    pub fn reload(&mut self, provider: &Provider<'_>) {
        self.model.reload(provider);
        let dimensionality = self.layout.dimensionality();
        self.layout.rebuild_agents(&self.model, dimensionality);
        self.after_structure_change();
    }

    /// Pulls one node's links and presentation again, leaving every other
    /// node's data and agent untouched.
    pub fn reload_node(&mut self, node: &NodeId, provider: &Provider<'_>) {
        self.model.reload_node(node, provider);
        self.layout.rebuild_agent(node, &self.model);
        self.after_structure_change();
    }

    /// Empties the view. The next frame after this does not move anything.
    pub fn clear(&mut self) {
        self.model.clear();
        self.layout.reset();
        self.synchronizer.clear();
        self.signals.clear();
        self.selection.select(None);
        self.last_update = None;
        self.resync();
    }

    fn after_structure_change(&mut self) {
        self.selection.retain_existing(&self.model);
        let layout = &self.layout;
        self.signals
            .retain_endpoints(|id| layout.agent(id.as_str()).is_some());
        self.resync();
    }

    pub fn dimensionality(&self) -> Dimensionality {
        self.layout.dimensionality()
    }

    pub fn set_dimensionality(&mut self, dimensionality: Dimensionality) {
        if dimensionality == self.layout.dimensionality() {
            return;
        }
        debug!(?dimensionality, "switching layout dimensionality");
        self.layout.rebuild_agents(&self.model, dimensionality);
        self.resync();
    }

    pub fn is_planar(&self) -> bool {
        self.dimensionality().is_planar()
    }

    pub fn set_planar(&mut self, planar: bool) {
        self.set_dimensionality(if planar {
            Dimensionality::Planar
        } else {
            Dimensionality::Spatial
        });
    }

    pub fn layout_config(&self) -> &LayoutConfig {
        self.layout.config()
    }

    pub fn set_layout_config(&mut self, config: LayoutConfig) {
        self.layout.set_config(config, &self.model);
    }

    pub fn scene_config(&self) -> &SceneConfig {
        self.synchronizer.config()
    }

    pub fn set_scene_config(&mut self, config: SceneConfig) {
        self.synchronizer.set_config(config);
        self.resync();
    }

    /// Queues a marker traveling from `from` to `to`. Returns `false` when an
    /// endpoint has no agent; the signal is dropped in that case.
    pub fn send_visual_signal(
        &mut self,
        from: &NodeId,
        to: &NodeId,
        appearance: NodeAppearance,
    ) -> bool {
        if self.layout.agent(from.as_str()).is_none() || self.layout.agent(to.as_str()).is_none() {
            debug!(%from, %to, "visual signal endpoint unknown, dropped");
            return false;
        }
        self.signals.push(from.clone(), to.clone(), appearance);
        self.resync();
        true
    }

    pub fn select(&mut self, node: Option<NodeId>) -> bool {
        let changed = self.selection.select(node);
        if changed {
            self.scene.selection = self
                .selection
                .current()
                .and_then(|id| self.layout.position(id.as_str()));
        }
        changed
    }

    pub fn selected(&self) -> Option<&NodeId> {
        self.selection.current()
    }

    /// Frame entry point taking an absolute time in seconds. The first call
    /// has no baseline and advances by zero.
    pub fn update(&mut self, time: f64) -> bool {
        let dt = match self.last_update {
            Some(last) if time > last => (time - last) as f32,
            _ => 0.0,
        };
        self.last_update = Some(time);
        self.tick(dt)
    }

    /// Advances agents and signals by `dt` seconds and refreshes the scene.
    /// Returns whether anything is still in motion.
    pub fn tick(&mut self, dt: f32) -> bool {
        let moving = self.layout.tick(dt);
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.signals
            .advance(dt, self.synchronizer.config().signal_duration);
        self.resync();
        moving || !self.signals.is_empty()
    }

    fn resync(&mut self) {
        self.scene = self.synchronizer.sync(
            &self.model,
            &self.layout,
            self.selection.current(),
            &self.signals,
        );
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn model(&self) -> &GraphModel {
        &self.model
    }

    pub fn layout(&self) -> &LayoutEngine {
        &self.layout
    }

    pub fn signals(&self) -> &SignalQueue {
        &self.signals
    }
}
