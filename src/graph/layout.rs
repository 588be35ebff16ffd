use std::collections::BTreeMap;

use glam::{Vec3, vec3};
use tracing::debug;

use super::agent::{Dimensionality, Snapshot, SteeringAgent};
use super::behavior::BehaviorBuilder;
use super::config::LayoutConfig;
use super::model::{GraphModel, NodeId};
use crate::util::stable_pair;

const MOTION_EPSILON_SQ: f32 = 0.000_001;
const SPAWN_JITTER: f32 = 0.1;

/// Owns one steering agent per node and advances them once per frame.
pub struct LayoutEngine {
    config: LayoutConfig,
    dimensionality: Dimensionality,
    agents: BTreeMap<NodeId, SteeringAgent>,
    primed: bool,
    steering_scratch: Vec<Vec3>,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig, dimensionality: Dimensionality) -> Self {
        Self {
            config,
            dimensionality,
            agents: BTreeMap::new(),
            primed: false,
            steering_scratch: Vec::new(),
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Applies new steering constants and rebuilds every behavior. Radii of
    /// existing agents are kept.
    pub fn set_config(&mut self, config: LayoutConfig, model: &GraphModel) {
        self.config = config;
        self.rebuild_behaviors(model);
    }

    pub fn dimensionality(&self) -> Dimensionality {
        self.dimensionality
    }

    /// Drops every agent. The next tick does not move anything.
    pub fn reset(&mut self) {
        self.agents.clear();
        self.primed = false;
    }

    /// Reconciles the agent set with `model`: known nodes keep their agent,
    /// new nodes spawn along the x axis, vanished nodes lose theirs. A
    /// dimensionality change rebuilds every agent from its old position.
    ///
    /// New agents take spawn slots after the surviving ones, in model order,
    /// so a node added by a later reload never lands on slot 0 next to an
    /// agent that is still near the origin.
    pub fn rebuild_agents(&mut self, model: &GraphModel, dimensionality: Dimensionality) {
        let switching = dimensionality != self.dimensionality;
        let mut previous = std::mem::take(&mut self.agents);
        let surviving = model
            .node_ids()
            .filter(|id| previous.contains_key(*id))
            .count();
        let mut spawned = 0usize;
        let mut reused = 0usize;

        for id in model.node_ids() {
            let agent = match previous.remove(id) {
                Some(agent) if !switching => {
                    reused += 1;
                    agent
                }
                Some(old) => {
                    reused += 1;
                    SteeringAgent::new(
                        id.clone(),
                        dimensionality.constrain(old.position()),
                        old.radius(),
                    )
                }
                None => {
                    let agent = SteeringAgent::new(
                        id.clone(),
                        self.spawn_position(id, surviving + spawned, dimensionality),
                        self.config.agent_radius,
                    );
                    spawned += 1;
                    agent
                }
            };
            self.agents.insert(id.clone(), agent);
        }

        self.dimensionality = dimensionality;
        self.rebuild_behaviors(model);

        debug!(
            agents = self.agents.len(),
            reused,
            spawned,
            discarded = previous.len(),
            ?dimensionality,
            switched = switching,
            "layout agents rebuilt"
        );
    }

    /// Incremental variant of [`Self::rebuild_agents`] for one node whose
    /// model entries were just reloaded. Positions of every other agent are
    /// left alone.
    pub fn rebuild_agent(&mut self, node: &NodeId, model: &GraphModel) {
        if !model.contains(node.as_str()) {
            if self.agents.remove(node).is_some() {
                self.rebuild_behaviors(model);
                debug!(node = %node, "layout agent discarded");
            }
            return;
        }

        if self.agents.contains_key(node) {
            let builder = BehaviorBuilder::new(&self.config);
            let behavior = builder.build(node, model.outgoing(node.as_str()), |target| {
                self.agents.contains_key(target)
            });
            if let Some(agent) = self.agents.get_mut(node) {
                agent.set_behavior(behavior);
            }
            debug!(node = %node, "layout agent behavior rebuilt");
            return;
        }

        let agent = SteeringAgent::new(
            node.clone(),
            self.spawn_position(node, self.agents.len(), self.dimensionality),
            self.config.agent_radius,
        );
        self.agents.insert(node.clone(), agent);
        self.rebuild_behaviors(model);
        debug!(node = %node, "layout agent spawned");
    }

    /// Slot `index` along x, nudged off the axis by a stable per-name offset
    /// so a fresh graph does not stay collinear. Slots count the agents that
    /// already exist when a rebuild starts, then the ones it has spawned.
    fn spawn_position(&self, id: &NodeId, index: usize, dimensionality: Dimensionality) -> Vec3 {
        let spacing = self.config.spawn_spacing;
        let (jy, jz) = stable_pair(id.as_str());
        dimensionality.constrain(vec3(
            index as f32 * spacing,
            jy * SPAWN_JITTER * spacing,
            jz * SPAWN_JITTER * spacing,
        ))
    }

    fn rebuild_behaviors(&mut self, model: &GraphModel) {
        let builder = BehaviorBuilder::new(&self.config);
        let behaviors = self
            .agents
            .keys()
            .map(|id| {
                builder.build(id, model.outgoing(id.as_str()), |target| {
                    self.agents.contains_key(target)
                })
            })
            .collect::<Vec<_>>();

        for (agent, behavior) in self.agents.values_mut().zip(behaviors) {
            agent.set_behavior(behavior);
        }
    }

    /// Advances every agent by `dt` seconds from the previous tick's
    /// positions. Returns whether anything moved.
    pub fn tick(&mut self, dt: f32) -> bool {
        let dt = if !self.primed {
            self.primed = true;
            0.0
        } else if dt.is_finite() && dt > 0.0 {
            dt
        } else {
            0.0
        };

        if dt == 0.0 || self.agents.is_empty() {
            return false;
        }

        let mut steering = std::mem::take(&mut self.steering_scratch);
        steering.clear();
        {
            let snapshot = Snapshot::capture(self.agents.values());
            steering.extend(
                self.agents
                    .values()
                    .map(|agent| agent.steering(&snapshot, &self.config, self.dimensionality)),
            );
        }

        let mut any_motion = false;
        for (agent, force) in self.agents.values_mut().zip(steering.iter()) {
            agent.integrate(*force, dt, &self.config, self.dimensionality);
            if agent.velocity().length_squared() > MOTION_EPSILON_SQ {
                any_motion = true;
            }
        }

        self.steering_scratch = steering;
        any_motion
    }

    pub fn agent(&self, node: &str) -> Option<&SteeringAgent> {
        self.agents.get(node)
    }

    pub fn position(&self, node: &str) -> Option<Vec3> {
        self.agents.get(node).map(SteeringAgent::position)
    }

    pub fn agents(&self) -> impl Iterator<Item = &SteeringAgent> {
        self.agents.values()
    }

    pub fn positions(&self) -> BTreeMap<NodeId, Vec3> {
        self.agents
            .iter()
            .map(|(id, agent)| (id.clone(), agent.position()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
