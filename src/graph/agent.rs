use std::collections::BTreeMap;

use glam::Vec3;

use super::config::LayoutConfig;
use super::math::{clamp_length, fallback_direction, flatten, try_direction};
use super::model::NodeId;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Dimensionality {
    Planar,
    #[default]
    Spatial,
}

impl Dimensionality {
    pub fn is_planar(self) -> bool {
        self == Self::Planar
    }

    /// Keeps planar vectors in the z = 0 plane.
    pub fn constrain(self, vector: Vec3) -> Vec3 {
        match self {
            Self::Planar => flatten(vector),
            Self::Spatial => vector,
        }
    }
}

/// One steering influence. Every goal produces a steering vector no longer
/// than 1. `Separate` moves away from every other agent closer than
/// `max_distance`.
#[derive(Clone, Debug, PartialEq)]
pub enum Goal {
    Separate { max_distance: f32 },
    ReachSpeed { speed: f32 },
    SeekPoint { target: Vec3 },
    SeekAgent { target: NodeId },
}

impl Goal {
    fn steer(
        &self,
        agent: &SteeringAgent,
        snapshot: &Snapshot<'_>,
        config: &LayoutConfig,
        dimensionality: Dimensionality,
    ) -> Vec3 {
        match self {
            Self::Separate { max_distance } => {
                separation(agent, snapshot, *max_distance, dimensionality)
            }
            Self::ReachSpeed { speed } => {
                let Some(heading) = try_direction(agent.velocity) else {
                    return Vec3::ZERO;
                };
                let error = (speed - agent.velocity.length()) / config.max_speed.max(f32::EPSILON);
                heading * error.clamp(-1.0, 1.0)
            }
            Self::SeekPoint { target } => seek(agent, *target, config),
            Self::SeekAgent { target } => snapshot
                .position(target.as_str())
                .map_or(Vec3::ZERO, |position| seek(agent, position, config)),
        }
    }
}

fn seek(agent: &SteeringAgent, target: Vec3, config: &LayoutConfig) -> Vec3 {
    let Some(direction) = try_direction(target - agent.position) else {
        return Vec3::ZERO;
    };
    let max_speed = config.max_speed.max(f32::EPSILON);
    let desired = direction * max_speed;
    clamp_length((desired - agent.velocity) / max_speed, 1.0)
}

fn separation(
    agent: &SteeringAgent,
    snapshot: &Snapshot<'_>,
    max_distance: f32,
    dimensionality: Dimensionality,
) -> Vec3 {
    let mut push = Vec3::ZERO;
    for (name, other) in snapshot.iter() {
        if name == agent.id.as_str() {
            continue;
        }

        let reach = max_distance.max(agent.radius + other.radius);
        if reach <= 0.0 {
            continue;
        }

        let delta = dimensionality.constrain(agent.position - other.position);
        let distance = delta.length();
        if distance >= reach {
            continue;
        }

        let direction = try_direction(delta).unwrap_or_else(|| {
            fallback_direction(agent.id.as_str(), name, dimensionality.is_planar())
        });
        push += direction * (1.0 - distance / reach);
    }
    clamp_length(push, 1.0)
}

/// Weighted goal set of one agent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Behavior {
    goals: Vec<(Goal, f32)>,
}

impl Behavior {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, goal: Goal, weight: f32) {
        self.goals.push((goal, weight));
    }

    pub fn goals(&self) -> &[(Goal, f32)] {
        &self.goals
    }

    pub fn weight_of(&self, goal: &Goal) -> Option<f32> {
        self.goals
            .iter()
            .find(|(candidate, _)| candidate == goal)
            .map(|(_, weight)| *weight)
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentState {
    pub position: Vec3,
    pub radius: f32,
}

/// Agent positions as of the end of the previous tick. Every agent steers
/// against the same snapshot, so the update order inside a tick is irrelevant.
#[derive(Debug, Default)]
pub struct Snapshot<'a> {
    states: BTreeMap<&'a str, AgentState>,
}

impl<'a> Snapshot<'a> {
    pub fn capture<I>(agents: I) -> Self
    where
        I: IntoIterator<Item = &'a SteeringAgent>,
    {
        let states = agents
            .into_iter()
            .map(|agent| {
                (
                    agent.id.as_str(),
                    AgentState {
                        position: agent.position,
                        radius: agent.radius,
                    },
                )
            })
            .collect();
        Self { states }
    }

    pub fn position(&self, name: &str) -> Option<Vec3> {
        self.states.get(name).map(|state| state.position)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &AgentState)> {
        self.states.iter().map(|(name, state)| (*name, state))
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// Kinetic state of one node.
#[derive(Clone, Debug)]
pub struct SteeringAgent {
    id: NodeId,
    position: Vec3,
    velocity: Vec3,
    radius: f32,
    behavior: Behavior,
}

impl SteeringAgent {
    pub fn new(id: NodeId, position: Vec3, radius: f32) -> Self {
        Self {
            id,
            position,
            velocity: Vec3::ZERO,
            radius,
            behavior: Behavior::new(),
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn behavior(&self) -> &Behavior {
        &self.behavior
    }

    pub fn set_behavior(&mut self, behavior: Behavior) {
        self.behavior = behavior;
    }

    /// Weighted sum of every goal, normalized by the total absolute weight.
    pub fn steering(
        &self,
        snapshot: &Snapshot<'_>,
        config: &LayoutConfig,
        dimensionality: Dimensionality,
    ) -> Vec3 {
        let mut total = Vec3::ZERO;
        let mut total_weight = 0.0_f32;
        for (goal, weight) in self.behavior.goals() {
            total += goal.steer(self, snapshot, config, dimensionality) * *weight;
            total_weight += weight.abs();
        }

        if total_weight <= f32::EPSILON {
            return Vec3::ZERO;
        }
        dimensionality.constrain(total / total_weight)
    }

    /// Explicit Euler step. `dt == 0` leaves the agent untouched.
    pub fn integrate(
        &mut self,
        steering: Vec3,
        dt: f32,
        config: &LayoutConfig,
        dimensionality: Dimensionality,
    ) {
        if dt <= 0.0 {
            return;
        }

        let acceleration = steering * (config.max_acceleration / config.mass.max(f32::EPSILON));
        let damping = config.damping.clamp(0.0, 1.0).powf(dt * 60.0);
        let velocity = (self.velocity + acceleration * dt) * damping;
        let velocity = clamp_length(dimensionality.constrain(velocity), config.max_speed);

        if !velocity.is_finite() {
            self.velocity = Vec3::ZERO;
            return;
        }

        self.velocity = velocity;
        self.position = dimensionality.constrain(self.position + velocity * dt);
    }
}
