use glam::Vec3;

use super::agent::{Behavior, Goal};
use super::config::LayoutConfig;
use super::model::NodeId;

/// Builds the goal set of one node from the live agent set and the node's
/// outgoing links.
pub struct BehaviorBuilder<'a> {
    config: &'a LayoutConfig,
}

impl<'a> BehaviorBuilder<'a> {
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self { config }
    }

    pub fn build<'n, L, F>(&self, node: &NodeId, links: L, has_agent: F) -> Behavior
    where
        L: IntoIterator<Item = &'n NodeId>,
        F: Fn(&NodeId) -> bool,
    {
        let config = self.config;
        let mut behavior = Behavior::new();
        behavior.push(
            Goal::Separate {
                max_distance: config.separation_distance,
            },
            config.separation_weight,
        );
        behavior.push(Goal::ReachSpeed { speed: 0.0 }, config.idle_weight);
        behavior.push(
            Goal::SeekPoint { target: Vec3::ZERO },
            config.compaction_weight,
        );

        for target in links {
            if target == node || !has_agent(target) {
                continue;
            }
            behavior.push(
                Goal::SeekAgent {
                    target: target.clone(),
                },
                config.link_weight,
            );
        }

        behavior
    }
}
