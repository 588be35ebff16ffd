use serde::{Deserialize, Serialize};

/// Steering constants. Weights are relative: each agent's combined steering is
/// normalized by the sum of its goal weights.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub separation_distance: f32,
    pub separation_weight: f32,
    pub idle_weight: f32,
    pub compaction_weight: f32,
    /// Applied to every outgoing link separately.
    pub link_weight: f32,
    pub agent_radius: f32,
    pub max_speed: f32,
    pub max_acceleration: f32,
    pub mass: f32,
    /// Velocity retained per 1/60 s.
    pub damping: f32,
    pub spawn_spacing: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            separation_distance: 10.0,
            separation_weight: 10.0,
            idle_weight: 1.0,
            compaction_weight: 2.0,
            link_weight: 0.4,
            agent_radius: 0.5,
            max_speed: 10.0,
            max_acceleration: 30.0,
            mass: 1.0,
            damping: 0.9,
            spawn_spacing: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Share of the link span taken by the arrow head.
    pub arrow_head_fraction: f32,
    /// Seconds a visual signal takes to cross its link.
    pub signal_duration: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            arrow_head_fraction: 0.1,
            signal_duration: 1.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_layout_section_keeps_defaults() {
        let config: LayoutConfig =
            serde_json::from_str(r#"{ "link_weight": 0.8 }"#).expect("valid layout json");
        assert_eq!(config.link_weight, 0.8);
        assert_eq!(config.separation_weight, 10.0);
        assert_eq!(config.compaction_weight, 2.0);
    }
}
