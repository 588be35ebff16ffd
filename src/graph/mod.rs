//! Layout core: graph snapshot, steering agents and scene projection.

pub mod agent;
pub mod behavior;
pub mod config;
pub mod layout;
pub mod math;
pub mod model;
pub mod provider;
pub mod scene;
pub mod selection;
pub mod signal;
pub mod view;

pub use agent::{Behavior, Dimensionality, Goal, SteeringAgent};
pub use behavior::BehaviorBuilder;
pub use config::{LayoutConfig, SceneConfig};
pub use layout::LayoutEngine;
pub use model::{
    GraphModel, LineShape, LinkKey, LinkProperty, Metadata, NodeAppearance, NodeId, NodeShape, Rgba,
};
pub use provider::{DefaultPresentation, GraphDataSource, GraphPresentation, Provider};
pub use scene::{ArrowHead, LinkGeometry, LinkTransform, NodeTransform, Scene, SceneSynchronizer};
pub use selection::{GraphDelegate, NoopDelegate, SelectionController};
pub use signal::{SignalQueue, VisualSignal};
pub use view::GraphView;
