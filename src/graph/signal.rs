use super::model::{NodeAppearance, NodeId};

/// Transient marker traveling from one node to another. Purely visual.
#[derive(Clone, Debug, PartialEq)]
pub struct VisualSignal {
    pub source: NodeId,
    pub target: NodeId,
    pub appearance: NodeAppearance,
    elapsed: f32,
}

impl VisualSignal {
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Fraction of the trip done, in `[0, 1]`.
    pub fn progress(&self, duration: f32) -> f32 {
        if duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / duration).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Default)]
pub struct SignalQueue {
    signals: Vec<VisualSignal>,
}

impl SignalQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, source: NodeId, target: NodeId, appearance: NodeAppearance) {
        self.signals.push(VisualSignal {
            source,
            target,
            appearance,
            elapsed: 0.0,
        });
    }

    /// Moves every signal forward and drops the ones that arrived.
    pub fn advance(&mut self, dt: f32, duration: f32) {
        for signal in &mut self.signals {
            signal.elapsed += dt.max(0.0);
        }
        self.signals.retain(|signal| signal.elapsed < duration);
    }

    pub fn retain_endpoints<F>(&mut self, mut is_live: F)
    where
        F: FnMut(&NodeId) -> bool,
    {
        self.signals
            .retain(|signal| is_live(&signal.source) && is_live(&signal.target));
    }

    pub fn iter(&self) -> impl Iterator<Item = &VisualSignal> {
        self.signals.iter()
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    pub fn clear(&mut self) {
        self.signals.clear();
    }
}
