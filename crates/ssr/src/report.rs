use std::time::Duration;

/// How a component's readiness wait ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadinessOutcome {
    /// No readiness contract, or already ready; nothing was awaited.
    Immediate,
    Ready,
    TimedOut,
    /// The signal was abandoned before it resolved.
    Failed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeReport {
    pub tag: String,
    pub outcome: ReadinessOutcome,
    pub waited: Duration,
}

/// Per-component outcomes of one render pass, in emission order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub nodes: Vec<NodeReport>,
}

impl RenderReport {
    pub fn push(&mut self, tag: &str, outcome: ReadinessOutcome, waited: Duration) {
        self.nodes.push(NodeReport {
            tag: tag.to_string(),
            outcome,
            waited,
        });
    }

    pub fn outcome_for(&self, tag: &str) -> Option<ReadinessOutcome> {
        self.nodes.iter().find(|n| n.tag == tag).map(|n| n.outcome)
    }

    pub fn timed_out(&self) -> impl Iterator<Item = &NodeReport> {
        self.nodes
            .iter()
            .filter(|n| n.outcome == ReadinessOutcome::TimedOut)
    }
}
