use readiness::Readiness;

use crate::types::{Attribute, Node};

/// Attributes and children of a component, taken at emission time.
#[derive(Clone, Debug, Default)]
pub struct ElementSnapshot {
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
}

impl ElementSnapshot {
    pub fn new(attributes: Vec<Attribute>, children: Vec<Node>) -> Self {
        Self {
            attributes,
            children,
        }
    }
}

/// A node implementation is broken. Never a timing condition.
#[derive(Debug, thiserror::Error)]
pub enum MarkupError {
    #[error("<{tag}> could not produce markup: {reason}")]
    Broken { tag: String, reason: String },
    #[error("<{tag}> state is already borrowed")]
    Busy { tag: String },
}

/// A stateful element in the tree.
///
/// The serializer first waits on `readiness` (bounded by its timeout), then
/// calls `snapshot` exactly once for the pass. `None` means the node has no
/// readiness contract and is emitted without suspending.
pub trait Component {
    fn tag_name(&self) -> &str;

    fn readiness(&self) -> Option<Readiness> {
        None
    }

    fn snapshot(&self) -> Result<ElementSnapshot, MarkupError>;
}
