use std::cell::RefCell;
use std::rc::Rc;

use html::{Attribute, Component, ElementSnapshot, MarkupError, Node, Readiness, dom_utils};
use readiness::ReadySignal;

#[derive(Default)]
struct StubState {
    attributes: Vec<Attribute>,
    children: Vec<Node>,
    signal: Option<ReadySignal>,
    abandoned: Option<Readiness>,
    broken: Option<String>,
    snapshots: usize,
}

/// Component whose state and readiness a test drives by hand.
pub struct StubComponent {
    tag: String,
    state: RefCell<StubState>,
}

impl StubComponent {
    /// No readiness contract.
    pub fn immediate(tag: &str) -> Rc<Self> {
        Rc::new(Self {
            tag: tag.to_string(),
            state: RefCell::new(StubState::default()),
        })
    }

    /// Readiness contract that stays pending until `resolve`.
    pub fn pending(tag: &str) -> Rc<Self> {
        let stub = Self::immediate(tag);
        stub.state.borrow_mut().signal = Some(ReadySignal::pending());
        stub
    }

    pub fn node(self: &Rc<Self>) -> Node {
        Node::Component(Rc::clone(self) as Rc<dyn Component>)
    }

    pub fn set_attr(&self, name: &str, value: Option<&str>) {
        let mut state = self.state.borrow_mut();
        dom_utils::set_attr(&mut state.attributes, name, value.map(str::to_string));
    }

    pub fn set_children(&self, children: Vec<Node>) {
        self.state.borrow_mut().children = children;
    }

    pub fn set_text(&self, text: &str) {
        self.set_children(vec![Node::text(text)]);
    }

    pub fn resolve(&self) {
        if let Some(signal) = &self.state.borrow().signal {
            signal.resolve();
        }
    }

    /// Drop the signal unresolved; waiters see an abandoned readiness.
    pub fn abandon(&self) {
        let mut state = self.state.borrow_mut();
        if let Some(signal) = state.signal.take() {
            state.abandoned = Some(signal.readiness());
        }
    }

    pub fn break_markup(&self, reason: &str) {
        self.state.borrow_mut().broken = Some(reason.to_string());
    }

    pub fn snapshots(&self) -> usize {
        self.state.borrow().snapshots
    }
}

impl Component for StubComponent {
    fn tag_name(&self) -> &str {
        &self.tag
    }

    fn readiness(&self) -> Option<Readiness> {
        let state = self.state.borrow();
        match (&state.signal, &state.abandoned) {
            (Some(signal), _) => Some(signal.readiness()),
            (None, Some(abandoned)) => Some(abandoned.clone()),
            (None, None) => None,
        }
    }

    fn snapshot(&self) -> Result<ElementSnapshot, MarkupError> {
        let mut state = self.state.try_borrow_mut().map_err(|_| MarkupError::Busy {
            tag: self.tag.clone(),
        })?;
        if let Some(reason) = &state.broken {
            return Err(MarkupError::Broken {
                tag: self.tag.clone(),
                reason: reason.clone(),
            });
        }
        state.snapshots += 1;
        Ok(ElementSnapshot::new(
            state.attributes.clone(),
            state.children.clone(),
        ))
    }
}
