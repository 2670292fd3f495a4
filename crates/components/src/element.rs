use std::any::Any;
use std::rc::{Rc, Weak};

use bus::{ComponentEvent, Propagation};
use html::{Attribute, Component, Node};

const TARGET: &str = "components.events";

/// What the registry knows about an element before it exists.
pub struct ElementInit {
    pub attributes: Vec<Attribute>,
    pub parent: Option<Weak<dyn Element>>,
}

/// Lifecycle and event surface of a mounted component.
pub trait Element: Component {
    /// Nearest mounted ancestor, for bubbling.
    fn parent(&self) -> Option<Rc<dyn Element>>;

    /// Called once with the element's upgraded children. `descendants` are
    /// the components mounted inside them, in document order.
    fn adopt_children(&self, _children: Vec<Node>, _descendants: &[Mountable]) {}

    fn connected(&self) {}

    fn disconnected(&self) {}

    fn handle_event(&self, _event: &ComponentEvent) -> Propagation {
        Propagation::Continue
    }
}

pub(crate) fn parent_of(parent: &Option<Weak<dyn Element>>) -> Option<Rc<dyn Element>> {
    parent.as_ref().and_then(Weak::upgrade)
}

impl ElementInit {
    pub fn parent(&self) -> Option<Rc<dyn Element>> {
        parent_of(&self.parent)
    }
}

/// One element seen three ways: as a lifecycle target, as a tree node, and
/// as its concrete type.
#[derive(Clone)]
pub struct Mountable {
    element: Rc<dyn Element>,
    component: Rc<dyn Component>,
    any: Rc<dyn Any>,
}

impl Mountable {
    pub fn new<T: Element + 'static>(element: Rc<T>) -> Self {
        Self {
            element: element.clone(),
            component: element.clone(),
            any: element,
        }
    }

    pub fn element(&self) -> &Rc<dyn Element> {
        &self.element
    }

    pub fn tag_name(&self) -> &str {
        self.component.tag_name()
    }

    pub fn node(&self) -> Node {
        Node::Component(Rc::clone(&self.component))
    }

    pub fn downcast<T: 'static>(&self) -> Option<Rc<T>> {
        Rc::clone(&self.any).downcast::<T>().ok()
    }
}

/// Deliver `event` to `target`, then to each ancestor, until one stops it.
pub fn dispatch(target: Rc<dyn Element>, event: &ComponentEvent) -> Propagation {
    let mut current = Some(target);
    while let Some(element) = current {
        if element.handle_event(event) == Propagation::Stop {
            log::trace!(target: TARGET, "{} handled by <{}>", event.kind(), element.tag_name());
            return Propagation::Stop;
        }
        current = element.parent();
    }
    log::debug!(target: TARGET, "{} bubbled out without a handler", event.kind());
    Propagation::Continue
}
