mod support;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use components::{
    ComponentEvent, Element, ElementInit, Mountable, Propagation, Registry, RegistryError,
};
use core_types::PageParams;
use html::{Component, ElementSnapshot, MarkupError, Node};

use support::Harness;

/// Records lifecycle calls and bubbles everything.
struct Recorder {
    tag: &'static str,
    parent: Option<Weak<dyn Element>>,
    log: Rc<RefCell<Vec<String>>>,
    children: Cell<usize>,
}

impl Component for Recorder {
    fn tag_name(&self) -> &str {
        self.tag
    }

    fn snapshot(&self) -> Result<ElementSnapshot, MarkupError> {
        Ok(ElementSnapshot::default())
    }
}

impl Element for Recorder {
    fn parent(&self) -> Option<Rc<dyn Element>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    fn adopt_children(&self, children: Vec<Node>, _descendants: &[Mountable]) {
        self.children.set(children.len());
    }

    fn connected(&self) {
        self.log.borrow_mut().push(format!("connect {}", self.tag));
    }

    fn disconnected(&self) {
        self.log.borrow_mut().push(format!("disconnect {}", self.tag));
    }

    fn handle_event(&self, event: &ComponentEvent) -> Propagation {
        self.log
            .borrow_mut()
            .push(format!("{} at {}", event.kind(), self.tag));
        Propagation::Continue
    }
}

fn recorder_factory(
    tag: &'static str,
    log: &Rc<RefCell<Vec<String>>>,
) -> impl Fn(&components::MountContext, ElementInit) -> Mountable + 'static {
    let log = Rc::clone(log);
    move |_: &components::MountContext, init: ElementInit| {
        Mountable::new(Rc::new(Recorder {
            tag,
            parent: init.parent,
            log: Rc::clone(&log),
            children: Cell::new(0),
        }))
    }
}

#[test]
fn define_rejects_duplicates_and_invalid_names() {
    let h = Harness::new();
    let mut registry = h.registry(PageParams::default());
    let log = Rc::new(RefCell::new(Vec::new()));

    assert_eq!(
        registry.define("get-weather", recorder_factory("get-weather", &log)),
        Err(RegistryError::AlreadyDefined("get-weather".into()))
    );
    assert_eq!(
        registry.define("recorder", recorder_factory("recorder", &log)),
        Err(RegistryError::InvalidName("recorder".into()))
    );
    assert!(registry.define("x-recorder", recorder_factory("x-recorder", &log)).is_ok());
    assert!(registry.is_defined("x-recorder"));
}

#[test]
fn mount_connects_in_document_order_and_bubbles_to_ancestors() {
    let h = Harness::new();
    let mut registry = Registry::new(components::MountContext::new(
        h.services(),
        PageParams::default(),
    ));
    let log = Rc::new(RefCell::new(Vec::new()));
    registry.define("x-outer", recorder_factory("x-outer", &log)).unwrap();
    registry.define("x-inner", recorder_factory("x-inner", &log)).unwrap();

    let tree = Node::element("main").with_child(
        Node::element("X-OUTER")
            .with_child(Node::element("section").with_child(Node::element("x-inner")))
            .with_child(Node::text("tail")),
    );
    let mut mounted = registry.mount(tree);
    assert_eq!(mounted.elements().len(), 2);
    assert_eq!(
        mounted.get::<Recorder>().map(|p| p.children.get()),
        Some(2),
        "outer adopted its section and text"
    );

    mounted.dispatch(
        "x-inner",
        &ComponentEvent::Input {
            value: "abc".into(),
        },
    );
    mounted.detach();
    mounted.detach();

    assert_eq!(
        *log.borrow(),
        vec![
            "connect x-outer",
            "connect x-inner",
            "input at x-inner",
            "input at x-outer",
            "disconnect x-inner",
            "disconnect x-outer",
        ]
    );
    assert!(mounted.dispatch("x-missing", &ComponentEvent::Input { value: String::new() }).is_none());
}

#[test]
fn dropping_the_mounted_tree_disconnects() {
    let h = Harness::new();
    let mut registry = h.registry(PageParams::default());
    let log = Rc::new(RefCell::new(Vec::new()));
    registry.define("x-recorder", recorder_factory("x-recorder", &log)).unwrap();

    let mounted = registry.mount(Node::element("x-recorder"));
    assert!(matches!(mounted.root(), Node::Component(_)));
    drop(mounted);
    assert_eq!(*log.borrow(), vec!["connect x-recorder", "disconnect x-recorder"]);
}
