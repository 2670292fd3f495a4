use std::cell::RefCell;
use std::rc::{Rc, Weak};

use core_types::Location;
use html::{Attribute, Component, ElementSnapshot, MarkupError, Node};

use crate::element::{Element, ElementInit, Mountable, parent_of};
use crate::markup;

pub const TAG: &str = "locations-list";

#[derive(Default)]
struct ListState {
    /// `None` until the first list arrives; pre-rendered children show until then.
    locations: Option<Vec<Location>>,
    prerendered: Vec<Node>,
}

/// Search results as a list of links. No asynchronous work of its own.
pub struct LocationsList {
    attributes: Vec<Attribute>,
    parent: Option<Weak<dyn Element>>,
    state: RefCell<ListState>,
}

impl LocationsList {
    pub fn new(init: ElementInit) -> Rc<Self> {
        Rc::new(Self {
            attributes: init.attributes,
            parent: init.parent,
            state: RefCell::new(ListState::default()),
        })
    }

    pub fn mountable(init: ElementInit) -> Mountable {
        Mountable::new(Self::new(init))
    }

    pub fn set_locations(&self, locations: Vec<Location>) {
        log::trace!(target: "components.list", "showing {} locations", locations.len());
        self.state.borrow_mut().locations = Some(locations);
    }

    pub fn locations(&self) -> Vec<Location> {
        self.state.borrow().locations.clone().unwrap_or_default()
    }
}

impl Component for LocationsList {
    fn tag_name(&self) -> &str {
        TAG
    }

    fn snapshot(&self) -> Result<ElementSnapshot, MarkupError> {
        let state = self.state.try_borrow().map_err(|_| MarkupError::Busy {
            tag: TAG.to_string(),
        })?;
        let children = match &state.locations {
            None if !state.prerendered.is_empty() => state.prerendered.clone(),
            None => vec![markup::location_list(&[])],
            Some(locations) => vec![markup::location_list(locations)],
        };
        Ok(ElementSnapshot::new(self.attributes.clone(), children))
    }
}

impl Element for LocationsList {
    fn parent(&self) -> Option<Rc<dyn Element>> {
        parent_of(&self.parent)
    }

    fn adopt_children(&self, children: Vec<Node>, _descendants: &[Mountable]) {
        self.state.borrow_mut().prerendered = children;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() -> ElementInit {
        ElementInit {
            attributes: vec![("class".to_string(), Some("results".to_string()))],
            parent: None,
        }
    }

    fn place(id: u64, formatted: &str) -> Location {
        Location {
            id,
            name: formatted.to_string(),
            country: String::new(),
            latitude: 0.0,
            longitude: 0.0,
            timezone: String::new(),
            formatted_name: formatted.to_string(),
        }
    }

    #[test]
    fn empty_list_renders_bare_ul() {
        let list = LocationsList::new(init());
        let snap = list.snapshot().unwrap();
        assert_eq!(snap.children.len(), 1);
        assert!(snap.children[0].is_element_named("ul"));
        assert!(snap.children[0].children().is_empty());
    }

    #[test]
    fn prerendered_children_survive_until_first_list() {
        let list = LocationsList::new(init());
        list.adopt_children(vec![Node::element("ul").with_child(Node::element("li"))], &[]);
        let snap = list.snapshot().unwrap();
        assert_eq!(snap.children[0].children().len(), 1);

        list.set_locations(vec![place(7, "Faro, Portugal"), place(8, "Fão, Portugal")]);
        let snap = list.snapshot().unwrap();
        let items = snap.children[0].children();
        assert_eq!(items.len(), 2);
        let link = &items[0].children()[0];
        assert_eq!(html::dom_utils::node_attr(link, "href"), Some("/?id=7"));
    }
}
