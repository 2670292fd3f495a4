use std::collections::HashMap;
use std::rc::{Rc, Weak};

use bus::{ComponentEvent, Propagation};
use core_types::PageParams;
use html::Node;

use crate::config::ComponentConfig;
use crate::element::{Element, ElementInit, Mountable, dispatch};
use crate::location_search::{self, LocationSearch};
use crate::locations_list::{self, LocationsList};
use crate::services::Services;
use crate::weather_report::{self, WeatherReport};

const TARGET: &str = "components.registry";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("<{0}> is already defined")]
    AlreadyDefined(String),
    #[error("{0:?} is not a valid custom element name")]
    InvalidName(String),
}

/// Per-render inputs shared by every element.
#[derive(Clone)]
pub struct MountContext {
    pub services: Services,
    pub params: PageParams,
    pub config: ComponentConfig,
}

impl MountContext {
    pub fn new(services: Services, params: PageParams) -> Self {
        Self {
            services,
            params,
            config: ComponentConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ComponentConfig) -> Self {
        self.config = config;
        self
    }
}

pub type Factory = Box<dyn Fn(&MountContext, ElementInit) -> Mountable>;

/// Tag name to factory map. Built per render; there is no global registry.
pub struct Registry {
    context: MountContext,
    factories: HashMap<String, Factory>,
}

fn is_valid_name(tag: &str) -> bool {
    tag.starts_with(|c: char| c.is_ascii_lowercase())
        && tag.contains('-')
        && tag
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '.' | '_'))
}

impl Registry {
    pub fn new(context: MountContext) -> Self {
        Self {
            context,
            factories: HashMap::new(),
        }
    }

    /// `get-weather`, `get-location` and `locations-list`.
    pub fn with_defaults(context: MountContext) -> Self {
        let mut registry = Self::new(context);
        registry
            .factories
            .insert(weather_report::TAG.to_string(), Box::new(WeatherReport::mountable));
        registry
            .factories
            .insert(location_search::TAG.to_string(), Box::new(LocationSearch::mountable));
        registry.factories.insert(
            locations_list::TAG.to_string(),
            Box::new(|_: &MountContext, init| LocationsList::mountable(init)),
        );
        registry
    }

    pub fn context(&self) -> &MountContext {
        &self.context
    }

    pub fn is_defined(&self, tag: &str) -> bool {
        self.factories.contains_key(tag)
    }

    pub fn define<F>(&mut self, tag: &str, factory: F) -> Result<(), RegistryError>
    where
        F: Fn(&MountContext, ElementInit) -> Mountable + 'static,
    {
        if !is_valid_name(tag) {
            return Err(RegistryError::InvalidName(tag.to_string()));
        }
        if self.factories.contains_key(tag) {
            return Err(RegistryError::AlreadyDefined(tag.to_string()));
        }
        self.factories.insert(tag.to_string(), Box::new(factory));
        Ok(())
    }

    /// Upgrade every defined element under `root`, then connect them in
    /// document order.
    pub fn mount(&self, root: Node) -> Mounted {
        let mut elements = Vec::new();
        let root = self.upgrade(root, None, &mut elements);
        for element in &elements {
            log::trace!(target: TARGET, "connecting <{}>", element.tag_name());
            element.element().connected();
        }
        log::debug!(target: TARGET, "mounted {} elements", elements.len());
        Mounted {
            root,
            elements,
            detached: false,
        }
    }

    fn upgrade_all(
        &self,
        children: Vec<Node>,
        parent: &Option<Weak<dyn Element>>,
        mounted: &mut Vec<Mountable>,
    ) -> Vec<Node> {
        children
            .into_iter()
            .map(|child| self.upgrade(child, parent.clone(), mounted))
            .collect()
    }

    fn upgrade(
        &self,
        node: Node,
        parent: Option<Weak<dyn Element>>,
        mounted: &mut Vec<Mountable>,
    ) -> Node {
        match node {
            Node::Element {
                name,
                attributes,
                children,
            } => {
                let Some(factory) = self.factories.get(&name.to_ascii_lowercase()) else {
                    let children = self.upgrade_all(children, &parent, mounted);
                    return Node::Element {
                        name,
                        attributes,
                        children,
                    };
                };
                let mountable = factory(&self.context, ElementInit { attributes, parent });
                let start = mounted.len() + 1;
                mounted.push(mountable.clone());

                let me = Some(Rc::downgrade(mountable.element()));
                let children = self.upgrade_all(children, &me, mounted);
                mountable
                    .element()
                    .adopt_children(children, &mounted[start..]);
                mountable.node()
            }
            Node::Document { children } => Node::Document {
                children: self.upgrade_all(children, &parent, mounted),
            },
            Node::Fragment { children } => Node::Fragment {
                children: self.upgrade_all(children, &parent, mounted),
            },
            other => other,
        }
    }
}

/// A mounted tree. Dropping it disconnects every element.
pub struct Mounted {
    root: Node,
    elements: Vec<Mountable>,
    detached: bool,
}

impl Mounted {
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Mounted elements in document order.
    pub fn elements(&self) -> &[Mountable] {
        &self.elements
    }

    pub fn find(&self, tag: &str) -> Option<&Mountable> {
        self.elements
            .iter()
            .find(|m| m.tag_name().eq_ignore_ascii_case(tag))
    }

    /// First mounted element of concrete type `T`.
    pub fn get<T: 'static>(&self) -> Option<Rc<T>> {
        self.elements.iter().find_map(Mountable::downcast::<T>)
    }

    /// Dispatch at the first element named `tag` and bubble from there.
    /// `None` when no such element is mounted.
    pub fn dispatch(&self, tag: &str, event: &ComponentEvent) -> Option<Propagation> {
        let target = Rc::clone(self.find(tag)?.element());
        Some(dispatch(target, event))
    }

    /// Deliver `event` to every element without bubbling (page-level events
    /// such as a params change).
    pub fn broadcast(&self, event: &ComponentEvent) {
        for element in &self.elements {
            element.element().handle_event(event);
        }
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    pub fn detach(&mut self) {
        if self.detached {
            return;
        }
        self.detached = true;
        for element in self.elements.iter().rev() {
            element.element().disconnected();
        }
        log::debug!(target: TARGET, "detached {} elements", self.elements.len());
    }
}

impl Drop for Mounted {
    fn drop(&mut self) {
        self.detach();
    }
}
