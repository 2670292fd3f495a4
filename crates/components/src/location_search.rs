use std::cell::RefCell;
use std::rc::{Rc, Weak};

use bus::{ClickTarget, ComponentEvent, Propagation};
use core_types::{GeoPosition, Location, PageParams, TemperatureUnit};
use html::{Attribute, Component, ElementSnapshot, MarkupError, Node, Readiness, dom_utils, traverse};
use net::LocationQuery;
use readiness::{Coalesced, OperationRecord};
use tokio::task::JoinHandle;

use crate::element::{Element, ElementInit, Mountable, dispatch, parent_of};
use crate::locations_list::{self, LocationsList};
use crate::markup;
use crate::registry::MountContext;

pub const TAG: &str = "get-location";
const TARGET: &str = "components.location";

struct SearchState {
    attributes: Vec<Attribute>,
    search: String,
    unit: TemperatureUnit,
    last_searched: Option<String>,
    chosen: Option<Location>,
}

/// Location search form. Every search, typed or submitted, is a coalesced
/// operation; an applied result fills the list and reports its first match
/// to the ancestors as `Located`.
pub struct LocationSearch {
    me: Weak<LocationSearch>,
    parent: Option<Weak<dyn Element>>,
    node: Coalesced<SearchState>,
    list: RefCell<Option<Rc<LocationsList>>>,
    ctx: MountContext,
    debounce: RefCell<Option<JoinHandle<()>>>,
}

impl LocationSearch {
    pub fn new(ctx: &MountContext, init: ElementInit) -> Rc<Self> {
        Rc::new_cyclic(|me| Self {
            me: me.clone(),
            parent: init.parent,
            node: Coalesced::new(
                TAG,
                SearchState {
                    attributes: init.attributes,
                    search: String::new(),
                    unit: ctx.params.unit_or_default(),
                    last_searched: None,
                    chosen: None,
                },
            ),
            list: RefCell::new(None),
            ctx: ctx.clone(),
            debounce: RefCell::new(None),
        })
    }

    pub fn mountable(ctx: &MountContext, init: ElementInit) -> Mountable {
        Mountable::new(Self::new(ctx, init))
    }

    pub fn search_value(&self) -> String {
        self.node.with(|s| s.search.clone())
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.node.with(|s| s.unit)
    }

    pub fn is_fetching(&self) -> bool {
        self.node.pending() > 0
    }

    pub fn history(&self) -> Vec<OperationRecord> {
        self.node.history()
    }

    pub fn locations(&self) -> Vec<Location> {
        self.list().locations()
    }

    /// Cascades to the input and submit button; submits are ignored while set.
    pub fn set_disabled(&self, disabled: bool) {
        self.node
            .with_mut(|s| dom_utils::toggle_flag(&mut s.attributes, "disabled", disabled));
    }

    fn is_disabled(&self) -> bool {
        self.node.with(|s| dom_utils::has_attr(&s.attributes, "disabled"))
    }

    fn list(&self) -> Rc<LocationsList> {
        let mut slot = self.list.borrow_mut();
        let list = slot.get_or_insert_with(|| {
            let parent: Weak<dyn Element> = self.me.clone();
            LocationsList::new(ElementInit {
                attributes: Vec::new(),
                parent: Some(parent),
            })
        });
        Rc::clone(list)
    }

    fn emit(&self, event: ComponentEvent) {
        if let Some(me) = self.me.upgrade() {
            dispatch(me, &event);
        }
    }

    fn get_locations(&self, search: String) {
        log::debug!(target: TARGET, "searching for {search:?}");
        let unit = self.node.with_mut(|s| {
            s.search = search.clone();
            s.last_searched = Some(search.clone());
            s.unit
        });
        let me = self.me.clone();
        let fetch = self
            .ctx
            .services
            .locations
            .fetch(LocationQuery::Search(search.clone()));
        self.node.spawn_then(
            fetch,
            |s, locations: Vec<Location>| {
                s.chosen = locations.first().cloned();
                locations
            },
            move |locations| {
                let Some(this) = me.upgrade() else {
                    return;
                };
                let first = locations.first().cloned();
                this.list().set_locations(locations);
                match first {
                    Some(location) => this.emit(ComponentEvent::Located { location, unit }),
                    None => log::warn!(target: TARGET, "no location matches {search:?}"),
                }
            },
        );
    }

    fn on_submit(&self, search: &str) -> Propagation {
        if self.is_disabled() {
            log::warn!(target: TARGET, "submit while disabled, ignoring");
            return Propagation::Stop;
        }
        let search = search.trim();
        if !search.is_empty() {
            self.get_locations(search.to_string());
        }
        Propagation::Stop
    }

    fn on_input(&self, value: &str) -> Propagation {
        self.node.with_mut(|s| s.search = value.to_string());
        if let Some(previous) = self.debounce.borrow_mut().take() {
            previous.abort();
        }
        if value.chars().count() < self.ctx.config.min_search_len {
            return Propagation::Stop;
        }

        let me = self.me.clone();
        let delay = self.ctx.config.input_debounce;
        let abort = self.node.abort_signal();
        let handle = tokio::task::spawn_local(async move {
            let expired = tokio::select! {
                biased;
                _ = abort.aborted() => false,
                _ = tokio::time::sleep(delay) => true,
            };
            if !expired {
                return;
            }
            let Some(this) = me.upgrade() else {
                return;
            };
            let search = this.node.with(|s| {
                (s.last_searched.as_deref() != Some(s.search.as_str())).then(|| s.search.clone())
            });
            match search {
                Some(search) => this.get_locations(search),
                None => log::trace!(target: TARGET, "input matches last search, skipping"),
            }
        });
        *self.debounce.borrow_mut() = Some(handle);
        Propagation::Stop
    }

    fn on_unit_change(&self, unit: TemperatureUnit) -> Propagation {
        let (chosen, search) = self.node.with_mut(|s| {
            s.unit = unit;
            (s.chosen.clone(), s.search.clone())
        });
        match chosen {
            Some(location) => self.emit(ComponentEvent::Located { location, unit }),
            None if !search.is_empty() => self.get_locations(search),
            None => {}
        }
        Propagation::Stop
    }

    fn on_geo_click(&self) -> Propagation {
        let Some(geolocation) = self.ctx.services.geolocation.clone() else {
            log::warn!(target: TARGET, "no geolocation available");
            return Propagation::Stop;
        };
        let me = self.me.clone();
        self.node.spawn_then(
            geolocation.fetch(()),
            |s, position: Option<GeoPosition>| {
                if position.is_some() {
                    s.search.clear();
                    s.chosen = None;
                }
                position
            },
            move |position| {
                let (Some(position), Some(this)) = (position, me.upgrade()) else {
                    return;
                };
                this.list().set_locations(Vec::new());
                this.emit(ComponentEvent::Geo(position));
            },
        );
        Propagation::Stop
    }

    fn on_params_change(&self, params: &PageParams) -> Propagation {
        if let Some(search) = params.search_value() {
            let differs = self.node.with_mut(|s| {
                s.unit = params.unit_or_default();
                s.search != search
            });
            if differs {
                self.get_locations(search.to_string());
            }
        }
        Propagation::Continue
    }
}

impl Component for LocationSearch {
    fn tag_name(&self) -> &str {
        TAG
    }

    fn readiness(&self) -> Option<Readiness> {
        Some(self.node.readiness())
    }

    fn snapshot(&self) -> Result<ElementSnapshot, MarkupError> {
        let fetching = self.is_fetching();
        let geolocation = self.ctx.services.geolocation.is_some();
        let (mut attributes, form) = self
            .node
            .try_with(|s| {
                let disabled = dom_utils::has_attr(&s.attributes, "disabled");
                let form = markup::search_form(&s.search, s.unit, disabled, geolocation);
                (s.attributes.clone(), form)
            })
            .ok_or_else(|| MarkupError::Busy {
                tag: TAG.to_string(),
            })?;
        dom_utils::toggle_flag(&mut attributes, "fetching", fetching);
        let list: Rc<dyn Component> = self.list();
        Ok(ElementSnapshot::new(attributes, vec![form, Node::Component(list)]))
    }
}

impl Element for LocationSearch {
    fn parent(&self) -> Option<Rc<dyn Element>> {
        parent_of(&self.parent)
    }

    /// The form is always rebuilt from state. Pre-rendered markup only
    /// contributes its list element and the values its controls held.
    fn adopt_children(&self, children: Vec<Node>, descendants: &[Mountable]) {
        if let Some(list) = descendants.iter().find_map(|m| m.downcast::<LocationsList>()) {
            *self.list.borrow_mut() = Some(list);
        }
        let holder = Node::fragment(children);
        let value = traverse::find_first(&holder, &|n| {
            n.is_element_named("input") && dom_utils::node_attr(n, "name") == Some("search")
        })
        .and_then(|input| dom_utils::node_attr(input, "value"))
        .map(str::to_string);
        let unit = traverse::find_first(&holder, &|n| {
            n.is_element_named("option") && dom_utils::has_attr(n.attributes(), "selected")
        })
        .and_then(|option| dom_utils::node_attr(option, "value"))
        .map(TemperatureUnit::parse);
        self.node.with_mut(|s| {
            if let Some(value) = value {
                s.search = value;
            }
            if let Some(unit) = unit {
                s.unit = unit;
            }
        });
        if traverse::find_by_tag(&holder, locations_list::TAG).is_some() && self.list.borrow().is_none() {
            log::debug!(target: TARGET, "pre-rendered list was not upgraded, using a fresh one");
        }
    }

    fn connected(&self) {
        let params = &self.ctx.params;
        let Some(search) = params.search_value() else {
            return;
        };
        let differs = self.node.with(|s| s.search != search);
        if differs {
            let unit = params.unit_or_default();
            self.node.with_mut(|s| s.unit = unit);
            self.get_locations(search.to_string());
        }
    }

    fn disconnected(&self) {
        if let Some(debounce) = self.debounce.borrow_mut().take() {
            debounce.abort();
        }
        self.node.detach();
    }

    fn handle_event(&self, event: &ComponentEvent) -> Propagation {
        match event {
            ComponentEvent::Submit { search } => self.on_submit(search),
            ComponentEvent::Input { value } => self.on_input(value),
            ComponentEvent::UnitChange { unit } => self.on_unit_change(*unit),
            ComponentEvent::Click(ClickTarget::GeoButton) => self.on_geo_click(),
            ComponentEvent::Click(ClickTarget::LocationLink(_)) => {
                self.node.with_mut(|s| s.search.clear());
                self.list().set_locations(Vec::new());
                Propagation::Continue
            }
            ComponentEvent::ParamsChange(params) => self.on_params_change(params),
            ComponentEvent::Geo(_) | ComponentEvent::Located { .. } => Propagation::Continue,
        }
    }
}
