use std::cell::Cell;
use std::rc::{Rc, Weak};

use bus::{ClickTarget, ComponentEvent, Propagation};
use core_types::{Location, LocationId, ParamsQuery, PageParams, TemperatureUnit, Weather};
use html::{Attribute, Component, ElementSnapshot, MarkupError, Node, Readiness, dom_utils, traverse};
use net::{FetchError, LocationQuery, WeatherQuery};
use readiness::{Coalesced, OperationRecord};

use crate::element::{Element, ElementInit, Mountable, parent_of};
use crate::markup;
use crate::registry::MountContext;

pub const TAG: &str = "get-weather";
const TARGET: &str = "components.weather";

struct WeatherState {
    attributes: Vec<Attribute>,
    children: Vec<Node>,
    weather: Option<Weather>,
    last_location: Option<Location>,
    last_unit: TemperatureUnit,
}

enum Target {
    Location(Location),
    Id(LocationId),
}

fn is_results(node: &Node) -> bool {
    dom_utils::has_attr(node.attributes(), "data-results")
}

/// Current conditions for whatever location its descendants report.
///
/// Readiness is the first result: once one fetch has settled the element is
/// final for the render, even while newer fetches are outstanding.
pub struct WeatherReport {
    parent: Option<Weak<dyn Element>>,
    node: Coalesced<WeatherState>,
    ctx: MountContext,
    prerendered: Cell<bool>,
}

impl WeatherReport {
    pub fn new(ctx: &MountContext, init: ElementInit) -> Rc<Self> {
        Rc::new(Self {
            parent: init.parent,
            node: Coalesced::new(
                TAG,
                WeatherState {
                    attributes: init.attributes,
                    children: Vec::new(),
                    weather: None,
                    last_location: None,
                    last_unit: ctx.params.unit_or_default(),
                },
            ),
            ctx: ctx.clone(),
            prerendered: Cell::new(false),
        })
    }

    pub fn mountable(ctx: &MountContext, init: ElementInit) -> Mountable {
        Mountable::new(Self::new(ctx, init))
    }

    pub fn weather(&self) -> Option<Weather> {
        self.node.with(|s| s.weather.clone())
    }

    pub fn is_fetching(&self) -> bool {
        self.node.pending() > 0
    }

    pub fn history(&self) -> Vec<OperationRecord> {
        self.node.history()
    }

    fn last(&self) -> (Option<Location>, TemperatureUnit) {
        self.node.with(|s| (s.last_location.clone(), s.last_unit))
    }

    fn get_weather(&self, target: Target, unit: TemperatureUnit) {
        let locations = self.ctx.services.locations.clone();
        let weather = self.ctx.services.weather.clone();
        let op = async move {
            let location = match target {
                Target::Location(location) => location,
                Target::Id(id) => locations
                    .fetch(LocationQuery::Id(id))
                    .await?
                    .into_iter()
                    .next()
                    .ok_or_else(|| FetchError::NotFound(format!("location {id}")))?,
            };
            let current = weather.fetch(WeatherQuery { location, unit }).await?;
            Ok::<Weather, FetchError>(current)
        };
        let tag = self.node.spawn(op, |s, weather: Weather| {
            s.last_location = Some(weather.location.clone());
            s.last_unit = weather.unit;
            s.weather = Some(weather);
        });
        log::debug!(target: TARGET, "weather request {tag} in {unit}");
    }

    fn on_params_change(&self, params: &PageParams) -> Propagation {
        let unit = params.unit_or_default();
        let (last_location, last_unit) = self.last();
        match params.id_value() {
            Some(id) => {
                if last_location.map(|l| l.id) != Some(id) || last_unit != unit {
                    self.get_weather(Target::Id(id), unit);
                }
            }
            None => match last_location {
                Some(location) if location.is_ad_hoc() && last_unit != unit => {
                    self.get_weather(Target::Location(location), unit);
                }
                _ => self.node.mark_ready(),
            },
        }
        Propagation::Stop
    }
}

impl Component for WeatherReport {
    fn tag_name(&self) -> &str {
        TAG
    }

    fn readiness(&self) -> Option<Readiness> {
        Some(self.node.readiness())
    }

    fn snapshot(&self) -> Result<ElementSnapshot, MarkupError> {
        let fetching = self.is_fetching();
        self.node
            .try_with(|s| {
                let mut attributes = s.attributes.clone();
                dom_utils::toggle_flag(&mut attributes, "fetching", fetching);
                let mut children = s.children.clone();
                if let Some(weather) = &s.weather {
                    let mode = if weather.is_day { "day" } else { "night" };
                    dom_utils::set_attr(&mut attributes, "mode", Some(mode.to_string()));
                    children.retain(|c| !is_results(c));
                    children.push(markup::current_conditions(weather));
                }
                ElementSnapshot::new(attributes, children)
            })
            .ok_or_else(|| MarkupError::Busy {
                tag: TAG.to_string(),
            })
    }
}

impl Element for WeatherReport {
    fn parent(&self) -> Option<Rc<dyn Element>> {
        parent_of(&self.parent)
    }

    fn adopt_children(&self, children: Vec<Node>, _descendants: &[Mountable]) {
        let prerendered = children
            .iter()
            .any(|c| traverse::find_first(c, &is_results).is_some());
        self.prerendered.set(prerendered);
        self.node.with_mut(|s| s.children = children);
    }

    fn connected(&self) {
        if self.prerendered.get() {
            log::debug!(target: TARGET, "results already rendered, nothing to fetch");
            return;
        }
        match &self.ctx.params.query {
            Some(ParamsQuery::Id(id)) => {
                self.get_weather(Target::Id(*id), self.ctx.params.unit_or_default());
            }
            // The nested search reports back with a `Located` event.
            Some(ParamsQuery::Search(search)) if !search.is_empty() => self.node.arm(),
            _ => {}
        }
    }

    fn disconnected(&self) {
        self.node.detach();
    }

    fn handle_event(&self, event: &ComponentEvent) -> Propagation {
        match event {
            ComponentEvent::Located { location, unit } => {
                self.get_weather(Target::Location(location.clone()), *unit);
                Propagation::Stop
            }
            ComponentEvent::Click(ClickTarget::LocationLink(id)) => {
                let (_, unit) = self.last();
                self.get_weather(Target::Id(*id), unit);
                Propagation::Stop
            }
            ComponentEvent::Geo(position) => {
                let (_, unit) = self.last();
                self.get_weather(Target::Location(Location::from_position(position)), unit);
                Propagation::Stop
            }
            ComponentEvent::UnitChange { unit } => {
                match self.last() {
                    (Some(location), last_unit) if last_unit != *unit => {
                        self.get_weather(Target::Location(location), *unit);
                    }
                    _ => {}
                }
                Propagation::Stop
            }
            ComponentEvent::ParamsChange(params) => self.on_params_change(params),
            ComponentEvent::Submit { .. }
            | ComponentEvent::Input { .. }
            | ComponentEvent::Click(ClickTarget::GeoButton) => {
                log::warn!(target: TARGET, "no handler for {}", event.kind());
                Propagation::Continue
            }
        }
    }
}
