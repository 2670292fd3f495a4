use std::rc::Rc;

use components::{MountContext, Mounted, Registry, Services};
use core_types::{GeoPosition, Location, PageParams, TemperatureUnit, Weather};
use html::Node;
use html_test_support::ManualFetcher;
use net::{LocationQuery, WeatherQuery};

pub struct Harness {
    pub locations: Rc<ManualFetcher<LocationQuery, Vec<Location>>>,
    pub weather: Rc<ManualFetcher<WeatherQuery, Weather>>,
    pub geolocation: Rc<ManualFetcher<(), Option<GeoPosition>>>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            locations: Rc::new(ManualFetcher::new()),
            weather: Rc::new(ManualFetcher::new()),
            geolocation: Rc::new(ManualFetcher::new()),
        }
    }

    pub fn services(&self) -> Services {
        Services::new(self.locations.clone(), self.weather.clone())
            .with_geolocation(self.geolocation.clone())
    }

    pub fn registry(&self, params: PageParams) -> Registry {
        Registry::with_defaults(MountContext::new(self.services(), params))
    }

    /// `<get-weather><get-location></get-location></get-weather>` in a page.
    pub fn mount(&self, params: PageParams) -> Mounted {
        self.registry(params).mount(page(Vec::new()))
    }

    pub fn weather_queries(&self) -> Vec<(u64, TemperatureUnit)> {
        self.weather
            .queries()
            .into_iter()
            .map(|q| (q.location.id, q.unit))
            .collect()
    }
}

pub fn page(weather_children: Vec<Node>) -> Node {
    let weather = Node::element("get-weather")
        .with_child(Node::element("get-location"))
        .with_children(weather_children);
    Node::document([Node::element("html").with_child(
        Node::element("body")
            .with_child(weather)
            .with_child(Node::element("hr")),
    )])
}

pub fn conditions(location: &Location, unit: TemperatureUnit, temperature: f64) -> Weather {
    Weather {
        location: location.clone(),
        unit,
        temperature,
        apparent_temperature: temperature - 1.0,
        is_day: true,
    }
}
