use std::rc::Rc;

use net::{GeoFetch, LocationFetch, MemoryCatalog, WeatherFetch};

/// Data capabilities handed to every element at mount time.
#[derive(Clone)]
pub struct Services {
    pub locations: LocationFetch,
    pub weather: WeatherFetch,
    pub geolocation: Option<GeoFetch>,
}

impl Services {
    pub fn new(locations: LocationFetch, weather: WeatherFetch) -> Self {
        Self {
            locations,
            weather,
            geolocation: None,
        }
    }

    pub fn with_geolocation(mut self, geolocation: GeoFetch) -> Self {
        self.geolocation = Some(geolocation);
        self
    }

    pub fn from_catalog(catalog: MemoryCatalog) -> Self {
        let catalog = Rc::new(catalog);
        Self {
            locations: catalog.clone(),
            weather: catalog.clone(),
            geolocation: Some(catalog),
        }
    }
}
