use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use core_types::{GeoPosition, Location, LocationId, TemperatureUnit, Weather};
use futures::FutureExt;
use futures::future::LocalBoxFuture;

use crate::{Fetch, FetchError, LocationQuery, WeatherQuery};

const TARGET: &str = "net.memory";

/// Current conditions, always stored in celsius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    pub temperature_c: f64,
    pub apparent_c: f64,
    pub is_day: bool,
}

#[derive(Debug, Default)]
struct Catalog {
    locations: Vec<Location>,
    readings: HashMap<LocationId, Reading>,
    position: Option<GeoPosition>,
}

/// In-process stand-in for the geocoding and forecast services, with a fixed
/// simulated latency per request.
#[derive(Clone, Debug, Default)]
pub struct MemoryCatalog {
    catalog: Rc<Catalog>,
    latency: Duration,
}

impl MemoryCatalog {
    pub fn builder() -> MemoryCatalogBuilder {
        MemoryCatalogBuilder::default()
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    fn delayed<T: 'static>(
        &self,
        result: Result<T, FetchError>,
    ) -> LocalBoxFuture<'static, Result<T, FetchError>> {
        let latency = self.latency;
        async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            result
        }
        .boxed_local()
    }

    fn search(&self, needle: &str) -> Vec<Location> {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.catalog
            .locations
            .iter()
            .filter(|loc| loc.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    fn nearest_reading(&self, location: &Location) -> Option<Reading> {
        if let Some(reading) = self.catalog.readings.get(&location.id) {
            return Some(*reading);
        }
        // Ad hoc positions borrow the reading of the closest known place.
        self.catalog
            .locations
            .iter()
            .filter_map(|known| {
                let reading = self.catalog.readings.get(&known.id)?;
                let d = (known.latitude - location.latitude).powi(2)
                    + (known.longitude - location.longitude).powi(2);
                Some((d, *reading))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, reading)| reading)
    }
}

impl Fetch<LocationQuery> for MemoryCatalog {
    type Output = Vec<Location>;

    fn fetch(&self, query: LocationQuery) -> LocalBoxFuture<'static, Result<Vec<Location>, FetchError>> {
        log::debug!(target: TARGET, "locations {query:?}");
        let result = match &query {
            LocationQuery::Search(needle) => Ok(self.search(needle)),
            LocationQuery::Id(id) => self
                .catalog
                .locations
                .iter()
                .find(|loc| loc.id == *id)
                .map(|loc| vec![loc.clone()])
                .ok_or_else(|| FetchError::NotFound(format!("location {id}"))),
        };
        self.delayed(result)
    }
}

impl Fetch<WeatherQuery> for MemoryCatalog {
    type Output = Weather;

    fn fetch(&self, query: WeatherQuery) -> LocalBoxFuture<'static, Result<Weather, FetchError>> {
        log::debug!(target: TARGET, "weather for {} in {}", query.location.formatted_name, query.unit);
        let result = match self.nearest_reading(&query.location) {
            Some(reading) => Ok(Weather {
                unit: query.unit,
                temperature: convert(reading.temperature_c, query.unit),
                apparent_temperature: convert(reading.apparent_c, query.unit),
                is_day: reading.is_day,
                location: query.location,
            }),
            None => Err(FetchError::NotFound(format!(
                "weather for {}",
                query.location.formatted_name
            ))),
        };
        self.delayed(result)
    }
}

impl Fetch<()> for MemoryCatalog {
    type Output = Option<GeoPosition>;

    fn fetch(&self, _query: ()) -> LocalBoxFuture<'static, Result<Option<GeoPosition>, FetchError>> {
        self.delayed(Ok(self.catalog.position.clone()))
    }
}

fn convert(celsius: f64, unit: TemperatureUnit) -> f64 {
    let value = match unit {
        TemperatureUnit::Celsius => celsius,
        TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
    };
    (value * 10.0).round() / 10.0
}

#[derive(Debug, Default)]
pub struct MemoryCatalogBuilder {
    catalog: Catalog,
    latency: Duration,
}

impl MemoryCatalogBuilder {
    pub fn location(mut self, location: Location, reading: Option<Reading>) -> Self {
        if let Some(reading) = reading {
            self.catalog.readings.insert(location.id, reading);
        }
        self.catalog.locations.push(location);
        self
    }

    pub fn position(mut self, position: GeoPosition) -> Self {
        self.catalog.position = Some(position);
        self
    }

    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn build(self) -> MemoryCatalog {
        MemoryCatalog {
            catalog: Rc::new(self.catalog),
            latency: self.latency,
        }
    }
}
