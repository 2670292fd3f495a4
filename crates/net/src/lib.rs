//! Data-fetch capability consumed by asynchronous components.
//!
//! Transport and payload shape belong to the hosting layer; components only
//! see an asynchronous, fallible `Fetch`.

use std::rc::Rc;

use core_types::{GeoPosition, Location, LocationId, TemperatureUnit, Weather};
use futures::future::LocalBoxFuture;

mod memory;

pub use memory::{MemoryCatalog, Reading};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("nothing found for {0}")]
    NotFound(String),
    #[error("upstream error: {0}")]
    Upstream(String),
    #[error("request was cancelled")]
    Cancelled,
}

pub trait Fetch<Q> {
    type Output;

    fn fetch(&self, query: Q) -> LocalBoxFuture<'static, Result<Self::Output, FetchError>>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LocationQuery {
    Search(String),
    Id(LocationId),
}

#[derive(Clone, Debug, PartialEq)]
pub struct WeatherQuery {
    pub location: Location,
    pub unit: TemperatureUnit,
}

pub type LocationFetch = Rc<dyn Fetch<LocationQuery, Output = Vec<Location>>>;
pub type WeatherFetch = Rc<dyn Fetch<WeatherQuery, Output = Weather>>;
/// Device position; `None` when the platform has no position to offer.
pub type GeoFetch = Rc<dyn Fetch<(), Output = Option<GeoPosition>>>;
