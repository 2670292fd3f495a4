use core_types::{Location, LocationId};
use net::Reading;

pub fn location(id: LocationId, name: &str) -> Location {
    Location {
        id,
        name: name.to_string(),
        country: "Portugal".to_string(),
        latitude: 38.0 + id as f64,
        longitude: -9.0,
        timezone: "Europe/Lisbon".to_string(),
        formatted_name: format!("{name}, Portugal"),
    }
}

pub fn reading(temperature_c: f64, apparent_c: f64, is_day: bool) -> Reading {
    Reading {
        temperature_c,
        apparent_c,
        is_day,
    }
}

/// Let spawned local tasks run until they park again.
pub async fn drain() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
