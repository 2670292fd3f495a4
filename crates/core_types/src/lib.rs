use std::fmt;

/// Per-node operation counter. `0` means "nothing issued yet".
pub type Generation = u64;
pub type LocationId = u64;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "celsius",
            TemperatureUnit::Fahrenheit => "fahrenheit",
        }
    }

    /// Anything that is not exactly `fahrenheit` falls back to celsius.
    pub fn parse(value: &str) -> Self {
        if value == "fahrenheit" {
            TemperatureUnit::Fahrenheit
        } else {
            TemperatureUnit::Celsius
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "ºC",
            TemperatureUnit::Fahrenheit => "ºF",
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    pub formatted_name: String,
}

impl Location {
    /// Ad hoc location for a device position; id `0` marks it as not coming
    /// from the geocoding catalog.
    pub fn from_position(pos: &GeoPosition) -> Self {
        Self {
            id: 0,
            name: pos.name.clone(),
            country: String::new(),
            latitude: pos.latitude,
            longitude: pos.longitude,
            timezone: String::new(),
            formatted_name: pos.name.clone(),
        }
    }

    pub fn is_ad_hoc(&self) -> bool {
        self.id == 0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GeoPosition {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Weather {
    pub location: Location,
    pub unit: TemperatureUnit,
    pub temperature: f64,
    pub apparent_temperature: f64,
    pub is_day: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamsQuery {
    Search(String),
    Id(LocationId),
}

/// Page parameters as already decoded by the hosting layer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageParams {
    pub query: Option<ParamsQuery>,
    pub unit: Option<TemperatureUnit>,
}

impl PageParams {
    pub fn search(search: impl Into<String>) -> Self {
        Self {
            query: Some(ParamsQuery::Search(search.into())),
            unit: None,
        }
    }

    pub fn id(id: LocationId) -> Self {
        Self {
            query: Some(ParamsQuery::Id(id)),
            unit: None,
        }
    }

    pub fn with_unit(mut self, unit: TemperatureUnit) -> Self {
        self.unit = Some(unit);
        self
    }

    pub fn search_value(&self) -> Option<&str> {
        match &self.query {
            Some(ParamsQuery::Search(s)) if !s.is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn id_value(&self) -> Option<LocationId> {
        match self.query {
            Some(ParamsQuery::Id(id)) => Some(id),
            _ => None,
        }
    }

    pub fn unit_or_default(&self) -> TemperatureUnit {
        self.unit.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_units_fall_back_to_celsius() {
        assert_eq!(TemperatureUnit::parse("fahrenheit"), TemperatureUnit::Fahrenheit);
        assert_eq!(TemperatureUnit::parse("kelvin"), TemperatureUnit::Celsius);
        assert_eq!(TemperatureUnit::parse(""), TemperatureUnit::Celsius);
    }

    #[test]
    fn empty_search_is_not_a_search() {
        let params = PageParams::search("");
        assert_eq!(params.search_value(), None);
        assert_eq!(params.id_value(), None);
        assert_eq!(PageParams::id(7).id_value(), Some(7));
    }
}
