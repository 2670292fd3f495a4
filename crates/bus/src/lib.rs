use core_types::{GeoPosition, Location, LocationId, PageParams, TemperatureUnit};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickTarget {
    /// The "use my location" button.
    GeoButton,
    /// A link in the locations list.
    LocationLink(LocationId),
}

/// Everything a component can be told about. Events bubble from their target
/// through its ancestors until a handler stops them.
#[derive(Clone, Debug, PartialEq)]
pub enum ComponentEvent {
    // User input
    Submit {
        search: String,
    },
    Input {
        value: String,
    },
    UnitChange {
        unit: TemperatureUnit,
    },
    Click(ClickTarget),

    // Navigation
    ParamsChange(PageParams),

    // Component -> ancestors
    Geo(GeoPosition),
    Located {
        location: Location,
        unit: TemperatureUnit,
    },
}

impl ComponentEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            ComponentEvent::Submit { .. } => "submit",
            ComponentEvent::Input { .. } => "input",
            ComponentEvent::UnitChange { .. } => "change",
            ComponentEvent::Click(_) => "click",
            ComponentEvent::ParamsChange(_) => "paramschange",
            ComponentEvent::Geo(_) => "geo",
            ComponentEvent::Located { .. } => "loc",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    Stop,
}
