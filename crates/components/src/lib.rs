//! The weather page's stateful elements.
//!
//! Invariants:
//! - Every asynchronous fetch goes through the owning element's
//!   `Coalesced` node, so at most the newest result is ever applied.
//! - Events are handled synchronously. Anything that needs the network is
//!   spawned on the current `LocalSet` and reports back through its node.
//! - A disconnected element applies nothing and dispatches nothing.

mod config;
mod element;
mod location_search;
mod locations_list;
mod markup;
mod registry;
mod services;
mod weather_report;

pub use crate::config::ComponentConfig;
pub use crate::element::{Element, ElementInit, Mountable, dispatch};
pub use crate::location_search::LocationSearch;
pub use crate::locations_list::LocationsList;
pub use crate::registry::{Factory, MountContext, Mounted, Registry, RegistryError};
pub use crate::services::Services;
pub use crate::weather_report::WeatherReport;

pub use bus::{ClickTarget, ComponentEvent, Propagation};
