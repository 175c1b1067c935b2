//! The data-model core of a route and scenario authoring tool for the CARLA
//! simulator: routes of sparse waypoints with a planner-derived dense path,
//! parametrized scenarios anchored along them, and whole-file XML
//! persistence.
//!
//! The simulator itself stays behind the [`MapService`] trait. Everything
//! here runs synchronously on the caller's thread; while a service call for
//! one route is outstanding, the caller must not issue another mutating
//! operation on that route.

#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod catalog;
mod manager;
mod planner;
mod records;
mod route;
mod scenario;
#[cfg(test)]
mod testmap;
mod weather;
mod xml;

pub use crate::catalog::{all_scenario_types, attribute_specs, AttributeSpec};
pub use crate::manager::RouteManager;
pub use crate::planner::{ConnectError, LaneKind, LanePosition, MapService};
pub use crate::records::RouteRecord;
pub use crate::route::{Route, RouteID};
pub use crate::scenario::{AttrKind, AttrValue, Scenario, ScenarioAttribute};
pub use crate::weather::{RouteWeather, WeatherKeyframe, WeatherState};
pub use crate::xml::{parse_routes, read_routes_file, write_routes, write_routes_file};

use geom::Distance;

/// Clicking within this distance of an existing waypoint or scenario trigger
/// removes it instead of adding a new one.
pub const MAX_REMOVAL_DISTANCE: Distance = Distance::const_meters(10.0);

/// The file extension of the route-collection format.
pub const ROUTES_EXTENSION: &str = ".xml";
