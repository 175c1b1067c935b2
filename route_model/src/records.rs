use serde::{Deserialize, Serialize};

use geom::Pt3D;

use crate::{MapService, Route, RouteID, RouteWeather, Scenario};

/// The persisted form of one route: exactly what the file format stores,
/// none of the derived state. Turning a record back into a live [`Route`]
/// re-derives the dense path through the planner, which is why the
/// conversion needs a `MapService`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteRecord {
    pub id: RouteID,
    pub town: String,
    pub weather: RouteWeather,
    pub waypoints: Vec<Pt3D>,
    pub scenarios: Vec<Scenario>,
}

impl RouteRecord {
    pub fn from_route(route: &Route) -> RouteRecord {
        RouteRecord {
            id: route.id,
            town: route.map_name.clone(),
            weather: route.weather.clone(),
            waypoints: route.waypoints().to_vec(),
            scenarios: route.scenarios().to_vec(),
        }
    }

    /// The record's town must already be loaded in the service.
    pub fn into_route(self, map: &dyn MapService) -> Route {
        Route::from_parts(
            self.id,
            self.town,
            self.weather,
            self.waypoints,
            self.scenarios,
            map,
        )
    }
}
