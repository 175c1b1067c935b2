use std::fmt;

use enumset::EnumSet;
use serde::{Deserialize, Serialize};

use geom::{Distance, FindClosest, Pt3D};

use crate::{
    LaneKind, MapService, RouteWeather, Scenario, ScenarioAttribute, MAX_REMOVAL_DISTANCE,
};

/// Identifies one route within a `RouteManager`. Persisted in the file
/// format.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct RouteID(pub usize);

impl fmt::Display for RouteID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Route #{}", self.0)
    }
}

/// One route: user-placed sparse waypoints, the dense path the planner
/// interpolates between them, and the scenarios anchored along it.
///
/// `dense_waypoints` and `route_length` are derived state, never edited
/// directly; every waypoint mutation re-derives them. The dense path is empty
/// exactly when there are no waypoints, and otherwise starts at the first
/// waypoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Route {
    pub id: RouteID,
    pub map_name: String,
    pub weather: RouteWeather,
    waypoints: Vec<Pt3D>,
    scenarios: Vec<Scenario>,
    dense_waypoints: Vec<Pt3D>,
    route_length: Distance,
    max_removal_distance: Distance,
}

impl Route {
    /// An empty route. The caller provides the weather record; see
    /// `RouteManager::default_weather_record`.
    pub fn new(id: RouteID, map_name: String, weather: RouteWeather) -> Route {
        Route {
            id,
            map_name,
            weather,
            waypoints: Vec::new(),
            scenarios: Vec::new(),
            dense_waypoints: Vec::new(),
            route_length: Distance::ZERO,
            max_removal_distance: MAX_REMOVAL_DISTANCE,
        }
    }

    /// A route rebuilt from persisted parts. The dense path is re-derived
    /// through the planner, so the route's map must already be loaded.
    pub fn from_parts(
        id: RouteID,
        map_name: String,
        weather: RouteWeather,
        waypoints: Vec<Pt3D>,
        scenarios: Vec<Scenario>,
        map: &dyn MapService,
    ) -> Route {
        let mut route = Route::new(id, map_name, weather);
        route.waypoints = waypoints;
        route.scenarios = scenarios;
        route.update_dense_route(map);
        route
    }

    pub fn waypoints(&self) -> &[Pt3D] {
        &self.waypoints
    }

    pub fn dense_waypoints(&self) -> &[Pt3D] {
        &self.dense_waypoints
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn route_length(&self) -> Distance {
        self.route_length
    }

    /// Toggles a waypoint near `pt`: if an existing waypoint lies strictly
    /// within the removal threshold of the snapped location, the closest one
    /// is removed; otherwise the snapped location is appended, rounded to the
    /// file format's 1-decimal precision. The dense path is recomputed either
    /// way.
    ///
    /// Only the first waypoint may snap to a parking lane, so that a route
    /// can start from a parking spot.
    pub fn add_or_remove_waypoint(&mut self, map: &dyn MapService, pt: Pt3D) {
        let kinds = if self.waypoints.is_empty() {
            LaneKind::Driving | LaneKind::Parking
        } else {
            EnumSet::only(LaneKind::Driving)
        };
        let snapped = map.snap_to_lane(pt, kinds).pt;

        let mut closest = FindClosest::new();
        for (idx, wp) in self.waypoints.iter().enumerate() {
            closest.add(idx, *wp);
        }
        if let Some((idx, _, _)) = closest.closest_within(snapped, self.max_removal_distance) {
            self.waypoints.remove(idx);
        } else {
            self.waypoints.push(snapped.rounded());
        }

        self.update_dense_route(map);
    }

    /// Rebuilds the dense path from scratch: for each consecutive waypoint
    /// pair, both ends snap to the driving lane and the planner traces the
    /// path between them. Traces are concatenated as returned; a shared
    /// endpoint between segments repeats, which doesn't affect the length
    /// sum.
    pub fn update_dense_route(&mut self, map: &dyn MapService) {
        self.dense_waypoints.clear();
        self.route_length = Distance::ZERO;

        if let Some(first) = self.waypoints.first() {
            self.dense_waypoints.push(*first);
        }
        for pair in self.waypoints.windows(2) {
            let trace = self.interpolate_trace(map, pair[0], pair[1]);
            self.dense_waypoints.extend(trace);
        }

        if self.dense_waypoints.len() > 1 {
            self.route_length = self
                .dense_waypoints
                .windows(2)
                .map(|pair| pair[0].dist_to(pair[1]))
                .sum();
        }
    }

    /// The would-be dense continuation from the last waypoint to `to`, for a
    /// live preview while the cursor moves. Doesn't mutate the route; empty
    /// when there are no waypoints yet.
    pub fn interpolate_from_last_waypoint(&self, map: &dyn MapService, to: Pt3D) -> Vec<Pt3D> {
        match self.waypoints.last() {
            Some(last) => self.interpolate_trace(map, *last, to),
            None => Vec::new(),
        }
    }

    fn interpolate_trace(&self, map: &dyn MapService, from: Pt3D, to: Pt3D) -> Vec<Pt3D> {
        let from = map.snap_to_lane(from, EnumSet::only(LaneKind::Driving)).pt;
        let to = map.snap_to_lane(to, EnumSet::only(LaneKind::Driving)).pt;
        map.trace_dense_path(from, to)
    }

    /// Appends a scenario triggered near `pt`, unconditionally; callers use
    /// `can_add_scenario` and `should_remove_scenario` to decide whether to
    /// call this at all. The name is `"{type}_{n}"` with `n` counting
    /// scenarios of the same type already on the route.
    pub fn add_scenario(
        &mut self,
        map: &dyn MapService,
        pt: Pt3D,
        scenario_type: &str,
        attributes: Vec<ScenarioAttribute>,
    ) {
        let trigger = map
            .snap_to_lane(pt, LaneKind::Driving | LaneKind::Parking)
            .rounded();
        let n = self
            .scenarios
            .iter()
            .filter(|s| s.scenario_type == scenario_type)
            .count();
        self.scenarios.push(Scenario {
            name: format!("{}_{}", scenario_type, n),
            scenario_type: scenario_type.to_string(),
            trigger,
            attributes,
        });
    }

    /// Removes the scenario whose trigger is closest to the snapped location,
    /// lowest index winning exact ties. Does nothing if the route has no
    /// scenarios; `should_remove_scenario` is the caller's guard.
    pub fn remove_scenario(&mut self, map: &dyn MapService, pt: Pt3D) {
        let snapped = map
            .snap_to_lane(pt, LaneKind::Driving | LaneKind::Parking)
            .pt;
        match self.closest_scenario(snapped) {
            Some((idx, _)) => {
                let gone = self.scenarios.remove(idx);
                info!("Removed {} from {}", gone.name, self.id);
            }
            None => {
                warn!("{} has no scenarios to remove", self.id);
            }
        }
    }

    /// True when some scenario's trigger lies strictly within the removal
    /// threshold of the snapped location.
    pub fn should_remove_scenario(&self, map: &dyn MapService, pt: Pt3D) -> bool {
        let snapped = map
            .snap_to_lane(pt, LaneKind::Driving | LaneKind::Parking)
            .pt;
        match self.closest_scenario(snapped) {
            Some((_, dist)) => dist < self.max_removal_distance,
            None => false,
        }
    }

    /// Scenarios may only be placed near the route's own dense path. Always
    /// false while the dense path is empty.
    pub fn can_add_scenario(&self, map: &dyn MapService, pt: Pt3D) -> bool {
        if self.dense_waypoints.is_empty() {
            return false;
        }
        let snapped = map
            .snap_to_lane(pt, LaneKind::Driving | LaneKind::Parking)
            .pt;

        let mut closest = FindClosest::new();
        for (idx, dense_pt) in self.dense_waypoints.iter().enumerate() {
            closest.add(idx, *dense_pt);
        }
        closest
            .closest_within(snapped, self.max_removal_distance)
            .is_some()
    }

    /// Appends the location/transform attributes picked on the map after the
    /// attribute dialog, to the scenario added most recently.
    ///
    /// Panics on any other attribute kind, or when no scenario exists; both
    /// are bugs in the calling flow, not user errors.
    pub fn attach_location_attributes(&mut self, attrs: Vec<ScenarioAttribute>) {
        let scenario = self
            .scenarios
            .last_mut()
            .expect("no scenario to attach location attributes to");
        for attr in attrs {
            if !attr.value.is_location_or_transform() {
                panic!("unsupported attribute kind for {:?}", attr.name);
            }
            scenario.attributes.push(attr);
        }
    }

    fn closest_scenario(&self, pt: Pt3D) -> Option<(usize, Distance)> {
        let mut closest = FindClosest::new();
        for (idx, scenario) in self.scenarios.iter().enumerate() {
            closest.add(idx, scenario.trigger.pt);
        }
        closest.closest(pt).map(|(idx, _, dist)| (idx, dist))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testmap::TestMap;
    use crate::AttrValue;

    fn empty_route() -> Route {
        Route::new(RouteID(0), "Town12".to_string(), RouteWeather::default())
    }

    #[test]
    fn waypoint_toggles() {
        let map = TestMap::new();
        let mut route = empty_route();
        let click = Pt3D::new(40.0, 3.0, 0.0);

        route.add_or_remove_waypoint(&map, click);
        assert_eq!(route.waypoints(), &[Pt3D::new(40.0, 0.0, 0.0)]);

        // A second click at the same spot removes it, a third re-adds it.
        route.add_or_remove_waypoint(&map, click);
        assert!(route.waypoints().is_empty());
        assert!(route.dense_waypoints().is_empty());
        assert_eq!(route.route_length(), Distance::ZERO);

        route.add_or_remove_waypoint(&map, click);
        assert_eq!(route.waypoints(), &[Pt3D::new(40.0, 0.0, 0.0)]);
    }

    #[test]
    fn removal_threshold_is_strict() {
        let map = TestMap::new();
        let mut route = empty_route();

        route.add_or_remove_waypoint(&map, Pt3D::new(0.0, 0.0, 0.0));
        // Exactly at the threshold: added, not removed.
        route.add_or_remove_waypoint(&map, Pt3D::new(10.0, 0.0, 0.0));
        assert_eq!(route.waypoints().len(), 2);
        // Strictly inside it: removes the closer waypoint.
        route.add_or_remove_waypoint(&map, Pt3D::new(14.0, 0.0, 0.0));
        assert_eq!(route.waypoints(), &[Pt3D::new(0.0, 0.0, 0.0)]);
    }

    #[test]
    fn only_the_first_waypoint_may_snap_to_parking() {
        let map = TestMap::new();
        let mut route = empty_route();

        // Clicks near the parking row. The first lands on it; the second is
        // forced back onto the driving lane.
        route.add_or_remove_waypoint(&map, Pt3D::new(0.0, 60.0, 0.0));
        route.add_or_remove_waypoint(&map, Pt3D::new(30.0, 60.0, 0.0));

        let masks = map.snap_masks();
        assert!(masks[0].contains(LaneKind::Parking));
        assert!(!masks[1].contains(LaneKind::Parking));
        assert_eq!(route.waypoints()[0], Pt3D::new(0.0, 60.0, 0.0));
        assert_eq!(route.waypoints()[1], Pt3D::new(30.0, 0.0, 0.0));
    }

    #[test]
    fn dense_route_is_deterministic() {
        let map = TestMap::new();
        let mut route = empty_route();
        route.add_or_remove_waypoint(&map, Pt3D::new(0.0, 0.0, 0.0));
        route.add_or_remove_waypoint(&map, Pt3D::new(50.0, 0.0, 0.0));

        let dense = route.dense_waypoints().to_vec();
        let length = route.route_length();
        route.update_dense_route(&map);
        assert_eq!(route.dense_waypoints(), dense.as_slice());
        assert_eq!(route.route_length(), length);
    }

    #[test]
    fn route_length_sums_dense_segments() {
        let map = TestMap::new();
        let mut route = empty_route();

        route.add_or_remove_waypoint(&map, Pt3D::new(0.0, 0.0, 0.0));
        assert_eq!(route.dense_waypoints().len(), 1);
        assert_eq!(route.route_length(), Distance::ZERO);

        route.add_or_remove_waypoint(&map, Pt3D::new(50.0, 0.0, 0.0));
        let manual: Distance = route
            .dense_waypoints()
            .windows(2)
            .map(|pair| pair[0].dist_to(pair[1]))
            .sum();
        assert_eq!(route.route_length(), manual);
    }

    #[test]
    fn straight_road_end_to_end() {
        // 50 evenly spaced steps over a 100m straight road.
        let map = TestMap::with_trace_points(51);
        let mut route = empty_route();

        route.add_or_remove_waypoint(&map, Pt3D::new(0.0, 2.0, 0.0));
        route.add_or_remove_waypoint(&map, Pt3D::new(100.0, 2.0, 0.0));
        assert_eq!(route.dense_waypoints().len(), 1 + 51);
        assert!((route.route_length().inner_meters() - 100.0).abs() < 1e-6);

        // A click within the threshold of the second waypoint brings the
        // route back down to a single point.
        route.add_or_remove_waypoint(&map, Pt3D::new(95.0, 2.0, 0.0));
        assert_eq!(route.waypoints().len(), 1);
        assert_eq!(route.dense_waypoints().len(), 1);
        assert_eq!(route.route_length(), Distance::ZERO);
    }

    #[test]
    fn preview_does_not_mutate() {
        let map = TestMap::new();
        let mut route = empty_route();
        assert!(route
            .interpolate_from_last_waypoint(&map, Pt3D::new(50.0, 0.0, 0.0))
            .is_empty());

        route.add_or_remove_waypoint(&map, Pt3D::new(0.0, 0.0, 0.0));
        let preview = route.interpolate_from_last_waypoint(&map, Pt3D::new(50.0, 0.0, 0.0));
        assert!(!preview.is_empty());
        assert_eq!(route.dense_waypoints().len(), 1);
        assert_eq!(route.route_length(), Distance::ZERO);
    }

    #[test]
    fn scenario_names_count_per_type() {
        let map = TestMap::new();
        let mut route = empty_route();
        route.add_or_remove_waypoint(&map, Pt3D::new(0.0, 0.0, 0.0));
        route.add_or_remove_waypoint(&map, Pt3D::new(200.0, 0.0, 0.0));

        route.add_scenario(&map, Pt3D::new(20.0, 0.0, 0.0), "Accident", Vec::new());
        route.add_scenario(
            &map,
            Pt3D::new(60.0, 0.0, 0.0),
            "ConstructionObstacle",
            Vec::new(),
        );
        route.add_scenario(&map, Pt3D::new(100.0, 0.0, 0.0), "Accident", Vec::new());
        route.add_scenario(&map, Pt3D::new(140.0, 0.0, 0.0), "Accident", Vec::new());

        let names: Vec<&str> = route.scenarios().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Accident_0",
                "ConstructionObstacle_0",
                "Accident_1",
                "Accident_2"
            ]
        );
    }

    #[test]
    fn remove_scenario_picks_the_closest() {
        let map = TestMap::new();
        let mut route = empty_route();
        route.add_or_remove_waypoint(&map, Pt3D::new(0.0, 0.0, 0.0));
        route.add_or_remove_waypoint(&map, Pt3D::new(200.0, 0.0, 0.0));

        route.add_scenario(&map, Pt3D::new(0.0, 0.0, 0.0), "Accident", Vec::new());
        route.add_scenario(&map, Pt3D::new(50.0, 0.0, 0.0), "PedestrianCrossing", Vec::new());
        route.add_scenario(&map, Pt3D::new(100.0, 0.0, 0.0), "ControlLoss", Vec::new());

        assert!(route.should_remove_scenario(&map, Pt3D::new(52.0, 0.0, 0.0)));
        route.remove_scenario(&map, Pt3D::new(52.0, 0.0, 0.0));

        let names: Vec<&str> = route.scenarios().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Accident_0", "ControlLoss_0"]);
        // Nothing near the removed trigger anymore.
        assert!(!route.should_remove_scenario(&map, Pt3D::new(52.0, 0.0, 0.0)));
    }

    #[test]
    fn remove_scenario_breaks_ties_by_lowest_index() {
        let map = TestMap::new();
        let mut route = empty_route();
        route.add_or_remove_waypoint(&map, Pt3D::new(0.0, 0.0, 0.0));
        route.add_or_remove_waypoint(&map, Pt3D::new(100.0, 0.0, 0.0));

        // Two scenarios with identical triggers.
        route.add_scenario(&map, Pt3D::new(50.0, 0.0, 0.0), "Accident", Vec::new());
        route.add_scenario(&map, Pt3D::new(50.0, 0.0, 0.0), "ControlLoss", Vec::new());

        route.remove_scenario(&map, Pt3D::new(50.0, 0.0, 0.0));
        let names: Vec<&str> = route.scenarios().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["ControlLoss_0"]);
    }

    #[test]
    fn can_add_scenario_needs_a_dense_path() {
        let map = TestMap::new();
        let mut route = empty_route();
        assert!(!route.can_add_scenario(&map, Pt3D::new(0.0, 0.0, 0.0)));

        route.add_or_remove_waypoint(&map, Pt3D::new(0.0, 0.0, 0.0));
        route.add_or_remove_waypoint(&map, Pt3D::new(50.0, 0.0, 0.0));
        assert!(route.can_add_scenario(&map, Pt3D::new(25.0, 3.0, 0.0)));
        // Far off the path.
        assert!(!route.can_add_scenario(&map, Pt3D::new(500.0, 0.0, 0.0)));
    }

    #[test]
    fn attach_location_attributes_appends_to_the_last_scenario() {
        let map = TestMap::new();
        let mut route = empty_route();
        route.add_or_remove_waypoint(&map, Pt3D::new(0.0, 0.0, 0.0));
        route.add_or_remove_waypoint(&map, Pt3D::new(100.0, 0.0, 0.0));
        route.add_scenario(&map, Pt3D::new(50.0, 0.0, 0.0), "EnterActorFlow", Vec::new());

        route.attach_location_attributes(vec![
            ScenarioAttribute::new(
                "start_actor_flow",
                AttrValue::Location {
                    pt: Pt3D::new(10.0, 0.0, 0.0),
                    probability: None,
                },
            ),
            ScenarioAttribute::new(
                "end_actor_flow",
                AttrValue::Location {
                    pt: Pt3D::new(90.0, 0.0, 0.0),
                    probability: None,
                },
            ),
        ]);
        assert_eq!(route.scenarios()[0].attributes.len(), 2);
    }

    #[test]
    #[should_panic(expected = "unsupported attribute kind")]
    fn attach_rejects_other_kinds() {
        let map = TestMap::new();
        let mut route = empty_route();
        route.add_or_remove_waypoint(&map, Pt3D::new(0.0, 0.0, 0.0));
        route.add_or_remove_waypoint(&map, Pt3D::new(100.0, 0.0, 0.0));
        route.add_scenario(&map, Pt3D::new(50.0, 0.0, 0.0), "Accident", Vec::new());

        route.attach_location_attributes(vec![ScenarioAttribute::new(
            "distance",
            AttrValue::Number(120.0),
        )]);
    }
}
