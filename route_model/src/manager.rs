use std::collections::BTreeMap;

use anyhow::Result;

use crate::{
    xml, MapService, Route, RouteID, RouteRecord, RouteWeather, WeatherState, ROUTES_EXTENSION,
};

/// Owns the route collection, the selection, and whole-file persistence.
///
/// One file holds routes for one map; the manager tracks that shared map
/// context plus the weather snapshot captured when the map was loaded, which
/// seeds the weather record of every newly added route.
pub struct RouteManager {
    routes: BTreeMap<RouteID, Route>,
    selected: Option<RouteID>,
    map_name: Option<String>,
    weather: Option<WeatherState>,
}

impl RouteManager {
    pub fn new() -> RouteManager {
        RouteManager {
            routes: BTreeMap::new(),
            selected: None,
            map_name: None,
            weather: None,
        }
    }

    /// Keyed by id; iteration order is ascending id, which is also the
    /// display order.
    pub fn routes(&self) -> &BTreeMap<RouteID, Route> {
        &self.routes
    }

    pub fn selected_id(&self) -> Option<RouteID> {
        self.selected
    }

    pub fn selected_route(&self) -> Option<&Route> {
        self.selected.and_then(|id| self.routes.get(&id))
    }

    pub fn selected_route_mut(&mut self) -> Option<&mut Route> {
        let id = self.selected?;
        self.routes.get_mut(&id)
    }

    pub fn select(&mut self, id: RouteID) {
        if self.routes.contains_key(&id) {
            self.selected = Some(id);
        } else {
            warn!("Can't select {}; it doesn't exist", id);
        }
    }

    pub fn map_name(&self) -> Option<&str> {
        self.map_name.as_deref()
    }

    /// Discards all routes, switches to `map_name`, and starts over with one
    /// empty route (id 0). Nothing changes if loading the map fails.
    pub fn reset_to_empty(&mut self, map: &mut dyn MapService, map_name: &str) -> Result<()> {
        map.load_map(map_name)?;

        self.routes.clear();
        self.selected = None;
        self.map_name = Some(map_name.to_string());
        self.weather = Some(map.current_weather());
        self.add_empty_route()?;
        Ok(())
    }

    /// Replaces the whole collection with the file's contents and selects the
    /// first parsed route. The map context comes from the first record;
    /// records naming other maps keep their own name, but get flagged.
    /// Errors before any state change if `path` isn't a route-collection
    /// file.
    pub fn load_from_file(&mut self, map: &mut dyn MapService, path: &str) -> Result<()> {
        if !path.ends_with(ROUTES_EXTENSION) {
            bail!("{} isn't a {} file; not loading it", path, ROUTES_EXTENSION);
        }
        let records = xml::read_routes_file(path)?;

        self.routes.clear();
        self.selected = None;

        for (idx, record) in records.into_iter().enumerate() {
            if idx == 0 {
                map.load_map(&record.town)?;
                self.map_name = Some(record.town.clone());
                self.weather = Some(map.current_weather());
            } else if self.map_name.as_deref() != Some(record.town.as_str()) {
                warn!(
                    "{} is on map {}, but this file started with {}; keeping both",
                    record.id,
                    record.town,
                    self.map_name.as_deref().unwrap_or("?")
                );
            }

            let id = record.id;
            self.routes.insert(id, record.into_route(map));
            if self.selected.is_none() {
                self.selected = Some(id);
            }
        }

        info!("Loaded {} routes from {}", self.routes.len(), path);
        Ok(())
    }

    /// Writes every route to `path`, silently appending the extension when
    /// it's absent.
    pub fn save_to_file(&self, path: &str) -> Result<()> {
        let path = if path.ends_with(ROUTES_EXTENSION) {
            path.to_string()
        } else {
            format!("{}{}", path, ROUTES_EXTENSION)
        };
        let records: Vec<RouteRecord> = self.routes.values().map(RouteRecord::from_route).collect();
        xml::write_routes_file(&path, &records)?;
        info!("Saved {} routes to {}", records.len(), path);
        Ok(())
    }

    /// Creates, inserts, and selects an empty route with the smallest unused
    /// id. Needs a map context; call `reset_to_empty` or `load_from_file`
    /// first.
    pub fn add_empty_route(&mut self) -> Result<RouteID> {
        let map_name = self
            .map_name
            .clone()
            .ok_or_else(|| anyhow!("no map loaded yet"))?;
        let weather = self.default_weather_record()?;

        let mut id = RouteID(0);
        while self.routes.contains_key(&id) {
            id.0 += 1;
        }
        self.routes.insert(id, Route::new(id, map_name, weather));
        self.selected = Some(id);
        Ok(id)
    }

    /// Removes the selected route and selects the lowest-id survivor. The UI
    /// refuses to remove the last remaining route; doing it here just leaves
    /// the collection empty with nothing selected.
    pub fn remove_selected_route(&mut self) {
        if let Some(id) = self.selected.take() {
            self.routes.remove(&id);
            self.selected = self.routes.keys().next().copied();
        }
    }

    /// The weather record given to new routes: the captured snapshot pinned
    /// at the start and end of the route.
    pub fn default_weather_record(&self) -> Result<RouteWeather> {
        let snapshot = self
            .weather
            .as_ref()
            .ok_or_else(|| anyhow!("no weather snapshot; load a map first"))?;
        Ok(RouteWeather::from_snapshot(snapshot))
    }
}

impl Default for RouteManager {
    fn default() -> RouteManager {
        RouteManager::new()
    }
}
