use serde::{Deserialize, Serialize};

use geom::trim_f64;

/// The CARLA weather coefficients the tool round-trips. Field names match
/// the simulator's weather parameters and the attribute names in the file
/// format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherState {
    pub cloudiness: f64,
    pub precipitation: f64,
    pub precipitation_deposits: f64,
    pub wetness: f64,
    pub wind_intensity: f64,
    pub sun_azimuth_angle: f64,
    pub sun_altitude_angle: f64,
    pub fog_density: f64,
    pub fog_distance: f64,
    pub fog_falloff: f64,
    pub scattering_intensity: f64,
    pub mie_scattering_scale: f64,
}

/// Weather at one point of route progress, from 0 (start of the route) to
/// 100 (end).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeatherKeyframe {
    pub route_percentage: f64,
    pub state: WeatherState,
}

/// A route's weather timeline. Normally two keyframes, the start and end of
/// the route; files carrying more are preserved as-is.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteWeather {
    pub keyframes: Vec<WeatherKeyframe>,
}

impl RouteWeather {
    /// The weather record for a freshly added route: the current snapshot
    /// pinned at 0% and 100% of route progress. `fog_falloff` and
    /// `mie_scattering_scale` are trimmed to 2 decimal places.
    pub fn from_snapshot(snapshot: &WeatherState) -> RouteWeather {
        let mut state = *snapshot;
        state.fog_falloff = trim_f64(state.fog_falloff, 2);
        state.mie_scattering_scale = trim_f64(state.mie_scattering_scale, 2);

        RouteWeather {
            keyframes: vec![
                WeatherKeyframe {
                    route_percentage: 0.0,
                    state,
                },
                WeatherKeyframe {
                    route_percentage: 100.0,
                    state,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_snapshot() {
        let snapshot = WeatherState {
            cloudiness: 80.0,
            fog_falloff: 0.123456,
            mie_scattering_scale: 0.0331,
            ..Default::default()
        };
        let weather = RouteWeather::from_snapshot(&snapshot);

        assert_eq!(weather.keyframes.len(), 2);
        assert_eq!(weather.keyframes[0].route_percentage, 0.0);
        assert_eq!(weather.keyframes[1].route_percentage, 100.0);
        for keyframe in &weather.keyframes {
            assert_eq!(keyframe.state.cloudiness, 80.0);
            assert_eq!(keyframe.state.fog_falloff, 0.12);
            assert_eq!(keyframe.state.mie_scattering_scale, 0.03);
        }
    }
}
