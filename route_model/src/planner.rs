use anyhow::Result;
use enumset::{EnumSet, EnumSetType};
use serde::{Deserialize, Serialize};

use geom::{Angle, Pt3D};

use crate::WeatherState;

/// Classification of drivable surface, used to constrain where a point may
/// snap to.
#[derive(EnumSetType, Debug, Serialize, Deserialize)]
pub enum LaneKind {
    Driving,
    Parking,
    Sidewalk,
    Biking,
}

/// A point on a lane, as produced by snapping: the lane-center location and
/// the lane direction there.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LanePosition {
    pub pt: Pt3D,
    pub yaw: Angle,
}

impl LanePosition {
    /// Rounded to the file format's 1-decimal precision, yaw included.
    pub fn rounded(self) -> LanePosition {
        LanePosition {
            pt: self.pt.rounded(),
            yaw: self.yaw.rounded(),
        }
    }
}

/// The map and route-planning capability of the simulator, as consumed by
/// the data model. The real implementation wraps a CARLA client and its
/// global route planner; tests substitute a fake, so no live simulator is
/// needed to exercise routes.
pub trait MapService {
    /// Switches to the named map. Lane data, traces, and weather reported
    /// afterwards refer to the new map.
    fn load_map(&mut self, name: &str) -> Result<()>;

    /// Projects `pt` onto the nearest lane of one of the requested kinds.
    fn snap_to_lane(&self, pt: Pt3D, kinds: EnumSet<LaneKind>) -> LanePosition;

    /// An ordered, possibly empty sequence of points forming a drivable path
    /// between two lane locations. Both endpoints should already be snapped.
    fn trace_dense_path(&self, from: Pt3D, to: Pt3D) -> Vec<Pt3D>;

    /// The current weather of the loaded map.
    fn current_weather(&self) -> WeatherState;
}

/// Why a simulator-backed `MapService` failed to start. Both cases are fatal;
/// the messages have to let the user tell them apart.
#[derive(thiserror::Error, Debug)]
pub enum ConnectError {
    #[error(
        "failed to connect to the simulator at {host}:{port}; make sure it is \
         running and the host and port are correct"
    )]
    SimulatorUnreachable { host: String, port: u16 },
    #[error("the map data directory {0} does not exist")]
    MapDataMissing(String),
}
