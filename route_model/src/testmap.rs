//! A stand-in `MapService` for tests: one straight driving lane along the X
//! axis at y=0, plus a parking row at y=60 for queries that come close to it.

use std::cell::RefCell;

use anyhow::Result;
use enumset::EnumSet;

use geom::{Angle, Pt3D};

use crate::{LaneKind, LanePosition, MapService, WeatherState};

pub struct TestMap {
    /// How many evenly spaced points a trace returns, endpoints included.
    trace_points: usize,
    pub weather: WeatherState,
    loaded: RefCell<Vec<String>>,
    snap_masks: RefCell<Vec<EnumSet<LaneKind>>>,
}

impl TestMap {
    pub fn new() -> TestMap {
        TestMap::with_trace_points(11)
    }

    pub fn with_trace_points(trace_points: usize) -> TestMap {
        assert!(trace_points >= 2);
        TestMap {
            trace_points,
            weather: WeatherState::default(),
            loaded: RefCell::new(Vec::new()),
            snap_masks: RefCell::new(Vec::new()),
        }
    }

    /// The lane masks of every snap issued so far, in call order.
    pub fn snap_masks(&self) -> Vec<EnumSet<LaneKind>> {
        self.snap_masks.borrow().clone()
    }

    pub fn loaded_maps(&self) -> Vec<String> {
        self.loaded.borrow().clone()
    }
}

impl MapService for TestMap {
    fn load_map(&mut self, name: &str) -> Result<()> {
        self.loaded.borrow_mut().push(name.to_string());
        Ok(())
    }

    fn snap_to_lane(&self, pt: Pt3D, kinds: EnumSet<LaneKind>) -> LanePosition {
        self.snap_masks.borrow_mut().push(kinds);

        // Queries closer to the parking row than the road only land on it
        // when parking lanes are allowed.
        let pt = if kinds.contains(LaneKind::Parking) && pt.y() >= 50.0 {
            Pt3D::new(pt.x(), 60.0, 0.0)
        } else {
            Pt3D::new(pt.x(), 0.0, 0.0)
        };
        LanePosition {
            pt,
            yaw: Angle::ZERO,
        }
    }

    fn trace_dense_path(&self, from: Pt3D, to: Pt3D) -> Vec<Pt3D> {
        let n = self.trace_points;
        (0..n)
            .map(|i| {
                let t = (i as f64) / ((n - 1) as f64);
                Pt3D::new(
                    from.x() + t * (to.x() - from.x()),
                    from.y() + t * (to.y() - from.y()),
                    from.z() + t * (to.z() - from.z()),
                )
            })
            .collect()
    }

    fn current_weather(&self) -> WeatherState {
        self.weather
    }
}
