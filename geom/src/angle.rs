use std::fmt;

use serde::{Deserialize, Serialize};

use crate::trim_f64;

/// An angle in degrees, following CARLA's yaw convention.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Angle(f64);

impl Angle {
    pub const ZERO: Angle = Angle(0.0);

    pub fn degrees(value: f64) -> Angle {
        if !value.is_finite() {
            panic!("Bad Angle {}", value);
        }
        Angle(value)
    }

    pub fn inner_degrees(self) -> f64 {
        self.0
    }

    /// Mapped into [0, 360).
    pub fn normalized_degrees(self) -> f64 {
        self.0.rem_euclid(360.0)
    }

    /// Rounded to 1 decimal place, the precision stored in route files.
    pub fn rounded(self) -> Angle {
        Angle(trim_f64(self.0, 1))
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}
