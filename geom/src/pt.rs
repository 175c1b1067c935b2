use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{trim_f64, Distance};

/// A point in CARLA world space, in meters. The Z axis points up.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pt3D {
    x: f64,
    y: f64,
    z: f64,
}

impl Pt3D {
    pub fn new(x: f64, y: f64, z: f64) -> Pt3D {
        if !x.is_finite() || !y.is_finite() || !z.is_finite() {
            panic!("Bad Pt3D ({}, {}, {})", x, y, z);
        }
        Pt3D { x, y, z }
    }

    pub fn x(self) -> f64 {
        self.x
    }

    pub fn y(self) -> f64 {
        self.y
    }

    pub fn z(self) -> f64 {
        self.z
    }

    /// Euclidean distance, using all three axes.
    pub fn dist_to(self, other: Pt3D) -> Distance {
        Distance::meters(
            ((self.x - other.x).powi(2) + (self.y - other.y).powi(2) + (self.z - other.z).powi(2))
                .sqrt(),
        )
    }

    /// Coordinates rounded to 1 decimal place, the precision stored in route
    /// files.
    pub fn rounded(self) -> Pt3D {
        Pt3D::new(
            trim_f64(self.x, 1),
            trim_f64(self.y, 1),
            trim_f64(self.z, 1),
        )
    }

    pub fn offset(self, dx: f64, dy: f64, dz: f64) -> Pt3D {
        Pt3D::new(self.x + dx, self.y + dy, self.z + dz)
    }
}

impl fmt::Display for Pt3D {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Pt3D({}, {}, {})", self.x, self.y, self.z)
    }
}
