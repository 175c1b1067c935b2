use serde::{Deserialize, Serialize};

use geom::{Angle, Pt3D};

use crate::{LaneKind, LanePosition};

/// The kinds of scenario attributes the catalog can ask for. `Value` covers
/// both numeric and free-text payloads; the wire format doesn't distinguish
/// them.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum AttrKind {
    Value,
    Bool,
    Interval,
    Choice,
    /// Picked on the map, constrained to one lane kind; optionally carries a
    /// probability.
    Location { lane: LaneKind, probability: bool },
    Transform,
}

/// A typed scenario attribute value. A closed set with exhaustive matches
/// everywhere, instead of kind strings inspected by substring.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AttrValue {
    Number(f64),
    Text(String),
    Bool(bool),
    Interval { from: f64, to: f64 },
    Choice(String),
    Location { pt: Pt3D, probability: Option<f64> },
    Transform { pt: Pt3D, yaw: Angle },
}

impl AttrValue {
    /// True for the attribute kinds that get picked on the map after the
    /// attribute dialog closes.
    pub fn is_location_or_transform(&self) -> bool {
        matches!(
            self,
            AttrValue::Location { .. } | AttrValue::Transform { .. }
        )
    }
}

/// A named attribute of a scenario, serialized as one child element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioAttribute {
    pub name: String,
    pub value: AttrValue,
}

impl ScenarioAttribute {
    pub fn new(name: &str, value: AttrValue) -> ScenarioAttribute {
        ScenarioAttribute {
            name: name.to_string(),
            value,
        }
    }
}

/// A parametrized event (an obstacle, a crossing pedestrian, ...) anchored to
/// a trigger point along a route.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// `"{type}_{n}"`, with `n` counting scenarios of the same type at
    /// creation time. Assigned once and never renumbered, so removals can
    /// leave gaps.
    pub name: String,
    pub scenario_type: String,
    pub trigger: LanePosition,
    pub attributes: Vec<ScenarioAttribute>,
}
