//! The scenario attribute catalog: which attributes each scenario type
//! expects, in dialog order, with the defaults the editor offers. This table
//! is part of the file format contract with the scenario runner; don't edit
//! entries without coordinating a format change.

use crate::{AttrKind, AttrValue, LaneKind};

/// One attribute a scenario type expects: its element name, kind, and the
/// default offered by the editing dialog (if any).
#[derive(Clone, Debug)]
pub struct AttributeSpec {
    pub name: &'static str,
    pub kind: AttrKind,
    pub default: Option<AttrValue>,
}

impl AttributeSpec {
    fn value(name: &'static str, default: f64) -> AttributeSpec {
        AttributeSpec {
            name,
            kind: AttrKind::Value,
            default: Some(AttrValue::Number(default)),
        }
    }

    fn value_no_default(name: &'static str) -> AttributeSpec {
        AttributeSpec {
            name,
            kind: AttrKind::Value,
            default: None,
        }
    }

    fn text(name: &'static str, default: &str) -> AttributeSpec {
        AttributeSpec {
            name,
            kind: AttrKind::Value,
            default: Some(AttrValue::Text(default.to_string())),
        }
    }

    fn boolean(name: &'static str) -> AttributeSpec {
        AttributeSpec {
            name,
            kind: AttrKind::Bool,
            default: None,
        }
    }

    fn interval(name: &'static str, from: f64, to: f64) -> AttributeSpec {
        AttributeSpec {
            name,
            kind: AttrKind::Interval,
            default: Some(AttrValue::Interval { from, to }),
        }
    }

    fn choice(name: &'static str) -> AttributeSpec {
        AttributeSpec {
            name,
            kind: AttrKind::Choice,
            default: None,
        }
    }

    fn location(name: &'static str, lane: LaneKind) -> AttributeSpec {
        AttributeSpec {
            name,
            kind: AttrKind::Location {
                lane,
                probability: false,
            },
            default: None,
        }
    }
}

// Shorthands for the entries repeated across many flow scenarios.
fn actor_flow_specs() -> Vec<AttributeSpec> {
    vec![
        AttributeSpec::location("start_actor_flow", LaneKind::Driving),
        AttributeSpec::location("end_actor_flow", LaneKind::Driving),
        AttributeSpec::value("flow_speed", 10.0),
        AttributeSpec::interval("source_dist_interval", 20.0, 50.0),
    ]
}

/// Every scenario type the editor offers, in catalog order.
pub fn all_scenario_types() -> Vec<&'static str> {
    vec![
        // Junction scenarios
        "SignalizedJunctionLeftTurn",
        "SignalizedJunctionRightTurn",
        "OppositeVehicleRunningRedLight",
        "NonSignalizedJunctionLeftTurn",
        "NonSignalizedJunctionRightTurn",
        "OppositeVehicleTakingPriority",
        // Crossing actors
        "DynamicObjectCrossing",
        "ParkingCrossingPedestrian",
        "PedestrianCrossing",
        "VehicleTurningRoute",
        "VehicleTurningRoutePedestrian",
        "BlockedIntersection",
        // Actor flows
        "EnterActorFlow",
        "EnterActorFlowV2",
        "InterurbanActorFlow",
        "InterurbanAdvancedActorFlow",
        "HighwayExit",
        "MergerIntoSlowTraffic",
        "MergerIntoSlowTrafficV2",
        "CrossingBicycleFlow",
        // Route obstacles
        "ConstructionObstacle",
        "ConstructionObstacleTwoWays",
        "Accident",
        "AccidentTwoWays",
        "ParkedObstacle",
        "ParkedObstacleTwoWays",
        "VehicleOpensDoorTwoWays",
        "HazardAtSideLane",
        "HazardAtSideLaneTwoWays",
        "InvadingTurn",
        // Cut ins
        "HighwayCutIn",
        "ParkingCutIn",
        "StaticCutIn",
        // Others
        "ControlLoss",
        "HardBreakRoute",
        "ParkingExit",
        "YieldToEmergencyVehicle",
        // Special ones
        "BackgroundActivityParametrizer",
        "PriorityAtJunction",
    ]
}

/// The attributes a scenario type expects, or None for an unknown type.
pub fn attribute_specs(scenario_type: &str) -> Option<Vec<AttributeSpec>> {
    let specs = match scenario_type {
        "SignalizedJunctionLeftTurn"
        | "SignalizedJunctionRightTurn"
        | "NonSignalizedJunctionLeftTurn"
        | "NonSignalizedJunctionRightTurn" => vec![
            AttributeSpec::value("flow_speed", 20.0),
            AttributeSpec::interval("source_dist_interval", 25.0, 50.0),
        ],
        "OppositeVehicleRunningRedLight" | "OppositeVehicleTakingPriority" => {
            vec![AttributeSpec::choice("direction")]
        }
        "DynamicObjectCrossing" => vec![
            AttributeSpec::value("distance", 12.0),
            // The scenario implementation only accepts a direction here, not
            // a free value
            AttributeSpec::choice("direction"),
            AttributeSpec::text("blocker_model", "static.prop.vendingmachine"),
            AttributeSpec::value("crossing_angle", 0.0),
        ],
        "ParkingCrossingPedestrian" => vec![
            AttributeSpec::value("distance", 12.0),
            AttributeSpec::choice("direction"),
            AttributeSpec::value("crossing_angle", 0.0),
        ],
        "PedestrianCrossing"
        | "VehicleTurningRoute"
        | "VehicleTurningRoutePedestrian"
        | "BlockedIntersection" => Vec::new(),
        "EnterActorFlow"
        | "EnterActorFlowV2"
        | "InterurbanActorFlow"
        | "InterurbanAdvancedActorFlow"
        | "HighwayExit"
        | "MergerIntoSlowTraffic"
        | "MergerIntoSlowTrafficV2" => actor_flow_specs(),
        "CrossingBicycleFlow" => vec![
            AttributeSpec::location("start_actor_flow", LaneKind::Biking),
            AttributeSpec::value("flow_speed", 10.0),
            AttributeSpec::interval("source_dist_interval", 20.0, 50.0),
        ],
        "ConstructionObstacle" => vec![
            AttributeSpec::value("distance", 100.0),
            AttributeSpec::choice("direction"),
            AttributeSpec::value("speed", 60.0),
        ],
        "ConstructionObstacleTwoWays" => vec![
            AttributeSpec::value("distance", 100.0),
            AttributeSpec::interval("frequency", 20.0, 100.0),
        ],
        "Accident" | "ParkedObstacle" => vec![
            AttributeSpec::value("distance", 120.0),
            AttributeSpec::choice("direction"),
            AttributeSpec::value("speed", 60.0),
        ],
        "AccidentTwoWays" | "ParkedObstacleTwoWays" => vec![
            AttributeSpec::value("distance", 120.0),
            AttributeSpec::interval("frequency", 20.0, 100.0),
        ],
        "VehicleOpensDoorTwoWays" => vec![
            AttributeSpec::value("distance", 50.0),
            AttributeSpec::interval("frequency", 20.0, 100.0),
        ],
        "HazardAtSideLane" => vec![
            AttributeSpec::value("distance", 100.0),
            AttributeSpec::value("speed", 60.0),
            AttributeSpec::value("bicycle_drive_distance", 50.0),
            AttributeSpec::value("bicycle_speed", 10.0),
        ],
        "HazardAtSideLaneTwoWays" => vec![
            AttributeSpec::value("distance", 100.0),
            AttributeSpec::value("frequency", 100.0),
            AttributeSpec::value("bicycle_drive_distance", 50.0),
            AttributeSpec::value("bicycle_speed", 10.0),
        ],
        "InvadingTurn" => vec![
            AttributeSpec::value("distance", 100.0),
            AttributeSpec::value("offset", 0.25),
        ],
        "HighwayCutIn" => vec![AttributeSpec::location(
            "other_actor_location",
            LaneKind::Driving,
        )],
        "ParkingCutIn" => vec![AttributeSpec::choice("direction")],
        "StaticCutIn" => vec![
            AttributeSpec::value("distance", 100.0),
            AttributeSpec::choice("direction"),
        ],
        "ControlLoss" | "HardBreakRoute" => Vec::new(),
        "ParkingExit" => vec![
            AttributeSpec::choice("direction"),
            AttributeSpec::value("front_vehicle_distance", 20.0),
            AttributeSpec::value("behind_vehicle_distance", 10.0),
        ],
        "YieldToEmergencyVehicle" => vec![AttributeSpec::value("distance", 140.0)],
        // There are no default parameters for this scenario
        "BackgroundActivityParametrizer" => vec![
            AttributeSpec::value_no_default("num_front_vehicles"),
            AttributeSpec::value_no_default("num_back_vehicles"),
            AttributeSpec::value_no_default("road_spawn_dist"),
            AttributeSpec::value_no_default("opposite_source_dist"),
            AttributeSpec::value_no_default("opposite_max_actors"),
            AttributeSpec::value_no_default("opposite_spawn_dist"),
            AttributeSpec::boolean("opposite_active"),
            AttributeSpec::value_no_default("junction_source_dist"),
            AttributeSpec::value_no_default("junction_max_actors"),
            AttributeSpec::value_no_default("junction_spawn_dist"),
            AttributeSpec::value_no_default("junction_source_perc"),
        ],
        "PriorityAtJunction" => Vec::new(),
        _ => {
            return None;
        }
    };
    Some(specs)
}
