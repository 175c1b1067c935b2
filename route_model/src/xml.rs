//! Reading and writing the route-collection XML format:
//!
//! ```text
//! <routes>
//!   <route id="0" town="Town12">
//!     <weathers>
//!       <weather route_percentage="0" cloudiness="5" .../>
//!       <weather route_percentage="100" cloudiness="5" .../>
//!     </weathers>
//!     <waypoints>
//!       <position x="338.7" y="176.2" z="0.1"/>
//!     </waypoints>
//!     <scenarios>
//!       <scenario name="Accident_0" type="Accident">
//!         <trigger_point x="338.7" y="176.2" z="0.1" yaw="270.0"/>
//!         <distance value="120"/>
//!       </scenario>
//!     </scenarios>
//!   </route>
//! </routes>
//! ```
//!
//! Scenario children are addressed by tag, so their order carries no meaning;
//! the writer puts `trigger_point` first. A bare `value` payload is read back
//! as a bool, a number, or free text depending on its shape.

use anyhow::{Context, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use geom::{Angle, Pt3D};

use crate::{
    AttrValue, LanePosition, RouteID, RouteRecord, RouteWeather, Scenario, ScenarioAttribute,
    WeatherKeyframe, WeatherState,
};

/// Reads every route record from a route-collection file.
pub fn read_routes_file(path: &str) -> Result<Vec<RouteRecord>> {
    let raw = fs_err::read_to_string(path)?;
    parse_routes(&raw).with_context(|| format!("parsing {}", path))
}

/// Writes records as a route-collection file at exactly `path`.
pub fn write_routes_file(path: &str, records: &[RouteRecord]) -> Result<()> {
    fs_err::write(path, write_routes(records)?)?;
    Ok(())
}

/// Parses a route-collection document.
pub fn parse_routes(raw: &str) -> Result<Vec<RouteRecord>> {
    let doc = roxmltree::Document::parse(raw)?;
    let mut records = Vec::new();
    for route in doc
        .root_element()
        .children()
        .filter(|node| node.has_tag_name("route"))
    {
        records.push(parse_route(route)?);
    }
    Ok(records)
}

fn parse_route(node: roxmltree::Node) -> Result<RouteRecord> {
    let id = RouteID(
        require_attr(node, "id")?
            .parse()
            .with_context(|| "bad route id")?,
    );
    let town = require_attr(node, "town")?.to_string();

    let mut weather = RouteWeather::default();
    let mut waypoints = Vec::new();
    let mut scenarios = Vec::new();
    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "weathers" => {
                for keyframe in child.children().filter(|n| n.has_tag_name("weather")) {
                    weather.keyframes.push(parse_weather(keyframe)?);
                }
            }
            "waypoints" => {
                for position in child.children().filter(|n| n.has_tag_name("position")) {
                    waypoints.push(parse_pt(position)?);
                }
            }
            "scenarios" => {
                for scenario in child.children().filter(|n| n.has_tag_name("scenario")) {
                    scenarios.push(parse_scenario(scenario)?);
                }
            }
            unknown => {
                warn!("Skipping unknown element <{}> in {}", unknown, id);
            }
        }
    }

    Ok(RouteRecord {
        id,
        town,
        weather,
        waypoints,
        scenarios,
    })
}

fn parse_weather(node: roxmltree::Node) -> Result<WeatherKeyframe> {
    let state = WeatherState {
        cloudiness: optional_f64(node, "cloudiness")?.unwrap_or(0.0),
        precipitation: optional_f64(node, "precipitation")?.unwrap_or(0.0),
        precipitation_deposits: optional_f64(node, "precipitation_deposits")?.unwrap_or(0.0),
        wetness: optional_f64(node, "wetness")?.unwrap_or(0.0),
        wind_intensity: optional_f64(node, "wind_intensity")?.unwrap_or(0.0),
        sun_azimuth_angle: optional_f64(node, "sun_azimuth_angle")?.unwrap_or(0.0),
        sun_altitude_angle: optional_f64(node, "sun_altitude_angle")?.unwrap_or(0.0),
        fog_density: optional_f64(node, "fog_density")?.unwrap_or(0.0),
        fog_distance: optional_f64(node, "fog_distance")?.unwrap_or(0.0),
        fog_falloff: optional_f64(node, "fog_falloff")?.unwrap_or(0.0),
        scattering_intensity: optional_f64(node, "scattering_intensity")?.unwrap_or(0.0),
        mie_scattering_scale: optional_f64(node, "mie_scattering_scale")?.unwrap_or(0.0),
    };
    Ok(WeatherKeyframe {
        route_percentage: optional_f64(node, "route_percentage")?.unwrap_or(0.0),
        state,
    })
}

fn parse_scenario(node: roxmltree::Node) -> Result<Scenario> {
    let name = require_attr(node, "name")?.to_string();
    let scenario_type = require_attr(node, "type")?.to_string();

    let mut trigger = None;
    let mut attributes = Vec::new();
    for child in node.children().filter(|n| n.is_element()) {
        let attr_name = child.tag_name().name().to_string();
        let value = parse_attr_value(child)
            .with_context(|| format!("in scenario {}", name))?;
        if attr_name == "trigger_point" {
            match value {
                AttrValue::Transform { pt, yaw } => {
                    trigger = Some(LanePosition { pt, yaw });
                }
                _ => bail!("scenario {} has a malformed trigger_point", name),
            }
        } else {
            attributes.push(ScenarioAttribute {
                name: attr_name,
                value,
            });
        }
    }

    let trigger = trigger.ok_or_else(|| anyhow!("scenario {} has no trigger_point", name))?;
    Ok(Scenario {
        name,
        scenario_type,
        trigger,
        attributes,
    })
}

// The payload shape determines the kind; there's no explicit marker in the
// format.
fn parse_attr_value(node: roxmltree::Node) -> Result<AttrValue> {
    if let Some(raw) = node.attribute("value") {
        return Ok(parse_scalar(raw));
    }
    if node.attribute("from").is_some() || node.attribute("to").is_some() {
        return Ok(AttrValue::Interval {
            from: require_f64(node, "from")?,
            to: require_f64(node, "to")?,
        });
    }
    if node.attribute("yaw").is_some() {
        return Ok(AttrValue::Transform {
            pt: parse_pt(node)?,
            yaw: Angle::degrees(require_f64(node, "yaw")?),
        });
    }
    if node.attribute("x").is_some() {
        return Ok(AttrValue::Location {
            pt: parse_pt(node)?,
            probability: optional_f64(node, "p")?,
        });
    }
    bail!(
        "<{}> has no recognized attribute payload",
        node.tag_name().name()
    )
}

fn parse_scalar(raw: &str) -> AttrValue {
    // Files in the wild capitalize booleans
    match raw {
        "True" | "true" => return AttrValue::Bool(true),
        "False" | "false" => return AttrValue::Bool(false),
        _ => {}
    }
    match raw.parse::<f64>() {
        Ok(number) => AttrValue::Number(number),
        Err(_) => AttrValue::Text(raw.to_string()),
    }
}

fn parse_pt(node: roxmltree::Node) -> Result<Pt3D> {
    Ok(Pt3D::new(
        require_f64(node, "x")?,
        require_f64(node, "y")?,
        require_f64(node, "z")?,
    ))
}

fn require_attr<'a>(node: roxmltree::Node<'a, '_>, name: &str) -> Result<&'a str> {
    node.attribute(name).ok_or_else(|| {
        anyhow!(
            "<{}> is missing the {} attribute",
            node.tag_name().name(),
            name
        )
    })
}

fn require_f64(node: roxmltree::Node, name: &str) -> Result<f64> {
    require_attr(node, name)?
        .parse()
        .with_context(|| format!("bad {} in <{}>", name, node.tag_name().name()))
}

fn optional_f64(node: roxmltree::Node, name: &str) -> Result<Option<f64>> {
    match node.attribute(name) {
        Some(raw) => Ok(Some(raw.parse().with_context(|| {
            format!("bad {} in <{}>", name, node.tag_name().name())
        })?)),
        None => Ok(None),
    }
}

/// Serializes records as a route-collection document.
pub fn write_routes(records: &[RouteRecord]) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("routes")))?;
    for record in records {
        write_route(&mut writer, record)?;
    }
    writer.write_event(Event::End(BytesEnd::new("routes")))?;
    Ok(writer.into_inner())
}

fn write_route(writer: &mut Writer<Vec<u8>>, record: &RouteRecord) -> Result<()> {
    let mut route = BytesStart::new("route");
    route.push_attribute(("id", record.id.0.to_string().as_str()));
    route.push_attribute(("town", record.town.as_str()));
    writer.write_event(Event::Start(route))?;

    writer.write_event(Event::Start(BytesStart::new("weathers")))?;
    for keyframe in &record.weather.keyframes {
        write_weather(writer, keyframe)?;
    }
    writer.write_event(Event::End(BytesEnd::new("weathers")))?;

    writer.write_event(Event::Start(BytesStart::new("waypoints")))?;
    for pt in &record.waypoints {
        let mut position = BytesStart::new("position");
        position.push_attribute(("x", fmt_f64(pt.x()).as_str()));
        position.push_attribute(("y", fmt_f64(pt.y()).as_str()));
        position.push_attribute(("z", fmt_f64(pt.z()).as_str()));
        writer.write_event(Event::Empty(position))?;
    }
    writer.write_event(Event::End(BytesEnd::new("waypoints")))?;

    writer.write_event(Event::Start(BytesStart::new("scenarios")))?;
    for scenario in &record.scenarios {
        write_scenario(writer, scenario)?;
    }
    writer.write_event(Event::End(BytesEnd::new("scenarios")))?;

    writer.write_event(Event::End(BytesEnd::new("route")))?;
    Ok(())
}

fn write_weather(writer: &mut Writer<Vec<u8>>, keyframe: &WeatherKeyframe) -> Result<()> {
    let state = &keyframe.state;
    let mut weather = BytesStart::new("weather");
    for (name, value) in [
        ("route_percentage", keyframe.route_percentage),
        ("cloudiness", state.cloudiness),
        ("precipitation", state.precipitation),
        ("precipitation_deposits", state.precipitation_deposits),
        ("wetness", state.wetness),
        ("wind_intensity", state.wind_intensity),
        ("sun_azimuth_angle", state.sun_azimuth_angle),
        ("sun_altitude_angle", state.sun_altitude_angle),
        ("fog_density", state.fog_density),
        ("fog_distance", state.fog_distance),
        ("fog_falloff", state.fog_falloff),
        ("scattering_intensity", state.scattering_intensity),
        ("mie_scattering_scale", state.mie_scattering_scale),
    ] {
        weather.push_attribute((name, fmt_f64(value).as_str()));
    }
    writer.write_event(Event::Empty(weather))?;
    Ok(())
}

fn write_scenario(writer: &mut Writer<Vec<u8>>, scenario: &Scenario) -> Result<()> {
    let mut elem = BytesStart::new("scenario");
    elem.push_attribute(("name", scenario.name.as_str()));
    elem.push_attribute(("type", scenario.scenario_type.as_str()));
    writer.write_event(Event::Start(elem))?;

    write_attr(
        writer,
        "trigger_point",
        &AttrValue::Transform {
            pt: scenario.trigger.pt,
            yaw: scenario.trigger.yaw,
        },
    )?;
    for attr in &scenario.attributes {
        write_attr(writer, &attr.name, &attr.value)?;
    }

    writer.write_event(Event::End(BytesEnd::new("scenario")))?;
    Ok(())
}

fn write_attr(writer: &mut Writer<Vec<u8>>, name: &str, value: &AttrValue) -> Result<()> {
    let mut elem = BytesStart::new(name);
    match value {
        AttrValue::Number(number) => {
            elem.push_attribute(("value", fmt_f64(*number).as_str()));
        }
        AttrValue::Text(text) | AttrValue::Choice(text) => {
            elem.push_attribute(("value", text.as_str()));
        }
        AttrValue::Bool(b) => {
            elem.push_attribute(("value", if *b { "True" } else { "False" }));
        }
        AttrValue::Interval { from, to } => {
            elem.push_attribute(("from", fmt_f64(*from).as_str()));
            elem.push_attribute(("to", fmt_f64(*to).as_str()));
        }
        AttrValue::Location { pt, probability } => {
            elem.push_attribute(("x", fmt_f64(pt.x()).as_str()));
            elem.push_attribute(("y", fmt_f64(pt.y()).as_str()));
            elem.push_attribute(("z", fmt_f64(pt.z()).as_str()));
            if let Some(p) = probability {
                elem.push_attribute(("p", fmt_f64(*p).as_str()));
            }
        }
        AttrValue::Transform { pt, yaw } => {
            elem.push_attribute(("x", fmt_f64(pt.x()).as_str()));
            elem.push_attribute(("y", fmt_f64(pt.y()).as_str()));
            elem.push_attribute(("z", fmt_f64(pt.z()).as_str()));
            elem.push_attribute(("yaw", fmt_f64(yaw.inner_degrees()).as_str()));
        }
    }
    writer.write_event(Event::Empty(elem))?;
    Ok(())
}

// Integral values print without a trailing ".0", matching how the files have
// always been written.
fn fmt_f64(value: f64) -> String {
    format!("{}", value)
}
