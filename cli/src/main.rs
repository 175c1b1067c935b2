//! Tools for working with route-collection files without the editor GUI,
//! bundled as a single executable with one subcommand per tool.

#[macro_use]
extern crate log;

mod split_routes;

use std::collections::BTreeMap;

use anyhow::Result;
use structopt::StructOpt;

use geom::Distance;

#[derive(StructOpt)]
#[structopt(name = "routecli", about = "The route editor multi-tool")]
enum Command {
    /// Print a route-collection file as JSON
    DumpJSON {
        #[structopt()]
        path: String,
    },
    /// Split a multi-route file into one file per route
    SplitRoutes {
        /// The multi-route file to split
        #[structopt(long)]
        xml_file: String,
        /// The directory for the single-route files
        #[structopt(long)]
        out_folder: String,
    },
    /// Summarize the routes in a file
    RouteStats {
        #[structopt()]
        path: String,
    },
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};
    Builder::from_env(Env::default().default_filter_or("info")).init();

    match Command::from_args() {
        Command::DumpJSON { path } => dump_json(path),
        Command::SplitRoutes {
            xml_file,
            out_folder,
        } => split_routes::run(xml_file, out_folder),
        Command::RouteStats { path } => route_stats(path),
    }
}

fn dump_json(path: String) -> Result<()> {
    let records = route_model::read_routes_file(&path)?;
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

fn route_stats(path: String) -> Result<()> {
    let records = route_model::read_routes_file(&path)?;
    for record in &records {
        let mut per_type: BTreeMap<&str, usize> = BTreeMap::new();
        for scenario in &record.scenarios {
            *per_type.entry(scenario.scenario_type.as_str()).or_insert(0) += 1;
        }

        // Straight-line span between waypoints; the planned path is longer,
        // but deriving it needs a running simulator.
        let span: Distance = record
            .waypoints
            .windows(2)
            .map(|pair| pair[0].dist_to(pair[1]))
            .sum();

        println!(
            "{} on {}: {} waypoints spanning {}, {} scenarios",
            record.id,
            record.town,
            record.waypoints.len(),
            span.describe(),
            record.scenarios.len()
        );
        for (scenario_type, count) in per_type {
            println!("  - {}: {}", scenario_type, count);
        }
    }
    println!("{} routes total", records.len());
    Ok(())
}
