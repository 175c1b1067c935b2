//! Splits a multi-route file into single-route files named
//! `{stem}_{NN}.xml`, numbered by position in the input, not by route id.

use std::path::Path;

use anyhow::Result;

use route_model::{read_routes_file, write_routes_file};

pub fn run(xml_file: String, out_folder: String) -> Result<()> {
    let records = read_routes_file(&xml_file)?;
    let stem = Path::new(&xml_file)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("routes");

    fs_err::create_dir_all(&out_folder)?;
    for (idx, record) in records.iter().enumerate() {
        let out_path = format!("{}/{}_{:02}.xml", out_folder, stem, idx);
        write_routes_file(&out_path, std::slice::from_ref(record))?;
        info!("Wrote {}", out_path);
    }
    info!("Split {} into {} files", xml_file, records.len());
    Ok(())
}
