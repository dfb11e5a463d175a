//! Spectral index listing and QGIS formulas

use crate::app::{IndicesArgs, OutputFormat};
use crate::output::{self, terminal};
use anyhow::Result;
use georesolve_core::catalog::{
    get_index, match_indices, qgis_formula, Sensor, DEFAULT_TOP_N, SPECTRAL_INDICES,
};
use georesolve_core::GeoResolveError;
use serde::Serialize;

#[derive(Serialize)]
struct FormulaReport {
    index: &'static str,
    sensor: Sensor,
    formula: String,
}

pub fn run(args: IndicesArgs, format: OutputFormat) -> Result<()> {
    if let Some(ref text) = args.search {
        let matches = match_indices(text, DEFAULT_TOP_N);
        let rendered = output::render(matches.as_slice(), format, terminal::format_index_matches)?;
        println!("{}", rendered.trim_end());
        return Ok(());
    }

    let Some(ref name) = args.formula else {
        let rendered = output::render(SPECTRAL_INDICES, format, terminal::format_index_list)?;
        println!("{}", rendered.trim_end());
        return Ok(());
    };

    let index =
        get_index(name).ok_or_else(|| GeoResolveError::NotFound(format!("index '{}'", name)))?;
    let sensor: Sensor = match args.sensor {
        Some(ref sensor) => sensor.parse()?,
        None => Sensor::Sentinel2,
    };

    let report = FormulaReport {
        index: index.name,
        sensor,
        formula: qgis_formula(index.name, sensor),
    };
    let rendered = output::render(&report, format, |r| r.formula.clone())?;
    println!("{}", rendered.trim_end());
    Ok(())
}
