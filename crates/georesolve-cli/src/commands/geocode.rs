//! Forward and reverse geocoding commands

use crate::app::{GeocodeArgs, OutputFormat, ReverseArgs};
use crate::output::{self, terminal};
use anyhow::Result;
use georesolve_core::{Config, GeoResolveError, Geocoder};

pub async fn run(args: GeocodeArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let place = args.place.join(" ");
    let geocoder = Geocoder::new(&config.geocoder)?;

    let result = geocoder
        .geocode(&place)
        .await
        .ok_or_else(|| GeoResolveError::NotFound(format!("no geocoding result for '{}'", place)))?;

    let rendered = output::render(&result, format, terminal::format_geocode)?;
    println!("{}", rendered.trim_end());
    Ok(())
}

pub async fn run_reverse(args: ReverseArgs, config: &Config, format: OutputFormat) -> Result<()> {
    if !(-90.0..=90.0).contains(&args.lat) || !(-180.0..=180.0).contains(&args.lon) {
        return Err(GeoResolveError::Validation(format!(
            "coordinate out of range: ({}, {})",
            args.lat, args.lon
        ))
        .into());
    }

    let geocoder = Geocoder::new(&config.geocoder)?;
    let result = geocoder
        .reverse_geocode(args.lat, args.lon)
        .await
        .ok_or_else(|| {
            GeoResolveError::NotFound(format!("no address for ({}, {})", args.lat, args.lon))
        })?;

    let rendered = output::render(&result, format, terminal::format_reverse)?;
    println!("{}", rendered.trim_end());
    Ok(())
}
