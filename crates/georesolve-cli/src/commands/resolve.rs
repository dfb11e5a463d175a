//! Resolve command

use crate::app::{OutputFormat, ResolveArgs};
use crate::output::{self, terminal};
use anyhow::Result;
use georesolve_core::{Config, GeoResolveError, QueryResolver, RequestOverrides};

pub async fn run(args: ResolveArgs, mut config: Config, format: OutputFormat) -> Result<()> {
    let overrides = overrides_from_args(&args)?;

    if args.no_llm {
        config.llm = None;
    }
    if args.no_geocode {
        config.resolver.disable_geocoding = true;
    }

    let resolver = QueryResolver::from_config(&config)?;
    let request = resolver
        .resolve_with_overrides(&args.text(), resolver.has_llm(), &overrides)
        .await?;

    let rendered = output::render(&request, format, terminal::format_request)?;
    println!("{}", rendered.trim_end());
    Ok(())
}

fn overrides_from_args(args: &ResolveArgs) -> Result<RequestOverrides> {
    let geometry = args
        .geometry
        .as_deref()
        .map(|raw| {
            serde_json::from_str(raw)
                .map_err(|e| GeoResolveError::Validation(format!("geometry is not JSON: {}", e)))
        })
        .transpose()?;

    Ok(RequestOverrides {
        product: args.product.clone(),
        data_type: args.data_type.clone(),
        provider: args.provider.clone(),
        geometry,
        bbox: args.bbox.clone(),
        location_name: args.location.clone(),
        start_date: args.start.clone(),
        end_date: args.end.clone(),
        cloud_cover_max: args.cloud,
        limit: args.limit,
    })
}
