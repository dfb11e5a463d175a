//! Dataset catalog listing

use crate::app::{DatasetsArgs, OutputFormat};
use crate::output::{self, terminal};
use anyhow::Result;
use georesolve_core::catalog::{
    get_data_source, sources_by_category, sources_by_keyword, sources_summary, DataSourceSummary,
};
use georesolve_core::{DataCategory, GeoResolveError};

pub fn run(args: DatasetsArgs, format: OutputFormat) -> Result<()> {
    if let Some(ref id) = args.id {
        let source = get_data_source(id)
            .ok_or_else(|| GeoResolveError::NotFound(format!("dataset '{}'", id)))?;
        let rendered = output::render(source, format, terminal::format_source)?;
        println!("{}", rendered.trim_end());
        return Ok(());
    }

    let summaries: Vec<DataSourceSummary> = if let Some(ref category) = args.category {
        let category: DataCategory = category.parse()?;
        sources_by_category(category)
            .into_iter()
            .map(DataSourceSummary::from)
            .collect()
    } else if let Some(ref keyword) = args.keyword {
        sources_by_keyword(keyword)
            .into_iter()
            .map(DataSourceSummary::from)
            .collect()
    } else {
        sources_summary()
    };

    if summaries.is_empty() && format == OutputFormat::Cli {
        println!("No datasets found");
        return Ok(());
    }

    let rendered = output::render(summaries.as_slice(), format, terminal::format_source_list)?;
    println!("{}", rendered.trim_end());
    Ok(())
}
