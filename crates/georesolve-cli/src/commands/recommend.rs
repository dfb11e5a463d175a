//! Dataset recommendation command

use crate::app::{OutputFormat, RecommendArgs};
use crate::output::{self, terminal};
use anyhow::Result;
use georesolve_core::catalog::analysis_tips;
use georesolve_core::{recommend_datasets, DatasetRecommendation};
use serde::Serialize;

#[derive(Serialize)]
struct RecommendReport {
    query: String,
    recommendations: Vec<DatasetRecommendation>,
    tips: Vec<&'static str>,
}

pub fn run(args: RecommendArgs, format: OutputFormat) -> Result<()> {
    let query = args.text.join(" ");
    let report = RecommendReport {
        recommendations: recommend_datasets(&query, args.top.max(1)),
        tips: analysis_tips(&query),
        query,
    };

    let rendered = output::render(&report, format, |r| {
        terminal::format_recommendations(&r.recommendations, &r.tips)
    })?;
    println!("{}", rendered.trim_end());
    Ok(())
}
