//! Terminal output formatter

use georesolve_core::catalog::{DataSourceSummary, WorkflowRecommendation};
use georesolve_core::{
    DataSource, DatasetRecommendation, GeocodeResult, ReverseGeocodeResult, ScoredMatch,
    SpectralIndex, StructuredRequest,
};
use std::fmt::Write;

fn field(out: &mut String, label: &str, value: impl std::fmt::Display) {
    let _ = writeln!(out, "{:<13}{}", format!("{}:", label), value);
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

pub fn format_request(request: &StructuredRequest) -> String {
    let mut out = String::new();

    field(
        &mut out,
        "Resolved by",
        request.resolved_by.map(|t| t.as_str()).unwrap_or("none"),
    );

    let mut product = or_dash(request.product.as_deref());
    if request.product_defaulted {
        product.push_str(" (default)");
    }
    field(&mut out, "Product", product);
    field(&mut out, "Data type", or_dash(request.data_type));
    field(&mut out, "Provider", or_dash(request.provider.as_deref()));
    field(&mut out, "Location", or_dash(request.location_name.as_deref()));
    field(&mut out, "BBox", or_dash(request.bbox));
    if let Some(ref geometry) = request.geometry {
        field(&mut out, "Geometry", geometry.geometry_type().unwrap_or("?"));
    }

    let dates = match (request.start_date, request.end_date) {
        (Some(start), Some(end)) => format!("{} to {}", start, end),
        (Some(start), None) => format!("from {}", start),
        (None, Some(end)) => format!("until {}", end),
        (None, None) => "-".to_string(),
    };
    let dates = if request.dates_defaulted {
        format!("{} (default window)", dates)
    } else {
        dates
    };
    field(&mut out, "Dates", dates);
    field(
        &mut out,
        "Cloud cover",
        request
            .cloud_cover_max
            .map(|c| format!("<= {}%", c))
            .unwrap_or_else(|| "-".to_string()),
    );
    field(&mut out, "Limit", request.limit);

    if request.is_low_confidence() {
        out.push_str("\nLow confidence: consider naming a product and a location explicitly\n");
    }

    out
}

pub fn format_recommendations(recommendations: &[DatasetRecommendation], tips: &[&str]) -> String {
    let mut out = String::new();

    if recommendations.is_empty() {
        out.push_str("No matching datasets\n");
    }

    for (rank, rec) in recommendations.iter().enumerate() {
        let source = rec.source;
        let score = if rec.fallback {
            "related".to_string()
        } else {
            format!("score {}", rec.score)
        };
        let _ = writeln!(
            out,
            "{}. {} ({}) [{}]",
            rank + 1,
            source.name,
            source.id,
            score
        );
        let _ = writeln!(
            out,
            "   {} | {} | {}",
            source.provider,
            source.category,
            resolution(source.resolution_m)
        );
        for why in &rec.why_recommended {
            let _ = writeln!(out, "   + {}", why);
        }
        if !rec.suggested_indices.is_empty() {
            let _ = writeln!(out, "   Indices: {}", rec.suggested_indices.join(", "));
        }
        for con in &rec.cons {
            let _ = writeln!(out, "   - {}", con);
        }
    }

    if !tips.is_empty() {
        out.push_str("\nTips:\n");
        for tip in tips {
            let _ = writeln!(out, "  * {}", tip);
        }
    }

    out
}

pub fn format_workflow(recommendation: &WorkflowRecommendation) -> String {
    let mut out = String::new();

    match recommendation {
        WorkflowRecommendation::Matched {
            workflow,
            indices,
            alternatives,
        } => {
            let _ = writeln!(out, "{} ({})", workflow.name, workflow.id);
            let _ = writeln!(out, "{}\n", workflow.description);
            field(&mut out, "Dataset", workflow.primary_dataset);
            if !workflow.fallback_datasets.is_empty() {
                field(&mut out, "Fallbacks", workflow.fallback_datasets.join(", "));
            }
            if let Some(sar) = workflow.alternate_dataset_sar {
                field(&mut out, "SAR option", sar);
            }
            field(&mut out, "Cloud cover", format!("<= {}%", workflow.cloud_cover_max));
            field(&mut out, "Temporal", workflow.temporal_requirement.as_str());

            out.push_str("\nSteps:\n");
            for step in workflow.steps {
                let optional = if step.optional { " (optional)" } else { "" };
                let _ = writeln!(out, "  {}. {}{}", step.order, step.name, optional);
                let _ = writeln!(out, "     {}", step.description);
                if let Some(algorithm) = step.qgis_algorithm {
                    let _ = writeln!(out, "     QGIS: {}", algorithm);
                }
            }

            if !indices.is_empty() {
                out.push_str("\nIndices:\n");
                for index in indices {
                    let _ = writeln!(out, "  {} = {}", index.name, index.formula);
                }
            }

            if !alternatives.is_empty() {
                let names: Vec<&str> = alternatives.iter().map(|w| w.id).collect();
                let _ = writeln!(out, "\nAlternatives: {}", names.join(", "));
            }
        }
        WorkflowRecommendation::NoMatch {
            available_categories,
        } => {
            out.push_str("No matching workflow\n");
            let categories: Vec<&str> = available_categories.iter().map(|c| c.as_str()).collect();
            let _ = writeln!(out, "Available categories: {}", categories.join(", "));
        }
    }

    out
}

pub fn format_source_list(sources: &[DataSourceSummary]) -> String {
    let mut out = String::new();
    for source in sources {
        let _ = writeln!(
            out,
            "{:<24} {:<14} {:>8}  {}",
            source.id,
            source.category.as_str(),
            resolution(source.resolution_m),
            source.name
        );
    }
    out
}

pub fn format_source(source: &DataSource) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{} ({})", source.name, source.id);
    let _ = writeln!(out, "{}\n", source.description);
    field(&mut out, "Provider", source.provider);
    field(&mut out, "Product code", source.product_code());
    field(&mut out, "Category", source.category);
    field(&mut out, "Resolution", resolution(source.resolution_m));
    field(
        &mut out,
        "Revisit",
        source
            .revisit_days
            .map(|d| format!("{} days", d))
            .unwrap_or_else(|| "-".to_string()),
    );
    field(&mut out, "Since", source.start_date.unwrap_or("-"));
    field(&mut out, "Free", if source.free_access { "yes" } else { "no" });
    field(&mut out, "Auth", if source.requires_auth { "required" } else { "none" });
    if !source.bands.is_empty() {
        field(&mut out, "Bands", source.bands.join(", "));
    }
    if !source.suitable_indices.is_empty() {
        field(&mut out, "Indices", source.suitable_indices.join(", "));
    }

    out.push_str("\nUse cases:\n");
    for use_case in source.use_cases {
        let _ = writeln!(out, "  * {}", use_case);
    }

    out
}

pub fn format_index_list(indices: &[SpectralIndex]) -> String {
    let mut out = String::new();
    for index in indices {
        let _ = writeln!(out, "{:<7} {:<45} {}", index.name, index.full_name, index.formula);
    }
    out
}

pub fn format_index_matches(matches: &[ScoredMatch<'_, SpectralIndex>]) -> String {
    if matches.is_empty() {
        return "No matching indices\n".to_string();
    }

    let mut out = String::new();
    for m in matches {
        let score = if m.fallback {
            "related".to_string()
        } else {
            format!("score {}", m.score)
        };
        let _ = writeln!(out, "{:<7} {:<45} [{}]", m.entry.name, m.entry.full_name, score);
    }
    out
}

pub fn format_geocode(result: &GeocodeResult) -> String {
    let mut out = String::new();
    field(&mut out, "Place", or_dash(result.display_name.as_deref()));
    field(&mut out, "Center", format!("{:.5}, {:.5}", result.lat, result.lon));
    field(&mut out, "BBox", or_dash(result.bbox));
    field(&mut out, "Geometry", result.geometry.geometry_type().unwrap_or("?"));
    out
}

pub fn format_reverse(result: &ReverseGeocodeResult) -> String {
    let mut out = String::new();
    field(&mut out, "Place", or_dash(result.display_name.as_deref()));
    for (key, value) in &result.address {
        let value = value.as_str().map(str::to_string).unwrap_or_else(|| value.to_string());
        field(&mut out, key, value);
    }
    out
}

fn resolution(meters: Option<f64>) -> String {
    match meters {
        Some(m) => format!("{}m", m),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use georesolve_core::catalog::{recommend_workflow, sources_summary};
    use georesolve_core::models::DEFAULT_LIMIT;

    #[test]
    fn test_empty_request_is_low_confidence() {
        let output = format_request(&StructuredRequest::empty(DEFAULT_LIMIT));
        assert!(output.contains("Resolved by: none"));
        assert!(output.contains("Low confidence"));
    }

    #[test]
    fn test_workflow_no_match_lists_categories() {
        let output = format_workflow(&recommend_workflow("zzz qqq"));
        assert!(output.contains("No matching workflow"));
        assert!(output.contains("vegetation"));
    }

    #[test]
    fn test_source_list_one_line_each() {
        let summaries = sources_summary();
        let output = format_source_list(&summaries);
        assert_eq!(output.lines().count(), summaries.len());
    }
}
