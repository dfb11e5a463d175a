//! Analysis workflow templates

use super::indices::{get_index, SpectralIndex};
use super::{recommend, Scorable, DEFAULT_TOP_N};
use crate::error::{GeoResolveError, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisCategory {
    Vegetation,
    Water,
    Urban,
    Flood,
    Terrain,
    Fire,
}

impl AnalysisCategory {
    pub const ALL: [AnalysisCategory; 6] = [
        AnalysisCategory::Vegetation,
        AnalysisCategory::Water,
        AnalysisCategory::Urban,
        AnalysisCategory::Flood,
        AnalysisCategory::Terrain,
        AnalysisCategory::Fire,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisCategory::Vegetation => "vegetation",
            AnalysisCategory::Water => "water",
            AnalysisCategory::Urban => "urban",
            AnalysisCategory::Flood => "flood",
            AnalysisCategory::Terrain => "terrain",
            AnalysisCategory::Fire => "fire",
        }
    }
}

impl fmt::Display for AnalysisCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisCategory {
    type Err = GeoResolveError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase();
        AnalysisCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| GeoResolveError::Validation(format!("unknown analysis category '{}'", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemporalRequirement {
    Single,
    MultiDate,
    BeforeAfter,
}

impl TemporalRequirement {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemporalRequirement::Single => "single",
            TemporalRequirement::MultiDate => "multi_date",
            TemporalRequirement::BeforeAfter => "before_after",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowStep {
    pub order: u32,
    pub name: &'static str,
    pub description: &'static str,
    pub qgis_algorithm: Option<&'static str>,
    /// Algorithm parameters as raw `(name, JSON)` pairs
    pub parameters: &'static [(&'static str, &'static str)],
    pub optional: bool,
}

const fn step(order: u32, name: &'static str, description: &'static str) -> WorkflowStep {
    WorkflowStep {
        order,
        name,
        description,
        qgis_algorithm: None,
        parameters: &[],
        optional: false,
    }
}

const fn algo(
    order: u32,
    name: &'static str,
    description: &'static str,
    qgis_algorithm: &'static str,
    parameters: &'static [(&'static str, &'static str)],
    optional: bool,
) -> WorkflowStep {
    WorkflowStep {
        order,
        name,
        description,
        qgis_algorithm: Some(qgis_algorithm),
        parameters,
        optional,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisWorkflow {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: AnalysisCategory,
    pub keywords: &'static [&'static str],
    pub primary_dataset: &'static str,
    pub fallback_datasets: &'static [&'static str],
    /// Cloud-independent alternative
    pub alternate_dataset_sar: Option<&'static str>,
    pub indices: &'static [&'static str],
    pub steps: &'static [WorkflowStep],
    pub cloud_cover_max: u32,
    pub temporal_requirement: TemporalRequirement,
    pub min_resolution_m: u32,
}

impl Scorable for AnalysisWorkflow {
    fn id(&self) -> &str {
        self.id
    }

    fn keywords(&self) -> Vec<&str> {
        let mut keywords = self.keywords.to_vec();
        if !keywords.contains(&self.category.as_str()) {
            keywords.push(self.category.as_str());
        }
        keywords
    }

    fn use_cases(&self) -> &[&str] {
        &[]
    }

    fn suitable_indices(&self) -> &[&str] {
        self.indices
    }

    fn description(&self) -> &str {
        self.description
    }
}

pub static ANALYSIS_WORKFLOWS: &[AnalysisWorkflow] = &[
    AnalysisWorkflow {
        id: "vegetation_health",
        name: "Vegetation & Crop Health Analysis",
        description: "Assess vegetation health, crop condition, and agricultural monitoring",
        category: AnalysisCategory::Vegetation,
        keywords: &[
            "vegetation", "crop", "agriculture", "plant", "forest", "tree", "ndvi", "greenness",
            "health", "farm", "field", "biomass", "chlorophyll", "growth", "phenology", "harvest",
            "yield",
        ],
        primary_dataset: "S2_MSI_L2A",
        fallback_datasets: &["LANDSAT_C2L2", "MODIS_MOD09GA"],
        alternate_dataset_sar: None,
        indices: &["NDVI", "EVI", "SAVI", "NDRE"],
        steps: &[
            algo(
                1,
                "Load imagery",
                "Load Sentinel-2 or Landsat imagery into QGIS",
                "native:loadlayer",
                &[],
                false,
            ),
            algo(
                2,
                "Calculate NDVI",
                "Compute NDVI using raster calculator: (B08-B04)/(B08+B04)",
                "qgis:rastercalculator",
                &[
                    ("EXPRESSION", "\"(B08@1 - B04@1) / (B08@1 + B04@1)\""),
                    ("OUTPUT", "\"ndvi.tif\""),
                ],
                false,
            ),
            algo(
                3,
                "Classify vegetation",
                "Reclassify NDVI into vegetation classes",
                "native:reclassifybytable",
                &[("TABLE", "[-1, 0.1, 1, 0.1, 0.2, 2, 0.2, 0.4, 3, 0.4, 0.6, 4, 0.6, 1, 5]")],
                false,
            ),
            algo(
                4,
                "Calculate statistics",
                "Compute zonal statistics for your area of interest",
                "native:zonalstatisticsfb",
                &[],
                true,
            ),
        ],
        cloud_cover_max: 20,
        temporal_requirement: TemporalRequirement::MultiDate,
        min_resolution_m: 30,
    },
    AnalysisWorkflow {
        id: "water_detection",
        name: "Water Body Detection",
        description: "Map water bodies, lakes, rivers, and reservoirs",
        category: AnalysisCategory::Water,
        keywords: &[
            "water", "lake", "river", "reservoir", "pond", "wetland", "stream", "ocean", "sea",
            "coast", "flood", "aquatic", "hydrological", "watershed", "dam",
        ],
        primary_dataset: "S2_MSI_L2A",
        fallback_datasets: &["LANDSAT_C2L2"],
        alternate_dataset_sar: Some("S1_SAR_GRD"),
        indices: &["NDWI", "MNDWI"],
        steps: &[
            step(1, "Load imagery", "Load optical or SAR imagery"),
            algo(
                2,
                "Calculate MNDWI",
                "Compute MNDWI: (B03-B11)/(B03+B11)",
                "qgis:rastercalculator",
                &[
                    ("EXPRESSION", "\"(B03@1 - B11@1) / (B03@1 + B11@1)\""),
                    ("OUTPUT", "\"mndwi.tif\""),
                ],
                false,
            ),
            algo(
                3,
                "Threshold water",
                "Apply threshold (>0) to extract water pixels",
                "native:reclassifybytable",
                &[("TABLE", "[-1, 0, 0, 0, 1, 1]")],
                false,
            ),
            algo(
                4,
                "Vectorize",
                "Convert water mask to vector polygons",
                "gdal:polygonize",
                &[],
                true,
            ),
        ],
        cloud_cover_max: 20,
        temporal_requirement: TemporalRequirement::Single,
        min_resolution_m: 30,
    },
    AnalysisWorkflow {
        id: "urban_mapping",
        name: "Urban & Built-up Area Mapping",
        description: "Map urban extent, buildings, and infrastructure",
        category: AnalysisCategory::Urban,
        keywords: &[
            "urban", "city", "town", "building", "settlement", "infrastructure", "road",
            "construction", "development", "built-up", "impervious", "concrete", "asphalt",
            "residential", "commercial", "industrial",
        ],
        primary_dataset: "S2_MSI_L2A",
        fallback_datasets: &["LANDSAT_C2L2"],
        alternate_dataset_sar: None,
        indices: &["NDBI", "UI", "NDVI"],
        steps: &[
            step(1, "Load imagery", "Load Sentinel-2 imagery"),
            algo(
                2,
                "Calculate NDBI",
                "Compute NDBI: (B11-B08)/(B11+B08)",
                "qgis:rastercalculator",
                &[
                    ("EXPRESSION", "\"(B11@1 - B08@1) / (B11@1 + B08@1)\""),
                    ("OUTPUT", "\"ndbi.tif\""),
                ],
                false,
            ),
            algo(
                3,
                "Calculate NDVI",
                "Calculate NDVI to mask vegetation",
                "qgis:rastercalculator",
                &[],
                false,
            ),
            algo(
                4,
                "Extract built-up",
                "Built-up where NDBI > 0 AND NDVI < 0.2",
                "qgis:rastercalculator",
                &[("EXPRESSION", "\"(NDBI@1 > 0) AND (NDVI@1 < 0.2)\"")],
                false,
            ),
        ],
        cloud_cover_max: 15,
        temporal_requirement: TemporalRequirement::Single,
        min_resolution_m: 30,
    },
    AnalysisWorkflow {
        id: "flood_mapping",
        name: "Flood Extent Mapping",
        description: "Map flood extent using SAR or optical imagery",
        category: AnalysisCategory::Flood,
        keywords: &[
            "flood", "inundation", "disaster", "emergency", "overflow", "flooding", "floodplain",
            "waterlogging", "submersion", "hurricane", "cyclone", "monsoon", "dam break",
        ],
        primary_dataset: "S1_SAR_GRD",
        fallback_datasets: &["S2_MSI_L2A"],
        alternate_dataset_sar: None,
        indices: &["MNDWI"],
        steps: &[
            step(1, "Load pre-flood SAR", "Load Sentinel-1 image before flood event"),
            step(2, "Load post-flood SAR", "Load Sentinel-1 image during/after flood"),
            algo(
                3,
                "Apply speckle filter",
                "Reduce SAR speckle noise",
                "gdal:gdalfilter",
                &[("FILTER", "\"median\""), ("SIZE", "5")],
                false,
            ),
            algo(
                4,
                "Threshold VH band",
                "Apply threshold to detect water (low backscatter)",
                "qgis:rastercalculator",
                &[("EXPRESSION", "\"VH@1 < -20\"")],
                false,
            ),
            algo(
                5,
                "Change detection",
                "Compare pre and post to find new water",
                "qgis:rastercalculator",
                &[],
                false,
            ),
        ],
        // SAR sees through clouds
        cloud_cover_max: 100,
        temporal_requirement: TemporalRequirement::BeforeAfter,
        min_resolution_m: 30,
    },
    AnalysisWorkflow {
        id: "terrain_analysis",
        name: "Terrain & Elevation Analysis",
        description: "Analyze topography, slope, aspect, and elevation",
        category: AnalysisCategory::Terrain,
        keywords: &[
            "terrain", "elevation", "dem", "slope", "aspect", "topography", "hill", "mountain",
            "valley", "watershed", "drainage", "contour", "relief", "height", "altitude",
            "hillshade",
        ],
        primary_dataset: "COP-DEM_GLO-30",
        fallback_datasets: &["COP-DEM_GLO-90", "SRTM_DEM"],
        alternate_dataset_sar: None,
        indices: &[],
        steps: &[
            step(1, "Load DEM", "Load Copernicus or SRTM DEM"),
            algo(
                2,
                "Calculate slope",
                "Generate slope map in degrees",
                "native:slope",
                &[("OUTPUT", "\"slope.tif\"")],
                false,
            ),
            algo(
                3,
                "Calculate aspect",
                "Generate aspect (direction of slope)",
                "native:aspect",
                &[("OUTPUT", "\"aspect.tif\"")],
                false,
            ),
            algo(
                4,
                "Generate hillshade",
                "Create hillshade for visualization",
                "native:hillshade",
                &[],
                true,
            ),
            algo(5, "Extract contours", "Generate contour lines", "gdal:contour", &[], true),
        ],
        cloud_cover_max: 100,
        temporal_requirement: TemporalRequirement::Single,
        min_resolution_m: 30,
    },
    AnalysisWorkflow {
        id: "fire_analysis",
        name: "Fire & Burn Severity Analysis",
        description: "Assess fire damage and burn severity",
        category: AnalysisCategory::Fire,
        keywords: &[
            "fire", "burn", "wildfire", "forest fire", "bushfire", "burned", "combustion", "blaze",
            "flame", "scorch", "char", "ash", "smoke", "fire scar", "post-fire",
        ],
        primary_dataset: "S2_MSI_L2A",
        fallback_datasets: &["LANDSAT_C2L2"],
        alternate_dataset_sar: None,
        indices: &["NBR", "dNBR", "NDVI"],
        steps: &[
            step(1, "Load pre-fire imagery", "Load image from before the fire"),
            step(2, "Load post-fire imagery", "Load image after the fire"),
            algo(
                3,
                "Calculate pre-fire NBR",
                "NBR = (B08-B12)/(B08+B12)",
                "qgis:rastercalculator",
                &[
                    ("EXPRESSION", "\"(B08@1 - B12@1) / (B08@1 + B12@1)\""),
                    ("OUTPUT", "\"nbr_pre.tif\""),
                ],
                false,
            ),
            algo(
                4,
                "Calculate post-fire NBR",
                "Calculate NBR for post-fire image",
                "qgis:rastercalculator",
                &[],
                false,
            ),
            algo(
                5,
                "Calculate dNBR",
                "dNBR = NBR_pre - NBR_post",
                "qgis:rastercalculator",
                &[
                    ("EXPRESSION", "\"NBR_pre@1 - NBR_post@1\""),
                    ("OUTPUT", "\"dnbr.tif\""),
                ],
                false,
            ),
            algo(
                6,
                "Classify burn severity",
                "Classify dNBR into severity classes",
                "native:reclassifybytable",
                &[],
                false,
            ),
        ],
        cloud_cover_max: 30,
        temporal_requirement: TemporalRequirement::BeforeAfter,
        min_resolution_m: 30,
    },
];

pub fn get_workflow(id: &str) -> Option<&'static AnalysisWorkflow> {
    ANALYSIS_WORKFLOWS.iter().find(|w| w.id == id)
}

/// Workflows ranked for the text, best first (no cutoff)
pub fn match_workflows(text: &str) -> Vec<&'static AnalysisWorkflow> {
    recommend(text, ANALYSIS_WORKFLOWS, ANALYSIS_WORKFLOWS.len())
        .into_iter()
        .map(|m| m.entry)
        .collect()
}

/// Index reference attached to a workflow recommendation
#[derive(Debug, Clone, Serialize)]
pub struct IndexDetails {
    pub name: &'static str,
    pub full_name: &'static str,
    pub formula: &'static str,
    pub interpretation: &'static [(&'static str, &'static str)],
}

impl From<&'static SpectralIndex> for IndexDetails {
    fn from(index: &'static SpectralIndex) -> Self {
        Self {
            name: index.name,
            full_name: index.full_name,
            formula: index.formula,
            interpretation: index.interpretation,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WorkflowRecommendation {
    Matched {
        workflow: &'static AnalysisWorkflow,
        indices: Vec<IndexDetails>,
        /// Next best workflows, at most two
        alternatives: Vec<&'static AnalysisWorkflow>,
    },
    NoMatch {
        available_categories: Vec<AnalysisCategory>,
    },
}

pub fn recommend_workflow(text: &str) -> WorkflowRecommendation {
    let ranked = recommend(text, ANALYSIS_WORKFLOWS, DEFAULT_TOP_N);
    let mut ranked = ranked.into_iter().map(|m| m.entry);

    let Some(workflow) = ranked.next() else {
        return WorkflowRecommendation::NoMatch {
            available_categories: AnalysisCategory::ALL.to_vec(),
        };
    };

    let indices = workflow
        .indices
        .iter()
        .filter_map(|name| get_index(name))
        .map(IndexDetails::from)
        .collect();

    WorkflowRecommendation::Matched {
        workflow,
        indices,
        alternatives: ranked.take(2).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{get_data_source, score_entry};

    #[test]
    fn test_workflow_datasets_exist() {
        for workflow in ANALYSIS_WORKFLOWS {
            assert!(
                get_data_source(workflow.primary_dataset).is_some(),
                "{} primary",
                workflow.id
            );
            for id in workflow.fallback_datasets {
                assert!(get_data_source(id).is_some(), "{} fallback {}", workflow.id, id);
            }
            for name in workflow.indices {
                assert!(get_index(name).is_some(), "{} index {}", workflow.id, name);
            }
        }
    }

    #[test]
    fn test_steps_are_ordered() {
        for workflow in ANALYSIS_WORKFLOWS {
            let orders: Vec<u32> = workflow.steps.iter().map(|s| s.order).collect();
            let expected: Vec<u32> = (1..=workflow.steps.len() as u32).collect();
            assert_eq!(orders, expected, "{}", workflow.id);
        }
    }

    #[test]
    fn test_category_counts_as_keyword() {
        let terrain = get_workflow("terrain_analysis").unwrap();
        assert!(Scorable::keywords(terrain).contains(&"terrain"));

        let flood = get_workflow("flood_mapping").unwrap();
        assert_eq!(
            Scorable::keywords(flood).iter().filter(|k| **k == "flood").count(),
            1
        );
        assert_eq!(score_entry("terrain", terrain), 2);
    }

    #[test]
    fn test_flood_workflow() {
        let WorkflowRecommendation::Matched {
            workflow,
            indices,
            alternatives,
        } = recommend_workflow("Map the flood inundation after the hurricane")
        else {
            panic!("expected a match");
        };

        assert_eq!(workflow.id, "flood_mapping");
        assert_eq!(workflow.primary_dataset, "S1_SAR_GRD");
        assert_eq!(indices.len(), 1);
        assert_eq!(indices[0].name, "MNDWI");
        assert!(alternatives.len() <= 2);
        assert!(alternatives.iter().any(|w| w.id == "water_detection"));
    }

    #[test]
    fn test_fire_workflow_index_details() {
        let WorkflowRecommendation::Matched { workflow, indices, .. } =
            recommend_workflow("burn severity of the wildfire")
        else {
            panic!("expected a match");
        };
        assert_eq!(workflow.id, "fire_analysis");
        let names: Vec<&str> = indices.iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["NBR", "dNBR", "NDVI"]);
    }

    #[test]
    fn test_no_match_lists_categories() {
        match recommend_workflow("quarterly revenue report") {
            WorkflowRecommendation::NoMatch {
                available_categories,
            } => assert_eq!(available_categories.len(), 6),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_match_workflows_ranks_all() {
        let ranked = match_workflows("crop health near the river");
        assert_eq!(ranked[0].id, "vegetation_health");
        assert!(ranked.iter().any(|w| w.id == "water_detection"));
    }

    #[test]
    fn test_serialized_status_tag() {
        let json = serde_json::to_value(recommend_workflow("slope map of the mountain")).unwrap();
        assert_eq!(json["status"], "matched");
        assert_eq!(json["workflow"]["id"], "terrain_analysis");
    }
}
