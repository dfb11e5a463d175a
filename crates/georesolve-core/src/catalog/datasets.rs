//! Dataset catalog

use super::{recommend_with_fallback, use_case_matches, Scorable, ScoredMatch};
use crate::error::{GeoResolveError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const SUMMARY_DESCRIPTION_LEN: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataCategory {
    Optical,
    Sar,
    Dem,
    LandCover,
    Climate,
    Ocean,
    Atmosphere,
    Vegetation,
    Nighttime,
    Hyperspectral,
}

impl DataCategory {
    pub const ALL: [DataCategory; 10] = [
        DataCategory::Optical,
        DataCategory::Sar,
        DataCategory::Dem,
        DataCategory::LandCover,
        DataCategory::Climate,
        DataCategory::Ocean,
        DataCategory::Atmosphere,
        DataCategory::Vegetation,
        DataCategory::Nighttime,
        DataCategory::Hyperspectral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DataCategory::Optical => "optical",
            DataCategory::Sar => "sar",
            DataCategory::Dem => "dem",
            DataCategory::LandCover => "land_cover",
            DataCategory::Climate => "climate",
            DataCategory::Ocean => "ocean",
            DataCategory::Atmosphere => "atmosphere",
            DataCategory::Vegetation => "vegetation",
            DataCategory::Nighttime => "nighttime",
            DataCategory::Hyperspectral => "hyperspectral",
        }
    }
}

impl fmt::Display for DataCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataCategory {
    type Err = GeoResolveError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        DataCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| {
                GeoResolveError::Validation(format!(
                    "unknown data category '{}' (expected one of: {})",
                    s,
                    DataCategory::ALL.map(|c| c.as_str()).join(", ")
                ))
            })
    }
}

/// A satellite or geospatial data product
#[derive(Debug, Clone, Serialize)]
pub struct DataSource {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub provider: &'static str,
    pub category: DataCategory,
    pub resolution_m: Option<f64>,
    pub revisit_days: Option<u32>,
    pub bands: &'static [&'static str],
    pub global_coverage: bool,
    pub start_date: Option<&'static str>,
    pub requires_auth: bool,
    pub free_access: bool,
    pub use_cases: &'static [&'static str],
    pub suitable_indices: &'static [&'static str],
    pub keywords: &'static [&'static str],
    pub pros: &'static [&'static str],
    pub cons: &'static [&'static str],
}

impl DataSource {
    /// Product type code understood by the search gateway; catalog ids
    /// double as those codes
    pub fn product_code(&self) -> &'static str {
        self.id
    }
}

impl Scorable for DataSource {
    fn id(&self) -> &str {
        self.id
    }

    fn keywords(&self) -> Vec<&str> {
        self.keywords.to_vec()
    }

    fn use_cases(&self) -> &[&str] {
        self.use_cases
    }

    fn suitable_indices(&self) -> &[&str] {
        self.suitable_indices
    }

    fn description(&self) -> &str {
        self.description
    }
}

pub static DATA_SOURCES: &[DataSource] = &[
    // Optical
    DataSource {
        id: "S2_MSI_L2A",
        name: "Sentinel-2 Level-2A",
        description: "High-resolution multispectral imagery with atmospheric correction. \
                      Ideal for vegetation, agriculture, water bodies, and land cover mapping.",
        provider: "cop_dataspace",
        category: DataCategory::Optical,
        resolution_m: Some(10.0),
        revisit_days: Some(5),
        bands: &["B01", "B02", "B03", "B04", "B05", "B06", "B07", "B08", "B8A", "B09", "B11", "B12"],
        global_coverage: true,
        start_date: Some("2015-06-23"),
        requires_auth: true,
        free_access: true,
        use_cases: &[
            "Vegetation monitoring",
            "Crop health assessment",
            "Water quality",
            "Urban mapping",
            "Forest monitoring",
            "Land cover classification",
            "Change detection",
            "Disaster response",
        ],
        suitable_indices: &["NDVI", "EVI", "NDWI", "MNDWI", "NDBI", "NBR", "SAVI", "NDRE"],
        keywords: &[
            "vegetation", "agriculture", "crop", "forest", "urban", "water", "ndvi", "land cover",
            "multispectral", "optical", "sentinel",
        ],
        pros: &[
            "High resolution (10m)",
            "Free data",
            "5-day revisit",
            "13 spectral bands",
            "Atmospheric correction included",
        ],
        cons: &["Affected by clouds", "No thermal band"],
    },
    DataSource {
        id: "S2_MSI_L1C",
        name: "Sentinel-2 Level-1C",
        description: "Top-of-atmosphere reflectance imagery. Use when you need raw data \
                      or want to apply custom atmospheric correction.",
        provider: "cop_dataspace",
        category: DataCategory::Optical,
        resolution_m: Some(10.0),
        revisit_days: Some(5),
        bands: &[
            "B01", "B02", "B03", "B04", "B05", "B06", "B07", "B08", "B8A", "B09", "B10", "B11", "B12",
        ],
        global_coverage: true,
        start_date: Some("2015-06-23"),
        requires_auth: true,
        free_access: true,
        use_cases: &["Custom atmospheric correction", "Cloud detection research", "TOA analysis"],
        suitable_indices: &["NDVI", "EVI", "NDWI"],
        keywords: &["toa", "top of atmosphere", "raw", "sentinel"],
        pros: &["Raw data available", "Includes cirrus band"],
        cons: &["Requires atmospheric correction", "Affected by clouds"],
    },
    DataSource {
        id: "LANDSAT_C2L2",
        name: "Landsat 8/9 Collection 2 Level-2",
        description: "Long-term Earth observation with thermal bands. Excellent for \
                      historical analysis and temperature-related studies.",
        provider: "usgs",
        category: DataCategory::Optical,
        resolution_m: Some(30.0),
        revisit_days: Some(16),
        bands: &["B1", "B2", "B3", "B4", "B5", "B6", "B7", "B10", "B11"],
        global_coverage: true,
        start_date: Some("2013-02-11"),
        requires_auth: true,
        free_access: true,
        use_cases: &[
            "Long-term monitoring",
            "Temperature mapping",
            "Thermal analysis",
            "Historical change detection",
            "Urban heat island",
            "Fire detection",
            "Water temperature",
        ],
        suitable_indices: &["NDVI", "NDWI", "NBR", "LST", "NDBI"],
        keywords: &[
            "landsat", "thermal", "temperature", "historical", "long-term", "heat", "fire", "lst",
        ],
        pros: &[
            "Thermal bands",
            "40+ years archive (with older Landsat)",
            "Free data",
            "Well-calibrated",
        ],
        cons: &["Lower resolution (30m)", "16-day revisit", "Affected by clouds"],
    },
    DataSource {
        id: "MODIS_MOD09GA",
        name: "MODIS Daily Surface Reflectance",
        description: "Daily global coverage at moderate resolution. Perfect for \
                      large-scale vegetation and atmospheric studies.",
        provider: "planetary_computer",
        category: DataCategory::Optical,
        resolution_m: Some(500.0),
        revisit_days: Some(1),
        bands: &["B01", "B02", "B03", "B04", "B05", "B06", "B07"],
        global_coverage: true,
        start_date: Some("2000-02-24"),
        requires_auth: true,
        free_access: true,
        use_cases: &[
            "Daily monitoring",
            "Large-scale vegetation",
            "Phenology",
            "Global studies",
            "Fire detection",
            "Aerosol studies",
        ],
        suitable_indices: &["NDVI", "EVI", "LAI"],
        keywords: &["modis", "daily", "global", "phenology", "large-scale", "vegetation"],
        pros: &["Daily coverage", "Global data", "Long archive (2000+)", "Consistent quality"],
        cons: &["Low resolution (500m)", "Mixed pixels in heterogeneous areas"],
    },
    // SAR
    DataSource {
        id: "S1_SAR_GRD",
        name: "Sentinel-1 SAR Ground Range Detected",
        description: "All-weather, day-night radar imagery. Essential for flood mapping, \
                      ship detection, and monitoring through clouds.",
        provider: "cop_dataspace",
        category: DataCategory::Sar,
        resolution_m: Some(10.0),
        revisit_days: Some(6),
        bands: &["VV", "VH"],
        global_coverage: true,
        start_date: Some("2014-04-03"),
        requires_auth: true,
        free_access: true,
        use_cases: &[
            "Flood mapping",
            "Ship detection",
            "Oil spill detection",
            "Deformation monitoring",
            "Soil moisture",
            "Rice paddy mapping",
            "All-weather monitoring",
            "Forest structure",
        ],
        suitable_indices: &["RVI", "Water mask", "Backscatter ratio"],
        keywords: &[
            "sar", "radar", "flood", "ship", "oil spill", "all-weather", "cloud-free",
            "deformation", "moisture", "sentinel-1",
        ],
        pros: &[
            "Works through clouds",
            "Day and night",
            "Sensitive to water",
            "Detects surface changes",
        ],
        cons: &["Complex interpretation", "Speckle noise", "No color information"],
    },
    DataSource {
        id: "S1_SAR_SLC",
        name: "Sentinel-1 SAR Single Look Complex",
        description: "Complex SAR data with phase information. Required for \
                      interferometric applications (InSAR).",
        provider: "cop_dataspace",
        category: DataCategory::Sar,
        resolution_m: Some(5.0),
        revisit_days: Some(6),
        bands: &["VV", "VH"],
        global_coverage: true,
        start_date: Some("2014-04-03"),
        requires_auth: true,
        free_access: true,
        use_cases: &[
            "InSAR",
            "Ground deformation",
            "Subsidence monitoring",
            "Earthquake analysis",
            "Volcano monitoring",
            "Glacier movement",
        ],
        suitable_indices: &["Coherence", "Interferogram"],
        keywords: &[
            "insar", "interferometry", "deformation", "subsidence", "earthquake", "volcano",
            "glacier",
        ],
        pros: &["Phase information", "High precision deformation", "Sub-cm accuracy"],
        cons: &["Complex processing", "Large file sizes", "Requires expertise"],
    },
    // Elevation
    DataSource {
        id: "COP-DEM_GLO-30",
        name: "Copernicus DEM 30m",
        description: "Global digital elevation model at 30m resolution. Derived from \
                      TanDEM-X mission, ideal for terrain analysis.",
        provider: "cop_dataspace",
        category: DataCategory::Dem,
        resolution_m: Some(30.0),
        revisit_days: None,
        bands: &["DEM"],
        global_coverage: true,
        start_date: Some("2021-01-01"),
        requires_auth: true,
        free_access: true,
        use_cases: &[
            "Terrain analysis",
            "Slope calculation",
            "Watershed delineation",
            "Viewshed analysis",
            "Flood modeling",
            "Infrastructure planning",
            "3D visualization",
            "Hillshade generation",
        ],
        suitable_indices: &["Slope", "Aspect", "TRI", "TPI", "Hillshade", "Curvature"],
        keywords: &[
            "dem", "elevation", "terrain", "slope", "aspect", "height", "topography", "watershed",
            "hillshade",
        ],
        pros: &["Global coverage", "Free access", "High quality", "Regular updates"],
        cons: &["Static (no temporal)", "May have voids in steep terrain"],
    },
    DataSource {
        id: "COP-DEM_GLO-90",
        name: "Copernicus DEM 90m",
        description: "Global DEM at 90m resolution. Good for large-scale terrain analysis \
                      with smaller file sizes.",
        provider: "cop_dataspace",
        category: DataCategory::Dem,
        resolution_m: Some(90.0),
        revisit_days: None,
        bands: &["DEM"],
        global_coverage: true,
        start_date: None,
        requires_auth: true,
        free_access: true,
        use_cases: &["Regional terrain analysis", "Hydrological modeling", "Climate modeling"],
        suitable_indices: &["Slope", "Aspect", "TWI"],
        keywords: &["dem", "elevation", "terrain", "regional"],
        pros: &["Smaller file sizes", "Global coverage", "Free"],
        cons: &["Lower resolution than GLO-30"],
    },
    DataSource {
        id: "SRTM_DEM",
        name: "SRTM Digital Elevation Model",
        description: "NASA Shuttle Radar Topography Mission DEM. Historical reference \
                      elevation data from 2000.",
        provider: "usgs",
        category: DataCategory::Dem,
        resolution_m: Some(30.0),
        revisit_days: None,
        bands: &["DEM"],
        global_coverage: true,
        start_date: Some("2000-02-11"),
        requires_auth: true,
        free_access: true,
        use_cases: &["Historical terrain reference", "Change in elevation studies"],
        suitable_indices: &["Slope", "Aspect"],
        keywords: &["srtm", "dem", "elevation", "historical", "nasa"],
        pros: &["Well-documented", "Widely used reference"],
        cons: &["Data from 2000 only", "Coverage 60N-56S only"],
    },
    // Land cover
    DataSource {
        id: "ESA_WORLDCOVER",
        name: "ESA WorldCover",
        description: "Global land cover map at 10m resolution. 11 land cover classes \
                      derived from Sentinel-1 and Sentinel-2.",
        provider: "planetary_computer",
        category: DataCategory::LandCover,
        resolution_m: Some(10.0),
        revisit_days: None,
        bands: &["LC"],
        global_coverage: true,
        start_date: Some("2020-01-01"),
        requires_auth: true,
        free_access: true,
        use_cases: &[
            "Land cover mapping",
            "Baseline classification",
            "Urban extent",
            "Forest mapping",
            "Wetland mapping",
            "Change detection baseline",
        ],
        suitable_indices: &["Land cover statistics"],
        keywords: &[
            "land cover", "classification", "worldcover", "urban", "forest", "wetland", "baseline",
        ],
        pros: &["10m resolution", "Global coverage", "11 classes", "Free"],
        cons: &["Annual updates only", "May have classification errors"],
    },
    DataSource {
        id: "CORINE_LC",
        name: "CORINE Land Cover",
        description: "European land cover database with 44 classes. Detailed classification \
                      for Europe only.",
        provider: "cop_dataspace",
        category: DataCategory::LandCover,
        resolution_m: Some(100.0),
        revisit_days: None,
        bands: &["LC"],
        global_coverage: false,
        start_date: Some("1990-01-01"),
        requires_auth: true,
        free_access: true,
        use_cases: &["European land cover", "Policy support", "Environmental reporting"],
        suitable_indices: &["Land cover statistics"],
        keywords: &["corine", "europe", "land cover", "detailed classification"],
        pros: &["44 detailed classes", "Historical data (1990+)", "Consistent methodology"],
        cons: &["Europe only", "100m resolution", "Multi-year update cycle"],
    },
    // Climate and atmosphere
    DataSource {
        id: "ERA5_REANALYSIS",
        name: "ERA5 Climate Reanalysis",
        description: "Global climate reanalysis data. Temperature, precipitation, wind, \
                      humidity and more at hourly resolution.",
        provider: "cop_cds",
        category: DataCategory::Climate,
        resolution_m: Some(31000.0),
        revisit_days: Some(1),
        bands: &["temperature", "precipitation", "wind", "humidity", "pressure"],
        global_coverage: true,
        start_date: Some("1979-01-01"),
        requires_auth: true,
        free_access: true,
        use_cases: &[
            "Climate analysis",
            "Weather patterns",
            "Historical climate",
            "Agricultural planning",
            "Renewable energy assessment",
            "Drought monitoring",
        ],
        suitable_indices: &["Temperature anomaly", "SPI", "SPEI"],
        keywords: &[
            "climate", "weather", "temperature", "precipitation", "wind", "era5", "reanalysis",
            "historical weather",
        ],
        pros: &["Hourly data", "1979-present", "Consistent global coverage", "Many variables"],
        cons: &["Coarse resolution (31km)", "Modeled data not observations"],
    },
    DataSource {
        id: "S5P_L2",
        name: "Sentinel-5P Atmospheric",
        description: "Atmospheric composition data. NO2, O3, SO2, CO, CH4, aerosols \
                      for air quality monitoring.",
        provider: "cop_dataspace",
        category: DataCategory::Atmosphere,
        resolution_m: Some(7000.0),
        revisit_days: Some(1),
        bands: &["NO2", "O3", "SO2", "CO", "CH4", "HCHO", "Aerosol"],
        global_coverage: true,
        start_date: Some("2018-07-05"),
        requires_auth: true,
        free_access: true,
        use_cases: &[
            "Air quality monitoring",
            "Pollution tracking",
            "Methane detection",
            "Ozone monitoring",
            "Volcanic SO2",
            "Industrial emissions",
        ],
        suitable_indices: &["AQI", "Tropospheric NO2"],
        keywords: &[
            "air quality", "pollution", "no2", "ozone", "methane", "atmosphere", "sentinel-5p",
            "emissions",
        ],
        pros: &["Daily global coverage", "Multiple pollutants", "Near real-time"],
        cons: &["Coarse resolution (7km)", "Affected by clouds"],
    },
    // Ocean
    DataSource {
        id: "S3_OLCI",
        name: "Sentinel-3 OLCI Ocean Color",
        description: "Ocean and land color instrument. Chlorophyll, water quality, \
                      and coastal monitoring.",
        provider: "cop_dataspace",
        category: DataCategory::Ocean,
        resolution_m: Some(300.0),
        revisit_days: Some(2),
        bands: &[
            "Oa01", "Oa02", "Oa03", "Oa04", "Oa05", "Oa06", "Oa07", "Oa08", "Oa09", "Oa10", "Oa11",
            "Oa12", "Oa13", "Oa14", "Oa15", "Oa16", "Oa17", "Oa18", "Oa19", "Oa20", "Oa21",
        ],
        global_coverage: true,
        start_date: Some("2016-02-16"),
        requires_auth: true,
        free_access: true,
        use_cases: &[
            "Ocean color",
            "Chlorophyll mapping",
            "Algal blooms",
            "Water quality",
            "Coastal monitoring",
            "Lake monitoring",
        ],
        suitable_indices: &["Chlorophyll-a", "TSM", "CDOM", "Turbidity"],
        keywords: &[
            "ocean", "chlorophyll", "water quality", "algae", "coastal", "lake", "sentinel-3",
        ],
        pros: &["21 spectral bands", "Optimized for water", "Daily coastal coverage"],
        cons: &["300m resolution", "Complex atmospheric correction over water"],
    },
    // Vegetation products
    DataSource {
        id: "VEGETATION_NDVI",
        name: "Global Vegetation Index (NDVI)",
        description: "Pre-computed NDVI product for vegetation monitoring. \
                      Ready-to-use vegetation health indicator.",
        provider: "cop_dataspace",
        category: DataCategory::Vegetation,
        resolution_m: Some(1000.0),
        revisit_days: Some(10),
        bands: &["NDVI"],
        global_coverage: true,
        start_date: Some("1998-01-01"),
        requires_auth: true,
        free_access: true,
        use_cases: &[
            "Vegetation monitoring",
            "Drought assessment",
            "Crop yield prediction",
            "Phenology studies",
            "Desertification monitoring",
        ],
        suitable_indices: &["NDVI anomaly", "VCI"],
        keywords: &["ndvi", "vegetation", "greenness", "drought", "phenology"],
        pros: &["Ready-to-use", "Long time series", "Consistent processing"],
        cons: &["1km resolution", "Pre-aggregated data"],
    },
    // Nighttime lights
    DataSource {
        id: "VIIRS_DNB",
        name: "VIIRS Nighttime Lights",
        description: "Nighttime light emissions imagery. Excellent for urban extent, \
                      economic activity, and power outage monitoring.",
        provider: "planetary_computer",
        category: DataCategory::Nighttime,
        resolution_m: Some(500.0),
        revisit_days: Some(1),
        bands: &["DNB"],
        global_coverage: true,
        start_date: Some("2012-01-01"),
        requires_auth: true,
        free_access: true,
        use_cases: &[
            "Urban mapping",
            "Economic activity",
            "Power outage detection",
            "Light pollution",
            "Population estimation",
            "Development monitoring",
        ],
        suitable_indices: &["Light intensity", "Urban extent"],
        keywords: &[
            "nighttime", "lights", "urban", "economic", "power", "population", "viirs", "night",
        ],
        pros: &[
            "Unique nighttime perspective",
            "Daily global coverage",
            "Correlates with GDP",
        ],
        cons: &["500m resolution", "Affected by moon phase", "Cloud interference"],
    },
];

pub fn get_data_source(id: &str) -> Option<&'static DataSource> {
    DATA_SOURCES.iter().find(|ds| ds.id.eq_ignore_ascii_case(id))
}

pub fn sources_by_category(category: DataCategory) -> Vec<&'static DataSource> {
    DATA_SOURCES
        .iter()
        .filter(|ds| ds.category == category)
        .collect()
}

/// Sources whose keywords, use cases or description mention the keyword
pub fn sources_by_keyword(keyword: &str) -> Vec<&'static DataSource> {
    let keyword = keyword.trim().to_lowercase();
    if keyword.is_empty() {
        return Vec::new();
    }

    DATA_SOURCES
        .iter()
        .filter(|ds| {
            ds.keywords.iter().any(|kw| kw.to_lowercase().contains(&keyword))
                || ds
                    .use_cases
                    .iter()
                    .any(|uc| uc.to_lowercase().contains(&keyword))
                || ds.description.to_lowercase().contains(&keyword)
        })
        .collect()
}

/// Compact listing entry
#[derive(Debug, Clone, Serialize)]
pub struct DataSourceSummary {
    pub id: &'static str,
    pub name: &'static str,
    pub category: DataCategory,
    pub resolution_m: Option<f64>,
    pub provider: &'static str,
    pub description: String,
}

impl From<&'static DataSource> for DataSourceSummary {
    fn from(ds: &'static DataSource) -> Self {
        Self {
            id: ds.id,
            name: ds.name,
            category: ds.category,
            resolution_m: ds.resolution_m,
            provider: ds.provider,
            description: truncate_description(ds.description),
        }
    }
}

pub fn sources_summary() -> Vec<DataSourceSummary> {
    DATA_SOURCES.iter().map(DataSourceSummary::from).collect()
}

fn truncate_description(description: &str) -> String {
    if description.chars().count() > SUMMARY_DESCRIPTION_LEN {
        let head: String = description.chars().take(SUMMARY_DESCRIPTION_LEN).collect();
        format!("{}...", head)
    } else {
        description.to_string()
    }
}

/// A recommended dataset with the reasons it was picked
#[derive(Debug, Clone, Serialize)]
pub struct DatasetRecommendation {
    pub source: &'static DataSource,
    pub score: u32,
    pub fallback: bool,
    pub why_recommended: Vec<&'static str>,
    pub suggested_indices: Vec<&'static str>,
    pub pros: Vec<&'static str>,
    pub cons: Vec<&'static str>,
}

impl DatasetRecommendation {
    fn build(text_lower: &str, matched: ScoredMatch<'static, DataSource>) -> Self {
        let source = matched.entry;
        let mut why: Vec<&'static str> = source
            .use_cases
            .iter()
            .copied()
            .filter(|uc| use_case_matches(text_lower, uc))
            .take(3)
            .collect();
        if why.is_empty() {
            why = source.use_cases.iter().copied().take(2).collect();
        }

        Self {
            source,
            score: matched.score,
            fallback: matched.fallback,
            why_recommended: why,
            suggested_indices: source.suitable_indices.iter().copied().take(4).collect(),
            pros: source.pros.iter().copied().take(3).collect(),
            cons: source.cons.iter().copied().take(2).collect(),
        }
    }
}

/// Recommend datasets for an analysis description, with word fallback
pub fn recommend_datasets(text: &str, top_n: usize) -> Vec<DatasetRecommendation> {
    let text_lower = text.to_lowercase();
    recommend_with_fallback(text, DATA_SOURCES, top_n)
        .into_iter()
        .map(|matched| DatasetRecommendation::build(&text_lower, matched))
        .collect()
}

const TIP_RULES: &[(&[&str], &[&str])] = &[
    (
        &["vegetation", "crop", "agriculture", "plant", "forest"],
        &[
            "Use NDVI for vegetation health assessment",
            "Consider time series analysis for phenology monitoring",
        ],
    ),
    (
        &["water", "flood", "lake", "river", "moisture"],
        &[
            "Use NDWI or MNDWI for water body detection",
            "Consider SAR data for all-weather monitoring",
        ],
    ),
    (
        &["urban", "city", "building", "settlement"],
        &[
            "Use NDBI for built-up area mapping",
            "Consider nighttime lights for urbanization analysis",
        ],
    ),
    (
        &["fire", "burn", "thermal"],
        &[
            "Use NBR for burn severity assessment",
            "Consider MODIS or VIIRS for active fire detection",
        ],
    ),
];

const DEFAULT_TIP: &str = "Explore the recommended datasets based on your specific use case";

/// Processing tips for the kind of analysis described
pub fn analysis_tips(text: &str) -> Vec<&'static str> {
    let text_lower = text.to_lowercase();
    let tips: Vec<&'static str> = TIP_RULES
        .iter()
        .filter(|(triggers, _)| triggers.iter().any(|t| text_lower.contains(t)))
        .flat_map(|(_, tips)| tips.iter().copied())
        .collect();

    if tips.is_empty() {
        vec![DEFAULT_TIP]
    } else {
        tips
    }
}
