//! Spectral index library

use super::{recommend_with_fallback, Scorable, ScoredMatch};
use crate::error::{GeoResolveError, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Sensor family whose band names are substituted into formulas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sensor {
    Sentinel2,
    Landsat,
}

impl Sensor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sensor::Sentinel2 => "sentinel2",
            Sensor::Landsat => "landsat",
        }
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sensor {
    type Err = GeoResolveError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match normalized.as_str() {
            "sentinel2" | "s2" => Ok(Sensor::Sentinel2),
            "landsat" | "landsat8" | "landsat9" => Ok(Sensor::Landsat),
            _ => Err(GeoResolveError::Validation(format!(
                "unknown sensor '{}' (expected sentinel2 or landsat)",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SpectralIndex {
    pub name: &'static str,
    pub full_name: &'static str,
    pub formula: &'static str,
    pub description: &'static str,
    /// Formula variable to Sentinel-2 band
    pub bands_sentinel2: &'static [(&'static str, &'static str)],
    /// Formula variable to Landsat 8/9 band; empty when unavailable
    pub bands_landsat: &'static [(&'static str, &'static str)],
    pub value_range: (f64, f64),
    pub interpretation: &'static [(&'static str, &'static str)],
}

impl SpectralIndex {
    pub fn bands_for(&self, sensor: Sensor) -> &'static [(&'static str, &'static str)] {
        match sensor {
            Sensor::Sentinel2 => self.bands_sentinel2,
            Sensor::Landsat => self.bands_landsat,
        }
    }
}

impl Scorable for SpectralIndex {
    fn id(&self) -> &str {
        self.name
    }

    fn keywords(&self) -> Vec<&str> {
        vec![self.full_name]
    }

    fn use_cases(&self) -> &[&str] {
        &[]
    }

    fn suitable_indices(&self) -> &[&str] {
        std::slice::from_ref(&self.name)
    }

    fn description(&self) -> &str {
        self.description
    }
}

pub static SPECTRAL_INDICES: &[SpectralIndex] = &[
    // Vegetation
    SpectralIndex {
        name: "NDVI",
        full_name: "Normalized Difference Vegetation Index",
        formula: "(NIR - RED) / (NIR + RED)",
        description: "Most common vegetation health indicator",
        bands_sentinel2: &[("NIR", "B08"), ("RED", "B04")],
        bands_landsat: &[("NIR", "B5"), ("RED", "B4")],
        value_range: (-1.0, 1.0),
        interpretation: &[
            ("<0", "Water, snow, clouds"),
            ("0-0.1", "Bare soil, rock"),
            ("0.1-0.2", "Sparse vegetation"),
            ("0.2-0.4", "Moderate vegetation"),
            ("0.4-0.6", "Dense vegetation"),
            (">0.6", "Very healthy, dense vegetation"),
        ],
    },
    SpectralIndex {
        name: "EVI",
        full_name: "Enhanced Vegetation Index",
        formula: "2.5 * (NIR - RED) / (NIR + 6*RED - 7.5*BLUE + 1)",
        description: "Better for high biomass areas, reduces atmospheric effects",
        bands_sentinel2: &[("NIR", "B08"), ("RED", "B04"), ("BLUE", "B02")],
        bands_landsat: &[("NIR", "B5"), ("RED", "B4"), ("BLUE", "B2")],
        value_range: (-1.0, 1.0),
        interpretation: &[
            ("<0.2", "Low vegetation"),
            ("0.2-0.4", "Moderate vegetation"),
            (">0.4", "High vegetation"),
        ],
    },
    SpectralIndex {
        name: "SAVI",
        full_name: "Soil Adjusted Vegetation Index",
        formula: "((NIR - RED) / (NIR + RED + 0.5)) * 1.5",
        description: "Minimizes soil brightness influence",
        bands_sentinel2: &[("NIR", "B08"), ("RED", "B04")],
        bands_landsat: &[("NIR", "B5"), ("RED", "B4")],
        value_range: (-1.0, 1.0),
        interpretation: &[
            ("<0.2", "Bare soil"),
            ("0.2-0.4", "Sparse vegetation"),
            (">0.4", "Dense vegetation"),
        ],
    },
    SpectralIndex {
        name: "NDRE",
        full_name: "Normalized Difference Red Edge",
        formula: "(NIR - RED_EDGE) / (NIR + RED_EDGE)",
        description: "Sensitive to chlorophyll content, good for crop stress",
        bands_sentinel2: &[("NIR", "B08"), ("RED_EDGE", "B05")],
        bands_landsat: &[],
        value_range: (-1.0, 1.0),
        interpretation: &[
            ("<0.2", "Stressed vegetation"),
            ("0.2-0.4", "Moderate health"),
            (">0.4", "Healthy vegetation"),
        ],
    },
    // Water
    SpectralIndex {
        name: "NDWI",
        full_name: "Normalized Difference Water Index",
        formula: "(GREEN - NIR) / (GREEN + NIR)",
        description: "Detects water bodies, sensitive to vegetation moisture",
        bands_sentinel2: &[("GREEN", "B03"), ("NIR", "B08")],
        bands_landsat: &[("GREEN", "B3"), ("NIR", "B5")],
        value_range: (-1.0, 1.0),
        interpretation: &[(">0.3", "Water"), ("0-0.3", "Wet/moist"), ("<0", "Non-water")],
    },
    SpectralIndex {
        name: "MNDWI",
        full_name: "Modified NDWI",
        formula: "(GREEN - SWIR) / (GREEN + SWIR)",
        description: "Better discrimination of water from built-up areas",
        bands_sentinel2: &[("GREEN", "B03"), ("SWIR", "B11")],
        bands_landsat: &[("GREEN", "B3"), ("SWIR", "B6")],
        value_range: (-1.0, 1.0),
        interpretation: &[(">0", "Water"), ("<0", "Non-water")],
    },
    // Urban
    SpectralIndex {
        name: "NDBI",
        full_name: "Normalized Difference Built-up Index",
        formula: "(SWIR - NIR) / (SWIR + NIR)",
        description: "Highlights urban/built-up areas",
        bands_sentinel2: &[("SWIR", "B11"), ("NIR", "B08")],
        bands_landsat: &[("SWIR", "B6"), ("NIR", "B5")],
        value_range: (-1.0, 1.0),
        interpretation: &[(">0", "Built-up area"), ("<0", "Non-built-up")],
    },
    SpectralIndex {
        name: "UI",
        full_name: "Urban Index",
        formula: "(SWIR2 - NIR) / (SWIR2 + NIR)",
        description: "Urban area detection",
        bands_sentinel2: &[("SWIR2", "B12"), ("NIR", "B08")],
        bands_landsat: &[("SWIR2", "B7"), ("NIR", "B5")],
        value_range: (-1.0, 1.0),
        interpretation: &[(">0", "Urban"), ("<0", "Non-urban")],
    },
    // Fire
    SpectralIndex {
        name: "NBR",
        full_name: "Normalized Burn Ratio",
        formula: "(NIR - SWIR) / (NIR + SWIR)",
        description: "Burn severity assessment",
        bands_sentinel2: &[("NIR", "B08"), ("SWIR", "B12")],
        bands_landsat: &[("NIR", "B5"), ("SWIR", "B7")],
        value_range: (-1.0, 1.0),
        interpretation: &[
            (">0.1", "Unburned"),
            ("0 to 0.1", "Low severity"),
            ("-0.1 to 0", "Moderate severity"),
            ("<-0.1", "High severity"),
        ],
    },
    SpectralIndex {
        name: "dNBR",
        full_name: "Differenced NBR",
        formula: "NBR_pre - NBR_post",
        description: "Change in burn ratio between pre and post fire",
        bands_sentinel2: &[("NIR", "B08"), ("SWIR", "B12")],
        bands_landsat: &[("NIR", "B5"), ("SWIR", "B7")],
        value_range: (-2.0, 2.0),
        interpretation: &[
            ("<-0.25", "High post-fire regrowth"),
            ("-0.25 to 0.1", "Unburned"),
            ("0.1 to 0.27", "Low severity"),
            ("0.27 to 0.44", "Moderate-low severity"),
            ("0.44 to 0.66", "Moderate-high severity"),
            (">0.66", "High severity"),
        ],
    },
    // Moisture
    SpectralIndex {
        name: "NDMI",
        full_name: "Normalized Difference Moisture Index",
        formula: "(NIR - SWIR) / (NIR + SWIR)",
        description: "Vegetation water content",
        bands_sentinel2: &[("NIR", "B08"), ("SWIR", "B11")],
        bands_landsat: &[("NIR", "B5"), ("SWIR", "B6")],
        value_range: (-1.0, 1.0),
        interpretation: &[
            (">0.4", "High moisture"),
            ("0.2-0.4", "Moderate moisture"),
            ("0-0.2", "Low moisture"),
            ("<0", "Water stress"),
        ],
    },
];

/// Case-sensitive lookup first (`dNBR` vs `NBR`), then case-insensitive
pub fn get_index(name: &str) -> Option<&'static SpectralIndex> {
    SPECTRAL_INDICES
        .iter()
        .find(|idx| idx.name == name)
        .or_else(|| {
            SPECTRAL_INDICES
                .iter()
                .find(|idx| idx.name.eq_ignore_ascii_case(name))
        })
}

/// Indices relevant to an analysis description, with word fallback
pub fn match_indices(text: &str, top_n: usize) -> Vec<ScoredMatch<'static, SpectralIndex>> {
    recommend_with_fallback(text, SPECTRAL_INDICES, top_n)
}

/// QGIS raster calculator expression for an index on a sensor.
///
/// Unknown index gives an empty string; an index without bands for the
/// sensor gives a `#` comment line.
pub fn qgis_formula(name: &str, sensor: Sensor) -> String {
    let Some(index) = get_index(name) else {
        return String::new();
    };

    let bands = index.bands_for(sensor);
    if bands.is_empty() {
        return format!("# {} not available for {}", index.name, sensor);
    }

    // Longest variable first so RED does not clobber RED_EDGE
    let mut vars: Vec<&(&str, &str)> = bands.iter().collect();
    vars.sort_by_key(|(var, _)| std::cmp::Reverse(var.len()));

    let mut placeholders = index.formula.to_string();
    for (i, (var, _)) in vars.iter().enumerate() {
        placeholders = placeholders.replace(var, &format!("{{{}}}", i));
    }
    let mut formula = placeholders;
    for (i, (_, band)) in vars.iter().enumerate() {
        formula = formula.replace(&format!("{{{}}}", i), &format!("{}@1", band));
    }
    formula
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_size() {
        assert_eq!(SPECTRAL_INDICES.len(), 11);
    }

    #[test]
    fn test_get_index() {
        assert_eq!(get_index("ndvi").unwrap().name, "NDVI");
        assert_eq!(get_index("dNBR").unwrap().name, "dNBR");
        assert_eq!(get_index("NBR").unwrap().name, "NBR");
        assert!(get_index("XYZ").is_none());
    }

    #[test]
    fn test_ndvi_formulas() {
        assert_eq!(
            qgis_formula("NDVI", Sensor::Sentinel2),
            "(B08@1 - B04@1) / (B08@1 + B04@1)"
        );
        assert_eq!(qgis_formula("NDVI", Sensor::Landsat), "(B5@1 - B4@1) / (B5@1 + B4@1)");
    }

    #[test]
    fn test_overlapping_variable_names() {
        assert_eq!(
            qgis_formula("NDRE", Sensor::Sentinel2),
            "(B08@1 - B05@1) / (B08@1 + B05@1)"
        );
        assert_eq!(
            qgis_formula("UI", Sensor::Landsat),
            "(B7@1 - B5@1) / (B7@1 + B5@1)"
        );
        assert_eq!(
            qgis_formula("EVI", Sensor::Sentinel2),
            "2.5 * (B08@1 - B04@1) / (B08@1 + 6*B04@1 - 7.5*B02@1 + 1)"
        );
    }

    #[test]
    fn test_unavailable_and_unknown() {
        assert_eq!(
            qgis_formula("NDRE", Sensor::Landsat),
            "# NDRE not available for landsat"
        );
        assert_eq!(qgis_formula("NOPE", Sensor::Sentinel2), "");
    }

    #[test]
    fn test_match_indices_by_name() {
        let matches = match_indices("map burn severity with NBR", 3);
        assert_eq!(matches[0].id(), "NBR");
        assert_eq!(matches[0].score, 3);
        assert!(!matches[0].fallback);
    }

    #[test]
    fn test_match_indices_fallback() {
        let matches = match_indices("vegetation greenness", 3);
        assert_eq!(matches[0].id(), "NDVI");
        assert!(matches.iter().all(|m| m.fallback));
    }

    #[test]
    fn test_sensor_parsing() {
        assert_eq!("Sentinel-2".parse::<Sensor>().unwrap(), Sensor::Sentinel2);
        assert_eq!("landsat".parse::<Sensor>().unwrap(), Sensor::Landsat);
        assert!("modis".parse::<Sensor>().is_err());
    }
}
