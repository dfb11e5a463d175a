//! Product and sensor detection

use crate::models::DataType;
use lazy_static::lazy_static;
use regex::Regex;

/// Product used when no rule matches
pub const DEFAULT_PRODUCT: &str = "S2_MSI_L2A";
pub const DEFAULT_DATA_TYPE: DataType = DataType::Optical;

lazy_static! {
    /// Checked in order; specific sensor names come before generic families.
    static ref PRODUCT_RULES: Vec<(Regex, &'static str, DataType)> = vec![
        (rule(r"\bsentinel[-\s]?2\b|\bs2\b"), "S2_MSI_L2A", DataType::Optical),
        (rule(r"\bsentinel[-\s]?1\b|\bs1\b|\bsar\b"), "S1_SAR_GRD", DataType::Sar),
        (rule(r"\blandsat[-\s]?8\b|\bl8\b"), "LANDSAT_C2L2", DataType::Optical),
        (rule(r"\blandsat[-\s]?9\b|\bl9\b"), "LANDSAT_C2L2", DataType::Optical),
        (rule(r"\blandsat"), "LANDSAT_C2L2", DataType::Optical),
        (rule(r"\bsentinel[-\s]?5p\b|\bs5p\b|\bair\s+quality\b|\bno2\b"), "S5P_L2", DataType::AirQuality),
        (rule(r"\bera5\b|\breanalysis\b"), "ERA5_REANALYSIS", DataType::Climate),
        (rule(r"\bdem\b|elevation|\bsrtm\b|height"), "COP-DEM_GLO-30", DataType::Dem),
        (rule(r"\bland\s?cover\b|\blulc\b"), "ESA_WORLDCOVER", DataType::LandCover),
        (rule(r"\bmodis\b"), "MODIS_MOD09GA", DataType::Optical),
    ];
}

fn rule(pattern: &str) -> Regex {
    Regex::new(pattern).expect("Invalid product pattern")
}

/// Detected product code and data type
#[derive(Debug, Clone, PartialEq)]
pub struct ProductMatch {
    pub product: String,
    pub data_type: DataType,
    /// No rule matched and the default was used
    pub defaulted: bool,
}

/// Detect the product from lower-cased text; never returns "unset"
pub fn extract_product(text: &str) -> ProductMatch {
    let text = text.to_lowercase();

    PRODUCT_RULES
        .iter()
        .find(|(re, _, _)| re.is_match(&text))
        .map(|(_, product, data_type)| ProductMatch {
            product: product.to_string(),
            data_type: *data_type,
            defaulted: false,
        })
        .unwrap_or_else(|| ProductMatch {
            product: DEFAULT_PRODUCT.to_string(),
            data_type: DEFAULT_DATA_TYPE,
            defaulted: true,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_of(text: &str) -> (String, DataType) {
        let m = extract_product(text);
        (m.product, m.data_type)
    }

    #[test]
    fn test_sentinel_variants() {
        for text in ["Sentinel-2 images", "sentinel 2 data", "SENTINEL2 tiles", "S2 scenes"] {
            assert_eq!(product_of(text), ("S2_MSI_L2A".to_string(), DataType::Optical), "{}", text);
        }
        assert_eq!(product_of("Sentinel-1 SAR data").1, DataType::Sar);
        assert_eq!(product_of("radar sar backscatter").0, "S1_SAR_GRD");
    }

    #[test]
    fn test_specific_before_generic() {
        // "sentinel-2" wins even when a later family word is present
        assert_eq!(product_of("sentinel-2 elevation model").0, "S2_MSI_L2A");
        assert_eq!(product_of("Landsat 8 data for New York").0, "LANDSAT_C2L2");
        assert_eq!(product_of("landsat-9").0, "LANDSAT_C2L2");
        assert_eq!(product_of("old landsat archive").0, "LANDSAT_C2L2");
    }

    #[test]
    fn test_families() {
        assert_eq!(product_of("DEM data for Mount Everest").1, DataType::Dem);
        assert_eq!(product_of("SRTM tiles").0, "COP-DEM_GLO-30");
        assert_eq!(product_of("land cover map").1, DataType::LandCover);
        assert_eq!(product_of("LULC for Kenya").0, "ESA_WORLDCOVER");
        assert_eq!(product_of("MODIS reflectance").0, "MODIS_MOD09GA");
        assert_eq!(product_of("NO2 air quality over Milan").1, DataType::AirQuality);
        assert_eq!(product_of("ERA5 temperature").1, DataType::Climate);
    }

    #[test]
    fn test_word_boundaries() {
        // "academic" must not trigger the DEM rule, "dos2" must not trigger S2
        let m = extract_product("academic dos2 study");
        assert!(m.defaulted);
    }

    #[test]
    fn test_default_is_flagged() {
        let m = extract_product("pictures of Rome");
        assert_eq!(m.product, DEFAULT_PRODUCT);
        assert_eq!(m.data_type, DataType::Optical);
        assert!(m.defaulted);
    }
}
