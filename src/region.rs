use serde::{Deserialize, Serialize};

/// Display names of the known regions, by id
pub const REGION_NAMES: [(u8, &str); 6] = [
    (1, "UBC / Point Grey / Dunbar"),
    (2, "Kits / Kerrisdale / South Granville / Mount Pleasant"),
    (3, "Eastside"),
    (4, "North Vancouver"),
    (5, "West Vancouver"),
    (6, "Downtown"),
];

/// Rectangular bounds mapped to a region id
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionRectangle {
    pub lat_max: f64,
    pub long_min: f64,
    pub lat_min: f64,
    pub long_max: f64,
    pub region: u8,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl RegionRectangle {
    const fn new(lat_max: f64, long_min: f64, lat_min: f64, long_max: f64, region: u8, enabled: bool) -> Self {
        Self {
            lat_max,
            long_min,
            lat_min,
            long_max,
            region,
            enabled,
        }
    }

    /// Lower latitude and upper longitude bounds are exclusive
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        self.lat_min < latitude
            && latitude <= self.lat_max
            && self.long_min <= longitude
            && longitude < self.long_max
    }
}

/// Default region bounds around Vancouver.
///
/// The rectangles overlap in places; list order decides.
pub fn default_rectangles() -> Vec<RegionRectangle> {
    vec![
        RegionRectangle::new(49.29, -123.3, 49.2, -123.177, 1, true),
        RegionRectangle::new(49.296, -123.095, 49.229, -123.0357, 3, true),
        RegionRectangle::new(49.27049, -123.177, 49.2, -123.076, 2, true),
        RegionRectangle::new(49.279, -123.177, 49.27049, -123.1388, 2, true),
        RegionRectangle::new(49.2759, -123.1388, 49.27049, -123.1324, 2, true),
        RegionRectangle::new(49.27266, -123.11738, 49.27049, -123.095, 2, true),
        RegionRectangle::new(49.4, -123.129, 49.295, -122.93, 4, false),
        RegionRectangle::new(49.4, -123.3, 49.298, -123.129, 5, false),
        RegionRectangle::new(49.31, -123.17, 49.26, -123.09, 6, false),
    ]
}

/// Assigns coordinates to the first matching region
#[derive(Debug, Clone)]
pub struct RegionClassifier {
    rectangles: Vec<RegionRectangle>,
}

impl RegionClassifier {
    pub fn new(rectangles: Vec<RegionRectangle>) -> Self {
        Self { rectangles }
    }

    pub fn classify(&self, latitude: f64, longitude: f64) -> Option<u8> {
        self.rectangles
            .iter()
            .filter(|rect| rect.enabled)
            .find(|rect| rect.contains(latitude, longitude))
            .map(|rect| rect.region)
    }

    /// Region ids with at least one enabled rectangle, ascending
    pub fn active_regions(&self) -> Vec<u8> {
        let mut regions: Vec<u8> = self
            .rectangles
            .iter()
            .filter(|rect| rect.enabled)
            .map(|rect| rect.region)
            .collect();
        regions.sort_unstable();
        regions.dedup();
        regions
    }
}

impl Default for RegionClassifier {
    fn default() -> Self {
        Self::new(default_rectangles())
    }
}

pub fn region_name(region: u8) -> Option<&'static str> {
    REGION_NAMES
        .iter()
        .find(|(id, _)| *id == region)
        .map(|(_, name)| *name)
}
