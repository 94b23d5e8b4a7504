use crate::error::LandError;
use geojson::{GeoJson, Geometry, Value};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// A closed ring of (lon, lat) vertices with its bounding box.
#[derive(Clone, Debug)]
pub struct Ring {
    points: Vec<(f64, f64)>,
    min: (f64, f64),
    max: (f64, f64),
}

impl Ring {
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        let mut min = (f64::MAX, f64::MAX);
        let mut max = (f64::MIN, f64::MIN);
        for &(lon, lat) in &points {
            min = (min.0.min(lon), min.1.min(lat));
            max = (max.0.max(lon), max.1.max(lat));
        }
        Self { points, min, max }
    }

    /// Even-odd ray cast in lon/lat space. The last vertex connects back to the first.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        if self.points.len() < 3
            || lon < self.min.0
            || lon > self.max.0
            || lat < self.min.1
            || lat > self.max.1
        {
            return false;
        }

        let mut inside = false;
        let mut j = self.points.len() - 1;
        for i in 0..self.points.len() {
            let (xi, yi) = self.points[i];
            let (xj, yj) = self.points[j];
            if (yi > lat) != (yj > lat) && lon < (xj - xi) * (lat - yi) / (yj - yi) + xi {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}

/// Land/water lookup used to decide which sphere samples become dots.
#[derive(Clone, Debug)]
pub struct LandMask {
    rings: Vec<Ring>,
}

impl LandMask {
    pub fn new(rings: Vec<Ring>) -> Self {
        Self { rings }
    }

    pub fn ring_count(&self) -> usize {
        self.rings.len()
    }

    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        self.rings.iter().any(|ring| ring.contains(lon, lat))
    }

    /// Parse land polygons from GeoJSON text (Polygon / MultiPolygon exteriors).
    pub fn from_geojson_str(content: &str) -> Result<Self, LandError> {
        let geojson: GeoJson = content.parse()?;
        let mut rings = Vec::new();
        process_geojson_rings(&geojson, |ring| rings.push(Ring::new(ring)));
        if rings.is_empty() {
            return Err(LandError::Empty);
        }
        Ok(Self::new(rings))
    }

    /// Load land polygons from a GeoJSON file.
    pub fn load(path: &Path) -> Result<Self, LandError> {
        let content = fs::read_to_string(path).map_err(|source| LandError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mask = Self::from_geojson_str(&content)?;
        info!(rings = mask.ring_count(), "loaded land polygons from {}", path.display());
        Ok(mask)
    }

    /// Load from `path` when given, falling back to the built-in continents.
    pub fn load_or_builtin(path: Option<&Path>) -> Self {
        match path.map(Self::load) {
            Some(Ok(mask)) => mask,
            Some(Err(e)) => {
                warn!("failed to load land data, using built-in outlines: {e}");
                Self::builtin()
            }
            None => Self::builtin(),
        }
    }

    /// Simplified continent outlines for when no data file is available
    pub fn builtin() -> Self {
        let continents: [&[(f64, f64)]; 9] = [
            // North America
            &[
                (-168.0, 65.0), (-166.0, 60.0), (-141.0, 60.0), (-130.0, 55.0),
                (-125.0, 48.0), (-124.0, 40.0), (-117.0, 32.0), (-110.0, 23.0),
                (-105.0, 20.0), (-95.0, 16.0), (-88.0, 14.0), (-83.0, 9.0),
                (-78.0, 8.0), (-83.0, 15.0), (-88.0, 21.0), (-97.0, 22.0),
                (-97.0, 28.0), (-90.0, 30.0), (-82.0, 24.0), (-80.0, 25.0),
                (-81.0, 31.0), (-75.0, 35.0), (-70.0, 41.0), (-67.0, 45.0),
                (-65.0, 47.0), (-55.0, 47.0), (-52.0, 47.0), (-55.0, 52.0),
                (-58.0, 55.0), (-64.0, 60.0), (-73.0, 62.0), (-80.0, 63.0),
                (-95.0, 62.0), (-110.0, 68.0), (-130.0, 70.0), (-145.0, 70.0),
                (-158.0, 71.0),
            ],
            // South America
            &[
                (-80.0, 10.0), (-75.0, 11.0), (-70.0, 12.0), (-60.0, 8.0),
                (-50.0, 0.0), (-35.0, -5.0), (-35.0, -10.0), (-38.0, -15.0),
                (-40.0, -22.0), (-48.0, -25.0), (-55.0, -34.0), (-58.0, -38.0),
                (-65.0, -42.0), (-68.0, -50.0), (-70.0, -55.0), (-75.0, -52.0),
                (-75.0, -45.0), (-72.0, -40.0), (-72.0, -30.0), (-70.0, -20.0),
                (-76.0, -14.0), (-81.0, -5.0), (-80.0, 0.0),
            ],
            // Europe
            &[
                (-10.0, 36.0), (-5.0, 36.0), (0.0, 38.0), (5.0, 43.0),
                (10.0, 44.0), (15.0, 40.0), (18.0, 40.0), (20.0, 40.0),
                (25.0, 37.0), (27.0, 40.0), (29.0, 41.0), (40.0, 43.0),
                (40.0, 55.0), (30.0, 60.0), (25.0, 65.0), (20.0, 70.0),
                (10.0, 71.0), (5.0, 62.0), (8.0, 57.0), (-5.0, 58.0),
                (-10.0, 52.0), (-5.0, 48.0), (-2.0, 43.0), (-9.0, 43.0),
            ],
            // Great Britain
            &[
                (-5.5, 50.0), (1.5, 51.0), (0.0, 53.5), (-2.0, 57.0),
                (-3.0, 58.6), (-6.0, 58.0), (-5.0, 55.0), (-3.0, 54.0),
            ],
            // Africa
            &[
                (-17.0, 15.0), (-17.0, 21.0), (-13.0, 28.0), (-6.0, 35.8),
                (10.0, 37.0), (20.0, 32.0), (25.0, 32.0), (32.0, 31.0),
                (35.0, 28.0), (38.0, 18.0), (43.0, 12.0), (51.0, 12.0),
                (45.0, 5.0), (40.0, -3.0), (39.0, -10.0), (35.0, -20.0),
                (33.0, -26.0), (28.0, -33.0), (20.0, -35.0), (18.0, -32.0),
                (12.0, -18.0), (13.0, -8.0), (9.0, 0.0), (9.0, 4.0),
                (5.0, 5.0), (-5.0, 5.0), (-10.0, 6.0), (-14.0, 10.0),
            ],
            // Asia
            &[
                (27.0, 41.5), (35.0, 36.0), (35.0, 31.0), (43.0, 13.0),
                (52.0, 16.0), (57.0, 19.0), (59.0, 23.0), (56.0, 26.0),
                (50.0, 30.0), (57.0, 26.0), (62.0, 25.0), (67.0, 24.0),
                (72.0, 21.0), (73.0, 16.0), (77.0, 8.0), (80.0, 10.0),
                (80.0, 15.0), (86.0, 20.0), (89.0, 22.0), (92.0, 22.0),
                (95.0, 16.0), (98.0, 8.0), (103.0, 1.5), (101.0, 7.0),
                (100.0, 13.0), (105.0, 9.0), (109.0, 12.0), (106.0, 20.0),
                (111.0, 21.0), (117.0, 23.0), (121.0, 28.0), (122.0, 31.0),
                (119.0, 35.0), (122.0, 37.0), (118.0, 39.0), (121.0, 41.0),
                (126.0, 37.0), (129.0, 35.0), (130.0, 43.0), (140.0, 48.0),
                (141.0, 53.0), (135.0, 55.0), (142.0, 59.0), (155.0, 59.0),
                (163.0, 62.0), (180.0, 66.0), (180.0, 70.0), (140.0, 72.0),
                (110.0, 77.0), (80.0, 73.0), (68.0, 69.0), (55.0, 68.0),
                (44.0, 68.0), (40.0, 65.0), (30.0, 60.0), (40.0, 55.0),
                (40.0, 46.0), (36.0, 45.0), (30.0, 46.0),
            ],
            // Japan
            &[
                (130.0, 31.0), (132.0, 34.0), (135.0, 33.5), (140.0, 35.0),
                (141.0, 38.0), (142.0, 42.0), (145.0, 44.0), (141.5, 45.5),
                (139.5, 40.0), (137.0, 37.0), (132.0, 35.5),
            ],
            // Australia
            &[
                (114.0, -22.0), (120.0, -19.0), (130.0, -12.0), (137.0, -12.0),
                (136.0, -16.0), (141.0, -17.0), (142.0, -11.0), (146.0, -19.0),
                (153.0, -26.0), (153.0, -30.0), (150.0, -37.0), (146.0, -39.0),
                (140.0, -38.0), (135.0, -35.0), (131.0, -31.5), (125.0, -33.0),
                (115.0, -35.0), (115.0, -30.0),
            ],
            // Greenland
            &[
                (-73.0, 78.0), (-60.0, 82.0), (-30.0, 83.5), (-20.0, 80.0),
                (-20.0, 70.0), (-32.0, 68.0), (-42.0, 60.0), (-50.0, 64.0),
                (-55.0, 70.0), (-65.0, 76.0),
            ],
        ];

        Self::new(continents.iter().map(|c| Ring::new(c.to_vec())).collect())
    }
}

/// Walk GeoJSON and hand every polygon exterior ring to `add_ring`
fn process_geojson_rings<F>(geojson: &GeoJson, mut add_ring: F)
where
    F: FnMut(Vec<(f64, f64)>),
{
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for feature in &fc.features {
                if let Some(ref geometry) = feature.geometry {
                    process_geometry_rings(geometry, &mut add_ring);
                }
            }
        }
        GeoJson::Feature(f) => {
            if let Some(ref geometry) = f.geometry {
                process_geometry_rings(geometry, &mut add_ring);
            }
        }
        GeoJson::Geometry(geometry) => {
            process_geometry_rings(geometry, &mut add_ring);
        }
    }
}

fn process_geometry_rings<F>(geometry: &Geometry, add_ring: &mut F)
where
    F: FnMut(Vec<(f64, f64)>),
{
    match &geometry.value {
        Value::Polygon(rings) => {
            if let Some(exterior) = rings.first() {
                add_ring(exterior.iter().map(|c| (c[0], c[1])).collect());
            }
        }
        Value::MultiPolygon(polygons) => {
            for rings in polygons {
                if let Some(exterior) = rings.first() {
                    add_ring(exterior.iter().map(|c| (c[0], c[1])).collect());
                }
            }
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                process_geometry_rings(g, add_ring);
            }
        }
        _ => {}
    }
}
