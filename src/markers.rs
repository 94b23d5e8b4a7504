use serde::{Deserialize, Serialize};

/// A labelled point of interest pinned to the globe surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub name: String,
    pub description: String,
    /// `[latitude, longitude]` in degrees
    pub location: [f64; 2],
    /// Dot size as a fraction of the globe radius
    pub size: f64,
}

impl Marker {
    pub fn new(name: &str, description: &str, lat: f64, lon: f64, size: f64) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            location: [lat, lon],
            size,
        }
    }

    #[inline(always)]
    pub fn lat(&self) -> f64 {
        self.location[0]
    }

    #[inline(always)]
    pub fn lon(&self) -> f64 {
        self.location[1]
    }
}

/// The built-in marker set. List order doubles as hover priority.
pub fn default_markers() -> Vec<Marker> {
    vec![
        Marker::new("Manila, Philippines", "Capital city of the Philippines", 14.5995, 120.9842, 0.03),
        Marker::new("Mumbai, India", "Financial center of India", 19.076, 72.8777, 0.1),
        Marker::new("Dhaka, Bangladesh", "Capital of Bangladesh", 23.8103, 90.4125, 0.05),
        Marker::new("Cairo, Egypt", "Capital of Egypt, near the Nile Delta", 30.0444, 31.2357, 0.07),
        Marker::new("Beijing, China", "Capital of China", 39.9042, 116.4074, 0.08),
        Marker::new("São Paulo, Brazil", "Brazil's vibrant financial center", -23.5505, -46.6333, 0.1),
        Marker::new("Mexico City, Mexico", "Capital city of Mexico", 19.4326, -99.1332, 0.1),
        Marker::new("New York City, USA", "Major US metropolitan and financial center", 40.7128, -74.006, 0.1),
        Marker::new("Osaka, Japan", "Major commercial center in Japan", 34.6937, 135.5022, 0.05),
        Marker::new("Istanbul, Turkey", "Transcontinental city straddling Europe and Asia", 41.0082, 28.9784, 0.06),
    ]
}
