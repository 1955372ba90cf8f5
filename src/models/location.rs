use serde::{Deserialize, Serialize};

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Validate that coordinates are within valid GPS ranges
    pub fn is_valid(&self) -> bool {
        self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
            && self.latitude.is_finite()
            && self.longitude.is_finite()
    }
}

/// Search radius selection offered to the user.
///
/// `All` is an explicit "do not filter by distance" flag. It never carries a
/// kilometer value, so it cannot leak into distance arithmetic or sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Radius {
    Km5,
    Km10,
    Km15,
    Km20,
    Km150,
    All,
}

impl Radius {
    /// The choices presented by the original distance filter, in menu order.
    pub const CHOICES: [Radius; 6] = [
        Radius::Km5,
        Radius::Km10,
        Radius::Km15,
        Radius::Km20,
        Radius::Km150,
        Radius::All,
    ];

    /// Kilometer value sent to the backend; `None` means unbounded.
    pub fn kilometers(self) -> Option<u32> {
        match self {
            Radius::Km5 => Some(5),
            Radius::Km10 => Some(10),
            Radius::Km15 => Some(15),
            Radius::Km20 => Some(20),
            Radius::Km150 => Some(150),
            Radius::All => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Radius::Km5 => "5 km",
            Radius::Km10 => "10 km",
            Radius::Km15 => "15 km",
            Radius::Km20 => "20 km",
            Radius::Km150 => "150 km",
            Radius::All => "All",
        }
    }
}

impl Default for Radius {
    fn default() -> Self {
        Radius::Km10
    }
}
