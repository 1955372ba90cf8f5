use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::location::GeoPoint;
use crate::services::location::distance_km;

/// Anything the backend geo-tags and the feed can distance-sort.
pub trait Located {
    fn position(&self) -> GeoPoint;
}

/// An emergency shelter curated by an administrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shelter {
    pub id: String,
    pub name: String,
    pub address: String,
    pub pincode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A region where food is being distributed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodRegion {
    pub id: String,
    pub address: String,
    pub pincode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
}

/// A geo-tagged news bulletin.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// An SOS alert raised by a citizen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SosAlert {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "default_persons")]
    pub persons: u32,
    #[serde(default)]
    pub resolved: bool,
    pub created_at: DateTime<Utc>,
}

fn default_persons() -> u32 {
    1
}

impl Located for Shelter {
    fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

impl Located for FoodRegion {
    fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

impl Located for NewsItem {
    fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

impl Located for SosAlert {
    fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

impl fmt::Display for Shelter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.address, self.pincode)
    }
}

impl fmt::Display for FoodRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.address, self.pincode)
    }
}

impl fmt::Display for NewsItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// A resource paired with its locally re-derived distance from the viewer.
///
/// The backend pre-filters by distance, but the value it stores is not
/// trusted for display; the distance shown always comes from our own
/// computation. `distance_km` is `None` when the resource carries coordinates
/// outside the valid domain, so an invalid record can never surface a NaN.
#[derive(Debug, Clone)]
pub struct Tagged<T> {
    pub item: T,
    pub distance_km: Option<f64>,
}

impl<T: Located> Tagged<T> {
    pub fn from_viewer(item: T, viewer: GeoPoint) -> Self {
        let distance_km = distance_km(&viewer, &item.position());
        Self { item, distance_km }
    }
}
