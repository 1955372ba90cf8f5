use chrono::{Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::location::GeoPoint;
use super::resource::{FoodRegion, NewsItem, Shelter, SosAlert};

#[derive(Debug, Clone, Deserialize)]
pub struct ShelterList {
    pub shelters: Vec<Shelter>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FoodRegionList {
    pub food: Vec<FoodRegion>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewsList {
    pub news: Vec<NewsItem>,
    #[serde(default)]
    pub count: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SosAlertList {
    pub sos_alerts: Vec<SosAlert>,
}

/// Acknowledgement returned by `POST /sos/sos`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SosReceipt {
    pub message: String,
    pub latitude: f64,
    pub longitude: f64,
    pub persons: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub id: String,
    pub username: String,
}

/// Inclusive date window for the SOS triage listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Window ending today and reaching `days` back.
    pub fn last_days(days: u64) -> Self {
        let end = Utc::now().date_naive();
        let start = end.checked_sub_days(Days::new(days)).unwrap_or(end);
        Self { start, end }
    }
}

impl Default for DateWindow {
    // The triage board defaults to the last two days of alerts.
    fn default() -> Self {
        DateWindow::last_days(2)
    }
}

/// Raw image bytes attached to a curation form.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImagePayload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShelterForm {
    pub name: String,
    pub address: String,
    pub pincode: String,
    pub description: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    /// Where the submitting admin is standing; forwarded so the backend can
    /// record how far they were from the shelter.
    pub viewer: Option<GeoPoint>,
    pub image: Option<ImagePayload>,
}

#[derive(Debug, Clone)]
pub struct FoodRegionForm {
    pub address: String,
    pub pincode: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub viewer: Option<GeoPoint>,
    pub image: Option<ImagePayload>,
}

#[derive(Debug, Clone)]
pub struct NewsForm {
    pub title: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub image: Option<ImagePayload>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a valid number of persons.")]
    PersonsOutOfRange,

    #[error("Invalid coordinates provided.")]
    InvalidCoordinates,

    #[error("Image is required.")]
    MissingImage,

    #[error("Empty image file.")]
    EmptyImage,
}

impl ShelterForm {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

impl FoodRegionForm {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

impl NewsForm {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}
