//! Client core for a disaster-relief coordination backend.
//!
//! Citizens browse nearby shelters, food-distribution regions, and news, and
//! can raise SOS alerts; administrators triage alerts and curate the listings.
//! This crate holds everything below the UI: the proximity feed state
//! machine, the device geolocation boundary, distance computation, and the
//! HTTP adapter for the remote backend.

pub mod config;
pub mod libraries;
pub mod models;
pub mod services;

pub use config::Config;
pub use libraries::{
    send_sos, CurationError, Curator, FeedPhase, FeedSnapshot, FoodRegionFetcher, NewsFetcher,
    ProximityFeed, ResourceFetcher, ShelterFetcher, SosBoard, SosError,
};
pub use models::{
    DateWindow, FoodRegion, FoodRegionForm, GeoPoint, ImagePayload, Located, NewsForm, NewsItem,
    Radius, Shelter, ShelterForm, SosAlert, SosReceipt, Tagged, ValidationError,
};
pub use services::{
    BackendClient, BackendError, FixedPosition, LocationError, LocationProvider, LogNotifier,
    Notice, Notifier, Session, Severity, Unsupported,
};
