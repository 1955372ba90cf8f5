pub mod curation;
pub mod feed;
pub mod sos;

// Re-export commonly used types
pub use curation::{CurationError, Curator};
pub use feed::{
    FeedPhase, FeedSnapshot, FoodRegionFetcher, NewsFetcher, ProximityFeed, ResourceFetcher,
    ShelterFetcher,
};
pub use sos::{send_sos, SosBoard, SosError};
