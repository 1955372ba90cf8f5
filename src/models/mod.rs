pub mod location;
pub mod requests;
pub mod resource;

// Re-export commonly used types
pub use location::{GeoPoint, Radius};
pub use requests::{
    DateWindow, FoodRegionForm, ImagePayload, LoginResponse, NewsForm, ShelterForm, SosReceipt,
    ValidationError,
};
pub use resource::{FoodRegion, Located, NewsItem, Shelter, SosAlert, Tagged};
