pub mod backend;
pub mod geolocate;
pub mod location;
pub mod notify;
pub mod session;

// Re-export commonly used types
pub use backend::{BackendClient, BackendError};
pub use geolocate::{FixedPosition, LocationError, LocationProvider, Unsupported};
pub use notify::{LogNotifier, Notice, Notifier, Severity};
pub use session::Session;
