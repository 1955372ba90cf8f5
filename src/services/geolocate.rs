use async_trait::async_trait;

use crate::models::GeoPoint;

/// Reasons a position query can fail. Any of these is terminal for the
/// page lifecycle that issued it; callers never retry automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("Location permission denied. Please enable GPS.")]
    Denied,

    #[error("Geolocation is not supported on this device.")]
    Unsupported,

    #[error("Timed out waiting for a position fix.")]
    Timeout,
}

/// The device capability boundary: one current-position query.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_position(&self) -> Result<GeoPoint, LocationError>;
}

/// Provider backed by explicit coordinates, for headless use and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub GeoPoint);

#[async_trait]
impl LocationProvider for FixedPosition {
    async fn current_position(&self) -> Result<GeoPoint, LocationError> {
        if self.0.is_valid() {
            Ok(self.0)
        } else {
            Err(LocationError::Unsupported)
        }
    }
}

/// Provider for environments with no location capability at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsupported;

#[async_trait]
impl LocationProvider for Unsupported {
    async fn current_position(&self) -> Result<GeoPoint, LocationError> {
        Err(LocationError::Unsupported)
    }
}
