use std::cmp::Ordering;
use std::sync::Arc;

use tracing::{info, warn};

use crate::models::{DateWindow, GeoPoint, Radius, SosAlert, SosReceipt, Tagged, ValidationError};
use crate::services::backend::{BackendClient, BackendError};
use crate::services::geolocate::{LocationError, LocationProvider};
use crate::services::notify::{Notice, Notifier};
use crate::services::session::Session;

#[derive(Debug, thiserror::Error)]
pub enum SosError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Location(#[from] LocationError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Raise an SOS alert from the caller's current position.
///
/// The person count is validated before anything else touches the network or
/// the location capability, and the position is always acquired fresh rather
/// than reused from a feed. Every outcome, success or failure, produces
/// exactly one notice; callers should not add their own.
pub async fn send_sos(
    api: &BackendClient,
    session: &Session,
    provider: &dyn LocationProvider,
    notifier: &dyn Notifier,
    persons: u32,
) -> Result<SosReceipt, SosError> {
    if persons < 1 {
        notifier.notify(Notice::error(ValidationError::PersonsOutOfRange.to_string()));
        return Err(ValidationError::PersonsOutOfRange.into());
    }

    let position = match provider.current_position().await {
        Ok(position) => position,
        Err(err) => {
            warn!(%err, "SOS aborted: no position");
            notifier.notify(Notice::error(err.to_string()));
            return Err(err.into());
        }
    };

    match api.send_sos(session, position, persons).await {
        Ok(receipt) => {
            info!(persons, "SOS alert sent");
            notifier.notify(Notice::success("SOS alert sent to the admin."));
            Ok(receipt)
        }
        Err(err) => {
            warn!(%err, "SOS alert failed");
            notifier.notify(Notice::error("Failed to send SOS alert."));
            Err(err.into())
        }
    }
}

/// Admin triage board over active and resolved SOS alerts.
///
/// `refresh` replaces both lists wholesale; `resolve` moves a single alert
/// across locally after the backend accepts the change, without re-fetching.
pub struct SosBoard {
    api: Arc<BackendClient>,
    session: Session,
    notifier: Arc<dyn Notifier>,
    origin: Option<GeoPoint>,
    active: Vec<Tagged<SosAlert>>,
    resolved: Vec<Tagged<SosAlert>>,
}

impl SosBoard {
    pub fn new(api: Arc<BackendClient>, session: Session, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            session,
            notifier,
            origin: None,
            active: Vec::new(),
            resolved: Vec::new(),
        }
    }

    pub fn active(&self) -> &[Tagged<SosAlert>] {
        &self.active
    }

    pub fn resolved(&self) -> &[Tagged<SosAlert>] {
        &self.resolved
    }

    pub fn origin(&self) -> Option<GeoPoint> {
        self.origin
    }

    /// Reload both lists for the given admin position, radius, and date
    /// window. On failure the previous lists stay in place.
    pub async fn refresh(
        &mut self,
        origin: GeoPoint,
        radius: Radius,
        window: DateWindow,
    ) -> Result<(), BackendError> {
        let active = match self.api.active_sos(&self.session, origin, radius, window).await {
            Ok(alerts) => alerts,
            Err(err) => {
                warn!(%err, "failed to load SOS alerts");
                self.notifier.notify(Notice::error("Failed to load SOS alerts."));
                return Err(err);
            }
        };

        let resolved = match self.api.resolved_sos(&self.session).await {
            Ok(alerts) => alerts,
            Err(err) => {
                warn!(%err, "failed to load resolved SOS alerts");
                self.notifier
                    .notify(Notice::error("Failed to load resolved SOS alerts."));
                return Err(err);
            }
        };

        self.origin = Some(origin);
        self.active = tag_and_sort(active, origin);
        self.resolved = resolved
            .into_iter()
            .map(|alert| Tagged::from_viewer(alert, origin))
            .collect();
        Ok(())
    }

    /// Mark one alert resolved. The record moves from the active to the
    /// resolved list without another round-trip.
    pub async fn resolve(&mut self, id: &str) -> Result<(), BackendError> {
        match self.api.resolve_sos(&self.session, id).await {
            Ok(()) => {
                if let Some(index) = self.active.iter().position(|entry| entry.item.id == id) {
                    let mut entry = self.active.remove(index);
                    entry.item.resolved = true;
                    self.resolved.insert(0, entry);
                }
                self.notifier.notify(Notice::success("SOS alert resolved."));
                Ok(())
            }
            Err(err) => {
                warn!(%err, id, "failed to resolve SOS alert");
                self.notifier
                    .notify(Notice::error("Failed to resolve SOS alert."));
                Err(err)
            }
        }
    }
}

/// Distance-tag alerts and order them nearest first; alerts with unusable
/// coordinates sink to the end instead of disappearing.
fn tag_and_sort(alerts: Vec<SosAlert>, origin: GeoPoint) -> Vec<Tagged<SosAlert>> {
    let mut tagged: Vec<Tagged<SosAlert>> = alerts
        .into_iter()
        .map(|alert| Tagged::from_viewer(alert, origin))
        .collect();

    tagged.sort_by(|a, b| match (a.distance_km, b.distance_km) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    tagged
}
