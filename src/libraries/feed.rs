use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::models::{FoodRegion, GeoPoint, Located, NewsItem, Radius, Shelter, Tagged};
use crate::services::backend::{BackendClient, BackendError};
use crate::services::geolocate::{LocationError, LocationProvider};
use crate::services::notify::{Notice, Notifier};

/// Source of one resource kind's candidate list. The backend pre-filters by
/// the requested radius; implementations return whatever it sends back.
#[async_trait]
pub trait ResourceFetcher: Send + Sync + 'static {
    type Item: Located + Clone + Send + Sync + 'static;

    /// Resource kind label used in logs and notices.
    fn kind(&self) -> &'static str;

    async fn fetch(
        &self,
        origin: GeoPoint,
        radius: Radius,
    ) -> Result<Vec<Self::Item>, BackendError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPhase {
    Idle,
    Locating,
    LocationFailed,
    Loading,
    Loaded,
    LoadFailed,
}

/// Point-in-time copy of a feed's observable state.
#[derive(Debug, Clone)]
pub struct FeedSnapshot<T> {
    pub phase: FeedPhase,
    pub origin: Option<GeoPoint>,
    pub radius: Radius,
    pub items: Vec<Tagged<T>>,
}

struct FeedState<T> {
    phase: FeedPhase,
    origin: Option<GeoPoint>,
    radius: Radius,
    items: Vec<Tagged<T>>,
}

/// One page's proximity-filtered resource feed.
///
/// Lifecycle: `mount` acquires the position once (the outcome, success or
/// failure, is cached for the feed's lifetime) and triggers the first load;
/// `set_radius` re-triggers it. Every load carries a generation number taken
/// at trigger time, and a response is applied only while its generation is
/// still the latest issued, so a stale in-flight response can never clobber
/// a newer one regardless of arrival order.
pub struct ProximityFeed<F: ResourceFetcher> {
    fetcher: F,
    notifier: Arc<dyn Notifier>,
    timeout: Duration,
    generation: AtomicU64,
    position: OnceCell<Result<GeoPoint, LocationError>>,
    state: Mutex<FeedState<F::Item>>,
}

const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(15);

impl<F: ResourceFetcher> ProximityFeed<F> {
    pub fn new(fetcher: F, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            fetcher,
            notifier,
            timeout: DEFAULT_LOAD_TIMEOUT,
            generation: AtomicU64::new(0),
            position: OnceCell::new(),
            state: Mutex::new(FeedState {
                phase: FeedPhase::Idle,
                origin: None,
                radius: Radius::default(),
                items: Vec::new(),
            }),
        }
    }

    /// Bound on how long a single load may stay in flight before it is
    /// treated as failed.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn snapshot(&self) -> FeedSnapshot<F::Item> {
        let state = self.lock_state();
        FeedSnapshot {
            phase: state.phase,
            origin: state.origin,
            radius: state.radius,
            items: state.items.clone(),
        }
    }

    /// Acquire the device position and run the first load. Idempotent: only
    /// the call that moves the feed out of `Idle` proceeds, and the position
    /// query itself runs at most once no matter how many callers race here.
    pub async fn mount(&self, provider: &dyn LocationProvider) {
        {
            let mut state = self.lock_state();
            if state.phase != FeedPhase::Idle {
                return;
            }
            state.phase = FeedPhase::Locating;
        }

        let outcome = *self
            .position
            .get_or_init(|| async { provider.current_position().await })
            .await;

        match outcome {
            Ok(origin) => {
                self.lock_state().origin = Some(origin);
                self.reload().await;
            }
            Err(err) => {
                warn!(kind = self.fetcher.kind(), %err, "position unavailable");
                self.lock_state().phase = FeedPhase::LocationFailed;
                self.notifier.notify(Notice::error(err.to_string()));
            }
        }
    }

    /// Change the distance filter and, if the feed has a position, load the
    /// list for the new selection. Changing the radius while an earlier load
    /// is still in flight supersedes it.
    pub async fn set_radius(&self, radius: Radius) {
        let ready = {
            let mut state = self.lock_state();
            state.radius = radius;
            state.origin.is_some()
                && matches!(
                    state.phase,
                    FeedPhase::Loading | FeedPhase::Loaded | FeedPhase::LoadFailed
                )
        };
        if ready {
            self.reload().await;
        }
    }

    async fn reload(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let (origin, radius) = {
            let mut state = self.lock_state();
            let Some(origin) = state.origin else {
                return;
            };
            state.phase = FeedPhase::Loading;
            (origin, state.radius)
        };

        let result = tokio::time::timeout(self.timeout, self.fetcher.fetch(origin, radius)).await;

        let mut state = self.lock_state();
        if generation != self.generation.load(Ordering::SeqCst) {
            debug!(
                kind = self.fetcher.kind(),
                generation, "discarding superseded response"
            );
            return;
        }

        match result {
            Ok(Ok(items)) => {
                debug!(
                    kind = self.fetcher.kind(),
                    count = items.len(),
                    radius = radius.label(),
                    "feed loaded"
                );
                state.items = items
                    .into_iter()
                    .map(|item| Tagged::from_viewer(item, origin))
                    .collect();
                state.phase = FeedPhase::Loaded;
            }
            Ok(Err(err)) => {
                warn!(kind = self.fetcher.kind(), %err, "feed load failed");
                state.phase = FeedPhase::LoadFailed;
                self.notifier
                    .notify(Notice::error(format!("Failed to load {}.", self.fetcher.kind())));
            }
            Err(_) => {
                warn!(kind = self.fetcher.kind(), "feed load timed out");
                state.phase = FeedPhase::LoadFailed;
                self.notifier
                    .notify(Notice::error(format!("Failed to load {}.", self.fetcher.kind())));
            }
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, FeedState<F::Item>> {
        // The lock is only ever held for field access, never across an await.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Shelter listing backed by the relief backend.
pub struct ShelterFetcher {
    api: Arc<BackendClient>,
}

impl ShelterFetcher {
    pub fn new(api: Arc<BackendClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ResourceFetcher for ShelterFetcher {
    type Item = Shelter;

    fn kind(&self) -> &'static str {
        "shelters"
    }

    async fn fetch(
        &self,
        origin: GeoPoint,
        radius: Radius,
    ) -> Result<Vec<Shelter>, BackendError> {
        self.api.shelters(origin, radius).await
    }
}

/// Food-distribution region listing backed by the relief backend.
pub struct FoodRegionFetcher {
    api: Arc<BackendClient>,
}

impl FoodRegionFetcher {
    pub fn new(api: Arc<BackendClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ResourceFetcher for FoodRegionFetcher {
    type Item = FoodRegion;

    fn kind(&self) -> &'static str {
        "food regions"
    }

    async fn fetch(
        &self,
        origin: GeoPoint,
        radius: Radius,
    ) -> Result<Vec<FoodRegion>, BackendError> {
        self.api.food_regions(origin, radius).await
    }
}

/// News listing backed by the relief backend.
pub struct NewsFetcher {
    api: Arc<BackendClient>,
}

impl NewsFetcher {
    pub fn new(api: Arc<BackendClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ResourceFetcher for NewsFetcher {
    type Item = NewsItem;

    fn kind(&self) -> &'static str {
        "news"
    }

    async fn fetch(
        &self,
        origin: GeoPoint,
        radius: Radius,
    ) -> Result<Vec<NewsItem>, BackendError> {
        self.api.news(origin, radius).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::services::geolocate::{FixedPosition, Unsupported};
    use crate::services::notify::testing::RecordingNotifier;
    use crate::services::notify::Severity;

    #[derive(Debug, Clone)]
    struct Beacon {
        id: &'static str,
        latitude: f64,
        longitude: f64,
    }

    impl Located for Beacon {
        fn position(&self) -> GeoPoint {
            GeoPoint::new(self.latitude, self.longitude)
        }
    }

    struct StaticFetcher {
        calls: AtomicUsize,
        items: Vec<Beacon>,
    }

    impl StaticFetcher {
        fn new(items: Vec<Beacon>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                items,
            }
        }
    }

    #[async_trait]
    impl ResourceFetcher for StaticFetcher {
        type Item = Beacon;

        fn kind(&self) -> &'static str {
            "beacons"
        }

        async fn fetch(
            &self,
            _origin: GeoPoint,
            _radius: Radius,
        ) -> Result<Vec<Beacon>, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.items.clone())
        }
    }

    struct CountingProvider {
        calls: AtomicUsize,
        point: GeoPoint,
    }

    #[async_trait]
    impl LocationProvider for CountingProvider {
        async fn current_position(&self) -> Result<GeoPoint, LocationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.point)
        }
    }

    #[tokio::test]
    async fn test_denied_location_never_fetches() {
        let notifier = Arc::new(RecordingNotifier::default());
        let feed = ProximityFeed::new(StaticFetcher::new(vec![]), notifier.clone());

        feed.mount(&Unsupported).await;
        feed.set_radius(Radius::Km150).await;

        let snapshot = feed.snapshot();
        assert_eq!(snapshot.phase, FeedPhase::LocationFailed);
        assert!(snapshot.items.is_empty());
        assert_eq!(feed.fetcher.calls.load(Ordering::SeqCst), 0);

        let notices = notifier.taken();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].severity, Severity::Error);
    }

    #[tokio::test]
    async fn test_mount_is_idempotent() {
        let provider = CountingProvider {
            calls: AtomicUsize::new(0),
            point: GeoPoint::new(13.0, 80.0),
        };
        let feed = Arc::new(ProximityFeed::new(
            StaticFetcher::new(vec![]),
            Arc::new(RecordingNotifier::default()),
        ));

        feed.mount(&provider).await;
        feed.mount(&provider).await;

        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        assert_eq!(feed.fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(feed.snapshot().phase, FeedPhase::Loaded);
    }

    #[tokio::test]
    async fn test_radius_change_before_mount_does_nothing() {
        let feed = ProximityFeed::new(
            StaticFetcher::new(vec![]),
            Arc::new(RecordingNotifier::default()) as Arc<dyn Notifier>,
        );

        feed.set_radius(Radius::Km5).await;

        assert_eq!(feed.snapshot().phase, FeedPhase::Idle);
        assert_eq!(feed.fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_backend_inclusion_is_trusted() {
        // 0.036/0.081/0.108 degrees of longitude at the equator are roughly
        // 4, 9, and 12 km. With a 10 km radius the backend still decides who
        // is in; the 12 km item stays and simply shows its real distance.
        let items = vec![
            Beacon { id: "near", latitude: 0.0, longitude: 0.036 },
            Beacon { id: "mid", latitude: 0.0, longitude: 0.081 },
            Beacon { id: "far", latitude: 0.0, longitude: 0.108 },
        ];
        let feed = ProximityFeed::new(
            StaticFetcher::new(items),
            Arc::new(RecordingNotifier::default()) as Arc<dyn Notifier>,
        );

        feed.mount(&FixedPosition(GeoPoint::new(0.0, 0.0))).await;
        feed.set_radius(Radius::Km10).await;

        let snapshot = feed.snapshot();
        assert_eq!(snapshot.phase, FeedPhase::Loaded);
        assert_eq!(snapshot.items.len(), 3);

        let far = snapshot
            .items
            .iter()
            .find(|tagged| tagged.item.id == "far")
            .expect("far beacon retained");
        let distance = far.distance_km.expect("valid coordinates");
        assert!((distance - 12.0).abs() < 0.1, "got {distance} km");
    }
}
