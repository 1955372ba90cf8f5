use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::routing::post;
use axum::{Json, Router};
use relief_client::{
    send_sos, BackendClient, Config, FixedPosition, GeoPoint, Notice, Notifier, Session, Severity,
    SosError, Unsupported, ValidationError,
};

#[derive(Debug, Default)]
struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    fn taken(&self) -> Vec<Notice> {
        self.notices.lock().expect("notifier lock").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().expect("notifier lock").push(notice);
    }
}

async fn sos_mock() -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();

    let app = Router::new().route(
        "/sos/sos",
        post(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Json(serde_json::json!({
                    "message": "SOS request sent successfully!",
                    "latitude": 13.05,
                    "longitude": 80.25,
                    "persons": 2
                }))
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve mock");
    });
    (format!("http://{addr}"), hits)
}

fn client_for(base_url: &str) -> BackendClient {
    let config = Config {
        backend_url: base_url.to_string(),
        ..Config::default()
    };
    BackendClient::new(&config).expect("client builds")
}

fn session() -> Session {
    Session::new("token-123", "refresh-456", "7", "asha")
}

#[tokio::test]
async fn zero_persons_never_reaches_the_network() {
    let (base, hits) = sos_mock().await;
    let api = client_for(&base);
    let notifier = RecordingNotifier::default();
    let provider = FixedPosition(GeoPoint::new(13.05, 80.25));

    let result = send_sos(&api, &session(), &provider, &notifier, 0).await;

    assert!(matches!(
        result,
        Err(SosError::Validation(ValidationError::PersonsOutOfRange))
    ));
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    let notices = notifier.taken();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, Severity::Error);
}

#[tokio::test]
async fn successful_submission_notifies_exactly_once() {
    let (base, hits) = sos_mock().await;
    let api = client_for(&base);
    let notifier = RecordingNotifier::default();
    let provider = FixedPosition(GeoPoint::new(13.05, 80.25));

    let receipt = send_sos(&api, &session(), &provider, &notifier, 2)
        .await
        .expect("submission accepted");

    assert_eq!(receipt.persons, 2);
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    let notices = notifier.taken();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, Severity::Success);
}

#[tokio::test]
async fn missing_location_capability_stops_before_the_network() {
    let (base, hits) = sos_mock().await;
    let api = client_for(&base);
    let notifier = RecordingNotifier::default();

    let result = send_sos(&api, &session(), &Unsupported, &notifier, 2).await;

    assert!(matches!(result, Err(SosError::Location(_))));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert_eq!(notifier.taken().len(), 1);
}
