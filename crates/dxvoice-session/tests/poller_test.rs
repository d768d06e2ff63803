use axum::{http::StatusCode, routing::get, Json, Router};
use dxvoice_session::{BackendClient, DiagnosticPoller, FetchOutcome, SessionError};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

const SETTLE: Duration = Duration::from_millis(200);

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Serves a fixed report and counts requests.
async fn counting_backend(hits: Arc<AtomicUsize>) -> SocketAddr {
    let router = Router::new().route(
        "/api/diagnostic-data",
        get(move || {
            let hits = Arc::clone(&hits);
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                Json(json!({"data": {"content": "Report"}}))
            }
        }),
    );
    serve(router).await
}

fn poller(addr: SocketAddr) -> DiagnosticPoller {
    let client = BackendClient::new(format!("http://{}", addr), Duration::from_secs(5)).unwrap();
    DiagnosticPoller::new(Arc::new(client), SETTLE)
}

fn reporter(tx: &mpsc::UnboundedSender<FetchOutcome>) -> impl FnOnce(FetchOutcome) + Send + 'static {
    let tx = tx.clone();
    move |outcome| {
        let _ = tx.send(outcome);
    }
}

#[tokio::test]
async fn test_burst_of_messages_fetches_once() {
    let hits = Arc::new(AtomicUsize::new(0));
    let addr = counting_backend(Arc::clone(&hits)).await;
    let mut poller = poller(addr);
    let (tx, mut rx) = mpsc::unbounded_channel();

    assert!(poller.observe_count(1, reporter(&tx)));
    tokio::time::sleep(SETTLE / 4).await;
    assert!(poller.observe_count(2, reporter(&tx)));

    let outcome = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(outcome.unwrap().unwrap().main_content, "Report");

    tokio::time::sleep(SETTLE * 2).await;
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_fetch_waits_for_settle_delay() {
    let hits = Arc::new(AtomicUsize::new(0));
    let addr = counting_backend(Arc::clone(&hits)).await;
    let mut poller = poller(addr);
    let (tx, mut rx) = mpsc::unbounded_channel();

    let start = tokio::time::Instant::now();
    poller.observe_count(1, reporter(&tx));
    tokio::time::sleep(SETTLE / 2).await;
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert!(start.elapsed() >= SETTLE);
}

#[tokio::test]
async fn test_cancel_before_delay_skips_fetch() {
    let hits = Arc::new(AtomicUsize::new(0));
    let addr = counting_backend(Arc::clone(&hits)).await;
    let mut poller = poller(addr);
    let (tx, mut rx) = mpsc::unbounded_channel();

    poller.observe_count(3, reporter(&tx));
    assert!(poller.cancel());
    drop(tx);

    assert!(tokio::time::timeout(SETTLE * 3, rx.recv())
        .await
        .unwrap()
        .is_none());
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_failed_fetch_reports_error() {
    let router = Router::new().route(
        "/api/diagnostic-data",
        get(|| async { StatusCode::BAD_GATEWAY }),
    );
    let mut poller = poller(serve(router).await);
    let (tx, mut rx) = mpsc::unbounded_channel();

    poller.observe_count(1, reporter(&tx));
    let outcome = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(outcome, Err(SessionError::DiagnosticStatus(502))));
}
