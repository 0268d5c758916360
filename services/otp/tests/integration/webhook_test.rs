use std::time::Duration as StdDuration;

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use chrono::Utc;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use simpleotp_otp::domain::repository::WebhookNotifier;
use simpleotp_otp::domain::types::WebhookEvent;
use simpleotp_otp::infra::webhook::{HttpWebhookNotifier, WebhookError};

/// Starts a receiver on an OS-assigned port that forwards bodies to the channel
/// and answers with `status`.
async fn spawn_receiver(status: StatusCode) -> (String, mpsc::Receiver<Value>) {
    let (tx, rx) = mpsc::channel(8);
    let app = Router::new()
        .route(
            "/h",
            post(
                move |State(tx): State<mpsc::Sender<Value>>, Json(body): Json<Value>| async move {
                    let _ = tx.send(body).await;
                    status
                },
            ),
        )
        .with_state(tx);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://127.0.0.1:{port}/h"), rx)
}

fn event() -> WebhookEvent {
    WebhookEvent {
        otp_id: "0123456789abcdef0123456789abcdef".to_owned(),
        email: Some("user@example.com".to_owned()),
        verified_at: Utc::now(),
        redirect: None,
    }
}

#[tokio::test]
async fn should_post_event_as_json() {
    let (url, mut rx) = spawn_receiver(StatusCode::NO_CONTENT).await;
    let notifier = HttpWebhookNotifier::default();

    notifier.deliver(&url, &event()).await.unwrap();

    let body = rx.recv().await.unwrap();
    assert_eq!(body["otpId"], "0123456789abcdef0123456789abcdef");
    assert_eq!(body["email"], "user@example.com");
    assert!(body["verifiedAt"].is_string());
    assert!(body["redirect"].is_null());
}

#[tokio::test]
async fn should_fail_on_non_success_status() {
    let (url, _rx) = spawn_receiver(StatusCode::INTERNAL_SERVER_ERROR).await;
    let notifier = HttpWebhookNotifier::default();

    let result = notifier.deliver(&url, &event()).await;

    assert!(
        matches!(result, Err(WebhookError::Status(StatusCode::INTERNAL_SERVER_ERROR))),
        "expected Status(500), got {result:?}"
    );
}

#[tokio::test]
async fn should_fail_on_unreachable_endpoint() {
    // bind then drop to obtain a port nobody listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let result = HttpWebhookNotifier::default()
        .deliver(&format!("http://127.0.0.1:{port}/h"), &event())
        .await;

    assert!(matches!(result, Err(WebhookError::Transport(_))));
}

#[tokio::test]
async fn should_deliver_in_background_from_notify() {
    let (url, mut rx) = spawn_receiver(StatusCode::OK).await;
    let notifier = HttpWebhookNotifier::default();

    notifier.notify(&url, event());

    let body = tokio::time::timeout(StdDuration::from_secs(5), rx.recv())
        .await
        .expect("webhook not delivered in time")
        .unwrap();
    assert_eq!(body["otpId"], "0123456789abcdef0123456789abcdef");
}

#[tokio::test]
async fn should_swallow_background_failures() {
    let (url, mut rx) = spawn_receiver(StatusCode::BAD_GATEWAY).await;
    let notifier = HttpWebhookNotifier::default();

    // returns immediately; the failure is only logged
    notifier.notify(&url, event());

    let body = tokio::time::timeout(StdDuration::from_secs(5), rx.recv())
        .await
        .expect("webhook attempt not made in time")
        .unwrap();
    assert_eq!(body["otpId"], "0123456789abcdef0123456789abcdef");
}
