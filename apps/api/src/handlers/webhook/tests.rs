use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use axum::response::Response;
use seatrelay_application::{LicenseProvisioner, RelayService};
use seatrelay_core::{AppError, AppResult};
use seatrelay_domain::LicenseAction;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::api_router::build_router;
use crate::state::AppState;

#[derive(Default)]
struct CountingProvisioner {
    calls: AtomicUsize,
    upstream_failure: Option<u16>,
}

#[async_trait]
impl LicenseProvisioner for CountingProvisioner {
    async fn set_license(&self, _principal: &str, _action: LicenseAction) -> AppResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.upstream_failure {
            Some(status) => Err(AppError::Upstream {
                status,
                message: "seat assignment rejected".to_owned(),
            }),
            None => Ok(()),
        }
    }
}

async fn send(
    provisioner: Arc<CountingProvisioner>,
    method: Method,
    body: impl Into<Body>,
) -> Response {
    let router = build_router(AppState {
        relay_service: RelayService::new(provisioner),
    });
    let request = Request::builder()
        .method(method)
        .uri("/webhook")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap_or_else(|_| unreachable!());

    let response = router.oneshot(request).await;
    assert!(response.is_ok());
    response.unwrap_or_else(|_| unreachable!())
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await;
    assert!(bytes.is_ok());
    String::from_utf8_lossy(&bytes.unwrap_or_default()).into_owned()
}

const ADD_ALICE: &str = r#"[{"data":{"operationType":"Add user","targetResources":[{"type":"User","userPrincipalName":"alice"}]}}]"#;

#[tokio::test]
async fn add_user_batch_returns_ok_after_one_call() {
    let provisioner = Arc::new(CountingProvisioner::default());

    let response = send(provisioner.clone(), Method::POST, ADD_ALICE).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(provisioner.calls.load(Ordering::SeqCst), 1);
    assert!(body_text(response).await.is_empty());
}

#[tokio::test]
async fn unparseable_body_returns_bad_request() {
    let provisioner = Arc::new(CountingProvisioner::default());

    let response = send(provisioner.clone(), Method::POST, "not json").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(provisioner.calls.load(Ordering::SeqCst), 0);
    assert!(body_text(response).await.contains("error parsing request body"));
}

#[tokio::test]
async fn non_post_method_is_not_allowed() {
    let provisioner = Arc::new(CountingProvisioner::default());

    let response = send(provisioner.clone(), Method::GET, Body::empty()).await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(provisioner.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn license_failure_returns_server_error_and_stops() {
    let provisioner = Arc::new(CountingProvisioner {
        upstream_failure: Some(404),
        ..CountingProvisioner::default()
    });
    let body = json!([{
        "data": {
            "operationType": "Delete user",
            "targetResources": [
                {"type": "User", "userPrincipalName": "alice"},
                {"type": "User", "userPrincipalName": "bob"}
            ]
        }
    }])
    .to_string();

    let response = send(provisioner.clone(), Method::POST, body).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(provisioner.calls.load(Ordering::SeqCst), 1);
    let message = body_text(response).await;
    assert!(message.starts_with("error managing license"));
    assert!(message.contains("404"));
}

#[tokio::test]
async fn app_initiated_record_with_null_fields_is_relayed() {
    let provisioner = Arc::new(CountingProvisioner::default());
    let body = json!([{
        "data": {
            "initiatedBy": {"user": null},
            "operationType": "Add user",
            "targetResources": [
                {"type": "User", "userPrincipalName": "alice"},
                {"type": "Device", "userPrincipalName": null}
            ]
        }
    }])
    .to_string();

    let response = send(provisioner.clone(), Method::POST, body).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(provisioner.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unmapped_operation_still_succeeds() {
    let provisioner = Arc::new(CountingProvisioner::default());
    let body = json!([{
        "data": {
            "operationType": "Reset password",
            "targetResources": [{"type": "User", "userPrincipalName": "alice"}]
        }
    }])
    .to_string();

    let response = send(provisioner.clone(), Method::POST, body).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(provisioner.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn subscription_validation_echoes_code() {
    let provisioner = Arc::new(CountingProvisioner::default());
    let body = json!([{
        "id": "2d1781af-3a4c-4d7c-bd0c-e34b19da4e66",
        "eventType": "Microsoft.EventGrid.SubscriptionValidationEvent",
        "data": {"validationCode": "512d38b6-c7b8-40c8-89fe-f46f9e9622b6"}
    }])
    .to_string();

    let response = send(provisioner.clone(), Method::POST, body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = serde_json::from_str::<Value>(&body_text(response).await);
    assert!(payload.is_ok());
    assert_eq!(
        payload.unwrap_or_default(),
        json!({"validationResponse": "512d38b6-c7b8-40c8-89fe-f46f9e9622b6"})
    );
    assert_eq!(provisioner.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn health_route_reports_ok() {
    let router = build_router(AppState {
        relay_service: RelayService::new(Arc::new(CountingProvisioner::default())),
    });
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap_or_else(|_| unreachable!());

    let response = router.oneshot(request).await;
    assert!(response.is_ok());
    let response = response.unwrap_or_else(|_| unreachable!());

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, r#"{"status":"ok"}"#);
}
