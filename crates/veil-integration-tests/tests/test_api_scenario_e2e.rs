//! End-to-end HTTP scenario against the assembled router.
//!
//! Walks the whole story over the wire: register two identities, submit
//! a report, look it up by reference code, vote on it, raise an alert,
//! and drive the lifecycle to resolution. Every step uses only what a
//! real client would have.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use veil_api::routes::ProofDto;
use veil_api::state::AppState;
use veil_core::{ActionKind, ActionScope, ScopeGroup, TopicId};
use veil_proof::{HashProofBackend, Identity, ProofBackend};

fn app() -> axum::Router {
    veil_api::app(AppState::in_memory(ScopeGroup::default()))
}

async fn call(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    let request = match body {
        Some(json) => builder.body(Body::from(json.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

fn proof_json(identity: &Identity, kind: ActionKind, topic: &str) -> serde_json::Value {
    let scope = ActionScope::new(kind, TopicId::new(topic).unwrap());
    let proof = HashProofBackend.prove(identity, &scope).unwrap();
    let dto = ProofDto::from_proof(&proof);
    serde_json::json!({
        "public_signals": dto.public_signals,
        "proof_blob": dto.proof_blob,
    })
}

async fn register(app: &axum::Router, identity: &Identity) {
    let (status, _) = call(
        app,
        "POST",
        "/v1/identities",
        Some(serde_json::json!({ "commitment": identity.commitment().to_hex() })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_full_reporting_scenario() {
    let app = app();
    let reporter = Identity::derive(ScopeGroup::default());
    let supporter = Identity::derive(ScopeGroup::default());
    register(&app, &reporter).await;
    register(&app, &supporter).await;

    // Submit a report.
    let (status, artifact) = call(
        &app,
        "POST",
        "/v1/artifacts",
        Some(serde_json::json!({
            "proof": proof_json(&reporter, ActionKind::Submit, "group:reports-v1"),
            "payload": "unlicensed venting of solvents on the night shift",
            "priority": "high",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{artifact}");
    let reference_id = artifact["reference_id"].as_str().unwrap().to_string();
    assert_eq!(artifact["status"], "submitted");

    // Anyone can look it up by reference code, and the view carries the
    // tamper-evidence fields but not the commitment.
    let (status, view) = call(&app, "GET", &format!("/v1/artifacts/{reference_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["payload_digest"].as_str().unwrap().len(), 64);
    assert!(view.get("scope_commitment").is_none());

    // The supporter votes; the reporter can vote too (different scope
    // from the submission).
    let topic = format!("artifact:{reference_id}");
    for (identity, expected) in [(&supporter, 1), (&reporter, 2)] {
        let (status, vote) = call(
            &app,
            "POST",
            &format!("/v1/artifacts/{reference_id}/support"),
            Some(serde_json::json!({
                "proof": proof_json(identity, ActionKind::Upvote, &topic),
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{vote}");
        assert_eq!(vote["support_count"], expected);
    }

    // The reporter still has their alert available.
    let (status, alert) = call(
        &app,
        "POST",
        "/v1/alerts",
        Some(serde_json::json!({
            "proof": proof_json(&reporter, ActionKind::EmergencyAlert, "group:reports-v1"),
            "payload": "workers showing acute exposure symptoms",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{alert}");
    assert_eq!(alert["priority"], "critical");

    // An operator drives the report to resolution.
    for target in ["under_review", "in_progress", "resolved"] {
        let (status, updated) = call(
            &app,
            "POST",
            &format!("/v1/artifacts/{reference_id}/status"),
            Some(serde_json::json!({ "status": target, "operator": "inspector-4" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{updated}");
        assert_eq!(updated["status"], target);
    }

    // Listing shows both the report and the alert.
    let (status, list) = call(&app, "GET", "/v1/artifacts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 2);

    // Resolved artifacts reject further votes.
    let late_voter = Identity::derive(ScopeGroup::default());
    register(&app, &late_voter).await;
    let (status, body) = call(
        &app,
        "POST",
        &format!("/v1/artifacts/{reference_id}/support"),
        Some(serde_json::json!({
            "proof": proof_json(&late_voter, ActionKind::Upvote, &topic),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_proof_for_wrong_artifact_is_rejected() {
    let app = app();
    let reporter = Identity::derive(ScopeGroup::default());
    let voter = Identity::derive(ScopeGroup::default());
    register(&app, &reporter).await;
    register(&app, &voter).await;

    let (_, artifact) = call(
        &app,
        "POST",
        "/v1/artifacts",
        Some(serde_json::json!({
            "proof": proof_json(&reporter, ActionKind::Submit, "group:reports-v1"),
            "payload": "a report",
        })),
    )
    .await;
    let reference_id = artifact["reference_id"].as_str().unwrap();

    // Proof bound to a different artifact topic fails closed.
    let (status, body) = call(
        &app,
        "POST",
        &format!("/v1/artifacts/{reference_id}/support"),
        Some(serde_json::json!({
            "proof": proof_json(&voter, ActionKind::Upvote, "artifact:SOMEOTHERREF"),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "INVALID_PROOF");
}
