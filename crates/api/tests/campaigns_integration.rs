//! Integration tests for campaign and donation endpoints.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    create_profile, delete_request, get_request, json_request, json_request_as,
    parse_response_body, setup, TestApp,
};
use domain::models::ProfileType;
use serde_json::json;
use tower::ServiceExt;

async fn create_campaign(app: &TestApp, slug: &str) -> serde_json::Value {
    let fundraiser = create_profile(app, ProfileType::Fundraiser).await;
    let response = app
        .router
        .clone()
        .oneshot(json_request_as(
            Method::POST,
            "/api/v1/campaigns",
            "fundraiser@example.org",
            json!({
                "fundraiserProfileId": fundraiser.audit.id,
                "title": "Clean Water",
                "description": "Wells for the valley",
                "slug": slug,
                "goalCents": 500_000
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    parse_response_body(response).await
}

#[tokio::test]
async fn test_create_and_get_campaign() {
    let app = setup().await;
    let created = create_campaign(&app, "clean-water").await;

    assert_eq!(created["status"], "active");
    assert_eq!(created["createdBy"], "fundraiser@example.org");
    assert_eq!(created["raisedCents"], 0);
    assert!(created.get("modifiedOn").is_none());

    let id = created["id"].as_i64().unwrap();
    assert!(id > 0);
    let response = app
        .router
        .oneshot(get_request(&format!("/api/v1/campaigns/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["slug"], "clean-water");
}

#[tokio::test]
async fn test_duplicate_slug_conflicts() {
    let app = setup().await;
    create_campaign(&app, "clean-water").await;

    let fundraiser = create_profile(&app, ProfileType::Fundraiser).await;
    let response = app
        .router
        .oneshot(json_request(
            Method::POST,
            "/api/v1/campaigns",
            json!({
                "fundraiserProfileId": fundraiser.audit.id,
                "title": "Another",
                "slug": "clean-water",
                "goalCents": 10_000
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_donor_profile_cannot_create_campaign() {
    let app = setup().await;
    let donor = create_profile(&app, ProfileType::Donor).await;

    let response = app
        .router
        .oneshot(json_request(
            Method::POST,
            "/api/v1/campaigns",
            json!({
                "fundraiserProfileId": donor.audit.id,
                "title": "Mine",
                "slug": "mine",
                "goalCents": 10_000
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_preserves_created_fields() {
    let app = setup().await;
    let created = create_campaign(&app, "clean-water").await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .router
        .clone()
        .oneshot(json_request_as(
            Method::PUT,
            &format!("/api/v1/campaigns/{}", id),
            "editor",
            json!({ "title": "Clean Water 2026", "goalCents": 750_000 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["title"], "Clean Water 2026");
    assert_eq!(body["createdBy"], created["createdBy"]);
    assert_eq!(body["createdOn"], created["createdOn"]);
    assert_eq!(body["modifiedBy"], "editor");

    let response = app
        .router
        .oneshot(json_request(
            Method::PUT,
            "/api/v1/campaigns/9999",
            json!({ "title": "Ghost", "goalCents": 1_000 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_status_toggle_and_listing() {
    let app = setup().await;
    let created = create_campaign(&app, "clean-water").await;
    let id = created["id"].as_i64().unwrap();

    // Warm the cached listing
    let response = app
        .router
        .clone()
        .oneshot(get_request("/api/v1/campaigns"))
        .await
        .unwrap();
    assert_eq!(parse_response_body(response).await.as_array().unwrap().len(), 1);

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            Method::PUT,
            &format!("/api/v1/campaigns/{}/status", id),
            json!({ "isActive": false }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .router
        .clone()
        .oneshot(get_request("/api/v1/campaigns"))
        .await
        .unwrap();
    assert!(parse_response_body(response).await.as_array().unwrap().is_empty());

    let response = app
        .router
        .clone()
        .oneshot(get_request("/api/v1/campaigns?includeInactive=true&search=WATER"))
        .await
        .unwrap();
    let listed = parse_response_body(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["status"], "inactive");

    let response = app
        .router
        .oneshot(json_request(
            Method::PUT,
            "/api/v1/campaigns/9999/status",
            json!({ "isActive": true }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_is_terminal() {
    let app = setup().await;
    let created = create_campaign(&app, "clean-water").await;
    let uri = format!("/api/v1/campaigns/{}", created["id"].as_i64().unwrap());

    let response = app.router.clone().oneshot(delete_request(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.router.clone().oneshot(get_request(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.router.clone().oneshot(delete_request(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .router
        .oneshot(json_request(
            Method::PUT,
            &format!("{}/status", uri),
            json!({ "isActive": true }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_donation_credits_campaign() {
    let app = setup().await;
    let campaign = create_campaign(&app, "clean-water").await;
    let campaign_id = campaign["id"].as_i64().unwrap();
    let donor = create_profile(&app, ProfileType::Donor).await;

    let response = app
        .router
        .clone()
        .oneshot(json_request_as(
            Method::POST,
            "/api/v1/donations",
            "donor@example.org",
            json!({
                "campaignId": campaign_id,
                "donorProfileId": donor.audit.id,
                "amountCents": 2_500,
                "currency": "usd",
                "recurring": true
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let donation = parse_response_body(response).await;
    assert_eq!(donation["paymentStatus"], "succeeded");
    assert_eq!(donation["currency"], "USD");
    assert_eq!(donation["isRecurring"], true);
    assert!(donation["nextChargeOn"].is_string());

    let response = app
        .router
        .clone()
        .oneshot(get_request(&format!("/api/v1/campaigns/{}", campaign_id)))
        .await
        .unwrap();
    let body = parse_response_body(response).await;
    assert_eq!(body["raisedCents"], 2_500);
    assert_eq!(body["progressPercent"], 0);

    let response = app
        .router
        .oneshot(get_request(&format!("/api/v1/campaigns/{}/donations", campaign_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(parse_response_body(response).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_donation_to_missing_campaign_is_404() {
    let app = setup().await;
    let donor = create_profile(&app, ProfileType::Donor).await;

    let response = app
        .router
        .oneshot(json_request(
            Method::POST,
            "/api/v1/donations",
            json!({
                "campaignId": 4242,
                "donorProfileId": donor.audit.id,
                "amountCents": 2_500
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_donation_validation() {
    let app = setup().await;
    let response = app
        .router
        .oneshot(json_request(
            Method::POST,
            "/api/v1/donations",
            json!({ "campaignId": 1, "donorProfileId": 1, "amountCents": 5 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
