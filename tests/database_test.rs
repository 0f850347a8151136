// ABOUTME: Integration tests for the SQLite persistence layer
// ABOUTME: CRUD, uniqueness conflicts, owner scoping and snapshot persistence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use peak_planner::database::Database;
use peak_planner::models::{
    CreateAscentRequest, CreatePeakRequest, CreatePlanRequest, CreateRouteRequest, PlanStatus,
    UpdatePeakRequest, UpdatePlanRequest, UpdateRouteRequest,
};
use peak_planner::providers::OsmPeakSnapshot;
use peak_planner::services::snapshot;
use serde_json::json;
use uuid::Uuid;

async fn test_database() -> Result<Database> {
    Ok(Database::new("sqlite::memory:").await?)
}

fn peak_request(name: &str) -> CreatePeakRequest {
    CreatePeakRequest {
        name: name.to_owned(),
        region: Some("Washington".to_owned()),
        elevation_m: Some(4392.0),
        lat: Some(46.8523),
        lon: Some(-121.7603),
        grade: None,
        description: None,
    }
}

fn route_request(peak_id: Uuid, name: &str) -> CreateRouteRequest {
    CreateRouteRequest {
        peak_id,
        name: name.to_owned(),
        distance_km: Some(14.5),
        vert_gain_m: Some(2750.0),
        grade: Some("AD".to_owned()),
        season: Some("May-September".to_owned()),
        notes: None,
    }
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

#[tokio::test]
async fn test_peak_crud_roundtrip() -> Result<()> {
    let db = test_database().await?;
    let peaks = db.peaks();

    let created = peaks.create(&peak_request("Mount Rainier")).await?;
    assert_eq!(created.name, "Mount Rainier");

    let fetched = peaks.get(created.id).await?.unwrap();
    assert_eq!(fetched.region.as_deref(), Some("Washington"));
    assert_eq!(fetched.elevation_m, Some(4392.0));

    let updated = peaks
        .update(
            created.id,
            &UpdatePeakRequest {
                description: Some("Highest peak in the Cascades".to_owned()),
                ..UpdatePeakRequest::default()
            },
        )
        .await?;
    assert_eq!(
        updated.description.as_deref(),
        Some("Highest peak in the Cascades")
    );
    // Untouched fields survive the update
    assert_eq!(updated.elevation_m, Some(4392.0));

    assert!(peaks.delete(created.id).await?);
    assert!(peaks.get(created.id).await?.is_none());
    assert!(!peaks.delete(created.id).await?);
    Ok(())
}

#[tokio::test]
async fn test_peak_name_must_be_unique() -> Result<()> {
    let db = test_database().await?;
    let peaks = db.peaks();

    peaks.create(&peak_request("Mount Rainier")).await?;
    let error = peaks.create(&peak_request("Mount Rainier")).await.unwrap_err();
    assert_eq!(error.http_status(), 409);
    Ok(())
}

#[tokio::test]
async fn test_peak_list_filters() -> Result<()> {
    let db = test_database().await?;
    let peaks = db.peaks();

    peaks.create(&peak_request("Mount Rainier")).await?;
    let mut oregon = peak_request("Mount Hood");
    oregon.region = Some("Oregon".to_owned());
    peaks.create(&oregon).await?;

    let all = peaks.list(None, None, None).await?;
    assert_eq!(all.len(), 2);

    let by_search = peaks.list(Some("rain"), None, None).await?;
    assert_eq!(by_search.len(), 1);
    assert_eq!(by_search[0].name, "Mount Rainier");

    let by_region = peaks.list(None, Some("Oregon"), None).await?;
    assert_eq!(by_region.len(), 1);
    assert_eq!(by_region[0].name, "Mount Hood");
    Ok(())
}

#[tokio::test]
async fn test_route_requires_existing_peak() -> Result<()> {
    let db = test_database().await?;
    let error = db
        .routes()
        .create(&route_request(Uuid::new_v4(), "Ghost Route"))
        .await
        .unwrap_err();
    assert_eq!(error.http_status(), 404);
    Ok(())
}

#[tokio::test]
async fn test_route_crud_and_peak_scoped_uniqueness() -> Result<()> {
    let db = test_database().await?;
    let peak = db.peaks().create(&peak_request("Mount Rainier")).await?;
    let other = db.peaks().create(&peak_request("Mount Baker")).await?;
    let routes = db.routes();

    let created = routes
        .create(&route_request(peak.id, "Disappointment Cleaver"))
        .await?;

    // Same name on the same peak conflicts; on another peak it's fine
    let error = routes
        .create(&route_request(peak.id, "Disappointment Cleaver"))
        .await
        .unwrap_err();
    assert_eq!(error.http_status(), 409);
    routes
        .create(&route_request(other.id, "Disappointment Cleaver"))
        .await?;

    let listed = routes.list(Some(peak.id)).await?;
    assert_eq!(listed.len(), 1);

    let updated = routes
        .update(
            created.id,
            &UpdateRouteRequest {
                distance_km: Some(15.0),
                ..UpdateRouteRequest::default()
            },
        )
        .await?;
    assert_eq!(updated.distance_km, Some(15.0));
    assert_eq!(updated.vert_gain_m, Some(2750.0));

    assert!(routes.delete(created.id).await?);
    Ok(())
}

#[tokio::test]
async fn test_deleting_peak_cascades_to_routes() -> Result<()> {
    let db = test_database().await?;
    // SQLite needs this per connection; the pool is capped at one for :memory:
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(db.pool())
        .await?;

    let peak = db.peaks().create(&peak_request("Mount Rainier")).await?;
    let route = db
        .routes()
        .create(&route_request(peak.id, "Disappointment Cleaver"))
        .await?;

    db.peaks().delete(peak.id).await?;
    assert!(db.routes().get(route.id).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_plan_lifecycle_and_owner_scoping() -> Result<()> {
    let db = test_database().await?;
    let peak = db.peaks().create(&peak_request("Mount Rainier")).await?;
    let route = db
        .routes()
        .create(&route_request(peak.id, "Disappointment Cleaver"))
        .await?;
    let owner = db.users().create("a@example.com", None, "token-a").await?;
    let stranger = db.users().create("b@example.com", None, "token-b").await?;

    let plan = db
        .plans()
        .create(
            owner.id,
            &CreatePlanRequest {
                route_id: route.id,
                start_date: date("2026-09-05"),
                end_date: Some(date("2026-09-07")),
                team_size: Some(3),
                status: None,
                objectives: Some("Summit via DC".to_owned()),
                notes: None,
            },
        )
        .await?;
    assert_eq!(plan.status, PlanStatus::Planned);
    assert_eq!(plan.team_size, 3);

    // The stranger cannot see, update or delete the plan
    assert!(db.plans().get(plan.id, stranger.id).await?.is_none());
    assert!(db.plans().list(stranger.id, None, None).await?.is_empty());
    assert!(db.plans().delete(plan.id, stranger.id).await.is_ok_and(|d| !d));

    let updated = db
        .plans()
        .update(
            plan.id,
            owner.id,
            &UpdatePlanRequest {
                status: Some(PlanStatus::Ready),
                ..UpdatePlanRequest::default()
            },
        )
        .await?;
    assert_eq!(updated.status, PlanStatus::Ready);

    let ready = db
        .plans()
        .list(owner.id, Some(PlanStatus::Ready), None)
        .await?;
    assert_eq!(ready.len(), 1);
    let planned = db
        .plans()
        .list(owner.id, Some(PlanStatus::Planned), None)
        .await?;
    assert!(planned.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_plan_rejects_inverted_date_window() -> Result<()> {
    let db = test_database().await?;
    let peak = db.peaks().create(&peak_request("Mount Rainier")).await?;
    let route = db
        .routes()
        .create(&route_request(peak.id, "Disappointment Cleaver"))
        .await?;
    let owner = db.users().create("a@example.com", None, "token-a").await?;

    let error = db
        .plans()
        .create(
            owner.id,
            &CreatePlanRequest {
                route_id: route.id,
                start_date: date("2026-09-07"),
                end_date: Some(date("2026-09-05")),
                team_size: None,
                status: None,
                objectives: None,
                notes: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(error.http_status(), 400);
    Ok(())
}

#[tokio::test]
async fn test_ascent_logs_scoped_through_plan_ownership() -> Result<()> {
    let db = test_database().await?;
    let peak = db.peaks().create(&peak_request("Mount Rainier")).await?;
    let route = db
        .routes()
        .create(&route_request(peak.id, "Disappointment Cleaver"))
        .await?;
    let owner = db.users().create("a@example.com", None, "token-a").await?;
    let stranger = db.users().create("b@example.com", None, "token-b").await?;
    let plan = db
        .plans()
        .create(
            owner.id,
            &CreatePlanRequest {
                route_id: route.id,
                start_date: date("2026-09-05"),
                end_date: None,
                team_size: None,
                status: None,
                objectives: None,
                notes: None,
            },
        )
        .await?;

    // The stranger cannot log onto the owner's plan
    let error = db
        .ascents()
        .create(
            stranger.id,
            &CreateAscentRequest {
                plan_id: plan.id,
                outcome: "summit".to_owned(),
                time_hours: Some(9.5),
                notes: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(error.http_status(), 404);

    let log = db
        .ascents()
        .create(
            owner.id,
            &CreateAscentRequest {
                plan_id: plan.id,
                outcome: "summit".to_owned(),
                time_hours: Some(9.5),
                notes: Some("Clear skies".to_owned()),
            },
        )
        .await?;
    assert_eq!(log.outcome, "summit");

    assert!(db.ascents().get(log.id, stranger.id).await?.is_none());
    assert_eq!(db.ascents().list(owner.id, Some(plan.id)).await?.len(), 1);
    assert!(db.ascents().delete(log.id, owner.id).await?);
    Ok(())
}

#[tokio::test]
async fn test_file_database_created_on_demand() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("peak_planner.db");
    let url = format!("sqlite:{}", path.display());

    let db = Database::new(&url).await?;
    db.peaks().create(&peak_request("Mount Rainier")).await?;

    assert!(path.exists());
    Ok(())
}

#[tokio::test]
async fn test_user_token_lookup_stores_only_hash() -> Result<()> {
    let db = test_database().await?;
    let user = db
        .users()
        .create("a@example.com", Some("Alice"), "secret-token")
        .await?;
    assert_ne!(user.token_hash, "secret-token");

    let found = db.users().get_by_token("secret-token").await?.unwrap();
    assert_eq!(found.id, user.id);
    assert!(db.users().get_by_token("wrong-token").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_osm_snapshot_persists_fill_empty_only() -> Result<()> {
    let db = test_database().await?;
    let peaks = db.peaks();
    let mut peak = peaks
        .create(&CreatePeakRequest {
            name: "Mount Rainier".to_owned(),
            region: Some("Pacific Northwest".to_owned()),
            elevation_m: None,
            lat: None,
            lon: None,
            grade: None,
            description: None,
        })
        .await?;

    let osm = OsmPeakSnapshot {
        osm_id: "node:123".to_owned(),
        name: "Mount Rainier".to_owned(),
        lat: Some(46.8523),
        lon: Some(-121.7603),
        elevation_m: Some(4392.0),
        country: Some("US".to_owned()),
        region: Some("Washington".to_owned()),
        range: Some("Cascades".to_owned()),
        retrieved_at: Utc::now(),
        raw: json!({"type": "node", "id": 123}),
    };

    snapshot::apply_osm_snapshot(&peaks, &mut peak, &osm).await?;

    let stored = peaks.get(peak.id).await?.unwrap();
    // The preset region is kept; empty coordinates and elevation are filled
    assert_eq!(stored.region.as_deref(), Some("Pacific Northwest"));
    assert_eq!(stored.lat, Some(46.8523));
    assert_eq!(stored.elevation_m, Some(4392.0));
    assert_eq!(stored.external_source.as_deref(), Some("osm"));
    assert_eq!(stored.external_id.as_deref(), Some("node:123"));
    assert_eq!(stored.external_range.as_deref(), Some("Cascades"));
    assert!(stored.external_payload.is_some());
    Ok(())
}
