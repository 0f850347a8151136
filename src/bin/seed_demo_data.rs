// ABOUTME: Demo data seeder for local Peak Planner testing
// ABOUTME: Creates a demo user with a known token plus a few peaks and routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Demo data seeder for Peak Planner.
//!
//! Populates the database with a demo user, a handful of Cascade peaks
//! and standard routes on them, so the API can be exercised right away.
//!
//! Usage:
//! ```bash
//! cargo run --bin seed-demo-data
//! cargo run --bin seed-demo-data -- --database-url sqlite:./data/peak_planner.db
//! ```

use anyhow::Result;
use clap::Parser;
use peak_planner::config::ServerConfig;
use peak_planner::database::Database;
use peak_planner::logging;
use peak_planner::models::{CreatePeakRequest, CreateRouteRequest};
use tracing::info;

/// Bearer token for the demo user. For local testing only.
const DEMO_TOKEN: &str = "demo-token-peak-planner";

#[derive(Parser)]
#[command(
    name = "seed-demo-data",
    about = "Peak Planner demo data seeder",
    long_about = "Populate the database with a demo user, peaks and routes for local testing"
)]
struct SeedArgs {
    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,
}

struct DemoPeak {
    name: &'static str,
    region: &'static str,
    elevation_m: f64,
    lat: f64,
    lon: f64,
    routes: &'static [DemoRoute],
}

struct DemoRoute {
    name: &'static str,
    distance_km: f64,
    vert_gain_m: f64,
    grade: &'static str,
    season: &'static str,
}

const DEMO_PEAKS: &[DemoPeak] = &[
    DemoPeak {
        name: "Mount Rainier",
        region: "Washington",
        elevation_m: 4392.0,
        lat: 46.8523,
        lon: -121.7603,
        routes: &[
            DemoRoute {
                name: "Disappointment Cleaver",
                distance_km: 14.5,
                vert_gain_m: 2750.0,
                grade: "AD",
                season: "May-September",
            },
            DemoRoute {
                name: "Emmons-Winthrop",
                distance_km: 16.0,
                vert_gain_m: 3100.0,
                grade: "AD",
                season: "June-August",
            },
        ],
    },
    DemoPeak {
        name: "Mount Baker",
        region: "Washington",
        elevation_m: 3286.0,
        lat: 48.7768,
        lon: -121.8145,
        routes: &[DemoRoute {
            name: "Coleman-Deming",
            distance_km: 12.0,
            vert_gain_m: 2200.0,
            grade: "PD",
            season: "May-August",
        }],
    },
    DemoPeak {
        name: "Mount Hood",
        region: "Oregon",
        elevation_m: 3429.0,
        lat: 45.3735,
        lon: -121.6959,
        routes: &[DemoRoute {
            name: "South Side",
            distance_km: 10.5,
            vert_gain_m: 1600.0,
            grade: "PD",
            season: "April-June",
        }],
    },
];

#[tokio::main]
async fn main() -> Result<()> {
    let args = SeedArgs::parse();
    logging::init_from_env()?;

    let config = ServerConfig::from_env()?;
    let database_url = args.database_url.unwrap_or(config.database_url);
    info!("Seeding database at {database_url}");

    let database = Database::new(&database_url).await?;

    let user = database
        .users()
        .create("demo@example.com", Some("Demo Climber"), DEMO_TOKEN)
        .await?;
    info!("Created demo user {} ({})", user.email, user.id);

    for demo in DEMO_PEAKS {
        let peak = database
            .peaks()
            .create(&CreatePeakRequest {
                name: demo.name.to_owned(),
                region: Some(demo.region.to_owned()),
                elevation_m: Some(demo.elevation_m),
                lat: Some(demo.lat),
                lon: Some(demo.lon),
                grade: None,
                description: None,
            })
            .await?;
        info!("Created peak {} ({})", peak.name, peak.id);

        for route in demo.routes {
            let created = database
                .routes()
                .create(&CreateRouteRequest {
                    peak_id: peak.id,
                    name: route.name.to_owned(),
                    distance_km: Some(route.distance_km),
                    vert_gain_m: Some(route.vert_gain_m),
                    grade: Some(route.grade.to_owned()),
                    season: Some(route.season.to_owned()),
                    notes: None,
                })
                .await?;
            info!("  Created route {} ({})", created.name, created.id);
        }
    }

    info!("Seeding complete. Demo bearer token: {DEMO_TOKEN}");
    Ok(())
}
