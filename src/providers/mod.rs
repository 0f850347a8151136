// ABOUTME: External provider clients for geo and weather data enrichment
// ABOUTME: Each provider module owns its query shape, normalization and cache keys
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # External Data Providers
//!
//! One client module per upstream service. All clients share the
//! [`HttpFetch`] transport seam (retrying `reqwest` in production, stubs
//! in tests) and an injected TTL cache keyed by deterministic
//! fingerprints of the normalized request parameters.

/// Provider error taxonomy
pub mod errors;
/// HTTP transport seam with retry and rate-limit classification
pub mod http;
/// NPS places API client
pub mod nps;
/// Open-Meteo forecast client
pub mod open_meteo;
/// Open Peaks database client
pub mod open_peaks;
/// OpenTopoData point elevation client
pub mod opentopo;
/// Overpass (OpenStreetMap) peak search client
pub mod overpass;

pub(crate) mod util;

pub use errors::ProviderError;
pub use http::{HttpClient, HttpFetch};
pub use nps::{NpsClient, NpsPlaceSnapshot};
pub use open_meteo::{ForecastBundle, OpenMeteoClient};
pub use open_peaks::{OpenPeaksClient, OpenPeaksSnapshot};
pub use opentopo::OpenTopoClient;
pub use overpass::{OsmPeakSnapshot, OverpassClient};
