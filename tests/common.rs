// ABOUTME: Shared test utilities for integration tests
// ABOUTME: Stub HTTP transport, cache and provider-config helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]

//! Shared test utilities for `peak_planner`
//!
//! Provides a recording stub transport that stands in for the real
//! HTTP client, plus helpers for caches, provider configs and peaks.

use chrono::Utc;
use peak_planner::cache::{memory::InMemoryCache, CacheConfig, CacheProvider};
use peak_planner::config::ProviderConfig;
use peak_planner::models::Peak;
use peak_planner::providers::{HttpFetch, ProviderError};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

/// Canned-response transport standing in for [`peak_planner::providers::HttpClient`].
/// Responses are consumed in FIFO order; an exhausted queue fails the
/// request, which makes unexpected extra calls visible in assertions.
pub struct StubFetch {
    responses: Mutex<VecDeque<Result<Value, ProviderError>>>,
    get_calls: AtomicUsize,
    post_calls: AtomicUsize,
    last_query: Mutex<Vec<(String, String)>>,
    last_form: Mutex<Vec<(String, String)>>,
}

impl StubFetch {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            get_calls: AtomicUsize::new(0),
            post_calls: AtomicUsize::new(0),
            last_query: Mutex::new(Vec::new()),
            last_form: Mutex::new(Vec::new()),
        }
    }

    pub fn with_response(payload: Value) -> Self {
        let stub = Self::new();
        stub.push_ok(payload);
        stub
    }

    pub fn push_ok(&self, payload: Value) {
        self.responses.lock().unwrap().push_back(Ok(payload));
    }

    pub fn push_err(&self, error: ProviderError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Total number of outbound requests, both GET and POST
    pub fn calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst) + self.post_calls.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Vec<(String, String)> {
        self.last_query.lock().unwrap().clone()
    }

    pub fn last_form(&self) -> Vec<(String, String)> {
        self.last_form.lock().unwrap().clone()
    }

    fn next_response(&self) -> Result<Value, ProviderError> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(ProviderError::RequestFailed(
                    "stub transport: no response queued".into(),
                ))
            })
    }
}

impl Default for StubFetch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl HttpFetch for StubFetch {
    async fn get_json(
        &self,
        _url: &str,
        query: &[(String, String)],
        _headers: &[(String, String)],
    ) -> Result<Value, ProviderError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = query.to_vec();
        self.next_response()
    }

    async fn post_form_json(
        &self,
        _url: &str,
        form: &[(String, String)],
    ) -> Result<Value, ProviderError> {
        self.post_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_form.lock().unwrap() = form.to_vec();
        self.next_response()
    }
}

/// Cache without the background cleanup task (avoids runtime conflicts)
pub async fn test_cache() -> InMemoryCache {
    InMemoryCache::new(CacheConfig {
        enable_background_cleanup: false,
        ..CacheConfig::default()
    })
    .await
    .unwrap()
}

pub fn provider_config(base_url: &str) -> ProviderConfig {
    ProviderConfig {
        base_url: base_url.to_owned(),
        timeout_secs: 5,
        max_retries: 0,
        api_key: None,
    }
}

/// A peak with only a name set, as freshly created through the API
pub fn blank_peak(name: &str) -> Peak {
    let now = Utc::now();
    Peak {
        id: Uuid::new_v4(),
        name: name.to_owned(),
        region: None,
        elevation_m: None,
        lat: None,
        lon: None,
        grade: None,
        description: None,
        external_source: None,
        external_id: None,
        external_country: None,
        external_range: None,
        external_elevation_m: None,
        external_retrieved_at: None,
        external_payload: None,
        created_at: now,
        updated_at: now,
    }
}
