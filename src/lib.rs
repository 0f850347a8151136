// ABOUTME: Main library entry point for the Peak Planner backend
// ABOUTME: REST API over SQLite with external geo/weather provider integration
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![deny(unsafe_code)]

//! # Peak Planner
//!
//! A REST backend for planning mountain ascents. Peaks, climbing routes,
//! trip plans and ascent logs live in a relational store; peak records can
//! be enriched from public geo/weather providers (Overpass/OpenStreetMap,
//! OpenTopoData, Open-Meteo, the NPS places API and the Open Peaks
//! database).
//!
//! ## Architecture
//!
//! - **providers**: one client module per external provider, all sharing a
//!   retrying HTTP transport and a TTL cache
//! - **cache**: injected in-memory TTL cache addressed by deterministic
//!   fingerprints of normalized request parameters
//! - **services**: snapshot merge (fill-empty-only), cross-provider
//!   aggregation, route time estimation
//! - **database**: per-domain managers over a SQLite pool
//! - **routes**: axum routers per domain

/// Bearer-token authentication backed by the users table
pub mod auth;

/// TTL cache abstraction and in-memory implementation
pub mod cache;

/// Environment-based configuration management
pub mod config;

/// Application constants (TTLs, rounding precisions, allow-lists)
pub mod constants;

/// Dependency-injection bundle shared by route handlers
pub mod context;

/// SQLite persistence managers
pub mod database;

/// Unified error handling with standard error codes and HTTP responses
pub mod errors;

/// Structured logging configuration
pub mod logging;

/// Domain models and request/response types
pub mod models;

/// External provider clients (Overpass, OpenTopoData, Open-Meteo, NPS, Open Peaks)
pub mod providers;

/// HTTP routes organized by domain
pub mod routes;

/// Domain services: snapshot application, aggregation, estimation
pub mod services;
