// ABOUTME: Configuration module root re-exporting the environment configuration
// ABOUTME: All runtime configuration is sourced from environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration management

pub mod environment;

pub use environment::{CacheTtlSettings, ProviderConfig, ProvidersConfig, ServerConfig};
