// ABOUTME: Domain services layered over the providers and database managers
// ABOUTME: Snapshot application, cross-provider aggregation and route estimation
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain services

/// Cross-provider peak search aggregation
pub mod aggregator;
/// Naismith-style route time estimation
pub mod estimate;
/// Fill-empty-only snapshot application onto peak records
pub mod snapshot;
