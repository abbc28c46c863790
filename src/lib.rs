// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

//! # stream-sketches
//!
//! Single-pass, constant-space streaming estimators for summarizing
//! unbounded numeric and byte-string data streams: central moments, P²
//! quantiles and histograms, HyperLogLog and Linear Counting cardinality
//! sketches, and Bloom filters, all with parallel aggregation.
//!
//! Every estimator consumes items one at a time in O(1) (or O(b) for the
//! P² family) time, uses memory independent of the number of items seen,
//! and can be combined with another estimator built on a disjoint stream
//! to produce one equivalent to the estimator of the concatenated stream.
//!
//! Sketches are plain in-memory values with a lock-free single-writer
//! contract: queries and combine operations never mutate their inputs and
//! may run concurrently, while `add` requires exclusive access. Callers
//! that need multi-writer mutation wrap a sketch in their own lock.
//!
//! The cardinality and membership sketches are generic over the
//! [`Hash64`] capability; each sketch owns its hash, and sketches can only
//! be combined when their hashes agree (checked against a fixed canary
//! string). [`Fnv64`] is the default used throughout the tests.

pub mod bit_vector;
pub mod bloom_filter;
pub mod box_plot;
pub mod covar_stats;
pub mod ewma;
pub mod hash;
pub mod hyperloglog;
pub mod linear_counting;
pub mod moment_stats;
pub mod p2_histogram;
pub mod p2_quantile;
pub mod traits;

// Re-export core traits
pub use traits::{Hash64, SketchError};

// Re-export the sketch types and shipped hashes
pub use bit_vector::BitVector;
pub use bloom_filter::BloomFilter;
pub use box_plot::BoxPlot;
pub use covar_stats::CovarStats;
pub use ewma::Ewma;
pub use hash::{Fnv64, Fnv64a, Sip64};
pub use hyperloglog::HyperLogLog;
pub use linear_counting::LinearCounting;
pub use moment_stats::MomentStats;
pub use p2_histogram::{CumulativeDensity, P2Histogram};
pub use p2_quantile::P2Quantile;
