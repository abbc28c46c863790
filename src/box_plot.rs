// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use crate::p2_quantile::P2Quantile;
use serde::{Deserialize, Serialize};

/// Box-plot view over a streaming median estimator.
///
/// Wraps a median (p = 0.5) [`P2Quantile`], whose lower and upper markers
/// then track the quartiles, and derives the usual box-plot summary
/// statistics: interquartile range, whiskers at 1.5 IQR, midhinge,
/// midrange and trimean.
///
/// # Example
///
/// ```
/// use stream_sketches::BoxPlot;
///
/// let mut bp = BoxPlot::new();
/// for x in 1..=100 {
///     bp.add(x as f64);
/// }
///
/// assert!((bp.median() - 50.0).abs() < 2.0);
/// assert!(bp.is_outlier(1000.0));
/// assert!(!bp.is_outlier(bp.median()));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxPlot {
    p2: P2Quantile,
}

impl BoxPlot {
    /// Creates an empty box plot.
    pub fn new() -> Self {
        Self {
            p2: P2Quantile::new(0.5),
        }
    }

    /// Adds a sample.
    pub fn add(&mut self, x: f64) {
        self.p2.add(x);
    }

    /// Number of samples seen so far.
    pub fn n(&self) -> u64 {
        self.p2.n()
    }

    /// Estimated median.
    pub fn median(&self) -> f64 {
        self.p2.quantile()
    }

    /// Estimated upper quartile.
    pub fn upper_quartile(&self) -> f64 {
        self.p2.upper_quantile()
    }

    /// Estimated lower quartile.
    pub fn lower_quartile(&self) -> f64 {
        self.p2.lower_quantile()
    }

    /// Estimated interquartile range.
    pub fn inter_quartile_range(&self) -> f64 {
        self.upper_quartile() - self.lower_quartile()
    }

    /// Estimated upper whisker, Q3 + 1.5 IQR.
    pub fn upper_whisker(&self) -> f64 {
        self.upper_quartile() + 1.5 * self.inter_quartile_range()
    }

    /// Estimated lower whisker, Q1 - 1.5 IQR.
    pub fn lower_whisker(&self) -> f64 {
        self.lower_quartile() - 1.5 * self.inter_quartile_range()
    }

    /// True if `x` falls outside the whiskers.
    pub fn is_outlier(&self, x: f64) -> bool {
        x < self.lower_whisker() || x > self.upper_whisker()
    }

    /// Average of the upper and lower quartiles.
    pub fn mid_hinge(&self) -> f64 {
        (self.upper_quartile() + self.lower_quartile()) / 2.0
    }

    /// Average of the maximum and minimum.
    pub fn mid_range(&self) -> f64 {
        (self.max() + self.min()) / 2.0
    }

    /// Average of the median and the midhinge.
    pub fn tri_mean(&self) -> f64 {
        (self.upper_quartile() + 2.0 * self.median() + self.lower_quartile()) / 4.0
    }

    /// Exact minimum seen so far.
    pub fn min(&self) -> f64 {
        self.p2.min()
    }

    /// Exact maximum seen so far.
    pub fn max(&self) -> f64 {
        self.p2.max()
    }
}

impl Default for BoxPlot {
    fn default() -> Self {
        Self::new()
    }
}
