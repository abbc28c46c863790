// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Running central moments of a stream, up to fourth order.
///
/// Maintains the sample count, mean and the second through fourth central
/// sums of powers in a single pass over the data, using Pébay's update
/// formulas. Mean, variance, skewness and excess kurtosis are read off in
/// O(1) at any point, and two trackers built on disjoint streams combine
/// into one equivalent to a tracker fed the concatenated stream.
///
/// # Key Properties
///
/// - **Single pass**: each sample is consumed once, in O(1) time and space.
/// - **Numerically stable**: centered updates avoid the catastrophic
///   cancellation of the naive sum-of-squares formulas.
/// - **Mergeable**: `combine` is exact up to floating-point rounding, which
///   makes the tracker suitable for parallel aggregation.
///
/// # Example
///
/// ```
/// use stream_sketches::MomentStats;
///
/// let mut stats = MomentStats::new();
/// for x in 1..=100 {
///     stats.add(x as f64);
/// }
///
/// assert_eq!(stats.n(), 100);
/// assert!((stats.mean() - 50.5).abs() < 1e-9);
/// assert!((stats.variance() - 841.6666666666666).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MomentStats {
    n: u64,
    m1: f64,
    m2: f64,
    m3: f64,
    m4: f64,
}

impl MomentStats {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a sample.
    ///
    /// The fourth, third and second moments are updated in that order so
    /// that each update reads the moments from before this sample.
    pub fn add(&mut self, x: f64) {
        self.n += 1;
        let n = self.n as f64;
        let delta = x - self.m1;
        let delta_n = delta / n;
        let delta_n2 = delta_n * delta_n;
        let term1 = delta * delta_n * (n - 1.0);
        self.m4 += term1 * delta_n2 * (n * n - 3.0 * n + 3.0) + 6.0 * delta_n2 * self.m2
            - 4.0 * delta_n * self.m3;
        self.m3 += term1 * delta_n * (n - 2.0) - 3.0 * delta_n * self.m2;
        self.m2 += term1;
        self.m1 += delta_n;
    }

    /// Number of samples seen so far.
    pub fn n(&self) -> u64 {
        self.n
    }

    /// Mean of the samples seen so far.
    pub fn mean(&self) -> f64 {
        self.m1
    }

    /// Unbiased sample variance; 0 until at least two samples are seen.
    pub fn variance(&self) -> f64 {
        if self.n > 1 {
            self.m2 / (self.n as f64 - 1.0)
        } else {
            0.0
        }
    }

    /// Sample standard deviation.
    pub fn stddev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Sample skewness; 0 while the second moment is 0.
    pub fn skewness(&self) -> f64 {
        if self.m2 > 0.0 {
            (self.n as f64).sqrt() * self.m3 / self.m2.powf(1.5)
        } else {
            0.0
        }
    }

    /// Excess kurtosis (normal distribution reads 0); 0 while the second
    /// moment is 0.
    pub fn kurtosis(&self) -> f64 {
        if self.m2 > 0.0 {
            self.n as f64 * self.m4 / (self.m2 * self.m2) - 3.0
        } else {
            0.0
        }
    }

    /// Combines two trackers built on disjoint streams.
    ///
    /// The result is equivalent, up to floating-point rounding, to a single
    /// tracker fed both streams back to back. Neither input is modified.
    pub fn combine(&self, other: &Self) -> MomentStats {
        if self.n == 0 {
            return other.clone();
        }
        if other.n == 0 {
            return self.clone();
        }

        let a_n = self.n as f64;
        let b_n = other.n as f64;
        let c_n = a_n + b_n;

        let delta = other.m1 - self.m1;
        let delta2 = delta * delta;
        let delta3 = delta * delta2;
        let delta4 = delta2 * delta2;

        let m1 = (a_n * self.m1 + b_n * other.m1) / c_n;

        let m2 = self.m2 + other.m2 + delta2 * a_n * b_n / c_n;

        let mut m3 = self.m3 + other.m3 + delta3 * a_n * b_n * (a_n - b_n) / (c_n * c_n);
        m3 += 3.0 * delta * (a_n * other.m2 - b_n * self.m2) / c_n;

        let mut m4 = self.m4
            + other.m4
            + delta4 * a_n * b_n * (a_n * a_n - a_n * b_n + b_n * b_n) / (c_n * c_n * c_n);
        m4 += 6.0 * delta2 * (a_n * a_n * other.m2 + b_n * b_n * self.m2) / (c_n * c_n)
            + 4.0 * delta * (a_n * other.m3 - b_n * self.m3) / c_n;

        MomentStats {
            n: self.n + other.n,
            m1,
            m2,
            m3,
            m4,
        }
    }
}

impl fmt::Display for MomentStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Mean: {:.6} Variance: {:.6} Skewness: {:.6} Kurtosis: {:.6} N: {}",
            self.mean(),
            self.variance(),
            self.skewness(),
            self.kurtosis(),
            self.n
        )
    }
}
