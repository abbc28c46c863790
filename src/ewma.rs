// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// Exponentially weighted moving average with damping factor
/// `0 < lambda < 1`, updated as `m = (1 - lambda) * m + lambda * x`.
///
/// # Example
///
/// ```
/// use stream_sketches::Ewma;
///
/// let mut avg = Ewma::new(4.0, 0.5);
/// avg.add(8.0);
/// assert_eq!(avg.mean(), 6.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ewma {
    m: f64,
    lambda: f64,
}

impl Ewma {
    /// Creates an average seeded with `initial_value` and weighting `lambda`.
    pub fn new(initial_value: f64, lambda: f64) -> Self {
        Self {
            m: initial_value,
            lambda,
        }
    }

    /// Folds a sample into the average.
    pub fn add(&mut self, x: f64) {
        self.m = (1.0 - self.lambda) * self.m + self.lambda * x;
    }

    /// The exponentially weighted average value.
    pub fn mean(&self) -> f64 {
        self.m
    }
}
