//! Shared descriptive statistics over non-missing values.
//!
//! Every function here takes already-filtered observations; callers decide
//! how missing cells are excluded.

use std::cmp::Ordering;

use indexmap::IndexMap;

/// Denominator used for variance and standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denominator {
    /// Divide by `n` (the spread of the observed values themselves).
    Population,
    /// Divide by `n - 1` (unbiased estimate).
    Sample,
}

// =============================================================================
// STREAMING STATISTICS
// =============================================================================
// Welford's online algorithm for computing mean and variance in a single pass.

/// Streaming mean/variance accumulator using Welford's algorithm.
#[derive(Debug, Clone)]
pub struct RunningStats {
    count: usize,
    mean: f64,
    m2: f64, // Sum of squared differences from mean
    min: f64,
    max: f64,
}

impl RunningStats {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// Build an accumulator over a slice of values.
    pub fn from_values(values: &[f64]) -> Self {
        let mut stats = Self::new();
        for &value in values {
            stats.add(value);
        }
        stats
    }

    /// Add a value.
    pub fn add(&mut self, value: f64) {
        self.count += 1;

        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;

        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    /// Number of values seen.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Mean, or `None` when no values were seen.
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then_some(self.mean)
    }

    /// Variance with the given denominator, or `None` when undefined.
    pub fn variance(&self, denominator: Denominator) -> Option<f64> {
        let divisor = match denominator {
            Denominator::Population => self.count,
            Denominator::Sample => self.count.checked_sub(1)?,
        };
        (divisor > 0).then(|| self.m2 / divisor as f64)
    }

    /// Standard deviation with the given denominator.
    pub fn std_dev(&self, denominator: Denominator) -> Option<f64> {
        self.variance(denominator).map(f64::sqrt)
    }

    /// Smallest value seen.
    pub fn min(&self) -> Option<f64> {
        (self.count > 0).then_some(self.min)
    }

    /// Largest value seen.
    pub fn max(&self) -> Option<f64> {
        (self.count > 0).then_some(self.max)
    }
}

impl Default for RunningStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Variance with the given denominator.
pub fn variance(values: &[f64], denominator: Denominator) -> Option<f64> {
    RunningStats::from_values(values).variance(denominator)
}

/// Standard deviation with the given denominator.
pub fn std_dev(values: &[f64], denominator: Denominator) -> Option<f64> {
    variance(values, denominator).map(f64::sqrt)
}

/// Sorted copy of the values (total order, so NaN never panics).
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Quantile of already-sorted values using linear interpolation.
///
/// `q` is a fraction in `[0, 1]`.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let q = q.clamp(0.0, 1.0);
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + fraction * (sorted[upper] - sorted[lower]))
}

/// Quantile of unsorted values using linear interpolation.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    quantile_sorted(&sorted(values), q)
}

/// Median using linear interpolation between the middle pair.
pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

/// First and third quartiles.
pub fn quartiles(values: &[f64]) -> Option<(f64, f64)> {
    let sorted = sorted(values);
    Some((quantile_sorted(&sorted, 0.25)?, quantile_sorted(&sorted, 0.75)?))
}

/// Count occurrences in first-encountered order.
pub fn value_counts<'a>(values: impl IntoIterator<Item = &'a str>) -> IndexMap<String, usize> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for value in values {
        *counts.entry(value.to_string()).or_insert(0) += 1;
    }
    counts
}

/// All values sharing the highest count, in first-encountered order.
pub fn modes<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let counts = value_counts(values);
    let Some(best) = counts.values().copied().max() else {
        return Vec::new();
    };
    counts
        .into_iter()
        .filter(|(_, count)| *count == best)
        .map(|(value, _)| value)
        .collect()
}

/// Most frequent value; ties go to the first encountered.
pub fn mode<'a>(values: impl IntoIterator<Item = &'a str>) -> Option<String> {
    modes(values).into_iter().next()
}

/// Numeric modes (most frequent values), in first-encountered order.
pub fn numeric_modes(values: &[f64]) -> Vec<f64> {
    let mut counts: Vec<(f64, usize)> = Vec::new();
    for &value in values {
        match counts.iter_mut().find(|(v, _)| v.total_cmp(&value) == Ordering::Equal) {
            Some((_, count)) => *count += 1,
            None => counts.push((value, 1)),
        }
    }
    let best = counts.iter().map(|(_, c)| *c).max().unwrap_or(0);
    counts
        .into_iter()
        .filter(|(_, count)| *count == best)
        .map(|(value, _)| value)
        .collect()
}

/// Pairs where both sides are present.
pub fn complete_pairs(x: &[Option<f64>], y: &[Option<f64>]) -> (Vec<f64>, Vec<f64>) {
    x.iter()
        .zip(y.iter())
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .unzip()
}

/// Sample covariance over pairwise-complete observations.
pub fn covariance(x: &[Option<f64>], y: &[Option<f64>]) -> Option<f64> {
    let (xs, ys) = complete_pairs(x, y);
    if xs.len() < 2 {
        return None;
    }
    let mx = mean(&xs)?;
    let my = mean(&ys)?;
    let sum: f64 = xs.iter().zip(&ys).map(|(a, b)| (a - mx) * (b - my)).sum();
    Some(sum / (xs.len() - 1) as f64)
}

/// Pearson correlation over pairwise-complete observations.
///
/// `None` when either side has zero variance or fewer than two pairs.
pub fn correlation(x: &[Option<f64>], y: &[Option<f64>]) -> Option<f64> {
    let (xs, ys) = complete_pairs(x, y);
    if xs.len() < 2 {
        return None;
    }
    let mx = mean(&xs)?;
    let my = mean(&ys)?;
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (a, b) in xs.iter().zip(&ys) {
        sxy += (a - mx) * (b - my);
        sxx += (a - mx).powi(2);
        syy += (b - my).powi(2);
    }
    if sxx <= 0.0 || syy <= 0.0 {
        return None;
    }
    Some((sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0))
}
