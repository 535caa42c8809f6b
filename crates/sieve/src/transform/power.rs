//! Box-Cox and Yeo-Johnson power transforms with maximum-likelihood λ.
//!
//! λ is searched over [-5, 5]: a coarse grid locates the best cell, then a
//! golden-section search refines it. Both steps are deterministic.

const LAMBDA_MIN: f64 = -5.0;
const LAMBDA_MAX: f64 = 5.0;
const GRID_STEP: f64 = 0.1;
const GOLDEN_ITERATIONS: usize = 60;
const EPS: f64 = 1e-12;

/// Box-Cox of a strictly positive value.
pub fn box_cox(x: f64, lambda: f64) -> f64 {
    if lambda.abs() < EPS {
        x.ln()
    } else {
        (x.powf(lambda) - 1.0) / lambda
    }
}

/// Yeo-Johnson of any real value.
pub fn yeo_johnson(x: f64, lambda: f64) -> f64 {
    if x >= 0.0 {
        if lambda.abs() < EPS {
            x.ln_1p()
        } else {
            ((x + 1.0).powf(lambda) - 1.0) / lambda
        }
    } else if (lambda - 2.0).abs() < EPS {
        -(-x).ln_1p()
    } else {
        -((1.0 - x).powf(2.0 - lambda) - 1.0) / (2.0 - lambda)
    }
}

/// Profile log-likelihood of Box-Cox at λ (values must be positive).
pub fn box_cox_log_likelihood(values: &[f64], lambda: f64) -> f64 {
    let n = values.len() as f64;
    let transformed: Vec<f64> = values.iter().map(|&x| box_cox(x, lambda)).collect();
    let log_jacobian: f64 = values.iter().map(|x| x.ln()).sum();
    -n / 2.0 * population_variance(&transformed).ln() + (lambda - 1.0) * log_jacobian
}

/// Profile log-likelihood of Yeo-Johnson at λ.
pub fn yeo_johnson_log_likelihood(values: &[f64], lambda: f64) -> f64 {
    let n = values.len() as f64;
    let transformed: Vec<f64> = values.iter().map(|&x| yeo_johnson(x, lambda)).collect();
    let log_jacobian: f64 = values.iter().map(|x| x.signum() * x.abs().ln_1p()).sum();
    -n / 2.0 * population_variance(&transformed).ln() + (lambda - 1.0) * log_jacobian
}

fn population_variance(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}

/// λ maximizing the given log-likelihood, or `None` when the values carry
/// no spread to fit against.
pub fn fit_lambda(values: &[f64], log_likelihood: impl Fn(&[f64], f64) -> f64) -> Option<f64> {
    let first = *values.first()?;
    if values.iter().all(|&v| v == first) {
        return None;
    }

    let score = |lambda: f64| {
        let ll = log_likelihood(values, lambda);
        if ll.is_finite() { ll } else { f64::NEG_INFINITY }
    };

    let steps = ((LAMBDA_MAX - LAMBDA_MIN) / GRID_STEP).round() as usize;
    let mut best = (1.0, score(1.0));
    for i in 0..=steps {
        let lambda = LAMBDA_MIN + i as f64 * GRID_STEP;
        let ll = score(lambda);
        if ll > best.1 {
            best = (lambda, ll);
        }
    }

    let mut lo = (best.0 - GRID_STEP).max(LAMBDA_MIN);
    let mut hi = (best.0 + GRID_STEP).min(LAMBDA_MAX);
    let ratio = (5f64.sqrt() - 1.0) / 2.0;
    let mut c = hi - ratio * (hi - lo);
    let mut d = lo + ratio * (hi - lo);
    let (mut fc, mut fd) = (score(c), score(d));
    for _ in 0..GOLDEN_ITERATIONS {
        if fc > fd {
            hi = d;
            d = c;
            fd = fc;
            c = hi - ratio * (hi - lo);
            fc = score(c);
        } else {
            lo = c;
            c = d;
            fc = fd;
            d = lo + ratio * (hi - lo);
            fd = score(d);
        }
    }

    let refined = (lo + hi) / 2.0;
    if score(refined) >= best.1 {
        Some(refined)
    } else {
        Some(best.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_cox_limits() {
        assert!((box_cox(std::f64::consts::E, 0.0) - 1.0).abs() < 1e-12);
        assert!((box_cox(3.0, 1.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_yeo_johnson_branches() {
        assert!((yeo_johnson(3.0, 1.0) - 3.0).abs() < 1e-12);
        assert!((yeo_johnson(-3.0, 1.0) + 3.0).abs() < 1e-12);
        assert!((yeo_johnson(1.0, 0.0) - 2f64.ln()).abs() < 1e-12);
        assert!((yeo_johnson(-1.0, 2.0) + 2f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_fit_lambda_log_normal_prefers_log() {
        // Exponentials of evenly spaced values are log-symmetric; λ ≈ 0.
        let values: Vec<f64> = (-10..=10).map(|i| (i as f64 * 0.2).exp()).collect();
        let lambda = fit_lambda(&values, box_cox_log_likelihood).unwrap();
        assert!(lambda.abs() < 0.1, "lambda = {lambda}");
    }

    #[test]
    fn test_fit_lambda_right_skew_below_one() {
        let values: Vec<f64> = (0..=20).map(|i| (i as f64 * 0.2).exp()).collect();
        let lambda = fit_lambda(&values, yeo_johnson_log_likelihood).unwrap();
        assert!(lambda < 1.0, "lambda = {lambda}");
    }

    #[test]
    fn test_fit_lambda_constant_is_none() {
        assert_eq!(fit_lambda(&[2.0, 2.0, 2.0], box_cox_log_likelihood), None);
        assert_eq!(fit_lambda(&[], box_cox_log_likelihood), None);
    }

    #[test]
    fn test_fit_lambda_stays_in_range() {
        let values = [1.0, 1.0, 1.0, 1.0, 1e6];
        let lambda = fit_lambda(&values, box_cox_log_likelihood).unwrap();
        assert!((LAMBDA_MIN..=LAMBDA_MAX).contains(&lambda));
    }
}
