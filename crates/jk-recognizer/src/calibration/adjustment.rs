//! Monte-Carlo correction of the estimated threshold.
//!
//! The threshold found on synthetic scores describes a decision radius `rt`
//! around the training samples. Real positives spread wider, modeled as a
//! ball of radius `ri = rt · inflation`. The adjustment simulates both balls
//! in a `dimension`-dimensional space and picks the radius scale whose
//! recognition region best covers the inflated ball in the F-beta sense.

use ndarray::Array1;
use rand::Rng;
use tracing::{debug, warn};

use super::config::CalibrationConfig;
use super::threshold::f_beta_floored;
use crate::error::{RecognizerError, RecognizerResult};
use crate::geometry::{distance, norm};

/// Scales evaluated: `0.5 + 0.05 · k` for `k` in `0..=30`.
const SCALE_STEPS: usize = 30;
const SCALE_START: f64 = 0.5;
const SCALE_STEP: f64 = 0.05;

/// Outcome of the adjustment simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adjustment {
    /// Best radius scale, in `[0.5, 2.0]`, or 1.0 when nothing scored
    pub scale: f64,
    /// Input threshold multiplied by `scale`
    pub threshold: f64,
}

/// Parameters of the adjustment simulation.
#[derive(Debug, Clone, Copy)]
pub struct AdjustmentSearch {
    pub dimension: usize,
    pub trials: usize,
    pub max_sphere_attempts: usize,
}

impl Default for AdjustmentSearch {
    fn default() -> Self {
        let config = CalibrationConfig::default();
        Self::from_config(&config)
    }
}

impl AdjustmentSearch {
    pub fn from_config(config: &CalibrationConfig) -> Self {
        Self {
            dimension: config.adjustment_dimension,
            trials: config.adjustment_trials,
            max_sphere_attempts: config.max_sphere_attempts,
        }
    }

    /// Find the best scale for `threshold` and apply it. The scale is 1.0
    /// when no scale recognizes anything.
    pub fn run<R: Rng + ?Sized>(
        &self,
        threshold: f64,
        inflation: f64,
        train_count: usize,
        beta: f64,
        rng: &mut R,
    ) -> RecognizerResult<Adjustment> {
        let rt = threshold;
        let ri = threshold * inflation;

        let mut best_scale = None;
        let mut best_f = 0.0;

        for step in 0..=SCALE_STEPS {
            let scale = SCALE_START + SCALE_STEP * step as f64;
            let rmax = ri.max(rt + rt * scale);

            let (mut tp, mut fp, mut fn_) = (0.0, 0.0, 0.0);
            for _ in 0..self.trials {
                let test = self.sample(rmax, rng)?;
                let inside = norm(test.view()) <= ri;

                let mut recognized = false;
                for _ in 0..train_count {
                    let train = self.sample(rt, rng)?;
                    if distance(train.view(), test.view()) <= rt * scale {
                        recognized = true;
                        break;
                    }
                }

                match (inside, recognized) {
                    (true, true) => tp += 1.0,
                    (true, false) => fn_ += 1.0,
                    (false, true) => fp += 1.0,
                    (false, false) => {}
                }
            }

            let f_score = f_beta_floored(beta, tp, fp, fn_);
            debug!(scale, f_score, tp, fp, fn_ = fn_, "Evaluated adjustment scale");
            if f_score > best_f {
                best_f = f_score;
                best_scale = Some(scale);
            }
        }

        let scale = best_scale.unwrap_or_else(|| {
            warn!(threshold, inflation, train_count, "No adjustment scale recognized any trial; keeping threshold");
            1.0
        });
        Ok(Adjustment {
            scale,
            threshold: threshold * scale,
        })
    }

    fn sample<R: Rng + ?Sized>(&self, radius: f64, rng: &mut R) -> RecognizerResult<Array1<f64>> {
        sample_sphere_bounded(radius, self.dimension, self.max_sphere_attempts, rng)
    }
}

/// Adjusted threshold (`threshold × best scale`) using the default
/// simulation size.
pub fn estimate_adjustment<R: Rng + ?Sized>(
    dimension: usize,
    threshold: f64,
    inflation: f64,
    train_count: usize,
    beta: f64,
    rng: &mut R,
) -> RecognizerResult<f64> {
    let search = AdjustmentSearch {
        dimension,
        ..AdjustmentSearch::default()
    };
    Ok(search.run(threshold, inflation, train_count, beta, rng)?.threshold)
}

/// Uniform point in a `dimension`-ball of `radius`, by rejection from the
/// enclosing cube.
pub fn sample_sphere<R: Rng + ?Sized>(radius: f64, dimension: usize, rng: &mut R) -> RecognizerResult<Array1<f64>> {
    let attempts = CalibrationConfig::default().max_sphere_attempts;
    sample_sphere_bounded(radius, dimension, attempts, rng)
}

fn sample_sphere_bounded<R: Rng + ?Sized>(
    radius: f64,
    dimension: usize,
    max_attempts: usize,
    rng: &mut R,
) -> RecognizerResult<Array1<f64>> {
    if !(radius > 0.0) {
        return Ok(Array1::zeros(dimension));
    }

    for _ in 0..max_attempts {
        let point = Array1::from_shape_fn(dimension, |_| 2.0 * (rng.random::<f64>() - 0.5) * radius);
        if norm(point.view()) <= radius {
            return Ok(point);
        }
    }
    Err(RecognizerError::SphereSamplingExhausted { attempts: max_attempts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_sample_sphere_inside_radius() {
        let mut rng = StdRng::seed_from_u64(42);
        for dimension in [1, 2, 6] {
            for _ in 0..200 {
                let p = sample_sphere(2.5, dimension, &mut rng).unwrap();
                assert_eq!(p.len(), dimension);
                assert!(norm(p.view()) <= 2.5);
            }
        }
    }

    #[test]
    fn test_sample_sphere_zero_radius() {
        let mut rng = StdRng::seed_from_u64(1);
        let p = sample_sphere(0.0, 3, &mut rng).unwrap();
        assert!(p.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_sample_sphere_exhaustion() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            sample_sphere_bounded(1.0, 4, 0, &mut rng),
            Err(RecognizerError::SphereSamplingExhausted { attempts: 0 })
        ));
    }

    #[test]
    fn test_adjustment_in_scale_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let search = AdjustmentSearch {
            trials: 200,
            ..AdjustmentSearch::default()
        };
        let adjustment = search.run(5.0, 1.4, 4, 1.0, &mut rng).unwrap();
        assert!((0.5..=2.0 + 1e-9).contains(&adjustment.scale));
        assert_eq!(adjustment.threshold, 5.0 * adjustment.scale);
    }

    #[test]
    fn test_adjustment_is_deterministic_for_seed() {
        let search = AdjustmentSearch {
            trials: 100,
            ..AdjustmentSearch::default()
        };
        let a = search.run(3.0, 1.2, 2, 1.0, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = search.run(3.0, 1.2, 2, 1.0, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_no_training_points_keeps_threshold() {
        // Nothing is ever recognized, every scale scores 0.
        let mut rng = StdRng::seed_from_u64(3);
        let search = AdjustmentSearch {
            trials: 50,
            ..AdjustmentSearch::default()
        };
        let adjustment = search.run(2.0, 1.5, 0, 1.0, &mut rng).unwrap();
        assert_eq!(adjustment.scale, 1.0);
        assert_eq!(adjustment.threshold, 2.0);
    }

    #[test]
    fn test_estimate_adjustment_returns_scaled_threshold() {
        let adjusted = estimate_adjustment(6, 10.0, 1.4, 4, 1.0, &mut StdRng::seed_from_u64(1)).unwrap();
        let search = AdjustmentSearch {
            dimension: 6,
            ..AdjustmentSearch::default()
        };
        let adjustment = search.run(10.0, 1.4, 4, 1.0, &mut StdRng::seed_from_u64(1)).unwrap();

        assert_eq!(adjusted, 10.0 * adjustment.scale);
        assert!((5.0..=20.0 + 1e-9).contains(&adjusted));
    }

    #[test]
    fn test_more_training_points_shrink_scale() {
        // A larger training set covers more of the inflated ball, so a
        // smaller radius suffices.
        let search = AdjustmentSearch::default();
        let single = search.run(1.0, 1.4, 1, 1.0, &mut StdRng::seed_from_u64(21)).unwrap();
        let many = search.run(1.0, 1.4, 16, 1.0, &mut StdRng::seed_from_u64(21)).unwrap();
        assert!(many.scale < single.scale, "16 points: {}, 1 point: {}", many.scale, single.scale);
    }

    #[test]
    fn test_wider_inflation_grows_scale() {
        let search = AdjustmentSearch::default();
        let tight = search.run(1.0, 1.0, 4, 1.0, &mut StdRng::seed_from_u64(13)).unwrap();
        let loose = search.run(1.0, 2.0, 4, 1.0, &mut StdRng::seed_from_u64(13)).unwrap();
        assert!(loose.scale > tight.scale, "inflation 2.0: {}, 1.0: {}", loose.scale, tight.scale);
    }
}
