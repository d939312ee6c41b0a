//! Rejection threshold selection for a trained recognizer.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info};

use super::adjustment::AdjustmentSearch;
use super::config::CalibrationConfig;
use super::threshold::estimate_threshold;
use crate::error::{RecognizerError, RecognizerResult};
use crate::metrics;
use crate::recognizer::Recognizer;
use crate::synthesis::{gpsr, optimal_n, Splicer};

/// Synthetic scores generated for one template.
#[derive(Debug, Default)]
struct TemplateScores {
    positive: Vec<f64>,
    negative: Vec<f64>,
}

/// Calibrates recognizer rejection thresholds from synthetic data.
#[derive(Debug, Clone, Default)]
pub struct ThresholdCalibrator {
    config: CalibrationConfig,
}

impl ThresholdCalibrator {
    pub fn new(config: CalibrationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CalibrationConfig {
        &self.config
    }

    /// Select a rejection threshold for `recognizer`.
    ///
    /// Generates spliced negatives and GPSR positives for every template,
    /// scores them with [`Recognizer::measure`], finds the F-beta optimal
    /// cut and rescales it by the Monte-Carlo adjustment. The recognizer is
    /// not modified; pass the result to
    /// [`Recognizer::set_rejection_threshold`].
    ///
    /// # Arguments
    /// * `inflation` - Device inflation factor for the adjustment
    /// * `train_count` - Training samples per gesture class
    /// * `beta` - F-beta weight; values above 1 favor recall
    pub fn select_rejection_threshold<R: Rng + ?Sized>(
        &self,
        recognizer: &Recognizer,
        inflation: f64,
        train_count: usize,
        beta: f64,
        rng: &mut R,
    ) -> RecognizerResult<f64> {
        if train_count == 0 {
            return Err(RecognizerError::InvalidTrainCount);
        }
        if recognizer.is_empty() {
            return Err(RecognizerError::NoTemplates);
        }

        let start = Instant::now();
        let splicer = Splicer::new(recognizer.training_set())?.with_max_window_attempts(self.config.max_window_attempts);

        // Seeds are drawn up front so results do not depend on thread scheduling.
        let seeds: Vec<u64> = (0..recognizer.len()).map(|_| rng.random()).collect();

        let per_template = seeds
            .par_iter()
            .enumerate()
            .map(|(index, &seed)| self.score_template(recognizer, &splicer, index, seed))
            .collect::<RecognizerResult<Vec<_>>>()?;

        let mut positive = Vec::new();
        let mut negative = Vec::new();
        for scores in per_template {
            positive.extend(scores.positive);
            negative.extend(scores.negative);
        }

        let estimate = estimate_threshold(&positive, &negative, beta)?;
        let adjustment =
            AdjustmentSearch::from_config(&self.config).run(estimate.threshold, inflation, train_count, beta, rng)?;
        let rejection = adjustment.threshold;

        let elapsed = start.elapsed().as_secs_f64();
        info!(
            templates = recognizer.len(),
            mean_positive = mean(&positive),
            mean_negative = mean(&negative),
            threshold = estimate.threshold,
            f_score = estimate.f_score,
            scale = adjustment.scale,
            rejection,
            duration_secs = elapsed,
            "Calibrated rejection threshold"
        );
        metrics::record_calibration(elapsed, rejection);

        Ok(rejection)
    }

    fn score_template(
        &self,
        recognizer: &Recognizer,
        splicer: &Splicer,
        index: usize,
        seed: u64,
    ) -> RecognizerResult<TemplateScores> {
        let mut rng = StdRng::seed_from_u64(seed);
        let iterations = self.config.iterations_per_template;
        let mut scores = TemplateScores {
            positive: Vec::with_capacity(iterations),
            negative: Vec::with_capacity(iterations),
        };

        for _ in 0..iterations {
            let spliced = splicer.splice(index, &mut rng)?;
            scores.negative.push(recognizer.measure(spliced.view(), index)?);
        }

        let trajectory = recognizer.training_set()[index].trajectory();
        let n = optimal_n(trajectory, &self.config.gpsr_coefficients)?;
        for _ in 0..iterations {
            let synthetic = gpsr(trajectory, n, self.config.gpsr_remove_count, self.config.gpsr_variance, &mut rng)?;
            scores.positive.push(recognizer.measure(synthetic.view(), index)?);
        }

        debug!(
            template = index,
            gpsr_n = n,
            mean_positive = mean(&scores.positive),
            mean_negative = mean(&scores.negative),
            "Scored template"
        );
        Ok(scores)
    }
}

/// Select a rejection threshold with the default calibration config.
pub fn select_rejection_threshold<R: Rng + ?Sized>(
    recognizer: &Recognizer,
    inflation: f64,
    train_count: usize,
    beta: f64,
    rng: &mut R,
) -> RecognizerResult<f64> {
    ThresholdCalibrator::default().select_rejection_threshold(recognizer, inflation, train_count, beta, rng)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use jk_models::{Sample, SampleLabels};

    fn arc(gesture: &str, sweep: f64, radius: f64) -> Sample {
        let rows: Vec<Vec<f64>> = (0..40)
            .map(|i| {
                let a = sweep * i as f64 / 39.0;
                vec![radius * a.cos(), radius * a.sin()]
            })
            .collect();
        Sample::from_points(SampleLabels::gesture(gesture), &rows, 30.0).unwrap()
    }

    fn zigzag(gesture: &str, scale: f64) -> Sample {
        let rows: Vec<Vec<f64>> = (0..12)
            .map(|i| vec![i as f64 * scale, if i % 2 == 0 { 0.0 } else { scale }])
            .collect();
        Sample::from_points(SampleLabels::gesture(gesture), &rows, 30.0).unwrap()
    }

    fn trained() -> Recognizer {
        let mut recognizer = Recognizer::new(16, 0.1).unwrap();
        recognizer.add_template(arc("arc", 3.0, 1.0)).unwrap();
        recognizer.add_template(arc("arc", 3.1, 1.2)).unwrap();
        recognizer.add_template(zigzag("zigzag", 1.0)).unwrap();
        recognizer.add_template(zigzag("zigzag", 1.3)).unwrap();
        recognizer
    }

    fn quick() -> ThresholdCalibrator {
        ThresholdCalibrator::new(CalibrationConfig::default().with_adjustment_trials(100))
    }

    #[test]
    fn test_threshold_is_positive_and_finite() {
        let mut rng = StdRng::seed_from_u64(17);
        let threshold = quick()
            .select_rejection_threshold(&trained(), 1.2, 2, 1.0, &mut rng)
            .unwrap();
        assert!(threshold.is_finite());
        assert!(threshold > 0.0);
    }

    #[test]
    fn test_deterministic_for_seed() {
        let recognizer = trained();
        let a = quick()
            .select_rejection_threshold(&recognizer, 1.2, 2, 1.0, &mut StdRng::seed_from_u64(5))
            .unwrap();
        let b = quick()
            .select_rejection_threshold(&recognizer, 1.2, 2, 1.0, &mut StdRng::seed_from_u64(5))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_bad_input() {
        let mut rng = StdRng::seed_from_u64(1);
        let empty = Recognizer::new(16, 0.1).unwrap();
        assert!(matches!(
            select_rejection_threshold(&empty, 1.2, 1, 1.0, &mut rng),
            Err(RecognizerError::NoTemplates)
        ));
        assert!(matches!(
            select_rejection_threshold(&trained(), 1.2, 0, 1.0, &mut rng),
            Err(RecognizerError::InvalidTrainCount)
        ));
    }

    #[test]
    fn test_single_class_cannot_calibrate() {
        let mut recognizer = Recognizer::new(16, 0.1).unwrap();
        recognizer.add_template(arc("arc", 3.0, 1.0)).unwrap();
        recognizer.add_template(arc("arc", 2.5, 1.0)).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            quick().select_rejection_threshold(&recognizer, 1.2, 2, 1.0, &mut rng),
            Err(RecognizerError::InsufficientClassDiversity { .. })
        ));
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
    }
}
