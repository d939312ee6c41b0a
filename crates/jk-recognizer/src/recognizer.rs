//! Nearest-template gesture recognizer.
//!
//! Classification builds a template from the candidate, scores it against
//! every stored template as `correction_factor × DTW`, and keeps the scores
//! the rejection threshold accepts. Lower scores are better.
//!
//! # Usage
//! ```rust,ignore
//! use jk_recognizer::{select_rejection_threshold, Recognizer};
//!
//! let mut recognizer = Recognizer::new(32, 0.1)?;
//! for sample in training {
//!     recognizer.add_template(sample)?;
//! }
//!
//! let threshold = select_rejection_threshold(&recognizer, 1.2, 1, 1.0, &mut rng)?;
//! recognizer.set_rejection_threshold(threshold);
//!
//! match recognizer.classify(&candidate)? {
//!     Some(results) => println!("best: {}", results[0].gesture()),
//!     None => println!("no match"),
//! }
//! ```

use jk_models::Sample;
use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RecognizerConfig;
use crate::dtw::{band_width, dtw_distance};
use crate::error::{RecognizerError, RecognizerResult};
use crate::metrics;
use crate::resample::resample;
use crate::template::{vectorize, Template};

/// Band ratio `measure` always uses, independent of the configured one.
const MEASURE_BAND_RATIO: f64 = 0.1;

/// Score cutoff applied by [`Recognizer::classify`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionThreshold {
    /// No threshold has been set; every score is accepted.
    #[default]
    AcceptAll,
    /// Scores strictly below the value are accepted.
    Below(f64),
}

impl RejectionThreshold {
    /// Returns true if a result with this score should be kept.
    pub fn accepts(&self, score: f64) -> bool {
        match self {
            RejectionThreshold::AcceptAll => true,
            RejectionThreshold::Below(limit) => score < *limit,
        }
    }

    /// The numeric cutoff, if one is set.
    pub fn value(&self) -> Option<f64> {
        match self {
            RejectionThreshold::AcceptAll => None,
            RejectionThreshold::Below(limit) => Some(*limit),
        }
    }
}

/// One scored template match.
#[derive(Debug, Clone, Copy)]
pub struct RecognitionResult<'a> {
    /// Correction factor times DTW distance; lower is better.
    pub score: f64,
    /// Position of the matched template in the recognizer.
    pub template_index: usize,
    template: &'a Template,
}

impl<'a> RecognitionResult<'a> {
    /// Gesture label of the matched template.
    pub fn gesture(&self) -> &'a str {
        self.template.gesture()
    }

    pub fn template(&self) -> &'a Template {
        self.template
    }
}

/// Template-based gesture recognizer.
#[derive(Debug, Clone)]
pub struct Recognizer {
    resample_count: usize,
    band_ratio: f64,
    band: usize,
    templates: Vec<Template>,
    samples: Vec<Sample>,
    rejection_threshold: RejectionThreshold,
}

impl Recognizer {
    /// Create a recognizer.
    ///
    /// # Arguments
    /// * `resample_count` - Points per template, at least 2
    /// * `band_ratio` - DTW band half-width as a fraction of `resample_count`, in (0, 1]
    pub fn new(resample_count: usize, band_ratio: f64) -> RecognizerResult<Self> {
        if resample_count < 2 {
            return Err(RecognizerError::InvalidResampleCount(resample_count));
        }
        if !(band_ratio > 0.0 && band_ratio <= 1.0) {
            return Err(RecognizerError::InvalidBandRatio(band_ratio));
        }

        Ok(Self {
            resample_count,
            band_ratio,
            band: band_width(resample_count, band_ratio),
            templates: Vec::new(),
            samples: Vec::new(),
            rejection_threshold: RejectionThreshold::AcceptAll,
        })
    }

    /// Create a recognizer from config.
    pub fn from_config(config: &RecognizerConfig) -> RecognizerResult<Self> {
        Self::new(config.resample_count, config.band_ratio)
    }

    /// Build a template from `sample` and append it. Duplicates are kept.
    pub fn add_template(&mut self, sample: Sample) -> RecognizerResult<()> {
        if let Some(first) = self.templates.first() {
            if sample.dimension() != first.dimension() {
                return Err(RecognizerError::dimension_mismatch(first.dimension(), sample.dimension()));
            }
        }

        let template = Template::build(sample.gesture(), sample.trajectory(), self.resample_count)?;
        debug!(
            gesture = %sample.gesture(),
            index = self.templates.len(),
            "Added template"
        );
        metrics::record_template_added(sample.gesture());

        self.templates.push(template);
        self.samples.push(sample);
        Ok(())
    }

    /// Classify a sample.
    ///
    /// Returns results sorted by ascending score, or `None` when there are no
    /// templates or no template scores under the rejection threshold. Equal
    /// scores keep template insertion order.
    pub fn classify(&self, candidate: &Sample) -> RecognizerResult<Option<Vec<RecognitionResult<'_>>>> {
        self.classify_trajectory(candidate.trajectory())
    }

    /// Classify a raw trajectory. See [`Recognizer::classify`].
    pub fn classify_trajectory(
        &self,
        trajectory: ArrayView2<'_, f64>,
    ) -> RecognizerResult<Option<Vec<RecognitionResult<'_>>>> {
        let Some(first) = self.templates.first() else {
            metrics::record_classification(false);
            return Ok(None);
        };
        if trajectory.ncols() != first.dimension() {
            return Err(RecognizerError::dimension_mismatch(first.dimension(), trajectory.ncols()));
        }

        let candidate = Template::build("", trajectory, self.resample_count)?;

        let mut results: Vec<RecognitionResult<'_>> = self
            .templates
            .iter()
            .enumerate()
            .filter_map(|(template_index, template)| {
                let cf = candidate.correction_factor(template);
                let score = cf * dtw_distance(candidate.vectors().view(), template.vectors().view(), self.band);
                self.rejection_threshold.accepts(score).then_some(RecognitionResult {
                    score,
                    template_index,
                    template,
                })
            })
            .collect();

        results.sort_by(|a, b| a.score.total_cmp(&b.score));

        metrics::record_classification(!results.is_empty());
        match results.first() {
            Some(best) => {
                debug!(
                    gesture = %best.gesture(),
                    score = best.score,
                    candidates = results.len(),
                    "Classified trajectory"
                );
                Ok(Some(results))
            }
            None => {
                debug!(threshold = ?self.rejection_threshold, "No template under threshold");
                Ok(None)
            }
        }
    }

    /// Raw DTW distance between `points` and one template, without the
    /// correction factor.
    ///
    /// The band is always `round(0.1 · n)`, regardless of the configured
    /// ratio. Calibration scores are produced with this function, so
    /// thresholds stay comparable across recognizers with different ratios.
    pub fn measure(&self, points: ArrayView2<'_, f64>, template_index: usize) -> RecognizerResult<f64> {
        let template = self
            .templates
            .get(template_index)
            .ok_or(RecognizerError::TemplateIndexOutOfRange {
                index: template_index,
                count: self.templates.len(),
            })?;
        if points.ncols() != template.dimension() {
            return Err(RecognizerError::dimension_mismatch(template.dimension(), points.ncols()));
        }

        let resampled = resample(points, self.resample_count)?;
        let vectors = vectorize(resampled.view());
        let band = band_width(resampled.nrows(), MEASURE_BAND_RATIO);

        Ok(dtw_distance(vectors.view(), template.vectors().view(), band))
    }

    /// Replace the rejection threshold.
    pub fn set_rejection_threshold(&mut self, threshold: f64) {
        self.rejection_threshold = RejectionThreshold::Below(threshold);
    }

    /// Go back to accepting every score.
    pub fn clear_rejection_threshold(&mut self) {
        self.rejection_threshold = RejectionThreshold::AcceptAll;
    }

    pub fn rejection_threshold(&self) -> RejectionThreshold {
        self.rejection_threshold
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Samples the templates were built from, in the same order.
    pub fn training_set(&self) -> &[Sample] {
        &self.samples
    }

    pub fn resample_count(&self) -> usize {
        self.resample_count
    }

    pub fn band_ratio(&self) -> f64 {
        self.band_ratio
    }

    /// DTW band half-width used by `classify`.
    pub fn band(&self) -> usize {
        self.band
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
