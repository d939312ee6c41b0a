//! F-beta threshold search over positive and negative score distributions.

use serde::{Deserialize, Serialize};

use crate::error::{RecognizerError, RecognizerResult};

/// Best threshold found by [`estimate_threshold`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdEstimate {
    /// Largest score counted as accepted at the best cut
    pub threshold: f64,
    /// F-beta score achieved at that cut
    pub f_score: f64,
}

/// Exact F-beta score; 0 when there is nothing to score.
pub fn f_beta(beta: f64, tp: f64, fp: f64, fn_: f64) -> f64 {
    let b2 = beta * beta;
    let numerator = (1.0 + b2) * tp;
    let denominator = numerator + b2 * fn_ + fp;
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// F-beta score with the denominator floored at 1.
///
/// Used by the Monte-Carlo adjustment, where counts are whole trials and an
/// empty confusion matrix should score 0.
pub(crate) fn f_beta_floored(beta: f64, tp: f64, fp: f64, fn_: f64) -> f64 {
    let b2 = beta * beta;
    let numerator = (1.0 + b2) * tp;
    numerator / (numerator + b2 * fn_ + fp).max(1.0)
}

/// Find the score cut that best separates positives from negatives.
///
/// Both distributions are sorted and merge-scanned. At each step every value
/// at or below the smaller head is consumed, the confusion counts updated and
/// F-beta evaluated. The first cut achieving the best score wins.
pub fn estimate_threshold(positive: &[f64], negative: &[f64], beta: f64) -> RecognizerResult<ThresholdEstimate> {
    if positive.is_empty() {
        return Err(RecognizerError::EmptyScoreDistribution("positive"));
    }
    if negative.is_empty() {
        return Err(RecognizerError::EmptyScoreDistribution("negative"));
    }

    let mut scan = MergeScan::new(positive, negative);
    let mut best = scan.next_cut(beta);
    while scan.has_next() {
        let cut = scan.next_cut(beta);
        if cut.f_score > best.f_score {
            best = cut;
        }
    }
    Ok(best)
}

/// Sorted score lists with a cursor into each. The positive cursor is the
/// true-positive count, the negative cursor the false-positive count.
struct MergeScan {
    pos: Vec<f64>,
    neg: Vec<f64>,
    p: usize,
    n: usize,
}

impl MergeScan {
    fn new(positive: &[f64], negative: &[f64]) -> Self {
        let mut pos = positive.to_vec();
        let mut neg = negative.to_vec();
        pos.sort_by(f64::total_cmp);
        neg.sort_by(f64::total_cmp);
        Self { pos, neg, p: 0, n: 0 }
    }

    /// Both lists still have unconsumed values.
    fn has_next(&self) -> bool {
        self.p < self.pos.len() && self.n < self.neg.len()
    }

    /// Consume every value at or below the smaller head and score the cut.
    /// Only valid while [`has_next`](Self::has_next) holds.
    fn next_cut(&mut self, beta: f64) -> ThresholdEstimate {
        let threshold = self.pos[self.p].min(self.neg[self.n]);

        while self.p < self.pos.len() && self.pos[self.p] <= threshold {
            self.p += 1;
        }
        while self.n < self.neg.len() && self.neg[self.n] <= threshold {
            self.n += 1;
        }

        let tp = self.p as f64;
        let fn_ = (self.pos.len() - self.p) as f64;
        let fp = self.n as f64;
        ThresholdEstimate {
            threshold,
            f_score: f_beta(beta, tp, fp, fn_),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separated_distributions() {
        let estimate = estimate_threshold(&[0.0, 0.0, 0.0], &[10.0, 10.0, 10.0], 1.0).unwrap();
        assert_eq!(estimate.threshold, 0.0);
        assert!((estimate.f_score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_unsorted_input() {
        let estimate = estimate_threshold(&[3.0, 1.0, 2.0], &[9.0, 7.0, 8.0], 1.0).unwrap();
        assert_eq!(estimate.threshold, 3.0);
        assert!((estimate.f_score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_overlapping_distributions() {
        // pos: 1 2 3 4, neg: 2.5 5 6
        // cut 1: tp1 fn3 fp0 -> 2/5
        // cut 2: tp2 fn2 fp0 -> 4/6
        // cut 2.5: tp2 fn2 fp1 -> 4/7
        // cut 3: tp3 fn1 fp1 -> 6/8
        // cut 4: tp4 fn0 fp1 -> 8/9
        let estimate = estimate_threshold(&[1.0, 2.0, 3.0, 4.0], &[2.5, 5.0, 6.0], 1.0).unwrap();
        assert_eq!(estimate.threshold, 4.0);
        assert!((estimate.f_score - 8.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_first_best_wins() {
        // Cuts at 1 and 5 both score 2/3; the earlier one is kept.
        let estimate = estimate_threshold(&[1.0, 5.0], &[2.0, 3.0, 6.0], 1.0).unwrap();
        assert_eq!(estimate.threshold, 1.0);
    }

    #[test]
    fn test_merge_scan_cuts() {
        let mut scan = MergeScan::new(&[3.0, 1.0, 1.0], &[2.0, 4.0]);
        let cuts: Vec<f64> = std::iter::from_fn(|| scan.has_next().then(|| scan.next_cut(1.0).threshold)).collect();
        // Duplicates are consumed together; the scan stops once the
        // positives run out.
        assert_eq!(cuts, vec![1.0, 2.0, 3.0]);

        // A single pair always yields exactly one cut.
        let mut scan = MergeScan::new(&[5.0], &[5.0]);
        let cut = scan.next_cut(1.0);
        assert_eq!(cut.threshold, 5.0);
        assert!((cut.f_score - 2.0 / 3.0).abs() < 1e-12);
        assert!(!scan.has_next());
    }

    #[test]
    fn test_empty_distribution() {
        assert!(matches!(
            estimate_threshold(&[], &[1.0], 1.0),
            Err(RecognizerError::EmptyScoreDistribution("positive"))
        ));
        assert!(matches!(
            estimate_threshold(&[1.0], &[], 1.0),
            Err(RecognizerError::EmptyScoreDistribution("negative"))
        ));
    }

    #[test]
    fn test_f_beta() {
        assert_eq!(f_beta(1.0, 0.0, 0.0, 0.0), 0.0);
        assert!((f_beta(1.0, 2.0, 1.0, 1.0) - 4.0 / 6.0).abs() < 1e-12);
        // Beta > 1 weights recall: misses hurt more than false alarms.
        assert!(f_beta(2.0, 2.0, 2.0, 0.0) > f_beta(2.0, 2.0, 0.0, 2.0));

        assert_eq!(f_beta_floored(1.0, 0.0, 0.0, 0.0), 0.0);
        assert!((f_beta_floored(1.0, 2.0, 1.0, 1.0) - 4.0 / 6.0).abs() < 1e-12);
    }
}
