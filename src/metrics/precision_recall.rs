//! Cumulative precision and recall curves over a ranked detection list.

use crate::types::PrecisionRecallCurve;

/// Denominator floor for recall and precision.
pub const EPS: f64 = f64::EPSILON;

/// Running sums of true and false positives over a ranked detection list.
///
/// `is_true_positive[i]` tells whether the `i`-th ranked detection was a
/// true positive; every other detection counts as a false positive.
///
/// # Example
///
/// ```
/// use det_eval::metrics::precision_recall::cumulative_counts;
///
/// let (tp, fp) = cumulative_counts(&[true, false, true]);
/// assert_eq!(tp, vec![1.0, 1.0, 2.0]);
/// assert_eq!(fp, vec![0.0, 1.0, 1.0]);
/// ```
pub fn cumulative_counts(is_true_positive: &[bool]) -> (Vec<f64>, Vec<f64>) {
    let mut tp_sum = 0.0;
    let mut fp_sum = 0.0;
    let mut tp = Vec::with_capacity(is_true_positive.len());
    let mut fp = Vec::with_capacity(is_true_positive.len());

    for &is_tp in is_true_positive {
        if is_tp {
            tp_sum += 1.0;
        } else {
            fp_sum += 1.0;
        }
        tp.push(tp_sum);
        fp.push(fp_sum);
    }

    (tp, fp)
}

/// Calculate the precision-recall curve of a ranked detection list.
///
/// `recall[i] = tp[i] / max(num_ground_truth, EPS)` and
/// `precision[i] = tp[i] / max(tp[i] + fp[i], EPS)`, so neither zero ground
/// truth nor an empty prefix can produce `NaN`.
///
/// # Example
///
/// ```
/// use det_eval::metrics::precision_recall::calculate_precision_recall_curve;
///
/// let curve = calculate_precision_recall_curve(&[true, false], 1);
/// assert_eq!(curve.recall, vec![1.0, 1.0]);
/// assert_eq!(curve.precision, vec![1.0, 0.5]);
/// ```
pub fn calculate_precision_recall_curve(
    is_true_positive: &[bool],
    num_ground_truth: usize,
) -> PrecisionRecallCurve {
    let (tp, fp) = cumulative_counts(is_true_positive);
    let gt_denominator = (num_ground_truth as f64).max(EPS);

    let recall = tp.iter().map(|&t| t / gt_denominator).collect();
    let precision = tp
        .iter()
        .zip(&fp)
        .map(|(&t, &f)| t / (t + f).max(EPS))
        .collect();

    PrecisionRecallCurve { recall, precision }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precision_recall_curve() {
        let is_tp = vec![true, true, false, true, false];
        let curve = calculate_precision_recall_curve(&is_tp, 4);
        assert_eq!(curve.recall.len(), 5);

        assert!((curve.precision[0] - 1.0).abs() < 1e-12);
        assert!((curve.recall[0] - 0.25).abs() < 1e-12);
        assert!((curve.precision[2] - 2.0 / 3.0).abs() < 1e-12);
        assert!((curve.recall[4] - 0.75).abs() < 1e-12);
        assert!((curve.precision[4] - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_zero_ground_truth_is_not_nan() {
        let curve = calculate_precision_recall_curve(&[false, false], 0);
        assert_eq!(curve.recall, vec![0.0, 0.0]);
        assert_eq!(curve.precision, vec![0.0, 0.0]);
    }

    #[test]
    fn test_empty_ranking() {
        let curve = calculate_precision_recall_curve(&[], 3);
        assert!(curve.recall.is_empty());
        assert!(curve.precision.is_empty());
    }
}
