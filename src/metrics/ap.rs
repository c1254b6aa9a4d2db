//! Average Precision (AP) and mean Average Precision (mAP) calculation.

use crate::types::ClassEvaluation;

/// Calculate Average Precision (AP) from a precision-recall curve.
///
/// Uses the exact-integral (area under the precision envelope) method, not
/// 11- or 101-point interpolation:
///
/// 1. recall is padded to `[0, r.., 1]` and precision to `[0, p.., 0]`;
/// 2. precision is replaced by its running maximum taken from the right;
/// 3. AP sums `(r[i + 1] - r[i]) * p[i + 1]` over every `i` where recall
///    changes value.
///
/// # Example
///
/// ```
/// use det_eval::metrics::ap::average_precision;
///
/// let recalls = vec![1.0, 1.0];
/// let precisions = vec![1.0, 0.5];
/// assert_eq!(average_precision(&recalls, &precisions), 1.0);
/// ```
pub fn average_precision(recalls: &[f64], precisions: &[f64]) -> f64 {
    let mut mrec = Vec::with_capacity(recalls.len() + 2);
    mrec.push(0.0);
    mrec.extend_from_slice(recalls);
    mrec.push(1.0);

    let mut mpre = Vec::with_capacity(precisions.len() + 2);
    mpre.push(0.0);
    mpre.extend_from_slice(precisions);
    mpre.push(0.0);

    for i in (1..mpre.len()).rev() {
        mpre[i - 1] = mpre[i - 1].max(mpre[i]);
    }

    mrec.windows(2)
        .zip(&mpre[1..])
        .filter(|(r, _)| r[1] != r[0])
        .map(|(r, &p)| (r[1] - r[0]) * p)
        .sum()
}

/// Calculate mean Average Precision (mAP) across classes.
///
/// Classes without any ground truth box are left out of the mean instead of
/// counting as 0 or 1. Returns 0.0 when no class qualifies.
///
/// # Example
///
/// ```
/// use det_eval::metrics::ap::mean_ap;
/// use det_eval::types::ClassEvaluation;
///
/// let classes = vec![
///     ClassEvaluation { gt_num: 2, ap: 0.8, ..Default::default() },
///     ClassEvaluation { gt_num: 0, ap: 0.0, ..Default::default() },
///     ClassEvaluation { gt_num: 1, ap: 0.6, ..Default::default() },
/// ];
/// assert!((mean_ap(&classes) - 0.7).abs() < 1e-12);
/// ```
pub fn mean_ap(classes: &[ClassEvaluation]) -> f64 {
    let aps: Vec<f64> = classes
        .iter()
        .filter(|class| class.gt_num > 0)
        .map(|class| class.ap)
        .collect();

    if aps.is_empty() {
        return 0.0;
    }

    aps.iter().sum::<f64>() / aps.len() as f64
}
