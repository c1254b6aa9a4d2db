//! Matching of detections and proposals against ground truth boxes.
//!
//! Two policies live here:
//! - [`greedy_match`] pairs ground truth boxes with proposals for recall
//!   tables, always taking the globally best remaining pair first.
//! - [`match_ranked_detections`] walks a score-ranked detection list and marks
//!   each detection as a true or false positive for AP.

use crate::error::{DetEvalError, Result};
use crate::metrics::iou::calculate_iou;
use crate::types::{BBox, ClassDetection};

/// Order item indices by descending score.
///
/// The sort is stable: items with equal scores keep their input order.
/// Scores are compared with [`f64::total_cmp`] so `NaN` cannot break the
/// ordering.
///
/// # Example
///
/// ```
/// use det_eval::matching::rank_by_score;
///
/// let scores = [0.3, 0.9, 0.3, 0.5];
/// assert_eq!(rank_by_score(&scores, |&s| s), vec![1, 3, 0, 2]);
/// ```
pub fn rank_by_score<T, F>(items: &[T], score: F) -> Vec<usize>
where
    F: Fn(&T) -> f64,
{
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| score(&items[b]).total_cmp(&score(&items[a])));
    order
}

/// Greedily pair ground truth boxes (rows) with proposals (columns).
///
/// Only the first `max_proposals` columns of `ious` are considered. Each
/// round picks the highest IoU among all pairs whose row and column are both
/// still free, records it as the achieved IoU of that row, and retires both.
/// Pairs are scanned row by row, so ties go to the lowest row, then the
/// lowest column.
///
/// This is not an optimal assignment: achieved IoUs follow the max-first
/// policy exactly.
///
/// Returns one entry per ground truth box; boxes left over once proposals run
/// out are `None` and never count as recalled.
///
/// # Example
///
/// ```
/// use det_eval::matching::greedy_match;
///
/// let ious = vec![
///     vec![0.9, 0.6],
///     vec![0.8, 0.1],
/// ];
/// // Row 0 takes column 0 first; row 1 is left with column 1.
/// assert_eq!(greedy_match(&ious, 2), vec![Some(0.9), Some(0.1)]);
/// assert_eq!(greedy_match(&ious, 1), vec![Some(0.9), None]);
/// ```
pub fn greedy_match(ious: &[Vec<f64>], max_proposals: usize) -> Vec<Option<f64>> {
    let num_gts = ious.len();
    let num_proposals = ious
        .iter()
        .map(Vec::len)
        .min()
        .unwrap_or(0)
        .min(max_proposals);

    let mut gt_used = vec![false; num_gts];
    let mut proposal_used = vec![false; num_proposals];
    let mut achieved = vec![None; num_gts];

    for _ in 0..num_gts.min(num_proposals) {
        let mut best: Option<(usize, usize, f64)> = None;

        for (gt_idx, row) in ious.iter().enumerate() {
            if gt_used[gt_idx] {
                continue;
            }
            for (proposal_idx, &iou) in row.iter().take(num_proposals).enumerate() {
                if proposal_used[proposal_idx] {
                    continue;
                }
                if best.map_or(true, |(_, _, best_iou)| iou > best_iou) {
                    best = Some((gt_idx, proposal_idx, iou));
                }
            }
        }

        let Some((gt_idx, proposal_idx, iou)) = best else {
            break;
        };
        achieved[gt_idx] = Some(iou);
        gt_used[gt_idx] = true;
        proposal_used[proposal_idx] = true;
    }

    achieved
}

/// Mark each detection of a score-ranked list as a true or false positive.
///
/// `ranked` must already be sorted by descending score; `ground_truths[i]`
/// holds the boxes of image `i`. A detection is a true positive when its best
/// IoU against its image's boxes is strictly above `iou_threshold` and that
/// box has not been claimed by an earlier detection. Everything else,
/// including detections on images without ground truth, is a false positive.
///
/// # Errors
///
/// Returns [`DetEvalError::ShapeMismatch`] if a detection refers to an image
/// index outside `ground_truths`.
pub fn match_ranked_detections(
    ranked: &[ClassDetection],
    ground_truths: &[Vec<BBox>],
    iou_threshold: f64,
) -> Result<Vec<bool>> {
    let mut covered: Vec<Vec<bool>> = ground_truths
        .iter()
        .map(|gts| vec![false; gts.len()])
        .collect();

    let mut is_true_positive = Vec::with_capacity(ranked.len());

    for det in ranked {
        let gts = ground_truths.get(det.image_id).ok_or_else(|| {
            DetEvalError::ShapeMismatch(format!(
                "detection refers to image {} but only {} images have ground truth",
                det.image_id,
                ground_truths.len()
            ))
        })?;

        let mut best: Option<(usize, f64)> = None;
        for (gt_idx, gt) in gts.iter().enumerate() {
            let iou = calculate_iou(&det.bbox, gt);
            if best.map_or(true, |(_, best_iou)| iou > best_iou) {
                best = Some((gt_idx, iou));
            }
        }

        let is_tp = match best {
            Some((gt_idx, iou)) if iou > iou_threshold && !covered[det.image_id][gt_idx] => {
                covered[det.image_id][gt_idx] = true;
                true
            }
            _ => false,
        };
        is_true_positive.push(is_tp);
    }

    Ok(is_true_positive)
}
