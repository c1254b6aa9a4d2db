//! Proposal recall evaluation.
//!
//! For every image the top-N proposals are greedily matched to the ground
//! truth (see [`greedy_match`]); the achieved IoUs of all images are pooled
//! and counted against each IoU threshold.

use crate::error::{DetEvalError, Result};
use crate::matching::{greedy_match, rank_by_score};
use crate::metrics::iou::{bbox_overlaps, IouMatrix};
use crate::params::{validate_iou_thresholds, validate_proposal_counts};
use crate::types::{BBox, Detection, RecallTable};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Compute the recall table of scored proposals.
///
/// Each image's proposals are ranked by descending score (stable for ties)
/// before the top-N cutoffs are taken.
///
/// # Arguments
///
/// * `ground_truths` - Ground truth boxes of each image
/// * `proposals` - Scored proposals of each image
/// * `proposal_counts` - Top-N cutoffs, one table row each
/// * `iou_thresholds` - IoU thresholds, one table column each
///
/// # Errors
///
/// Returns [`DetEvalError::ShapeMismatch`] if the image counts differ, or a
/// parameter error for empty or out-of-range cutoffs and thresholds.
///
/// # Example
///
/// ```
/// use det_eval::recall::compute_recall;
/// use det_eval::types::{BBox, Detection};
///
/// let gts = vec![vec![BBox::new(0.0, 0.0, 9.0, 9.0), BBox::new(20.0, 20.0, 29.0, 29.0)]];
/// let proposals = vec![vec![
///     Detection::new(BBox::new(20.0, 20.0, 29.0, 29.0), 0.4),
///     Detection::new(BBox::new(0.0, 0.0, 9.0, 9.0), 0.9),
/// ]];
///
/// let table = compute_recall(&gts, &proposals, &[1, 2], &[0.5]).unwrap();
/// assert_eq!(table.recalls, vec![vec![0.5], vec![1.0]]);
/// ```
pub fn compute_recall(
    ground_truths: &[Vec<BBox>],
    proposals: &[Vec<Detection>],
    proposal_counts: &[usize],
    iou_thresholds: &[f64],
) -> Result<RecallTable> {
    check_image_counts(ground_truths.len(), proposals.len())?;

    let ranked: Vec<Vec<BBox>> = proposals
        .iter()
        .map(|dets| {
            rank_by_score(dets, |det| det.score)
                .into_iter()
                .map(|idx| dets[idx].bbox)
                .collect()
        })
        .collect();

    compute_recall_ranked(ground_truths, &ranked, proposal_counts, iou_thresholds)
}

/// Compute the recall table of proposals that are already in rank order.
///
/// Use this for unscored proposals; the given order is taken as the ranking.
///
/// # Errors
///
/// Same as [`compute_recall`].
pub fn compute_recall_ranked(
    ground_truths: &[Vec<BBox>],
    proposals: &[Vec<BBox>],
    proposal_counts: &[usize],
    iou_thresholds: &[f64],
) -> Result<RecallTable> {
    check_image_counts(ground_truths.len(), proposals.len())?;
    validate_proposal_counts(proposal_counts)?;
    validate_iou_thresholds(iou_thresholds)?;

    let max_count = proposal_counts.iter().copied().max().unwrap_or(0);
    let total_gt_num: usize = ground_truths.iter().map(Vec::len).sum();

    tracing::debug!(
        images = ground_truths.len(),
        total_gt_num,
        max_count,
        "computing proposal recall"
    );

    #[cfg(feature = "parallel")]
    let per_image: Vec<Vec<Vec<Option<f64>>>> = ground_truths
        .par_iter()
        .zip(proposals.par_iter())
        .map(|(gts, props)| match_image(gts, props, proposal_counts, max_count))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let per_image: Vec<Vec<Vec<Option<f64>>>> = ground_truths
        .iter()
        .zip(proposals)
        .map(|(gts, props)| match_image(gts, props, proposal_counts, max_count))
        .collect();

    let recalls = (0..proposal_counts.len())
        .map(|row| {
            let mut achieved: Vec<f64> = per_image
                .iter()
                .flat_map(|cutoffs| cutoffs[row].iter().flatten().copied())
                .collect();
            achieved.sort_by(|a, b| b.total_cmp(a));

            iou_thresholds
                .iter()
                .map(|&thr| {
                    if total_gt_num == 0 {
                        return 0.0;
                    }
                    let matched = achieved.partition_point(|&iou| iou >= thr);
                    matched as f64 / total_gt_num as f64
                })
                .collect()
        })
        .collect();

    Ok(RecallTable {
        proposal_counts: proposal_counts.to_vec(),
        iou_thresholds: iou_thresholds.to_vec(),
        recalls,
    })
}

/// Achieved IoU of every ground truth box of one image, per cutoff.
fn match_image(
    gts: &[BBox],
    proposals: &[BBox],
    proposal_counts: &[usize],
    max_count: usize,
) -> Vec<Vec<Option<f64>>> {
    let top = &proposals[..proposals.len().min(max_count)];
    let ious: IouMatrix = bbox_overlaps(gts, top);

    proposal_counts
        .iter()
        .map(|&count| greedy_match(&ious, count))
        .collect()
}

fn check_image_counts(gt_images: usize, proposal_images: usize) -> Result<()> {
    if gt_images != proposal_images {
        return Err(DetEvalError::ShapeMismatch(format!(
            "{} images of ground truth but {} images of proposals",
            gt_images, proposal_images
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(offset: f64, size: f64) -> BBox {
        BBox::new(offset, offset, offset + size - 1.0, offset + size - 1.0)
    }

    #[test]
    fn test_recall_per_cutoff() {
        let gts = vec![vec![square(0.0, 10.0), square(20.0, 10.0)]];
        let proposals = vec![vec![square(0.0, 10.0), square(20.0, 10.0)]];

        let table = compute_recall_ranked(&gts, &proposals, &[1, 2], &[0.5]).unwrap();
        assert_eq!(table.recalls, vec![vec![0.5], vec![1.0]]);
    }

    #[test]
    fn test_cutoff_larger_than_available() {
        let gts = vec![vec![square(0.0, 10.0), square(20.0, 10.0)]];
        let proposals = vec![vec![square(0.0, 10.0)]];

        let table = compute_recall_ranked(&gts, &proposals, &[1, 100], &[0.5]).unwrap();
        assert_eq!(table.recalls, vec![vec![0.5], vec![0.5]]);
    }

    #[test]
    fn test_image_without_ground_truth_adds_nothing() {
        let gts = vec![vec![square(0.0, 10.0)], vec![]];
        let proposals = vec![vec![square(0.0, 10.0)], vec![square(50.0, 10.0)]];

        let table = compute_recall_ranked(&gts, &proposals, &[10], &[0.5]).unwrap();
        assert_eq!(table.recalls, vec![vec![1.0]]);
    }

    #[test]
    fn test_unmatched_boxes_fail_even_at_zero_threshold() {
        let gts = vec![vec![square(0.0, 10.0), square(20.0, 10.0)]];
        let proposals = vec![vec![square(100.0, 10.0)]];

        let table = compute_recall_ranked(&gts, &proposals, &[5], &[0.0, 0.5]).unwrap();
        // The one proposal is matched with IoU 0, which passes a 0.0 threshold
        assert_eq!(table.recalls, vec![vec![0.5, 0.0]]);
    }

    #[test]
    fn test_scored_proposals_are_ranked() {
        let gts = vec![vec![square(0.0, 10.0)]];
        let proposals = vec![vec![
            Detection::new(square(40.0, 10.0), 0.2),
            Detection::new(square(0.0, 10.0), 0.8),
        ]];

        let table = compute_recall(&gts, &proposals, &[1], &[0.5]).unwrap();
        assert_eq!(table.recalls, vec![vec![1.0]]);
    }

    #[test]
    fn test_no_ground_truth_anywhere() {
        let gts = vec![vec![], vec![]];
        let proposals = vec![vec![square(0.0, 10.0)], vec![]];

        let table = compute_recall_ranked(&gts, &proposals, &[1], &[0.5]).unwrap();
        assert_eq!(table.recalls, vec![vec![0.0]]);
    }

    #[test]
    fn test_image_count_mismatch() {
        let gts = vec![vec![square(0.0, 10.0)]];
        let result = compute_recall_ranked(&gts, &[], &[1], &[0.5]);
        assert!(matches!(result, Err(DetEvalError::ShapeMismatch(_))));
    }
}
