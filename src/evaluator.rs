//! Per-class Average Precision and mean AP evaluation.

use crate::error::{DetEvalError, Result};
use crate::matching::{match_ranked_detections, rank_by_score};
use crate::metrics::ap::{average_precision, mean_ap};
use crate::metrics::precision_recall::calculate_precision_recall_curve;
use crate::types::{BBox, ClassDetection, ClassEvaluation, Detection, MapResult};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Evaluate a single class.
///
/// All detections of the class are ranked together by descending score,
/// across images. Equal scores keep their input order. Each ranked detection
/// is then matched against the ground truth of its own image (see
/// [`match_ranked_detections`]) and the resulting precision-recall curve is
/// integrated into AP.
///
/// # Arguments
///
/// * `detections` - Detections of this class, tagged with their image index
/// * `ground_truths` - Ground truth boxes of this class, per image
/// * `iou_threshold` - A detection needs IoU strictly above this to match
///
/// # Errors
///
/// Returns [`DetEvalError::ShapeMismatch`] if a detection refers to an image
/// outside `ground_truths`.
///
/// # Example
///
/// ```
/// use det_eval::evaluator::compute_class_ap;
/// use det_eval::types::{BBox, ClassDetection};
///
/// let gts = vec![vec![BBox::new(0.0, 0.0, 9.0, 9.0)]];
/// let dets = vec![
///     ClassDetection::new(0, BBox::new(0.0, 0.0, 9.0, 9.0), 0.9),
///     ClassDetection::new(0, BBox::new(20.0, 20.0, 29.0, 29.0), 0.8),
/// ];
///
/// let result = compute_class_ap(&dets, &gts, 0.5).unwrap();
/// assert_eq!(result.precision, vec![1.0, 0.5]);
/// assert_eq!(result.ap, 1.0);
/// ```
pub fn compute_class_ap(
    detections: &[ClassDetection],
    ground_truths: &[Vec<BBox>],
    iou_threshold: f64,
) -> Result<ClassEvaluation> {
    let gt_num: usize = ground_truths.iter().map(Vec::len).sum();

    let ranked: Vec<ClassDetection> = rank_by_score(detections, |det| det.score)
        .into_iter()
        .map(|idx| detections[idx])
        .collect();

    let is_true_positive = match_ranked_detections(&ranked, ground_truths, iou_threshold)?;
    let curve = calculate_precision_recall_curve(&is_true_positive, gt_num);
    let ap = average_precision(&curve.recall, &curve.precision);

    tracing::trace!(gt_num, det_num = ranked.len(), ap, "evaluated class");

    Ok(ClassEvaluation {
        gt_num,
        det_num: ranked.len(),
        recall: curve.recall,
        precision: curve.precision,
        ap,
    })
}

/// Evaluate mean Average Precision over a dataset.
///
/// **Independent per-class evaluation**: every class is ranked, matched and
/// integrated on its own; the classes are only combined in the final mean.
///
/// # Arguments
///
/// * `det_results` - Detections per image, then per class:
///   `det_results[image][class]`. Every image must list the same number of
///   classes.
/// * `gt_bboxes` - Ground truth boxes per image
/// * `gt_labels` - Label of each ground truth box; class `c` (0-based) is
///   label `c + 1`
/// * `iou_threshold` - A detection needs IoU strictly above this to match
///
/// # Returns
///
/// The mean AP over classes with at least one ground truth box, and one
/// [`ClassEvaluation`] per class.
///
/// # Errors
///
/// Returns [`DetEvalError::EmptyDataset`] when there are no images, and
/// [`DetEvalError::ShapeMismatch`] when the per-image collections do not line
/// up. Nothing is computed in either case.
pub fn compute_mean_ap(
    det_results: &[Vec<Vec<Detection>>],
    gt_bboxes: &[Vec<BBox>],
    gt_labels: &[Vec<usize>],
    iou_threshold: f64,
) -> Result<MapResult> {
    let class_num = check_shapes(det_results, gt_bboxes, gt_labels)?;

    tracing::debug!(
        images = gt_bboxes.len(),
        classes = class_num,
        iou_threshold,
        "computing mean AP"
    );

    #[cfg(feature = "parallel")]
    let classes: Vec<ClassEvaluation> = (0..class_num)
        .into_par_iter()
        .map(|class_idx| evaluate_class(det_results, gt_bboxes, gt_labels, class_idx, iou_threshold))
        .collect::<Result<Vec<_>>>()?;

    #[cfg(not(feature = "parallel"))]
    let classes: Vec<ClassEvaluation> = (0..class_num)
        .map(|class_idx| evaluate_class(det_results, gt_bboxes, gt_labels, class_idx, iou_threshold))
        .collect::<Result<Vec<_>>>()?;

    let mean_ap = mean_ap(&classes);

    tracing::debug!(
        mean_ap,
        eligible_classes = classes.iter().filter(|c| c.gt_num > 0).count(),
        "mean AP computed"
    );

    Ok(MapResult { mean_ap, classes })
}

/// Gather the detections and ground truth of one class and evaluate it.
fn evaluate_class(
    det_results: &[Vec<Vec<Detection>>],
    gt_bboxes: &[Vec<BBox>],
    gt_labels: &[Vec<usize>],
    class_idx: usize,
    iou_threshold: f64,
) -> Result<ClassEvaluation> {
    let label = class_idx + 1;

    let detections: Vec<ClassDetection> = det_results
        .iter()
        .enumerate()
        .flat_map(|(image_id, per_class)| {
            per_class[class_idx]
                .iter()
                .map(move |det| ClassDetection::new(image_id, det.bbox, det.score))
        })
        .collect();

    let ground_truths: Vec<Vec<BBox>> = gt_bboxes
        .iter()
        .zip(gt_labels)
        .map(|(boxes, labels)| {
            boxes
                .iter()
                .zip(labels)
                .filter(|(_, &l)| l == label)
                .map(|(bbox, _)| *bbox)
                .collect()
        })
        .collect();

    compute_class_ap(&detections, &ground_truths, iou_threshold)
}

/// Validate the per-image collections and return the class count.
fn check_shapes(
    det_results: &[Vec<Vec<Detection>>],
    gt_bboxes: &[Vec<BBox>],
    gt_labels: &[Vec<usize>],
) -> Result<usize> {
    if det_results.len() != gt_bboxes.len() || gt_bboxes.len() != gt_labels.len() {
        return Err(DetEvalError::ShapeMismatch(format!(
            "{} images of detections, {} of ground truth boxes, {} of labels",
            det_results.len(),
            gt_bboxes.len(),
            gt_labels.len()
        )));
    }

    let Some(first) = det_results.first() else {
        return Err(DetEvalError::EmptyDataset(
            "Detection results must cover at least one image".to_string(),
        ));
    };
    let class_num = first.len();

    for (image_id, per_class) in det_results.iter().enumerate() {
        if per_class.len() != class_num {
            return Err(DetEvalError::ShapeMismatch(format!(
                "image {} has detections for {} classes, expected {}",
                image_id,
                per_class.len(),
                class_num
            )));
        }
    }

    for (image_id, (boxes, labels)) in gt_bboxes.iter().zip(gt_labels).enumerate() {
        if boxes.len() != labels.len() {
            return Err(DetEvalError::ShapeMismatch(format!(
                "image {} has {} ground truth boxes but {} labels",
                image_id,
                boxes.len(),
                labels.len()
            )));
        }
    }

    Ok(class_num)
}
