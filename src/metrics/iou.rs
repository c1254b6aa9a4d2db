//! Intersection over Union (IoU) calculation.

use crate::types::BBox;

/// Dense IoU matrix, `matrix[i][j]` is the IoU of the `i`-th box of the first
/// set against the `j`-th box of the second set.
pub type IouMatrix = Vec<Vec<f64>>;

/// Calculate the Intersection over Union (IoU) between two bounding boxes.
///
/// Boxes use the inclusive pixel convention, so touching edges share one
/// pixel row or column. When the union area is not positive the IoU is 0.0
/// rather than `NaN`.
///
/// # Example
///
/// ```
/// use det_eval::metrics::iou::calculate_iou;
/// use det_eval::types::BBox;
///
/// let bbox1 = BBox::new(0.0, 0.0, 9.0, 9.0);
/// let bbox2 = BBox::new(5.0, 5.0, 14.0, 14.0);
/// let iou = calculate_iou(&bbox1, &bbox2);
/// assert!((iou - 25.0 / 175.0).abs() < 1e-12);
/// ```
pub fn calculate_iou(bbox1: &BBox, bbox2: &BBox) -> f64 {
    overlap_ratio(bbox1, bbox1.area(), bbox2, bbox2.area())
}

/// Calculate the IoU matrix between two sets of bounding boxes.
///
/// Either set may be empty, in which case the result has the right shape and
/// no values to compute (zero rows, or rows of zero length).
///
/// # Example
///
/// ```
/// use det_eval::metrics::iou::bbox_overlaps;
/// use det_eval::types::BBox;
///
/// let bboxes1 = vec![BBox::new(50.0, 50.0, 100.0, 100.0)];
/// let bboxes2 = vec![
///     BBox::new(75.0, 75.0, 150.0, 150.0),
///     BBox::new(150.0, 150.0, 200.0, 200.0),
/// ];
/// let ious = bbox_overlaps(&bboxes1, &bboxes2);
/// assert_eq!(ious.len(), 1);
/// assert_eq!(ious[0].len(), 2);
/// assert_eq!(ious[0][1], 0.0);
/// ```
pub fn bbox_overlaps(bboxes1: &[BBox], bboxes2: &[BBox]) -> IouMatrix {
    let areas2: Vec<f64> = bboxes2.iter().map(BBox::area).collect();

    bboxes1
        .iter()
        .map(|bbox1| {
            let area1 = bbox1.area();
            bboxes2
                .iter()
                .zip(&areas2)
                .map(|(bbox2, &area2)| overlap_ratio(bbox1, area1, bbox2, area2))
                .collect()
        })
        .collect()
}

fn overlap_ratio(bbox1: &BBox, area1: f64, bbox2: &BBox, area2: f64) -> f64 {
    let x_start = bbox1.x1.max(bbox2.x1);
    let y_start = bbox1.y1.max(bbox2.y1);
    let x_end = bbox1.x2.min(bbox2.x2);
    let y_end = bbox1.y2.min(bbox2.y2);

    let overlap = (x_end - x_start + 1.0).max(0.0) * (y_end - y_start + 1.0).max(0.0);
    let union = area1 + area2 - overlap;

    if union <= 0.0 {
        return 0.0;
    }

    overlap / union
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_boxes() {
        let bbox = BBox::new(0.0, 0.0, 9.0, 9.0);
        let iou = calculate_iou(&bbox, &bbox);
        assert!((iou - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_no_overlap() {
        let bbox1 = BBox::new(0.0, 0.0, 9.0, 9.0);
        let bbox2 = BBox::new(20.0, 20.0, 29.0, 29.0);
        assert_eq!(calculate_iou(&bbox1, &bbox2), 0.0);
    }

    #[test]
    fn test_touching_edges_share_a_pixel() {
        // x2 == x1 of the neighbour: one shared column of 10 pixels
        let bbox1 = BBox::new(0.0, 0.0, 9.0, 9.0);
        let bbox2 = BBox::new(9.0, 0.0, 18.0, 9.0);
        let iou = calculate_iou(&bbox1, &bbox2);
        assert!((iou - 10.0 / 190.0).abs() < 1e-12);
    }

    #[test]
    fn test_known_overlaps() {
        let bboxes1 = vec![BBox::new(50.0, 50.0, 100.0, 100.0)];
        let bboxes2 = vec![
            BBox::new(75.0, 75.0, 150.0, 150.0),
            BBox::new(100.0, 100.0, 150.0, 150.0),
            BBox::new(150.0, 150.0, 200.0, 200.0),
        ];

        let ious = bbox_overlaps(&bboxes1, &bboxes2);
        assert!((ious[0][0] - 0.087_780_81).abs() < 1e-6);
        assert!((ious[0][1] - 0.000_192_27).abs() < 1e-6);
        assert_eq!(ious[0][2], 0.0);
    }

    #[test]
    fn test_zero_union_is_zero() {
        // Both boxes have area 0 (width 0) and no overlap
        let degenerate = BBox::new(5.0, 5.0, 4.0, 4.0);
        assert_eq!(calculate_iou(&degenerate, &degenerate), 0.0);
    }

    #[test]
    fn test_empty_inputs() {
        let boxes = vec![BBox::new(0.0, 0.0, 9.0, 9.0), BBox::new(1.0, 1.0, 5.0, 5.0)];

        let matrix = bbox_overlaps(&boxes, &[]);
        assert_eq!(matrix.len(), 2);
        assert!(matrix.iter().all(|row| row.is_empty()));

        let matrix = bbox_overlaps(&[], &boxes);
        assert!(matrix.is_empty());
    }

    #[test]
    fn test_matrix_transpose_symmetry() {
        let bboxes1 = vec![
            BBox::new(0.0, 0.0, 9.0, 9.0),
            BBox::new(5.0, 5.0, 14.0, 14.0),
        ];
        let bboxes2 = vec![
            BBox::new(0.0, 0.0, 9.0, 9.0),
            BBox::new(3.0, 2.0, 20.0, 11.0),
            BBox::new(40.0, 40.0, 41.0, 41.0),
        ];

        let forward = bbox_overlaps(&bboxes1, &bboxes2);
        let backward = bbox_overlaps(&bboxes2, &bboxes1);
        for (i, row) in forward.iter().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                assert_eq!(value, backward[j][i]);
            }
        }
    }
}
