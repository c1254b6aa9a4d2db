//! Integration tests for the complete recall and mAP evaluation pipeline.

use det_eval::evaluator::{compute_class_ap, compute_mean_ap};
use det_eval::params::IouThresholds;
use det_eval::recall::{compute_recall, compute_recall_ranked};
use det_eval::report::{format_map_summary, format_recall_summary};
use det_eval::types::{BBox, ClassDetection, Detection};

fn bbox(x1: f64, y1: f64, x2: f64, y2: f64) -> BBox {
    BBox::new(x1, y1, x2, y2)
}

fn det(x1: f64, y1: f64, x2: f64, y2: f64, score: f64) -> Detection {
    Detection::new(bbox(x1, y1, x2, y2), score)
}

#[test]
fn test_single_class_two_detections() {
    // One true positive at the top, one false positive below it
    let gts = vec![vec![bbox(0.0, 0.0, 9.0, 9.0)]];
    let detections = vec![
        ClassDetection::new(0, bbox(0.0, 0.0, 9.0, 9.0), 0.9),
        ClassDetection::new(0, bbox(20.0, 20.0, 29.0, 29.0), 0.8),
    ];

    let result = compute_class_ap(&detections, &gts, 0.5).unwrap();

    assert_eq!(result.gt_num, 1);
    assert_eq!(result.det_num, 2);
    assert_eq!(result.recall, vec![1.0, 1.0]);
    assert_eq!(result.precision, vec![1.0, 0.5]);
    assert_eq!(result.ap, 1.0);
}

#[test]
fn test_recall_two_boxes_two_cutoffs() {
    let gts = vec![vec![bbox(0.0, 0.0, 9.0, 9.0), bbox(20.0, 20.0, 29.0, 29.0)]];
    let proposals = vec![vec![
        det(0.0, 0.0, 9.0, 9.0, 0.9),
        det(20.0, 20.0, 29.0, 29.0, 0.8),
    ]];

    let table = compute_recall(&gts, &proposals, &[1, 2], &[0.5]).unwrap();

    assert_eq!(table.proposal_counts, vec![1, 2]);
    assert_eq!(table.iou_thresholds, vec![0.5]);
    assert_eq!(table.get(0, 0), Some(0.5));
    assert_eq!(table.get(1, 0), Some(1.0));
}

#[test]
fn test_perfect_detector_multi_class() {
    let gt_bboxes = vec![
        vec![bbox(10.0, 10.0, 59.0, 59.0), bbox(100.0, 100.0, 149.0, 149.0)],
        vec![bbox(30.0, 40.0, 90.0, 120.0)],
    ];
    let gt_labels = vec![vec![1, 2], vec![2]];

    let det_results = vec![
        vec![
            vec![det(10.0, 10.0, 59.0, 59.0, 0.95)],
            vec![det(100.0, 100.0, 149.0, 149.0, 0.9)],
        ],
        vec![vec![], vec![det(30.0, 40.0, 90.0, 120.0, 0.85)]],
    ];

    let result = compute_mean_ap(&det_results, &gt_bboxes, &gt_labels, 0.5).unwrap();

    assert_eq!(result.classes.len(), 2);
    assert_eq!(result.classes[0].gt_num, 1);
    assert_eq!(result.classes[1].gt_num, 2);
    assert_eq!(result.classes[1].det_num, 2);
    assert!((result.mean_ap - 1.0).abs() < 1e-12);
}

#[test]
fn test_false_positives_only() {
    let gt_bboxes = vec![vec![bbox(0.0, 0.0, 9.0, 9.0)]];
    let gt_labels = vec![vec![1]];
    let det_results = vec![vec![vec![
        det(100.0, 100.0, 109.0, 109.0, 0.9),
        det(200.0, 200.0, 209.0, 209.0, 0.5),
    ]]];

    let result = compute_mean_ap(&det_results, &gt_bboxes, &gt_labels, 0.5).unwrap();

    assert_eq!(result.classes[0].ap, 0.0);
    assert_eq!(result.mean_ap, 0.0);
    assert_eq!(result.classes[0].precision, vec![0.0, 0.0]);
}

#[test]
fn test_duplicate_detections_are_false_positives() {
    let gts = vec![vec![bbox(0.0, 0.0, 9.0, 9.0), bbox(50.0, 50.0, 59.0, 59.0)]];
    let detections = vec![
        ClassDetection::new(0, bbox(0.0, 0.0, 9.0, 9.0), 0.9),
        ClassDetection::new(0, bbox(0.0, 0.0, 9.0, 9.0), 0.8),
        ClassDetection::new(0, bbox(50.0, 50.0, 59.0, 59.0), 0.7),
    ];

    let result = compute_class_ap(&detections, &gts, 0.5).unwrap();

    assert_eq!(result.recall, vec![0.5, 0.5, 1.0]);
    assert!((result.precision[2] - 2.0 / 3.0).abs() < 1e-12);
    assert!((result.ap - (0.5 + 1.0 / 3.0)).abs() < 1e-12);
}

#[test]
fn test_recall_over_several_images() {
    let gts = vec![
        vec![bbox(0.0, 0.0, 9.0, 9.0), bbox(30.0, 30.0, 49.0, 49.0)],
        vec![],
        vec![bbox(5.0, 5.0, 24.0, 24.0)],
    ];
    // Proposals already in rank order; the second image has no ground truth
    let proposals = vec![
        vec![bbox(0.0, 0.0, 9.0, 11.0), bbox(30.0, 30.0, 49.0, 49.0)],
        vec![bbox(0.0, 0.0, 50.0, 50.0)],
        vec![bbox(100.0, 100.0, 120.0, 120.0), bbox(5.0, 5.0, 24.0, 24.0)],
    ];

    let table = compute_recall_ranked(&gts, &proposals, &[1, 2], &[0.5, 0.9]).unwrap();

    // Cutoff 1: image 0 matches box 0 at 100/120, image 2 misses
    assert!((table.recalls[0][0] - 1.0 / 3.0).abs() < 1e-12);
    assert_eq!(table.recalls[0][1], 0.0);
    // Cutoff 2: everything matches at 0.5; only the exact boxes pass 0.9
    assert_eq!(table.recalls[1][0], 1.0);
    assert!((table.recalls[1][1] - 2.0 / 3.0).abs() < 1e-12);
}

#[test]
fn test_reports_render_results() {
    let gt_bboxes = vec![vec![bbox(0.0, 0.0, 9.0, 9.0)]];
    let gt_labels = vec![vec![1]];
    let det_results = vec![vec![vec![det(0.0, 0.0, 9.0, 9.0, 0.9)]]];

    let result = compute_mean_ap(&det_results, &gt_bboxes, &gt_labels, 0.5).unwrap();
    let text = format_map_summary(&result);
    assert!(text.contains("class 1, gt num: 1, det num: 1, recall: 1.0000, ap: 1.0000"));
    assert!(text.contains("mAP: 1.0000"));

    let proposals = vec![vec![det(0.0, 0.0, 9.0, 9.0, 0.9)]];
    let table = compute_recall(&gt_bboxes, &proposals, &[1], &[0.5]).unwrap();
    let text = format_recall_summary(&table, None, None);
    assert!(text.contains("| 1 | 1.000 |"));
}

#[test]
fn test_recall_over_coco_threshold_sweep() {
    // IoU 0.87: a 100-pixel strip against its first 87 pixels
    let gts = vec![vec![bbox(0.0, 0.0, 99.0, 0.0)]];
    let proposals = vec![vec![det(0.0, 0.0, 86.0, 0.0, 0.9)]];
    let thresholds = IouThresholds::coco().normalize().unwrap();

    let table = compute_recall(&gts, &proposals, &[1], &thresholds).unwrap();
    let mut expected = vec![1.0; 8];
    expected.extend([0.0, 0.0]);
    assert_eq!(table.row(0), expected.as_slice());
}
