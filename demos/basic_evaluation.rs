//! Basic evaluation example demonstrating core functionality.
//!
//! Run with `RUST_LOG=det_eval=debug` to see the evaluators' log events.

use det_eval::{
    bbox_overlaps, compute_mean_ap, compute_recall, load_config_from_str,
    report::{format_map_summary, format_recall_summary, num_recall_curve},
    BBox, Detection, IouThresholds,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Detection Evaluation Example ===\n");

    // Example 1: IoU matrix
    println!("1. IoU Calculation");
    let gt = vec![BBox::new(50.0, 50.0, 100.0, 100.0)];
    let candidates = vec![
        BBox::new(75.0, 75.0, 150.0, 150.0),
        BBox::new(100.0, 100.0, 150.0, 150.0),
        BBox::new(150.0, 150.0, 200.0, 200.0),
    ];
    let ious = bbox_overlaps(&gt, &candidates);
    println!("   IoUs against the ground truth box: {:?}", ious[0]);
    println!();

    // Example 2: Settings
    println!("2. Loading Evaluation Settings");
    let config = load_config_from_str(
        r#"{
            "iou_threshold": 0.5,
            "proposal_counts": [1, 2, 5],
            "recall_iou_thresholds": [0.5, 0.7, 0.9]
        }"#,
    )?;
    println!("   {:?}", config);
    println!();

    // Two images: persons are label 1, cars are label 2
    let gt_bboxes = vec![
        vec![
            BBox::new(100.0, 100.0, 299.0, 249.0),
            BBox::new(350.0, 200.0, 449.0, 319.0),
        ],
        vec![BBox::new(20.0, 30.0, 119.0, 229.0)],
    ];
    let gt_labels = vec![vec![1, 2], vec![1]];

    let det_results = vec![
        vec![
            vec![
                Detection::new(BBox::new(105.0, 98.0, 300.0, 252.0), 0.95),
                Detection::new(BBox::new(50.0, 50.0, 129.0, 139.0), 0.42),
            ],
            vec![Detection::new(BBox::new(348.0, 198.0, 452.0, 322.0), 0.87)],
        ],
        vec![
            vec![Detection::new(BBox::new(25.0, 60.0, 119.0, 229.0), 0.64)],
            vec![Detection::new(BBox::new(200.0, 200.0, 260.0, 260.0), 0.31)],
        ],
    ];

    // Example 3: Proposal recall, treating all detections as class-agnostic proposals
    println!("3. Proposal Recall");
    let proposals: Vec<Vec<Detection>> = det_results
        .iter()
        .map(|per_class| per_class.iter().flatten().copied().collect())
        .collect();
    let table = compute_recall(
        &gt_bboxes,
        &proposals,
        &config.proposal_counts,
        &config.recall_iou_thresholds,
    )?;
    println!("{}", format_recall_summary(&table, None, None));
    println!(
        "   Recall vs. proposals @ IoU 0.5: {:?}",
        num_recall_curve(&table.column(0), &table.proposal_counts)
    );

    let sweep = compute_recall(
        &gt_bboxes,
        &proposals,
        &config.proposal_counts,
        &IouThresholds::coco().normalize()?,
    )?;
    println!("{}", format_recall_summary(&sweep, Some(&[2][..]), None));
    println!();

    // Example 4: mAP
    println!("4. Mean Average Precision");
    let result = compute_mean_ap(&det_results, &gt_bboxes, &gt_labels, config.iou_threshold)?;
    println!("{}", format_map_summary(&result));
    println!();

    println!("=== Example Complete ===");

    Ok(())
}
