//! # det-eval
//!
//! Offline scoring of object detectors against a benchmark.
//!
//! Given ground truth boxes and a detector's scored boxes for a set of
//! images, this library computes:
//! - **Proposal recall** for a grid of top-N cutoffs and IoU thresholds
//! - **AP** (Average Precision) per class
//! - **mAP** (mean Average Precision) over classes that have ground truth
//!
//! ## Features
//!
//! - IoU matrices for inclusive-pixel `(x1, y1, x2, y2)` boxes
//! - Greedy max-first matching of proposals to ground truth for recall
//! - Exact-integral AP over the precision envelope
//! - ASCII summaries of recall tables and per-class results
//! - Optional `parallel` feature running per-image and per-class work on rayon
//!
//! ## Quick Start
//!
//! ```rust
//! use det_eval::{compute_mean_ap, compute_recall, BBox, Detection};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let gt_bboxes = vec![vec![BBox::new(0.0, 0.0, 9.0, 9.0)]];
//! let gt_labels = vec![vec![1]];
//!
//! // One image, one class, two detections
//! let det_results = vec![vec![vec![
//!     Detection::new(BBox::new(0.0, 0.0, 9.0, 9.0), 0.9),
//!     Detection::new(BBox::new(20.0, 20.0, 29.0, 29.0), 0.8),
//! ]]];
//!
//! let result = compute_mean_ap(&det_results, &gt_bboxes, &gt_labels, 0.5)?;
//! assert_eq!(result.mean_ap, 1.0);
//!
//! // Class-agnostic proposals, one list per image
//! let proposals = vec![vec![Detection::new(BBox::new(1.0, 0.0, 9.0, 9.0), 0.7)]];
//! let recalls = compute_recall(&gt_bboxes, &proposals, &[1], &[0.5])?;
//! assert_eq!(recalls.recalls, vec![vec![1.0]]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Box convention
//!
//! Coordinates are inclusive pixel indices: a box from `x1 = 0` to `x2 = 9`
//! is 10 pixels wide. Boxes are not validated; inverted boxes yield
//! non-positive areas and are the caller's responsibility.

pub mod error;
pub mod types;
pub mod params;
pub mod config;
pub mod metrics;
pub mod matching;
pub mod recall;
pub mod evaluator;
pub mod report;

// Re-export commonly used types and functions
pub use error::{DetEvalError, Result};
pub use types::{
    BBox, Detection, ClassDetection, ClassEvaluation, MapResult, RecallTable,
    PrecisionRecallCurve,
};
pub use config::{load_config_from_file, load_config_from_str, EvalConfig};
pub use params::{IouThresholds, ProposalCounts};
pub use metrics::iou::bbox_overlaps;
pub use recall::{compute_recall, compute_recall_ranked};
pub use evaluator::{compute_class_ap, compute_mean_ap};

