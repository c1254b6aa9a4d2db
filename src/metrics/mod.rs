//! Metric building blocks: box overlaps, precision-recall curves and AP.

pub mod iou;
pub mod ap;
pub mod precision_recall;

pub use iou::{bbox_overlaps, calculate_iou, IouMatrix};
pub use ap::{average_precision, mean_ap};
pub use precision_recall::{calculate_precision_recall_curve, cumulative_counts, EPS};
