//! Core data types for boxes, detections and evaluation results.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in corner format (x1, y1, x2, y2).
///
/// Coordinates are *inclusive* pixel indices, so a box spanning
/// `x1 = 0` to `x2 = 9` is 10 pixels wide:
/// - width: `x2 - x1 + 1`
/// - height: `y2 - y1 + 1`
///
/// Malformed boxes (`x2 < x1` or `y2 < y1`) are accepted as-is. Their area
/// is computed without clamping; validating geometry is the caller's job.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BBox {
    /// Create a new bounding box.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Inclusive width (`x2 - x1 + 1`).
    pub fn width(&self) -> f64 {
        self.x2 - self.x1 + 1.0
    }

    /// Inclusive height (`y2 - y1 + 1`).
    pub fn height(&self) -> f64 {
        self.y2 - self.y1 + 1.0
    }

    /// Unclamped area, negative for inverted boxes.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Check if the bounding box has positive extent on both axes.
    pub fn is_valid(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }
}

impl From<[f64; 4]> for BBox {
    fn from(coords: [f64; 4]) -> Self {
        Self::new(coords[0], coords[1], coords[2], coords[3])
    }
}

/// A scored bounding box produced by a detector or proposal generator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub bbox: BBox,
    pub score: f64,
}

impl Detection {
    /// Create a new detection.
    pub fn new(bbox: BBox, score: f64) -> Self {
        Self { bbox, score }
    }
}

/// A detection of a single class, tagged with the index of the image it came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassDetection {
    pub image_id: usize,
    pub bbox: BBox,
    pub score: f64,
}

impl ClassDetection {
    /// Create a new class detection.
    pub fn new(image_id: usize, bbox: BBox, score: f64) -> Self {
        Self { image_id, bbox, score }
    }
}

/// Cumulative recall and precision, one point per ranked detection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrecisionRecallCurve {
    pub recall: Vec<f64>,
    pub precision: Vec<f64>,
}

/// Evaluation record for a single class.
///
/// `recall` and `precision` hold one cumulative value per ranked detection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassEvaluation {
    /// Number of ground truth boxes of this class across the dataset
    pub gt_num: usize,
    /// Number of detections of this class across the dataset
    pub det_num: usize,
    /// Cumulative recall at each ranked detection
    pub recall: Vec<f64>,
    /// Cumulative precision at each ranked detection
    pub precision: Vec<f64>,
    /// Average Precision
    pub ap: f64,
}

impl ClassEvaluation {
    /// Recall reached once every detection is counted, 0.0 without detections.
    pub fn final_recall(&self) -> f64 {
        self.recall.last().copied().unwrap_or(0.0)
    }
}

/// Result of a mean Average Precision evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapResult {
    /// Mean of `ap` over classes with at least one ground truth box
    pub mean_ap: f64,
    /// Per-class records, indexed by class (label - 1)
    pub classes: Vec<ClassEvaluation>,
}

/// Recall table indexed by (proposal count, IoU threshold).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecallTable {
    pub proposal_counts: Vec<usize>,
    pub iou_thresholds: Vec<f64>,
    /// Row-major values, `proposal_counts.len()` rows by `iou_thresholds.len()` columns
    pub recalls: Vec<Vec<f64>>,
}

impl RecallTable {
    /// Recall for the `row`-th proposal count and `col`-th IoU threshold.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.recalls.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Recalls of every proposal count at the `col`-th IoU threshold.
    pub fn column(&self, col: usize) -> Vec<f64> {
        self.recalls.iter().filter_map(|r| r.get(col).copied()).collect()
    }

    /// Recalls at every IoU threshold for the `row`-th proposal count.
    pub fn row(&self, row: usize) -> &[f64] {
        self.recalls.get(row).map(Vec::as_slice).unwrap_or(&[])
    }
}
