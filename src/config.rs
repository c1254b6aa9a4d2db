//! Evaluation settings, loadable from JSON.

use crate::error::Result;
use crate::params::{
    validate_iou_thresholds, validate_proposal_counts, validate_threshold,
    DEFAULT_IOU_THRESHOLD, DEFAULT_PROPOSAL_COUNTS,
};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Settings shared by the recall and mAP evaluators.
///
/// Every field is optional in JSON and falls back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// IoU a detection must exceed to count as a true positive for mAP
    pub iou_threshold: f64,
    /// Top-N cutoffs for the recall table
    pub proposal_counts: Vec<usize>,
    /// IoU thresholds for the recall table
    pub recall_iou_thresholds: Vec<f64>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            iou_threshold: DEFAULT_IOU_THRESHOLD,
            proposal_counts: DEFAULT_PROPOSAL_COUNTS.to_vec(),
            recall_iou_thresholds: vec![DEFAULT_IOU_THRESHOLD],
        }
    }
}

impl EvalConfig {
    /// Check that thresholds are in `[0.0, 1.0]` and no list is empty.
    pub fn validate(&self) -> Result<()> {
        validate_threshold(self.iou_threshold)?;
        validate_proposal_counts(&self.proposal_counts)?;
        validate_iou_thresholds(&self.recall_iou_thresholds)
    }
}

/// Load an evaluation config from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if the config
/// fails validation.
///
/// # Example
///
/// ```no_run
/// use det_eval::config::load_config_from_file;
///
/// let config = load_config_from_file("eval.json").unwrap();
/// println!("IoU threshold: {}", config.iou_threshold);
/// ```
pub fn load_config_from_file<P: AsRef<Path>>(path: P) -> Result<EvalConfig> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let config: EvalConfig = serde_json::from_reader(reader)?;

    config.validate()?;

    Ok(config)
}

/// Load an evaluation config from a JSON string.
///
/// # Example
///
/// ```
/// use det_eval::config::load_config_from_str;
///
/// let config = load_config_from_str(r#"{ "proposal_counts": [1, 10] }"#).unwrap();
/// assert_eq!(config.proposal_counts, vec![1, 10]);
/// assert_eq!(config.iou_threshold, 0.5);
/// ```
pub fn load_config_from_str(json_str: &str) -> Result<EvalConfig> {
    let config: EvalConfig = serde_json::from_str(json_str)?;
    config.validate()?;
    Ok(config)
}
