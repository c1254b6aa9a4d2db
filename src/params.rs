//! Normalization of recall parameters into canonical sequences.
//!
//! Callers may pass a single value, a list, or nothing at all; the
//! evaluators only ever see the validated `Vec` produced here.

use crate::error::{DetEvalError, Result};

/// Proposal-count cutoffs used when none are given.
pub const DEFAULT_PROPOSAL_COUNTS: [usize; 3] = [100, 300, 1000];

/// IoU threshold used when none is given.
pub const DEFAULT_IOU_THRESHOLD: f64 = 0.5;

/// Accepted shapes for proposal-count cutoffs.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ProposalCounts {
    /// Use [`DEFAULT_PROPOSAL_COUNTS`].
    #[default]
    Default,
    Single(usize),
    List(Vec<usize>),
}

impl From<usize> for ProposalCounts {
    fn from(count: usize) -> Self {
        Self::Single(count)
    }
}

impl From<Vec<usize>> for ProposalCounts {
    fn from(counts: Vec<usize>) -> Self {
        Self::List(counts)
    }
}

impl From<&[usize]> for ProposalCounts {
    fn from(counts: &[usize]) -> Self {
        Self::List(counts.to_vec())
    }
}

impl From<Option<Vec<usize>>> for ProposalCounts {
    fn from(counts: Option<Vec<usize>>) -> Self {
        counts.map_or(Self::Default, Self::List)
    }
}

impl ProposalCounts {
    /// Resolve into a non-empty list of cutoffs.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit list is empty.
    ///
    /// # Example
    ///
    /// ```
    /// use det_eval::params::ProposalCounts;
    ///
    /// assert_eq!(ProposalCounts::from(300).normalize().unwrap(), vec![300]);
    /// assert_eq!(ProposalCounts::Default.normalize().unwrap(), vec![100, 300, 1000]);
    /// assert!(ProposalCounts::List(vec![]).normalize().is_err());
    /// ```
    pub fn normalize(self) -> Result<Vec<usize>> {
        let counts = match self {
            Self::Default => DEFAULT_PROPOSAL_COUNTS.to_vec(),
            Self::Single(count) => vec![count],
            Self::List(counts) => counts,
        };
        validate_proposal_counts(&counts)?;
        Ok(counts)
    }
}

/// Accepted shapes for IoU thresholds.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum IouThresholds {
    /// Use `[DEFAULT_IOU_THRESHOLD]`.
    #[default]
    Default,
    Single(f64),
    List(Vec<f64>),
    /// `steps` evenly spaced thresholds from `start` to `end` inclusive.
    Range { start: f64, end: f64, steps: usize },
}

impl From<f64> for IouThresholds {
    fn from(threshold: f64) -> Self {
        Self::Single(threshold)
    }
}

impl From<Vec<f64>> for IouThresholds {
    fn from(thresholds: Vec<f64>) -> Self {
        Self::List(thresholds)
    }
}

impl From<&[f64]> for IouThresholds {
    fn from(thresholds: &[f64]) -> Self {
        Self::List(thresholds.to_vec())
    }
}

impl From<Option<Vec<f64>>> for IouThresholds {
    fn from(thresholds: Option<Vec<f64>>) -> Self {
        thresholds.map_or(Self::Default, Self::List)
    }
}

impl IouThresholds {
    /// The COCO sweep `0.50:0.05:0.95`.
    pub fn coco() -> Self {
        Self::Range { start: 0.5, end: 0.95, steps: 10 }
    }

    /// Resolve into a non-empty list of thresholds in `[0.0, 1.0]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty or holds an out-of-range value.
    ///
    /// # Example
    ///
    /// ```
    /// use det_eval::params::IouThresholds;
    ///
    /// assert_eq!(IouThresholds::Default.normalize().unwrap(), vec![0.5]);
    /// assert_eq!(IouThresholds::from(0.7).normalize().unwrap(), vec![0.7]);
    /// assert!(IouThresholds::from(1.5).normalize().is_err());
    /// assert_eq!(IouThresholds::coco().normalize().unwrap().len(), 10);
    /// ```
    pub fn normalize(self) -> Result<Vec<f64>> {
        let thresholds = match self {
            Self::Default => vec![DEFAULT_IOU_THRESHOLD],
            Self::Single(threshold) => vec![threshold],
            Self::List(thresholds) => thresholds,
            Self::Range { start, end, steps } => generate_iou_range(start, end, steps)?,
        };
        validate_iou_thresholds(&thresholds)?;
        Ok(thresholds)
    }
}

/// Evenly spaced IoU thresholds from `start` to `end`, both included.
///
/// A single step yields just `start`. The last value is pinned to `end`.
///
/// # Example
///
/// ```
/// use det_eval::params::generate_iou_range;
///
/// let thresholds = generate_iou_range(0.5, 0.95, 10).unwrap();
/// assert_eq!(thresholds.len(), 10);
/// assert!((thresholds[1] - 0.55).abs() < 1e-12);
/// assert_eq!(thresholds[9], 0.95);
/// ```
pub fn generate_iou_range(start: f64, end: f64, steps: usize) -> Result<Vec<f64>> {
    validate_threshold(start)?;
    validate_threshold(end)?;
    if start > end {
        return Err(DetEvalError::InvalidThreshold(format!(
            "IoU range start {} is above its end {}",
            start, end
        )));
    }

    match steps {
        0 => Err(DetEvalError::InvalidThreshold(
            "An IoU range needs at least one step".to_string(),
        )),
        1 => Ok(vec![start]),
        _ => {
            let last = steps - 1;
            let span = end - start;
            Ok((0..steps)
                .map(|i| if i == last { end } else { start + span * i as f64 / last as f64 })
                .collect())
        }
    }
}

pub(crate) fn validate_proposal_counts(counts: &[usize]) -> Result<()> {
    if counts.is_empty() {
        return Err(DetEvalError::InvalidParameter(
            "At least one proposal count is required".to_string()
        ));
    }
    Ok(())
}

pub(crate) fn validate_iou_thresholds(thresholds: &[f64]) -> Result<()> {
    if thresholds.is_empty() {
        return Err(DetEvalError::InvalidThreshold(
            "At least one IoU threshold is required".to_string()
        ));
    }
    thresholds.iter().try_for_each(|&t| validate_threshold(t))
}

/// Validate that a threshold is in the valid range [0.0, 1.0].
pub(crate) fn validate_threshold(threshold: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(DetEvalError::InvalidThreshold(
            format!("Threshold must be between 0.0 and 1.0, got {}", threshold)
        ));
    }
    Ok(())
}
