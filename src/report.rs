//! Human-readable summaries and curve data for evaluation results.
//!
//! Nothing here computes metrics; it only formats what the evaluators return.

use crate::types::{MapResult, RecallTable};

const RULE_WIDTH: usize = 50;

/// Render a recall table as an ASCII grid.
///
/// The header row lists the IoU thresholds; each following row starts with
/// its proposal count. `row_idxs` / `col_idxs` select a subset of proposal
/// counts and thresholds (all of them when `None`); indices past the end of
/// the table are skipped.
///
/// # Example
///
/// ```
/// use det_eval::report::format_recall_summary;
/// use det_eval::types::RecallTable;
///
/// let table = RecallTable {
///     proposal_counts: vec![1, 2],
///     iou_thresholds: vec![0.5],
///     recalls: vec![vec![0.5], vec![1.0]],
/// };
/// let text = format_recall_summary(&table, None, None);
/// assert!(text.contains("| 1 | 0.500 |"));
/// ```
pub fn format_recall_summary(
    table: &RecallTable,
    row_idxs: Option<&[usize]>,
    col_idxs: Option<&[usize]>,
) -> String {
    let all_rows: Vec<usize> = (0..table.proposal_counts.len()).collect();
    let all_cols: Vec<usize> = (0..table.iou_thresholds.len()).collect();
    let rows = row_idxs.unwrap_or(&all_rows);
    let cols: Vec<usize> = col_idxs
        .unwrap_or(&all_cols)
        .iter()
        .copied()
        .filter(|&c| c < table.iou_thresholds.len())
        .collect();

    let mut cells: Vec<Vec<String>> = Vec::with_capacity(rows.len() + 1);

    let mut header = vec![String::new()];
    header.extend(cols.iter().map(|&c| table.iou_thresholds[c].to_string()));
    cells.push(header);

    for &r in rows {
        let Some(&count) = table.proposal_counts.get(r) else {
            continue;
        };
        let mut row = vec![count.to_string()];
        row.extend(
            cols.iter()
                .map(|&c| format!("{:.3}", table.get(r, c).unwrap_or(0.0))),
        );
        cells.push(row);
    }

    ascii_table(&cells)
}

/// Print [`format_recall_summary`] to stdout.
pub fn print_recall_summary(
    table: &RecallTable,
    row_idxs: Option<&[usize]>,
    col_idxs: Option<&[usize]>,
) {
    println!("{}", format_recall_summary(table, row_idxs, col_idxs));
}

/// Render per-class results and the mean AP.
///
/// Classes are numbered from 1, matching ground truth labels. The recall
/// shown is the final cumulative recall of the class.
///
/// # Example
///
/// ```
/// use det_eval::report::format_map_summary;
/// use det_eval::types::{ClassEvaluation, MapResult};
///
/// let result = MapResult {
///     mean_ap: 0.75,
///     classes: vec![ClassEvaluation { gt_num: 4, det_num: 5, recall: vec![0.75], precision: vec![0.6], ap: 0.75 }],
/// };
/// let text = format_map_summary(&result);
/// assert!(text.contains("class 1, gt num: 4, det num: 5, recall: 0.7500, ap: 0.7500"));
/// assert!(text.contains("mAP: 0.7500"));
/// ```
pub fn format_map_summary(result: &MapResult) -> String {
    let rule = "-".repeat(RULE_WIDTH);
    let mut lines = vec![rule.clone()];

    for (i, class) in result.classes.iter().enumerate() {
        lines.push(format!(
            "class {}, gt num: {}, det num: {}, recall: {:.4}, ap: {:.4}",
            i + 1,
            class.gt_num,
            class.det_num,
            class.final_recall(),
            class.ap
        ));
    }

    lines.push(rule.clone());
    lines.push(format!("mAP: {:.4}", result.mean_ap));
    lines.push(rule);

    lines.join("\n")
}

/// Print [`format_map_summary`] to stdout.
pub fn print_map_summary(result: &MapResult) {
    println!("{}", format_map_summary(result));
}

/// Points of a recall vs. proposal count curve, starting at the origin.
///
/// `recalls[i]` belongs to `proposal_counts[i]`; extra entries of the longer
/// slice are ignored.
pub fn num_recall_curve(recalls: &[f64], proposal_counts: &[usize]) -> Vec<(f64, f64)> {
    std::iter::once((0.0, 0.0))
        .chain(
            proposal_counts
                .iter()
                .zip(recalls)
                .map(|(&n, &r)| (n as f64, r)),
        )
        .collect()
}

/// Points of a recall vs. IoU threshold curve, closed at `(1.0, 0.0)`.
///
/// `recalls[i]` belongs to `iou_thresholds[i]`.
pub fn iou_recall_curve(recalls: &[f64], iou_thresholds: &[f64]) -> Vec<(f64, f64)> {
    iou_thresholds
        .iter()
        .zip(recalls)
        .map(|(&t, &r)| (t, r))
        .chain(std::iter::once((1.0, 0.0)))
        .collect()
}

fn ascii_table(cells: &[Vec<String>]) -> String {
    let columns = cells.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|c| {
            cells
                .iter()
                .filter_map(|row| row.get(c))
                .map(String::len)
                .max()
                .unwrap_or(0)
        })
        .collect();

    let border = widths
        .iter()
        .fold(String::from("+"), |mut acc, &w| {
            acc.push_str(&"-".repeat(w + 2));
            acc.push('+');
            acc
        });

    let mut lines = vec![border.clone()];
    for (i, row) in cells.iter().enumerate() {
        let mut line = String::from("|");
        for (c, &w) in widths.iter().enumerate() {
            let cell = row.get(c).map_or("", String::as_str);
            line.push_str(&format!(" {:<w$} |", cell, w = w));
        }
        lines.push(line);
        if i == 0 {
            lines.push(border.clone());
        }
    }
    lines.push(border);

    lines.join("\n")
}
