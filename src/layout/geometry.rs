//! Window-relative bar geometry.
//!
//! Converts an item's interval plus the visible week into grid geometry:
//! which day columns the bar occupies, where the bar really starts and
//! ends inside those columns (sub-day precision), and how the visible
//! width splits into on-time and overdue portions at the committed
//! deadline.
//!
//! All fractions are relative to the full duration of the spanned
//! columns, so `left_fraction + width_fraction ≤ 1.0` and
//! `normal_fraction + overdue_fraction == width_fraction` (within
//! floating tolerance). The engine emits no pixels; the consumer maps
//! columns and fractions onto its own grid.

use serde::{Deserialize, Serialize};

use super::RowAssignment;
use crate::models::{Item, WeekWindow};

/// Grid geometry of one item within the visible window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemGeometry {
    /// Row to paint into, from the row assignment.
    pub row: usize,
    /// 0-based index of the first visibly occupied day column.
    pub column_start: usize,
    /// Number of consecutive day columns occupied (≥1).
    pub column_span: usize,
    /// Offset of the true start within the spanned columns (0.0..1.0).
    pub left_fraction: f64,
    /// Width of the visible bar within the spanned columns (0.0..1.0).
    pub width_fraction: f64,
    /// On-time portion of the visible width.
    pub normal_fraction: f64,
    /// Overdue portion of the visible width.
    pub overdue_fraction: f64,
    /// True start precedes the window (square left cap).
    pub starts_before_window: bool,
    /// True end exceeds the window (square right cap).
    pub continues_past_window: bool,
}

/// Computes grid geometry for an item, or `None` when the item does not
/// intersect the window or is unknown to the row assignment.
pub fn compute_geometry(
    item: &Item,
    window: &WeekWindow,
    assignment: &RowAssignment,
) -> Option<ItemGeometry> {
    let row = assignment.row_of(&item.id)?;
    if !window.intersects(item.start, item.end) {
        return None;
    }

    let visible_start = item.start.max(window.start_instant());
    let visible_end = item.end.min(window.end_instant());

    let column_start = window
        .day_index(visible_start.date())
        .unwrap_or(0);
    let column_end = window.day_index(visible_end.date()).unwrap_or(6);
    let column_span = column_end - column_start + 1;

    // Fractions are measured against the spanned columns' full duration,
    // [first day 00:00, last day 24:00).
    let span_origin = window.days()[column_start]
        .and_hms_opt(0, 0, 0)
        .unwrap_or_default();
    let span_seconds = (column_span as f64) * 86_400.0;
    let offset = |t: chrono::NaiveDateTime| (t - span_origin).num_seconds() as f64 / span_seconds;

    let left_fraction = offset(visible_start);
    let width_fraction = offset(visible_end) - left_fraction;

    let split = item.allocated_end.clamp(visible_start, visible_end);
    let normal_fraction = offset(split) - left_fraction;
    let overdue_fraction = width_fraction - normal_fraction;

    Some(ItemGeometry {
        row,
        column_start,
        column_span,
        left_fraction,
        width_fraction,
        normal_fraction,
        overdue_fraction,
        starts_before_window: item.start < window.start_instant(),
        continues_past_window: item.end > window.end_instant(),
    })
}
