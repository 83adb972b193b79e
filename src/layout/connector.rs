//! Group connector (bracket) geometry.
//!
//! A group renders as a vertical bracket to the left of the parent bar
//! with one horizontal arm per activity. The engine never measures
//! pixels: the consumer supplies an anchor (x, y, width) for every item
//! it actually rendered, plus the layout metrics it used (row height,
//! right edge of the visible area), and gets back pure line geometry.
//!
//! Arms:
//! - Anchored activity → solid arm from the bracket line to the anchor.
//! - Activity starting after the window → dashed arm projected to the
//!   right edge at `parent_y + row_delta × row_height`, signaling work
//!   further in the future on this bracket.
//! - Activity fully in the past → omitted.
//! - In-window activity the consumer did not measure → skipped.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::RowAssignment;
use crate::models::{Item, WeekWindow};

/// A caller-measured reference point for one rendered item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    /// Left edge of the rendered bar.
    pub x: f64,
    /// Vertical center of the rendered bar.
    pub y: f64,
    /// Rendered bar width.
    pub width: f64,
}

impl Anchor {
    /// Creates an anchor.
    pub fn new(x: f64, y: f64, width: f64) -> Self {
        Self { x, y, width }
    }
}

/// Metrics the consumer's grid imposes on connector geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorLayout {
    /// Horizontal distance from the parent anchor to the bracket line.
    pub bracket_offset: f64,
    /// Radius of the rounded corner joining bracket and parent arm.
    pub corner_radius: f64,
    /// Measured height of one layout row, for extrapolating rows of
    /// not-yet-visible activities.
    pub row_height: f64,
    /// Right edge of the visible area, where dashed arms terminate.
    pub right_edge: f64,
}

impl Default for ConnectorLayout {
    fn default() -> Self {
        Self {
            bracket_offset: 12.0,
            corner_radius: 6.0,
            row_height: 32.0,
            right_edge: 0.0,
        }
    }
}

impl ConnectorLayout {
    /// Sets the bracket offset.
    pub fn with_bracket_offset(mut self, offset: f64) -> Self {
        self.bracket_offset = offset;
        self
    }

    /// Sets the corner radius.
    pub fn with_corner_radius(mut self, radius: f64) -> Self {
        self.corner_radius = radius;
        self
    }

    /// Sets the measured row height.
    pub fn with_row_height(mut self, height: f64) -> Self {
        self.row_height = height;
        self
    }

    /// Sets the right edge of the visible area.
    pub fn with_right_edge(mut self, edge: f64) -> Self {
        self.right_edge = edge;
        self
    }
}

/// One horizontal arm of a bracket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorArm {
    /// Activity this arm points at.
    pub activity_id: String,
    /// Arm start (the bracket line).
    pub x_start: f64,
    /// Arm end (the activity anchor, or the visible right edge).
    pub x_end: f64,
    /// Vertical position.
    pub y: f64,
    /// Dashed arms point at activities beyond the window's end.
    pub dashed: bool,
}

/// Bracket geometry linking a parent to its grouped activities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    /// Group this bracket belongs to.
    pub group_id: String,
    /// X of the vertical bracket line.
    pub bracket_x: f64,
    /// Top of the bracket: the parent's anchor y.
    pub top_y: f64,
    /// Bottom of the bracket: the lowest included arm.
    pub bottom_y: f64,
    /// Radius of the rounded corner into the parent arm.
    pub corner_radius: f64,
    /// Short horizontal arm from the bracket into the parent's anchor.
    pub parent_arm: ConnectorArm,
    /// One arm per included activity, in `group_order`.
    pub arms: Vec<ConnectorArm>,
}

/// Builds the bracket for one group, or `None` when the parent is not
/// rendered (no anchor) or no activity qualifies for an arm.
pub fn build_connector(
    parent: &Item,
    activities: &[Item],
    assignment: &RowAssignment,
    anchors: &HashMap<String, Anchor>,
    window: &WeekWindow,
    layout: &ConnectorLayout,
) -> Option<Connector> {
    let group_id = parent.group_id.clone()?;
    let parent_anchor = anchors.get(&parent.id)?;
    let parent_row = assignment.row_of(&parent.id)?;

    let bracket_x = parent_anchor.x - layout.bracket_offset;
    let mut arms = Vec::new();
    for activity in activities {
        if activity.group_id.as_deref() != Some(group_id.as_str()) {
            continue;
        }
        // Already fully in the past: no arm at all.
        if activity.end < window.start_instant() {
            continue;
        }
        if let Some(anchor) = anchors.get(&activity.id) {
            arms.push(ConnectorArm {
                activity_id: activity.id.clone(),
                x_start: bracket_x,
                x_end: anchor.x,
                y: anchor.y,
                dashed: false,
            });
        } else if activity.start > window.end_instant() {
            // Not yet visible, but its row is already fixed: project a
            // dashed arm at the extrapolated height.
            let row = assignment.row_of(&activity.id)?;
            let row_delta = row as f64 - parent_row as f64;
            arms.push(ConnectorArm {
                activity_id: activity.id.clone(),
                x_start: bracket_x,
                x_end: layout.right_edge,
                y: parent_anchor.y + row_delta * layout.row_height,
                dashed: true,
            });
        }
        // In-window but unmeasured: the consumer chose not to render it.
    }

    if arms.is_empty() {
        return None;
    }

    let bottom_y = arms
        .iter()
        .map(|a| a.y)
        .fold(parent_anchor.y, f64::max);

    Some(Connector {
        group_id,
        bracket_x,
        top_y: parent_anchor.y,
        bottom_y,
        corner_radius: layout.corner_radius,
        parent_arm: ConnectorArm {
            activity_id: parent.id.clone(),
            x_start: bracket_x,
            x_end: parent_anchor.x,
            y: parent_anchor.y,
            dashed: false,
        },
        arms,
    })
}
