//! Normalized interval item.
//!
//! An item is the unit of row layout: a task or activity reduced to a
//! closed time interval plus grouping metadata. Items are produced fresh
//! on every normalization pass; they carry no identity beyond `id`.
//!
//! # Time Model
//! Instants are naive local date-times. Intervals are closed on both
//! ends: an item ending Tuesday 12:00 still occupies Tuesday 12:00, and
//! two items with identical instants overlap.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Whether an item is a task or one of a task's activities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    /// A task (possibly the parent of a group).
    Task,
    /// An activity owned by a task.
    Activity,
}

/// A normalized, schedulable interval item.
///
/// Two items with equal non-`None` `group_id` belong to the same group;
/// a group renders as a contiguous bracketed block of rows. `group_order`
/// is a placement tie-break only (parent 0, activities 1..N in source
/// order), never the final row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Stable unique identifier.
    pub id: String,
    /// Task or activity.
    pub kind: ItemKind,
    /// Display name.
    pub name: String,
    /// Owning task's name, set for activities in the restricted view
    /// where the parent item itself is suppressed.
    pub parent_name: Option<String>,
    /// Interval start (inclusive).
    pub start: NaiveDateTime,
    /// Interval end (inclusive). Always ≥ `start`.
    pub end: NaiveDateTime,
    /// Committed deadline. Always ≤ `end`; equals `end` when on time.
    pub allocated_end: NaiveDateTime,
    /// Group membership; `None` for ungrouped items.
    pub group_id: Option<String>,
    /// Placement order within the group (0 = parent).
    pub group_order: u32,
    /// Assigned actor identifiers. Ordered set, so iteration and
    /// serialization are deterministic.
    pub assignees: BTreeSet<String>,
}

impl Item {
    /// Whether two items overlap in time (closed intervals).
    pub fn overlaps(&self, other: &Item) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Whether this item's interval contains the instant.
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// Interval length.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Whether the actual end overran the committed deadline.
    pub fn is_overdue(&self) -> bool {
        self.allocated_end < self.end
    }

    /// Moves the item to a new start, preserving its duration.
    ///
    /// `end` and `allocated_end` shift by the same delta, so the
    /// on-time/overdue split is preserved as well. Pure transform; the
    /// caller re-runs row assignment afterwards, since a changed range
    /// can change admissibility for the whole set.
    pub fn rescheduled(&self, new_start: NaiveDateTime) -> Item {
        let delta = new_start - self.start;
        Item {
            start: new_start,
            end: self.end + delta,
            allocated_end: self.allocated_end + delta,
            ..self.clone()
        }
    }
}
