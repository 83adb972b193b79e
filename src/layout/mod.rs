//! Derived layout artifacts: rows, geometry, connectors.
//!
//! The three derivation stages run strictly in order — row assignment
//! (window-independent), then window geometry, then connectors — and
//! each output is a pure function of its inputs. Nothing here holds
//! state between computations; a superseded result is simply discarded.
//!
//! # Stages
//!
//! - [`assign_rows`]: greedy interval coloring with group contiguity.
//! - [`compute_geometry`]: per-item column/fraction geometry for the
//!   visible week.
//! - [`build_connector`]: bracket and arm geometry per group, from
//!   caller-measured anchors.
//!
//! [`LayoutEngine`] runs the full pipeline in one call for consumers
//! that recompute reactively on every input change.

mod connector;
mod geometry;
mod rows;

pub use connector::{build_connector, Anchor, Connector, ConnectorArm, ConnectorLayout};
pub use geometry::{compute_geometry, ItemGeometry};
pub use rows::{assign_rows, GroupSpan, RowAssignment};

use std::collections::HashMap;

use crate::models::{Item, ItemKind, WeekWindow};

/// A complete recomputed layout for one item set and window.
#[derive(Debug, Clone, Default)]
pub struct CalendarLayout {
    /// Window-independent row assignment.
    pub assignment: RowAssignment,
    /// Geometry per visible item ID.
    pub geometry: HashMap<String, ItemGeometry>,
    /// One connector per group whose parent is anchored.
    pub connectors: Vec<Connector>,
}

/// Runs the full derivation pipeline.
///
/// Holds only connector layout metrics; every computation is pull-based
/// and rebuilt from scratch, so there is no partial-update path and no
/// stale output to invalidate.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    connector_layout: ConnectorLayout,
}

impl LayoutEngine {
    /// Creates an engine with default connector metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the connector layout metrics.
    pub fn with_connector_layout(mut self, layout: ConnectorLayout) -> Self {
        self.connector_layout = layout;
        self
    }

    /// Recomputes rows, geometry, and connectors for the given items,
    /// window, and caller-measured anchors.
    pub fn compute(
        &self,
        items: &[Item],
        window: &WeekWindow,
        anchors: &HashMap<String, Anchor>,
    ) -> CalendarLayout {
        let assignment = assign_rows(items);

        let mut geometry = HashMap::new();
        for item in items {
            if let Some(g) = compute_geometry(item, window, &assignment) {
                geometry.insert(item.id.clone(), g);
            }
        }

        let mut connectors = Vec::new();
        for span in assignment.group_spans() {
            let Some(parent) = items.iter().find(|i| {
                i.kind == ItemKind::Task && i.group_id.as_deref() == Some(span.group_id.as_str())
            }) else {
                continue;
            };
            let activities: Vec<Item> = items
                .iter()
                .filter(|i| {
                    i.kind == ItemKind::Activity
                        && i.group_id.as_deref() == Some(span.group_id.as_str())
                })
                .cloned()
                .collect();
            if let Some(connector) = build_connector(
                parent,
                &activities,
                &assignment,
                anchors,
                window,
                &self.connector_layout,
            ) {
                connectors.push(connector);
            }
        }

        CalendarLayout {
            assignment,
            geometry,
            connectors,
        }
    }
}
