//! Temporal row-layout engine for project calendar views.
//!
//! Given time-bounded work items (tasks and their activities), assigns
//! each a display row such that no two items in a row overlap, a task
//! and its activities stay in a contiguous block, and assignments are
//! stable across week navigation. Two further stages derive grid
//! geometry for the visible 7-day window and bracket connectors linking
//! a parent to its grouped activities.
//!
//! # Modules
//!
//! - **`models`**: Domain types — raw `TaskRecord`/`ActivityRecord`,
//!   the normalized `Item`, `Viewer` roles, the `WeekWindow`
//! - **`normalize`**: Flattening raw records into items, with role
//!   scoping and silent drop of unparseable records
//! - **`layout`**: The derivation stages — `assign_rows` (greedy
//!   interval coloring with group contiguity), `compute_geometry`
//!   (window-relative columns, fractions, on-time/overdue split),
//!   `build_connector` (bracket and arm geometry from caller anchors)
//!
//! # Architecture
//!
//! Data flows strictly forward: raw records → normalize → assign_rows
//! (window-independent) → compute_geometry (window-dependent) →
//! build_connector (rows plus caller-measured anchors). Every stage is
//! a synchronous pure function of its inputs; consumers recompute the
//! whole pipeline whenever the item set or window changes. The engine
//! performs no I/O, owns no pixels, and keeps no state between calls.
//!
//! # Example
//!
//! ```
//! use calendar_layout::models::{TaskRecord, Viewer, WeekWindow};
//! use calendar_layout::{assign_rows, normalize};
//! use chrono::NaiveDate;
//!
//! let records = vec![
//!     TaskRecord::new("T1")
//!         .with_name("Install")
//!         .with_start("2026-03-02", Some("09:00"))
//!         .with_end("2026-03-06", Some("17:00")),
//!     TaskRecord::new("T2")
//!         .with_name("Survey")
//!         .with_start("2026-03-03", Some("08:00"))
//!         .with_end("2026-03-03", Some("12:00")),
//! ];
//!
//! let items = normalize(&records, &Viewer::admin("root"));
//! let assignment = assign_rows(&items);
//! assert_eq!(assignment.row_of("T1"), Some(0));
//! assert_eq!(assignment.row_of("T2"), Some(1));
//!
//! let window = WeekWindow::containing(NaiveDate::from_ymd_opt(2026, 3, 4).unwrap());
//! assert_eq!(window.day_index(NaiveDate::from_ymd_opt(2026, 3, 4).unwrap()), Some(2));
//! ```

pub mod layout;
pub mod models;
mod normalize;

pub use layout::{
    assign_rows, build_connector, compute_geometry, Anchor, CalendarLayout, Connector,
    ConnectorArm, ConnectorLayout, GroupSpan, ItemGeometry, LayoutEngine, RowAssignment,
};
pub use models::{Item, ItemKind, WeekWindow};
pub use normalize::normalize;
