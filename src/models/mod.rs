//! Calendar layout domain models.
//!
//! Raw upstream records, the normalized interval [`Item`], and the visible
//! [`WeekWindow`]. Derived artifacts (row assignments, geometry, connectors)
//! live in [`crate::layout`] — they are recomputed, never persisted.

mod item;
mod record;
mod window;

pub use item::{Item, ItemKind};
pub use record::{ActivityRecord, TaskRecord, Viewer, ViewerRole};
pub use window::WeekWindow;
