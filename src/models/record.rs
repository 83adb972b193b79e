//! Raw upstream records.
//!
//! Tasks and activities arrive from the data layer as loosely-typed JSON:
//! dates and times are optional strings, and partially-filled records are
//! expected rather than exceptional. The normalizer (`crate::normalize`)
//! parses these into [`Item`](super::Item)s and silently drops what it
//! cannot parse.
//!
//! # Date/Time Format
//! Dates are `%Y-%m-%d`; times are `%H:%M:%S`, with `%H:%M` accepted.
//! A missing start time means 00:00:00, a missing end time 23:59:59.

use serde::{Deserialize, Serialize};

/// A raw task record as delivered by the data layer.
///
/// May own zero or more activity sub-records. Date/time fields are kept
/// as optional strings because upstream data is incomplete by design.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Unique task identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Start date (`%Y-%m-%d`). `None` or unparseable ⇒ record dropped.
    pub start_date: Option<String>,
    /// Start time-of-day. `None` ⇒ 00:00:00.
    pub start_time: Option<String>,
    /// End date. `None` or unparseable ⇒ record dropped.
    pub end_date: Option<String>,
    /// End time-of-day. `None` ⇒ 23:59:59.
    pub end_time: Option<String>,
    /// Originally committed deadline date. `None` ⇒ equals end.
    pub allocated_end_date: Option<String>,
    /// Committed deadline time-of-day. `None` ⇒ 23:59:59.
    pub allocated_end_time: Option<String>,
    /// Assigned actor identifiers.
    pub assignees: Vec<String>,
    /// Activity sub-records, in source order.
    pub activities: Vec<ActivityRecord>,
}

impl TaskRecord {
    /// Creates an empty record with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the start date and optional time-of-day.
    pub fn with_start(mut self, date: impl Into<String>, time: Option<&str>) -> Self {
        self.start_date = Some(date.into());
        self.start_time = time.map(str::to_string);
        self
    }

    /// Sets the end date and optional time-of-day.
    pub fn with_end(mut self, date: impl Into<String>, time: Option<&str>) -> Self {
        self.end_date = Some(date.into());
        self.end_time = time.map(str::to_string);
        self
    }

    /// Sets the committed deadline date and optional time-of-day.
    pub fn with_allocated_end(mut self, date: impl Into<String>, time: Option<&str>) -> Self {
        self.allocated_end_date = Some(date.into());
        self.allocated_end_time = time.map(str::to_string);
        self
    }

    /// Adds an assignee.
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignees.push(assignee.into());
        self
    }

    /// Adds an activity sub-record.
    pub fn with_activity(mut self, activity: ActivityRecord) -> Self {
        self.activities.push(activity);
        self
    }
}

/// A raw activity sub-record.
///
/// Absent date fields mean "inherit the parent task's range"; present but
/// unparseable fields mean the activity is dropped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Unique activity identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Own start date. `None` ⇒ inherit from parent.
    pub start_date: Option<String>,
    /// Own start time-of-day.
    pub start_time: Option<String>,
    /// Own end date. `None` ⇒ inherit from parent.
    pub end_date: Option<String>,
    /// Own end time-of-day.
    pub end_time: Option<String>,
    /// Own committed deadline date. `None` ⇒ inherit, then clamp to end.
    pub allocated_end_date: Option<String>,
    /// Committed deadline time-of-day.
    pub allocated_end_time: Option<String>,
    /// Assigned actor identifiers.
    pub assignees: Vec<String>,
}

impl ActivityRecord {
    /// Creates an empty activity record with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the start date and optional time-of-day.
    pub fn with_start(mut self, date: impl Into<String>, time: Option<&str>) -> Self {
        self.start_date = Some(date.into());
        self.start_time = time.map(str::to_string);
        self
    }

    /// Sets the end date and optional time-of-day.
    pub fn with_end(mut self, date: impl Into<String>, time: Option<&str>) -> Self {
        self.end_date = Some(date.into());
        self.end_time = time.map(str::to_string);
        self
    }

    /// Sets the committed deadline date and optional time-of-day.
    pub fn with_allocated_end(mut self, date: impl Into<String>, time: Option<&str>) -> Self {
        self.allocated_end_date = Some(date.into());
        self.allocated_end_time = time.map(str::to_string);
        self
    }

    /// Adds an assignee.
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignees.push(assignee.into());
        self
    }
}

/// The actor viewing the calendar.
///
/// Passed to `normalize` as a filter capability: restricted viewers see
/// only their own activities, with grouping stripped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewer {
    /// Actor identifier, matched against record assignees.
    pub id: String,
    /// Visibility role.
    pub role: ViewerRole,
}

impl Viewer {
    /// Creates an admin viewer (sees everything, grouped).
    pub fn admin(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: ViewerRole::Admin,
        }
    }

    /// Creates a restricted employee viewer.
    pub fn employee(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: ViewerRole::Employee,
        }
    }
}

/// Visibility role of the viewing actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewerRole {
    /// Sees all tasks and activities, with group brackets.
    Admin,
    /// Sees only activities assigned to them, ungrouped.
    Employee,
}
