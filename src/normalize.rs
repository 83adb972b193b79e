//! Raw-record normalization.
//!
//! Flattens task records (with zero or more activity sub-records) into a
//! uniform `Vec<Item>` for row assignment. All date parsing happens here;
//! whatever cannot be parsed is dropped, never emitted. Degradations are
//! silent and deterministic — upstream data is incomplete by design, so
//! irregularities are not errors (they are logged at debug level only).
//!
//! # Rules
//!
//! - A task with no activities becomes one ungrouped task item.
//! - A task with activities becomes a parent item (`group_id =
//!   "task:<id>"`, assignees = union of activity assignees) plus one
//!   activity item per sub-record (`group_order` = source index + 1),
//!   inheriting the parent's range and deadline where fields are absent.
//! - Missing or unparseable start/end drops the record. `end < start`
//!   drops the record. A deadline past `end` is clamped to `end`.
//! - A parent whose own dates are invalid is dropped; its surviving
//!   activities degrade to ungrouped singletons. A group left with fewer
//!   than two members degrades the same way.
//! - An `Employee` viewer sees only activities assigned to them, with
//!   grouping stripped and `parent_name` set; tasks without activities
//!   only when the viewer is among the assignees. Grouping is an
//!   admin-only visualization.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use log::debug;
use std::collections::BTreeSet;

use crate::models::{ActivityRecord, Item, ItemKind, TaskRecord, Viewer, ViewerRole};

/// Outcome of parsing one optional date + optional time-of-day pair.
enum Parsed {
    /// No date field present.
    Absent,
    /// A field was present but not parseable.
    Invalid,
    /// A valid instant.
    At(NaiveDateTime),
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}

fn parse_instant(date: Option<&str>, time: Option<&str>, default_time: NaiveTime) -> Parsed {
    let Some(date) = date else {
        return Parsed::Absent;
    };
    let Some(date) = parse_date(date) else {
        return Parsed::Invalid;
    };
    match time {
        None => Parsed::At(date.and_time(default_time)),
        Some(t) => match parse_time(t) {
            Some(t) => Parsed::At(date.and_time(t)),
            None => Parsed::Invalid,
        },
    }
}

fn start_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(0, 0, 0).unwrap_or_default()
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or_default()
}

/// A fully parsed time range: start, end, committed deadline.
#[derive(Clone, Copy)]
struct Span {
    start: NaiveDateTime,
    end: NaiveDateTime,
    allocated_end: NaiveDateTime,
}

/// Parses a record's range. `parent` supplies inherited values for
/// absent activity fields; task records pass `None` and require both
/// endpoints of their own.
fn resolve_span(
    start_date: Option<&str>,
    start_time: Option<&str>,
    end_date: Option<&str>,
    end_time: Option<&str>,
    allocated_date: Option<&str>,
    allocated_time: Option<&str>,
    parent: Option<&Span>,
) -> Option<Span> {
    let start = match parse_instant(start_date, start_time, start_of_day()) {
        Parsed::At(t) => t,
        Parsed::Absent => parent?.start,
        Parsed::Invalid => return None,
    };
    let end = match parse_instant(end_date, end_time, end_of_day()) {
        Parsed::At(t) => t,
        Parsed::Absent => parent?.end,
        Parsed::Invalid => return None,
    };
    if end < start {
        return None;
    }
    // A deadline that fails to parse degrades to the actual end rather
    // than dropping the record; a deadline past the end is clamped.
    let allocated_end = match parse_instant(allocated_date, allocated_time, end_of_day()) {
        Parsed::At(t) => t.min(end),
        Parsed::Absent => parent.map(|p| p.allocated_end.min(end)).unwrap_or(end),
        Parsed::Invalid => end,
    };
    Some(Span {
        start,
        end,
        allocated_end,
    })
}

fn task_span(record: &TaskRecord) -> Option<Span> {
    resolve_span(
        record.start_date.as_deref(),
        record.start_time.as_deref(),
        record.end_date.as_deref(),
        record.end_time.as_deref(),
        record.allocated_end_date.as_deref(),
        record.allocated_end_time.as_deref(),
        None,
    )
}

fn activity_span(record: &ActivityRecord, parent: Option<&Span>) -> Option<Span> {
    resolve_span(
        record.start_date.as_deref(),
        record.start_time.as_deref(),
        record.end_date.as_deref(),
        record.end_time.as_deref(),
        record.allocated_end_date.as_deref(),
        record.allocated_end_time.as_deref(),
        parent,
    )
}

/// Flattens raw task records into normalized items for the given viewer.
///
/// Output order is deterministic: records in input order, each parent
/// immediately followed by its activities in source order.
pub fn normalize(records: &[TaskRecord], viewer: &Viewer) -> Vec<Item> {
    let mut items = Vec::new();
    for record in records {
        match viewer.role {
            ViewerRole::Admin => normalize_admin(record, &mut items),
            ViewerRole::Employee => normalize_employee(record, viewer, &mut items),
        }
    }
    items
}

fn normalize_admin(record: &TaskRecord, items: &mut Vec<Item>) {
    let parent_span = task_span(record);

    if record.activities.is_empty() {
        match parent_span {
            Some(span) => items.push(task_item(record, span, None)),
            None => debug!("dropping task {}: unparseable range", record.id),
        }
        return;
    }

    let mut activities = Vec::new();
    for (index, activity) in record.activities.iter().enumerate() {
        match activity_span(activity, parent_span.as_ref()) {
            Some(span) => activities.push(activity_item(record, activity, span, index as u32 + 1)),
            None => debug!(
                "dropping activity {} of task {}: unparseable range",
                activity.id, record.id
            ),
        }
    }

    match parent_span {
        Some(span) if !activities.is_empty() => {
            // A real group: parent carries the union of its activities'
            // assignees and shares the group id with every member.
            let group_id = group_id_for(record);
            let assignees = activities
                .iter()
                .flat_map(|a| a.assignees.iter().cloned())
                .collect::<BTreeSet<_>>();
            let mut parent = task_item(record, span, Some(group_id.clone()));
            parent.assignees = assignees;
            items.push(parent);
            for mut activity in activities {
                activity.group_id = Some(group_id.clone());
                items.push(activity);
            }
        }
        Some(span) => {
            // All activities dropped: a group of one degrades to an
            // ungrouped item.
            items.push(task_item(record, span, None));
        }
        None => {
            // Orphaned members degrade to singletons instead of failing
            // the whole computation.
            debug!(
                "task {} unparseable; degrading {} activities to singletons",
                record.id,
                activities.len()
            );
            for mut activity in activities {
                activity.group_id = None;
                activity.group_order = 0;
                items.push(activity);
            }
        }
    }
}

fn normalize_employee(record: &TaskRecord, viewer: &Viewer, items: &mut Vec<Item>) {
    if record.activities.is_empty() {
        if !record.assignees.iter().any(|a| a == &viewer.id) {
            return;
        }
        match task_span(record) {
            Some(span) => items.push(task_item(record, span, None)),
            None => debug!("dropping task {}: unparseable range", record.id),
        }
        return;
    }

    let parent_span = task_span(record);
    for activity in &record.activities {
        if !activity.assignees.iter().any(|a| a == &viewer.id) {
            continue;
        }
        match activity_span(activity, parent_span.as_ref()) {
            Some(span) => {
                let mut item = activity_item(record, activity, span, 0);
                item.parent_name = Some(record.name.clone());
                items.push(item);
            }
            None => debug!(
                "dropping activity {} of task {}: unparseable range",
                activity.id, record.id
            ),
        }
    }
}

fn group_id_for(record: &TaskRecord) -> String {
    format!("task:{}", record.id)
}

fn task_item(record: &TaskRecord, span: Span, group_id: Option<String>) -> Item {
    Item {
        id: record.id.clone(),
        kind: ItemKind::Task,
        name: record.name.clone(),
        parent_name: None,
        start: span.start,
        end: span.end,
        allocated_end: span.allocated_end,
        group_id,
        group_order: 0,
        assignees: record.assignees.iter().cloned().collect(),
    }
}

fn activity_item(
    _record: &TaskRecord,
    activity: &ActivityRecord,
    span: Span,
    group_order: u32,
) -> Item {
    Item {
        id: activity.id.clone(),
        kind: ItemKind::Activity,
        name: activity.name.clone(),
        parent_name: None,
        start: span.start,
        end: span.end,
        allocated_end: span.allocated_end,
        group_id: None,
        group_order,
        assignees: activity.assignees.iter().cloned().collect(),
    }
}
