//! Row assignment.
//!
//! The central algorithm of the engine: greedy interval-graph coloring
//! with a grouping-contiguity constraint. Operates over the *entire*
//! item set, independent of the visible window, so row indices stay
//! stable while the user pages through weeks.
//!
//! # Algorithm
//!
//! 1. Sort items by ascending start, ties by lexicographic ID; two
//!    members of the same group keep their relative order by ascending
//!    `group_order` instead (parent first).
//! 2. Partition into group blocks (a `group_id` shared by ≥2 members
//!    including ≥1 activity) and singletons.
//! 3. Place group blocks first, in sort order, block-atomically: the
//!    first base row where every member fits overlap-free at its fixed
//!    offset takes the whole block. Rows strictly inside the block are
//!    reserved for the group.
//! 4. Place singletons, in sort order, at the first row that is not
//!    interior to any block and whose occupants either do not overlap
//!    the candidate or are that block's activities already finished
//!    before the candidate starts (a finished activity vacates its
//!    boundary row).
//!
//! Greedy and deliberately not row-count-optimal: contiguous bracketed
//! groups and deterministic output take precedence over packing density,
//! and the view scrolls vertically. Optimal interval coloring with a
//! contiguity constraint is NP-hard in general.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::models::{Item, ItemKind};

/// The contiguous row range a placed group occupies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSpan {
    /// Group identifier.
    pub group_id: String,
    /// First row of the block (the parent's row).
    pub first_row: usize,
    /// Last row of the block (the last activity's row).
    pub last_row: usize,
}

impl GroupSpan {
    /// Whether a row lies strictly inside the block (exclusive bounds).
    pub fn is_interior(&self, row: usize) -> bool {
        row > self.first_row && row < self.last_row
    }

    /// Whether a row is the block's first or last row.
    pub fn is_boundary(&self, row: usize) -> bool {
        row == self.first_row || row == self.last_row
    }
}

/// A computed item-to-row mapping.
///
/// Derived artifact: rebuilt from scratch whenever the item set changes,
/// never updated incrementally.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RowAssignment {
    rows: HashMap<String, usize>,
    total_rows: usize,
    group_spans: Vec<GroupSpan>,
}

impl RowAssignment {
    /// The row assigned to an item, if the item was part of the input.
    pub fn row_of(&self, id: &str) -> Option<usize> {
        self.rows.get(id).copied()
    }

    /// Number of rows used: highest assigned row + 1, or 0 when empty.
    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    /// Row ranges of the placed group blocks, in placement order.
    pub fn group_spans(&self) -> &[GroupSpan] {
        &self.group_spans
    }

    /// The row range of one group, if it was placed as a block.
    pub fn group_span(&self, group_id: &str) -> Option<&GroupSpan> {
        self.group_spans.iter().find(|s| s.group_id == group_id)
    }

    /// Iterates over `(item id, row)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.rows.iter().map(|(id, &row)| (id.as_str(), row))
    }

    /// Number of assigned items.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether nothing was assigned.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Assigns every item a row.
///
/// Pure function of the input: identical, identically-ordered input
/// yields identical rows. Always terminates — a fresh row is eventually
/// collision-free for any block or singleton.
pub fn assign_rows(items: &[Item]) -> RowAssignment {
    let order = sort_order(items);
    let valid_groups = valid_group_ids(items);

    // Group blocks in order of their first sorted member, everything
    // else a singleton. Members within a block follow group_order.
    let mut blocks: Vec<Vec<usize>> = Vec::new();
    let mut singletons: Vec<usize> = Vec::new();
    let mut seen_groups: HashSet<&str> = HashSet::new();
    for &idx in &order {
        match items[idx].group_id.as_deref() {
            Some(gid) if valid_groups.contains(gid) => {
                if seen_groups.insert(gid) {
                    let mut members: Vec<usize> = (0..items.len())
                        .filter(|&i| items[i].group_id.as_deref() == Some(gid))
                        .collect();
                    members.sort_by(|&a, &b| {
                        items[a]
                            .group_order
                            .cmp(&items[b].group_order)
                            .then_with(|| items[a].id.cmp(&items[b].id))
                    });
                    blocks.push(members);
                }
            }
            _ => singletons.push(idx),
        }
    }

    let mut occupancy: Vec<Vec<usize>> = Vec::new();
    let mut rows: HashMap<String, usize> = HashMap::new();
    let mut group_spans: Vec<GroupSpan> = Vec::new();

    for members in &blocks {
        let base = first_admissible_base(items, members, &occupancy);
        for (offset, &member) in members.iter().enumerate() {
            place(&mut occupancy, base + offset, member);
            rows.insert(items[member].id.clone(), base + offset);
        }
        group_spans.push(GroupSpan {
            group_id: items[members[0]]
                .group_id
                .clone()
                .unwrap_or_default(),
            first_row: base,
            last_row: base + members.len() - 1,
        });
    }

    for &idx in &singletons {
        let row = first_open_row(items, idx, &occupancy, &group_spans);
        place(&mut occupancy, row, idx);
        rows.insert(items[idx].id.clone(), row);
    }

    let total_rows = occupancy.iter().rposition(|r| !r.is_empty()).map_or(0, |r| r + 1);
    RowAssignment {
        rows,
        total_rows,
        group_spans,
    }
}

/// Item indices in placement order: ascending start, ties by ID, with
/// same-group members reordered among their own positions by
/// `group_order`.
fn sort_order(items: &[Item]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| {
        items[a]
            .start
            .cmp(&items[b].start)
            .then_with(|| items[a].id.cmp(&items[b].id))
    });

    // Collect each group's positions in first-appearance order, then
    // rewrite those positions with the members sorted by group_order.
    // Positions of distinct groups are disjoint, so the result does not
    // depend on group iteration order.
    let mut group_positions: HashMap<&str, Vec<usize>> = HashMap::new();
    let mut group_first_seen: Vec<&str> = Vec::new();
    for (pos, &idx) in order.iter().enumerate() {
        if let Some(gid) = items[idx].group_id.as_deref() {
            let slots = group_positions.entry(gid).or_default();
            if slots.is_empty() {
                group_first_seen.push(gid);
            }
            slots.push(pos);
        }
    }
    for gid in group_first_seen {
        let positions = &group_positions[gid];
        let mut members: Vec<usize> = positions.iter().map(|&p| order[p]).collect();
        members.sort_by(|&a, &b| {
            items[a]
                .group_order
                .cmp(&items[b].group_order)
                .then_with(|| items[a].id.cmp(&items[b].id))
        });
        for (&pos, member) in positions.iter().zip(members) {
            order[pos] = member;
        }
    }
    order
}

/// Group IDs that participate in grouped placement: ≥2 members with at
/// least one activity. Anything else degrades to singletons even if the
/// normalizer let it through.
fn valid_group_ids(items: &[Item]) -> HashSet<&str> {
    let mut member_count: HashMap<&str, usize> = HashMap::new();
    let mut activity_count: HashMap<&str, usize> = HashMap::new();
    for item in items {
        if let Some(gid) = item.group_id.as_deref() {
            *member_count.entry(gid).or_default() += 1;
            if item.kind == ItemKind::Activity {
                *activity_count.entry(gid).or_default() += 1;
            }
        }
    }
    member_count
        .into_iter()
        .filter(|&(gid, count)| count >= 2 && activity_count.get(gid).copied().unwrap_or(0) >= 1)
        .map(|(gid, _)| gid)
        .collect()
}

/// First base row where every block member fits overlap-free at its
/// offset. All-or-nothing: a single conflicting member rejects the base.
fn first_admissible_base(items: &[Item], members: &[usize], occupancy: &[Vec<usize>]) -> usize {
    let mut base = 0;
    loop {
        let admissible = members.iter().enumerate().all(|(offset, &member)| {
            occupants(occupancy, base + offset)
                .iter()
                .all(|&occ| !items[occ].overlaps(&items[member]))
        });
        if admissible {
            return base;
        }
        base += 1;
    }
}

/// First row open to a singleton: skips rows interior to a group block;
/// on any other row every occupant must either not overlap the candidate
/// or be a finished activity of the block whose boundary the row is.
fn first_open_row(
    items: &[Item],
    idx: usize,
    occupancy: &[Vec<usize>],
    group_spans: &[GroupSpan],
) -> usize {
    let item = &items[idx];
    let mut row = 0;
    loop {
        if group_spans.iter().any(|s| s.is_interior(row)) {
            row += 1;
            continue;
        }
        let boundary_of = group_spans.iter().find(|s| s.is_boundary(row));
        let open = occupants(occupancy, row).iter().all(|&occ| {
            if !items[occ].overlaps(item) {
                return true;
            }
            // A boundary row can be time-shared once the group's
            // activities in it have finished before the candidate starts.
            match boundary_of {
                Some(span) => {
                    items[occ].kind == ItemKind::Activity
                        && items[occ].group_id.as_deref() == Some(span.group_id.as_str())
                        && items[occ].end < item.start
                }
                None => false,
            }
        });
        if open {
            return row;
        }
        row += 1;
    }
}

fn occupants<'a>(occupancy: &'a [Vec<usize>], row: usize) -> &'a [usize] {
    occupancy.get(row).map_or(&[], Vec::as_slice)
}

fn place(occupancy: &mut Vec<Vec<usize>>, row: usize, idx: usize) {
    if occupancy.len() <= row {
        occupancy.resize_with(row + 1, Vec::new);
    }
    occupancy[row].push(idx);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use std::collections::BTreeSet;

    // March 2026: the 2nd is a Monday.
    fn instant(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn task(id: &str, start: NaiveDateTime, end: NaiveDateTime) -> Item {
        Item {
            id: id.into(),
            kind: ItemKind::Task,
            name: id.into(),
            parent_name: None,
            start,
            end,
            allocated_end: end,
            group_id: None,
            group_order: 0,
            assignees: BTreeSet::new(),
        }
    }

    fn grouped(id: &str, gid: &str, order: u32, kind: ItemKind, start: NaiveDateTime, end: NaiveDateTime) -> Item {
        Item {
            group_id: Some(gid.into()),
            group_order: order,
            kind,
            ..task(id, start, end)
        }
    }

    /// Parent C spanning Mon 09:00 – Thu 09:00 with two non-overlapping
    /// activities; placed as a contiguous 3-row block.
    fn group_c() -> Vec<Item> {
        vec![
            grouped("C", "task:C", 0, ItemKind::Task, instant(2, 9), instant(5, 9)),
            grouped("C1", "task:C", 1, ItemKind::Activity, instant(2, 9), instant(3, 9)),
            grouped("C2", "task:C", 2, ItemKind::Activity, instant(4, 9), instant(5, 9)),
        ]
    }

    #[test]
    fn test_overlapping_singletons_stack() {
        // Scenario: A Mon 09–Fri 17, B Tue 08–12 inside A's range.
        let items = vec![
            task("A", instant(2, 9), instant(6, 17)),
            task("B", instant(3, 8), instant(3, 12)),
        ];
        let assignment = assign_rows(&items);
        assert_eq!(assignment.row_of("A"), Some(0));
        assert_eq!(assignment.row_of("B"), Some(1));
        assert_eq!(assignment.total_rows(), 2);
    }

    #[test]
    fn test_disjoint_singletons_share_row() {
        let items = vec![
            task("A", instant(2, 9), instant(3, 9)),
            task("B", instant(4, 9), instant(5, 9)),
        ];
        let assignment = assign_rows(&items);
        assert_eq!(assignment.row_of("A"), Some(0));
        assert_eq!(assignment.row_of("B"), Some(0));
        assert_eq!(assignment.total_rows(), 1);
    }

    #[test]
    fn test_group_block_contiguous() {
        // Scenario: C1 and C2 never overlap but still occupy fixed
        // offsets below the parent.
        let assignment = assign_rows(&group_c());
        assert_eq!(assignment.row_of("C"), Some(0));
        assert_eq!(assignment.row_of("C1"), Some(1));
        assert_eq!(assignment.row_of("C2"), Some(2));
        assert_eq!(assignment.total_rows(), 3);

        let span = assignment.group_span("task:C").unwrap();
        assert_eq!((span.first_row, span.last_row), (0, 2));
    }

    #[test]
    fn test_interior_row_reserved() {
        let mut items = group_c();
        // Overlaps C1's row window but must not take interior row 1:
        // row 0 has parent C (overlap), row 1 is interior, row 2 has C2
        // (overlap) — first open row is 3.
        items.push(task("X", instant(3, 10), instant(4, 12)));
        let assignment = assign_rows(&items);
        assert_eq!(assignment.row_of("X"), Some(3));
    }

    #[test]
    fn test_boundary_row_shared_when_no_overlap() {
        let mut items = group_c();
        // B (Tue 08–12) clears parent C? No — parent spans Mon–Thu, so
        // row 0 conflicts; row 1 is interior; row 2's occupant C2 starts
        // Wednesday, so the boundary row is free for Tuesday-only B.
        items.push(task("B", instant(3, 8), instant(3, 12)));
        let assignment = assign_rows(&items);
        assert_eq!(assignment.row_of("B"), Some(2));
    }

    #[test]
    fn test_finished_block_row_reusable() {
        let mut items = group_c();
        // F starts Friday, after every member of the block has ended.
        // Row 0's parent C ended Thu 09:00 < Fri 09:00 — no overlap, so
        // the block's first row is reusable.
        items.push(task("F", instant(6, 9), instant(6, 10)));
        let assignment = assign_rows(&items);
        assert_eq!(assignment.row_of("F"), Some(0));
    }

    #[test]
    fn test_blocks_placed_before_singletons() {
        // The singleton sorts first by start, but blocks claim their
        // rows first: the block takes rows 0..2 and pushes S off the
        // rows it conflicts with.
        let mut items = group_c();
        items.insert(0, task("S", instant(2, 8), instant(6, 17)));
        let assignment = assign_rows(&items);
        assert_eq!(assignment.row_of("C"), Some(0));
        assert_eq!(assignment.row_of("S"), Some(3));
    }

    #[test]
    fn test_two_groups_stack() {
        let mut items = group_c();
        items.extend(vec![
            grouped("D", "task:D", 0, ItemKind::Task, instant(2, 10), instant(4, 10)),
            grouped("D1", "task:D", 1, ItemKind::Activity, instant(2, 10), instant(4, 10)),
        ]);
        let assignment = assign_rows(&items);
        // C's block occupies rows 0–2; D's parent overlaps C's parent,
        // and at base 1 or 2 it overlaps C1/C2, so D starts at row 3.
        assert_eq!(assignment.row_of("D"), Some(3));
        assert_eq!(assignment.row_of("D1"), Some(4));
        let span = assignment.group_span("task:D").unwrap();
        assert_eq!((span.first_row, span.last_row), (3, 4));
    }

    #[test]
    fn test_identical_intervals_never_share() {
        let items = vec![
            task("A", instant(2, 9), instant(2, 10)),
            task("B", instant(2, 9), instant(2, 10)),
            task("C", instant(2, 9), instant(2, 10)),
        ];
        let assignment = assign_rows(&items);
        // Earlier-sorted ID wins each row.
        assert_eq!(assignment.row_of("A"), Some(0));
        assert_eq!(assignment.row_of("B"), Some(1));
        assert_eq!(assignment.row_of("C"), Some(2));
    }

    #[test]
    fn test_degraded_group_treated_as_singletons() {
        // A group without any activity member does not block-place.
        let items = vec![
            grouped("P", "task:P", 0, ItemKind::Task, instant(2, 9), instant(3, 9)),
            grouped("Q", "task:P", 1, ItemKind::Task, instant(4, 9), instant(5, 9)),
        ];
        let assignment = assign_rows(&items);
        assert_eq!(assignment.row_of("P"), Some(0));
        assert_eq!(assignment.row_of("Q"), Some(0));
        assert!(assignment.group_span("task:P").is_none());
    }

    #[test]
    fn test_determinism() {
        let mut items = group_c();
        items.push(task("B", instant(3, 8), instant(3, 12)));
        items.push(task("A", instant(2, 9), instant(6, 17)));

        let first = assign_rows(&items);
        let second = assign_rows(&items);
        for item in &items {
            assert_eq!(first.row_of(&item.id), second.row_of(&item.id));
        }
        assert_eq!(first.total_rows(), second.total_rows());
    }

    #[test]
    fn test_window_independence() {
        // Rows of this week's items must not move when a far-future item
        // that overlaps nothing new is added or removed.
        let mut items = vec![
            task("A", instant(2, 9), instant(6, 17)),
            task("B", instant(3, 8), instant(3, 12)),
        ];
        let before = assign_rows(&items);
        items.push(task("Z", instant(30, 9), instant(31, 9)));
        let after = assign_rows(&items);
        assert_eq!(before.row_of("A"), after.row_of("A"));
        assert_eq!(before.row_of("B"), after.row_of("B"));
    }

    #[test]
    fn test_no_same_row_overlap_property() {
        let mut items = group_c();
        items.push(task("A", instant(2, 9), instant(6, 17)));
        items.push(task("B", instant(3, 8), instant(3, 12)));
        items.push(task("F", instant(6, 9), instant(6, 10)));
        items.push(task("E", instant(2, 9), instant(6, 17)));

        let assignment = assign_rows(&items);
        for a in &items {
            for b in &items {
                if a.id != b.id && assignment.row_of(&a.id) == assignment.row_of(&b.id) {
                    assert!(!a.overlaps(b), "{} and {} overlap in one row", a.id, b.id);
                }
            }
        }
    }

    #[test]
    fn test_group_contiguity_property() {
        let mut items = group_c();
        items.extend(vec![
            grouped("D", "task:D", 0, ItemKind::Task, instant(2, 10), instant(4, 10)),
            grouped("D1", "task:D", 1, ItemKind::Activity, instant(2, 10), instant(4, 10)),
            grouped("D2", "task:D", 2, ItemKind::Activity, instant(3, 10), instant(4, 10)),
        ]);
        let assignment = assign_rows(&items);
        for gid in ["task:C", "task:D"] {
            let mut rows: Vec<usize> = items
                .iter()
                .filter(|i| i.group_id.as_deref() == Some(gid))
                .map(|i| assignment.row_of(&i.id).unwrap())
                .collect();
            rows.sort_unstable();
            for pair in rows.windows(2) {
                assert_eq!(pair[1], pair[0] + 1, "group {gid} not contiguous");
            }
        }
    }

    #[test]
    fn test_empty_input() {
        let assignment = assign_rows(&[]);
        assert_eq!(assignment.total_rows(), 0);
        assert!(assignment.is_empty());
    }

    #[test]
    fn test_reschedule_then_reassign() {
        let items = vec![
            task("A", instant(2, 9), instant(3, 9)),
            task("B", instant(4, 9), instant(5, 9)),
        ];
        // Disjoint: both on row 0.
        assert_eq!(assign_rows(&items).row_of("B"), Some(0));

        // Move A onto B's range; a full re-run must split them.
        let moved = items[0].rescheduled(instant(4, 9));
        assert_eq!(moved.duration(), items[0].duration());
        let items = vec![moved, items[1].clone()];
        let assignment = assign_rows(&items);
        assert_eq!(assignment.row_of("A"), Some(0));
        assert_eq!(assignment.row_of("B"), Some(1));
    }
}
