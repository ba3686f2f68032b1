//! # Aggregation Reporter
//!
//! Grouping and ranking helpers behind the dashboard. Groups are kept in
//! order of first appearance and every sort is stable, so equal totals keep
//! the order in which their groups first showed up in the input.

use std::collections::HashMap;

use shared::RankedTotal;

use crate::domain::models::record::RecordView;

/// Top lists shown on the dashboard have this many rows
pub const DEFAULT_TOP_N: usize = 5;

/// Dimension to group records by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    Class,
    Student,
    Aspect,
}

/// How point values are summed within a group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Summation {
    /// Signed sum
    Net,
    /// Sum of absolute values, for ranking violations by size
    Magnitude,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankOrder {
    /// Largest total first
    Descending,
    /// Smallest (most negative) total first
    Ascending,
}

const UNKNOWN_GROUP: &str = "Unknown";

fn group_name(record: &RecordView, group_by: GroupBy) -> &str {
    match group_by {
        GroupBy::Class => record.class_name.as_deref().unwrap_or(UNKNOWN_GROUP),
        GroupBy::Student => &record.student_name,
        GroupBy::Aspect => record.aspect_name.as_deref().unwrap_or(UNKNOWN_GROUP),
    }
}

/// Sum point values per group, in order of first appearance
pub fn group_totals<'a, I>(records: I, group_by: GroupBy, summation: Summation) -> Vec<RankedTotal>
where
    I: IntoIterator<Item = &'a RecordView>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut totals: Vec<RankedTotal> = Vec::new();

    for record in records {
        let value = match summation {
            Summation::Net => record.point,
            Summation::Magnitude => record.point.abs(),
        };
        let name = group_name(record, group_by);
        match index.get(name) {
            Some(&i) => totals[i].points += value,
            None => {
                index.insert(name.to_string(), totals.len());
                totals.push(RankedTotal {
                    name: name.to_string(),
                    points: value,
                });
            }
        }
    }

    totals
}

/// Stable sort by total, then keep the first `limit` rows (all when `None`)
pub fn rank(
    mut totals: Vec<RankedTotal>,
    order: RankOrder,
    limit: Option<usize>,
) -> Vec<RankedTotal> {
    match order {
        RankOrder::Descending => totals.sort_by(|a, b| b.points.cmp(&a.points)),
        RankOrder::Ascending => totals.sort_by(|a, b| a.points.cmp(&b.points)),
    }
    if let Some(limit) = limit {
        totals.truncate(limit);
    }
    totals
}
