//! Role-scoped dashboard statistics, built on the aggregation helpers.
use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use shared::DashboardStats;
use tracing::info;

use crate::domain::aggregation::{
    group_totals, rank, GroupBy, RankOrder, Summation, DEFAULT_TOP_N,
};
use crate::domain::models::record::{RecordFilter, RecordView};
use crate::domain::models::staff::Staff;
use crate::storage::{ClassStorage, Connection, RecordStorage, StudentStorage};

#[derive(Clone)]
pub struct DashboardService<C: Connection> {
    record_repository: C::RecordRepository,
    student_repository: C::StudentRepository,
    class_repository: C::ClassRepository,
}

impl<C: Connection> DashboardService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            record_repository: connection.create_record_repository(),
            student_repository: connection.create_student_repository(),
            class_repository: connection.create_class_repository(),
        }
    }

    /// Counts for everyone; rankings for admin, principal and homeroom
    /// teachers. "Today" counts records dated on or after `today`.
    pub async fn stats(&self, actor: &Staff, today: NaiveDate) -> Result<DashboardStats> {
        let homeroom = actor.homeroom_class().map(str::to_string);
        info!("Building dashboard for {} ({})", actor.id, actor.role);

        let mut stats = DashboardStats {
            total_students: self.student_repository.count_students(homeroom.as_deref()).await?,
            ..Default::default()
        };
        if actor.is_school_wide() {
            stats.total_classes = self.class_repository.count_classes().await?;
        }

        let todays = self
            .record_repository
            .list_records(&RecordFilter {
                start_date: Some(today),
                class_id: homeroom.clone(),
                ..Default::default()
            })
            .await?;
        stats.points_today = todays.iter().filter(|r| r.point > 0).count() as u64;
        stats.negative_points_today = todays.iter().filter(|r| r.point < 0).count() as u64;

        if actor.is_school_wide() {
            let records = self.record_repository.list_records(&RecordFilter::default()).await?;
            school_wide_rankings(&mut stats, &records);
        } else if let Some(class_id) = homeroom {
            let records = self
                .record_repository
                .list_records(&RecordFilter {
                    class_id: Some(class_id),
                    ..Default::default()
                })
                .await?;
            homeroom_rankings(&mut stats, &records);
        }

        Ok(stats)
    }
}

fn violations(records: &[RecordView]) -> impl Iterator<Item = &RecordView> {
    records.iter().filter(|r| r.point < 0)
}

fn school_wide_rankings(stats: &mut DashboardStats, records: &[RecordView]) {
    // Records of classless students are left out
    let classed = records.iter().filter(|r| r.class_id.is_some());
    let by_class = group_totals(classed, GroupBy::Class, Summation::Net);
    stats.top_classes_positive = Some(rank(
        by_class.clone(),
        RankOrder::Descending,
        Some(DEFAULT_TOP_N),
    ));
    stats.top_classes_negative = Some(rank(by_class, RankOrder::Ascending, Some(DEFAULT_TOP_N)));

    let by_aspect = group_totals(violations(records), GroupBy::Aspect, Summation::Magnitude);
    stats.violation_by_aspect = Some(rank(by_aspect, RankOrder::Descending, None));

    let (positive, negative): (Vec<_>, Vec<_>) =
        group_totals(records, GroupBy::Student, Summation::Net)
            .into_iter()
            .filter(|t| t.points != 0)
            .partition(|t| t.points > 0);
    stats.top_students_positive = Some(rank(
        positive,
        RankOrder::Descending,
        Some(DEFAULT_TOP_N),
    ));
    stats.top_students_negative = Some(rank(
        negative,
        RankOrder::Ascending,
        Some(DEFAULT_TOP_N),
    ));
}

fn homeroom_rankings(stats: &mut DashboardStats, records: &[RecordView]) {
    let by_aspect = group_totals(violations(records), GroupBy::Aspect, Summation::Magnitude);
    stats.violation_by_aspect = Some(rank(by_aspect, RankOrder::Descending, Some(DEFAULT_TOP_N)));

    let by_student = group_totals(violations(records), GroupBy::Student, Summation::Magnitude);
    stats.top_students_negative = Some(rank(
        by_student,
        RankOrder::Descending,
        Some(DEFAULT_TOP_N),
    ));
}
