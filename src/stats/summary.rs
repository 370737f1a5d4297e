//! The statistics shown on the dashboard and reports pages.

use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use time::Date;

use crate::{
    class::{ClassId, ClassStatus, get_active_classes},
    enrollment::{EnrollmentListing, get_recent_enrollments},
    event::{Event, get_upcoming_events},
    money::serialize_amount,
    stats::{
        queries::{RecordTable, count_rows},
        rollup::{
            attendance_counts, class_fill_rate, is_full, month_window, monthly_expenses,
            monthly_revenue, net_profit, outstanding,
        },
    },
};

/// How many recent enrollments and upcoming events the dashboard lists.
pub const DASHBOARD_LIST_LIMIT: u32 = 5;

/// The headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    /// Every student on the books, whatever their status.
    pub total_students: u64,
    /// Classes with the active status.
    pub active_classes: u64,
    /// Completed payments this month.
    #[serde(serialize_with = "serialize_amount")]
    pub monthly_revenue: Decimal,
    /// The percentage of this month's attendance records that are present.
    pub attendance_rate: u32,
}

/// This month's money in and out, plus everything still owed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialSummary {
    /// Completed payments this month.
    #[serde(serialize_with = "serialize_amount")]
    pub total_revenue: Decimal,
    /// Expenses this month.
    #[serde(serialize_with = "serialize_amount")]
    pub total_expenses: Decimal,
    /// Revenue minus expenses, may be negative.
    #[serde(serialize_with = "serialize_amount")]
    pub net_profit: Decimal,
    /// Pending payments from any month.
    #[serde(serialize_with = "serialize_amount")]
    pub outstanding: Decimal,
}

/// This month's attendance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceStats {
    /// The percentage of records that are present.
    pub overall_rate: u32,
    /// The percentage of records that are late.
    pub late_rate: u32,
    /// The number of records taken this month.
    pub total_records: u64,
}

/// How full an active class is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassPerformance {
    /// The class's id.
    pub class_id: ClassId,
    /// The class's name.
    pub class_name: String,
    /// The most students the class can take.
    pub capacity: i64,
    /// The number of distinct students enrolled.
    pub enrolled: u64,
    /// `enrolled` as a percentage of `capacity`.
    pub fill_rate: u32,
    /// Whether there are no places left.
    pub is_full: bool,
}

fn count_or_zero(
    table: RecordTable,
    status_filter: Option<&str>,
    connection: &Connection,
) -> u64 {
    count_rows(table, None, status_filter, connection).unwrap_or_else(|error| {
        tracing::error!("could not count {table:?} rows: {error}");
        0
    })
}

/// The dashboard's headline numbers for the month containing `today`.
pub fn dashboard_stats(today: Date, connection: &Connection) -> DashboardStats {
    let window = month_window(today);

    DashboardStats {
        total_students: count_or_zero(RecordTable::Student, None, connection),
        active_classes: count_or_zero(
            RecordTable::Class,
            Some(ClassStatus::Active.as_str()),
            connection,
        ),
        monthly_revenue: monthly_revenue(window, connection),
        attendance_rate: attendance_counts(window, connection).attendance_rate(),
    }
}

/// The financial summary for the month containing `today`.
pub fn financial_summary(today: Date, connection: &Connection) -> FinancialSummary {
    let window = month_window(today);
    let total_revenue = monthly_revenue(window, connection);
    let total_expenses = monthly_expenses(window, connection);

    FinancialSummary {
        total_revenue,
        total_expenses,
        net_profit: net_profit(total_revenue, total_expenses),
        outstanding: outstanding(connection),
    }
}

/// The attendance summary for the month containing `today`.
pub fn attendance_stats(today: Date, connection: &Connection) -> AttendanceStats {
    let counts = attendance_counts(month_window(today), connection);

    AttendanceStats {
        overall_rate: counts.attendance_rate(),
        late_rate: counts.late_rate(),
        total_records: counts.total,
    }
}

/// How full each active class is, ordered by class name.
pub fn class_performance(connection: &Connection) -> Vec<ClassPerformance> {
    let classes = get_active_classes(connection).unwrap_or_else(|error| {
        tracing::error!("could not get class performance: {error}");
        Vec::new()
    });

    classes
        .into_iter()
        .map(|listing| ClassPerformance {
            class_id: listing.class.id,
            fill_rate: class_fill_rate(listing.class.capacity, listing.enrolled),
            is_full: is_full(listing.class.capacity, listing.enrolled),
            class_name: listing.class.name,
            capacity: listing.class.capacity,
            enrolled: listing.enrolled,
        })
        .collect()
}

/// The newest enrollments for the dashboard.
pub fn recent_enrollments(connection: &Connection) -> Vec<EnrollmentListing> {
    get_recent_enrollments(DASHBOARD_LIST_LIMIT, connection).unwrap_or_else(|error| {
        tracing::error!("could not get recent enrollments: {error}");
        Vec::new()
    })
}

/// The next events from `today` onwards for the dashboard.
pub fn upcoming_events(today: Date, connection: &Connection) -> Vec<Event> {
    get_upcoming_events(today, DASHBOARD_LIST_LIMIT, connection).unwrap_or_else(|error| {
        tracing::error!("could not get upcoming events: {error}");
        Vec::new()
    })
}
