//! Rollup statistics for the dashboard, finances and reports pages.
//!
//! Every rollup takes today's date explicitly and returns a plain value.

mod endpoints;
mod queries;
mod rollup;
mod summary;

pub use endpoints::{
    get_attendance_stats, get_class_fill, get_class_performance, get_dashboard_stats,
    get_financial_summary, get_monthly_series,
};
pub use queries::{AmountTable, RecordTable, count_rows, sum_amount};
pub use rollup::{
    AttendanceCounts, ClassFill, DEFAULT_SERIES_MONTHS, DateWindow, SeriesMetric, SeriesPoint,
    attendance_counts, attendance_rate, class_fill, class_fill_rate, is_full, late_rate,
    month_label, month_window, monthly_expenses, monthly_revenue, monthly_series, net_profit,
    outstanding, percentage, trailing_months_window,
};
pub use summary::{
    AttendanceStats, ClassPerformance, DashboardStats, FinancialSummary, attendance_stats,
    class_performance, dashboard_stats, financial_summary, recent_enrollments, upcoming_events,
};
