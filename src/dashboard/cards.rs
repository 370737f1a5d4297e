//! The headline number cards at the top of the dashboard.

use maud::{Markup, html};

use crate::{
    html::{format_currency, format_percent, stat_card},
    stats::DashboardStats,
};

/// Renders the four headline cards: students, active classes, this month's
/// revenue and this month's attendance rate.
pub(super) fn dashboard_cards(stats: &DashboardStats) -> Markup {
    html! {
        section id="dashboard-stats" class="grid w-full max-w-5xl grid-cols-2 gap-4 lg:grid-cols-4"
        {
            (stat_card("Total students", &stats.total_students.to_string()))
            (stat_card("Active classes", &stats.active_classes.to_string()))
            (stat_card("Revenue this month", &format_currency(stats.monthly_revenue)))
            (stat_card("Attendance this month", &format_percent(stats.attendance_rate)))
        }
    }
}
