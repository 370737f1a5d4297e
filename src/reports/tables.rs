//! Table views for the reports page.

use maud::{Markup, html};
use rust_decimal::Decimal;

use crate::{
    html::{
        BADGE_GREEN_STYLE, BADGE_RED_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        TABLE_STYLE, badge, format_currency, format_percent,
    },
    stats::{AttendanceStats, ClassPerformance, FinancialSummary, SeriesMetric, SeriesPoint},
};

const TABLE_HEADER_CELL_STYLE: &str = "px-3 py-3 text-center min-w-[80px]";
const TABLE_STICKY_CELL_STYLE: &str = "px-3 py-4 font-medium text-gray-900 dark:text-white \
    sticky left-0 bg-white dark:bg-gray-800 z-10 text-left";
const TABLE_DATA_CELL_STYLE: &str = "px-3 py-4 text-center whitespace-nowrap";
const TABLE_CELL_GREEN_STYLE: &str = "text-green-600 dark:text-green-400";
const TABLE_CELL_RED_STYLE: &str = "text-red-600 dark:text-red-400";

/// Green for a profit, red for a loss.
fn amount_color_class(amount: Decimal) -> &'static str {
    if amount >= Decimal::ZERO {
        TABLE_CELL_GREEN_STYLE
    } else {
        TABLE_CELL_RED_STYLE
    }
}

fn key_value_row(label: &str, value: Markup) -> Markup {
    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            th scope="row" class=(TABLE_STICKY_CELL_STYLE) { (label) }
            td class=(TABLE_DATA_CELL_STYLE) { (value) }
        }
    }
}

pub(super) fn financial_summary_table(summary: &FinancialSummary) -> Markup {
    html! {
        table id="financial-summary" class=(TABLE_STYLE)
        {
            tbody
            {
                (key_value_row("Revenue", html! { (format_currency(summary.total_revenue)) }))
                (key_value_row("Expenses", html! { (format_currency(summary.total_expenses)) }))
                (key_value_row("Net profit", html! {
                    span class=(amount_color_class(summary.net_profit))
                    {
                        (format_currency(summary.net_profit))
                    }
                }))
                (key_value_row("Outstanding", html! { (format_currency(summary.outstanding)) }))
            }
        }
    }
}

pub(super) fn attendance_stats_table(stats: &AttendanceStats) -> Markup {
    html! {
        table id="attendance-stats" class=(TABLE_STYLE)
        {
            tbody
            {
                (key_value_row("Attendance rate", html! { (format_percent(stats.overall_rate)) }))
                (key_value_row("Late rate", html! { (format_percent(stats.late_rate)) }))
                (key_value_row("Records taken", html! { (stats.total_records) }))
            }
        }
    }
}

pub(super) fn class_performance_table(classes: &[ClassPerformance]) -> Markup {
    html! {
        table id="class-performance" class=(TABLE_STYLE)
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    th scope="col" class=(TABLE_CELL_STYLE) { "Class" }
                    th scope="col" class=(TABLE_HEADER_CELL_STYLE) { "Enrolled" }
                    th scope="col" class=(TABLE_HEADER_CELL_STYLE) { "Capacity" }
                    th scope="col" class=(TABLE_HEADER_CELL_STYLE) { "Fill rate" }
                    th scope="col" class=(TABLE_HEADER_CELL_STYLE) { "Status" }
                }
            }

            tbody
            {
                @for class in classes {
                    tr class=(TABLE_ROW_STYLE)
                    {
                        th scope="row" class=(TABLE_STICKY_CELL_STYLE) { (class.class_name) }
                        td class=(TABLE_DATA_CELL_STYLE) { (class.enrolled) }
                        td class=(TABLE_DATA_CELL_STYLE) { (class.capacity) }
                        td class=(TABLE_DATA_CELL_STYLE) { (format_percent(class.fill_rate)) }
                        td class=(TABLE_DATA_CELL_STYLE)
                        {
                            @if class.is_full {
                                (badge("Full", BADGE_RED_STYLE))
                            } @else {
                                (badge("Open", BADGE_GREEN_STYLE))
                            }
                        }
                    }
                }

                @if classes.is_empty() {
                    tr
                    {
                        td
                            colspan="5"
                            class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                        {
                            "No active classes."
                        }
                    }
                }
            }
        }
    }
}

fn format_series_value(metric: SeriesMetric, value: Decimal) -> String {
    match metric {
        SeriesMetric::Revenue | SeriesMetric::Expenses => format_currency(value),
        SeriesMetric::Enrollments => value.normalize().to_string(),
        SeriesMetric::Attendance => format!("{}%", value.normalize()),
    }
}

/// Renders one row per metric with a column for each month.
///
/// Every series must cover the same months.
pub(super) fn monthly_series_table(series: &[(SeriesMetric, Vec<SeriesPoint>)]) -> Markup {
    let months: Vec<&str> = series
        .first()
        .map(|(_, points)| points.iter().map(|point| point.month.as_str()).collect())
        .unwrap_or_default();

    html! {
        table id="monthly-series" class=(TABLE_STYLE)
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    th scope="col" class=(TABLE_CELL_STYLE) { "" }
                    @for month in &months {
                        th scope="col" class=(TABLE_HEADER_CELL_STYLE) { (month) }
                    }
                }
            }

            tbody
            {
                @for (metric, points) in series {
                    tr class=(TABLE_ROW_STYLE)
                    {
                        th scope="row" class=(TABLE_STICKY_CELL_STYLE) { (metric.label()) }
                        @for point in points {
                            td class=(TABLE_DATA_CELL_STYLE)
                            {
                                (format_series_value(*metric, point.value))
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use crate::stats::SeriesMetric;

    use super::format_series_value;

    #[test]
    fn formats_series_values_by_metric() {
        assert_eq!(format_series_value(SeriesMetric::Revenue, dec!(120.5)), "$120.50");
        assert_eq!(format_series_value(SeriesMetric::Enrollments, dec!(3)), "3");
        assert_eq!(format_series_value(SeriesMetric::Attendance, dec!(75)), "75%");
    }
}
