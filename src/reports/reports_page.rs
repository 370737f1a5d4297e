//! The reports page: this month's finances and attendance, how full each
//! class is and the trailing monthly series.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{CARD_STYLE, PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
    reports::tables::{
        attendance_stats_table, class_performance_table, financial_summary_table,
        monthly_series_table,
    },
    stats::{
        AttendanceStats, ClassPerformance, DEFAULT_SERIES_MONTHS, FinancialSummary, SeriesMetric,
        SeriesPoint, attendance_stats, class_performance, financial_summary, monthly_series,
    },
    timezone::get_local_date,
};

/// The state needed for the reports page.
#[derive(Debug, Clone)]
pub struct ReportsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub local_timezone: String,
}

impl FromRef<AppState> for ReportsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Renders the reports page.
pub async fn get_reports_page(State(state): State<ReportsPageState>) -> Result<Response, Error> {
    let today = get_local_date(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let summary = financial_summary(today, &connection);
    let attendance = attendance_stats(today, &connection);
    let classes = class_performance(&connection);
    let series: Vec<(SeriesMetric, Vec<SeriesPoint>)> = SeriesMetric::ALL
        .iter()
        .map(|&metric| {
            (
                metric,
                monthly_series(metric, DEFAULT_SERIES_MONTHS, today, &connection),
            )
        })
        .collect();

    Ok(reports_view(&summary, &attendance, &classes, &series).into_response())
}

fn report_section(title: &str, table: Markup) -> Markup {
    html! {
        section class={ (CARD_STYLE) " w-full overflow-x-auto lg:max-w-5xl" }
        {
            h2 class="text-lg font-semibold mb-4" { (title) }
            (table)
        }
    }
}

fn reports_view(
    summary: &FinancialSummary,
    attendance: &AttendanceStats,
    classes: &[ClassPerformance],
    series: &[(SeriesMetric, Vec<SeriesPoint>)],
) -> Markup {
    let nav_bar = NavBar::new(endpoints::REPORTS_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            header class="w-full max-w-5xl"
            {
                h1 class="text-xl font-bold" { "Reports" }
            }

            div class="grid w-full max-w-5xl grid-cols-1 gap-6 lg:grid-cols-2"
            {
                (report_section("Finances this month", financial_summary_table(summary)))
                (report_section("Attendance this month", attendance_stats_table(attendance)))
            }

            (report_section("Class performance", class_performance_table(classes)))
            (report_section(
                &format!("Last {DEFAULT_SERIES_MONTHS} months"),
                monthly_series_table(series),
            ))
        }
    );

    base("Reports", &content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use rusqlite::Connection;
    use rust_decimal_macros::dec;
    use scraper::{ElementRef, Html, Selector};

    use crate::{
        attendance::{AttendanceStatus, insert_attendance},
        finance::PaymentStatus,
        reports::reports_page::{ReportsPageState, get_reports_page},
        stats::DEFAULT_SERIES_MONTHS,
        test_utils::{
            assert_status_ok, assert_valid_html, cell_texts, get_test_connection,
            must_create_class, must_create_expense, must_create_payment, must_create_student,
            must_enroll, parse_html_document, row_header_text,
        },
        timezone::get_local_date,
    };

    fn table_rows<'a>(html: &'a Html, table_id: &str) -> Vec<ElementRef<'a>> {
        html.select(&Selector::parse(&format!("table#{table_id} tbody tr")).unwrap())
            .collect()
    }

    fn new_state(connection: Connection) -> ReportsPageState {
        ReportsPageState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    #[tokio::test]
    async fn shows_every_report() {
        let connection = get_test_connection();
        let today = get_local_date("Etc/UTC").unwrap();
        let ana = must_create_student("Ana", "Lee", &connection);
        let class = must_create_class("Ballet I", 1, &connection);
        must_enroll(ana.id, class.id, today, &connection);
        insert_attendance(class.id, ana.id, today, AttendanceStatus::Late, &connection).unwrap();
        must_create_payment(ana.id, dec!(100), today, PaymentStatus::Completed, &connection);
        must_create_expense(dec!(140), today, &connection);

        let response = get_reports_page(State(new_state(connection))).await.unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let finances = table_rows(&html, "financial-summary");
        let finance_values: Vec<String> =
            finances.iter().map(|row| cell_texts(row).concat()).collect();
        assert_eq!(finance_values, ["$100.00", "$140.00", "-$40.00", "$0.00"]);

        let attendance = table_rows(&html, "attendance-stats");
        let attendance_values: Vec<String> =
            attendance.iter().map(|row| cell_texts(row).concat()).collect();
        assert_eq!(attendance_values, ["0%", "100%", "1"]);

        let classes = table_rows(&html, "class-performance");
        assert_eq!(classes.len(), 1);
        assert_eq!(row_header_text(&classes[0]), "Ballet I");
        assert_eq!(cell_texts(&classes[0]), ["1", "1", "100%", "Full"]);

        let series = table_rows(&html, "monthly-series");
        assert_eq!(series.len(), 4);
        assert_eq!(row_header_text(&series[0]), "Revenue");
        let revenue = cell_texts(&series[0]);
        assert_eq!(revenue.len(), DEFAULT_SERIES_MONTHS as usize);
        assert_eq!(revenue.last().map(String::as_str), Some("$100.00"));
    }

    #[tokio::test]
    async fn uninitialised_database_renders_zeros() {
        let response = get_reports_page(State(new_state(Connection::open_in_memory().unwrap())))
            .await
            .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        let classes = table_rows(&html, "class-performance");
        assert_eq!(classes.len(), 1);
        let series = table_rows(&html, "monthly-series");
        assert_eq!(cell_texts(&series[1])[0], "$0.00");
    }
}
