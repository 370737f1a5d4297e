//! JSON endpoints for the rollup statistics.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, Query, State},
};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    class::ClassId,
    stats::{
        rollup::{
            ClassFill, DEFAULT_SERIES_MONTHS, SeriesMetric, SeriesPoint, class_fill,
            monthly_series,
        },
        summary::{
            AttendanceStats, ClassPerformance, DashboardStats, FinancialSummary,
            attendance_stats, class_performance, dashboard_stats, financial_summary,
        },
    },
    timezone::get_local_date,
};

/// The longest series that can be requested.
const MAX_SERIES_MONTHS: u32 = 24;

/// The state needed by the statistics endpoints.
#[derive(Debug, Clone)]
pub struct StatsState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub local_timezone: String,
}

impl FromRef<AppState> for StatsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The number of months to include in a series.
#[derive(Debug, Default, Deserialize)]
pub struct SeriesQuery {
    pub months: Option<u32>,
}

/// Lock the connection and run `rollup` for today's date.
fn with_today<T>(
    state: &StatsState,
    rollup: impl FnOnce(Date, &Connection) -> T,
) -> Result<Json<T>, Error> {
    let today = get_local_date(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    Ok(Json(rollup(today, &connection)))
}

/// A route handler for the dashboard's headline numbers.
pub async fn get_dashboard_stats(
    State(state): State<StatsState>,
) -> Result<Json<DashboardStats>, Error> {
    with_today(&state, dashboard_stats)
}

/// A route handler for this month's financial summary.
pub async fn get_financial_summary(
    State(state): State<StatsState>,
) -> Result<Json<FinancialSummary>, Error> {
    with_today(&state, financial_summary)
}

/// A route handler for this month's attendance summary.
pub async fn get_attendance_stats(
    State(state): State<StatsState>,
) -> Result<Json<AttendanceStats>, Error> {
    with_today(&state, attendance_stats)
}

/// A route handler for how full each active class is.
pub async fn get_class_performance(
    State(state): State<StatsState>,
) -> Result<Json<Vec<ClassPerformance>>, Error> {
    with_today(&state, |_, connection| class_performance(connection))
}

/// A route handler for how full a single class is.
pub async fn get_class_fill(
    State(state): State<StatsState>,
    Path(class_id): Path<ClassId>,
) -> Result<Json<ClassFill>, Error> {
    with_today(&state, |_, connection| class_fill(class_id, connection))
}

/// A route handler for one metric month by month.
///
/// `months` defaults to six and is clamped to between one and two years.
pub async fn get_monthly_series(
    State(state): State<StatsState>,
    Path(metric): Path<SeriesMetric>,
    Query(query): Query<SeriesQuery>,
) -> Result<Json<Vec<SeriesPoint>>, Error> {
    let month_count = query
        .months
        .unwrap_or(DEFAULT_SERIES_MONTHS)
        .clamp(1, MAX_SERIES_MONTHS);

    with_today(&state, |today, connection| {
        monthly_series(metric, month_count, today, connection)
    })
}
