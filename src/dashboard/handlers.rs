//! Dashboard HTTP handler and view rendering.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    dashboard::{
        cards::dashboard_cards,
        tables::{recent_enrollments_table, upcoming_events_table},
    },
    endpoints,
    enrollment::EnrollmentListing,
    event::Event,
    html::{PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
    stats::{DashboardStats, dashboard_stats, recent_enrollments, upcoming_events},
    timezone::get_local_date,
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading the studio's records.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display a page with an overview of the studio.
///
/// The statistics never fail to load, a database error shows up as zeros and
/// empty lists.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    let today = get_local_date(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let stats = dashboard_stats(today, &connection);
    let enrollments = recent_enrollments(&connection);
    let events = upcoming_events(today, &connection);

    Ok(dashboard_view(&stats, &enrollments, &events).into_response())
}

fn dashboard_view(
    stats: &DashboardStats,
    enrollments: &[EnrollmentListing],
    events: &[Event],
) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            header class="w-full max-w-5xl"
            {
                h1 class="text-xl font-bold" { "Dashboard" }
            }

            (dashboard_cards(stats))

            section class="grid w-full max-w-5xl grid-cols-1 gap-6 lg:grid-cols-2"
            {
                (recent_enrollments_table(enrollments))
                (upcoming_events_table(events))
            }
        }
    );

    base("Dashboard", &content)
}
