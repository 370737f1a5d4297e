//! Displays the studio's events with a form for adding events.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    event::core::{Event, EventStatus, EventType, get_events},
    form::format_time,
    html::{
        BADGE_GRAY_STYLE, BADGE_GREEN_STYLE, BADGE_RED_STYLE, BADGE_YELLOW_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, TABLE_STYLE,
        badge, base, create_form, delete_button, format_currency, money_input, select_input,
        text_input,
    },
    navigation::NavBar,
};

/// The state needed for the events page.
#[derive(Debug, Clone)]
pub struct EventsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EventsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the events page.
pub async fn get_events_page(State(state): State<EventsPageState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let events = get_events(&connection)
        .inspect_err(|error| tracing::error!("could not get events: {error}"))?;

    Ok(events_view(&events).into_response())
}

pub(crate) fn event_status_badge(status: EventStatus) -> Markup {
    match status {
        EventStatus::Scheduled => badge(status.label(), BADGE_YELLOW_STYLE),
        EventStatus::InProgress => badge(status.label(), BADGE_GREEN_STYLE),
        EventStatus::Completed => badge(status.label(), BADGE_GRAY_STYLE),
        EventStatus::Cancelled => badge(status.label(), BADGE_RED_STYLE),
    }
}

pub(crate) fn event_time(event: &Event) -> String {
    match (event.start_time, event.end_time) {
        (Some(start), Some(end)) => format!("{}–{}", format_time(start), format_time(end)),
        (Some(start), None) => format_time(start),
        _ => "-".to_owned(),
    }
}

fn events_view(events: &[Event]) -> Markup {
    let nav_bar = NavBar::new(endpoints::EVENTS_VIEW).into_html();

    let fields = html! {
        (text_input("Name", "name", "text", true))
        (select_input("Type", "event_type", &EventType::options(), false))
        (text_input("Date", "event_date", "date", true))
        (text_input("Location", "location", "text", false))
        (text_input("Start time", "start_time", "time", false))
        (text_input("End time", "end_time", "time", false))
        (money_input("Cost", "cost", false))
        (select_input("Status", "status", &EventStatus::options(), false))
        div class="md:col-span-2"
        {
            (text_input("Description", "description", "text", false))
        }
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            header class="w-full max-w-5xl"
            {
                h1 class="text-xl font-bold" { "Events" }
            }

            (create_form("Add Event", endpoints::EVENTS_API, &fields))

            section class="w-full overflow-x-auto dark:bg-gray-800 lg:max-w-5xl"
            {
                table class=(TABLE_STYLE)
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Time" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Location" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Cost" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }

                    tbody
                    {
                        @for event in events {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                th
                                    scope="row"
                                    class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                                {
                                    (event.name)
                                }
                                td class=(TABLE_CELL_STYLE) { (event.event_type.label()) }
                                td class=(TABLE_CELL_STYLE) { (event.event_date) }
                                td class=(TABLE_CELL_STYLE) { (event_time(event)) }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    (event.location.as_deref().unwrap_or("-"))
                                }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    @if let Some(cost) = event.cost {
                                        (format_currency(cost))
                                    } @else {
                                        "-"
                                    }
                                }
                                td class=(TABLE_CELL_STYLE) { (event_status_badge(event.status)) }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    (delete_button(
                                        &format_endpoint(endpoints::EVENT, event.id),
                                        &format!("Are you sure you want to delete {}?", event.name),
                                    ))
                                }
                            }
                        }

                        @if events.is_empty() {
                            tr
                            {
                                td
                                    colspan="8"
                                    class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                                {
                                    "No events yet. Add an event with the form above."
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Events", &content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use time::macros::date;

    use crate::{
        endpoints,
        event::events_page::{EventsPageState, get_events_page},
        test_utils::{
            assert_form_input, assert_hx_endpoint, assert_status_ok, assert_valid_html,
            cell_texts, get_test_connection, must_create_event, must_get_form,
            must_get_table_rows, parse_html_document, row_header_text,
        },
    };

    #[tokio::test]
    async fn lists_events_soonest_first() {
        let connection = get_test_connection();
        must_create_event("Winter Recital", date!(2024 - 06 - 20), &connection);
        must_create_event("Regionals", date!(2024 - 04 - 02), &connection);
        let state = EventsPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_events_page(State(state)).await.unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let rows = must_get_table_rows(&html, 2);
        assert_eq!(row_header_text(&rows[0]), "Regionals");
        assert_eq!(row_header_text(&rows[1]), "Winter Recital");
        let cells = cell_texts(&rows[0]);
        assert_eq!(cells[0], "Recital");
        assert_eq!(cells[1], "2024-04-02");
        assert_eq!(cells[2], "18:00–20:00");
        assert_eq!(cells[4], "$150.00");
        assert_eq!(cells[5], "Scheduled");
    }

    #[tokio::test]
    async fn shows_create_form_and_empty_state() {
        let state = EventsPageState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };

        let response = get_events_page(State(state)).await.unwrap();

        let html = parse_html_document(response).await;
        let form = must_get_form(&html, "form[hx-post]");
        assert_hx_endpoint(&form, endpoints::EVENTS_API, "hx-post");
        assert_form_input(&form, "name", "text");
        assert_form_input(&form, "event_date", "date");
        must_get_table_rows(&html, 1);
    }
}
