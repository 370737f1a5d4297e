//! Endpoints for adding and deleting events.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    alert::Alert,
    endpoints,
    event::core::{EventId, EventStatus, EventType, NewEvent, create_event, delete_event},
    form::{optional_text, parse_optional_time, required_text},
    money::parse_optional_money_input,
};

/// The state needed to manage events.
#[derive(Debug, Clone)]
pub struct EventState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EventState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for adding an event.
#[derive(Debug, Deserialize)]
pub struct EventForm {
    pub name: String,
    pub event_type: EventType,
    pub event_date: Date,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub cost: String,
    #[serde(default)]
    pub status: EventStatus,
    #[serde(default)]
    pub description: String,
}

impl TryFrom<EventForm> for NewEvent {
    type Error = Error;

    fn try_from(form: EventForm) -> Result<Self, Self::Error> {
        NewEvent {
            name: required_text("Event name", &form.name)?,
            event_type: form.event_type,
            event_date: form.event_date,
            start_time: parse_optional_time("Start time", &form.start_time)?,
            end_time: parse_optional_time("End time", &form.end_time)?,
            location: optional_text(&form.location),
            cost: parse_optional_money_input(&form.cost)?,
            status: form.status,
            description: optional_text(&form.description),
        }
        .validate()
    }
}

/// A route handler for adding an event, redirects to the events view on success.
pub async fn create_event_endpoint(
    State(state): State<EventState>,
    Form(form): Form<EventForm>,
) -> Response {
    let new_event = match NewEvent::try_from(form) {
        Ok(new_event) => new_event,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_event(new_event, &connection) {
        Ok(event) => {
            tracing::info!("Added event {} on {}", event.id, event.event_date);

            (
                HxRedirect(endpoints::EVENTS_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("Could not add event: {error}");
            error.into_alert_response()
        }
    }
}

/// A route handler for deleting an event, responds with an alert.
pub async fn delete_event_endpoint(
    State(state): State<EventState>,
    Path(event_id): Path<EventId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_event(event_id, &connection) {
        Ok(()) => Alert::SuccessSimple {
            message: "Event deleted successfully".to_owned(),
        }
        .into_response(),
        Err(error) => {
            tracing::error!("Could not delete event {event_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Form,
        extract::{Path, State},
        http::StatusCode,
    };
    use rust_decimal_macros::dec;
    use time::macros::time;

    use crate::{
        endpoints,
        event::{
            core::get_events,
            endpoints::{EventForm, EventState, create_event_endpoint, delete_event_endpoint},
        },
        test_utils::{assert_hx_redirect, get_test_connection},
    };

    fn event_form(start_time: &str, end_time: &str) -> EventForm {
        serde_urlencoded::from_str(&format!(
            "name=Spring+Showcase&event_type=performance&event_date=2024-10-12\
            &start_time={start_time}&end_time={end_time}&location=Town+Hall&cost=120.5"
        ))
        .unwrap()
    }

    fn new_state() -> EventState {
        EventState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        }
    }

    #[tokio::test]
    async fn can_add_event() {
        let state = new_state();

        let response =
            create_event_endpoint(State(state.clone()), Form(event_form("18:00", "20:00"))).await;

        assert_hx_redirect(&response, endpoints::EVENTS_VIEW);
        let connection = state.db_connection.lock().unwrap();
        let events = get_events(&connection).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].start_time, Some(time!(18:00)));
        assert_eq!(events[0].cost, Some(dec!(120.50)));
    }

    #[tokio::test]
    async fn times_are_optional() {
        let state = new_state();

        let response = create_event_endpoint(State(state.clone()), Form(event_form("", ""))).await;

        assert_hx_redirect(&response, endpoints::EVENTS_VIEW);
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_events(&connection).unwrap()[0].start_time, None);
    }

    #[tokio::test]
    async fn end_before_start_is_rejected() {
        let state = new_state();

        let response =
            create_event_endpoint(State(state.clone()), Form(event_form("18:00", "09:00"))).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let connection = state.db_connection.lock().unwrap();
        assert!(get_events(&connection).unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleting_missing_event_responds_not_found() {
        let response = delete_event_endpoint(State(new_state()), Path(3)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
