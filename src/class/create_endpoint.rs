//! Defines the endpoint for creating a new class.
use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    class::core::{ClassStatus, DayOfWeek, NewClassSession, create_class},
    endpoints,
    form::{optional_text, parse_optional_id, parse_time, required_text},
    money::parse_optional_money_input,
};

/// The state needed to create a class.
#[derive(Debug, Clone)]
pub struct CreateClassState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateClassState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating a class.
#[derive(Debug, Deserialize)]
pub struct ClassForm {
    pub name: String,
    pub class_type: String,
    #[serde(default)]
    pub level: String,
    /// The instructor's staff id, blank for no instructor.
    #[serde(default)]
    pub instructor_id: String,
    pub day_of_week: DayOfWeek,
    /// `HH:MM`
    pub start_time: String,
    /// `HH:MM`
    pub end_time: String,
    #[serde(default)]
    pub room: String,
    pub capacity: i64,
    #[serde(default)]
    pub tuition_fee: String,
    #[serde(default)]
    pub status: ClassStatus,
}

impl TryFrom<ClassForm> for NewClassSession {
    type Error = Error;

    fn try_from(form: ClassForm) -> Result<Self, Self::Error> {
        NewClassSession {
            name: required_text("Class name", &form.name)?,
            class_type: required_text("Class type", &form.class_type)?,
            level: optional_text(&form.level),
            instructor_id: parse_optional_id("instructor", &form.instructor_id)?,
            day_of_week: form.day_of_week,
            start_time: parse_time("Start time", &form.start_time)?,
            end_time: parse_time("End time", &form.end_time)?,
            room: optional_text(&form.room),
            capacity: form.capacity,
            tuition_fee: parse_optional_money_input(&form.tuition_fee)?,
            status: form.status,
        }
        .validate()
    }
}

/// A route handler for creating a new class, redirects to the classes view on success.
pub async fn create_class_endpoint(
    State(state): State<CreateClassState>,
    Form(form): Form<ClassForm>,
) -> Response {
    let new_class = match NewClassSession::try_from(form) {
        Ok(new_class) => new_class,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_class(new_class, &connection) {
        Ok(class) => {
            tracing::info!("Created class {} ({})", class.id, class.name);

            (
                HxRedirect(endpoints::CLASSES_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("Could not create class: {error}");
            error.into_alert_response()
        }
    }
}
