//! Endpoints for enrolling a student in a class and removing the enrollment.

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
    class::ClassId,
    endpoints,
    enrollment::core::{EnrollmentId, create_enrollment, delete_enrollment},
    stats::class_fill,
    student::StudentId,
};

/// The state needed to manage enrollments.
#[derive(Debug, Clone)]
pub struct EnrollmentState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EnrollmentState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for enrolling a student in a class.
#[derive(Debug, Deserialize)]
pub struct EnrollmentForm {
    pub student_id: StudentId,
    pub class_id: ClassId,
    pub enrollment_date: Date,
}

/// A route handler for enrolling a student, redirects to the classes view on success.
pub async fn create_enrollment_endpoint(
    State(state): State<EnrollmentState>,
    Form(form): Form<EnrollmentForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_enrollment(
        form.student_id,
        form.class_id,
        form.enrollment_date,
        &connection,
    ) {
        Ok(enrollment) => {
            tracing::info!(
                "Enrolled student {} in class {}",
                enrollment.student_id,
                enrollment.class_id
            );

            let fill = class_fill(enrollment.class_id, &connection);
            if fill.is_full {
                tracing::warn!(
                    "Class {} is full with {}% of its places taken",
                    fill.class_id,
                    fill.fill_rate
                );
            }

            (
                HxRedirect(endpoints::CLASSES_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("Could not create enrollment with {form:?}: {error}");
            error.into_alert_response()
        }
    }
}

/// A route handler for deleting an enrollment, responds with an alert.
pub async fn delete_enrollment_endpoint(
    State(state): State<EnrollmentState>,
    Path(enrollment_id): Path<EnrollmentId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_enrollment(enrollment_id, &connection) {
        Ok(()) => Alert::SuccessSimple {
            message: "Enrollment removed successfully".to_owned(),
        }
        .into_response(),
        Err(error) => {
            tracing::error!("Could not delete enrollment {enrollment_id}: {error}");
            error.into_alert_response()
        }
    }
}
