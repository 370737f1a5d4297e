//! Defines the endpoint for deleting a student.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    student::core::{StudentId, delete_student},
};

/// The state needed to delete a student.
#[derive(Debug, Clone)]
pub struct DeleteStudentState {
    /// The database connection for managing students.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteStudentState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a student, responds with an alert.
///
/// Enrollments, attendance and payments for the student are deleted too.
pub async fn delete_student_endpoint(
    State(state): State<DeleteStudentState>,
    Path(student_id): Path<StudentId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_student(student_id, &connection) {
        // The status code has to be 200 OK or HTMX will not delete the table row.
        Ok(()) => Alert::SuccessSimple {
            message: "Student deleted successfully".to_owned(),
        }
        .into_response(),
        Err(error) => {
            tracing::error!("Could not delete student {student_id}: {error}");
            error.into_alert_response()
        }
    }
}
